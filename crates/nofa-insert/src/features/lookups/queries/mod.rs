pub mod defaults;
pub mod lists;
pub mod metadata;
pub mod taxa;

pub use defaults::{column_default, literal_default, occurrence_defaults, OccurrenceDefaults};
pub use lists::{list_values, LookupList};
pub use metadata::{
    list_datasets, list_projects, list_references, DatasetItem, ProjectItem, ReferenceItem,
};
pub use taxa::{family_tree, list_ecotypes, list_taxa, FamilyTree};
