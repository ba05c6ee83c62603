use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeMap;

/// Taxon ranks offered for occurrence rows
pub const SELECTABLE_RANKS: [&str; 3] = ["species", "hybrid", "genus"];

/// Scientific names of selectable taxa, sorted
#[tracing::instrument(skip(pool))]
pub async fn list_taxa(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let ranks: Vec<String> = SELECTABLE_RANKS.iter().map(|r| r.to_string()).collect();

    let taxa = sqlx::query_scalar::<_, String>(
        r#"
        SELECT "scientificName"
        FROM nofa.l_taxon
        WHERE "taxonRank" = ANY($1)
          AND "scientificName" IS NOT NULL
        ORDER BY "scientificName"
        "#,
    )
    .bind(&ranks)
    .fetch_all(pool)
    .await?;

    tracing::debug!(count = taxa.len(), "Taxa loaded");
    Ok(taxa)
}

/// Vernacular names of the ecotypes of one taxon
#[tracing::instrument(skip(pool))]
pub async fn list_ecotypes(pool: &PgPool, scientific_name: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT e."vernacularName"
        FROM nofa.l_ecotype e
        JOIN nofa.l_taxon t ON e."taxonID" = t."taxonID"
        WHERE t."scientificName" = $1
        ORDER BY e."vernacularName"
        "#,
    )
    .bind(scientific_name)
    .fetch_all(pool)
    .await
}

/// Taxa grouped by family, for the taxonomic coverage selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyTree(pub BTreeMap<String, Vec<String>>);

impl FamilyTree {
    /// Group `(scientific name, family)` pairs; taxa are sorted and unique
    /// within a family
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut tree: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (scientific_name, family) in pairs {
            tree.entry(family).or_default().push(scientific_name);
        }
        for taxa in tree.values_mut() {
            taxa.sort();
            taxa.dedup();
        }
        Self(tree)
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn taxa(&self, family: &str) -> &[String] {
        self.0.get(family).map(Vec::as_slice).unwrap_or_default()
    }
}

#[tracing::instrument(skip(pool))]
pub async fn family_tree(pool: &PgPool) -> Result<FamilyTree, sqlx::Error> {
    let pairs = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT "scientificName", "family"
        FROM nofa.l_taxon
        WHERE "scientificName" IS NOT NULL
          AND "family" IS NOT NULL
        GROUP BY "scientificName", "family"
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(FamilyTree::from_pairs(pairs))
}
