//! Datasets, projects and references events can be attached to

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DatasetItem {
    pub dataset_id: String,
    pub dataset_name: Option<String>,
}

impl fmt::Display for DatasetItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dataset_name {
            Some(name) => write!(f, "{} - {name}", self.dataset_id),
            None => f.write_str(&self.dataset_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectItem {
    pub project_id: String,
    pub project_name: Option<String>,
    pub organisation: Option<String>,
}

impl fmt::Display for ProjectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.project_name.as_deref().unwrap_or("?"),
            self.organisation.as_deref().unwrap_or("?"),
            self.project_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReferenceItem {
    pub reference_id: i32,
    pub author: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
}

impl fmt::Display for ReferenceItem {
    /// `<author>: <title> (<year>) @<id>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (",
            self.author.as_deref().unwrap_or("?"),
            self.title.as_deref().unwrap_or("?")
        )?;
        match self.year {
            Some(year) => write!(f, "{year}")?,
            None => f.write_str("n.d.")?,
        }
        write!(f, ") @{}", self.reference_id)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn list_datasets(pool: &PgPool) -> Result<Vec<DatasetItem>, sqlx::Error> {
    sqlx::query_as::<_, DatasetItem>(
        r#"
        SELECT "datasetID" AS dataset_id, "datasetName" AS dataset_name
        FROM nofa.m_dataset
        ORDER BY "datasetID", "datasetName"
        "#,
    )
    .fetch_all(pool)
    .await
}

#[tracing::instrument(skip(pool))]
pub async fn list_projects(pool: &PgPool) -> Result<Vec<ProjectItem>, sqlx::Error> {
    sqlx::query_as::<_, ProjectItem>(
        r#"
        SELECT "projectID"::TEXT AS project_id,
               "projectName" AS project_name,
               "organisation" AS organisation
        FROM nofa.m_project
        ORDER BY "projectName", "organisation"
        "#,
    )
    .fetch_all(pool)
    .await
}

#[tracing::instrument(skip(pool))]
pub async fn list_references(pool: &PgPool) -> Result<Vec<ReferenceItem>, sqlx::Error> {
    sqlx::query_as::<_, ReferenceItem>(
        r#"
        SELECT "referenceID" AS reference_id,
               "author" AS author,
               "titel" AS title,
               "year" AS year
        FROM nofa.m_reference
        ORDER BY "author", "titel"
        "#,
    )
    .fetch_all(pool)
    .await
}
