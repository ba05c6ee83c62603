use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;

/// Single-column lookup tables that feed choice fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LookupList {
    OrganismQuantityType,
    OccurrenceStatus,
    PopulationTrend,
    EstablishmentMeans,
    SamplingProtocol,
    Reliability,
    SampleSizeUnit,
    SpawningCondition,
    SpawningLocation,
}

impl LookupList {
    #[cfg(test)]
    pub const ALL: [LookupList; 9] = [
        Self::OrganismQuantityType,
        Self::OccurrenceStatus,
        Self::PopulationTrend,
        Self::EstablishmentMeans,
        Self::SamplingProtocol,
        Self::Reliability,
        Self::SampleSizeUnit,
        Self::SpawningCondition,
        Self::SpawningLocation,
    ];

    /// Value column; the table is `nofa."l_<column>"`
    pub fn column(&self) -> &'static str {
        match self {
            Self::OrganismQuantityType => "organismQuantityType",
            Self::OccurrenceStatus => "occurrenceStatus",
            Self::PopulationTrend => "populationTrend",
            Self::EstablishmentMeans => "establishmentMeans",
            Self::SamplingProtocol => "samplingProtocol",
            Self::Reliability => "reliability",
            Self::SampleSizeUnit => "sampleSizeUnit",
            Self::SpawningCondition => "spawningCondition",
            Self::SpawningLocation => "spawningLocation",
        }
    }

    fn sql(&self) -> String {
        let column = self.column();
        format!(
            r#"SELECT "{column}" FROM nofa."l_{column}" WHERE "{column}" IS NOT NULL ORDER BY "{column}""#
        )
    }
}

impl fmt::Display for LookupList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Values of one lookup table, sorted
#[tracing::instrument(skip(pool))]
pub async fn list_values(pool: &PgPool, list: LookupList) -> Result<Vec<String>, sqlx::Error> {
    let values = sqlx::query_scalar::<_, String>(&list.sql())
        .fetch_all(pool)
        .await?;

    tracing::debug!(%list, count = values.len(), "Lookup values loaded");
    Ok(values)
}
