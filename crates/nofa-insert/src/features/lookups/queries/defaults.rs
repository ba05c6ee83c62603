use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Pre-selected values for the mandatory occurrence choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceDefaults {
    pub occurrence_status: Option<String>,
    pub establishment_means: Option<String>,
}

/// Text literal of a column default expression
///
/// `'present'::text` gives `present`; doubled quotes inside the literal are
/// unescaped. Expressions without a literal, such as `now()`, give `None`.
pub fn literal_default(expression: &str) -> Option<String> {
    let start = expression.find('\'')? + 1;
    let mut literal = String::new();
    let mut chars = expression[start..].chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                literal.push('\'');
            } else {
                return Some(literal);
            }
        } else {
            literal.push(c);
        }
    }
    None
}

/// Raw default expression of a column, as stored in `information_schema`
#[tracing::instrument(skip(pool))]
pub async fn column_default(
    pool: &PgPool,
    schema: &str,
    table: &str,
    column: &str,
) -> Result<Option<String>, sqlx::Error> {
    let expression = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT column_default
        FROM information_schema.columns
        WHERE table_schema = $1
          AND table_name = $2
          AND column_name = $3
        "#,
    )
    .bind(schema)
    .bind(table)
    .bind(column)
    .fetch_optional(pool)
    .await?;

    Ok(expression.flatten())
}

#[tracing::instrument(skip(pool))]
pub async fn occurrence_defaults(pool: &PgPool) -> Result<OccurrenceDefaults, sqlx::Error> {
    let literal = |expression: Option<String>| expression.as_deref().and_then(literal_default);

    Ok(OccurrenceDefaults {
        occurrence_status: literal(
            column_default(pool, "nofa", "occurrence", "occurrenceStatus").await?,
        ),
        establishment_means: literal(
            column_default(pool, "nofa", "occurrence", "establishmentMeans").await?,
        ),
    })
}
