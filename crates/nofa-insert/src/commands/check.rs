//! `nofa-insert check` and `nofa-insert migrate`

use colored::Colorize;

use crate::config::Config;
use crate::db;
use crate::error::Result;

/// Connect and confirm the NOFA tables are present
pub async fn run(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    db::check_nofa_tables(&pool).await?;

    println!("{} Connected; NOFA schema found", "✓".green());
    let nearest = match config.submission.nearest_max_distance {
        Some(distance) => format!("{distance} m"),
        None => "unbounded".to_string(),
    };
    println!("  {:<16} {}", "Username:", config.submission.username);
    println!("  {:<16} {}", "Test mode:", config.submission.test_mode);
    println!("  {:<16} {}", "Storage SRID:", config.submission.storage_srid);
    println!("  {:<16} {}", "Nearest within:", nearest);
    Ok(())
}

/// Apply the bundled migrations
pub async fn migrate(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    db::run_migrations(&pool).await?;

    println!("{} Migrations applied", "✓".green());
    Ok(())
}
