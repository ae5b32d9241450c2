//! Database migration runner for Tenor.
//!
//! Usage:
//!   migrator up      - Create the lending schema and seed the loan periods
//!   migrator down    - Drop the lending schema
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-run migrations
//!
//! The connection string is read from `DATABASE_URL`.

use sea_orm_migration::prelude::*;
use tenor_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // sets up its own tracing
    cli::run_cli(Migrator).await;
}
