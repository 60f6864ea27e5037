use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::PgPool;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to run migration: {0}")]
    Postgres(#[from] PgError),
}

struct Migration {
    id: i32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: 1,
        description: "scout_records table for persisted shortlists",
        sql: r#"
CREATE SCHEMA IF NOT EXISTS earn;

CREATE TABLE IF NOT EXISTS earn.scout_records (
    id UUID PRIMARY KEY,
    user_id TEXT NOT NULL,
    listing_id TEXT NOT NULL,
    dollars_earned DOUBLE PRECISION NOT NULL DEFAULT 0,
    score DOUBLE PRECISION NOT NULL,
    skills TEXT[] NOT NULL DEFAULT '{}',
    invited BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_scout_records_listing_user UNIQUE (listing_id, user_id),
    CONSTRAINT chk_scout_records_score_range CHECK (score >= 0.0 AND score <= 10.0)
);

CREATE INDEX IF NOT EXISTS idx_scout_records_listing_score
    ON earn.scout_records (listing_id, score DESC);
"#,
    },
    Migration {
        id: 2,
        description: "supporting indexes on submissions and portfolio matching columns",
        sql: r#"
DO $$
BEGIN
    IF EXISTS (
        SELECT 1 FROM information_schema.tables
        WHERE table_schema = 'earn' AND table_name = 'submissions'
    ) THEN
        CREATE INDEX IF NOT EXISTS idx_submissions_winner_user
            ON earn.submissions (user_id)
            WHERE is_winner = TRUE;
    END IF;
END $$;

DO $$
BEGIN
    IF EXISTS (
        SELECT 1 FROM information_schema.tables
        WHERE table_schema = 'earn' AND table_name = 'portfolio_items'
    ) THEN
        CREATE INDEX IF NOT EXISTS idx_portfolio_items_user
            ON earn.portfolio_items (user_id);
    END IF;
END $$;
"#,
    },
];

#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let mut client = pool.get().await?;
    client
        .batch_execute(
            "CREATE SCHEMA IF NOT EXISTS earn;
             CREATE TABLE IF NOT EXISTS earn.schema_migrations (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
             );",
        )
        .await?;

    for migration in MIGRATIONS {
        let already_applied: bool = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM earn.schema_migrations WHERE id = $1)",
                &[&migration.id],
            )
            .await?
            .get(0);

        if already_applied {
            continue;
        }

        let tx = client.transaction().await?;
        tx.batch_execute(migration.sql).await?;
        tx.execute(
            "INSERT INTO earn.schema_migrations (id, description) VALUES ($1, $2)",
            &[&migration.id, &migration.description],
        )
        .await?;
        tx.commit().await?;

        info!(
            id = migration.id,
            description = migration.description,
            "applied migration"
        );
    }

    Ok(())
}
