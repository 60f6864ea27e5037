use deadpool_postgres::PoolError;
use serde_json::Value;
use tokio_postgres::Error as PgError;
use tracing::instrument;

use crate::db::util::TimedClientExt;
use crate::db::PgPool;
use crate::skills::{self, SkillParseError};

#[derive(Debug, thiserror::Error)]
pub enum ListingFetchError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    /// The listing does not exist, its skill data is malformed, or the
    /// flattened sub-skill set is empty. Callers surface this as 404.
    #[error("listing {0} has no skills")]
    NoSkills(String),
}

/// Load a listing's skill groups and flatten them into the target sub-skill
/// set used as the matching key for a scouting run.
#[instrument(skip(pool))]
pub async fn fetch_target_subskills(
    pool: &PgPool,
    listing_id: &str,
) -> Result<Vec<String>, ListingFetchError> {
    let client = pool.get().await?;

    let row = client
        .timed_query_opt_cached(
            "SELECT skills FROM earn.listings WHERE id = $1",
            &[&listing_id],
            "listings.fetch_skills",
        )
        .await?
        .ok_or_else(|| ListingFetchError::NoSkills(listing_id.to_string()))?;

    let raw: Option<Value> = row.get("skills");
    let raw = raw.ok_or_else(|| ListingFetchError::NoSkills(listing_id.to_string()))?;

    let groups = skills::parse_skill_groups(&raw).map_err(|err: SkillParseError| {
        tracing::warn!(listing_id, error = %err, "listing skill data is malformed");
        ListingFetchError::NoSkills(listing_id.to_string())
    })?;

    let targets = skills::target_subskills(&groups);
    if targets.is_empty() {
        return Err(ListingFetchError::NoSkills(listing_id.to_string()));
    }

    Ok(targets)
}
