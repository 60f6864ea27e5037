use chrono::{DateTime, Utc};
use deadpool_postgres::PoolError;
use serde::Serialize;
use tokio_postgres::Error as PgError;
use tracing::instrument;
use uuid::Uuid;

use crate::db::util::TimedClientExt;
use crate::db::PgPool;
use crate::ranking::RankedCandidate;

#[derive(Debug, thiserror::Error)]
pub enum ScoutStorageError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
}

/// A persisted shortlist row joined with its user, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ScoutRecord {
    pub id: Uuid,
    pub user_id: String,
    pub listing_id: String,
    pub dollars_earned: f64,
    pub score: f64,
    pub skills: Vec<String>,
    pub invited: bool,
    pub created_at: DateTime<Utc>,
    pub user: ScoutUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoutUser {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub is_recommended: bool,
}

/// Replace the persisted shortlist for one listing with a freshly ranked
/// batch.
///
/// Delete and insert run in one transaction, serialized per listing by a
/// Postgres advisory transaction lock, so a rerun fully supersedes the prior
/// batch and two concurrent runs for the same listing cannot interleave.
#[instrument(skip(pool, ranked), fields(candidates = ranked.len()))]
pub async fn replace_shortlist(
    pool: &PgPool,
    listing_id: &str,
    ranked: &[RankedCandidate],
) -> Result<(), ScoutStorageError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    tx.execute(
        "SELECT pg_advisory_xact_lock(hashtext($1))",
        &[&listing_id],
    )
    .await?;

    tx.timed_execute_cached(
        "DELETE FROM earn.scout_records WHERE listing_id = $1",
        &[&listing_id],
        "scout_records.clear",
    )
    .await?;

    let stmt = tx
        .prepare_cached(
            "INSERT INTO earn.scout_records ( \
                id, user_id, listing_id, dollars_earned, score, skills, invited, created_at \
            ) VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW())",
        )
        .await?;

    for candidate in ranked {
        let id = Uuid::new_v4();
        tx.execute(
            &stmt,
            &[
                &id,
                &candidate.user_id,
                &listing_id,
                &candidate.dollars_earned,
                &candidate.score,
                &candidate.matched_skills,
            ],
        )
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Fetch the persisted shortlist for a listing, joined with user rows,
/// ordered by descending score.
#[instrument(skip(pool))]
pub async fn fetch_shortlist(
    pool: &PgPool,
    listing_id: &str,
) -> Result<Vec<ScoutRecord>, ScoutStorageError> {
    let client = pool.get().await?;

    let rows = client
        .timed_query_cached(
            "SELECT sr.id, \
                    sr.user_id, \
                    sr.listing_id, \
                    sr.dollars_earned, \
                    sr.score, \
                    sr.skills, \
                    sr.invited, \
                    sr.created_at, \
                    u.username, \
                    u.first_name, \
                    u.last_name, \
                    u.photo_url, \
                    COALESCE(u.is_recommended, FALSE) AS is_recommended \
             FROM earn.scout_records sr \
             JOIN earn.users u ON u.id = sr.user_id \
             WHERE sr.listing_id = $1 \
             ORDER BY sr.score DESC, sr.created_at ASC",
            &[&listing_id],
            "scout_records.fetch",
        )
        .await?;

    let records = rows
        .into_iter()
        .map(|row| {
            let user_id: String = row.get("user_id");
            ScoutRecord {
                id: row.get("id"),
                user_id: user_id.clone(),
                listing_id: row.get("listing_id"),
                dollars_earned: row.get("dollars_earned"),
                score: row.get("score"),
                skills: row.get("skills"),
                invited: row.get("invited"),
                created_at: row.get("created_at"),
                user: ScoutUser {
                    id: user_id,
                    username: row.get("username"),
                    first_name: row.get("first_name"),
                    last_name: row.get("last_name"),
                    photo_url: row.get("photo_url"),
                    is_recommended: row.get("is_recommended"),
                },
            }
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scout_record_serializes_with_embedded_user() {
        let record = ScoutRecord {
            id: Uuid::nil(),
            user_id: "user-1".into(),
            listing_id: "listing-1".into(),
            dollars_earned: 500.0,
            score: 7.5,
            skills: vec!["React".into()],
            invited: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            user: ScoutUser {
                id: "user-1".into(),
                username: Some("ada".into()),
                first_name: None,
                last_name: None,
                photo_url: None,
                is_recommended: true,
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["user"]["username"], "ada");
        assert_eq!(json["invited"], false);
        assert_eq!(json["score"], 7.5);
    }
}
