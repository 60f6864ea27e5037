use std::collections::HashMap;

use deadpool_postgres::PoolError;
use tokio_postgres::Error as PgError;
use tracing::instrument;

use crate::db::util::TimedClientExt;
use crate::db::PgPool;
use crate::ranking::CandidateSignals;

#[derive(Debug, thiserror::Error)]
pub enum SignalFetchError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
}

// Matches a submission's listing when any element of the listing's skill
// groups carries one of the target sub-skills. The target set is bound as a
// text[] parameter; sub-skill names never enter the SQL text.
//
// Staged on purpose: `earnings` sums each qualifying submission's reward
// exactly once (membership tested via EXISTS), while `matched` unnests the
// skill groups separately for the distinct-sub-skill aggregates. A single
// flat join would fan a submission out per matched sub-skill and multiply
// its reward into the sum.
const EARNINGS_SQL: &str = "\
WITH qualifying AS ( \
    SELECT s.user_id, s.reward_usd, l.skills \
    FROM earn.submissions s \
    JOIN earn.listings l ON l.id = s.listing_id \
    WHERE s.is_winner = TRUE \
      AND EXISTS ( \
          SELECT 1 \
          FROM jsonb_array_elements(l.skills) grp, \
               jsonb_array_elements_text(grp->'subskills') sub \
          WHERE sub.value = ANY($1) \
      ) \
), \
earnings AS ( \
    SELECT user_id, COALESCE(SUM(reward_usd), 0)::float8 AS dollars_earned \
    FROM qualifying \
    GROUP BY user_id \
), \
matched AS ( \
    SELECT q.user_id, \
           COUNT(DISTINCT sub.value)::int8 AS matched_skill_count, \
           ARRAY_AGG(DISTINCT sub.value) AS matched_skills \
    FROM qualifying q, \
         jsonb_array_elements(q.skills) grp, \
         jsonb_array_elements_text(grp->'subskills') sub \
    WHERE sub.value = ANY($1) \
    GROUP BY q.user_id \
) \
SELECT e.user_id, \
       e.dollars_earned, \
       m.matched_skill_count, \
       m.matched_skills, \
       COALESCE(u.is_recommended, FALSE) AS recommended \
 FROM earnings e \
 JOIN matched m ON m.user_id = e.user_id \
 JOIN earn.users u ON u.id = e.user_id";

// Substring containment against the free-text sub-skills column, as the
// portfolio entries store comma-joined tags rather than structured JSON.
const PORTFOLIO_SQL: &str = "\
SELECT p.user_id, COUNT(*)::int8 AS portfolio_matches \
 FROM earn.portfolio_items p \
 WHERE p.user_id = ANY($2) \
   AND EXISTS ( \
       SELECT 1 FROM unnest($1::text[]) t(subskill) \
       WHERE strpos(COALESCE(p.sub_skills, ''), t.subskill) > 0 \
   ) \
 GROUP BY p.user_id";

/// Gather the candidate pool for a scouting run: every user with at least
/// one winning submission matching a target sub-skill, with their earnings
/// and matched-skill aggregates, plus portfolio match counts merged on.
#[instrument(skip(pool, target_subskills), fields(targets = target_subskills.len()))]
pub async fn fetch_candidate_signals(
    pool: &PgPool,
    target_subskills: &[String],
) -> Result<Vec<CandidateSignals>, SignalFetchError> {
    let client = pool.get().await?;

    let rows = client
        .timed_query_cached(EARNINGS_SQL, &[&target_subskills], "signals.earnings")
        .await?;

    let mut candidates: Vec<CandidateSignals> = rows
        .into_iter()
        .map(|row| CandidateSignals {
            user_id: row.get("user_id"),
            dollars_earned: row.get("dollars_earned"),
            matched_skill_count: row.get("matched_skill_count"),
            matched_skills: row.get("matched_skills"),
            portfolio_matches: None,
            recommended: row.get("recommended"),
        })
        .collect();

    if candidates.is_empty() {
        return Ok(candidates);
    }

    let user_ids: Vec<&str> = candidates.iter().map(|c| c.user_id.as_str()).collect();
    let portfolio_rows = client
        .timed_query_cached(
            PORTFOLIO_SQL,
            &[&target_subskills, &user_ids],
            "signals.portfolio",
        )
        .await?;

    let portfolio: HashMap<String, i64> = portfolio_rows
        .into_iter()
        .map(|row| (row.get("user_id"), row.get("portfolio_matches")))
        .collect();

    for candidate in &mut candidates {
        candidate.portfolio_matches = portfolio.get(&candidate.user_id).copied();
    }

    Ok(candidates)
}
