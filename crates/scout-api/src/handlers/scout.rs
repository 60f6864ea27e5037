use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use scout_common::db::{
    fetch_candidate_signals, fetch_shortlist, fetch_target_subskills, replace_shortlist,
    ScoutRecord,
};
use scout_common::ranking::rank_candidates;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::SharedState;

/// Run a scouting pass for one listing: gather signals, score and rank the
/// candidate pool, replace the persisted shortlist, and return it.
///
/// An empty candidate pool is not an error; the run commits an empty
/// replacement set and returns an empty array.
pub async fn run_scout(
    State(state): State<SharedState>,
    Path(listing_id): Path<String>,
    _auth: AuthUser,
) -> Result<Json<Vec<ScoutRecord>>, ApiError> {
    let targets = fetch_target_subskills(&state.pool, &listing_id).await?;

    let signals = fetch_candidate_signals(&state.pool, &targets).await?;
    let ranked = rank_candidates(&signals);

    replace_shortlist(&state.pool, &listing_id, &ranked).await?;
    let records = fetch_shortlist(&state.pool, &listing_id).await?;

    info!(
        listing_id,
        targets = targets.len(),
        pool = signals.len(),
        shortlisted = records.len(),
        "scout run complete"
    );

    Ok(Json(records))
}

/// Read the currently persisted shortlist without recomputing.
pub async fn get_shortlist(
    State(state): State<SharedState>,
    Path(listing_id): Path<String>,
    _auth: AuthUser,
) -> Result<Json<Vec<ScoutRecord>>, ApiError> {
    let records = fetch_shortlist(&state.pool, &listing_id).await?;
    Ok(Json(records))
}
