pub mod listings;
pub mod migrations;
pub mod pool;
pub mod scout_records;
pub mod signals;
pub mod util;

// Keep re-exports unique so downstream crates see a single symbol per helper.
pub use listings::{fetch_target_subskills, ListingFetchError};
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool_from_url, create_pool_from_url_checked, DbPoolError, PgPool};
pub use scout_records::{
    fetch_shortlist, replace_shortlist, ScoutRecord, ScoutStorageError, ScoutUser,
};
pub use signals::{fetch_candidate_signals, SignalFetchError};
