pub mod blend;
pub mod error;
pub mod metrics;
pub mod routes;
#[cfg(feature = "test-utils")]
pub mod testutil;
pub mod user_store;

pub use error::{Result, SearchError};
pub use routes::{build_router, AppState};
pub use user_store::UserProfileStore;
