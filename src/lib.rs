pub mod app;
pub mod challenges;
pub mod community;
pub mod errors;
pub mod estimator;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use estimator::estimate_co2;
pub use state::AppState;
pub use stats::build_snapshot_at;
pub use storage::{load_data, resolve_data_path};
