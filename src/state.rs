use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::error;

/// Shared handle to the record store. Every write persists the whole document.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn save(&self, data: &AppData) -> Result<(), AppError> {
        persist_data(&self.data_path, data).await.inspect_err(|err| {
            error!(path = %self.data_path.display(), "failed to persist store: {}", err.message);
        })
    }
}
