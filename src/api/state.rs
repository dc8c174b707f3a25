use std::sync::Arc;

use crate::config::EngineConfig;
use crate::storage::Dataset;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub engine: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(dataset: Dataset, engine: EngineConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            engine: Arc::new(engine),
        }
    }
}
