use crate::training::TrainingManager;
use std::sync::Arc;

use super::ServerConfig;

pub type GuardedTrainingManager = Arc<TrainingManager>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub training_manager: GuardedTrainingManager,
}

impl ServerState {
    pub fn new(config: ServerConfig, training_manager: TrainingManager) -> Self {
        ServerState {
            config,
            training_manager: Arc::new(training_manager),
        }
    }
}
