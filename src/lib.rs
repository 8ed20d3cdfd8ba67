//! Training Record Server Library
//!
//! Exposes the internal modules to the binaries and the end-to-end tests.

pub mod config;
pub mod server;
pub mod sqlite_persistence;
pub mod training;
pub mod training_store;

pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
pub use training::{MissingMenuPolicy, TrainingManager};
pub use training_store::{SqliteTrainingStore, TrainingStore};
