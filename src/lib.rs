pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod media;
pub mod platform;
pub mod progress;
pub mod record;
pub mod scanner;

pub use catalog::{CatalogEntry, RadarrClient, RemoteCatalog};
pub use config::AppConfig;
pub use engine::{ReconcileEngine, ReconcileSummary};
pub use error::Error;
pub use media::{MediaFile, VideoContainer};
pub use progress::{ProgressReporter, SilentReporter};
pub use record::ReconciliationRecord;
