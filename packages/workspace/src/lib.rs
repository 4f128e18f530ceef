//! # Workspace
//!
//! Everything between the file system and the pure sync engine: project
//! configuration, the persisted canvas document, the change orchestrator,
//! file watching and the canvas → CSS entry point.

pub mod config;
pub mod error;
pub mod filter;
pub mod generate;
pub mod observer;
pub mod orchestrator;
pub mod session;
pub mod store;
pub mod watcher;

pub use config::{SyncConfig, CONFIG_FILE_NAME};
pub use error::{WorkspaceError, WorkspaceResult};
pub use filter::PathFilter;
pub use generate::generate_from_canvas;
pub use observer::{ChangeDescriptor, ChangeType, Observer, ObserverId, Observers};
pub use orchestrator::ChangeOrchestrator;
pub use session::SyncSession;
pub use store::DocumentStore;
pub use watcher::FileWatcher;
