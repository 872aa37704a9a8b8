pub mod config;
pub mod events;

pub use config::{Config, WatcherConfig};
pub use events::{Effect, EngineEvent, OutputRecord, EXIT_CODE_COMMAND_QUIT};
