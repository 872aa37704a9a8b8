pub mod app;
pub mod engine;
pub mod protocol;
pub mod state;
pub mod watcher;
