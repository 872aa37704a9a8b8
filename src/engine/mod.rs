//! Directive handlers and the command processor that drives them

pub mod handlers;
pub mod processor;

pub use processor::CommandProcessor;
