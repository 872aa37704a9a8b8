//! Command-file protocol: line splitting, directive grammar and value encodings

pub mod directive;
pub mod media;
pub mod text;
pub mod tokenizer;

pub use directive::{Button, Directive, TextContent};
pub use tokenizer::split_commands;
