pub mod config;
pub mod document;
pub mod error;
pub mod project;
pub mod rules;
pub mod sink;
pub mod source;
pub mod wasm;
