//! Language server for the Source teaching dialect of JavaScript.

pub mod analyzer;
mod server;

pub use server::{analyze_file, run, ContextInfo, PUBLISH_INFO_METHOD};
