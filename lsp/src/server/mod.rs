mod analysis;
mod cli;
mod config;
mod context;
mod entry;
mod handlers;
mod state;
mod text;
mod utils;

pub use cli::analyze_file;
pub use context::{ContextInfo, PUBLISH_INFO_METHOD};
pub use entry::run;
