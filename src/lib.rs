pub mod annotate;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod recipe;
pub mod vocab;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use recipe::{build_recipe, Recipe};
