pub mod classifier;
pub mod config;
pub mod correct;
pub mod discover;
pub mod error;
pub mod frontmatter;
pub mod io;
pub mod paths;
pub mod process;
pub mod repair;
pub mod rewrite;
pub mod types;
pub mod validate;

pub use error::{DssError, Result};
