pub mod ai;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod query;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{LifelogError, Result};
pub use storage::JsonStore;
