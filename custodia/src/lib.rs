pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod observability;
pub mod util;

pub use error::{Error, Result};
