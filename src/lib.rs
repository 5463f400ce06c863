pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::PortfolioCatalog;
pub use error::BootstrapError;
