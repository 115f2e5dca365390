pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{BitrixClient, LocalStorage, TelegramNotifier};
pub use config::AppConfig;
pub use crate::core::{etl::EtlEngine, pipeline::FnOrderPipeline};
pub use utils::error::{FnOrderError, Result};
