pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{NoPositionSource, ReplayPositionSource};
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    driver::session_handle, BoundarySession, BoundarySnapshot, CaptureDriver, CaptureEvent,
    CaptureSettings, GeoPoint,
};
pub use crate::utils::error::{BoundaryError, PositionError, Result};
