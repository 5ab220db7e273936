// Adapters layer: concrete position sources. Storage and config adapters live under src/config.

pub mod replay;

pub use replay::ReplayPositionSource;

use crate::domain::model::RawFix;
use crate::domain::ports::PositionSource;
use crate::utils::error::PositionError;
use async_trait::async_trait;
use std::time::Duration;

/// Stands in when the device exposes no location capability at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPositionSource;

#[async_trait]
impl PositionSource for NoPositionSource {
    async fn get_current_position(
        &self,
        _timeout: Duration,
        _maximum_age: Duration,
    ) -> Result<RawFix, PositionError> {
        Err(PositionError::Unsupported)
    }

    fn acquire(&self) -> Result<(), PositionError> {
        Err(PositionError::Unsupported)
    }
}
