use crate::domain::model::{CaptureMode, RawFix};
use crate::utils::error::{PositionError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Environment capability that yields the current best-effort position.
///
/// `acquire`/`release` bracket a recording run so sources backed by a live
/// subscription can start and stop it; both default to no-ops.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn get_current_position(
        &self,
        timeout: Duration,
        maximum_age: Duration,
    ) -> std::result::Result<RawFix, PositionError>;

    fn acquire(&self) -> std::result::Result<(), PositionError> {
        Ok(())
    }

    fn release(&self) {}
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn session_name(&self) -> &str;
    fn min_points(&self) -> usize;
    fn max_points(&self) -> Option<usize>;
    fn capture_mode(&self) -> CaptureMode;
    fn capture_interval(&self) -> Duration;
    fn position_timeout(&self) -> Duration;
    fn maximum_age(&self) -> Duration;
    fn output_path(&self) -> &str;
}
