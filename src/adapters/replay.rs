use crate::domain::model::RawFix;
use crate::domain::ports::PositionSource;
use crate::utils::error::{BoundaryError, PositionError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Serves recorded fixes in order, then reports `NoSignal`.
///
/// A fix older than the requested maximum age is skipped, mirroring a receiver
/// that refuses cached positions. A zero maximum age accepts anything.
#[derive(Debug)]
pub struct ReplayPositionSource {
    fixes: Mutex<VecDeque<RawFix>>,
    subscribed: AtomicBool,
    check_age: bool,
}

impl ReplayPositionSource {
    pub fn new(fixes: Vec<RawFix>) -> Self {
        Self {
            fixes: Mutex::new(fixes.into()),
            subscribed: AtomicBool::new(false),
            check_age: false,
        }
    }

    /// Enforces the maximum age against wall-clock time. Off by default since
    /// recorded tracks are usually older than any sensible maximum age.
    pub fn with_age_check(mut self) -> Self {
        self.check_age = true;
        self
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let fixes: Vec<RawFix> = serde_json::from_slice(data)?;
        tracing::debug!("Loaded {} recorded fixes", fixes.len());
        Ok(Self::new(fixes))
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read(path.as_ref())
            .await
            .map_err(BoundaryError::IoError)?;
        Self::from_json(&data)
    }

    pub fn remaining(&self) -> usize {
        self.fixes.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PositionSource for ReplayPositionSource {
    async fn get_current_position(
        &self,
        _timeout: Duration,
        maximum_age: Duration,
    ) -> std::result::Result<RawFix, PositionError> {
        let mut fixes = self
            .fixes
            .lock()
            .map_err(|_| PositionError::Other("replay buffer poisoned".to_string()))?;

        while let Some(fix) = fixes.pop_front() {
            if self.check_age && !maximum_age.is_zero() {
                let age = (Utc::now() - fix.timestamp).to_std().unwrap_or(Duration::ZERO);
                if age > maximum_age {
                    tracing::debug!("Skipping stale fix ({:?} old)", age);
                    continue;
                }
            }
            return Ok(fix);
        }
        Err(PositionError::NoSignal)
    }

    fn acquire(&self) -> std::result::Result<(), PositionError> {
        self.subscribed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) {
        self.subscribed.store(false, Ordering::SeqCst);
    }
}
