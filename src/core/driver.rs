//! Capture driver: turns a position source into boundary mutations. The timer
//! task and the source subscription are held by guards that release on drop.

use crate::core::session::BoundarySession;
use crate::domain::model::{AccuracyTier, CaptureMode, GeoPoint};
use crate::domain::ports::{ConfigProvider, PositionSource};
use crate::utils::error::{BoundaryError, PositionError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// The one coordinating owner of a session shared between a driver and the UI.
pub type SessionHandle = Arc<Mutex<BoundarySession>>;

pub fn session_handle(session: BoundarySession) -> SessionHandle {
    Arc::new(Mutex::new(session))
}

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);
pub const MAX_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    pub mode: CaptureMode,
    pub interval: Duration,
    pub position_timeout: Duration,
    pub maximum_age: Duration,
    pub max_points: Option<usize>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            mode: CaptureMode::Manual,
            interval: DEFAULT_INTERVAL,
            position_timeout: DEFAULT_POSITION_TIMEOUT,
            maximum_age: Duration::ZERO,
            max_points: None,
        }
    }
}

impl CaptureSettings {
    pub fn manual() -> Self {
        Self::default()
    }

    pub fn auto(interval: Duration) -> Result<Self> {
        let settings = Self {
            mode: CaptureMode::Auto,
            interval,
            ..Self::default()
        };
        settings.check_interval()?;
        Ok(settings)
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let settings = Self {
            mode: config.capture_mode(),
            interval: config.capture_interval(),
            position_timeout: config.position_timeout(),
            maximum_age: config.maximum_age(),
            max_points: config.max_points(),
        };
        settings.check_interval()?;
        Ok(settings)
    }

    fn check_interval(&self) -> Result<()> {
        if self.interval < MIN_INTERVAL || self.interval > MAX_INTERVAL {
            return Err(BoundaryError::InvalidConfigValueError {
                field: "capture.interval".to_string(),
                value: format!("{:?}", self.interval),
                reason: format!(
                    "interval must be between {}s and {}s",
                    MIN_INTERVAL.as_secs(),
                    MAX_INTERVAL.as_secs()
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Ready,
    Recording,
    Paused,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    PointCaptured {
        point_id: Uuid,
        order: u32,
        area_hectares: f64,
        perimeter_m: f64,
        accuracy_tier: AccuracyTier,
    },
    PositionUnavailable(PositionError),
    Rejected { reason: String },
    LimitReached { max_points: usize },
}

struct SourceSubscription<P: PositionSource> {
    source: Arc<P>,
}

impl<P: PositionSource> SourceSubscription<P> {
    fn acquire(source: Arc<P>) -> std::result::Result<Self, PositionError> {
        source.acquire()?;
        Ok(Self { source })
    }
}

impl<P: PositionSource> Drop for SourceSubscription<P> {
    fn drop(&mut self) {
        self.source.release();
        tracing::debug!("Position source released");
    }
}

/// Owns the auto-capture task; dropping it aborts the task.
struct AutoCaptureTimer {
    handle: Option<JoinHandle<()>>,
}

impl AutoCaptureTimer {
    fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    async fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for AutoCaptureTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub struct CaptureDriver<P: PositionSource + 'static> {
    source: Arc<P>,
    session: SessionHandle,
    settings: CaptureSettings,
    events: mpsc::UnboundedSender<CaptureEvent>,
    state: DriverState,
    // Field order matters: the timer is torn down before the source is released.
    timer: Option<AutoCaptureTimer>,
    subscription: Option<SourceSubscription<P>>,
}

impl<P: PositionSource + 'static> CaptureDriver<P> {
    pub fn new(
        source: Arc<P>,
        session: SessionHandle,
        settings: CaptureSettings,
    ) -> (Self, mpsc::UnboundedReceiver<CaptureEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let driver = Self {
            source,
            session,
            settings,
            events,
            state: DriverState::Ready,
            timer: None,
            subscription: None,
        };
        (driver, receiver)
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn session(&self) -> SessionHandle {
        Arc::clone(&self.session)
    }

    /// Begins (or resumes) recording. No-op while already recording, unless
    /// the auto-capture task has ended on its own (closed session, point limit).
    pub async fn start(&mut self) -> Result<()> {
        if self.state == DriverState::Recording && !self.auto_task_ended() {
            return Ok(());
        }

        {
            let session = self.session.lock().await;
            if session.status().is_closed() {
                return Err(BoundaryError::SessionClosed {
                    status: session.status(),
                });
            }
        }

        if self.subscription.is_none() {
            match SourceSubscription::acquire(Arc::clone(&self.source)) {
                Ok(subscription) => self.subscription = Some(subscription),
                Err(e) => {
                    tracing::warn!("Could not acquire position source: {}", e);
                    let _ = self.events.send(CaptureEvent::PositionUnavailable(e.clone()));
                    return Err(e.into());
                }
            }
        }

        if self.settings.mode == CaptureMode::Auto {
            self.timer = Some(self.spawn_timer());
            tracing::info!(
                "Auto capture started, one fix every {:?}",
                self.settings.interval
            );
        } else {
            tracing::info!("Manual capture started");
        }

        self.state = DriverState::Recording;
        Ok(())
    }

    pub async fn pause(&mut self) {
        if self.state != DriverState::Recording {
            return;
        }
        if let Some(timer) = self.timer.take() {
            timer.cancel().await;
        }
        self.state = DriverState::Paused;
        tracing::info!("Capture paused");
    }

    pub async fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel().await;
        }
        self.subscription = None;
        if self.state != DriverState::Ready {
            tracing::info!("Capture stopped");
        }
        self.state = DriverState::Ready;
    }

    pub async fn capture_now(&self) -> Result<Uuid> {
        if self.state != DriverState::Recording {
            return Err(BoundaryError::CaptureNotStarted);
        }
        capture_once(&*self.source, &self.session, &self.settings, &self.events).await
    }

    fn auto_task_ended(&self) -> bool {
        self.settings.mode == CaptureMode::Auto
            && self.timer.as_ref().map_or(true, AutoCaptureTimer::is_finished)
    }

    fn spawn_timer(&self) -> AutoCaptureTimer {
        let source = Arc::clone(&self.source);
        let session = Arc::clone(&self.session);
        let settings = self.settings.clone();
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(settings.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match capture_once(&*source, &session, &settings, &events).await {
                    Err(BoundaryError::SessionClosed { status }) => {
                        tracing::info!("Session is {:?}, auto capture ends", status);
                        break;
                    }
                    Err(BoundaryError::PointLimitReached { max_points }) => {
                        tracing::info!("Reached {} points, auto capture ends", max_points);
                        break;
                    }
                    Err(e) => tracing::debug!("Auto capture tick failed: {}", e),
                    Ok(_) => {}
                }
            }
        });

        AutoCaptureTimer {
            handle: Some(handle),
        }
    }
}

async fn capture_once<P: PositionSource + ?Sized>(
    source: &P,
    session: &SessionHandle,
    settings: &CaptureSettings,
    events: &mpsc::UnboundedSender<CaptureEvent>,
) -> Result<Uuid> {
    // No sensor request for a point that could not be stored.
    check_capacity(&*session.lock().await, settings, events)?;

    let request = source.get_current_position(settings.position_timeout, settings.maximum_age);
    let fix = match tokio::time::timeout(settings.position_timeout, request).await {
        Ok(Ok(fix)) => fix,
        Ok(Err(e)) => return Err(report_unavailable(events, e)),
        Err(_) => return Err(report_unavailable(events, PositionError::Timeout)),
    };

    let point = match GeoPoint::from_fix(fix) {
        Ok(point) => point,
        Err(e) => return Err(report_rejected(events, e)),
    };

    let mut session = session.lock().await;
    check_capacity(&session, settings, events)?;

    let point_id = match session.add_point(point) {
        Ok(id) => id,
        Err(e) => return Err(report_rejected(events, e)),
    };

    let metrics = session.metrics();
    let _ = events.send(CaptureEvent::PointCaptured {
        point_id,
        order: session.len() as u32,
        area_hectares: metrics.area_hectares,
        perimeter_m: metrics.perimeter_m,
        accuracy_tier: metrics.accuracy_tier,
    });
    Ok(point_id)
}

fn check_capacity(
    session: &BoundarySession,
    settings: &CaptureSettings,
    events: &mpsc::UnboundedSender<CaptureEvent>,
) -> Result<()> {
    if session.status().is_closed() {
        return Err(report_rejected(
            events,
            BoundaryError::SessionClosed {
                status: session.status(),
            },
        ));
    }
    if let Some(max_points) = settings.max_points {
        if session.len() >= max_points {
            let _ = events.send(CaptureEvent::LimitReached { max_points });
            return Err(BoundaryError::PointLimitReached { max_points });
        }
    }
    Ok(())
}

fn report_unavailable(
    events: &mpsc::UnboundedSender<CaptureEvent>,
    error: PositionError,
) -> BoundaryError {
    tracing::warn!("Position unavailable: {}", error);
    let _ = events.send(CaptureEvent::PositionUnavailable(error.clone()));
    BoundaryError::PositionUnavailable(error)
}

fn report_rejected(
    events: &mpsc::UnboundedSender<CaptureEvent>,
    error: BoundaryError,
) -> BoundaryError {
    tracing::warn!("Fix rejected: {}", error);
    let _ = events.send(CaptureEvent::Rejected {
        reason: error.to_string(),
    });
    error
}
