pub mod accuracy;
pub mod driver;
pub mod export;
pub mod geodesic;
pub mod session;

pub use crate::domain::model::{
    AccuracyTier, BoundarySnapshot, CaptureMode, Centroid, GeoPoint, RawFix, SessionStatus,
    SnapshotPoint,
};
pub use crate::domain::ports::{ConfigProvider, PositionSource, Storage};
pub use crate::utils::error::Result;
pub use driver::{CaptureDriver, CaptureEvent, CaptureSettings, DriverState, SessionHandle};
pub use session::{BoundaryMetrics, BoundarySession};
