use crate::utils::error::{BoundaryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raw sample as delivered by the position source, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_m: f64,
    pub timestamp: DateTime<Utc>,
}

/// A validated GPS fix belonging to a boundary.
///
/// Coordinates are WGS84 degrees. `accuracy_m == 0.0` means the receiver did not
/// report an accuracy radius. Points are immutable once built; the owning session
/// assigns `order` and may set `locked`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    id: Uuid,
    latitude: f64,
    longitude: f64,
    accuracy_m: f64,
    captured_at: DateTime<Utc>,
    order: u32,
    locked: bool,
}

impl GeoPoint {
    pub fn new(
        latitude: f64,
        longitude: f64,
        accuracy_m: f64,
        captured_at: DateTime<Utc>,
    ) -> Result<Self> {
        let valid = (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
            && accuracy_m >= 0.0
            && accuracy_m.is_finite();

        if !valid {
            return Err(BoundaryError::InvalidCoordinate {
                latitude,
                longitude,
                accuracy_m,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            latitude,
            longitude,
            accuracy_m,
            captured_at,
            order: 0,
            locked: false,
        })
    }

    pub fn from_fix(fix: RawFix) -> Result<Self> {
        Self::new(fix.latitude, fix.longitude, fix.accuracy_m, fix.timestamp)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn accuracy_m(&self) -> f64 {
        self.accuracy_m
    }

    /// True when the receiver reported an accuracy radius for this fix.
    pub fn has_accuracy(&self) -> bool {
        self.accuracy_m > 0.0
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// 1-based position inside the owning session, 0 while unattached.
    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccuracyTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AccuracyTier {
    /// Bonus added to the display progress score.
    pub fn progress_bonus(self) -> f64 {
        match self {
            AccuracyTier::Excellent => 40.0,
            AccuracyTier::Good => 30.0,
            AccuracyTier::Fair => 20.0,
            AccuracyTier::Poor => 10.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccuracyTier::Excellent => "excellent",
            AccuracyTier::Good => "good",
            AccuracyTier::Fair => "fair",
            AccuracyTier::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Draft,
    Recording,
    Completed,
    /// Stamped by an external verifier, never reached through capture.
    Verified,
}

impl SessionStatus {
    pub fn is_closed(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Verified)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    Manual,
    Auto,
}

impl std::str::FromStr for CaptureMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manual" => Ok(CaptureMode::Manual),
            "auto" => Ok(CaptureMode::Auto),
            other => Err(format!("unknown capture mode '{}' (expected manual or auto)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPoint {
    pub id: Uuid,
    pub order: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub locked: bool,
}

impl From<&GeoPoint> for SnapshotPoint {
    fn from(point: &GeoPoint) -> Self {
        Self {
            id: point.id(),
            order: point.order(),
            latitude: point.latitude(),
            longitude: point.longitude(),
            accuracy_m: point.accuracy_m(),
            timestamp: point.captured_at(),
            locked: point.is_locked(),
        }
    }
}

/// Read-only view of a boundary handed to report generators and map overlays.
///
/// Consumers read area and perimeter from here instead of deriving them again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySnapshot {
    pub id: Uuid,
    pub name: String,
    pub points: Vec<SnapshotPoint>,
    pub area_hectares: f64,
    pub perimeter_m: f64,
    pub centroid: Option<Centroid>,
    pub accuracy_tier: AccuracyTier,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let now = Utc::now();
        assert!(GeoPoint::new(90.5, 0.0, 3.0, now).is_err());
        assert!(GeoPoint::new(-90.5, 0.0, 3.0, now).is_err());
        assert!(GeoPoint::new(0.0, 180.1, 3.0, now).is_err());
        assert!(GeoPoint::new(0.0, -180.1, 3.0, now).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0, 3.0, now).is_err());
        assert!(GeoPoint::new(0.0, 0.0, -1.0, now).is_err());
    }

    #[test]
    fn test_rejects_non_finite_accuracy() {
        let now = Utc::now();
        assert!(GeoPoint::new(6.43, -9.43, f64::INFINITY, now).is_err());
        assert!(GeoPoint::new(6.43, -9.43, f64::NAN, now).is_err());
        assert!(GeoPoint::new(6.43, -9.43, 1e6, now).is_ok());
    }

    #[test]
    fn test_accepts_range_limits_and_unknown_accuracy() {
        let now = Utc::now();
        let point = GeoPoint::new(-90.0, 180.0, 0.0, now).unwrap();
        assert!(!point.has_accuracy());
        assert_eq!(point.order(), 0);
        assert!(!point.is_locked());
    }

    #[test]
    fn test_capture_mode_parsing() {
        assert_eq!("AUTO".parse::<CaptureMode>(), Ok(CaptureMode::Auto));
        assert_eq!("manual".parse::<CaptureMode>(), Ok(CaptureMode::Manual));
        assert!("walk".parse::<CaptureMode>().is_err());
    }

    #[test]
    fn test_snapshot_point_serializes_timestamp_field() {
        let point = GeoPoint::new(6.428, -9.43, 4.0, Utc::now()).unwrap();
        let json = serde_json::to_value(SnapshotPoint::from(&point)).unwrap();
        assert!(json.get("timestamp").is_some());
        assert!(json.get("captured_at").is_none());
    }
}
