use crate::core::{accuracy, geodesic};
use crate::domain::model::{
    AccuracyTier, BoundarySnapshot, Centroid, GeoPoint, SessionStatus, SnapshotPoint,
};
use crate::utils::error::{BoundaryError, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Metrics derived from the current point list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryMetrics {
    pub area_hectares: f64,
    pub perimeter_m: f64,
    pub centroid: Option<Centroid>,
    pub accuracy_tier: AccuracyTier,
}

impl BoundaryMetrics {
    fn compute(points: &[GeoPoint]) -> Self {
        Self {
            area_hectares: geodesic::area_hectares(points),
            perimeter_m: geodesic::perimeter_m(points),
            centroid: geodesic::centroid(points),
            accuracy_tier: accuracy::classify(points),
        }
    }
}

/// One field boundary being captured.
///
/// Single-writer: every mutation takes `&mut self`, and metrics are recomputed
/// before the mutating call returns, so readers never see points and metrics
/// out of step. Share across tasks only behind one lock (see `SessionHandle`).
#[derive(Debug, Clone)]
pub struct BoundarySession {
    id: Uuid,
    name: String,
    points: Vec<GeoPoint>,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    metrics: BoundaryMetrics,
}

impl BoundarySession {
    pub fn create(name: impl Into<String>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            points: Vec::new(),
            status: SessionStatus::Draft,
            created_at: Utc::now(),
            completed_at: None,
            metrics: BoundaryMetrics::compute(&[]),
        };
        tracing::info!("Started boundary '{}' ({})", session.name, session.id);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn metrics(&self) -> BoundaryMetrics {
        self.metrics
    }

    pub fn area_hectares(&self) -> f64 {
        self.metrics.area_hectares
    }

    pub fn perimeter_m(&self) -> f64 {
        self.metrics.perimeter_m
    }

    pub fn centroid(&self) -> Option<Centroid> {
        self.metrics.centroid
    }

    pub fn accuracy_tier(&self) -> AccuracyTier {
        self.metrics.accuracy_tier
    }

    /// Appends a point and returns its id. Moves `Draft` to `Recording`.
    pub fn add_point(&mut self, mut point: GeoPoint) -> Result<Uuid> {
        self.ensure_open()?;

        point.set_order(self.points.len() as u32 + 1);
        let id = point.id();
        self.points.push(point);

        if self.status == SessionStatus::Draft {
            self.status = SessionStatus::Recording;
            tracing::info!("Boundary '{}' is now recording", self.name);
        }
        self.recompute();

        tracing::debug!(
            "Added point #{} to '{}': {:.4} ha, {:.1} m, {:?}",
            self.points.len(),
            self.name,
            self.metrics.area_hectares,
            self.metrics.perimeter_m,
            self.metrics.accuracy_tier
        );
        Ok(id)
    }

    /// Removes an unlocked point and renumbers the ones after it.
    ///
    /// Removing the last point keeps the session in `Recording`.
    pub fn remove_point(&mut self, id: Uuid) -> Result<GeoPoint> {
        self.ensure_open()?;

        let index = self
            .points
            .iter()
            .position(|p| p.id() == id)
            .ok_or(BoundaryError::PointNotFound(id))?;

        if self.points[index].is_locked() {
            return Err(BoundaryError::PointLocked(id));
        }

        let removed = self.points.remove(index);
        self.renumber();
        self.recompute();

        tracing::debug!(
            "Removed point #{} from '{}', {} remaining",
            removed.order(),
            self.name,
            self.points.len()
        );
        Ok(removed)
    }

    /// Marks a point as confirmed by the operator. Locked points survive until `reset`.
    pub fn lock_point(&mut self, id: Uuid) -> Result<()> {
        self.ensure_open()?;

        let point = self
            .points
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(BoundaryError::PointNotFound(id))?;
        point.lock();
        tracing::debug!("Locked point #{} in '{}'", point.order(), self.name);
        Ok(())
    }

    /// Freezes the boundary once it has at least `min_points` points.
    pub fn complete(&mut self, min_points: usize) -> Result<()> {
        self.ensure_open()?;

        if self.points.len() < min_points {
            return Err(BoundaryError::InsufficientPoints {
                required: min_points,
                actual: self.points.len(),
            });
        }

        self.status = SessionStatus::Completed;
        self.completed_at = Some(Utc::now());
        tracing::info!(
            "Completed boundary '{}': {} points, {:.4} ha, {:.1} m perimeter",
            self.name,
            self.points.len(),
            self.metrics.area_hectares,
            self.metrics.perimeter_m
        );
        Ok(())
    }

    /// Verifier stamp applied outside the capture flow. Only a completed boundary can be verified.
    pub fn mark_verified(&mut self) -> Result<()> {
        if self.status != SessionStatus::Completed {
            return Err(BoundaryError::InvalidTransition {
                from: self.status,
                to: SessionStatus::Verified,
            });
        }
        self.status = SessionStatus::Verified;
        tracing::info!("Boundary '{}' verified", self.name);
        Ok(())
    }

    /// Discards every point, locked ones included, and returns to `Draft`.
    pub fn reset(&mut self) {
        self.points.clear();
        self.status = SessionStatus::Draft;
        self.completed_at = None;
        self.recompute();
        tracing::info!("Reset boundary '{}'", self.name);
    }

    pub fn progress_percent(&self, min_points: usize) -> u8 {
        accuracy::progress_percent(self.points.len(), min_points, self.metrics.accuracy_tier)
    }

    pub fn snapshot(&self) -> BoundarySnapshot {
        BoundarySnapshot {
            id: self.id,
            name: self.name.clone(),
            points: self.points.iter().map(SnapshotPoint::from).collect(),
            area_hectares: self.metrics.area_hectares,
            perimeter_m: self.metrics.perimeter_m,
            centroid: self.metrics.centroid,
            accuracy_tier: self.metrics.accuracy_tier,
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.status.is_closed() {
            return Err(BoundaryError::SessionClosed {
                status: self.status,
            });
        }
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, point) in self.points.iter_mut().enumerate() {
            point.set_order(index as u32 + 1);
        }
    }

    fn recompute(&mut self) {
        self.metrics = BoundaryMetrics::compute(&self.points);
    }
}
