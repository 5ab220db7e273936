use boundary_capture::core::{AccuracyTier, SessionStatus};
use boundary_capture::{BoundaryError, BoundarySession, GeoPoint};
use chrono::Utc;
use tokio_test::{assert_err, assert_ok};

fn point(lat: f64, lon: f64, accuracy_m: f64) -> GeoPoint {
    GeoPoint::new(lat, lon, accuracy_m, Utc::now()).unwrap()
}

fn assert_contiguous(session: &BoundarySession) {
    let orders: Vec<u32> = session.points().iter().map(|p| p.order()).collect();
    let expected: Vec<u32> = (1..=session.len() as u32).collect();
    assert_eq!(orders, expected);
}

/// Irregular field, roughly 1.4 ha, walked clockwise.
fn field() -> Vec<(f64, f64)> {
    vec![
        (6.4280, -9.4300),
        (6.4282, -9.4290),
        (6.4287, -9.4286),
        (6.4293, -9.4291),
        (6.4291, -9.4299),
        (6.4286, -9.4303),
    ]
}

#[test]
fn test_liberia_square_scenario() {
    let mut session = BoundarySession::create("square");
    for (lat, lon) in [
        (6.4280, -9.4300),
        (6.4280, -9.4291),
        (6.4289, -9.4291),
        (6.4289, -9.4300),
    ] {
        assert_ok!(session.add_point(point(lat, lon, 4.0)));
    }

    assert!((session.area_hectares() - 1.0).abs() <= 0.1);
    assert!((session.perimeter_m() - 400.0).abs() <= 10.0);
    assert_eq!(session.accuracy_tier(), AccuracyTier::Good);
}

#[test]
fn test_single_poor_fix_scenario() {
    let mut session = BoundarySession::create("one fix");
    assert_ok!(session.add_point(point(6.43, -9.43, 50.0)));
    assert_eq!(session.accuracy_tier(), AccuracyTier::Poor);
    assert_eq!(session.status(), SessionStatus::Recording);
    assert_eq!(session.area_hectares(), 0.0);
    assert_eq!(session.perimeter_m(), 0.0);
}

#[test]
fn test_reversed_walk_gives_same_area() {
    let mut clockwise = BoundarySession::create("cw");
    let mut counter = BoundarySession::create("ccw");
    for &(lat, lon) in &field() {
        clockwise.add_point(point(lat, lon, 3.0)).unwrap();
    }
    for &(lat, lon) in field().iter().rev() {
        counter.add_point(point(lat, lon, 3.0)).unwrap();
    }

    assert!(clockwise.area_hectares() > 0.0);
    assert!((clockwise.area_hectares() - counter.area_hectares()).abs() < 1e-9);
    assert!((clockwise.perimeter_m() - counter.perimeter_m()).abs() < 1e-6);
}

#[test]
fn test_orders_stay_contiguous_through_edits() {
    let mut session = BoundarySession::create("edits");
    let mut ids = Vec::new();
    for &(lat, lon) in &field() {
        ids.push(session.add_point(point(lat, lon, 3.0)).unwrap());
        assert_contiguous(&session);
    }

    // Remove from the middle, the front and the back, interleaved with adds.
    for index in [3usize, 0, 3] {
        let id = session.points()[index].id();
        session.remove_point(id).unwrap();
        assert_contiguous(&session);
        session.add_point(point(6.4285, -9.4295, 2.0)).unwrap();
        assert_contiguous(&session);
    }

    while let Some(last) = session.points().last().map(|p| p.id()) {
        session.remove_point(last).unwrap();
        assert_contiguous(&session);
    }
    assert_eq!(session.status(), SessionStatus::Recording);
}

#[test]
fn test_add_remove_round_trip_restores_every_metric() {
    let mut session = BoundarySession::create("round trip");
    for &(lat, lon) in &field() {
        session.add_point(point(lat, lon, 6.0)).unwrap();
    }
    let before = session.metrics();

    for accuracy in [0.0, 1.0, 25.0] {
        let id = session.add_point(point(6.4300, -9.4310, accuracy)).unwrap();
        session.remove_point(id).unwrap();
        assert_eq!(session.metrics(), before);
    }
}

#[test]
fn test_early_complete_leaves_state_unchanged() {
    let mut session = BoundarySession::create("early");
    session.add_point(point(6.428, -9.43, 3.0)).unwrap();
    let before = session.snapshot();

    let err = assert_err!(session.complete(4));
    assert!(matches!(err, BoundaryError::InsufficientPoints { required: 4, actual: 1 }));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_reset_completed_session() {
    let mut session = BoundarySession::create("reset me");
    for &(lat, lon) in &field() {
        session.add_point(point(lat, lon, 3.0)).unwrap();
    }
    let first = session.points()[0].id();
    session.lock_point(first).unwrap();
    assert_ok!(session.complete(4));

    session.reset();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, SessionStatus::Draft);
    assert!(snapshot.points.is_empty());
    assert!(snapshot.completed_at.is_none());
    assert!(snapshot.centroid.is_none());

    assert_ok!(session.add_point(point(6.428, -9.43, 3.0)));
    assert_eq!(session.status(), SessionStatus::Recording);
}

#[test]
fn test_invalid_fix_never_reaches_session() {
    let now = Utc::now();
    let err = assert_err!(GeoPoint::new(91.0, -9.43, 3.0, now));
    assert!(matches!(err, BoundaryError::InvalidCoordinate { .. }));
    assert_err!(GeoPoint::new(6.43, 181.0, 3.0, now));
    assert_err!(GeoPoint::new(6.43, -9.43, -0.5, now));
}
