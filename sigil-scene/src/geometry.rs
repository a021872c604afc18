//! Pure vertex geometry for the polygon and star factories.
//!
//! All point lists are produced relative to the shape's geometric center,
//! which is also the object's anchor: moves and scales operate around the
//! centroid, while hand-placed primitives (rectangle, circle) anchor at
//! top-left. Keeping that split is deliberate for visual parity with the
//! rest of the scene.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 2D point in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from the origin.
    pub fn radius(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Angle from the positive x axis, in radians.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

/// Errors for degenerate factory parameters.
///
/// The factories reject rather than degrade: a polygon with fewer than
/// three sides or a star with inner radius beyond the outer one is a
/// caller mistake we refuse to draw.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 sides, got {sides}")]
    TooFewSides { sides: u32 },

    #[error("a star needs at least 2 points, got {points}")]
    TooFewPoints { points: u32 },

    #[error("radii must satisfy 0 <= inner <= outer, got inner={inner} outer={outer}")]
    InvalidRadii { inner: f32, outer: f32 },

    #[error("radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f32 },
}

/// Vertices of a regular polygon centered on the origin.
///
/// Vertex `i` sits at angle `i * 2π / sides`, distance `radius` from the
/// center. The polygon is closed implicitly (last vertex connects back to
/// the first).
pub fn regular_polygon_points(radius: f32, sides: u32) -> Result<Vec<Point>, GeometryError> {
    if sides < 3 {
        return Err(GeometryError::TooFewSides { sides });
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GeometryError::InvalidRadius { radius });
    }

    let step = std::f32::consts::TAU / sides as f32;
    Ok((0..sides)
        .map(|i| {
            let angle = i as f32 * step;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect())
}

/// Vertices of a star centered on the origin.
///
/// Produces `2 * points` vertices alternating between `outer` and `inner`
/// radius at angular step `π / points`, starting at angle 0. Equal radii
/// are allowed and degrade to a regular `2 * points`-gon.
pub fn star_points(points: u32, outer: f32, inner: f32) -> Result<Vec<Point>, GeometryError> {
    if points < 2 {
        return Err(GeometryError::TooFewPoints { points });
    }
    if !(outer.is_finite() && outer > 0.0) {
        return Err(GeometryError::InvalidRadius { radius: outer });
    }
    if !(inner.is_finite() && inner >= 0.0) || inner > outer {
        return Err(GeometryError::InvalidRadii { inner, outer });
    }

    let step = std::f32::consts::PI / points as f32;
    Ok((0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = i as f32 * step;
            Point::new(r * angle.cos(), r * angle.sin())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn hexagon_vertices() {
        let pts = regular_polygon_points(40.0, 6).unwrap();
        assert_eq!(pts.len(), 6);

        for p in &pts {
            assert!((p.radius() - 40.0).abs() < EPS, "vertex off radius: {p:?}");
        }

        // Consecutive angular spacing of exactly 60 degrees.
        let step = std::f32::consts::TAU / 6.0;
        for (i, p) in pts.iter().enumerate() {
            let expected = i as f32 * step;
            let mut diff = (p.angle() - expected).rem_euclid(std::f32::consts::TAU);
            if diff > std::f32::consts::PI {
                diff -= std::f32::consts::TAU;
            }
            assert!(diff.abs() < EPS, "vertex {i} off angle: {p:?}");
        }
    }

    #[test]
    fn five_point_star() {
        let pts = star_points(5, 50.0, 25.0).unwrap();
        assert_eq!(pts.len(), 10);

        for (i, p) in pts.iter().enumerate() {
            let expected = if i % 2 == 0 { 50.0 } else { 25.0 };
            assert!((p.radius() - expected).abs() < EPS, "vertex {i}: {p:?}");
        }

        // 36 degrees between consecutive vertices.
        let step = std::f32::consts::PI / 5.0;
        for (i, p) in pts.iter().enumerate() {
            let expected = i as f32 * step;
            let mut diff = (p.angle() - expected).rem_euclid(std::f32::consts::TAU);
            if diff > std::f32::consts::PI {
                diff -= std::f32::consts::TAU;
            }
            assert!(diff.abs() < EPS, "vertex {i} off angle: {p:?}");
        }
    }

    #[test]
    fn equal_radii_degrade_to_regular_polygon() {
        let pts = star_points(4, 30.0, 30.0).unwrap();
        assert_eq!(pts.len(), 8);
        for p in &pts {
            assert!((p.radius() - 30.0).abs() < EPS);
        }
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        assert!(matches!(
            regular_polygon_points(10.0, 2),
            Err(GeometryError::TooFewSides { sides: 2 })
        ));
        assert!(matches!(
            star_points(1, 50.0, 25.0),
            Err(GeometryError::TooFewPoints { points: 1 })
        ));
        assert!(matches!(
            star_points(5, 25.0, 50.0),
            Err(GeometryError::InvalidRadii { .. })
        ));
        assert!(regular_polygon_points(0.0, 5).is_err());
        assert!(regular_polygon_points(f32::NAN, 5).is_err());
    }
}
