//! Planar helpers: section shapes and water crossings.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Points of an octilinear section shape from `a` to `b`, endpoints included.
///
/// The shape runs diagonally first, then straight, so it has at most one bend.
/// Axis-aligned or exactly diagonal station pairs get a single straight leg.
pub fn octilinear_path(a: Vec2, b: Vec2) -> Vec<Vec2> {
    let delta = b - a;
    let (ax, ay) = (delta.x.abs(), delta.y.abs());
    if ax <= f32::EPSILON || ay <= f32::EPSILON || (ax - ay).abs() <= f32::EPSILON {
        return vec![a, b];
    }
    let diagonal = ax.min(ay);
    let bend = a + Vec2::new(diagonal * delta.x.signum(), diagonal * delta.y.signum());
    vec![a, bend, b]
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point halfway along a polyline (by length).
pub fn polyline_midpoint(points: &[Vec2]) -> Vec2 {
    let Some(&first) = points.first() else {
        return Vec2::ZERO;
    };
    let half = polyline_length(points) / 2.0;
    let mut walked = 0.0;
    for w in points.windows(2) {
        let leg = w[0].distance(w[1]);
        if walked + leg >= half && leg > 0.0 {
            return w[0].lerp(w[1], (half - walked) / leg);
        }
        walked += leg;
    }
    points.last().copied().unwrap_or(first)
}

/// Water obstacles of the current map.
///
/// Only used to decide which subsections are tunnels; the polygons themselves
/// are passed through untouched for the view layer.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterMap {
    pub polygons: Vec<Vec<[f32; 2]>>,
}

impl WaterMap {
    pub fn new(polygons: Vec<Vec<[f32; 2]>>) -> Self {
        Self { polygons }
    }

    /// Whether the leg from `a` to `b` touches water: either it crosses a
    /// polygon edge or one of its ends lies inside a polygon.
    pub fn crosses(&self, a: Vec2, b: Vec2) -> bool {
        self.polygons.iter().any(|polygon| {
            let vertices: Vec<Vec2> = polygon.iter().map(|&[x, y]| Vec2::new(x, y)).collect();
            if vertices.len() < 3 {
                return false;
            }
            if point_in_polygon(a, &vertices) || point_in_polygon(b, &vertices) {
                return true;
            }
            (0..vertices.len()).any(|i| {
                let c = vertices[i];
                let d = vertices[(i + 1) % vertices.len()];
                segments_intersect(a, b, c, d)
            })
        })
    }
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

// Even-odd ray casting.
fn point_in_polygon(p: Vec2, vertices: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y) && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
