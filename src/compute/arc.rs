//! Circular arc and annular sector helpers.

use std::f64::consts::PI;

/// Maximum chord deviation from the true arc used by [`segment_count`], in mm.
pub const DEFAULT_CHORD_ERROR_MM: f64 = 0.05;

/// Length of an arc.
#[inline]
pub fn arc_length(radius_mm: f64, angle_deg: f64) -> f64 {
    radius_mm * angle_deg.to_radians()
}

/// Area between two radii over `angle_deg`. Zero for a degenerate sector.
pub fn sector_area(inner_radius_mm: f64, outer_radius_mm: f64, angle_deg: f64) -> f64 {
    if outer_radius_mm <= inner_radius_mm || angle_deg <= 0.0 {
        return 0.0;
    }
    0.5 * angle_deg.to_radians() * (outer_radius_mm.powi(2) - inner_radius_mm.powi(2))
}

/// Straight-line distance between the ends of an arc.
#[inline]
pub fn chord_length(radius_mm: f64, angle_deg: f64) -> f64 {
    2.0 * radius_mm * (angle_deg.to_radians() / 2.0).sin()
}

/// `segments + 1` points along an arc, counter-clockwise from `start_deg`.
pub fn arc_points(radius_mm: f64, start_deg: f64, end_deg: f64, segments: usize) -> Vec<(f64, f64)> {
    let segments = segments.max(1);
    let step = (end_deg - start_deg) / segments as f64;
    (0..=segments)
        .map(|i| {
            let theta = (start_deg + step * i as f64).to_radians();
            (radius_mm * theta.cos(), radius_mm * theta.sin())
        })
        .collect()
}

/// Closed polygon of an annular sector: outer arc forward, inner arc back.
/// A zero inner radius collapses the inner arc to the centre.
pub fn sector_outline(
    inner_radius_mm: f64,
    outer_radius_mm: f64,
    start_deg: f64,
    end_deg: f64,
    segments: usize,
) -> Vec<(f64, f64)> {
    let mut points = arc_points(outer_radius_mm, start_deg, end_deg, segments);
    if inner_radius_mm > 0.0 {
        let mut inner = arc_points(inner_radius_mm, start_deg, end_deg, segments);
        inner.reverse();
        points.extend(inner);
    } else {
        points.push((0.0, 0.0));
    }
    points
}

/// Segments needed so no chord strays more than `max_error_mm` from the arc.
///
/// Clamped to `3..=200`; a span short enough for one chord returns 1 and
/// invalid input falls back to 10.
pub fn segment_count(radius_mm: f64, angle_deg: f64, max_error_mm: f64) -> usize {
    if !(radius_mm > 0.0 && angle_deg > 0.0 && max_error_mm > 0.0) {
        return 10;
    }
    if max_error_mm >= radius_mm {
        return 3;
    }
    // Sagitta of a chord spanning `a` radians is r(1 - cos(a/2)).
    let max_step = 2.0 * (1.0 - max_error_mm / radius_mm).acos();
    let angle = angle_deg.to_radians();
    if angle <= max_step {
        return 1;
    }
    ((angle / max_step).ceil() as usize).clamp(3, 200)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        assert!((arc_length(10.0, 180.0) - 10.0 * PI).abs() < 1e-12);
        assert!((chord_length(10.0, 180.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_sector_area() {
        // Half annulus between r = 1 and r = 2.
        let area = sector_area(1.0, 2.0, 180.0);
        assert!((area - 1.5 * PI).abs() < 1e-12);
        assert_eq!(sector_area(2.0, 1.0, 90.0), 0.0);
    }

    #[test]
    fn test_outline_closes_on_inner_arc() {
        let outline = sector_outline(5.0, 10.0, 0.0, 90.0, 4);
        assert_eq!(outline.len(), 10);
        let (x, y) = outline[0];
        assert!((x - 10.0).abs() < 1e-9 && y.abs() < 1e-9);
        let (x, y) = outline[9];
        assert!((x - 5.0).abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(segment_count(-1.0, 90.0, 0.05), 10);
        assert_eq!(segment_count(50.0, 0.1, 0.05), 1);
        let n = segment_count(50.0, 360.0, 0.05);
        assert!((3..=200).contains(&n));
        assert!(segment_count(50.0, 360.0, 0.01) >= n);
    }
}
