use nalgebra::Point3;

/// Separation below which two atoms are treated as occupying the same position.
pub const COINCIDENCE_TOLERANCE: f64 = 1e-8;

pub fn distance(p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    nalgebra::distance(p1, p2)
}
