// Sample - one tri-axial acceleration reading
//
// Samples are transient: the detector derives a scalar magnitude from each
// one and never stores the sample itself.

use std::time::Instant;

/// Tri-axial acceleration sample with a monotonic timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp: Instant,
}

impl Sample {
    pub fn new(x: f64, y: f64, z: f64, timestamp: Instant) -> Self {
        Self { x, y, z, timestamp }
    }

    /// Euclidean norm of the three axes
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// True when every axis and the derived magnitude are finite
    ///
    /// Finite axes above ~1e154 still overflow the squared norm.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.magnitude().is_finite()
    }

    /// Scale every axis by `factor`, keeping the timestamp
    ///
    /// Used to convert readings reported in standard gravity (g) into m/s².
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
            timestamp: self.timestamp,
        }
    }
}
