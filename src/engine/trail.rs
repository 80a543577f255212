//! Path history of a body in scene units

use nalgebra::Vector3;

/// Ordered scene positions of one body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: Vec<Vector3<f64>>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point unless it repeats the last one. Returns whether the
    /// point was added.
    pub fn push(&mut self, point: Vector3<f64>) -> bool {
        if self.points.last() == Some(&point) {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn last(&self) -> Option<&Vector3<f64>> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
