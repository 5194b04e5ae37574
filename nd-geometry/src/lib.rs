//! Library crate for nd_geometry
//!
//! Approximate equality of vectors and line segments, measured by the norm of a
//! [`GeometrySpace`].

mod euclidean;
mod precision;

pub use crate::euclidean::{Euclidean2DSpace, Euclidean3DSpace, Vector2D, Vector3D};
pub use crate::precision::{equals_line, equals_vector};

/// A vector space with a norm, used to compare vectors of type `V`.
pub trait GeometrySpace<V> {
    /// Type of norms and precisions.
    type Distance: PartialOrd + Copy;

    fn norm(&self, vector: &V) -> Self::Distance;

    /// Computes `left - right`.
    fn difference(&self, left: &V, right: &V) -> V;

    /// Precision used when none is given explicitly.
    fn default_precision(&self) -> Self::Distance;
}

/// A segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment<V> {
    pub begin: V,
    pub end: V,
}

impl<V> LineSegment<V> {
    pub fn new(begin: V, end: V) -> Self {
        Self { begin, end }
    }
}
