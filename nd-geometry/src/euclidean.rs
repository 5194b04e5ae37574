use super::*;
use num_traits::{Float, NumCast};
use std::ops::{Add, Mul, Neg, Sub};

const DEFAULT_PRECISION: f64 = 1e-6;

fn default_precision<T: Float>() -> T {
    <T as NumCast>::from(DEFAULT_PRECISION).unwrap_or_else(T::epsilon)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2D<T> {
    pub x: T,
    pub y: T,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3D<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Float> Vector2D<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn norm(&self) -> T {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Equality within the default precision of [`Euclidean2DSpace`].
    pub fn equals_vector(&self, other: &Self) -> bool {
        equals_vector(&Euclidean2DSpace, self, other, None)
    }
}

impl<T: Float> Vector3D<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Equality within the default precision of [`Euclidean3DSpace`].
    pub fn equals_vector(&self, other: &Self) -> bool {
        equals_vector(&Euclidean3DSpace, self, other, None)
    }
}

macro_rules! impl_vector_ops {
    ($name:ident { $($field:ident),+ }) => {
        impl<T: Float> Add for $name<T> {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl<T: Float> Sub for $name<T> {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl<T: Float> Mul<T> for $name<T> {
            type Output = Self;

            fn mul(self, rhs: T) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl<T: Float> Neg for $name<T> {
            type Output = Self;

            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }
    };
}

impl_vector_ops!(Vector2D { x, y });
impl_vector_ops!(Vector3D { x, y, z });

/// The Euclidean plane with the L2 norm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Euclidean2DSpace;

/// The Euclidean space with the L2 norm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Euclidean3DSpace;

impl<T: Float> GeometrySpace<Vector2D<T>> for Euclidean2DSpace {
    type Distance = T;

    fn norm(&self, vector: &Vector2D<T>) -> T {
        vector.norm()
    }

    fn difference(&self, left: &Vector2D<T>, right: &Vector2D<T>) -> Vector2D<T> {
        *left - *right
    }

    fn default_precision(&self) -> T {
        default_precision()
    }
}

impl<T: Float> GeometrySpace<Vector3D<T>> for Euclidean3DSpace {
    type Distance = T;

    fn norm(&self, vector: &Vector3D<T>) -> T {
        vector.norm()
    }

    fn difference(&self, left: &Vector3D<T>, right: &Vector3D<T>) -> Vector3D<T> {
        *left - *right
    }

    fn default_precision(&self) -> T {
        default_precision()
    }
}
