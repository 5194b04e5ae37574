//! Element algebras: ring and field capability sets passed explicitly to generic code.
//!
//! A capability object carries no state; it only names the operations over a value type `C`.
//! Polynomial and rational function spaces are built on top of these traits.

/// Addition, subtraction and multiplication with neutral elements over `C`.
pub trait Ring<C> {
    fn zero(&self) -> C;

    fn one(&self) -> C;

    fn add(&self, left: &C, right: &C) -> C;

    fn mul(&self, left: &C, right: &C) -> C;

    fn neg(&self, value: &C) -> C;

    fn sub(&self, left: &C, right: &C) -> C {
        self.add(left, &self.neg(right))
    }

    fn is_zero(&self, value: &C) -> bool;

    fn is_one(&self, value: &C) -> bool;

    /// `value` added to itself `n` times, negated for a negative `n`.
    fn multiply_by_int(&self, value: &C, n: i64) -> C
    where
        C: Clone,
    {
        let mut base = if n < 0 { self.neg(value) } else { value.clone() };
        let mut result = self.zero();
        let mut rest = n.unsigned_abs();
        // double-and-add over the bits of |n|
        while rest > 0 {
            if rest & 1 == 1 {
                result = self.add(&result, &base);
            }
            rest >>= 1;
            if rest > 0 {
                base = self.add(&base, &base);
            }
        }
        result
    }
}

/// A ring with division.
pub trait Field<C>: Ring<C> {
    fn div(&self, left: &C, right: &C) -> C;
}

macro_rules! numeric_ring {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl Ring<$ty> for $name {
            fn zero(&self) -> $ty {
                <$ty as num_traits::Zero>::zero()
            }

            fn one(&self) -> $ty {
                <$ty as num_traits::One>::one()
            }

            fn add(&self, left: &$ty, right: &$ty) -> $ty {
                left + right
            }

            fn mul(&self, left: &$ty, right: &$ty) -> $ty {
                left * right
            }

            fn neg(&self, value: &$ty) -> $ty {
                -value
            }

            fn sub(&self, left: &$ty, right: &$ty) -> $ty {
                left - right
            }

            fn is_zero(&self, value: &$ty) -> bool {
                num_traits::Zero::is_zero(value)
            }

            fn is_one(&self, value: &$ty) -> bool {
                *value == self.one()
            }
        }
    };
}

macro_rules! numeric_field {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        numeric_ring!($(#[$meta])* $name, $ty);

        impl Field<$ty> for $name {
            fn div(&self, left: &$ty, right: &$ty) -> $ty {
                left / right
            }
        }
    };
}

numeric_ring!(
    /// Ring of 32-bit integers.
    Int32Ring,
    i32
);
numeric_ring!(
    /// Ring of 64-bit integers.
    Int64Ring,
    i64
);
numeric_field!(
    /// Field of 32-bit floats.
    Float32Field,
    f32
);
numeric_field!(
    /// Field of 64-bit floats.
    Float64Field,
    f64
);
