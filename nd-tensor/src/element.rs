use num_traits::{NumAssign, NumCast, Signed};
use std::fmt::{Debug, Display};
use std::iter::{Product, Sum};

mod private {
    pub trait Sealed {}
}

/// Numeric types a tensor buffer can store: `f64`, `f32`, `i32` and `i64`.
///
/// The set is closed, every buffer is monomorphised for its element type so no value is boxed.
pub trait Element:
    private::Sealed
    + Copy
    + Default
    + PartialOrd
    + Debug
    + Display
    + Send
    + Sync
    + Signed
    + NumAssign
    + NumCast
    + Sum
    + Product
    + 'static
{
    /// Short type name used in diagnostics.
    const NAME: &'static str;
}

macro_rules! impl_element {
    ($($ty:ty),+) => {
        $(
            impl private::Sealed for $ty {}

            impl Element for $ty {
                const NAME: &'static str = stringify!($ty);
            }
        )+
    };
}

impl_element!(f64, f32, i32, i64);
