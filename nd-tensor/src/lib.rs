//! Library crate for nd_tensor
//!

use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

mod algebra;
mod arithmetic;
mod broadcast;
mod buffer;
mod constructive;
mod display;
mod element;
mod error;
mod field;
mod iterator;
mod linalg;
mod manipulation;
mod misc;
mod reduce;
mod strides;
mod view;


pub use crate::algebra::{Field, Float32Field, Float64Field, Int32Ring, Int64Ring, Ring};
pub use crate::broadcast::{broadcast_shapes, broadcast_tensors, broadcast_to, check_dot};
pub use crate::buffer::Buffer;
pub use crate::element::Element;
pub use crate::error::TensorError;
pub use crate::field::{AlgebraND, FieldND, ParallelFieldND, SequentialFieldND};
pub use crate::iterator::TensorIter;
pub use crate::strides::Strides;
pub use par_iter::ExecutionConfig;

pub type Result<T> = std::result::Result<T, TensorError>;

/// Shapes, strides and multi-indices. Up to four axes are stored inline.
pub type Dims = SmallVec<[usize; 4]>;

/// Represents a multi-dimensional tensor with numeric element type T.
///
/// A tensor is a window of `linear_size` consecutive elements of a shared [`Buffer`], starting at
/// `buffer_start` and laid out in row-major order. Views (`view`, `at`, `flatten` and `clone`)
/// share the buffer of their parent: writing through one of them is visible through all others.
/// Use [`Tensor::copy`] to detach the data.
///
/// # Performance
/// Element access by multi-index goes through stride arithmetic and a read lock on the buffer,
/// so bulk operations work on the whole buffer segment at once instead.
pub struct Tensor<T> {
    buffer: Buffer<T>,
    strides: Strides,
    buffer_start: usize,
}

impl<T> Clone for Tensor<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            strides: self.strides.clone(),
            buffer_start: self.buffer_start,
        }
    }
}

impl<T: Element> Tensor<T> {
    /// Wraps a buffer segment into a tensor of the given shape.
    pub fn from_buffer(buffer: Buffer<T>, shape: &[usize], buffer_start: usize) -> Result<Self> {
        let strides = Strides::new(shape);
        let capacity = buffer.len();
        if buffer_start + strides.linear_size() > capacity {
            return Err(TensorError::IndexOutOfBounds(format!(
                "Shape {shape:?} starting at {buffer_start} does not fit into buffer of size {capacity}"
            )));
        }

        Ok(Self {
            buffer,
            strides,
            buffer_start,
        })
    }

    /// Wraps a freshly computed, exactly sized data vector.
    pub(crate) fn from_parts(data: Vec<T>, strides: Strides) -> Self {
        debug_assert_eq!(data.len(), strides.linear_size());
        Self {
            buffer: Buffer::new(data),
            strides,
            buffer_start: 0,
        }
    }

    /// Wraps a whole, exactly sized buffer.
    pub(crate) fn from_shared(buffer: Buffer<T>, strides: Strides) -> Self {
        Self {
            buffer,
            strides,
            buffer_start: 0,
        }
    }

    /// Runs `f` over the elements of this tensor in row-major order.
    pub(crate) fn with_data<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let data = self.buffer.read();
        f(&data[self.buffer_start..self.buffer_start + self.strides.linear_size()])
    }

    /// Runs `f` over the elements of two tensors, locking a shared buffer only once.
    pub(crate) fn with_pair<R>(left: &Self, right: &Self, f: impl FnOnce(&[T], &[T]) -> R) -> R {
        let left_range = left.buffer_start..left.buffer_start + left.strides.linear_size();
        let right_range = right.buffer_start..right.buffer_start + right.strides.linear_size();

        if left.buffer.shares_storage(&right.buffer) {
            let data = left.buffer.read();
            f(&data[left_range], &data[right_range])
        } else {
            let left_data = left.buffer.read();
            let right_data = right.buffer.read();
            f(&left_data[left_range], &right_data[right_range])
        }
    }

    /// Runs `f` over the mutable elements of this tensor in row-major order.
    pub(crate) fn with_data_mut<R>(&mut self, f: impl FnOnce(&mut [T]) -> R) -> R {
        let mut data = self.buffer.write();
        let range = self.buffer_start..self.buffer_start + self.strides.linear_size();
        f(&mut data[range])
    }
}
