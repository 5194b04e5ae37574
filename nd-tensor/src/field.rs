//! Element-wise algebras over all tensors of one fixed shape.
//!
//! An [`AlgebraND`] builds and transforms tensors offset by offset. [`SequentialFieldND`] runs on
//! the calling thread in offset order, while [`ParallelFieldND`] splits the offsets into chunks
//! processed by a pool of worker threads and joins them before returning.

use super::*;
use num_traits::Float;
use par_iter::ParallelSlice;

/// Element-wise operations over tensors of the shape returned by [`AlgebraND::shape`].
///
/// Every argument must have exactly that shape, otherwise a [`TensorError::ShapeMismatch`] is
/// returned. Transforms run over a snapshot of the arguments and may read or write them freely.
/// Results always live in a fresh buffer.
pub trait AlgebraND<T: Element> {
    fn shape(&self) -> &[usize];

    /// Builds a tensor by evaluating `initializer` at every multi-index.
    fn structure_nd<F>(&self, initializer: F) -> Tensor<T>
    where
        F: Fn(&[usize]) -> T + Send + Sync;

    /// Like [`AlgebraND::structure_nd`] with a fallible initializer. The first observed error is
    /// returned and no tensor is built.
    fn try_structure_nd<F, E>(&self, initializer: F) -> std::result::Result<Tensor<T>, E>
    where
        F: Fn(&[usize]) -> std::result::Result<T, E> + Send + Sync,
        E: Send;

    fn map<F>(&self, arg: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(T) -> T + Send + Sync;

    fn map_indexed<F>(&self, arg: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(&[usize], T) -> T + Send + Sync;

    fn zip<F>(&self, left: &Tensor<T>, right: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(T, T) -> T + Send + Sync;

    fn zero(&self) -> Tensor<T> {
        self.number(T::zero())
    }

    fn one(&self) -> Tensor<T> {
        self.number(T::one())
    }

    /// A tensor filled with `value`.
    fn number(&self, value: T) -> Tensor<T> {
        self.structure_nd(move |_| value)
    }

    fn add(&self, left: &Tensor<T>, right: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(left, right, |x, y| x + y)
    }

    fn sub(&self, left: &Tensor<T>, right: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(left, right, |x, y| x - y)
    }

    fn mul(&self, left: &Tensor<T>, right: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(left, right, |x, y| x * y)
    }

    fn neg(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, |x| -x)
    }

    fn scale(&self, arg: &Tensor<T>, value: T) -> Result<Tensor<T>> {
        self.map(arg, move |x| x * value)
    }
}

/// Field operations for floating point elements, available on every [`AlgebraND`].
pub trait FieldND<T: Element + Float>: AlgebraND<T> {
    fn div(&self, left: &Tensor<T>, right: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(left, right, |x, y| x / y)
    }

    fn power(&self, arg: &Tensor<T>, pow: T) -> Result<Tensor<T>> {
        self.map(arg, move |x| x.powf(pow))
    }

    fn exp(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::exp)
    }

    fn ln(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::ln)
    }

    fn sin(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::sin)
    }

    fn cos(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::cos)
    }

    fn tan(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::tan)
    }

    fn asin(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::asin)
    }

    fn acos(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::acos)
    }

    fn atan(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::atan)
    }

    fn sinh(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::sinh)
    }

    fn cosh(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::cosh)
    }

    fn tanh(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::tanh)
    }

    fn asinh(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::asinh)
    }

    fn acosh(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::acosh)
    }

    fn atanh(&self, arg: &Tensor<T>) -> Result<Tensor<T>> {
        self.map(arg, Float::atanh)
    }
}

impl<T: Element + Float, A: AlgebraND<T>> FieldND<T> for A {}

fn check_shape<T: Element>(expected: &Strides, arg: &Tensor<T>) -> Result<()> {
    if arg.shape() != expected.shape() {
        return Err(TensorError::ShapeMismatch(format!(
            "Expected shape {:?}, got {:?}",
            expected.shape(),
            arg.shape()
        )));
    }
    Ok(())
}

fn with_index<R>(strides: &Strides, offset: usize, f: impl FnOnce(&[usize]) -> R) -> R {
    let mut index: Dims = smallvec![0; strides.rank()];
    strides.unravel(offset, &mut index);
    f(&index)
}

/// Element-wise algebra running on the calling thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequentialFieldND {
    strides: Strides,
}

impl SequentialFieldND {
    pub fn new(shape: &[usize]) -> Self {
        Self {
            strides: Strides::new(shape),
        }
    }
}

impl<T: Element> AlgebraND<T> for SequentialFieldND {
    fn shape(&self) -> &[usize] {
        self.strides.shape()
    }

    fn structure_nd<F>(&self, initializer: F) -> Tensor<T>
    where
        F: Fn(&[usize]) -> T + Send + Sync,
    {
        let buffer = Buffer::from_fn(self.strides.linear_size(), |offset| {
            with_index(&self.strides, offset, &initializer)
        });
        Tensor::from_shared(buffer, self.strides.clone())
    }

    fn try_structure_nd<F, E>(&self, initializer: F) -> std::result::Result<Tensor<T>, E>
    where
        F: Fn(&[usize]) -> std::result::Result<T, E> + Send + Sync,
        E: Send,
    {
        let data = (0..self.strides.linear_size())
            .map(|offset| with_index(&self.strides, offset, &initializer))
            .collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(Tensor::from_parts(data, self.strides.clone()))
    }

    fn map<F>(&self, arg: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(T) -> T + Send + Sync,
    {
        check_shape(&self.strides, arg)?;
        let data = arg.elements().map(transform).collect();
        Ok(Tensor::from_parts(data, self.strides.clone()))
    }

    fn map_indexed<F>(&self, arg: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(&[usize], T) -> T + Send + Sync,
    {
        check_shape(&self.strides, arg)?;
        let data = arg
            .elements()
            .enumerate()
            .map(|(offset, value)| with_index(&self.strides, offset, |index| transform(index, value)))
            .collect();
        Ok(Tensor::from_parts(data, self.strides.clone()))
    }

    fn zip<F>(&self, left: &Tensor<T>, right: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        check_shape(&self.strides, left)?;
        check_shape(&self.strides, right)?;
        let data = left
            .elements()
            .zip(right.elements())
            .map(|(x, y)| transform(x, y))
            .collect();
        Ok(Tensor::from_parts(data, self.strides.clone()))
    }
}

/// Element-wise algebra running on a pool of worker threads.
///
/// Output offsets are split into contiguous chunks claimed by the workers; every operation joins
/// all workers before it returns. Transforms must therefore be `Send + Sync`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelFieldND {
    strides: Strides,
    config: ExecutionConfig,
}

impl ParallelFieldND {
    pub fn new(shape: &[usize]) -> Self {
        Self {
            strides: Strides::new(shape),
            config: ExecutionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    fn trace_dispatch(&self, operation: &str) {
        let elements = self.strides.linear_size();
        tracing::debug!(
            operation,
            elements,
            threads = self.config.num_threads(),
            chunk_size = self.config.chunk_size(elements),
            "parallel dispatch"
        );
    }
}

impl<T: Element> AlgebraND<T> for ParallelFieldND {
    fn shape(&self) -> &[usize] {
        self.strides.shape()
    }

    fn structure_nd<F>(&self, initializer: F) -> Tensor<T>
    where
        F: Fn(&[usize]) -> T + Send + Sync,
    {
        self.trace_dispatch("structure_nd");
        let buffer = Buffer::par_from_fn(self.strides.linear_size(), &self.config, |offset| {
            with_index(&self.strides, offset, &initializer)
        });
        Tensor::from_shared(buffer, self.strides.clone())
    }

    fn try_structure_nd<F, E>(&self, initializer: F) -> std::result::Result<Tensor<T>, E>
    where
        F: Fn(&[usize]) -> std::result::Result<T, E> + Send + Sync,
        E: Send,
    {
        self.trace_dispatch("try_structure_nd");
        let buffer = Buffer::try_par_from_fn(self.strides.linear_size(), &self.config, |offset| {
            with_index(&self.strides, offset, &initializer)
        })?;
        Ok(Tensor::from_shared(buffer, self.strides.clone()))
    }

    fn map<F>(&self, arg: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(T) -> T + Send + Sync,
    {
        check_shape(&self.strides, arg)?;
        self.trace_dispatch("map");
        let data = arg
            .to_vec()
            .par_iter()
            .with_config(self.config)
            .map(|&value| transform(value))
            .collect();
        Ok(Tensor::from_parts(data, self.strides.clone()))
    }

    fn map_indexed<F>(&self, arg: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(&[usize], T) -> T + Send + Sync,
    {
        check_shape(&self.strides, arg)?;
        self.trace_dispatch("map_indexed");
        let data = arg
            .to_vec()
            .par_iter()
            .with_config(self.config)
            .enumerate()
            .map(|(offset, &value)| with_index(&self.strides, offset, |index| transform(index, value)))
            .collect();
        Ok(Tensor::from_parts(data, self.strides.clone()))
    }

    fn zip<F>(&self, left: &Tensor<T>, right: &Tensor<T>, transform: F) -> Result<Tensor<T>>
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        check_shape(&self.strides, left)?;
        check_shape(&self.strides, right)?;
        self.trace_dispatch("zip");
        let (left, right) = (left.to_vec(), right.to_vec());
        let data = left
            .par_iter()
            .with_config(self.config)
            .zip(right.par_iter())
            .map(|(&x, &y)| transform(x, y))
            .collect();
        Ok(Tensor::from_parts(data, self.strides.clone()))
    }
}
