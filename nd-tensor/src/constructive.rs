use super::*;
use num_traits::NumCast;

impl<T: Element> Tensor<T> {
    /// Creates a tensor owning `data` laid out in row-major order under `shape`.
    pub fn new(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let strides = Strides::new(shape);
        if data.len() != strides.linear_size() {
            return Err(TensorError::ShapeMismatch(format!(
                "Data of length {} does not match shape {shape:?} with {} elements",
                data.len(),
                strides.linear_size()
            )));
        }

        Ok(Self::from_parts(data, strides))
    }

    /// Creates a rank 0 tensor holding a single value.
    pub fn scalar(value: T) -> Self {
        Self::from_parts(vec![value], Strides::new(&[]))
    }

    /// Creates a tensor filled with `value`.
    pub fn full(shape: &[usize], value: T) -> Self {
        let strides = Strides::new(shape);
        Self::from_parts(vec![value; strides.linear_size()], strides)
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, T::zero())
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, T::one())
    }

    pub fn full_like(&self, value: T) -> Self {
        Self::full(self.shape(), value)
    }

    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.shape())
    }

    pub fn ones_like(&self) -> Self {
        Self::ones(self.shape())
    }

    /// Creates an `n x n` identity matrix.
    pub fn eye(n: usize) -> Self {
        let mut data = vec![T::zero(); n * n];
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Self::from_parts(data, Strides::new(&[n, n]))
    }

    /// Creates a 1D tensor holding `0, 1, ..., n - 1`.
    pub fn arange(n: usize) -> Result<Self> {
        let data = (0..n)
            .map(|i| {
                <T as NumCast>::from(i).ok_or_else(|| {
                    TensorError::UnsupportedOperation(format!("{i} is not representable as {}", T::NAME))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_parts(data, Strides::new(&[n])))
    }

    /// Creates a tensor by evaluating `initializer` at every multi-index in row-major order.
    pub fn from_fn<F>(shape: &[usize], mut initializer: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let strides = Strides::new(shape);
        let data = strides.indices().map(|index| initializer(&index)).collect();
        Self::from_parts(data, strides)
    }
}

impl<T: Element> From<Vec<T>> for Tensor<T> {
    fn from(data: Vec<T>) -> Self {
        let strides = Strides::new(&[data.len()]);
        Self::from_parts(data, strides)
    }
}

impl<T: Element, const M: usize> TryFrom<Vec<[T; M]>> for Tensor<T> {
    type Error = TensorError;

    fn try_from(rows: Vec<[T; M]>) -> Result<Self> {
        let shape = [rows.len(), M];
        Tensor::new(rows.into_iter().flatten().collect(), &shape)
    }
}
