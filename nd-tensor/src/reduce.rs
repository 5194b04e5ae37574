use super::*;
use num_traits::{Float, NumCast};

/// Sizes of the axes before `dim`, at `dim` and after `dim`.
fn split_at_axis(shape: &[usize], dim: usize) -> Result<(usize, usize, usize)> {
    if dim >= shape.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "Axis {dim} out of range for shape {shape:?}"
        )));
    }

    let outer = shape[..dim].iter().product();
    let inner = shape[dim + 1..].iter().product();
    Ok((outer, shape[dim], inner))
}

impl<T: Element> Tensor<T> {
    /// Sums along `dim`. The axis is removed unless `keep_dim` is set, in which case it has size 1.
    pub fn sum(&self, dim: usize, keep_dim: bool) -> Result<Tensor<T>> {
        self.reduce_axis(dim, keep_dim, |lane| lane.iter().copied().sum())
    }

    pub fn prod(&self, dim: usize, keep_dim: bool) -> Result<Tensor<T>> {
        self.reduce_axis(dim, keep_dim, |lane| lane.iter().copied().product())
    }

    pub fn sum_all(&self) -> T {
        self.with_data(|data| data.iter().copied().sum())
    }

    pub fn prod_all(&self) -> T {
        self.with_data(|data| data.iter().copied().product())
    }

    /// Running sum along `dim`.
    pub fn cumsum(&self, dim: usize) -> Result<Tensor<T>> {
        self.scan_axis(dim, |acc, x| acc + x)
    }

    /// Running product along `dim`.
    pub fn cumprod(&self, dim: usize) -> Result<Tensor<T>> {
        self.scan_axis(dim, |acc, x| acc * x)
    }

    /// Applies `f` to every lane along `dim`.
    fn reduce_axis(&self, dim: usize, keep_dim: bool, f: impl Fn(&[T]) -> T) -> Result<Tensor<T>> {
        let (outer, size, inner) = split_at_axis(self.shape(), dim)?;

        let mut shape = Dims::from_slice(self.shape());
        if keep_dim {
            shape[dim] = 1;
        } else {
            shape.remove(dim);
        }

        let data = self.with_data(|data| {
            let mut lane = Vec::with_capacity(size);
            let mut result = Vec::with_capacity(outer * inner);
            for o in 0..outer {
                for i in 0..inner {
                    lane.clear();
                    lane.extend((0..size).map(|j| data[(o * size + j) * inner + i]));
                    result.push(f(&lane));
                }
            }
            result
        });

        Ok(Self::from_parts(data, Strides::new(&shape)))
    }

    fn scan_axis(&self, dim: usize, f: impl Fn(T, T) -> T) -> Result<Tensor<T>> {
        let (outer, size, inner) = split_at_axis(self.shape(), dim)?;

        let mut data = self.to_vec();
        for o in 0..outer {
            for i in 0..inner {
                for j in 1..size {
                    let current = (o * size + j) * inner + i;
                    data[current] = f(data[current - inner], data[current]);
                }
            }
        }

        Ok(Self::from_parts(data, self.strides.clone()))
    }
}

impl<T: Element + Float> Tensor<T> {
    /// Arithmetic mean along `dim`; an empty axis yields NaN.
    pub fn mean(&self, dim: usize, keep_dim: bool) -> Result<Tensor<T>> {
        self.reduce_axis(dim, keep_dim, mean_of)
    }

    /// Variance along `dim`, divided by `n - 1` when `unbiased`.
    pub fn variance(&self, dim: usize, unbiased: bool, keep_dim: bool) -> Result<Tensor<T>> {
        self.reduce_axis(dim, keep_dim, |lane| variance_of(lane, unbiased))
    }

    /// Standard deviation along `dim`, see [`Tensor::variance`].
    pub fn std(&self, dim: usize, unbiased: bool, keep_dim: bool) -> Result<Tensor<T>> {
        self.reduce_axis(dim, keep_dim, |lane| variance_of(lane, unbiased).sqrt())
    }

    pub fn mean_all(&self) -> T {
        self.with_data(mean_of)
    }

    pub fn variance_all(&self, unbiased: bool) -> T {
        self.with_data(|data| variance_of(data, unbiased))
    }

    pub fn std_all(&self, unbiased: bool) -> T {
        self.variance_all(unbiased).sqrt()
    }
}

fn count<T: Element + Float>(n: usize) -> T {
    <T as NumCast>::from(n).unwrap_or_else(T::nan)
}

fn mean_of<T: Element + Float>(values: &[T]) -> T {
    values.iter().copied().sum::<T>() / count(values.len())
}

fn variance_of<T: Element + Float>(values: &[T], unbiased: bool) -> T {
    let mean = mean_of(values);
    let squares: T = values.iter().map(|&x| (x - mean) * (x - mean)).sum();
    let n = if unbiased { values.len().saturating_sub(1) } else { values.len() };
    squares / count(n)
}
