use super::*;
use num_traits::Float;
use par_iter::IntoParallelIterator;

/// Operand layout of a (batched) matrix product, with vectors promoted to matrices.
struct DotLayout {
    shape: Dims,
    batch: usize,
    m: usize,
    k: usize,
    n: usize,
    a_batch_stride: usize,
    b_batch_stride: usize,
}

impl DotLayout {
    fn new(a: &[usize], b: &[usize]) -> Self {
        let (ra, rb) = (a.len(), b.len());
        let (m, k) = if ra == 1 { (1, a[0]) } else { (a[ra - 2], a[ra - 1]) };
        let n = if rb == 1 { 1 } else { b[rb - 1] };

        let batch_dims = if ra > 2 {
            &a[..ra - 2]
        } else if rb > 2 {
            &b[..rb - 2]
        } else {
            &[][..]
        };

        let mut shape = Dims::from_slice(batch_dims);
        if ra >= 2 {
            shape.push(m);
        }
        if rb >= 2 {
            shape.push(n);
        }

        Self {
            shape,
            batch: batch_dims.iter().product(),
            m,
            k,
            n,
            a_batch_stride: if ra > 2 { m * k } else { 0 },
            b_batch_stride: if rb > 2 { k * n } else { 0 },
        }
    }

    fn len(&self) -> usize {
        self.batch * self.m * self.n
    }

    /// Output element at `offset` of the row-major `[batch, m, n]` result.
    fn element<T: Element>(&self, a: &[T], b: &[T], offset: usize) -> T {
        let (bt, rest) = (offset / (self.m * self.n), offset % (self.m * self.n));
        let (i, j) = (rest / self.n, rest % self.n);
        let a_row = bt * self.a_batch_stride + i * self.k;
        let b_col = bt * self.b_batch_stride + j;

        (0..self.k).fold(T::zero(), |acc, l| acc + a[a_row + l] * b[b_col + l * self.n])
    }
}

impl<T: Element> Tensor<T> {
    /// Returns a new tensor with axes `dim0` and `dim1` swapped. The data is relocated into a
    /// fresh buffer.
    pub fn transpose(&self, dim0: usize, dim1: usize) -> Result<Tensor<T>> {
        if dim0 >= self.rank() || dim1 >= self.rank() {
            return Err(TensorError::ShapeMismatch(format!(
                "Invalid dimensions for transpose: {dim0} and {dim1} for rank {}",
                self.rank()
            )));
        }

        let mut shape = Dims::from_slice(self.shape());
        shape.swap(dim0, dim1);
        let target = Strides::new(&shape);

        let data = self.with_data(|data| {
            let mut index: Dims = smallvec![0; target.rank()];
            (0..target.linear_size())
                .map(|offset| {
                    target.unravel(offset, &mut index);
                    index.swap(dim0, dim1);
                    let source = self.strides.ravel(&index);
                    index.swap(dim0, dim1);
                    data[source]
                })
                .collect()
        });

        Ok(Self::from_parts(data, target))
    }

    /// Matrix product over the last two axes, batched over the leading ones.
    ///
    /// A 1D left operand acts as a single row and a 1D right operand as a single column; the
    /// corresponding axis is dropped from the result, so two vectors give a rank 0 tensor.
    /// When only one operand has batch axes, the other one is shared across the batch.
    pub fn dot(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        check_dot(self, other)?;
        tracing::debug!(left = ?self.shape(), right = ?other.shape(), "dot");

        let layout = DotLayout::new(self.shape(), other.shape());
        let data = Tensor::with_pair(self, other, |a, b| {
            (0..layout.len())
                .map(|offset| layout.element(a, b, offset))
                .collect()
        });

        Ok(Self::from_parts(data, Strides::new(&layout.shape)))
    }

    /// Same as [`Tensor::dot`] with the output elements computed on worker threads.
    pub fn dot_par(&self, other: &Tensor<T>, config: &ExecutionConfig) -> Result<Tensor<T>> {
        check_dot(self, other)?;

        let layout = DotLayout::new(self.shape(), other.shape());
        tracing::debug!(
            left = ?self.shape(),
            right = ?other.shape(),
            elements = layout.len(),
            threads = config.num_threads(),
            chunk_size = config.chunk_size(layout.len()),
            "parallel dot"
        );

        let data = Tensor::with_pair(self, other, |a, b| {
            (0..layout.len())
                .into_par_iter()
                .with_config(*config)
                .map(|offset| layout.element(a, b, offset))
                .collect()
        });

        Ok(Self::from_parts(data, Strides::new(&layout.shape)))
    }

    /// Places the last axis of `self` on a diagonal of two new axes `dim1` and `dim2`.
    ///
    /// The diagonal is shifted above the main one for a positive `offset` and below it for a
    /// negative one; both new axes have size `n + |offset|` and every other entry is zero.
    pub fn diagonal_embedding(&self, offset: isize, dim1: usize, dim2: usize) -> Result<Tensor<T>> {
        let Some((&n, batch)) = self.shape().split_last() else {
            return Err(TensorError::UnsupportedOperation(
                "Diagonal embedding is not defined for a rank 0 tensor".to_string(),
            ));
        };

        let rank = self.rank() + 1;
        if dim1 == dim2 || dim1 >= rank || dim2 >= rank {
            return Err(TensorError::ShapeMismatch(format!(
                "Invalid diagonal axes {dim1} and {dim2} for output rank {rank}"
            )));
        }

        let size = n + offset.unsigned_abs();
        let mut batch_axes = batch.iter();
        let shape = (0..rank)
            .map(|axis| {
                if axis == dim1 || axis == dim2 {
                    size
                } else {
                    batch_axes.next().copied().unwrap_or(1)
                }
            })
            .collect::<Dims>();
        let target = Strides::new(&shape);

        let (row_shift, column_shift) = if offset >= 0 {
            (0, offset.unsigned_abs())
        } else {
            (offset.unsigned_abs(), 0)
        };

        let source = self.to_vec();
        let mut data = vec![T::zero(); target.linear_size()];
        if n == 0 {
            return Ok(Self::from_parts(data, target));
        }

        let batch_strides = Strides::new(batch);
        let mut batch_index: Dims = smallvec![0; batch.len()];
        let mut index: Dims = smallvec![0; rank];
        for (position, chunk) in source.chunks(n).enumerate() {
            batch_strides.unravel(position, &mut batch_index);
            let mut batch_values = batch_index.iter();
            for (axis, slot) in index.iter_mut().enumerate() {
                if axis != dim1 && axis != dim2 {
                    *slot = batch_values.next().copied().unwrap_or(0);
                }
            }

            for (t, &value) in chunk.iter().enumerate() {
                index[dim1] = t + row_shift;
                index[dim2] = t + column_shift;
                data[target.ravel(&index)] = value;
            }
        }

        Ok(Self::from_parts(data, target))
    }
}

impl<T: Element + Float> Tensor<T> {
    /// Determinant over the last two axes, batched over the leading ones.
    ///
    /// Uses LU decomposition with partial pivoting; a 2D input yields a rank 0 tensor.
    pub fn det(&self) -> Result<Tensor<T>> {
        let rank = self.rank();
        if rank < 2 || self.shape()[rank - 1] != self.shape()[rank - 2] {
            return Err(TensorError::ShapeMismatch(format!(
                "Determinant requires square matrices in the last two axes, got {:?}",
                self.shape()
            )));
        }
        tracing::debug!(shape = ?self.shape(), "det");

        let n = self.shape()[rank - 1];
        let batch = &self.shape()[..rank - 2];
        let mut data = self.to_vec();

        let determinants = if n == 0 {
            vec![T::one(); batch.iter().product()]
        } else {
            data.chunks_mut(n * n).map(|matrix| lu_determinant(matrix, n)).collect()
        };

        Ok(Self::from_parts(determinants, Strides::new(batch)))
    }
}

/// Determinant of a row-major `n x n` matrix, overwriting it with its LU factors.
fn lu_determinant<T: Element + Float>(matrix: &mut [T], n: usize) -> T {
    let mut det = T::one();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&r1, &r2| {
                Float::abs(matrix[r1 * n + col])
                    .partial_cmp(&Float::abs(matrix[r2 * n + col]))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        let pivot_value = matrix[pivot * n + col];
        if pivot_value == T::zero() {
            return T::zero();
        }

        if pivot != col {
            for j in 0..n {
                matrix.swap(col * n + j, pivot * n + j);
            }
            det = -det;
        }

        det *= pivot_value;
        for row in col + 1..n {
            let factor = matrix[row * n + col] / pivot_value;
            for j in col..n {
                let delta = factor * matrix[col * n + j];
                matrix[row * n + j] -= delta;
            }
        }
    }

    det
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose() -> Result<()> {
        let tensor = Tensor::<i32>::arange(25)?.view(&[5, 5])?;
        let transposed = tensor.transpose(0, 1)?;
        assert_eq!(transposed.shape(), &[5, 5]);
        assert_eq!(transposed.get(&[0, 0])?, 0);
        assert_eq!(transposed.get(&[0, 1])?, 5);
        assert_eq!(transposed.get(&[1, 0])?, 1);
        assert!(!transposed.shares_buffer(&tensor));

        assert!(matches!(
            tensor.transpose(0, 2),
            Err(TensorError::ShapeMismatch(_))
        ));

        Ok(())
    }

    #[test]
    fn test_transpose_3d() -> Result<()> {
        let tensor = Tensor::<i64>::arange(24)?.view(&[2, 3, 4])?;
        let transposed = tensor.transpose(0, 2)?;
        assert_eq!(transposed.shape(), &[4, 3, 2]);
        for index in tensor.strides().indices() {
            assert_eq!(
                transposed.get(&[index[2], index[1], index[0]])?,
                tensor.get(&index)?
            );
        }
        assert_eq!(transposed.transpose(2, 0)?, tensor);

        Ok(())
    }

    #[test]
    fn test_dot_vectors() -> Result<()> {
        let a = Tensor::<i32>::arange(4)?;
        let b = Tensor::<i32>::from(vec![0, 3, 6, 9]);
        let result = a.dot(&b)?;
        assert_eq!(result.rank(), 0);
        assert_eq!(result.get(&[])?, 42);

        Ok(())
    }

    #[test]
    fn test_dot_matrix() -> Result<()> {
        let a = Tensor::<i32>::arange(12)?.view(&[3, 4])?;
        let b = Tensor::<i32>::arange(12)?.view(&[4, 3])?;
        let result = a.dot(&b)?;
        assert_eq!(result.shape(), &[3, 3]);
        assert_eq!(result.get(&[0, 0])?, 42);
        assert_eq!(result.get(&[0, 1])?, 48);
        assert_eq!(result.get(&[0, 2])?, 54);

        Ok(())
    }

    #[test]
    fn test_dot_2d() -> Result<()> {
        let config = ExecutionConfig::new().with_threads(3);
        let a = Tensor::<i32>::new((1..=12).collect(), &[3, 4])?;
        let b = Tensor::<i32>::new((1..=12).collect(), &[4, 3])?;
        let expected =
            Tensor::<i32>::try_from(vec![[70, 80, 90], [158, 184, 210], [246, 288, 330]])?;

        assert_eq!(a.dot(&b)?, expected, "sync dot failed");
        assert_eq!(a.dot_par(&b, &config)?, expected, "parallel dot failed");

        Ok(())
    }

    #[test]
    fn test_dot_matrix_vector() -> Result<()> {
        let a = Tensor::<f64>::arange(6)?.view(&[2, 3])?;
        let v = Tensor::from(vec![1.0, 1.0, 1.0]);
        let w = Tensor::from(vec![1.0, 2.0]);

        let column = a.dot(&v)?;
        assert_eq!(column.shape(), &[2]);
        assert_eq!(column.to_vec(), vec![3.0, 12.0]);

        let row = w.dot(&a)?;
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.to_vec(), vec![6.0, 9.0, 12.0]);

        Ok(())
    }

    #[test]
    fn test_dot_3d_2d() -> Result<()> {
        let a = Tensor::<i32>::arange(24)?.view(&[4, 3, 2])?;
        let b = Tensor::<i32>::arange(6)?.view(&[2, 3])?;
        let expected = Tensor::new(
            vec![
                3, 4, 5, //
                9, 14, 19, //
                15, 24, 33, //
                //
                21, 34, 47, //
                27, 44, 61, //
                33, 54, 75, //
                //
                39, 64, 89, //
                45, 74, 103, //
                51, 84, 117, //
                //
                57, 94, 131, //
                63, 104, 145, //
                69, 114, 159, //
            ],
            &[4, 3, 3],
        )?;

        let config = ExecutionConfig::new().with_threads(2).with_chunk_size(5);
        assert_eq!(a.dot(&b)?, expected, "sync dot failed");
        assert_eq!(a.dot_par(&b, &config)?, expected, "parallel dot failed");

        Ok(())
    }

    #[test]
    fn test_dot_shared_left_operand() -> Result<()> {
        let a = Tensor::<i64>::eye(2).mul_scalar(2);
        let b = Tensor::<i64>::arange(8)?.view(&[2, 2, 2])?;

        let result = a.dot(&b)?;
        assert_eq!(result.shape(), &[2, 2, 2]);
        assert_eq!(result, b.mul_scalar(2));

        let batched = b.dot(&b)?;
        assert_eq!(batched.at(1)?.to_vec(), vec![46, 55, 66, 79]);

        Ok(())
    }

    #[test]
    fn test_dot_large() -> Result<()> {
        let a = Tensor::<i64>::arange(15360)?.view(&[10, 64, 24])?;
        let b = Tensor::<i64>::arange(384)?.view(&[24, 16])?;

        let sync_result = a.dot(&b)?;
        let par_result = a.dot_par(&b, &ExecutionConfig::default())?;

        assert_eq!(sync_result.shape(), &[10, 64, 16]);
        assert_eq!(par_result.shape(), &[10, 64, 16]);
        assert_eq!(sync_result, par_result, "Parallel and sync dot results differ");

        Ok(())
    }

    #[test]
    fn test_dot_empty_contraction() -> Result<()> {
        let a = Tensor::<f64>::zeros(&[3, 0]);
        let b = Tensor::<f64>::zeros(&[0, 3]);

        for product in [a.dot(&b)?, a.dot_par(&b, &ExecutionConfig::default())?] {
            assert_eq!(product.shape(), &[3, 3]);
            assert!(product.elements().all(|x| x == 0.0 && x.is_sign_positive()));
        }

        Ok(())
    }

    #[test]
    fn test_dot_errors() {
        let a = Tensor::<f32>::zeros(&[2, 3]);
        assert!(matches!(
            a.dot(&Tensor::zeros(&[2, 3])),
            Err(TensorError::ContractViolation(_))
        ));
        assert!(matches!(
            a.dot_par(&Tensor::scalar(1.0), &ExecutionConfig::default()),
            Err(TensorError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_diagonal_embedding() -> Result<()> {
        let entries = Tensor::from(vec![1, 2, 3]);

        let main = entries.diagonal_embedding(0, 0, 1)?;
        assert_eq!(main.shape(), &[3, 3]);
        assert_eq!(main.to_vec(), vec![1, 0, 0, 0, 2, 0, 0, 0, 3]);

        let upper = entries.diagonal_embedding(1, 0, 1)?;
        assert_eq!(upper.shape(), &[4, 4]);
        assert_eq!(upper.get(&[0, 1])?, 1);
        assert_eq!(upper.get(&[2, 3])?, 3);
        assert_eq!(upper.sum_all(), 6);

        let lower = entries.diagonal_embedding(-2, 0, 1)?;
        assert_eq!(lower.shape(), &[5, 5]);
        assert_eq!(lower.get(&[2, 0])?, 1);
        assert_eq!(lower.get(&[4, 2])?, 3);

        let swapped = entries.diagonal_embedding(1, 1, 0)?;
        assert_eq!(swapped.get(&[1, 0])?, 1);

        Ok(())
    }

    #[test]
    fn test_batched_diagonal_embedding() -> Result<()> {
        let entries = Tensor::<f64>::arange(6)?.add_scalar(1.0).view(&[2, 3])?;

        let last = entries.diagonal_embedding(0, 1, 2)?;
        assert_eq!(last.shape(), &[2, 3, 3]);
        assert_eq!(last.get(&[1, 2, 2])?, 6.0);
        assert_eq!(last.at(0)?, Tensor::from(vec![1.0, 2.0, 3.0]).diagonal_embedding(0, 0, 1)?);

        let outer = entries.diagonal_embedding(0, 0, 2)?;
        assert_eq!(outer.shape(), &[3, 2, 3]);
        assert_eq!(outer.get(&[1, 1, 1])?, 5.0);
        assert_eq!(outer.get(&[1, 0, 1])?, 2.0);
        assert_eq!(outer.sum_all(), 21.0);

        assert!(entries.diagonal_embedding(0, 1, 1).is_err());
        assert!(entries.diagonal_embedding(0, 0, 3).is_err());
        assert!(matches!(
            Tensor::scalar(1.0).diagonal_embedding(0, 0, 1),
            Err(TensorError::UnsupportedOperation(_))
        ));

        Ok(())
    }

    #[test]
    fn test_det() -> Result<()> {
        let matrix = Tensor::try_from(vec![[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 2.0]])?;
        let det = matrix.det()?;
        assert_eq!(det.rank(), 0);
        assert!((det.get(&[])? - 6.0).abs() < 1e-12);

        let pivoting = Tensor::try_from(vec![[0.0, 1.0], [1.0, 0.0]])?;
        assert!((pivoting.det()?.get(&[])? + 1.0).abs() < 1e-12);

        let singular = Tensor::try_from(vec![[1.0, 2.0], [2.0, 4.0]])?;
        assert_eq!(singular.det()?.get(&[])?, 0.0);

        assert!(Tensor::<f64>::zeros(&[2, 3]).det().is_err());
        assert!(Tensor::<f64>::zeros(&[3]).det().is_err());

        Ok(())
    }

    #[test]
    fn test_batched_det() -> Result<()> {
        let eye = Tensor::<f32>::eye(3);
        let batch = Tensor::stack(&[&eye, &eye.mul_scalar(2.0), &eye.mul_scalar(-1.0)], 0)?;

        let det = batch.det()?;
        assert_eq!(det.shape(), &[3]);
        let values = det.to_vec();
        assert!((values[0] - 1.0).abs() < 1e-6);
        assert!((values[1] - 8.0).abs() < 1e-6);
        assert!((values[2] + 1.0).abs() < 1e-6);

        Ok(())
    }
}
