use super::*;

impl<T: Element> Tensor<T> {
    pub fn shape(&self) -> &[usize] {
        self.strides.shape()
    }

    pub fn rank(&self) -> usize {
        self.strides.rank()
    }

    /// Number of elements addressed by this tensor.
    pub fn linear_size(&self) -> usize {
        self.strides.linear_size()
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn buffer(&self) -> &Buffer<T> {
        &self.buffer
    }

    /// Offset of the first element of this tensor inside its buffer.
    pub fn buffer_start(&self) -> usize {
        self.buffer_start
    }

    /// Returns true if both tensors read and write the same storage.
    pub fn shares_buffer(&self, other: &Tensor<T>) -> bool {
        self.buffer.shares_storage(&other.buffer)
    }

    /// Gets an element at a multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let offset = self.strides.offset(index)?;
        self.buffer.get(self.buffer_start + offset)
    }

    /// Sets an element at a multi-dimensional index. The change is visible through every view
    /// sharing the buffer.
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        let offset = self.strides.offset(index)?;
        self.buffer.set(self.buffer_start + offset, value)
    }

    /// Returns a view of the `i`-th slice along the first axis.
    pub fn at(&self, i: usize) -> Result<Tensor<T>> {
        let Some((&first, rest)) = self.shape().split_first() else {
            return Err(TensorError::IndexOutOfBounds(
                "Cannot index into a rank 0 tensor".to_string(),
            ));
        };

        if i >= first {
            return Err(TensorError::IndexOutOfBounds(format!(
                "Index {i} out of bounds for axis 0 with size {first}"
            )));
        }

        let shape = if rest.is_empty() { &[1][..] } else { rest };
        let strides = Strides::new(shape);
        let buffer_start = self.buffer_start + i * strides.linear_size();

        Ok(Tensor {
            buffer: self.buffer.clone(),
            strides,
            buffer_start,
        })
    }

    /// Copies the elements into a fresh buffer.
    pub fn copy(&self) -> Tensor<T> {
        tracing::trace!(shape = ?self.shape(), "copying tensor");
        Self::from_parts(self.to_vec(), self.strides.clone())
    }

    /// Returns a view of the same data under a new shape.
    pub fn view(&self, new_shape: &[usize]) -> Result<Tensor<T>> {
        let strides = Strides::new(new_shape);
        if strides.linear_size() != self.linear_size() {
            return Err(TensorError::ShapeMismatch(format!(
                "Cannot reshape tensor of size {} to size {}",
                self.linear_size(),
                strides.linear_size()
            )));
        }

        Ok(Tensor {
            buffer: self.buffer.clone(),
            strides,
            buffer_start: self.buffer_start,
        })
    }

    /// Returns a view shaped like `other`.
    pub fn view_as(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.view(other.shape())
    }

    /// Returns a view with the axes `start_dim..=end_dim` collapsed into one.
    pub fn flatten(&self, start_dim: usize, end_dim: usize) -> Result<Tensor<T>> {
        if self.rank() == 0 {
            return self.view(&[1]);
        }

        if start_dim > end_dim || end_dim >= self.rank() {
            return Err(TensorError::ShapeMismatch(format!(
                "Invalid flatten range {start_dim}..={end_dim} for rank {}",
                self.rank()
            )));
        }

        let shape = self.shape();
        let mut new_shape: Dims = Dims::from_slice(&shape[..start_dim]);
        new_shape.push(shape[start_dim..=end_dim].iter().product());
        new_shape.extend_from_slice(&shape[end_dim + 1..]);

        self.view(&new_shape)
    }

    /// Copies the elements out in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.with_data(<[T]>::to_vec)
    }

    /// Iterates over a snapshot of the elements in row-major order.
    pub fn elements(&self) -> impl Iterator<Item = T> {
        self.to_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view() -> Result<()> {
        let tensor = Tensor::<i32>::arange(25)?;
        let view = tensor.view(&[5, 5])?;
        assert_eq!(view.shape(), &[5, 5]);
        assert_eq!(view.get(&[0, 0])?, 0);
        assert_eq!(view.get(&[1, 0])?, 5);
        assert_eq!(view.get(&[4, 4])?, 24);
        assert!(view.shares_buffer(&tensor));

        assert!(matches!(
            tensor.view(&[4, 5]),
            Err(TensorError::ShapeMismatch(_))
        ));

        Ok(())
    }

    #[test]
    fn test_view_aliasing() -> Result<()> {
        let tensor = Tensor::<f64>::zeros(&[2, 3]);
        let mut view = tensor.view(&[6])?;
        view.set(&[4], 9.0)?;
        assert_eq!(tensor.get(&[1, 1])?, 9.0);

        let mut detached = tensor.copy();
        detached.set(&[0, 0], 1.0)?;
        assert_eq!(tensor.get(&[0, 0])?, 0.0);
        assert!(!detached.shares_buffer(&tensor));

        Ok(())
    }

    #[test]
    fn test_at_is_a_row_view() -> Result<()> {
        let tensor = Tensor::<i64>::arange(12)?.view(&[4, 3])?;
        let mut row = tensor.at(2)?;
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.buffer_start(), 6);
        assert_eq!(row.to_vec(), vec![6, 7, 8]);

        row.set(&[1], -1)?;
        assert_eq!(tensor.get(&[2, 1])?, -1);

        assert!(matches!(tensor.at(4), Err(TensorError::IndexOutOfBounds(_))));
        assert!(Tensor::scalar(1_i64).at(0).is_err());

        let element = row.at(0)?;
        assert_eq!(element.shape(), &[1]);
        assert_eq!(element.to_vec(), vec![6]);

        Ok(())
    }

    #[test]
    fn test_get_errors() {
        let tensor = Tensor::<i32>::zeros(&[2, 2]);
        assert!(matches!(
            tensor.get(&[0]),
            Err(TensorError::ShapeMismatch(_))
        ));
        assert!(matches!(
            tensor.get(&[2, 0]),
            Err(TensorError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_flatten() -> Result<()> {
        let tensor = Tensor::<i32>::arange(24)?.view(&[2, 3, 4])?;
        assert_eq!(tensor.flatten(0, 2)?.shape(), &[24]);
        assert_eq!(tensor.flatten(1, 2)?.shape(), &[2, 12]);
        assert_eq!(tensor.flatten(0, 1)?.shape(), &[6, 4]);
        assert_eq!(tensor.flatten(1, 1)?.shape(), &[2, 3, 4]);
        assert!(tensor.flatten(2, 1).is_err());
        assert!(tensor.flatten(0, 3).is_err());
        assert_eq!(Tensor::scalar(3).flatten(0, 0)?.shape(), &[1]);

        Ok(())
    }

    #[test]
    fn test_view_as() -> Result<()> {
        let tensor = Tensor::<f32>::ones(&[6]);
        let target = Tensor::<f32>::zeros(&[3, 2]);
        assert_eq!(tensor.view_as(&target)?.shape(), &[3, 2]);

        Ok(())
    }
}
