use super::*;

/// Row-major strides of a shape: the last axis is contiguous.
///
/// Maps multi-indices to linear offsets and back over `0..linear_size`. The mapping is pure and
/// can be shared freely between threads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Strides {
    shape: Dims,
    strides: Dims,
    linear_size: usize,
}

impl Strides {
    pub fn new(shape: &[usize]) -> Self {
        let mut strides: Dims = smallvec![1; shape.len()];
        for k in (0..shape.len().saturating_sub(1)).rev() {
            strides[k] = strides[k + 1] * shape[k + 1];
        }

        Self {
            shape: Dims::from_slice(shape),
            strides,
            linear_size: shape.iter().product(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of addressable elements; a rank 0 shape holds a single scalar.
    pub fn linear_size(&self) -> usize {
        self.linear_size
    }

    /// Linear offset of a multi-index.
    pub fn offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(TensorError::ShapeMismatch(format!(
                "Index dimension mismatch: {} != {}",
                index.len(),
                self.rank()
            )));
        }

        let mut offset = 0;
        for (axis, (&idx, &dim)) in index.iter().zip(self.shape.iter()).enumerate() {
            if idx >= dim {
                return Err(TensorError::ShapeMismatch(format!(
                    "Index {idx} out of range for axis {axis} with size {dim}"
                )));
            }
            offset += idx * self.strides[axis];
        }

        Ok(offset)
    }

    /// Multi-index of a linear offset.
    pub fn index(&self, offset: usize) -> Result<Dims> {
        if offset >= self.linear_size {
            return Err(TensorError::IndexOutOfBounds(format!(
                "Offset {offset} out of bounds for shape {:?} with {} elements",
                self.shape, self.linear_size
            )));
        }

        let mut index: Dims = smallvec![0; self.rank()];
        self.unravel(offset, &mut index);
        Ok(index)
    }

    /// Iterates over all multi-indices in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = Dims> + '_ {
        (0..self.linear_size).map(|offset| {
            let mut index: Dims = smallvec![0; self.rank()];
            self.unravel(offset, &mut index);
            index
        })
    }

    /// Writes the multi-index of an in-range `offset` into `index`.
    pub(crate) fn unravel(&self, offset: usize, index: &mut [usize]) {
        let mut rest = offset;
        for (slot, &stride) in index.iter_mut().zip(self.strides.iter()) {
            *slot = rest / stride;
            rest %= stride;
        }
    }

    /// Linear offset of an in-range multi-index, without validation.
    pub(crate) fn ravel(&self, index: &[usize]) -> usize {
        index
            .iter()
            .zip(self.strides.iter())
            .map(|(idx, stride)| idx * stride)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_strides() {
        let strides = Strides::new(&[2, 3, 4]);
        assert_eq!(strides.strides(), &[12, 4, 1]);
        assert_eq!(strides.linear_size(), 24);
        assert_eq!(strides.rank(), 3);
    }

    #[test]
    fn test_scalar_strides() -> Result<()> {
        let strides = Strides::new(&[]);
        assert_eq!(strides.linear_size(), 1);
        assert_eq!(strides.offset(&[])?, 0);
        assert!(strides.index(0)?.is_empty());
        assert_eq!(strides.indices().count(), 1);

        Ok(())
    }

    #[test]
    fn test_offset_and_index() -> Result<()> {
        let strides = Strides::new(&[2, 3, 4]);
        assert_eq!(strides.offset(&[0, 0, 0])?, 0);
        assert_eq!(strides.offset(&[0, 1, 0])?, 4);
        assert_eq!(strides.offset(&[1, 2, 3])?, 23);
        assert_eq!(strides.index(23)?.as_slice(), &[1, 2, 3]);
        assert_eq!(strides.index(13)?.as_slice(), &[1, 0, 1]);

        Ok(())
    }

    #[test]
    fn test_bijection() -> Result<()> {
        let strides = Strides::new(&[3, 1, 4, 2]);
        for offset in 0..strides.linear_size() {
            assert_eq!(strides.offset(&strides.index(offset)?)?, offset);
        }
        for (offset, index) in strides.indices().enumerate() {
            assert_eq!(strides.offset(&index)?, offset);
        }

        Ok(())
    }

    #[test]
    fn test_errors() {
        let strides = Strides::new(&[2, 3]);
        assert!(matches!(
            strides.offset(&[1]),
            Err(TensorError::ShapeMismatch(_))
        ));
        assert!(matches!(
            strides.offset(&[1, 3]),
            Err(TensorError::ShapeMismatch(_))
        ));
        assert!(matches!(
            strides.index(6),
            Err(TensorError::IndexOutOfBounds(_))
        ));
    }

    #[test]
    fn test_zero_sized_axis() {
        let strides = Strides::new(&[0, 3]);
        assert_eq!(strides.linear_size(), 0);
        assert_eq!(strides.indices().count(), 0);
        assert!(strides.index(0).is_err());
    }
}
