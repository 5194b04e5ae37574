use super::*;

impl<T: Element> Tensor<T> {
    /// Concatenates tensors along an existing axis `dim`.
    ///
    /// All tensors must have the same rank and agree on every axis except `dim`.
    pub fn cat(tensors: &[&Tensor<T>], dim: usize) -> Result<Tensor<T>> {
        let Some(first) = tensors.first() else {
            return Err(TensorError::ShapeMismatch(
                "Cannot concatenate an empty list of tensors".to_string(),
            ));
        };

        let rank = first.rank();
        if dim >= rank {
            return Err(TensorError::ShapeMismatch(format!(
                "Axis {dim} out of range for rank {rank}"
            )));
        }

        let mut shape = Dims::from_slice(first.shape());
        shape[dim] = 0;
        for tensor in tensors {
            let other = tensor.shape();
            let compatible = other.len() == rank
                && other
                    .iter()
                    .zip(first.shape())
                    .enumerate()
                    .all(|(axis, (a, b))| axis == dim || a == b);
            if !compatible {
                return Err(TensorError::ShapeMismatch(format!(
                    "Cannot concatenate shapes {:?} and {other:?} along axis {dim}",
                    first.shape()
                )));
            }
            shape[dim] += other[dim];
        }

        let outer: usize = shape[..dim].iter().product();
        let inner: usize = shape[dim + 1..].iter().product();

        let parts = tensors.iter().map(|tensor| tensor.to_vec()).collect::<Vec<_>>();
        let mut data = Vec::with_capacity(shape.iter().product());
        for o in 0..outer {
            for (tensor, part) in tensors.iter().zip(&parts) {
                let block = tensor.shape()[dim] * inner;
                data.extend_from_slice(&part[o * block..(o + 1) * block]);
            }
        }

        Ok(Self::from_parts(data, Strides::new(&shape)))
    }

    /// Stacks tensors of one shape along a new axis inserted at `dim`.
    pub fn stack(tensors: &[&Tensor<T>], dim: usize) -> Result<Tensor<T>> {
        let Some(first) = tensors.first() else {
            return Err(TensorError::ShapeMismatch(
                "Cannot stack an empty list of tensors".to_string(),
            ));
        };

        if dim > first.rank() {
            return Err(TensorError::ShapeMismatch(format!(
                "Axis {dim} out of range for stacking rank {} tensors",
                first.rank()
            )));
        }

        let mut shape = Dims::from_slice(first.shape());
        shape.insert(dim, 1);
        let expanded = tensors
            .iter()
            .map(|tensor| {
                if tensor.shape() != first.shape() {
                    return Err(TensorError::ShapeMismatch(format!(
                        "Cannot stack shapes {:?} and {:?}",
                        first.shape(),
                        tensor.shape()
                    )));
                }
                tensor.view(&shape)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::cat(&expanded.iter().collect::<Vec<_>>(), dim)
    }
}
