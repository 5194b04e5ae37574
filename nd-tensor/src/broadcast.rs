//! Broadcasting: aligning shapes from the right and repeating size-1 axes.

use super::*;

/// Computes the shape every input can be broadcast to.
///
/// Shapes are right-aligned and padded with leading 1s; each resulting axis is the largest size
/// at that position, and every input axis must be 1 or equal to it.
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Dims> {
    let total_dim = shapes.iter().map(|shape| shape.len()).max().unwrap_or(0);

    let mut result: Dims = smallvec![1; total_dim];
    for shape in shapes {
        let pad = total_dim - shape.len();
        for (axis, &size) in shape.iter().enumerate() {
            let slot = &mut result[pad + axis];
            if *slot == 1 {
                *slot = size;
            } else if size != 1 && size != *slot {
                return Err(incompatible(shapes));
            }
        }
    }

    Ok(result)
}

/// Materializes `tensor` under `new_shape`, repeating its size-1 axes.
pub fn broadcast_to<T: Element>(tensor: &Tensor<T>, new_shape: &[usize]) -> Result<Tensor<T>> {
    let shape = tensor.shape();
    if shape.len() > new_shape.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "Cannot broadcast shape {shape:?} to lower rank shape {new_shape:?}"
        )));
    }

    let pad = new_shape.len() - shape.len();
    for (axis, &size) in shape.iter().enumerate() {
        if size != 1 && size != new_shape[pad + axis] {
            return Err(TensorError::ShapeMismatch(format!(
                "Cannot broadcast shape {shape:?} to {new_shape:?}"
            )));
        }
    }

    tracing::trace!(from = ?shape, to = ?new_shape, "broadcasting tensor");

    let source = tensor.strides();
    let target = Strides::new(new_shape);
    let data = tensor.with_data(|data| {
        let mut index: Dims = smallvec![0; target.rank()];
        (0..target.linear_size())
            .map(|offset| {
                target.unravel(offset, &mut index);
                let source_offset: usize = index[pad..]
                    .iter()
                    .zip(shape.iter())
                    .zip(source.strides().iter())
                    .map(|((&idx, &size), &stride)| if size == 1 { 0 } else { idx * stride })
                    .sum();
                data[source_offset]
            })
            .collect::<Vec<_>>()
    });

    Ok(Tensor::from_parts(data, target))
}

/// Broadcasts every tensor to the common shape of all of them.
pub fn broadcast_tensors<T: Element>(tensors: &[&Tensor<T>]) -> Result<Vec<Tensor<T>>> {
    let shapes = tensors.iter().map(|tensor| tensor.shape()).collect::<Vec<_>>();
    let shape = broadcast_shapes(&shapes)?;

    tensors
        .iter()
        .map(|tensor| broadcast_to(tensor, &shape))
        .collect()
}

/// Checks that `a` and `b` can be multiplied with [`Tensor::dot`].
pub fn check_dot<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<()> {
    let (a_shape, b_shape) = (a.shape(), b.shape());
    let (Some(&a_last), false) = (a_shape.last(), b_shape.is_empty()) else {
        return Err(TensorError::UnsupportedOperation(format!(
            "Dot product is not defined for rank 0 operands: {a_shape:?} x {b_shape:?}"
        )));
    };

    let contracted = if b_shape.len() == 1 {
        b_shape[0]
    } else {
        b_shape[b_shape.len() - 2]
    };

    if a_last != contracted {
        return Err(TensorError::ContractViolation(format!(
            "Inner dimensions do not match for dot product: {a_shape:?} x {b_shape:?}"
        )));
    }

    if a_shape.len() > 2 && b_shape.len() > 2 && a_shape[..a_shape.len() - 2] != b_shape[..b_shape.len() - 2] {
        return Err(TensorError::ContractViolation(format!(
            "Batch dimensions do not match for dot product: {a_shape:?} x {b_shape:?}"
        )));
    }

    Ok(())
}

fn incompatible(shapes: &[&[usize]]) -> TensorError {
    TensorError::ShapeMismatch(format!(
        "Shapes {shapes:?} are not compatible and cannot be broadcast"
    ))
}
