use super::*;

/// An iterator over the slices of a tensor along its first axis.
///
/// Every item is a view sharing the buffer of the iterated tensor, see [`Tensor::at`].
pub struct TensorIter<'a, T> {
    tensor: &'a Tensor<T>,
    current_index: usize,
}

impl<'a, T: Element> IntoIterator for &'a Tensor<T> {
    type Item = Tensor<T>;
    type IntoIter = TensorIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        TensorIter {
            tensor: self,
            current_index: 0,
        }
    }
}

impl<T: Element> Iterator for TensorIter<'_, T> {
    type Item = Tensor<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let sub_tensor = self.tensor.at(self.current_index).ok()?;
        self.current_index += 1;
        Some(sub_tensor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self
            .tensor
            .shape()
            .first()
            .map_or(0, |&size| size.saturating_sub(self.current_index));
        (rest, Some(rest))
    }
}

impl<T: Element> ExactSizeIterator for TensorIter<'_, T> {}
