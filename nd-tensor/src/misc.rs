use super::*;
use std::fmt;

impl<T: Element> PartialEq for Tensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && Tensor::with_pair(self, other, |left, right| left == right)
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("type", &T::NAME)
            .field("shape", &self.shape())
            .field("buffer_start", &self.buffer_start)
            .field("elements", &self.to_vec())
            .finish()
    }
}
