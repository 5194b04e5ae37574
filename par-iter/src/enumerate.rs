use super::*;

#[doc(hidden)]
pub struct Enumerate<P> {
    inner: P,
}

impl<P> Enumerate<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: ParallelProducer> ParallelProducer for Enumerate<P> {
    type Item = (usize, P::Item);

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get_item(&self, index: usize) -> Option<Self::Item> {
        self.inner.get_item(index).map(|item| (index, item))
    }
}
