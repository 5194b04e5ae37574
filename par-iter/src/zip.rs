use super::*;

#[doc(hidden)]
pub struct Zip<A, B> {
    a: A,
    b: B,
}

impl<A, B> Zip<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: ParallelProducer, B: ParallelProducer> ParallelProducer for Zip<A, B> {
    type Item = (A::Item, B::Item);

    fn len(&self) -> usize {
        self.a.len().min(self.b.len())
    }

    fn get_item(&self, index: usize) -> Option<Self::Item> {
        Some((self.a.get_item(index)?, self.b.get_item(index)?))
    }
}
