use super::*;

pub(super) struct Collect<P> {
    producer: P,
    config: ExecutionConfig,
}

impl<P> Collect<P>
where
    P: ParallelProducer,
{
    pub fn new(producer: P, config: ExecutionConfig) -> Self {
        Self { producer, config }
    }

    pub fn collect<B>(self) -> B
    where
        B: FromIterator<P::Item>,
        P::Item: Send,
    {
        let producer = &self.producer;
        let parts = run_chunked(
            producer.len(),
            &self.config,
            Vec::new,
            |parts: &mut Vec<(usize, Vec<P::Item>)>, chunk| {
                let start = chunk.start;
                parts.push((start, chunk.filter_map(|i| producer.get_item(i)).collect()));
                ControlFlow::Continue(())
            },
        );

        in_index_order(parts).collect()
    }

    pub fn try_collect<T, E, B>(self) -> Result<B, E>
    where
        P: ParallelProducer<Item = Result<T, E>>,
        B: FromIterator<T>,
        T: Send,
        E: Send,
    {
        let producer = &self.producer;
        let states = run_chunked(
            producer.len(),
            &self.config,
            || (Vec::new(), None),
            |(parts, failure): &mut (Vec<(usize, Vec<T>)>, Option<(usize, E)>), chunk| {
                let start = chunk.start;
                let mut values = Vec::with_capacity(chunk.len());
                for i in chunk {
                    match producer.get_item(i) {
                        Some(Ok(value)) => values.push(value),
                        Some(Err(err)) => {
                            *failure = Some((i, err));
                            return ControlFlow::Break(());
                        }
                        None => {}
                    }
                }
                parts.push((start, values));
                ControlFlow::Continue(())
            },
        );

        let mut all_parts = Vec::with_capacity(states.len());
        let mut first_failure: Option<(usize, E)> = None;
        for (parts, failure) in states {
            all_parts.push(parts);
            if let Some((index, err)) = failure {
                if first_failure.as_ref().is_none_or(|(seen, _)| index < *seen) {
                    first_failure = Some((index, err));
                }
            }
        }

        match first_failure {
            Some((_, err)) => Err(err),
            None => Ok(in_index_order(all_parts).collect()),
        }
    }
}

/// Flattens per-worker chunk lists back into the original item order.
fn in_index_order<T>(parts: Vec<Vec<(usize, Vec<T>)>>) -> impl Iterator<Item = T> {
    let mut chunks = parts.into_iter().flatten().collect::<Vec<_>>();
    chunks.sort_unstable_by_key(|(start, _)| *start);
    chunks.into_iter().flat_map(|(_, items)| items)
}
