use super::*;
use par_iter::{ExecutionConfig, IntoParallelIterator};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Flat, fixed-length storage shared between a tensor and all of its views.
///
/// Cloning a buffer clones the handle, not the data. The storage is freed when the last handle
/// is dropped. Readers share access while writers are exclusive, so overlapping in-place updates
/// from several threads are serialised rather than racing.
pub struct Buffer<T> {
    data: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Element> Buffer<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Creates a buffer of `size` elements, calling `generator` for each offset in order.
    pub fn from_fn<F>(size: usize, generator: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self::new((0..size).map(generator).collect())
    }

    /// Creates a buffer of `size` elements, calling `generator` for each offset on worker threads.
    /// The order of invocations is unspecified.
    pub fn par_from_fn<F>(size: usize, config: &ExecutionConfig, generator: F) -> Self
    where
        F: Fn(usize) -> T + Send + Sync,
    {
        Self::new(
            (0..size)
                .into_par_iter()
                .with_config(*config)
                .map(generator)
                .collect(),
        )
    }

    /// Like [`Buffer::par_from_fn`] with a fallible generator: returns the first observed error
    /// and drops every computed value in that case.
    pub fn try_par_from_fn<F, E>(
        size: usize,
        config: &ExecutionConfig,
        generator: F,
    ) -> std::result::Result<Self, E>
    where
        F: Fn(usize) -> std::result::Result<T, E> + Send + Sync,
        E: Send,
    {
        (0..size)
            .into_par_iter()
            .with_config(*config)
            .map(generator)
            .try_collect()
            .map(Self::new)
    }

    /// Capacity of the buffer.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, offset: usize) -> Result<T> {
        let data = self.read();
        data.get(offset).copied().ok_or_else(|| {
            TensorError::IndexOutOfBounds(format!(
                "Offset {offset} out of bounds for buffer of size {}",
                data.len()
            ))
        })
    }

    pub fn set(&self, offset: usize, value: T) -> Result<()> {
        let mut data = self.write();
        let size = data.len();
        let slot = data.get_mut(offset).ok_or_else(|| {
            TensorError::IndexOutOfBounds(format!(
                "Offset {offset} out of bounds for buffer of size {size}"
            ))
        })?;
        *slot = value;
        Ok(())
    }

    /// Copies `len` elements starting at `start`.
    pub fn to_vec(&self, start: usize, len: usize) -> Result<Vec<T>> {
        let data = self.read();
        data.get(start..start + len)
            .map(<[T]>::to_vec)
            .ok_or_else(|| {
                TensorError::IndexOutOfBounds(format!(
                    "Range {start}..{} out of bounds for buffer of size {}",
                    start + len,
                    data.len()
                ))
            })
    }

    /// Returns true if both handles point to the same storage.
    pub fn shares_storage(&self, other: &Buffer<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() -> Result<()> {
        let buffer = Buffer::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get(1)?, 2.0);

        buffer.set(1, 5.0)?;
        assert_eq!(buffer.get(1)?, 5.0);

        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        let buffer = Buffer::new(vec![1_i64, 2]);
        assert!(matches!(buffer.get(2), Err(TensorError::IndexOutOfBounds(_))));
        assert!(matches!(buffer.set(5, 0), Err(TensorError::IndexOutOfBounds(_))));
        assert!(buffer.to_vec(1, 2).is_err());
    }

    #[test]
    fn test_shared_handle() -> Result<()> {
        let buffer = Buffer::new(vec![0_i32; 4]);
        let alias = buffer.clone();
        alias.set(3, 7)?;

        assert!(buffer.shares_storage(&alias));
        assert_eq!(buffer.get(3)?, 7);
        assert!(!buffer.shares_storage(&Buffer::new(vec![0_i32; 4])));

        Ok(())
    }

    #[test]
    fn test_sequential_and_parallel_fill_agree() -> Result<()> {
        let config = ExecutionConfig::new().with_threads(3).with_chunk_size(5);
        let sequential = Buffer::from_fn(101, |i| i as f32 * 0.5);
        let parallel = Buffer::par_from_fn(101, &config, |i| i as f32 * 0.5);

        assert_eq!(sequential.to_vec(0, 101)?, parallel.to_vec(0, 101)?);

        Ok(())
    }

    #[test]
    fn test_fallible_parallel_fill() {
        let config = ExecutionConfig::new().with_threads(2);

        let ok = Buffer::try_par_from_fn(10, &config, |i| Ok::<_, String>(i as i64));
        assert_eq!(ok.map(|b| b.len()), Ok(10));

        let failed = Buffer::<i64>::try_par_from_fn(10, &config, |i| {
            if i == 7 { Err(format!("bad offset {i}")) } else { Ok(i as i64) }
        });
        assert!(matches!(failed, Err(msg) if msg == "bad offset 7"));
    }
}
