//! Reusable scratch buffers for chunked binary transfer
//!
//! A [`BufferPool`] is created for one top-level operation (one archive
//! write, one archive read, one fingerprint) and handed down to every
//! struct-array transfer it performs. Rentals are RAII guards: the buffer
//! goes back to the pool when the guard is dropped, which also covers early
//! returns through `?`.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

/// Number of elements moved per chunk
pub const CHUNK_ELEMENTS: usize = 1024;

/// Free buffers kept for reuse; extra returns are dropped
const MAX_POOLED: usize = 4;

/// Pool of byte buffers shared by the transfers of one operation
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Rent a zeroed buffer of exactly `len` bytes
    pub fn rent(&self, len: usize) -> PooledBuffer<'_> {
        let mut buffer = self.free.lock().pop().unwrap_or_default();
        buffer.clear();
        buffer.resize(len, 0);
        PooledBuffer {
            pool: self,
            buffer,
        }
    }

    /// Rent a buffer sized for one chunk of `stride`-byte elements
    pub fn rent_chunk(&self, stride: usize) -> PooledBuffer<'_> {
        self.rent(stride * CHUNK_ELEMENTS)
    }

    /// Number of buffers currently waiting for reuse
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    fn give_back(&self, buffer: Vec<u8>) {
        let mut free = self.free.lock();
        if free.len() < MAX_POOLED {
            free.push(buffer);
        }
    }
}

/// Buffer rented from a [`BufferPool`]
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buffer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_and_return() {
        let pool = BufferPool::new();
        assert_eq!(pool.available(), 0);
        {
            let buf = pool.rent(16);
            assert_eq!(buf.len(), 16);
            assert_eq!(pool.available(), 0);
        }
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_reused_buffer_is_zeroed() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.rent(8);
            buf.fill(0xAB);
        }
        let buf = pool.rent(4);
        assert_eq!(&buf[..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_returned_on_error_path() {
        fn failing(pool: &BufferPool) -> Result<(), String> {
            let _buf = pool.rent_chunk(12);
            Err::<(), _>("boom".to_string())?;
            Ok(())
        }

        let pool = BufferPool::new();
        assert!(failing(&pool).is_err());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_pool_is_bounded() {
        let pool = BufferPool::new();
        let rentals: Vec<_> = (0..MAX_POOLED + 3).map(|_| pool.rent(1)).collect();
        drop(rentals);
        assert_eq!(pool.available(), MAX_POOLED);
    }
}
