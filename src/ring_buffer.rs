//! Lock-free single-producer/single-consumer sample ring buffer
//!
//! Moves finished sample blocks from the block-processing call site to a
//! consumer (a device callback or a streaming encoder) without locks or
//! allocation. One thread may call [`SpscRing::write`], one other thread may
//! call [`SpscRing::read`]; the cursors are plain atomics with
//! acquire/release ordering, so neither side ever blocks.
//!
//! Capacity semantics: one slot is kept unoccupied to distinguish a full
//! ring from an empty one, so a ring created with capacity `n` stores at
//! most `n - 1` samples. A full ring silently drops the tail of a write
//! (the producer never blocks); an empty ring returns fewer samples than
//! requested (the consumer never blocks).

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed-capacity lock-free SPSC ring of `f32` samples.
pub struct SpscRing {
    data: UnsafeCell<Box<[f32]>>,
    capacity: usize,
    read_pos: AtomicUsize,
    write_pos: AtomicUsize,
}

// One producer and one consumer may hold references from different threads.
// The cursor protocol guarantees they never touch the same slots: the
// producer only writes between write_pos and read_pos - 1, the consumer only
// reads between read_pos and write_pos.
unsafe impl Send for SpscRing {}
unsafe impl Sync for SpscRing {}

impl SpscRing {
    /// Create a ring holding up to `capacity - 1` samples.
    ///
    /// The backing storage is allocated once here; no further allocation
    /// happens on either side.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            data: UnsafeCell::new(vec![0.0; capacity].into_boxed_slice()),
            capacity,
            read_pos: AtomicUsize::new(0),
            write_pos: AtomicUsize::new(0),
        }
    }

    /// Total slot count (usable capacity is one less).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently readable.
    pub fn available(&self) -> usize {
        let write_pos = self.write_pos.load(Ordering::Acquire);
        let read_pos = self.read_pos.load(Ordering::Acquire);
        (write_pos + self.capacity - read_pos) % self.capacity
    }

    /// Number of samples that can be written without dropping.
    pub fn free(&self) -> usize {
        self.capacity - 1 - self.available()
    }

    /// Write up to `data.len()` samples; returns how many were accepted.
    ///
    /// Producer side only. Never blocks; excess samples are dropped.
    pub fn write(&self, data: &[f32]) -> usize {
        let write_pos = self.write_pos.load(Ordering::Relaxed);
        let read_pos = self.read_pos.load(Ordering::Acquire);

        let free = (read_pos + self.capacity - write_pos - 1) % self.capacity;
        let to_write = data.len().min(free);

        let buf = unsafe { &mut *self.data.get() };
        for (i, &sample) in data.iter().take(to_write).enumerate() {
            buf[(write_pos + i) % self.capacity] = sample;
        }

        self.write_pos
            .store((write_pos + to_write) % self.capacity, Ordering::Release);
        to_write
    }

    /// Read up to `out.len()` samples; returns how many were produced.
    ///
    /// Consumer side only. Never blocks; an empty ring returns 0.
    pub fn read(&self, out: &mut [f32]) -> usize {
        let read_pos = self.read_pos.load(Ordering::Relaxed);
        let write_pos = self.write_pos.load(Ordering::Acquire);

        let available = (write_pos + self.capacity - read_pos) % self.capacity;
        let to_read = out.len().min(available);

        let buf = unsafe { &*self.data.get() };
        for (i, slot) in out.iter_mut().take(to_read).enumerate() {
            *slot = buf[(read_pos + i) % self.capacity];
        }

        self.read_pos
            .store((read_pos + to_read) % self.capacity, Ordering::Release);
        to_read
    }

    /// Discard all buffered samples (consumer side).
    pub fn clear(&self) {
        let write_pos = self.write_pos.load(Ordering::Acquire);
        self.read_pos.store(write_pos, Ordering::Release);
    }
}
