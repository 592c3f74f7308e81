//! Single-producer/single-consumer byte ring buffer backing each modem RX
//! queue (one per protocol/slot).
//!
//! The producer (the `ModemLink` reader) calls [`RingBuffer::add_data`];
//! the consumer (the owning protocol processor) calls
//! [`RingBuffer::get_data`]. Both run on the same clock thread in this
//! crate's single-threaded model, so no internal locking is required — the
//! invariant `len + free == capacity` is maintained by construction.

#[derive(Debug)]
pub struct RingBuffer {
    buf: Vec<u8>,
    capacity: usize,
    head: usize, // next write position
    tail: usize, // next read position
    len: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        RingBuffer {
            buf: vec![0u8; capacity],
            capacity,
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn free_space(&self) -> usize {
        self.capacity - self.len
    }

    /// Appends `data` to the buffer. Returns `false` (and writes nothing)
    /// if there isn't enough free space — callers should treat this as an
    /// overflow condition, not retry partial writes.
    pub fn add_data(&mut self, data: &[u8]) -> bool {
        if data.len() > self.free_space() {
            return false;
        }
        for &byte in data {
            self.buf[self.head] = byte;
            self.head = (self.head + 1) % self.capacity;
        }
        self.len += data.len();
        true
    }

    /// Removes and returns up to `max_len` bytes from the front of the
    /// buffer.
    pub fn get_data(&mut self, max_len: usize) -> Vec<u8> {
        let n = max_len.min(self.len);
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.buf[self.tail]);
            self.tail = (self.tail + 1) % self.capacity;
        }
        self.len -= n;
        out
    }

    /// Drops all buffered data without reading it (used on call reset).
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_len_plus_free_equals_capacity() {
        let mut rb = RingBuffer::new(16);
        assert_eq!(rb.len() + rb.free_space(), rb.capacity());
        rb.add_data(&[1, 2, 3]);
        assert_eq!(rb.len() + rb.free_space(), rb.capacity());
        rb.get_data(2);
        assert_eq!(rb.len() + rb.free_space(), rb.capacity());
    }

    #[test]
    fn fifo_ordering_wraps_correctly() {
        let mut rb = RingBuffer::new(4);
        assert!(rb.add_data(&[1, 2, 3]));
        assert_eq!(rb.get_data(2), vec![1, 2]);
        assert!(rb.add_data(&[4, 5]));
        assert_eq!(rb.get_data(4), vec![3, 4, 5]);
        assert!(rb.is_empty());
    }

    #[test]
    fn rejects_overflow() {
        let mut rb = RingBuffer::new(4);
        assert!(rb.add_data(&[1, 2, 3, 4]));
        assert!(!rb.add_data(&[5]));
        assert_eq!(rb.len(), 4);
    }
}
