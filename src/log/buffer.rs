//! Bipartite ring buffer for log frames
//!
//! A bip buffer hands out *contiguous* write regions of arbitrary size. When
//! the space left at the physical end of the storage is too small for a
//! request, the writer gives up on that tail and starts a second region at
//! offset 0 instead of splitting the allocation. Readers likewise always see
//! one contiguous run of committed bytes.
//!
//! ```text
//!  0        b_size      a_start            a_start+a_size    capacity
//!  |== B ===|  free     |======= A ========|  abandoned tail |
//! ```
//!
//! * Region A holds the oldest committed bytes and is what the reader
//!   consumes. Its end is the high-water mark: after a wrap nothing beyond it
//!   is ever read.
//! * Region B only exists after the writer wrapped. It grows from offset 0
//!   towards `a_start`. When the reader drains A completely, B becomes the
//!   new A, mirroring the writer's wrap.
//!
//! The buffer does no locking. At most one reservation may be outstanding;
//! the logger guarantees that by doing reserve, render and commit under one
//! lock, and [`BipError::Busy`] catches misuse.

use core::cmp::min;
use core::fmt;

/// Bip buffer failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BipError {
    /// The request is larger than the whole buffer
    TooLarge,
    /// No contiguous span of the requested size is free right now
    Full,
    /// A previous reservation has not been committed yet
    Busy,
}

impl fmt::Display for BipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BipError::TooLarge => f.write_str("allocation larger than buffer"),
            BipError::Full => f.write_str("buffer full"),
            BipError::Busy => f.write_str("reservation already outstanding"),
        }
    }
}

/// Result type of bip buffer allocations
pub type BipResult<T> = Result<T, BipError>;

/// Bipartite ring buffer over borrowed storage.
pub struct BipBuffer<'a> {
    data: &'a mut [u8],
    /// Start of region A
    a_start: usize,
    /// Committed bytes in region A
    a_size: usize,
    /// Committed bytes in region B, which always starts at 0
    b_size: usize,
    /// Start of the outstanding reservation
    r_start: usize,
    /// Size of the outstanding reservation, 0 when none
    r_size: usize,
}

impl<'a> BipBuffer<'a> {
    /// Creates an empty buffer using `data` as backing storage.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            a_start: 0,
            a_size: 0,
            b_size: 0,
            r_start: 0,
            r_size: 0,
        }
    }

    /// Total size of the backing storage.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes committed and not yet released.
    pub fn size(&self) -> usize {
        self.a_size + self.b_size
    }

    /// Whether there is nothing to read.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Size of the outstanding reservation, 0 when there is none.
    pub fn reserved(&self) -> usize {
        self.r_size
    }

    /// Reserves exactly `size` contiguous bytes for writing.
    ///
    /// The region is not visible to readers until [`commit`](Self::commit).
    /// If the tail after region A cannot hold `size` bytes the allocation
    /// restarts at offset 0, provided that does not reach into unread data.
    pub fn reserve(&mut self, size: usize) -> BipResult<&mut [u8]> {
        if self.r_size != 0 {
            return Err(BipError::Busy);
        }
        if size > self.capacity() {
            return Err(BipError::TooLarge);
        }

        let start = if self.b_size > 0 {
            // Already wrapped: B may grow up to the start of A.
            if self.a_start - self.b_size < size {
                return Err(BipError::Full);
            }
            self.b_size
        } else {
            let a_end = self.a_start + self.a_size;
            if self.capacity() - a_end >= size {
                a_end
            } else if self.a_start >= size {
                0
            } else {
                return Err(BipError::Full);
            }
        };

        self.r_start = start;
        self.r_size = size;
        Ok(&mut self.data[start..start + size])
    }

    /// Publishes the first `len` bytes of the outstanding reservation.
    ///
    /// `len` is clamped to the reserved size; `0` cancels the reservation.
    /// Does nothing if there is no reservation.
    pub fn commit(&mut self, len: usize) {
        if self.r_size == 0 {
            return;
        }

        let len = min(len, self.r_size);
        if len > 0 {
            if self.a_size == 0 && self.b_size == 0 {
                self.a_start = self.r_start;
                self.a_size = len;
            } else if self.r_start == self.a_start + self.a_size {
                self.a_size += len;
            } else {
                self.b_size += len;
            }
        }

        self.r_start = 0;
        self.r_size = 0;
    }

    /// Next contiguous run of committed, unread bytes.
    pub fn next_readable(&self) -> Option<&[u8]> {
        if self.a_size == 0 {
            return None;
        }
        Some(&self.data[self.a_start..self.a_start + self.a_size])
    }

    /// Marks `len` bytes at the front of the readable run as consumed.
    ///
    /// `len` is clamped to the length [`next_readable`](Self::next_readable)
    /// would return.
    pub fn release(&mut self, len: usize) {
        let len = min(len, self.a_size);
        self.a_start += len;
        self.a_size -= len;

        if self.a_size == 0 {
            // The reader reached the high-water mark: follow the writer to 0.
            self.a_start = 0;
            self.a_size = self.b_size;
            self.b_size = 0;
        }
    }

    #[cfg(test)]
    fn reserved_offset(&self) -> usize {
        self.r_start
    }

    #[cfg(test)]
    pub(crate) fn next_readable_mut(&mut self) -> Option<&mut [u8]> {
        if self.a_size == 0 {
            return None;
        }
        Some(&mut self.data[self.a_start..self.a_start + self.a_size])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{kassert, test_case};
    use std::collections::VecDeque;
    use std::vec;

    fn write(buf: &mut BipBuffer<'_>, bytes: &[u8]) -> BipResult<()> {
        let region = buf.reserve(bytes.len())?;
        region.copy_from_slice(bytes);
        buf.commit(bytes.len());
        Ok(())
    }

    test_case!(test_reserve_commit_read_release, {
        let mut storage = [0u8; 32];
        let mut buf = BipBuffer::new(&mut storage);
        kassert!(buf.is_empty());
        kassert!(buf.next_readable().is_none());

        write(&mut buf, b"hello").unwrap();
        kassert!(buf.size() == 5);
        kassert!(buf.next_readable() == Some(&b"hello"[..]));

        buf.release(5);
        kassert!(buf.is_empty());
        kassert!(buf.next_readable().is_none());
    });

    test_case!(test_uncommitted_bytes_are_invisible, {
        let mut storage = [0u8; 16];
        let mut buf = BipBuffer::new(&mut storage);
        buf.reserve(4).unwrap().copy_from_slice(b"abcd");
        kassert!(buf.reserved() == 4);
        kassert!(buf.next_readable().is_none());
        kassert!(buf.size() == 0);
        buf.commit(4);
        kassert!(buf.next_readable() == Some(&b"abcd"[..]));
    });

    test_case!(test_short_commit, {
        let mut storage = [0u8; 16];
        let mut buf = BipBuffer::new(&mut storage);
        buf.reserve(10).unwrap()[..3].copy_from_slice(b"abc");
        buf.commit(3);
        kassert!(buf.size() == 3);
        kassert!(buf.next_readable() == Some(&b"abc"[..]));

        // The unused seven bytes went straight back to the free space.
        write(&mut buf, b"defghijklmnop").unwrap();
        kassert!(buf.size() == 16);
    });

    test_case!(test_zero_commit_cancels, {
        let mut storage = [0u8; 8];
        let mut buf = BipBuffer::new(&mut storage);
        buf.reserve(8).unwrap();
        buf.commit(0);
        kassert!(buf.reserved() == 0);
        kassert!(buf.is_empty());
        kassert!(buf.reserve(8).is_ok());
    });

    test_case!(test_commit_is_clamped_to_reservation, {
        let mut storage = [0u8; 8];
        let mut buf = BipBuffer::new(&mut storage);
        buf.reserve(2).unwrap();
        buf.commit(100);
        kassert!(buf.size() == 2);
    });

    test_case!(test_errors, {
        let mut storage = [0u8; 8];
        let mut buf = BipBuffer::new(&mut storage);
        kassert!(buf.reserve(9) == Err(BipError::TooLarge));

        buf.reserve(4).unwrap();
        kassert!(buf.reserve(1) == Err(BipError::Busy));
        buf.commit(4);

        kassert!(buf.reserve(5) == Err(BipError::Full));
        kassert!(buf.reserve(4).is_ok());
        buf.commit(4);
        kassert!(buf.reserve(1) == Err(BipError::Full));
    });

    test_case!(test_wrap_restarts_at_zero, {
        let mut storage = [0u8; 16];
        let mut buf = BipBuffer::new(&mut storage);

        // Fill to within one byte of capacity, then drain the first half.
        write(&mut buf, &[1; 8]).unwrap();
        write(&mut buf, &[2; 7]).unwrap();
        buf.release(8);

        // Two bytes do not fit in the one-byte tail: wrap to offset 0.
        let region = buf.reserve(2).unwrap();
        region.copy_from_slice(&[3, 3]);
        kassert!(buf.reserved_offset() == 0);
        buf.commit(2);

        // Unread data is untouched and still comes first.
        kassert!(buf.next_readable() == Some(&[2u8; 7][..]));
        kassert!(buf.size() == 9);

        // B may grow up to the start of A but not into it.
        kassert!(buf.reserve(7) == Err(BipError::Full));
        kassert!(buf.reserve(6).is_ok());
        kassert!(buf.reserved_offset() == 2);
        buf.commit(0);

        // Once A is drained the reader follows the writer to offset 0.
        buf.release(7);
        kassert!(buf.next_readable() == Some(&[3u8, 3][..]));
    });

    test_case!(test_fully_released_buffer_restarts_at_zero, {
        let mut storage = [0u8; 16];
        let mut buf = BipBuffer::new(&mut storage);
        write(&mut buf, &[7; 15]).unwrap();
        buf.release(15);

        buf.reserve(10).unwrap();
        kassert!(buf.reserved_offset() == 0);
        buf.commit(10);
        kassert!(buf.size() == 10);
    });

    test_case!(test_release_is_clamped, {
        let mut storage = [0u8; 16];
        let mut buf = BipBuffer::new(&mut storage);
        write(&mut buf, b"abc").unwrap();
        buf.release(100);
        kassert!(buf.is_empty());
    });

    test_case!(test_release_during_reservation, {
        let mut storage = [0u8; 16];
        let mut buf = BipBuffer::new(&mut storage);
        write(&mut buf, b"abcd").unwrap();

        buf.reserve(4).unwrap().copy_from_slice(b"efgh");
        buf.release(4);
        buf.commit(4);
        kassert!(buf.next_readable() == Some(&b"efgh"[..]));
    });

    test_case!(test_matches_fifo_model, {
        let mut storage = vec![0u8; 97];
        let mut buf = BipBuffer::new(&mut storage);
        let mut model: VecDeque<u8> = VecDeque::new();
        let mut seed: u32 = 0x1234_5678;
        let mut next = move || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (seed >> 16) as usize
        };
        let mut counter: u8 = 0;

        for _ in 0..5000 {
            if next() % 3 != 0 {
                let len = 1 + next() % 20;
                let written = match buf.reserve(len) {
                    Ok(region) => {
                        let used = 1 + next() % len;
                        for byte in region[..used].iter_mut() {
                            counter = counter.wrapping_add(1);
                            *byte = counter;
                            model.push_back(counter);
                        }
                        used
                    }
                    Err(err) => {
                        kassert!(err == BipError::Full);
                        0
                    }
                };
                if written > 0 {
                    buf.commit(written);
                }
            } else if let Some(readable) = buf.next_readable() {
                let take = 1 + next() % readable.len();
                for &byte in &readable[..take] {
                    kassert!(model.pop_front() == Some(byte));
                }
                buf.release(take);
            }
            kassert!(buf.size() == model.len());
        }
    });
}
