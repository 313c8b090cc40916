//! Log system core implementation
//!
//! [`Logger`] owns the bip buffer, the area registry and the callbacks. It
//! can be instantiated independently for testing; the kernel keeps one
//! instance behind [`crate::log::init`].
//!
//! # Producer path
//!
//! 1. Area/level check against the registry (atomics only, no lock)
//! 2. Take the spin lock, assign the next sequence number
//! 3. Reserve a worst-case frame, render the message straight into it,
//!    write the header, commit the bytes actually used
//! 4. Drop the lock, then run the notify and immediate callbacks
//!
//! A full buffer drops the record and bumps a counter. Producers never wait
//! for the consumer.
//!
//! # Consumer path
//!
//! [`Logger::drain`] copies one frame out under the same lock and releases
//! it. [`Logger::flush`] repeats that until the buffer is empty, handing
//! each record to the flush callback outside the lock.

use core::fmt;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use super::area::{AreaRegistry, LogArea};
use super::buffer::BipBuffer;
use super::config::{MAX_FRAME_SIZE, MAX_LOG_MESSAGE_LENGTH};
use super::entry::{LogEntry, render, utf8_prefix};
use super::frame::{FrameError, FrameHeader, HEADER_SIZE};
use super::level::LogLevel;
use crate::sync::SpinLock;

/// Synchronous side-channel output, called from inside [`Logger::log`].
///
/// Must be fast and must not log.
pub type ImmediateFn = fn(&LogEntry<'_>);

/// Per-record output used by [`Logger::flush`].
pub type FlushFn = fn(&LogEntry<'_>);

/// Called after a record has been committed, typically to wake the logger task.
pub type NotifyFn = fn();

/// Area name reported when the logger talks about itself
const LOGGER_AREA_NAME: &str = "log";

/// Poison state: healthy, or the first [`FrameError`] seen by the consumer
const HEALTHY: u8 = 0;
const POISON_TRUNCATED: u8 = 1;
const POISON_CORRUPT: u8 = 2;

const fn poison_code(err: FrameError) -> u8 {
    match err {
        FrameError::Truncated => POISON_TRUNCATED,
        FrameError::Corrupt => POISON_CORRUPT,
    }
}

const fn poison_error(code: u8) -> Option<FrameError> {
    match code {
        HEALTHY => None,
        POISON_TRUNCATED => Some(FrameError::Truncated),
        _ => Some(FrameError::Corrupt),
    }
}

/// Consumer-side failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainError {
    /// Nothing to read
    Empty,
    /// The next record does not fit in the caller's buffer; it was not consumed
    Oversized {
        /// Bytes needed to hold the record
        required: usize,
    },
    /// The buffer contents are inconsistent; the logger stops draining
    Corrupt(FrameError),
}

impl fmt::Display for DrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrainError::Empty => f.write_str("log buffer empty"),
            DrainError::Oversized { required } => {
                write!(f, "log record needs {} bytes", required)
            }
            DrainError::Corrupt(err) => write!(f, "log buffer corrupt: {}", err),
        }
    }
}

/// What happened to a record on the buffered path
#[derive(Clone, Copy)]
enum Outcome {
    /// Stored; carries the payload length
    Committed(usize),
    /// No room in the buffer
    Dropped,
    /// The logger has no backing store
    Unbuffered,
}

/// State protected by the logger lock
struct LogState<'a> {
    buffer: Option<BipBuffer<'a>>,
    sequence: u16,
    immediate: Option<ImmediateFn>,
    flush: Option<FlushFn>,
    notify: Option<NotifyFn>,
}

impl LogState<'_> {
    fn next_sequence(&mut self) -> u16 {
        let sequence = self.sequence;
        self.sequence = sequence.wrapping_add(1);
        sequence
    }

    fn pending(&self) -> usize {
        self.buffer.as_ref().map_or(0, BipBuffer::size)
    }

    /// Reserve, render, commit. `copy` receives the payload as well when set.
    fn write_record(
        &mut self,
        header: FrameHeader,
        args: fmt::Arguments<'_>,
        copy: Option<&mut [u8; MAX_LOG_MESSAGE_LENGTH]>,
    ) -> Outcome {
        let Some(buffer) = self.buffer.as_mut() else {
            return Outcome::Unbuffered;
        };
        let Ok(region) = buffer.reserve(MAX_FRAME_SIZE) else {
            return Outcome::Dropped;
        };

        let (head, payload) = region.split_at_mut(HEADER_SIZE);
        let len = render(payload, args);
        let header = FrameHeader {
            payload_len: len as u16,
            ..header
        };
        head.copy_from_slice(&header.to_bytes());
        if let Some(copy) = copy {
            copy[..len].copy_from_slice(&payload[..len]);
        }

        buffer.commit(header.frame_len());
        Outcome::Committed(len)
    }
}

/// Core logging system
pub struct Logger<'a> {
    areas: AreaRegistry,
    state: SpinLock<LogState<'a>>,
    /// Mirror of the buffer's unread size, readable without the lock
    pending: AtomicUsize,
    dropped: AtomicUsize,
    poison: AtomicU8,
}

impl<'a> Logger<'a> {
    /// Creates a logger that buffers records in `storage`.
    ///
    /// `storage` should hold at least [`MAX_FRAME_SIZE`] bytes; smaller
    /// buffers drop every record.
    pub fn new(storage: &'a mut [u8]) -> Self {
        Self::with_buffer(Some(BipBuffer::new(storage)), None)
    }

    /// Creates a logger without a backing store that only emits records
    /// through `output`, for use before memory for the buffer exists.
    pub fn immediate_only(output: ImmediateFn) -> Self {
        Self::with_buffer(None, Some(output))
    }

    fn with_buffer(buffer: Option<BipBuffer<'a>>, immediate: Option<ImmediateFn>) -> Self {
        Self {
            areas: AreaRegistry::new(),
            state: SpinLock::new(LogState {
                buffer,
                sequence: 0,
                immediate,
                flush: None,
                notify: None,
            }),
            pending: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
            poison: AtomicU8::new(HEALTHY),
        }
    }

    /// Registers a log area. Only possible while the logger is not shared yet.
    pub fn register_area(&mut self, area: u8, name: &'static str, level: LogLevel) {
        self.areas.register(area, name, level);
    }

    /// Registers every area of a table.
    pub fn register_areas(&mut self, areas: &[LogArea]) {
        self.areas.register_all(areas);
    }

    /// Sets or clears the immediate-mode callback.
    pub fn set_immediate(&self, output: Option<ImmediateFn>) {
        self.state.lock().immediate = output;
    }

    /// Sets or clears the flush callback.
    pub fn set_flush(&self, output: Option<FlushFn>) {
        self.state.lock().flush = output;
    }

    /// Sets or clears the callback run after each committed record.
    pub fn set_notify(&self, notify: Option<NotifyFn>) {
        self.state.lock().notify = notify;
    }

    /// The area registry
    pub fn areas(&self) -> &AreaRegistry {
        &self.areas
    }

    /// Registered name of `area`
    pub fn area_name(&self, area: u8) -> &'static str {
        self.areas.name(area)
    }

    /// Current threshold of `area`
    pub fn level(&self, area: u8) -> LogLevel {
        self.areas.threshold(area)
    }

    /// Changes the threshold of `area` at runtime.
    pub fn set_level(&self, area: u8, level: LogLevel) {
        self.areas.set_threshold(area, level);
    }

    /// Whether a record of `level` in `area` would be recorded.
    #[inline(always)]
    pub fn is_enabled(&self, level: LogLevel, area: u8) -> bool {
        self.areas.is_enabled(level, area)
    }

    /// Records a message.
    ///
    /// Filtered records cost one table lookup. Accepted records always use a
    /// sequence number, even when the buffer is full and the record is
    /// dropped, so the consumer can see the gap.
    pub fn log(&self, level: LogLevel, area: u8, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level, area) {
            return;
        }

        let mut copy = [0u8; MAX_LOG_MESSAGE_LENGTH];
        let (sequence, outcome, immediate, notify) = {
            let mut state = self.state.lock();
            let sequence = state.next_sequence();
            let immediate = state.immediate;
            let header = FrameHeader {
                payload_len: 0,
                area,
                level,
                sequence,
            };
            let copy = if immediate.is_some() {
                Some(&mut copy)
            } else {
                None
            };
            let outcome = state.write_record(header, args, copy);
            if let Outcome::Committed(_) = outcome {
                self.pending.store(state.pending(), Ordering::Relaxed);
            }
            (sequence, outcome, immediate, state.notify)
        };

        match outcome {
            Outcome::Committed(_) => {
                if let Some(notify) = notify {
                    notify();
                }
            }
            Outcome::Dropped => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::Unbuffered => {}
        }

        if let Some(immediate) = immediate {
            let len = match outcome {
                Outcome::Committed(len) => len,
                Outcome::Dropped | Outcome::Unbuffered => render(&mut copy, args),
            };
            let entry = LogEntry::new(
                area,
                self.areas.name(area),
                level,
                sequence,
                utf8_prefix(&copy[..len]),
            );
            immediate(&entry);
        }
    }

    /// Copies the next frame (header and payload) into `scratch` and removes
    /// it from the buffer, returning the frame length.
    ///
    /// A frame larger than `scratch` is reported as
    /// [`DrainError::Oversized`] and stays in the buffer.
    pub fn drain(&self, scratch: &mut [u8]) -> Result<usize, DrainError> {
        if let Some(err) = self.corruption() {
            return Err(DrainError::Corrupt(err));
        }

        let mut state = self.state.lock();
        let Some(buffer) = state.buffer.as_mut() else {
            return Err(DrainError::Empty);
        };
        let Some(readable) = buffer.next_readable() else {
            return Err(DrainError::Empty);
        };

        let header = match FrameHeader::decode(readable) {
            Ok(header) if header.payload_len as usize <= MAX_LOG_MESSAGE_LENGTH => header,
            Ok(_) => {
                drop(state);
                return Err(self.poison(FrameError::Corrupt));
            }
            Err(err) => {
                drop(state);
                return Err(self.poison(err));
            }
        };

        let frame_len = header.frame_len();
        if frame_len > scratch.len() {
            return Err(DrainError::Oversized {
                required: frame_len,
            });
        }

        scratch[..frame_len].copy_from_slice(&readable[..frame_len]);
        buffer.release(frame_len);
        self.pending.store(buffer.size(), Ordering::Relaxed);
        Ok(frame_len)
    }

    /// Drains the next record into `scratch` and decodes it.
    pub fn read<'s>(&self, scratch: &'s mut [u8]) -> Result<LogEntry<'s>, DrainError> {
        let len = self.drain(scratch)?;
        let frame = &scratch[..len];
        let header = FrameHeader::decode(frame).map_err(DrainError::Corrupt)?;
        Ok(LogEntry::from_frame(frame, &header, self.areas.name(header.area)))
    }

    /// Hands every buffered record to the flush callback.
    ///
    /// Returns the number of records delivered; without a flush callback
    /// nothing is drained.
    pub fn flush(&self) -> usize {
        let Some(flush) = self.state.lock().flush else {
            return 0;
        };
        self.flush_with(&mut |entry: &LogEntry<'_>| flush(entry))
    }

    /// Hands every buffered record to `sink`, outside the lock.
    pub fn flush_with(&self, sink: &mut dyn FnMut(&LogEntry<'_>)) -> usize {
        let mut scratch = [0u8; MAX_FRAME_SIZE];
        let mut count = 0;
        while let Ok(entry) = self.read(&mut scratch) {
            sink(&entry);
            count += 1;
        }
        count
    }

    /// Whether records are waiting. Lock-free hint that may race with
    /// concurrent producers and consumers.
    pub fn has_log(&self) -> bool {
        self.pending() > 0
    }

    /// Unread bytes in the buffer, as of the last commit or release
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    /// Records dropped because the buffer was full
    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Whether a corrupt frame stopped the consumer side
    pub fn is_poisoned(&self) -> bool {
        self.corruption().is_some()
    }

    /// The decoding failure that poisoned the logger, if any
    pub fn corruption(&self) -> Option<FrameError> {
        poison_error(self.poison.load(Ordering::Acquire))
    }

    /// Stops all further draining and reports the first corruption once
    /// through the immediate path. Later failures report the first error.
    fn poison(&self, err: FrameError) -> DrainError {
        if let Err(first) = self.poison.compare_exchange(
            HEALTHY,
            poison_code(err),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            return DrainError::Corrupt(poison_error(first).unwrap_or(err));
        }

        let immediate = self.state.lock().immediate;
        if let Some(immediate) = immediate {
            let mut text = [0u8; 64];
            let len = render(&mut text, format_args!("buffer poisoned: {}", err));
            immediate(&LogEntry::new(
                u8::MAX,
                LOGGER_AREA_NAME,
                LogLevel::Fatal,
                0,
                utf8_prefix(&text[..len]),
            ));
        }
        DrainError::Corrupt(err)
    }

    /// Drops `len` bytes from the front of the readable data, leaving a
    /// partial frame behind.
    #[cfg(test)]
    pub(crate) fn skip_bytes(&self, len: usize) {
        let mut state = self.state.lock();
        if let Some(buffer) = state.buffer.as_mut() {
            buffer.release(len);
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt_next_frame(&self) {
        let mut state = self.state.lock();
        if let Some(frame) = state.buffer.as_mut().and_then(|b| b.next_readable_mut()) {
            // An out-of-range level byte can never be written by a producer.
            frame[3] = 0xff;
        }
    }
}
