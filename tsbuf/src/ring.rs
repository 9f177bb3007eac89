//! Bounded FIFO ring of samples.
//!
//! This module provides the storage layer of the buffer: appends go to the
//! newest end, removals come from the oldest end, and a full ring evicts its
//! oldest sample to make room.
//!
//! # Design
//!
//! - samples live in a `VecDeque` that grows on demand, never past `capacity`
//! - `capacity` is only a bound; nothing is allocated for it up front
//! - eviction is a `pop_front` followed by a `push_back`
//!
//! Reads always yield samples in chronological (insertion) order, oldest
//! first.

use std::collections::{VecDeque, vec_deque};
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use crate::error::{ReadError, Result};
use crate::sample::Sample;

/// Selects how many of the newest samples a read should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Up to `n` of the newest samples.
    Last(usize),
    /// Every stored sample.
    All,
}

impl Window {
    /// Converts a signed count where `-1` means "all samples".
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::InvalidWindow`] for negative counts other than `-1`.
    pub fn from_signed(n: i64) -> Result<Self> {
        match n {
            -1 => Ok(Self::All),
            n if n >= 0 => Ok(Self::Last(usize::try_from(n).unwrap_or(usize::MAX))),
            n => Err(ReadError::InvalidWindow { n }.into()),
        }
    }

    /// Resolves the window against the number of stored samples.
    fn resolve(self, len: usize) -> usize {
        match self {
            Self::Last(n) => n.min(len),
            Self::All => len,
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::Last(1)
    }
}

impl From<usize> for Window {
    fn from(n: usize) -> Self {
        Self::Last(n)
    }
}

/// A bounded ring of samples with FIFO eviction.
///
/// # Thread Safety
///
/// `SampleRing` is a plain single-owner value. Callers sharing one across
/// threads must serialize access themselves.
#[derive(Debug, Clone)]
pub struct SampleRing {
    /// Stored samples, oldest at the front.
    samples: VecDeque<Sample>,
    /// Upper bound on `samples.len()`.
    capacity: NonZeroUsize,
}

impl SampleRing {
    /// Creates an empty ring holding at most `capacity` samples.
    ///
    /// Storage grows as samples arrive, so a large capacity costs nothing
    /// until it is used.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    /// use tsbuf::ring::SampleRing;
    ///
    /// let ring = SampleRing::new(NonZeroUsize::new(16).unwrap());
    /// assert_eq!(ring.capacity(), 16);
    /// assert!(ring.is_empty());
    /// ```
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity,
        }
    }

    /// Returns the maximum number of samples the ring can hold.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns the number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns `true` if the next append will evict.
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Appends a sample at the newest end.
    ///
    /// If the ring is full, the oldest sample is evicted first and returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    /// use tsbuf::ring::SampleRing;
    /// use tsbuf::Sample;
    ///
    /// let mut ring = SampleRing::new(NonZeroUsize::new(1).unwrap());
    /// assert_eq!(ring.append(Sample::new(1.0, 0.0, 10.0, 0.0)), None);
    ///
    /// let evicted = ring.append(Sample::new(2.0, 0.0, 20.0, 0.0));
    /// assert_eq!(evicted.map(|s| s.time), Some(1.0));
    /// ```
    pub fn append(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.is_full() {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Removes and returns up to `n` of the oldest samples, oldest first.
    pub fn pop_front(&mut self, n: usize) -> Vec<Sample> {
        let count = n.min(self.len());
        self.samples.drain(..count).collect()
    }

    /// Returns the newest samples selected by `window`, oldest first.
    ///
    /// The ring is not modified.
    pub fn peek_back(&self, window: Window) -> Vec<Sample> {
        let len = self.len();
        let count = window.resolve(len);
        self.samples.range(len - count..).copied().collect()
    }

    /// Returns the oldest stored sample.
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Returns the newest stored sample.
    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Drops every stored sample. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Iterates over stored samples from oldest to newest.
    pub fn iter(&self) -> RingIter<'_> {
        RingIter {
            inner: self.samples.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a SampleRing {
    type Item = &'a Sample;
    type IntoIter = RingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`SampleRing`] in chronological order.
#[derive(Debug, Clone)]
pub struct RingIter<'a> {
    inner: vec_deque::Iter<'a, Sample>,
}

impl<'a> Iterator for RingIter<'a> {
    type Item = &'a Sample;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for RingIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for RingIter<'_> {}

impl FusedIterator for RingIter<'_> {}
