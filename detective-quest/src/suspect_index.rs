//! Clue → suspect lookup.
//!
//! Fixed number of buckets, each a singly linked chain. The bucket of a key is the sum
//! of its UTF-8 bytes modulo the bucket count, so anagrams always collide. Lookups
//! compare the full key along the chain.

use std::fmt;

pub const DEFAULT_BUCKET_COUNT: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("Suspect index needs at least one bucket")]
    NoBuckets,
}

struct SuspectEntry {
    clue: String,
    suspect: String,
    next: Option<Box<SuspectEntry>>,
}

pub struct SuspectIndex {
    buckets: Vec<Option<Box<SuspectEntry>>>,
    len: usize,
}

impl SuspectIndex {
    pub fn new() -> Self {
        Self {
            buckets: Self::empty_buckets(DEFAULT_BUCKET_COUNT),
            len: 0,
        }
    }

    pub fn with_buckets(bucket_count: usize) -> Result<Self, IndexError> {
        if bucket_count == 0 {
            return Err(IndexError::NoBuckets);
        }
        Ok(Self {
            buckets: Self::empty_buckets(bucket_count),
            len: 0,
        })
    }

    fn empty_buckets(bucket_count: usize) -> Vec<Option<Box<SuspectEntry>>> {
        (0..bucket_count).map(|_| None).collect()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket_of(&self, key: &str) -> usize {
        let sum = key
            .bytes()
            .fold(0u64, |acc, byte| acc.wrapping_add(u64::from(byte)));
        (sum % self.buckets.len() as u64) as usize
    }

    /// Prepends the pair to its bucket chain. No duplicate check: a later insertion for
    /// the same clue shadows earlier ones.
    pub fn insert(&mut self, clue: &str, suspect: &str) {
        let bucket = self.bucket_of(clue);
        let entry = Box::new(SuspectEntry {
            clue: clue.to_string(),
            suspect: suspect.to_string(),
            next: self.buckets[bucket].take(),
        });
        self.buckets[bucket] = Some(entry);
        self.len += 1;
    }

    pub fn lookup(&self, clue: &str) -> Option<&str> {
        self.chain(self.bucket_of(clue))
            .find(|entry| entry.clue == clue)
            .map(|entry| entry.suspect.as_str())
    }

    /// Number of entries stored, shadowed duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn chain_len(&self, bucket: usize) -> usize {
        if bucket >= self.buckets.len() {
            return 0;
        }
        self.chain(bucket).count()
    }

    /// Every stored (clue, suspect) pair, bucket by bucket, head of chain first.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        (0..self.buckets.len())
            .flat_map(move |bucket| self.chain(bucket))
            .map(|entry| (entry.clue.as_str(), entry.suspect.as_str()))
    }

    fn chain(&self, bucket: usize) -> Chain<'_> {
        Chain {
            next: self.buckets[bucket].as_deref(),
        }
    }
}

impl Default for SuspectIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SuspectIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl Drop for SuspectIndex {
    fn drop(&mut self) {
        for bucket in &mut self.buckets {
            let mut next = bucket.take();
            while let Some(mut entry) = next {
                next = entry.next.take();
            }
        }
    }
}

struct Chain<'a> {
    next: Option<&'a SuspectEntry>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a SuspectEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next?;
        self.next = entry.next.as_deref();
        Some(entry)
    }
}
