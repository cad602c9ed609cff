use crate::url::normalize_url;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// One unit of crawl work: a URL awaiting fetch and its BFS depth
///
/// `hops` counts link traversals from the seed (the seed itself is 0; a
/// link discovered on a depth-*d* page enters the frontier at *d+1*).
/// The stored URL is already normalized, so workers fetch exactly the
/// form that was deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub hops: u32,
}

/// The traversal state of one crawl: a FIFO queue of pending entries plus
/// the seen set of every normalized URL ever admitted
///
/// The frontier is owned exclusively by the coordinator task; workers
/// report discovered candidates back instead of touching it. That single
/// ownership is what makes `try_enqueue`'s check-and-insert atomic under
/// concurrent discovery.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a URL at the given depth if its normalized form is new
    ///
    /// Returns true and appends a `FrontierEntry` only when the normalized
    /// URL was absent from the seen set. The seen set is the single source
    /// of truth for "has this URL been scheduled"; once a URL is admitted
    /// it is never admitted again for the lifetime of the crawl.
    pub fn try_enqueue(&mut self, url: &Url, hops: u32) -> bool {
        let normalized = normalize_url(url);
        if !self.seen.insert(normalized.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(FrontierEntry {
            url: normalized,
            hops,
        });
        true
    }

    /// Removes and returns the oldest pending entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Discards all pending entries, keeping the seen set
    ///
    /// Used on cancellation: nothing further will be dispatched, but the
    /// dedup record stays intact for any entries still in flight.
    pub fn clear_pending(&mut self) {
        self.queue.clear();
    }

    /// Number of entries awaiting dispatch
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
