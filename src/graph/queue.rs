//! FIFO frontier for breadth-first search.
//!
//! A growable buffer with a head cursor: `pop` advances the cursor instead
//! of shifting, and consumed slots are dropped in one `drain` once they
//! outnumber the live ones. Every operation is amortized O(1).

/// Consumed slots below this count are never compacted.
const MIN_COMPACT_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct FrontierQueue<T> {
    items: Vec<Option<T>>,
    head: usize,
}

impl<T> Default for FrontierQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrontierQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            head: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            head: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(Some(item));
    }

    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.get_mut(self.head)?.take();
        self.head += 1;
        if self.head == self.items.len() {
            self.items.clear();
            self.head = 0;
        } else if self.head >= MIN_COMPACT_LEN && self.head * 2 > self.items.len() {
            self.items.drain(..self.head);
            self.head = 0;
        }
        item
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.get(self.head).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.items.len() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots currently held, consumed ones included.
    pub fn buffer_len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Extend<T> for FrontierQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Some));
    }
}
