// src/event_ring.rs

// fixed-capacity circular buffer of event timestamps

/// The most recent event timestamps, oldest first.
///
/// Storage is a `Vec` with a rotating `start` (the oldest entry) and a `len`.
/// Slots are allocated as events arrive: until `capacity` slots exist the
/// vector only grows (`start` stays 0), after that each push past a full
/// ring overwrites the oldest.
#[derive(Debug, Clone)]
pub(crate) struct EventRing {
    slots: Vec<u64>,
    capacity: usize,
    start: usize,
    len: usize,
}

impl EventRing {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            start: 0,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub(crate) fn oldest(&self) -> Option<u64> {
        (self.len > 0).then(|| self.slots[self.start])
    }

    pub(crate) fn push(&mut self, timestamp: u64) {
        if self.capacity == 0 {
            return;
        }
        if self.slots.len() < self.capacity {
            // still growing: start == 0 and len == slots.len()
            self.slots.push(timestamp);
            self.len += 1;
            return;
        }
        let idx = (self.start + self.len) % self.capacity;
        self.slots[idx] = timestamp;
        if self.len < self.capacity {
            self.len += 1;
        } else {
            self.start = (self.start + 1) % self.capacity;
        }
    }

    /// Remove and return the most recently pushed timestamp.
    pub(crate) fn pop_newest(&mut self) -> Option<u64> {
        if self.len == 0 {
            return None;
        }
        if self.slots.len() < self.capacity {
            self.len -= 1;
            return self.slots.pop();
        }
        self.len -= 1;
        Some(self.slots[(self.start + self.len) % self.capacity])
    }

    /// Timestamps in the order they were recorded.
    pub(crate) fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        let allocated = self.slots.len();
        (0..self.len).map(move |i| self.slots[(self.start + i) % allocated])
    }

    /// Change capacity, keeping the newest `min(len, new_capacity)` entries.
    pub(crate) fn resize(&mut self, new_capacity: usize) {
        let keep = self.len.min(new_capacity);
        let slots: Vec<u64> = self.iter().skip(self.len - keep).collect();
        self.slots = slots;
        self.capacity = new_capacity;
        self.start = 0;
        self.len = keep;
    }
}
