// HistoryBuffer - fixed-capacity FIFO of recent filtered magnitudes

use std::collections::VecDeque;

/// Default number of filtered magnitudes retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    values: VecDeque<f64>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a value, evicting the oldest entry on overflow
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed value
    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// The newest `N` entries in chronological order, or `None` if fewer exist
    pub fn window<const N: usize>(&self) -> Option<[f64; N]> {
        let len = self.values.len();
        if len < N {
            return None;
        }

        let mut window = [0.0; N];
        for (slot, value) in window.iter_mut().zip(self.values.range(len - N..)) {
            *slot = *value;
        }
        Some(window)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
