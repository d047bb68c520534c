//! Numeric frame id allocation with reuse of released ids.

use std::collections::BTreeSet;

/// Hands out positive frame ids. Released ids are reused smallest-first
/// before the high-water mark grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    high_water: u32,
    free: BTreeSet<u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild after a restore: every id in `1..=high_water` not in `used` becomes free.
    /// A used id above `high_water` raises the mark.
    pub fn rebuild(high_water: u32, used: impl IntoIterator<Item = u32>) -> Self {
        let used: BTreeSet<u32> = used.into_iter().filter(|id| *id > 0).collect();
        let high_water = used.iter().next_back().copied().unwrap_or(0).max(high_water);
        let free = (1..=high_water).filter(|id| !used.contains(id)).collect();
        Self { high_water, free }
    }

    pub fn allocate(&mut self) -> u32 {
        if let Some(id) = self.free.pop_first() {
            return id;
        }
        self.high_water += 1;
        self.high_water
    }

    /// Return an id to the free set. Ids above the high-water mark were never
    /// handed out and are ignored.
    pub fn release(&mut self, id: u32) {
        if id == 0 || id > self.high_water {
            return;
        }
        self.free.insert(id);
    }

    /// Highest id ever handed out (persisted as `frameCount`).
    pub fn high_water(&self) -> u32 {
        self.high_water
    }

    pub fn free_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.free.iter().copied()
    }

    pub fn is_free(&self, id: u32) -> bool {
        self.free.contains(&id)
    }
}
