//! Player identifier allocation.

use std::sync::atomic::{AtomicI32, Ordering};
use ttt_shared::{PlayerId, FIRST_PLAYER_ID};

/// Hands out strictly increasing player identifiers.
///
/// The counter is a single atomic, so any number of handler tasks can
/// register at once without ever observing the same value twice.
#[derive(Debug)]
pub struct IdentityAllocator {
    next_id: AtomicI32,
}

impl IdentityAllocator {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(FIRST_PLAYER_ID),
        }
    }

    /// Returns the next unused identifier.
    pub fn allocate(&self) -> PlayerId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// The identifier the next `allocate` call will return.
    pub fn peek(&self) -> PlayerId {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl Default for IdentityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_allocation_starts_at_base() {
        let allocator = IdentityAllocator::new();
        assert_eq!(allocator.peek(), 10000);
        assert_eq!(allocator.allocate(), 10000);
        assert_eq!(allocator.allocate(), 10001);
        assert_eq!(allocator.peek(), 10002);
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let allocator = Arc::new(IdentityAllocator::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                std::thread::spawn(move || (0..500).map(|_| allocator.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in threads {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id {} allocated twice", id);
            }
        }

        assert_eq!(seen.len(), 4000);
        assert_eq!(allocator.peek(), 10000 + 4000);
    }
}
