//! Shared work queue handing out ports to workers.

use crate::types::{Port, PortRange};
use std::sync::{Mutex, PoisonError};

/// A thread-safe cursor over the ports of a scan.
///
/// The port list is built once, in ascending order, and never changes. Only
/// the cursor moves, under a mutex whose critical section is a bounds check
/// and an increment. Every index is handed out to exactly one caller.
#[derive(Debug)]
pub struct WorkQueue {
    ports: Vec<Port>,
    cursor: Mutex<usize>,
}

impl WorkQueue {
    /// Build the queue for every port in `range`.
    pub fn new(range: PortRange) -> Self {
        Self {
            ports: range.iter().collect(),
            cursor: Mutex::new(0),
        }
    }

    /// Claim the next port, or `None` once the queue is exhausted.
    pub fn next(&self) -> Option<Port> {
        // The guarded value is a plain index, so a poisoned lock is still consistent.
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let port = self.ports.get(*cursor).copied()?;
        *cursor += 1;
        Some(port)
    }

    /// Number of ports handed out so far.
    pub fn dispensed(&self) -> usize {
        *self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Total number of ports in the queue.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn range(start: u16, end: u16) -> PortRange {
        PortRange::new(Port::new(start).unwrap(), Port::new(end).unwrap()).unwrap()
    }

    #[test]
    fn test_ascending_then_exhausted() {
        let queue = WorkQueue::new(range(79, 82));
        let ports: Vec<u16> = std::iter::from_fn(|| queue.next()).map(Port::as_u16).collect();
        assert_eq!(ports, vec![79, 80, 81, 82]);
        assert_eq!(queue.next(), None);
        assert_eq!(queue.next(), None);
        assert_eq!(queue.dispensed(), 4);
    }

    #[test]
    fn test_single_port() {
        let queue = WorkQueue::new(range(443, 443));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next(), Port::new(443));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn test_each_port_dispensed_exactly_once() {
        let queue = Arc::new(WorkQueue::new(range(1, 20_000)));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut claimed = Vec::new();
                    while let Some(port) = queue.next() {
                        claimed.push(port.as_u16());
                    }
                    claimed
                })
            })
            .collect();

        let mut seen = HashSet::new();
        let mut total = 0;
        for handle in handles {
            let claimed = handle.join().unwrap();
            // Each worker sees its own claims in ascending order.
            assert!(claimed.windows(2).all(|w| w[0] < w[1]));
            total += claimed.len();
            seen.extend(claimed);
        }

        assert_eq!(total, 20_000);
        assert_eq!(seen.len(), 20_000);
        assert!((1..=20_000).all(|p| seen.contains(&p)));
    }
}
