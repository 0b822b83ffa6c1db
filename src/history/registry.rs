//! Per-unit history registry.

use std::num::NonZeroUsize;
use std::sync::{Arc, PoisonError, RwLock};

use super::HistoryBuffer;

/// Owns the aggregate history and one history per unit (e.g. CPU core).
///
/// The unit list only grows. Once index `i` has a buffer, it keeps that
/// buffer for the life of the registry.
#[derive(Debug)]
pub struct BufferRegistry {
    aggregate: HistoryBuffer,
    units: RwLock<Vec<Arc<HistoryBuffer>>>,
    capacity: NonZeroUsize,
    window: NonZeroUsize,
}

impl BufferRegistry {
    pub fn new(capacity: NonZeroUsize, window: NonZeroUsize) -> Self {
        Self {
            aggregate: HistoryBuffer::new(capacity, window),
            units: RwLock::new(Vec::new()),
            capacity,
            window,
        }
    }

    /// Record a sample for `unit`, growing the registry if the unit is new.
    ///
    /// A new unit's buffer starts with `value` as its first sample. Indices
    /// skipped over while growing get empty buffers.
    pub fn push(&self, unit: usize, value: f64) {
        {
            let units = self.units.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(buffer) = units.get(unit) {
                buffer.add(value);
                return;
            }
        }

        let mut units = self.units.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have grown the list between the two locks.
        while units.len() <= unit {
            units.push(Arc::new(HistoryBuffer::new(self.capacity, self.window)));
        }
        units[unit].add(value);
    }

    /// Record a sample for the aggregate series.
    pub fn push_aggregate(&self, value: f64) {
        self.aggregate.add(value);
    }

    /// Clear the aggregate and every unit buffer.
    pub fn reset_all(&self) {
        self.aggregate.reset();
        let units = self.units.read().unwrap_or_else(PoisonError::into_inner);
        for buffer in units.iter() {
            buffer.reset();
        }
    }

    pub fn aggregate(&self) -> &HistoryBuffer {
        &self.aggregate
    }

    pub fn unit(&self, index: usize) -> Option<Arc<HistoryBuffer>> {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    pub fn unit_count(&self) -> usize {
        self.units.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> BufferRegistry {
        BufferRegistry::new(NonZeroUsize::new(4).unwrap(), NonZeroUsize::new(2).unwrap())
    }

    #[test]
    fn new_unit_is_seeded_with_first_value() {
        let registry = registry();
        registry.push(0, 12.5);
        assert_eq!(registry.unit_count(), 1);
        assert_eq!(registry.unit(0).unwrap().values(), vec![12.5]);
    }

    #[test]
    fn existing_unit_forwards_to_add() {
        let registry = registry();
        registry.push(0, 1.0);
        registry.push(0, 2.0);
        assert_eq!(registry.unit(0).unwrap().values(), vec![1.0, 2.0]);
    }

    #[test]
    fn growth_keeps_indices_stable() {
        let registry = registry();
        registry.push(0, 1.0);
        registry.push(1, 2.0);
        let first = registry.unit(0).unwrap();

        registry.push(4, 5.0);
        assert_eq!(registry.unit_count(), 5);
        assert!(Arc::ptr_eq(&first, &registry.unit(0).unwrap()));
        assert_eq!(registry.unit(1).unwrap().values(), vec![2.0]);
        assert!(registry.unit(2).unwrap().is_empty());
        assert!(registry.unit(3).unwrap().is_empty());
        assert_eq!(registry.unit(4).unwrap().values(), vec![5.0]);
    }

    #[test]
    fn new_units_use_configured_capacity_and_window() {
        let registry = registry();
        registry.push(2, 1.0);
        let unit = registry.unit(2).unwrap();
        assert_eq!(unit.capacity(), 4);
        assert_eq!(unit.window(), 2);
    }

    #[test]
    fn reset_all_clears_everything_but_keeps_units() {
        let registry = registry();
        registry.push_aggregate(50.0);
        registry.push(0, 10.0);
        registry.push(1, 20.0);

        registry.reset_all();

        assert!(registry.aggregate().is_empty());
        assert_eq!(registry.unit_count(), 2);
        assert!(registry.unit(0).unwrap().is_empty());
        assert!(registry.unit(1).unwrap().is_empty());
    }

    #[test]
    fn unknown_unit_is_none() {
        assert!(registry().unit(3).is_none());
    }
}
