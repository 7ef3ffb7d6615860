//! Seat capacity derivation
//!
//! Remaining seats are never stored independently: they are always
//! `total_capacity - active registrations`, floored at zero.

use crate::models::Event;

/// Remaining seats for an event given its active registration count
pub fn recompute(event: &Event, active_count: usize) -> u32 {
    remaining(event.total_capacity, active_count)
}

/// Remaining seats for a raw capacity
pub fn remaining(total_capacity: u32, active_count: usize) -> u32 {
    let active = u32::try_from(active_count).unwrap_or(u32::MAX);
    total_capacity.saturating_sub(active)
}

/// Whether a capacity can hold the given number of active registrations
pub fn fits(total_capacity: u32, active_count: usize) -> bool {
    usize::try_from(total_capacity).map_or(true, |capacity| capacity >= active_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_floors_at_zero() {
        assert_eq!(remaining(10, 3), 7);
        assert_eq!(remaining(2, 2), 0);
        assert_eq!(remaining(2, 5), 0);
        assert_eq!(remaining(0, 0), 0);
    }

    #[test]
    fn test_fits() {
        assert!(fits(5, 5));
        assert!(fits(5, 0));
        assert!(!fits(2, 3));
    }
}
