//! Adjustment-counter selection.

use crate::{CounterId, Inventory};

/// Returns whichever of the two counters other than `excluded` holds more.
///
/// Ties go to the earlier counter in [`CounterId::ALL`] order, so the result
/// depends only on the quantities, never on how the input was ordered.
pub fn resolve(inventory: &Inventory, excluded: CounterId) -> CounterId {
    let [first, second] = excluded.others();
    if inventory[second] > inventory[first] {
        second
    } else {
        first
    }
}
