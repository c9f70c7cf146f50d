//! Free-text search over the car collection.

use crate::car::Car;

/// Check whether any value of the car contains `needle`, ignoring case.
///
/// An empty needle matches every car.
#[must_use]
pub fn matches(car: &Car, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    car.searchable_values()
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
}

/// Cars matching the search term, in collection order.
#[must_use]
pub fn filter<'a>(cars: &'a [Car], term: &str) -> Vec<&'a Car> {
    cars.iter().filter(|car| matches(car, term)).collect()
}
