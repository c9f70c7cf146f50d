//! The in-memory car collection.
//!
//! All operations work on the whole ordered list. VIN lookups always target
//! the first matching record; duplicate VINs are tolerated, not rejected.

use tracing::debug;

use crate::car::{Car, FieldValue};
use crate::error::{Error, Result};

/// The mutable subset of a car, as accepted by the edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarUpdate {
    /// New body color.
    pub color: String,
    /// New price.
    pub price: FieldValue,
    /// New availability.
    pub availability: FieldValue,
}

/// An ordered collection of cars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    cars: Vec<Car>,
}

impl Inventory {
    /// Create an inventory from a list of cars, keeping their order.
    #[must_use]
    pub fn new(cars: Vec<Car>) -> Self {
        Self { cars }
    }

    /// All cars, in collection order.
    #[must_use]
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// Number of cars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// Check if the inventory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Position of the first car with the given VIN.
    #[must_use]
    pub fn position(&self, vin: &str) -> Option<usize> {
        self.cars.iter().position(|car| car.has_vin(vin))
    }

    /// First car with the given VIN.
    #[must_use]
    pub fn find(&self, vin: &str) -> Option<&Car> {
        self.cars.iter().find(|car| car.has_vin(vin))
    }

    /// Prepend a car.
    pub fn add(&mut self, car: Car) {
        debug!("Adding car with VIN '{}'", car.vin);
        self.cars.insert(0, car);
    }

    /// Apply an update to the first car with the given VIN.
    ///
    /// Returns the updated car.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CarNotFound`] if no car has the VIN.
    pub fn update(&mut self, vin: &str, update: CarUpdate) -> Result<&Car> {
        let index = self.position(vin).ok_or_else(|| Error::car_not_found(vin))?;
        let car = &mut self.cars[index];
        car.color = update.color;
        car.price = update.price;
        car.availability = update.availability;
        debug!("Updated car at index {} with VIN '{}'", index, vin);
        Ok(car)
    }

    /// Remove the first car with the given VIN.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CarNotFound`] if no car has the VIN.
    pub fn remove(&mut self, vin: &str) -> Result<Car> {
        let index = self.position(vin).ok_or_else(|| Error::car_not_found(vin))?;
        debug!("Removing car at index {} with VIN '{}'", index, vin);
        Ok(self.cars.remove(index))
    }
}

impl From<Vec<Car>> for Inventory {
    fn from(cars: Vec<Car>) -> Self {
        Self::new(cars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(vin: &str, color: &str) -> Car {
        Car {
            company: "Ford".to_string(),
            model: "F-150".to_string(),
            vin: vin.to_string(),
            color: color.to_string(),
            model_year: FieldValue::from(2011),
            price: FieldValue::from("$100"),
            availability: FieldValue::from(true),
            ..Car::default()
        }
    }

    fn update(color: &str) -> CarUpdate {
        CarUpdate {
            color: color.to_string(),
            price: FieldValue::from("$200"),
            availability: FieldValue::from("false"),
        }
    }

    #[test]
    fn test_add_prepends() {
        let mut inventory = Inventory::new(vec![car("A", "Red")]);
        inventory.add(car("B", "Blue"));

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.cars()[0].vin, "B");
        assert_eq!(inventory.cars()[1].vin, "A");
    }

    #[test]
    fn test_update_changes_only_mutable_fields() {
        let mut inventory = Inventory::new(vec![car("A", "Red"), car("B", "Blue")]);
        let before = inventory.cars()[1].clone();

        let updated = inventory.update("B", update("Green")).unwrap().clone();

        assert_eq!(updated.color, "Green");
        assert_eq!(updated.price, FieldValue::from("$200"));
        assert_eq!(updated.availability, FieldValue::from("false"));
        assert_eq!(updated.company, before.company);
        assert_eq!(updated.model, before.model);
        assert_eq!(updated.model_year, before.model_year);
        assert_eq!(inventory.cars()[0], car("A", "Red"));
    }

    #[test]
    fn test_update_targets_first_duplicate() {
        let mut inventory = Inventory::new(vec![car("A", "Red"), car("A", "Blue")]);
        inventory.update("A", update("Green")).unwrap();

        assert_eq!(inventory.cars()[0].color, "Green");
        assert_eq!(inventory.cars()[1].color, "Blue");
    }

    #[test]
    fn test_update_missing_vin() {
        let mut inventory = Inventory::new(vec![car("A", "Red")]);
        let before = inventory.clone();

        let err = inventory.update("Z", update("Green")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_remove() {
        let mut inventory = Inventory::new(vec![car("A", "Red"), car("B", "Blue")]);
        let removed = inventory.remove("A").unwrap();

        assert_eq!(removed.vin, "A");
        assert_eq!(inventory.len(), 1);
        assert!(inventory.find("A").is_none());
    }

    #[test]
    fn test_remove_missing_vin() {
        let mut inventory = Inventory::new(vec![car("A", "Red")]);
        assert!(inventory.remove("Z").unwrap_err().is_not_found());
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_empty() {
        let inventory = Inventory::default();
        assert!(inventory.is_empty());
        assert!(inventory.position("A").is_none());
    }
}
