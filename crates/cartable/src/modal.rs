//! Modal and form state for the car table.
//!
//! At most one modal is open at a time. [`ModalState`] carries the form
//! buffer of whichever modal is open, so there is no way to represent two
//! modals being open together.

use crate::car::{Car, FieldValue};
use crate::error::{Error, Result};
use crate::inventory::CarUpdate;

/// A field of the add or edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Manufacturer name.
    Company,
    /// Model name.
    Model,
    /// Vehicle identification number.
    Vin,
    /// Body color.
    Color,
    /// Model year.
    Year,
    /// Price.
    Price,
    /// Availability.
    Availability,
}

impl FormField {
    /// Every field, in table column order.
    pub const ALL: [Self; 7] = [
        Self::Company,
        Self::Model,
        Self::Vin,
        Self::Color,
        Self::Year,
        Self::Price,
        Self::Availability,
    ];

    /// Label shown next to the input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Model => "Model",
            Self::Vin => "VIN",
            Self::Color => "Color",
            Self::Year => "Year",
            Self::Price => "Price",
            Self::Availability => "Availability",
        }
    }
}

/// Buffer for the add form. Every field is free text and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarForm {
    /// Manufacturer name.
    pub company: String,
    /// Model name.
    pub model: String,
    /// Vehicle identification number.
    pub vin: String,
    /// Body color.
    pub color: String,
    /// Model year.
    pub model_year: String,
    /// Price.
    pub price: String,
    /// Availability.
    pub availability: String,
}

impl CarForm {
    /// Fields the add form accepts.
    pub const FIELDS: &'static [FormField] = &FormField::ALL;

    /// Current text of a field.
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Company => &self.company,
            FormField::Model => &self.model,
            FormField::Vin => &self.vin,
            FormField::Color => &self.color,
            FormField::Year => &self.model_year,
            FormField::Price => &self.price,
            FormField::Availability => &self.availability,
        }
    }

    /// Replace the text of a field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Company => &mut self.company,
            FormField::Model => &mut self.model,
            FormField::Vin => &mut self.vin,
            FormField::Color => &mut self.color,
            FormField::Year => &mut self.model_year,
            FormField::Price => &mut self.price,
            FormField::Availability => &mut self.availability,
        };
        *slot = value.into();
    }

    /// Build the car this form describes.
    #[must_use]
    pub fn to_car(&self) -> Car {
        Car {
            company: self.company.clone(),
            model: self.model.clone(),
            vin: self.vin.clone(),
            color: self.color.clone(),
            model_year: FieldValue::from(self.model_year.as_str()),
            price: FieldValue::from(self.price.as_str()),
            availability: FieldValue::from(self.availability.as_str()),
            ..Car::default()
        }
    }
}

/// Buffer for the edit form.
///
/// Company, model, VIN and year are shown from the car being edited and
/// cannot change. Values the user does not touch keep their original type.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    car: Car,
    color: String,
    price: FieldValue,
    availability: FieldValue,
}

impl EditForm {
    /// Fields the edit form accepts.
    pub const FIELDS: &'static [FormField] =
        &[FormField::Color, FormField::Price, FormField::Availability];

    /// Start editing a car.
    #[must_use]
    pub fn new(car: &Car) -> Self {
        Self {
            car: car.clone(),
            color: car.color.clone(),
            price: car.price.clone(),
            availability: car.availability.clone(),
        }
    }

    /// The car as it was when the form opened.
    #[must_use]
    pub fn car(&self) -> &Car {
        &self.car
    }

    /// VIN of the car being edited.
    #[must_use]
    pub fn vin(&self) -> &str {
        &self.car.vin
    }

    /// Check if a field can be changed in this form.
    #[must_use]
    pub fn is_editable(field: FormField) -> bool {
        Self::FIELDS.contains(&field)
    }

    /// Current text of a field.
    #[must_use]
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Company => self.car.company.clone(),
            FormField::Model => self.car.model.clone(),
            FormField::Vin => self.car.vin.clone(),
            FormField::Year => self.car.model_year.to_string(),
            FormField::Color => self.color.clone(),
            FormField::Price => self.price.to_string(),
            FormField::Availability => self.availability.to_string(),
        }
    }

    /// Replace the text of an editable field.
    ///
    /// Returns `false` and leaves the form unchanged for read-only fields.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match field {
            FormField::Color => self.color = value.into(),
            FormField::Price => self.price = FieldValue::Text(value.into()),
            FormField::Availability => self.availability = FieldValue::Text(value.into()),
            FormField::Company | FormField::Model | FormField::Vin | FormField::Year => {
                return false;
            }
        }
        true
    }

    /// The changes this form would apply.
    #[must_use]
    pub fn to_update(&self) -> CarUpdate {
        CarUpdate {
            color: self.color.clone(),
            price: self.price.clone(),
            availability: self.availability.clone(),
        }
    }
}

/// The modal currently shown over the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModalState {
    /// No modal is open.
    #[default]
    None,
    /// Editing a car.
    Editing(EditForm),
    /// Asking to confirm deletion of a car.
    Deleting(Car),
    /// Entering a new car.
    Adding(CarForm),
}

impl ModalState {
    /// Check if any modal is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Check if the add modal is open.
    #[must_use]
    pub fn is_adding(&self) -> bool {
        matches!(self, Self::Adding(_))
    }

    /// Title of the open modal.
    #[must_use]
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Editing(_) => Some("Edit Car"),
            Self::Deleting(_) => Some("Delete Car"),
            Self::Adding(_) => Some("Add Car"),
        }
    }

    /// Fields the open modal lets the user type into.
    #[must_use]
    pub fn editable_fields(&self) -> &'static [FormField] {
        match self {
            Self::Editing(_) => EditForm::FIELDS,
            Self::Adding(_) => CarForm::FIELDS,
            Self::None | Self::Deleting(_) => &[],
        }
    }

    /// Current text of a field in the open form.
    #[must_use]
    pub fn value(&self, field: FormField) -> Option<String> {
        match self {
            Self::Editing(form) => Some(form.value(field)),
            Self::Adding(form) => Some(form.value(field).to_string()),
            Self::None | Self::Deleting(_) => None,
        }
    }

    /// Replace the text of a field in the open form.
    ///
    /// Returns `false` if the field is read-only in this form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveModal`] if no form is open.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> Result<bool> {
        match self {
            Self::Editing(form) => Ok(form.set(field, value)),
            Self::Adding(form) => {
                form.set(field, value);
                Ok(true)
            }
            Self::None | Self::Deleting(_) => Err(Error::NoActiveModal),
        }
    }
}

/// The per-row action selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAction {
    /// No action; closes any open modal.
    #[default]
    None,
    /// Open the edit modal for the row.
    Edit,
    /// Open the delete confirmation for the row.
    Delete,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car() -> Car {
        Car {
            company: "Honda".to_string(),
            model: "Civic".to_string(),
            vin: "JHMFA".to_string(),
            color: "Blue".to_string(),
            model_year: FieldValue::from(2006),
            price: FieldValue::from("$900.00"),
            availability: FieldValue::from(true),
            ..Car::default()
        }
    }

    #[test]
    fn test_car_form_to_car() {
        let mut form = CarForm::default();
        form.set(FormField::Company, "Kia");
        form.set(FormField::Vin, "KNAFE");
        form.set(FormField::Year, "2015");

        let car = form.to_car();
        assert_eq!(car.company, "Kia");
        assert_eq!(car.vin, "KNAFE");
        assert_eq!(car.model_year, FieldValue::from("2015"));
        assert_eq!(car.color, "");
        assert!(car.id.is_none());
    }

    #[test]
    fn test_edit_form_read_only_fields() {
        let mut form = EditForm::new(&car());

        assert!(!form.set(FormField::Vin, "OTHER"));
        assert!(!form.set(FormField::Year, "1900"));
        assert_eq!(form.vin(), "JHMFA");
        assert_eq!(form.value(FormField::Year), "2006");
    }

    #[test]
    fn test_edit_form_untouched_values_keep_type() {
        let mut form = EditForm::new(&car());
        assert!(form.set(FormField::Color, "Black"));

        let update = form.to_update();
        assert_eq!(update.color, "Black");
        assert_eq!(update.availability, FieldValue::Bool(true));
        assert_eq!(update.price, FieldValue::from("$900.00"));
    }

    #[test]
    fn test_edit_form_entered_values_are_text() {
        let mut form = EditForm::new(&car());
        form.set(FormField::Availability, "false");

        assert_eq!(form.to_update().availability, FieldValue::from("false"));
    }

    #[test]
    fn test_modal_state_default_is_closed() {
        let modal = ModalState::default();
        assert!(!modal.is_open());
        assert!(modal.title().is_none());
        assert!(modal.editable_fields().is_empty());
    }

    #[test]
    fn test_modal_state_set() {
        let mut modal = ModalState::Adding(CarForm::default());
        assert!(modal.set(FormField::Color, "Teal").unwrap());
        assert_eq!(modal.value(FormField::Color).as_deref(), Some("Teal"));
        assert!(modal.is_adding());

        let mut modal = ModalState::Deleting(car());
        assert!(matches!(
            modal.set(FormField::Color, "Teal"),
            Err(Error::NoActiveModal)
        ));
    }

    #[test]
    fn test_modal_titles() {
        assert_eq!(
            ModalState::Editing(EditForm::new(&car())).title(),
            Some("Edit Car")
        );
        assert_eq!(ModalState::Deleting(car()).title(), Some("Delete Car"));
        assert_eq!(
            ModalState::Adding(CarForm::default()).title(),
            Some("Add Car")
        );
    }

    #[test]
    fn test_form_field_labels() {
        let labels: Vec<_> = FormField::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, crate::car::COLUMNS);
    }
}
