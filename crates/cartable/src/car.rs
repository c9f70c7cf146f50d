//! Core car record types for cartable.
//!
//! This module defines the car record as it appears in the seed API and in
//! the persisted snapshot, including the loosely typed fields the API mixes
//! strings, numbers and booleans in.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Column headers, in display order.
pub const COLUMNS: [&str; 7] = [
    "Company",
    "Model",
    "VIN",
    "Color",
    "Year",
    "Price",
    "Availability",
];

/// A field that may be a string, number or boolean in the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A JSON boolean.
    Bool(bool),
    /// A JSON number.
    Number(Number),
    /// A JSON string.
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// A single car in the collection.
///
/// Field names on the wire follow the seed API (`car`, `car_model`,
/// `car_vin`, ...). Keys this struct does not know about are kept in
/// [`Car::extra`] so a snapshot round-trips everything it was given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// Identifier assigned by the seed API, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Manufacturer name.
    #[serde(rename = "car", default, deserialize_with = "loose_text")]
    pub company: String,

    /// Model name.
    #[serde(rename = "car_model", default, deserialize_with = "loose_text")]
    pub model: String,

    /// Body color.
    #[serde(rename = "car_color", default, deserialize_with = "loose_text")]
    pub color: String,

    /// Model year.
    #[serde(rename = "car_model_year", default, deserialize_with = "nullable")]
    pub model_year: FieldValue,

    /// Vehicle identification number, used as the lookup key.
    #[serde(rename = "car_vin", default, deserialize_with = "loose_text")]
    pub vin: String,

    /// Listed price, usually a string such as `"$4320.20"`.
    #[serde(default, deserialize_with = "nullable")]
    pub price: FieldValue,

    /// Whether the car is available.
    #[serde(default, deserialize_with = "nullable")]
    pub availability: FieldValue,

    /// Any other keys present in the source record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize `null` as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a text column, taking numbers and booleans by their string
/// form and `null` as empty.
fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FieldValue>::deserialize(deserializer)?
        .map(|value| match value {
            FieldValue::Text(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_default())
}

/// Build cars from raw list entries.
///
/// Entries that are `null`, not objects, or carry a field of an unusable
/// type are skipped. `source` names the list in the log.
#[must_use]
pub fn cars_from_values(source: &str, entries: Vec<Value>) -> Vec<Car> {
    let total = entries.len();
    let cars: Vec<Car> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Null => None,
            Value::Object(_) => match Car::deserialize(entry) {
                Ok(car) => Some(car),
                Err(e) => {
                    debug!("Skipping entry {} of {}: {}", index, source, e);
                    None
                }
            },
            other => {
                debug!("Skipping entry {} of {}: not an object: {}", index, source, other);
                None
            }
        })
        .collect();
    if cars.len() < total {
        debug!("Kept {} of {} entries from {}", cars.len(), total, source);
    }
    cars
}

impl Car {
    /// Values shown in the table, in [`COLUMNS`] order.
    #[must_use]
    pub fn columns(&self) -> [String; 7] {
        [
            self.company.clone(),
            self.model.clone(),
            self.vin.clone(),
            self.color.clone(),
            self.model_year.to_string(),
            self.price.to_string(),
            self.availability.to_string(),
        ]
    }

    /// String forms of every value in the record, for searching.
    ///
    /// Includes `id` and unknown keys. Null values are skipped.
    #[must_use]
    pub fn searchable_values(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(8 + self.extra.len());
        values.extend(self.id.as_ref().and_then(value_text));
        values.extend(self.columns());
        values.extend(self.extra.values().filter_map(value_text));
        values
    }

    /// Check whether this car has the given VIN.
    #[must_use]
    pub fn has_vin(&self, vin: &str) -> bool {
        self.vin == vin
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
