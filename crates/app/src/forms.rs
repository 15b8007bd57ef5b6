//! Form layer: raw user input and its validation.
//!
//! Fields hold the text the user typed (JSON numbers are accepted and kept as
//! text), and `validate` turns a form into a domain value or a list of
//! field-level errors. Every invalid field is reported, not just the first.
//! Quantities must be whole numbers; `10.0` counts as one, `2.5` does not.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use partquote_core::Money;
use partquote_parts::{PartDefinition, PriceRange, Variation};
use partquote_quoting::QuoteRequest;

/// One invalid field, addressed by path (`ranges[1].quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All validation failures of one form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error, Serialize)]
#[error("{} invalid field(s): {}", .errors.len(), summary(.errors))]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FormErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// First message reported for `field`.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One price-range row of the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeForm {
    #[serde(deserialize_with = "text_or_number")]
    pub quantity: String,
    #[serde(deserialize_with = "text_or_number")]
    pub price: String,
}

impl RangeForm {
    pub fn new(quantity: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            quantity: quantity.into(),
            price: price.into(),
        }
    }
}

impl Default for RangeForm {
    fn default() -> Self {
        Self::new("0", "0")
    }
}

/// One variation row of the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationForm {
    pub name: String,
    #[serde(default = "zero_text", deserialize_with = "text_or_number")]
    pub surcharge: String,
}

impl VariationForm {
    pub fn new(name: impl Into<String>, surcharge: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surcharge: surcharge.into(),
        }
    }
}

/// Part registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartForm {
    pub part_type: String,
    #[serde(default)]
    pub ranges: Vec<RangeForm>,
    #[serde(default)]
    pub variations: Vec<VariationForm>,
}

impl PartForm {
    /// The form as first shown: one empty range row and one empty variation row.
    pub fn blank() -> Self {
        Self {
            part_type: String::new(),
            ranges: vec![RangeForm::default()],
            variations: vec![VariationForm::new("", "0")],
        }
    }

    pub fn validate(&self) -> Result<PartDefinition, FormErrors> {
        let mut errors = FormErrors::default();

        if self.part_type.trim().is_empty() {
            errors.push("part_type", "part type is required");
        }

        if self.ranges.is_empty() {
            errors.push("ranges", "add at least one price range");
        }

        let mut ranges = Vec::with_capacity(self.ranges.len());
        for (i, row) in self.ranges.iter().enumerate() {
            let quantity = parse_quantity(&row.quantity)
                .map_err(|msg| errors.push(format!("ranges[{i}].quantity"), msg))
                .ok();
            let price = parse_amount(&row.price, "price")
                .map_err(|msg| errors.push(format!("ranges[{i}].price"), msg))
                .ok();
            if let (Some(quantity), Some(price)) = (quantity, price) {
                ranges.push(PriceRange::new(quantity, price));
            }
        }

        let mut variations = Vec::with_capacity(self.variations.len());
        let mut names = HashSet::new();
        for (i, row) in self.variations.iter().enumerate() {
            let name = row.name.trim();
            if name.is_empty() {
                errors.push(format!("variations[{i}].name"), "variation name is required");
            } else if !names.insert(name) {
                errors.push(format!("variations[{i}].name"), "variation name must be unique");
            }
            let surcharge = parse_amount(&row.surcharge, "surcharge")
                .map_err(|msg| errors.push(format!("variations[{i}].surcharge"), msg))
                .ok();
            if let Some(surcharge) = surcharge {
                variations.push(Variation::new(name, surcharge));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        PartDefinition::new(self.part_type.trim(), ranges, variations).map_err(|e| {
            let mut errors = FormErrors::default();
            errors.push("form", e.to_string());
            errors
        })
    }
}

impl Default for PartForm {
    fn default() -> Self {
        Self::blank()
    }
}

/// Quote request form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteForm {
    pub part_type: String,
    #[serde(default = "one_text", deserialize_with = "text_or_number")]
    pub quantity: String,
    #[serde(default)]
    pub variations: Vec<String>,
}

impl QuoteForm {
    pub fn new<I, S>(part_type: impl Into<String>, quantity: u32, variations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            part_type: part_type.into(),
            quantity: quantity.to_string(),
            variations: variations.into_iter().map(Into::into).collect(),
        }
    }

    /// The form as first shown: no part selected, quantity 1, no variations.
    pub fn blank() -> Self {
        Self {
            part_type: String::new(),
            quantity: one_text(),
            variations: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<QuoteRequest, FormErrors> {
        let mut errors = FormErrors::default();

        if self.part_type.trim().is_empty() {
            errors.push("part_type", "select a part type");
        }
        let quantity = parse_quantity(&self.quantity)
            .map_err(|msg| errors.push("quantity", msg))
            .ok();

        let Some(quantity) = quantity.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };

        QuoteRequest::new(self.part_type.trim(), quantity, self.variations.iter().cloned())
            .map_err(|e| {
                let mut errors = FormErrors::default();
                errors.push("form", e.to_string());
                errors
            })
    }
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self::blank()
    }
}

fn parse_quantity(text: &str) -> Result<u32, &'static str> {
    let text = text.trim();
    if text.is_empty() {
        return Err("quantity is required");
    }
    let value: i64 = match text.parse() {
        Ok(value) => value,
        Err(_) => whole_number(text).ok_or("quantity must be a whole number")?,
    };
    if value < 1 {
        return Err("quantity must be greater than 0");
    }
    u32::try_from(value).map_err(|_| "quantity is too large")
}

/// Whole-valued decimals such as `10.0`, as JSON encoders emit them.
fn whole_number(text: &str) -> Option<i64> {
    let value: f64 = text.parse().ok()?;
    let whole = value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64;
    whole.then_some(value as i64)
}

fn parse_amount(text: &str, label: &str) -> Result<Money, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(format!("{label} is required"));
    }
    if text.starts_with('-') {
        return Err(format!("{label} must be greater than or equal to 0"));
    }
    text.parse::<Money>()
        .map_err(|_| format!("{label} must be a decimal amount with at most 4 decimal places"))
}

fn zero_text() -> String {
    "0".to_string()
}

fn one_text() -> String {
    "1".to_string()
}

/// Accept `"4.50"` or `4.5` for a text field.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
