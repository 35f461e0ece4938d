use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A row of `/inventory`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub reorder_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub notes: String,
}

pub type FieldErrors = BTreeMap<&'static str, &'static str>;

impl InventoryItem {
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Per-field form errors; empty when the item can be submitted.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required");
        }
        if self.category.is_empty() {
            errors.insert("category", "Category is required");
        }
        if self.quantity < 0.0 {
            errors.insert("quantity", "Quantity cannot be negative");
        }
        if self.unit.is_empty() {
            errors.insert("unit", "Unit is required");
        }
        if self.unit_price < 0.0 {
            errors.insert("unitPrice", "Price cannot be negative");
        }
        if self.reorder_level < 0.0 {
            errors.insert("reorderLevel", "Reorder level cannot be negative");
        }
        errors
    }
}
