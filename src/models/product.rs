use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub specialty_item: bool,
    #[serde(default)]
    pub limited_time_offer: bool,
    #[serde(default)]
    pub availability: bool,
}

/// Full create/update body (`POST /products`, `PUT /products/:id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub specialty_item: bool,
    pub limited_time_offer: bool,
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            specialty_item: product.specialty_item,
            limited_time_offer: product.limited_time_offer,
        }
    }
}

/// Price-free update body (`PATCH /products/:id/details`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub name: String,
    pub category: String,
    pub specialty_item: bool,
    pub limited_time_offer: bool,
}

impl From<&ProductDraft> for ProductDetails {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            category: draft.category.clone(),
            specialty_item: draft.specialty_item,
            limited_time_offer: draft.limited_time_offer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityUpdate {
    pub availability: bool,
}

pub const CATEGORIES: [&str; 4] = ["coffee", "tea", "pastry", "merchandise"];
