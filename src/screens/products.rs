use reqwest::Method;

use crate::client::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::gate::{Affordance, ViewGate};
use crate::guard::Admission;
use crate::models::product::{AvailabilityUpdate, Product, ProductDetails, ProductDraft, CATEGORIES};

use super::{require, settle};

/// Actions offered on one row of the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowActions {
    pub toggle_availability: bool,
    pub edit: bool,
    pub delete: bool,
}

impl RowActions {
    pub fn for_gate(gate: &ViewGate) -> Self {
        Self {
            toggle_availability: gate.shows(Affordance::ToggleAvailability),
            edit: gate.shows(Affordance::EditProduct),
            delete: gate.shows(Affordance::DeleteProduct),
        }
    }
}

/// `/products`
#[derive(Debug, Default)]
pub struct ProductListScreen {
    pub products: Vec<Product>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub loaded: bool,
}

impl ProductListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether fresh data was applied.
    pub async fn load(&mut self, api: &ApiClient, admission: &Admission) -> AppResult<bool> {
        let result = api.get::<Vec<Product>>(admission, "/products").await;
        match settle(result, &mut self.error, "Failed to fetch products")? {
            Some(products) => {
                self.products = products;
                self.loaded = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn toggle_availability(
        &mut self,
        api: &ApiClient,
        admission: &Admission,
        gate: &ViewGate,
        product_id: i64,
    ) -> AppResult<bool> {
        require(gate, Affordance::ToggleAvailability)?;
        let current = self
            .products
            .iter()
            .find(|product| product.id == product_id)
            .map(|product| product.availability)
            .ok_or_else(|| AppError::invalid_input(format!("product {product_id} is not listed")))?;

        let body = AvailabilityUpdate { availability: !current };
        let path = format!("/products/{product_id}/availability");
        let result = api.send(admission, Method::PATCH, &path, Some(&body)).await;
        if settle(result, &mut self.error, "Failed to update availability")?.is_none() {
            return Ok(false);
        }

        if let Some(product) = self.products.iter_mut().find(|product| product.id == product_id) {
            product.availability = !current;
        }
        self.notice = Some("Product availability updated successfully!".to_string());
        Ok(true)
    }

    pub async fn delete(
        &mut self,
        api: &ApiClient,
        admission: &Admission,
        gate: &ViewGate,
        product_id: i64,
    ) -> AppResult<bool> {
        require(gate, Affordance::DeleteProduct)?;
        let result = api.delete(admission, &format!("/products/{product_id}")).await;
        if settle(result, &mut self.error, "Failed to delete product")?.is_none() {
            return Ok(false);
        }

        self.products.retain(|product| product.id != product_id);
        self.notice = Some("Product deleted successfully!".to_string());
        Ok(true)
    }
}

fn validate_draft(draft: &ProductDraft) -> AppResult<()> {
    if draft.name.trim().is_empty() {
        return Err(AppError::invalid_input("product name is required"));
    }
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(AppError::invalid_input("price must be a non-negative number"));
    }
    if !CATEGORIES.contains(&draft.category.as_str()) {
        return Err(AppError::invalid_input(format!("unknown category {}", draft.category)));
    }
    Ok(())
}

/// `/add-product`
#[derive(Debug)]
pub struct ProductFormScreen {
    pub draft: ProductDraft,
    pub error: Option<String>,
}

impl Default for ProductFormScreen {
    fn default() -> Self {
        Self {
            draft: ProductDraft {
                name: String::new(),
                price: 0.0,
                category: CATEGORIES[0].to_string(),
                specialty_item: false,
                limited_time_offer: false,
            },
            error: None,
        }
    }
}

impl ProductFormScreen {
    pub async fn submit(&mut self, api: &ApiClient, admission: &Admission, gate: &ViewGate) -> AppResult<Option<Product>> {
        require(gate, Affordance::AddProduct)?;
        validate_draft(&self.draft)?;
        let result = api.post::<_, Product>(admission, "/products", &self.draft).await;
        settle(result, &mut self.error, "Failed to create product")
    }
}

/// How a field of the product editor is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldState {
    pub name: &'static str,
    pub editable: bool,
}

/// Where an edit is sent, depending on whether the price may change.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductUpdate {
    Full { path: String, body: ProductDraft },
    DetailsOnly { path: String, body: ProductDetails },
}

/// `/edit-product/:productId`
#[derive(Debug)]
pub struct ProductEditScreen {
    pub product_id: i64,
    pub draft: Option<ProductDraft>,
    pub error: Option<String>,
}

impl ProductEditScreen {
    pub fn from_admission(admission: &Admission) -> AppResult<Self> {
        let raw = admission
            .param("productId")
            .ok_or_else(|| AppError::invalid_input("missing product id"))?;
        let product_id = raw
            .parse::<i64>()
            .map_err(|_| AppError::invalid_input(format!("invalid product id {raw}")))?;
        Ok(Self {
            product_id,
            draft: None,
            error: None,
        })
    }

    pub async fn load(&mut self, api: &ApiClient, admission: &Admission) -> AppResult<bool> {
        let path = format!("/products/{}", self.product_id);
        let result = api.get::<Product>(admission, &path).await;
        match settle(result, &mut self.error, "Failed to fetch product")? {
            Some(product) => {
                self.draft = Some(ProductDraft::from(&product));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn fields(gate: &ViewGate) -> [FieldState; 5] {
        let price = gate.shows(Affordance::EditPrice);
        [
            FieldState { name: "name", editable: true },
            FieldState { name: "price", editable: price },
            FieldState { name: "category", editable: true },
            FieldState { name: "specialtyItem", editable: true },
            FieldState { name: "limitedTimeOffer", editable: true },
        ]
    }

    /// Builds the request for the current draft. Sessions that may not edit
    /// prices only ever send the price-free body.
    pub fn plan(&self, gate: &ViewGate) -> AppResult<ProductUpdate> {
        require(gate, Affordance::EditProduct)?;
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("product has not been loaded"))?;
        validate_draft(draft)?;

        if gate.shows(Affordance::EditPrice) {
            Ok(ProductUpdate::Full {
                path: format!("/products/{}", self.product_id),
                body: draft.clone(),
            })
        } else {
            Ok(ProductUpdate::DetailsOnly {
                path: format!("/products/{}/details", self.product_id),
                body: ProductDetails::from(draft),
            })
        }
    }

    pub async fn submit(&mut self, api: &ApiClient, admission: &Admission, gate: &ViewGate) -> AppResult<bool> {
        let result = match self.plan(gate)? {
            ProductUpdate::Full { path, body } => api.send(admission, Method::PUT, &path, Some(&body)).await,
            ProductUpdate::DetailsOnly { path, body } => api.send(admission, Method::PATCH, &path, Some(&body)).await,
        };
        Ok(settle(result, &mut self.error, "Failed to update product")?.is_some())
    }
}
