use crate::client::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::gate::{Affordance, ViewGate};
use crate::guard::Admission;
use crate::models::inventory::InventoryItem;

use super::{reject_invalid, require, settle};

/// `/management/inventory`
#[derive(Debug, Default)]
pub struct InventoryScreen {
    pub items: Vec<InventoryItem>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl InventoryScreen {
    pub async fn load(&mut self, api: &ApiClient, admission: &Admission) -> AppResult<bool> {
        let result = api.get::<Vec<InventoryItem>>(admission, "/inventory").await;
        match settle(result, &mut self.error, "Failed to load inventory")? {
            Some(items) => {
                self.items = items;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn low_stock(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter().filter(|item| item.needs_reorder())
    }

    pub async fn add(
        &mut self,
        api: &ApiClient,
        admission: &Admission,
        gate: &ViewGate,
        item: &InventoryItem,
    ) -> AppResult<bool> {
        require(gate, Affordance::ManageInventory)?;
        reject_invalid(item.validate())?;

        let result = api.post::<_, InventoryItem>(admission, "/inventory", item).await;
        match settle(result, &mut self.error, "Failed to add item")? {
            Some(created) => {
                self.items.push(created);
                self.notice = Some("Item added successfully!".to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn update(
        &mut self,
        api: &ApiClient,
        admission: &Admission,
        gate: &ViewGate,
        item: &InventoryItem,
    ) -> AppResult<bool> {
        require(gate, Affordance::ManageInventory)?;
        reject_invalid(item.validate())?;
        let id = item
            .id
            .ok_or_else(|| AppError::invalid_input("inventory item has no id"))?;

        let result = api.put::<_, InventoryItem>(admission, &format!("/inventory/{id}"), item).await;
        match settle(result, &mut self.error, "Failed to update item")? {
            Some(updated) => {
                if let Some(slot) = self.items.iter_mut().find(|existing| existing.id == Some(id)) {
                    *slot = updated;
                }
                self.notice = Some("Item updated successfully!".to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete(
        &mut self,
        api: &ApiClient,
        admission: &Admission,
        gate: &ViewGate,
        id: i64,
    ) -> AppResult<bool> {
        require(gate, Affordance::ManageInventory)?;
        let result = api.delete(admission, &format!("/inventory/{id}")).await;
        if settle(result, &mut self.error, "Failed to delete item")?.is_none() {
            return Ok(false);
        }
        self.items.retain(|item| item.id != Some(id));
        self.notice = Some("Item deleted successfully!".to_string());
        Ok(true)
    }
}
