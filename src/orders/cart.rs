//! Free-text grocery cart

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NewOrder, NewOrderItem, OrderRow, OrderStatus, OrdersClient};
use crate::error::{Error, ValidationError};

/// One line of the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub note: Option<String>,
}

/// Items collected before an order is placed
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line. The quantity is typed text; anything that is not a
    /// positive number counts as one.
    pub fn add_item(
        &mut self,
        name: &str,
        quantity: &str,
        note: &str,
    ) -> Result<&CartItem, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyItemName);
        }

        let quantity = match quantity.trim().parse::<u32>() {
            Ok(q) if q > 0 => q,
            _ => 1,
        };
        let note = Some(note.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        self.items.push(CartItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            quantity,
            note,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Remove a line; `false` when no line has that id
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Set the quantity of a line, never below one
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = quantity.clamp(1, u32::MAX as i64) as u32;
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Place the cart as a pending order for `user_id`.
///
/// Items carry no price, so the total is always zero. The cart is only
/// emptied once both the header and its items are stored.
pub async fn place_order(
    client: &OrdersClient,
    user_id: &str,
    cart: &mut Cart,
) -> Result<OrderRow, Error> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }

    let order = client
        .insert_order(&NewOrder {
            user_id: user_id.to_string(),
            total_amount: 0.0,
            status: OrderStatus::Pending,
        })
        .await?;

    let items: Vec<NewOrderItem> = cart
        .items()
        .iter()
        .map(|item| NewOrderItem {
            order_id: order.id.clone(),
            item_name: item.name.clone(),
            quantity: item.quantity,
            note: item.note.clone(),
        })
        .collect();
    client.insert_order_items(&items).await?;

    log::info!("placed order {} with {} items", order.id, items.len());
    cart.clear();
    Ok(order)
}
