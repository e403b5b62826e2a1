//! Shopping cart kept in the signed session cookie of a single browser.

use serde::{Deserialize, Serialize};

use crate::domain::order::{NewOrderLine, SoldOutItem};

/// Session key the cart is stored under.
pub const CART_SESSION_KEY: &str = "cart";

/// Requested quantity of a single product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: i32,
    pub quantity_grams: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity currently requested for `product_id`, zero when absent.
    pub fn quantity_of(&self, product_id: i32) -> i32 {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity_grams)
            .unwrap_or(0)
    }

    /// Add `quantity_grams` of a product, merging with an existing line.
    pub fn add(&mut self, product_id: i32, quantity_grams: i32) {
        if quantity_grams <= 0 {
            return;
        }

        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            Some(item) => item.quantity_grams = item.quantity_grams.saturating_add(quantity_grams),
            None => self.items.push(CartItem {
                product_id,
                quantity_grams,
            }),
        }
    }

    /// Replace the quantity of a product; zero or less removes the line.
    pub fn set_quantity(&mut self, product_id: i32, quantity_grams: i32) {
        if quantity_grams <= 0 {
            self.remove(product_id);
            return;
        }

        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            Some(item) => item.quantity_grams = quantity_grams,
            None => self.items.push(CartItem {
                product_id,
                quantity_grams,
            }),
        }
    }

    /// Remove a product line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: i32) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        before != self.items.len()
    }

    /// Drop every line reported as sold out and return the removed product ids.
    pub fn prune_sold_out(&mut self, sold_out: &[SoldOutItem]) -> Vec<i32> {
        let mut removed = Vec::new();
        for item in sold_out {
            if self.remove(item.product_id) {
                removed.push(item.product_id);
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Cart lines in the shape used to place an order.
    pub fn order_lines(&self) -> Vec<NewOrderLine> {
        self.items
            .iter()
            .map(|item| NewOrderLine {
                product_id: item.product_id,
                quantity_grams: item.quantity_grams,
            })
            .collect()
    }

    pub fn product_ids(&self) -> Vec<i32> {
        self.items.iter().map(|item| item.product_id).collect()
    }
}
