use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::cart::Cart;
use crate::forms::{optional_inline, optional_multiline, sanitize_inline_text, sanitize_phone};

const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

const PHONE_MAX_LEN: usize = 32;
const PHONE_MAX_LEN_VALIDATOR: u64 = PHONE_MAX_LEN as u64;

const ADDRESS_MAX_LEN: usize = 512;
const ADDRESS_MAX_LEN_VALIDATOR: u64 = ADDRESS_MAX_LEN as u64;

const NOTES_MAX_LEN: usize = 2048;
const NOTES_MAX_LEN_VALIDATOR: u64 = NOTES_MAX_LEN as u64;

pub type CheckoutFormResult<T> = Result<T, CheckoutFormError>;

#[derive(Debug, Error)]
pub enum CheckoutFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("contact name cannot be empty")]
    EmptyName,
    #[error("contact phone cannot be empty")]
    EmptyPhone,
}

/// Checkout form submitted from the cart page.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutForm {
    pub slot_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub contact_name: String,
    #[validate(length(min = 1, max = PHONE_MAX_LEN_VALIDATOR))]
    pub contact_phone: String,
    #[validate(length(max = ADDRESS_MAX_LEN_VALIDATOR))]
    pub delivery_address: Option<String>,
    #[validate(length(max = NOTES_MAX_LEN_VALIDATOR))]
    pub notes: Option<String>,
}

/// Sanitised checkout details. Whether the delivery address is required
/// depends on the chosen slot, which is checked by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPayload {
    pub slot_id: i32,
    pub contact_name: String,
    pub contact_phone: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

impl CheckoutForm {
    pub fn into_payload(self) -> CheckoutFormResult<CheckoutPayload> {
        self.validate()?;

        let contact_name = sanitize_inline_text(&self.contact_name);
        if contact_name.is_empty() {
            return Err(CheckoutFormError::EmptyName);
        }

        let contact_phone = sanitize_phone(&self.contact_phone);
        if contact_phone.is_empty() {
            return Err(CheckoutFormError::EmptyPhone);
        }

        Ok(CheckoutPayload {
            slot_id: self.slot_id,
            contact_name,
            contact_phone,
            delivery_address: optional_inline(self.delivery_address.as_deref()),
            notes: optional_multiline(self.notes.as_deref()),
        })
    }
}

/// A line of an order placed through the JSON API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOrderLine {
    pub product_id: i32,
    pub quantity_grams: i32,
}

/// JSON body of `POST /api/v1/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOrderRequest {
    #[serde(flatten)]
    pub checkout: CheckoutForm,
    pub items: Vec<ApiOrderLine>,
}

impl ApiOrderRequest {
    /// Split the request into a transient cart and the checkout form.
    pub fn into_parts(self) -> (Cart, CheckoutForm) {
        let mut cart = Cart::default();
        for line in self.items {
            cart.add(line.product_id, line.quantity_grams);
        }
        (cart, self.checkout)
    }
}
