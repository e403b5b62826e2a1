use serde::Deserialize;
use thiserror::Error;

use crate::domain::pricing::parse_grams;

/// Largest quantity a single cart line may request, in grams.
const MAX_LINE_GRAMS: i32 = 1_000_000;

pub type CartFormResult<T> = Result<T, CartFormError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartFormError {
    #[error("invalid quantity `{0}`")]
    InvalidQuantity(String),
    #[error("quantity must be greater than zero")]
    ZeroQuantity,
    #[error("product and quantity lists differ in length")]
    MismatchedLines,
}

fn quantity_to_grams(raw: &str) -> CartFormResult<i32> {
    let grams = parse_grams(raw).ok_or_else(|| CartFormError::InvalidQuantity(raw.to_string()))?;
    if grams > MAX_LINE_GRAMS {
        return Err(CartFormError::InvalidQuantity(raw.to_string()));
    }
    Ok(grams)
}

/// "Add to cart" button on the storefront. The quantity is entered in kg.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity_kg: String,
}

impl AddToCartForm {
    /// Requested quantity in grams.
    pub fn quantity_grams(&self) -> CartFormResult<i32> {
        let grams = quantity_to_grams(&self.quantity_kg)?;
        if grams == 0 {
            return Err(CartFormError::ZeroQuantity);
        }
        Ok(grams)
    }
}

/// The cart page posts every line at once with repeated fields:
/// `product_id=1&quantity_kg=1.5&product_id=2&quantity_kg=0`.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateCartForm {
    #[serde(default)]
    pub product_id: Vec<i32>,
    #[serde(default)]
    pub quantity_kg: Vec<String>,
}

impl UpdateCartForm {
    /// `(product_id, quantity_grams)` pairs; a zero quantity removes the line.
    pub fn into_lines(self) -> CartFormResult<Vec<(i32, i32)>> {
        if self.product_id.len() != self.quantity_kg.len() {
            return Err(CartFormError::MismatchedLines);
        }

        self.product_id
            .into_iter()
            .zip(self.quantity_kg)
            .map(|(product_id, quantity)| Ok((product_id, quantity_to_grams(&quantity)?)))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_converts_kilograms() {
        let form = AddToCartForm {
            product_id: 3,
            quantity_kg: "1,25".to_string(),
        };
        assert_eq!(form.quantity_grams(), Ok(1250));
    }

    #[test]
    fn add_form_rejects_zero_and_garbage() {
        let zero = AddToCartForm {
            product_id: 3,
            quantity_kg: "0".to_string(),
        };
        assert_eq!(zero.quantity_grams(), Err(CartFormError::ZeroQuantity));

        let garbage = AddToCartForm {
            product_id: 3,
            quantity_kg: "lots".to_string(),
        };
        assert!(matches!(
            garbage.quantity_grams(),
            Err(CartFormError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn update_form_parses_repeated_fields() {
        let form: UpdateCartForm =
            serde_html_form::from_str("product_id=1&quantity_kg=1.5&product_id=2&quantity_kg=0")
                .expect("form parses");

        assert_eq!(form.into_lines(), Ok(vec![(1, 1500), (2, 0)]));
    }

    #[test]
    fn update_form_rejects_mismatched_lists() {
        let form = UpdateCartForm {
            product_id: vec![1, 2],
            quantity_kg: vec!["1".to_string()],
        };
        assert_eq!(form.into_lines(), Err(CartFormError::MismatchedLines));
    }
}
