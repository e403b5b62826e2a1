use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{
    cart::Cart,
    order::SoldOutItem,
    pricing::{OrderTotals, format_cents, format_kg, line_total_cents},
    product::{FishForm, Product},
    slot::FulfillmentType,
};
use crate::forms::cart::{AddToCartForm, UpdateCartForm};
use crate::repository::ProductReader;
use crate::services::views::fish_form_label;
use crate::services::{ServiceError, ServiceResult};

/// A cart line priced with the product's current price.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CartLineView {
    pub product_id: i32,
    pub fisherman_id: Option<i32>,
    pub species: String,
    pub form: Option<FishForm>,
    pub form_label: &'static str,
    pub price_cents: i32,
    pub price_formatted: String,
    pub quantity_grams: i32,
    pub quantity_kg: String,
    pub line_total_cents: i64,
    pub line_total_formatted: String,
    pub available_kg: String,
    /// `false` when the product no longer exists; such lines are not priced.
    pub available: bool,
    /// Requested more than is currently in stock.
    pub exceeds_stock: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub fulfillment_type: Option<FulfillmentType>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
    pub subtotal_formatted: String,
    pub delivery_fee_formatted: String,
    pub total_formatted: String,
    pub item_count: usize,
    pub is_empty: bool,
    pub has_problems: bool,
}

fn products_by_id<R>(repo: &R, hub_id: i32, ids: &[i32]) -> ServiceResult<HashMap<i32, Product>>
where
    R: ProductReader + ?Sized,
{
    let products = repo
        .get_products_by_ids(ids, hub_id)
        .map_err(ServiceError::from)?;
    Ok(products.into_iter().map(|product| (product.id, product)).collect())
}

/// Price the cart with live prices. `delivery_fee_cents` is only charged for
/// [`FulfillmentType::Delivery`].
pub fn load_cart<R>(
    repo: &R,
    hub_id: i32,
    cart: &Cart,
    fulfillment: Option<FulfillmentType>,
    delivery_fee_cents: i32,
) -> ServiceResult<CartView>
where
    R: ProductReader + ?Sized,
{
    let products = products_by_id(repo, hub_id, &cart.product_ids())?;

    let mut lines = Vec::with_capacity(cart.items.len());
    let mut priced = Vec::with_capacity(cart.items.len());

    for item in &cart.items {
        let line = match products.get(&item.product_id) {
            Some(product) => {
                priced.push((product.price_cents, item.quantity_grams));
                let line_total = line_total_cents(product.price_cents, item.quantity_grams);
                CartLineView {
                    product_id: item.product_id,
                    fisherman_id: Some(product.fisherman_id),
                    species: product.species.clone(),
                    form: Some(product.form),
                    form_label: fish_form_label(product.form),
                    price_cents: product.price_cents,
                    price_formatted: format_cents(i64::from(product.price_cents)),
                    quantity_grams: item.quantity_grams,
                    quantity_kg: format_kg(item.quantity_grams),
                    line_total_cents: line_total,
                    line_total_formatted: format_cents(line_total),
                    available_kg: format_kg(product.available_grams),
                    available: true,
                    exceeds_stock: item.quantity_grams > product.available_grams,
                }
            }
            None => CartLineView {
                product_id: item.product_id,
                fisherman_id: None,
                species: String::new(),
                form: None,
                form_label: "",
                price_cents: 0,
                price_formatted: format_cents(0),
                quantity_grams: item.quantity_grams,
                quantity_kg: format_kg(item.quantity_grams),
                line_total_cents: 0,
                line_total_formatted: format_cents(0),
                available_kg: format_kg(0),
                available: false,
                exceeds_stock: true,
            },
        };
        lines.push(line);
    }

    let totals = OrderTotals::compute(priced, fulfillment, delivery_fee_cents);
    let has_problems = lines.iter().any(|line| !line.available || line.exceeds_stock);

    Ok(CartView {
        item_count: lines.len(),
        is_empty: lines.is_empty(),
        has_problems,
        lines,
        fulfillment_type: fulfillment,
        subtotal_cents: totals.subtotal_cents,
        delivery_fee_cents: totals.delivery_fee_cents,
        total_cents: totals.total_cents,
        subtotal_formatted: format_cents(totals.subtotal_cents),
        delivery_fee_formatted: format_cents(totals.delivery_fee_cents),
        total_formatted: format_cents(totals.total_cents),
    })
}

fn sold_out_item(product: &Product, requested_grams: i32) -> SoldOutItem {
    SoldOutItem {
        product_id: product.id,
        species: product.species.clone(),
        form: Some(product.form),
        requested_grams,
        available_grams: product.available_grams.max(0),
    }
}

/// Add a product to the cart, merging with an existing line.
///
/// The merged quantity is checked against the current stock; the binding
/// check happens when the order is placed.
pub fn add_to_cart<R>(
    repo: &R,
    hub_id: i32,
    cart: &mut Cart,
    form: AddToCartForm,
) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    let quantity = form
        .quantity_grams()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product = repo
        .get_product_by_id(form.product_id, hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let merged = cart.quantity_of(product.id).saturating_add(quantity);
    if !product.in_stock() || merged > product.available_grams {
        return Err(ServiceError::SoldOut(vec![sold_out_item(&product, merged)]));
    }

    cart.add(product.id, quantity);
    Ok(product)
}

/// Replace cart quantities. Nothing changes when any line exceeds the stock.
pub fn update_cart<R>(
    repo: &R,
    hub_id: i32,
    cart: &mut Cart,
    form: UpdateCartForm,
) -> ServiceResult<()>
where
    R: ProductReader + ?Sized,
{
    let lines = form
        .into_lines()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let ids: Vec<i32> = lines
        .iter()
        .filter(|(_, grams)| *grams > 0)
        .map(|(id, _)| *id)
        .collect();
    let products = products_by_id(repo, hub_id, &ids)?;

    let mut sold_out = Vec::new();
    for (product_id, grams) in &lines {
        if *grams <= 0 {
            continue;
        }
        match products.get(product_id) {
            Some(product) if *grams <= product.available_grams => {}
            Some(product) => sold_out.push(sold_out_item(product, *grams)),
            None => sold_out.push(SoldOutItem {
                product_id: *product_id,
                species: String::new(),
                form: None,
                requested_grams: *grams,
                available_grams: 0,
            }),
        }
    }

    if !sold_out.is_empty() {
        return Err(ServiceError::SoldOut(sold_out));
    }

    for (product_id, grams) in lines {
        cart.set_quantity(product_id, grams);
    }

    Ok(())
}

pub fn remove_from_cart(cart: &mut Cart, product_id: i32) -> ServiceResult<()> {
    if !cart.remove(product_id) {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::product;

    fn add_form(product_id: i32, quantity_kg: &str) -> AddToCartForm {
        AddToCartForm {
            product_id,
            quantity_kg: quantity_kg.to_string(),
        }
    }

    #[test]
    fn load_cart_prices_lines_and_adds_fee_for_delivery() {
        let mut repo = MockRepository::new();
        repo.expect_get_products_by_ids()
            .returning(|_, _| Ok(vec![product(1, 2000, 5000), product(2, 1000, 500)]));

        let mut cart = Cart::default();
        cart.add(1, 1500);
        cart.add(2, 250);

        let pickup = load_cart(&repo, 1, &cart, Some(FulfillmentType::Pickup), 400)
            .expect("cart loads");
        assert_eq!(pickup.subtotal_cents, 3000 + 250);
        assert_eq!(pickup.delivery_fee_cents, 0);
        assert_eq!(pickup.total_cents, 3250);

        let delivery = load_cart(&repo, 1, &cart, Some(FulfillmentType::Delivery), 400)
            .expect("cart loads");
        assert_eq!(delivery.total_cents, 3250 + 400);
        assert_eq!(delivery.total_formatted, "36.50");
        assert!(!delivery.has_problems);
    }

    #[test]
    fn load_cart_flags_vanished_products() {
        let mut repo = MockRepository::new();
        repo.expect_get_products_by_ids()
            .returning(|_, _| Ok(vec![product(1, 2000, 5000)]));

        let mut cart = Cart::default();
        cart.add(1, 1000);
        cart.add(99, 1000);

        let view = load_cart(&repo, 1, &cart, None, 0).expect("cart loads");

        assert_eq!(view.lines.len(), 2);
        assert!(!view.lines[1].available);
        assert!(view.has_problems);
        assert_eq!(view.subtotal_cents, 2000);
    }

    #[test]
    fn add_to_cart_merges_within_stock() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|id, _| Ok(Some(product(id, 1000, 2000))));

        let mut cart = Cart::default();
        add_to_cart(&repo, 1, &mut cart, add_form(3, "1")).expect("first add");
        add_to_cart(&repo, 1, &mut cart, add_form(3, "0.5")).expect("second add");

        assert_eq!(cart.quantity_of(3), 1500);
    }

    #[test]
    fn add_to_cart_rejects_merged_quantity_over_stock() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|id, _| Ok(Some(product(id, 1000, 2000))));

        let mut cart = Cart::default();
        cart.add(3, 1500);

        let result = add_to_cart(&repo, 1, &mut cart, add_form(3, "1"));

        match result {
            Err(ServiceError::SoldOut(items)) => {
                assert_eq!(items[0].requested_grams, 2500);
                assert_eq!(items[0].available_grams, 2000);
            }
            other => panic!("expected sold out, got {other:?}"),
        }
        assert_eq!(cart.quantity_of(3), 1500);
    }

    #[test]
    fn add_to_cart_unknown_product_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id().returning(|_, _| Ok(None));

        let mut cart = Cart::default();
        let result = add_to_cart(&repo, 1, &mut cart, add_form(3, "1"));

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert!(cart.is_empty());
    }

    #[test]
    fn update_cart_removes_zero_lines_and_keeps_cart_on_overflow() {
        let mut repo = MockRepository::new();
        repo.expect_get_products_by_ids()
            .returning(|_, _| Ok(vec![product(1, 1000, 1000)]));

        let mut cart = Cart::default();
        cart.add(1, 500);
        cart.add(2, 500);

        let ok = UpdateCartForm {
            product_id: vec![1, 2],
            quantity_kg: vec!["1".to_string(), "0".to_string()],
        };
        update_cart(&repo, 1, &mut cart, ok).expect("update succeeds");
        assert_eq!(cart.quantity_of(1), 1000);
        assert_eq!(cart.quantity_of(2), 0);

        let too_much = UpdateCartForm {
            product_id: vec![1],
            quantity_kg: vec!["2".to_string()],
        };
        let result = update_cart(&repo, 1, &mut cart, too_much);
        assert!(matches!(result, Err(ServiceError::SoldOut(_))));
        assert_eq!(cart.quantity_of(1), 1000);
    }

    #[test]
    fn remove_from_cart_reports_missing_line() {
        let mut cart = Cart::default();
        cart.add(1, 500);

        assert!(remove_from_cart(&mut cart, 1).is_ok());
        assert!(matches!(
            remove_from_cart(&mut cart, 1),
            Err(ServiceError::NotFound)
        ));
    }
}
