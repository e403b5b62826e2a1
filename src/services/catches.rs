use std::collections::HashMap;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::{catch::Catch, product::{Product, ProductListQuery}};
use crate::forms::catches::{EditProductForm, RecordCatchForm};
use crate::repository::{
    CatchReader, CatchWriter, DefaultPriceReader, ProductReader, ProductWriter, UserWriter,
};
use crate::services::views::{DefaultPriceView, ProductView, SelectOption, fish_form_options};
use crate::services::{ServiceError, ServiceResult, sync_fisherman};

/// Query parameters accepted by the catch inventory page.
#[derive(Debug, Default, Deserialize)]
pub struct CatchesQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    /// Whether products without stock should be listed.
    #[serde(default)]
    pub show_sold_out: bool,
}

/// Data required to render the catch inventory page.
pub struct CatchesPageData {
    pub products: Paginated<ProductView>,
    pub search: Option<String>,
    pub show_sold_out: bool,
    /// Default prices used to pre-fill new catch lines.
    pub default_prices: Vec<DefaultPriceView>,
    pub forms: Vec<SelectOption>,
}

pub fn load_catches<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CatchesQuery,
) -> ServiceResult<CatchesPageData>
where
    R: ProductReader + DefaultPriceReader + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let CatchesQuery {
        search,
        page,
        show_sold_out,
    } = query;
    let search = search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let page = page.unwrap_or(1).max(1);
    let mut list_query = ProductListQuery::new(user.hub_id)
        .fisherman_id(fisherman.id)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if show_sold_out {
        list_query = list_query.include_sold_out();
    }

    let (total, items) = repo.list_products(list_query).map_err(ServiceError::from)?;
    let names = HashMap::from([(fisherman.id, fisherman.name.clone())]);
    let views = items
        .into_iter()
        .map(|product| ProductView::from_product(product, &names))
        .collect();

    let default_prices = repo
        .list_default_prices(user.hub_id, Some(fisherman.id))
        .map_err(ServiceError::from)?
        .into_iter()
        .map(DefaultPriceView::from)
        .collect();

    Ok(CatchesPageData {
        products: Paginated::new(views, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search,
        show_sold_out,
        default_prices,
        forms: fish_form_options(),
    })
}

/// Records a catch. Lines without a price take the fisherman's default price
/// for the species and form.
pub fn record_catch<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RecordCatchForm,
) -> ServiceResult<Catch>
where
    R: CatchWriter + DefaultPriceReader + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let defaults = repo
        .list_default_prices(user.hub_id, Some(fisherman.id))
        .map_err(ServiceError::from)?;

    let new_catch = form
        .into_new_catch(user.hub_id, fisherman.id, &defaults)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo.create_catch(&new_catch).map_err(ServiceError::from)?;
    log::info!(
        "Catch {} recorded with {} product(s) by {}",
        created.id,
        created.products.len(),
        user.email
    );

    Ok(created)
}

/// Loads a product owned by the acting fisherman. Products of other
/// fishermen are reported as missing.
fn owned_product<R>(
    repo: &R,
    product_id: i32,
    hub_id: i32,
    fisherman_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id, hub_id)
        .map_err(ServiceError::from)?
        .filter(|product| product.fisherman_id == fisherman_id)
        .ok_or(ServiceError::NotFound)
}

pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;
    let product_id = form.product_id;

    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    owned_product(repo, product_id, user.hub_id, fisherman.id)?;

    repo.update_product(product_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

pub fn remove_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;
    owned_product(repo, product_id, user.hub_id, fisherman.id)?;

    repo.delete_product(product_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Deletes the catch together with its products.
pub fn remove_catch<R>(repo: &R, user: &AuthenticatedUser, catch_id: i32) -> ServiceResult<()>
where
    R: CatchReader + CatchWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let existing = repo
        .get_catch_by_id(catch_id, user.hub_id)
        .map_err(ServiceError::from)?
        .filter(|found| found.fisherman_id == fisherman.id)
        .ok_or(ServiceError::NotFound)?;

    repo.delete_catch(existing.id, user.hub_id)
        .map_err(ServiceError::from)?;
    log::info!(
        "Catch {} removed with {} product(s) by {}",
        existing.id,
        existing.products.len(),
        user.email
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::default_price::DefaultPrice;
    use crate::domain::product::FishForm;
    use crate::domain::user::UserRole;
    use crate::forms::catches::CatchLineForm;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{authenticated, datetime, local_user, product};

    fn admin_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_upsert_user()
            .returning(|_| Ok(local_user(10, UserRole::Admin)));
        repo
    }

    fn line(species: &str, form: &str, quantity: &str, price: Option<&str>) -> CatchLineForm {
        CatchLineForm {
            species: species.to_string(),
            form: form.to_string(),
            quantity_kg: quantity.to_string(),
            price: price.map(str::to_string),
        }
    }

    #[test]
    fn customers_cannot_manage_catches() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_user().never();

        let result = record_catch(&repo, &authenticated(&[]), RecordCatchForm::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn record_catch_fills_missing_price_from_defaults() {
        let mut repo = admin_repo();
        repo.expect_list_default_prices()
            .withf(|_, fisherman| *fisherman == Some(10))
            .returning(|hub_id, _| {
                Ok(vec![DefaultPrice {
                    id: 1,
                    hub_id,
                    fisherman_id: 10,
                    species: "Pike".to_string(),
                    form: FishForm::Fillet,
                    price_cents: 1900,
                    created_at: datetime("2025-01-01 00:00:00"),
                    updated_at: datetime("2025-01-01 00:00:00"),
                }])
            });
        repo.expect_create_catch()
            .withf(|new_catch| {
                new_catch.lines.len() == 2
                    && new_catch.lines[0].price_cents == 1900
                    && new_catch.lines[1].price_cents == 1200
                    && new_catch.fisherman_id == 10
            })
            .returning(|new_catch| {
                Ok(Catch {
                    id: 3,
                    hub_id: new_catch.hub_id,
                    fisherman_id: new_catch.fisherman_id,
                    caught_on: new_catch.caught_on,
                    notes: None,
                    products: Vec::new(),
                    created_at: datetime("2025-06-01 06:00:00"),
                })
            });

        let form = RecordCatchForm {
            caught_on: "2025-06-01".to_string(),
            notes: None,
            lines: vec![
                line("Pike", "fillet", "2.5", None),
                line("Perch", "whole", "4", Some("12")),
            ],
        };

        let created = record_catch(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), form)
            .expect("catch recorded");

        assert_eq!(
            created.caught_on,
            NaiveDate::from_ymd_opt(2025, 6, 1).expect("date")
        );
    }

    #[test]
    fn record_catch_without_price_or_default_is_rejected() {
        let mut repo = admin_repo();
        repo.expect_list_default_prices()
            .returning(|_, _| Ok(Vec::new()));
        repo.expect_create_catch().never();

        let form = RecordCatchForm {
            caught_on: "2025-06-01".to_string(),
            notes: None,
            lines: vec![line("Pike", "fillet", "2.5", None)],
        };

        let result = record_catch(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn update_product_of_other_fisherman_is_not_found() {
        let mut repo = admin_repo();
        repo.expect_get_product_by_id().returning(|id, _| {
            let mut other = product(id, 1000, 1000);
            other.fisherman_id = 99;
            Ok(Some(other))
        });
        repo.expect_update_product().never();

        let result = update_product(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            EditProductForm {
                product_id: 5,
                price: Some("15".to_string()),
                quantity_kg: None,
            },
        );

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn update_product_applies_price_and_stock() {
        let mut repo = admin_repo();
        repo.expect_get_product_by_id()
            .returning(|id, _| Ok(Some(product(id, 1000, 1000))));
        repo.expect_update_product()
            .withf(|id, _, updates| {
                *id == 5
                    && updates.price_cents == Some(1550)
                    && updates.available_grams == Some(2500)
            })
            .returning(|id, _, _| Ok(product(id, 1550, 2500)));

        let updated = update_product(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            EditProductForm {
                product_id: 5,
                price: Some("15.50".to_string()),
                quantity_kg: Some("2.5".to_string()),
            },
        )
        .expect("product updated");

        assert_eq!(updated.available_grams, 2500);
    }

    #[test]
    fn remove_catch_deletes_owned_catch() {
        let mut repo = admin_repo();
        repo.expect_get_catch_by_id().returning(|id, hub_id| {
            Ok(Some(Catch {
                id,
                hub_id,
                fisherman_id: 10,
                caught_on: NaiveDate::from_ymd_opt(2025, 6, 1).expect("date"),
                notes: None,
                products: vec![product(1, 1000, 0)],
                created_at: datetime("2025-06-01 06:00:00"),
            }))
        });
        repo.expect_delete_catch()
            .withf(|id, _| *id == 3)
            .times(1)
            .returning(|_, _| Ok(()));

        assert!(remove_catch(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), 3).is_ok());
    }
}
