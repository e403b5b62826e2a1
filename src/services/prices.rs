use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::prices::{UploadDefaultPricesForm, UpsertDefaultPriceForm};
use crate::repository::{DefaultPriceReader, DefaultPriceWriter, UserWriter};
use crate::services::views::{DefaultPriceView, SelectOption, fish_form_options};
use crate::services::{ServiceError, ServiceResult, sync_fisherman};

/// Data required to render the default prices page.
pub struct PricesPageData {
    pub prices: Vec<DefaultPriceView>,
    pub forms: Vec<SelectOption>,
}

pub fn load_prices<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<PricesPageData>
where
    R: DefaultPriceReader + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let prices = repo
        .list_default_prices(user.hub_id, Some(fisherman.id))
        .map_err(ServiceError::from)?
        .into_iter()
        .map(DefaultPriceView::from)
        .collect();

    Ok(PricesPageData {
        prices,
        forms: fish_form_options(),
    })
}

/// Inserts or replaces the price for one species and form.
pub fn save_price<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UpsertDefaultPriceForm,
) -> ServiceResult<()>
where
    R: DefaultPriceWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let upsert = form
        .into_upsert(user.hub_id, fisherman.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.upsert_default_prices(std::slice::from_ref(&upsert))
        .map_err(ServiceError::from)?;
    Ok(())
}

pub fn delete_price<R>(repo: &R, user: &AuthenticatedUser, price_id: i32) -> ServiceResult<()>
where
    R: DefaultPriceReader + DefaultPriceWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let owned = repo
        .list_default_prices(user.hub_id, Some(fisherman.id))
        .map_err(ServiceError::from)?
        .iter()
        .any(|price| price.id == price_id);
    if !owned {
        return Err(ServiceError::NotFound);
    }

    repo.delete_default_price(price_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Imports `species,form,price` rows from an uploaded CSV file. Returns the
/// number of stored rows.
pub fn upload_prices<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut form: UploadDefaultPricesForm,
) -> ServiceResult<usize>
where
    R: DefaultPriceWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let upserts = form
        .into_upserts(user.hub_id, fisherman.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let stored = repo
        .upsert_default_prices(&upserts)
        .map_err(ServiceError::from)?;
    log::info!("Imported {stored} default price(s) for {}", user.email);

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use actix_multipart::form::tempfile::TempFile;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::default_price::DefaultPrice;
    use crate::domain::product::FishForm;
    use crate::domain::user::UserRole;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{authenticated, datetime, local_user};

    fn admin_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_upsert_user()
            .returning(|_| Ok(local_user(10, UserRole::Admin)));
        repo
    }

    fn stored_price(id: i32) -> DefaultPrice {
        DefaultPrice {
            id,
            hub_id: 1,
            fisherman_id: 10,
            species: "Pike".to_string(),
            form: FishForm::Whole,
            price_cents: 1200,
            created_at: datetime("2025-01-01 00:00:00"),
            updated_at: datetime("2025-01-01 00:00:00"),
        }
    }

    #[test]
    fn save_price_upserts_single_row() {
        let mut repo = admin_repo();
        repo.expect_upsert_default_prices()
            .withf(|prices| {
                prices.len() == 1
                    && prices[0].species == "Pike"
                    && prices[0].form == FishForm::Steak
                    && prices[0].price_cents == 2150
                    && prices[0].fisherman_id == 10
            })
            .returning(|prices| Ok(prices.len()));

        let form = UpsertDefaultPriceForm {
            species: "Pike".to_string(),
            form: "steak".to_string(),
            price: "21.50".to_string(),
        };

        assert!(save_price(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), form).is_ok());
    }

    #[test]
    fn delete_price_of_another_fisherman_is_not_found() {
        let mut repo = admin_repo();
        repo.expect_list_default_prices()
            .returning(|_, _| Ok(vec![stored_price(1)]));
        repo.expect_delete_default_price().never();

        let result = delete_price(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), 2);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn upload_prices_stores_every_row() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "Species,Form,Price").expect("write header");
        writeln!(file, "Pike,whole,12").expect("write row");
        writeln!(file, "Perch,fillet,\"18,50\"").expect("write row");

        let form = UploadDefaultPricesForm {
            csv: TempFile {
                file,
                content_type: None,
                file_name: Some("prices.csv".to_string()),
                size: 0,
            },
        };

        let mut repo = admin_repo();
        repo.expect_upsert_default_prices()
            .withf(|prices| prices.len() == 2 && prices[1].price_cents == 1850)
            .returning(|prices| Ok(prices.len()));

        let stored = upload_prices(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), form)
            .expect("upload succeeds");

        assert_eq!(stored, 2);
    }
}
