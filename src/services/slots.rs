use std::collections::HashMap;

use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;

use crate::domain::slot::{FulfillmentSlot, SlotListQuery};
use crate::forms::slots::AddSlotForm;
use crate::repository::{FishermanProfileReader, SlotReader, SlotWriter, UserWriter};
use crate::services::views::SlotView;
use crate::services::{ServiceError, ServiceResult, sync_fisherman};

#[derive(Debug, Default, Deserialize)]
pub struct SlotsQuery {
    /// Include slots that already ended.
    #[serde(default)]
    pub show_past: bool,
}

pub struct SlotsPageData {
    pub slots: Vec<SlotView>,
    pub show_past: bool,
}

pub fn load_slots<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SlotsQuery,
    now: NaiveDateTime,
) -> ServiceResult<SlotsPageData>
where
    R: SlotReader + FishermanProfileReader + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let mut list_query = SlotListQuery::new(user.hub_id).fisherman_id(fisherman.id);
    if !query.show_past {
        list_query = list_query.ending_after(now);
    }

    let fee = repo
        .get_profile_by_user(fisherman.id, user.hub_id)
        .map_err(ServiceError::from)?
        .map(|profile| profile.delivery_fee_cents)
        .unwrap_or(0);
    let names = HashMap::from([(fisherman.id, fisherman.name.clone())]);
    let fees = HashMap::from([(fisherman.id, fee)]);

    let slots = repo
        .list_slots(list_query)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|slot| SlotView::from_slot(slot, &names, &fees))
        .collect();

    Ok(SlotsPageData {
        slots,
        show_past: query.show_past,
    })
}

pub fn add_slot<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddSlotForm,
    now: NaiveDateTime,
) -> ServiceResult<FulfillmentSlot>
where
    R: SlotWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let new_slot = form
        .into_new_slot(user.hub_id, fisherman.id, now)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_slot(&new_slot).map_err(ServiceError::from)
}

/// Deletes a slot. Orders placed for it keep their snapshot of the window.
pub fn delete_slot<R>(repo: &R, user: &AuthenticatedUser, slot_id: i32) -> ServiceResult<()>
where
    R: SlotReader + SlotWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    repo.get_slot_by_id(slot_id, user.hub_id)
        .map_err(ServiceError::from)?
        .filter(|slot| slot.fisherman_id == fisherman.id)
        .ok_or(ServiceError::NotFound)?;

    repo.delete_slot(slot_id, user.hub_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::slot::FulfillmentType;
    use crate::domain::user::UserRole;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{authenticated, datetime, local_user, slot};

    fn admin_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_upsert_user()
            .returning(|_| Ok(local_user(10, UserRole::Admin)));
        repo
    }

    #[test]
    fn load_slots_hides_past_by_default() {
        let now = datetime("2025-06-01 08:00:00");
        let mut repo = admin_repo();
        repo.expect_get_profile_by_user().returning(|_, _| Ok(None));
        repo.expect_list_slots()
            .withf(move |query| query.ending_after == Some(now) && query.fisherman_id == Some(10))
            .returning(|_| {
                Ok(vec![slot(
                    1,
                    FulfillmentType::Delivery,
                    "2025-06-02 10:00:00",
                    "2025-06-02 12:00:00",
                )])
            });

        let data = load_slots(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            SlotsQuery::default(),
            now,
        )
        .expect("slots load");

        assert_eq!(data.slots.len(), 1);
        assert_eq!(data.slots[0].delivery_fee_cents, 0);
    }

    #[test]
    fn add_slot_rejects_inverted_window() {
        let mut repo = admin_repo();
        repo.expect_create_slot().never();

        let result = add_slot(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            AddSlotForm {
                starts_at: "2025-06-02T12:00".to_string(),
                ends_at: "2025-06-02T10:00".to_string(),
                kind: "pickup".to_string(),
            },
            datetime("2025-06-01 08:00:00"),
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn add_slot_stores_fisherman_slot() {
        let mut repo = admin_repo();
        repo.expect_create_slot()
            .withf(|new_slot| {
                new_slot.fisherman_id == 10 && new_slot.kind == FulfillmentType::Delivery
            })
            .returning(|new_slot| {
                let mut created = slot(
                    5,
                    new_slot.kind,
                    "2025-06-02 10:00:00",
                    "2025-06-02 12:00:00",
                );
                created.starts_at = new_slot.starts_at;
                created.ends_at = new_slot.ends_at;
                Ok(created)
            });

        let created = add_slot(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            AddSlotForm {
                starts_at: "2025-06-02T10:00".to_string(),
                ends_at: "2025-06-02T12:30".to_string(),
                kind: "delivery".to_string(),
            },
            datetime("2025-06-01 08:00:00"),
        )
        .expect("slot created");

        assert_eq!(created.ends_at, datetime("2025-06-02 12:30:00"));
    }

    #[test]
    fn delete_slot_checks_ownership() {
        let mut repo = admin_repo();
        repo.expect_get_slot_by_id().returning(|id, _| {
            let mut other = slot(
                id,
                FulfillmentType::Pickup,
                "2025-06-02 10:00:00",
                "2025-06-02 12:00:00",
            );
            other.fisherman_id = 11;
            Ok(Some(other))
        });
        repo.expect_delete_slot().never();

        let result = delete_slot(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), 5);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
