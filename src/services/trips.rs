use std::collections::HashMap;

use chrono::NaiveDate;
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::planned_trip::{PlannedTrip, PlannedTripListQuery};
use crate::forms::trips::AddTripForm;
use crate::repository::{PlannedTripReader, PlannedTripWriter, UserWriter};
use crate::services::views::TripView;
use crate::services::{ServiceError, ServiceResult, sync_fisherman};

pub fn load_trips<R>(
    repo: &R,
    user: &AuthenticatedUser,
    today: NaiveDate,
) -> ServiceResult<Vec<TripView>>
where
    R: PlannedTripReader + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;
    let names = HashMap::from([(fisherman.id, fisherman.name.clone())]);

    let trips = repo
        .list_planned_trips(
            PlannedTripListQuery::new(user.hub_id)
                .fisherman_id(fisherman.id)
                .from(today),
        )
        .map_err(ServiceError::from)?;

    Ok(trips
        .into_iter()
        .map(|trip| TripView::from_trip(trip, &names))
        .collect())
}

/// Plans a trip. A fisherman can plan at most one trip per date.
pub fn add_trip<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddTripForm,
    today: NaiveDate,
) -> ServiceResult<PlannedTrip>
where
    R: PlannedTripReader + PlannedTripWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let new_trip = form
        .into_new_trip(user.hub_id, fisherman.id, today)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let existing = repo
        .list_planned_trips(
            PlannedTripListQuery::new(user.hub_id)
                .fisherman_id(fisherman.id)
                .from(new_trip.trip_date),
        )
        .map_err(ServiceError::from)?;
    if existing
        .iter()
        .any(|trip| trip.trip_date == new_trip.trip_date)
    {
        return Err(ServiceError::Conflict);
    }

    repo.create_planned_trip(&new_trip)
        .map_err(ServiceError::from)
}

pub fn delete_trip<R>(repo: &R, user: &AuthenticatedUser, trip_id: i32) -> ServiceResult<()>
where
    R: PlannedTripReader + PlannedTripWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let owned = repo
        .list_planned_trips(PlannedTripListQuery::new(user.hub_id).fisherman_id(fisherman.id))
        .map_err(ServiceError::from)?
        .iter()
        .any(|trip| trip.id == trip_id);
    if !owned {
        return Err(ServiceError::NotFound);
    }

    repo.delete_planned_trip(trip_id, user.hub_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::user::UserRole;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{authenticated, datetime, local_user};

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
    }

    fn trip(id: i32, trip_date: &str) -> PlannedTrip {
        PlannedTrip {
            id,
            hub_id: 1,
            fisherman_id: 10,
            trip_date: date(trip_date),
            note: None,
            created_at: datetime("2025-05-01 00:00:00"),
        }
    }

    fn admin_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_upsert_user()
            .returning(|_| Ok(local_user(10, UserRole::Admin)));
        repo
    }

    #[test]
    fn duplicate_date_is_a_conflict() {
        let mut repo = admin_repo();
        repo.expect_list_planned_trips()
            .returning(|_| Ok(vec![trip(1, "2025-06-05")]));
        repo.expect_create_planned_trip().never();

        let result = add_trip(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            AddTripForm {
                trip_date: "2025-06-05".to_string(),
                note: None,
            },
            date("2025-06-01"),
        );

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn new_date_is_planned() {
        let mut repo = admin_repo();
        repo.expect_list_planned_trips()
            .returning(|_| Ok(vec![trip(1, "2025-06-07")]));
        repo.expect_create_planned_trip()
            .withf(|new_trip| new_trip.note.as_deref() == Some("Lake, early morning"))
            .returning(|new_trip| {
                let mut created = trip(2, "2025-06-05");
                created.note = new_trip.note.clone();
                Ok(created)
            });

        let created = add_trip(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            AddTripForm {
                trip_date: "2025-06-05".to_string(),
                note: Some(" Lake, early morning ".to_string()),
            },
            date("2025-06-01"),
        )
        .expect("trip planned");

        assert_eq!(created.id, 2);
    }

    #[test]
    fn delete_unknown_trip_is_not_found() {
        let mut repo = admin_repo();
        repo.expect_list_planned_trips()
            .returning(|_| Ok(vec![trip(1, "2025-06-07")]));
        repo.expect_delete_planned_trip().never();

        let result = delete_trip(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), 9);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
