use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::fisherman_profile::{
        FishermanCard, FishermanProfile as DomainFishermanProfile,
        UpsertFishermanProfile as DomainUpsertFishermanProfile,
    },
    models::fisherman_profile::{
        FishermanProfile as DbFishermanProfile,
        UpsertFishermanProfile as DbUpsertFishermanProfile,
    },
    repository::{DieselRepository, FishermanProfileReader, FishermanProfileWriter},
};

impl FishermanProfileReader for DieselRepository {
    fn get_profile_by_user(
        &self,
        user_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainFishermanProfile>> {
        use crate::schema::fisherman_profiles;

        let mut conn = self.conn()?;
        let profile = fisherman_profiles::table
            .filter(fisherman_profiles::user_id.eq(user_id))
            .filter(fisherman_profiles::hub_id.eq(hub_id))
            .first::<DbFishermanProfile>(&mut conn)
            .optional()?;

        Ok(profile.map(Into::into))
    }

    fn list_fisherman_cards(
        &self,
        hub_id: i32,
        displayed_only: bool,
    ) -> RepositoryResult<Vec<FishermanCard>> {
        use crate::schema::{fisherman_profiles, users};

        let mut conn = self.conn()?;

        let mut query = fisherman_profiles::table
            .inner_join(users::table)
            .filter(fisherman_profiles::hub_id.eq(hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if displayed_only {
            query = query.filter(fisherman_profiles::is_displayed.eq(true));
        }

        let rows = query
            .order(users::name.asc())
            .select((DbFishermanProfile::as_select(), users::name))
            .load::<(DbFishermanProfile, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(profile, name)| FishermanCard {
                name,
                profile: profile.into(),
            })
            .collect())
    }
}

impl FishermanProfileWriter for DieselRepository {
    fn upsert_profile(
        &self,
        profile: &DomainUpsertFishermanProfile,
    ) -> RepositoryResult<DomainFishermanProfile> {
        use crate::schema::fisherman_profiles;

        let mut conn = self.conn()?;
        let row = DbUpsertFishermanProfile::from(profile);

        let stored = diesel::insert_into(fisherman_profiles::table)
            .values(&row)
            .on_conflict(fisherman_profiles::user_id)
            .do_update()
            .set(&row)
            .get_result::<DbFishermanProfile>(&mut conn)?;

        Ok(stored.into())
    }
}
