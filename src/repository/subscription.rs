use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::subscription::{
        EmailSubscription as DomainEmailSubscription,
        NewEmailSubscription as DomainNewEmailSubscription, SubscriptionListQuery,
    },
    models::subscription::{
        EmailSubscription as DbEmailSubscription, NewEmailSubscription as DbNewEmailSubscription,
    },
    repository::{DieselRepository, SubscriptionReader, SubscriptionWriter},
};

impl SubscriptionReader for DieselRepository {
    fn list_subscriptions(
        &self,
        query: SubscriptionListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainEmailSubscription>)> {
        use crate::schema::email_subscriptions;

        let mut conn = self.conn()?;

        let total = email_subscriptions::table
            .filter(email_subscriptions::hub_id.eq(query.hub_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = email_subscriptions::table
            .filter(email_subscriptions::hub_id.eq(query.hub_id))
            .order(email_subscriptions::email.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbEmailSubscription>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl SubscriptionWriter for DieselRepository {
    fn subscribe(
        &self,
        subscription: &DomainNewEmailSubscription,
    ) -> RepositoryResult<DomainEmailSubscription> {
        use crate::schema::email_subscriptions;

        let mut conn = self.conn()?;
        let db_new = DbNewEmailSubscription::from(subscription);

        conn.transaction::<DomainEmailSubscription, RepositoryError, _>(|conn| {
            diesel::insert_into(email_subscriptions::table)
                .values(&db_new)
                .on_conflict((email_subscriptions::hub_id, email_subscriptions::email))
                .do_nothing()
                .execute(conn)?;

            let stored = email_subscriptions::table
                .filter(email_subscriptions::hub_id.eq(subscription.hub_id))
                .filter(email_subscriptions::email.eq(&subscription.email))
                .first::<DbEmailSubscription>(conn)?;

            Ok(stored.into())
        })
    }

    fn unsubscribe(&self, token: &str, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::email_subscriptions;

        let mut conn = self.conn()?;

        let target = email_subscriptions::table
            .filter(email_subscriptions::hub_id.eq(hub_id))
            .filter(email_subscriptions::unsubscribe_token.eq(token));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
