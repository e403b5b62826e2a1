use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::subscription::{EmailSubscription, SubscriptionListQuery};
use crate::forms::subscriptions::BroadcastForm;
use crate::mailer::Mailer;
use crate::repository::SubscriptionReader;
use crate::services::notifications::{broadcast_email, send_best_effort};
use crate::services::{ServiceError, ServiceResult, ensure_admin};

#[derive(Debug, Default, Deserialize)]
pub struct SubscribersQuery {
    pub page: Option<usize>,
}

pub struct SubscribersPageData {
    pub subscriptions: Paginated<EmailSubscription>,
    pub total: usize,
}

pub fn load_subscribers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SubscribersQuery,
) -> ServiceResult<SubscribersPageData>
where
    R: SubscriptionReader + ?Sized,
{
    ensure_admin(user)?;

    let page = query.page.unwrap_or(1).max(1);
    let (total, items) = repo
        .list_subscriptions(
            SubscriptionListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE),
        )
        .map_err(ServiceError::from)?;

    Ok(SubscribersPageData {
        subscriptions: Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        total,
    })
}

/// Sends the message to every subscriber of the hub and returns the number of
/// queued emails. Delivery failures are logged per recipient.
pub fn broadcast<R>(
    repo: &R,
    mailer: &dyn Mailer,
    user: &AuthenticatedUser,
    form: BroadcastForm,
    public_url: &str,
) -> ServiceResult<usize>
where
    R: SubscriptionReader + ?Sized,
{
    ensure_admin(user)?;

    let message = form
        .into_message()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let (_, subscriptions) = repo
        .list_subscriptions(SubscriptionListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;

    for subscription in &subscriptions {
        send_best_effort(
            mailer,
            broadcast_email(subscription, &message.subject, &message.body, public_url),
        );
    }

    log::info!(
        "Broadcast `{}` queued for {} subscriber(s) by {}",
        message.subject,
        subscriptions.len(),
        user.email
    );

    Ok(subscriptions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::mailer::{MailerError, MockMailer};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{authenticated, datetime};

    fn subscription(id: i32, email: &str) -> EmailSubscription {
        EmailSubscription {
            id,
            hub_id: 1,
            email: email.to_string(),
            unsubscribe_token: format!("token{id}"),
            created_at: datetime("2025-05-01 00:00:00"),
        }
    }

    #[test]
    fn broadcast_reaches_every_subscriber_despite_failures() {
        let mut repo = MockRepository::new();
        repo.expect_list_subscriptions().returning(|_| {
            Ok((
                2,
                vec![
                    subscription(1, "a@example.com"),
                    subscription(2, "b@example.com"),
                ],
            ))
        });

        let mut mailer = MockMailer::new();
        mailer
            .expect_dispatch()
            .withf(|email| email.to == "a@example.com")
            .times(1)
            .returning(|_| Err(MailerError::Config("EMAIL_API_URL".to_string())));
        mailer
            .expect_dispatch()
            .withf(|email| {
                email.to == "b@example.com"
                    && email.subject == "Fresh pike"
                    && email
                        .text
                        .contains("https://fish.example.com/unsubscribe?token=token2")
            })
            .times(1)
            .returning(|_| Ok(()));

        let sent = broadcast(
            &repo,
            &mailer,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            BroadcastForm {
                subject: "Fresh pike".to_string(),
                body: "Back from the lake.".to_string(),
            },
            "https://fish.example.com/",
        )
        .expect("broadcast sent");

        assert_eq!(sent, 2);
    }

    #[test]
    fn broadcast_requires_admin_and_message() {
        let repo = MockRepository::new();
        let mailer = MockMailer::new();

        assert!(matches!(
            broadcast(
                &repo,
                &mailer,
                &authenticated(&[]),
                BroadcastForm {
                    subject: "x".to_string(),
                    body: "y".to_string(),
                },
                "https://fish.example.com",
            ),
            Err(ServiceError::Unauthorized)
        ));

        assert!(matches!(
            broadcast(
                &repo,
                &mailer,
                &authenticated(&[SERVICE_ACCESS_ROLE]),
                BroadcastForm {
                    subject: "   ".to_string(),
                    body: "y".to_string(),
                },
                "https://fish.example.com",
            ),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn load_subscribers_paginates() {
        let mut repo = MockRepository::new();
        repo.expect_list_subscriptions()
            .withf(|query| query.pagination.is_some())
            .returning(|_| Ok((1, vec![subscription(1, "a@example.com")])));

        let data = load_subscribers(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            SubscribersQuery::default(),
        )
        .expect("subscribers load");

        assert_eq!(data.total, 1);
    }
}
