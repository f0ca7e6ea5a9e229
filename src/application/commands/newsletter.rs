// src/application/commands/newsletter.rs
use std::sync::Arc;

use crate::{
    application::{
        dto::{AuthenticatedUser, BulkActionResultDto, SubscriptionResultDto},
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        email::EmailAddress,
        newsletter::{
            BulkAction, NewsletterRepository, SubscribeOutcome, SubscriberId, UnsubscribeOutcome,
        },
    },
};

pub struct BulkSubscriberCommand {
    pub action: String,
    pub subscriber_ids: Vec<i64>,
}

pub struct NewsletterCommandService {
    repo: Arc<dyn NewsletterRepository>,
    clock: Arc<dyn Clock>,
}

impl NewsletterCommandService {
    pub fn new(repo: Arc<dyn NewsletterRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn subscribe(&self, email: String) -> ApplicationResult<SubscriptionResultDto> {
        let email = EmailAddress::new(email)?;
        let outcome = match self.repo.find_by_email(&email).await? {
            None => SubscribeOutcome::Created(self.repo.insert(email, self.clock.now()).await?),
            Some(existing) if existing.is_active => SubscribeOutcome::AlreadyActive(existing),
            Some(existing) => SubscribeOutcome::Reactivated(
                self.repo
                    .set_active(existing.id, true, self.clock.now())
                    .await?,
            ),
        };

        Ok(match outcome {
            SubscribeOutcome::Created(subscriber) => {
                tracing::info!(subscriber_id = subscriber.id.0, "newsletter subscription created");
                SubscriptionResultDto::new("Successfully subscribed to our newsletter!", true)
            }
            SubscribeOutcome::AlreadyActive(_) => SubscriptionResultDto::new(
                "You are already subscribed to our newsletter",
                false,
            ),
            SubscribeOutcome::Reactivated(subscriber) => {
                tracing::info!(subscriber_id = subscriber.id.0, "newsletter subscription reactivated");
                SubscriptionResultDto::new(
                    "Welcome back! Your subscription has been reactivated.",
                    false,
                )
            }
        })
    }

    pub async fn unsubscribe(&self, email: String) -> ApplicationResult<SubscriptionResultDto> {
        let email = EmailAddress::new(email)?;
        let subscriber = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApplicationError::not_found("email not found in our newsletter list"))?;

        let outcome = if subscriber.is_active {
            UnsubscribeOutcome::Unsubscribed(
                self.repo
                    .set_active(subscriber.id, false, self.clock.now())
                    .await?,
            )
        } else {
            UnsubscribeOutcome::AlreadyInactive(subscriber)
        };

        Ok(match outcome {
            UnsubscribeOutcome::Unsubscribed(subscriber) => {
                tracing::info!(subscriber_id = subscriber.id.0, "newsletter subscription cancelled");
                SubscriptionResultDto::new("Successfully unsubscribed from our newsletter", false)
            }
            UnsubscribeOutcome::AlreadyInactive(_) => SubscriptionResultDto::new(
                "You are already unsubscribed from our newsletter",
                false,
            ),
        })
    }

    pub async fn delete_subscriber(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<()> {
        actor.require("newsletter", "manage")?;

        let id = SubscriberId::new(id)?;
        if !self.repo.delete(id).await? {
            return Err(ApplicationError::not_found("subscriber not found"));
        }
        tracing::info!(subscriber_id = id.0, "subscriber deleted");
        Ok(())
    }

    pub async fn bulk_action(
        &self,
        actor: &AuthenticatedUser,
        command: BulkSubscriberCommand,
    ) -> ApplicationResult<BulkActionResultDto> {
        actor.require("newsletter", "manage")?;

        let action: BulkAction = command.action.parse()?;
        if command.subscriber_ids.is_empty() {
            return Err(ApplicationError::validation("subscriber_ids must not be empty"));
        }
        let ids = command
            .subscriber_ids
            .iter()
            .map(|id| SubscriberId::new(*id))
            .collect::<Result<Vec<_>, _>>()?;

        let affected = self.repo.apply_bulk(action, &ids, self.clock.now()).await?;
        tracing::info!(action = action.as_str(), affected, "newsletter bulk action applied");

        Ok(BulkActionResultDto {
            message: format!("Bulk {} completed successfully", action.as_str()),
            affected,
        })
    }
}
