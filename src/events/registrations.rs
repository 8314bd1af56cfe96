use tracing::info;

use super::{
    dto::RegistrationStatus,
    repo::{EventRepo, RegistrationRepo},
    services::get_event,
};
use crate::{db::StoreError, error::AppError};

/// Idempotent: a second registration for the same pair reports
/// `AlreadyRegistered` instead of failing.
pub async fn register(
    events: &dyn EventRepo,
    registrations: &dyn RegistrationRepo,
    event_id: i64,
    user_id: i64,
) -> Result<RegistrationStatus, AppError> {
    get_event(events, event_id).await?;

    let inserted = match registrations.insert(event_id, user_id).await {
        Ok(inserted) => inserted,
        // Either side may be gone; the event lookup tells which.
        Err(StoreError::ForeignKeyViolation) => {
            return Err(match events.find(event_id).await? {
                Some(_) => AppError::NotFound("user"),
                None => AppError::NotFound("event"),
            });
        }
        Err(e) => return Err(e.into()),
    };

    if inserted {
        info!(event_id, user_id, "registered for event");
        Ok(RegistrationStatus::Registered)
    } else {
        Ok(RegistrationStatus::AlreadyRegistered)
    }
}

/// Cancelling a registration that does not exist is a no-op.
pub async fn cancel_registration(
    registrations: &dyn RegistrationRepo,
    event_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    if registrations.delete(event_id, user_id).await? {
        info!(event_id, user_id, "registration cancelled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::services::{create_event, delete_event},
        testing::{sample_fields, MemoryStore},
    };

    #[tokio::test]
    async fn registering_twice_keeps_one_row() {
        let store = MemoryStore::default();
        let alice = store.seed_user("alice@example.com").await;
        let bob = store.seed_user("bob@example.com").await;
        let event = create_event(&store, &sample_fields("Meetup"), alice).await.unwrap();

        let first = register(&store, &store, event.id, bob).await.unwrap();
        let second = register(&store, &store, event.id, bob).await.unwrap();

        assert_eq!(first, RegistrationStatus::Registered);
        assert_eq!(second, RegistrationStatus::AlreadyRegistered);
        assert_eq!(store.registration_count(event.id, bob), 1);
    }

    #[tokio::test]
    async fn registering_for_missing_event_fails() {
        let store = MemoryStore::default();
        let bob = store.seed_user("bob@example.com").await;
        let err = register(&store, &store, 7, bob).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("event")));
        assert_eq!(store.registration_count(7, bob), 0);
    }

    #[tokio::test]
    async fn registering_as_a_vanished_user_names_the_user() {
        let store = MemoryStore::default();
        let alice = store.seed_user("alice@example.com").await;
        let event = create_event(&store, &sample_fields("Meetup"), alice).await.unwrap();

        let err = register(&store, &store, event.id, 404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("user")));
        assert_eq!(store.registration_count(event.id, 404), 0);
    }

    #[tokio::test]
    async fn cancel_removes_pair_and_tolerates_absence() {
        let store = MemoryStore::default();
        let alice = store.seed_user("alice@example.com").await;
        let event = create_event(&store, &sample_fields("Meetup"), alice).await.unwrap();

        cancel_registration(&store, event.id, alice).await.unwrap();

        register(&store, &store, event.id, alice).await.unwrap();
        cancel_registration(&store, event.id, alice).await.unwrap();
        assert_eq!(store.registration_count(event.id, alice), 0);

        cancel_registration(&store, event.id, alice).await.unwrap();
    }

    #[tokio::test]
    async fn deleting_event_drops_its_registrations() {
        let store = MemoryStore::default();
        let alice = store.seed_user("alice@example.com").await;
        let event = create_event(&store, &sample_fields("Meetup"), alice).await.unwrap();
        register(&store, &store, event.id, alice).await.unwrap();

        delete_event(&store, event.id, alice).await.unwrap();
        assert_eq!(store.registration_count(event.id, alice), 0);
    }
}
