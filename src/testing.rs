//! In-memory repositories for tests. They mirror the Postgres constraints:
//! unique emails, unique registration pairs, foreign keys, and cascading
//! registration cleanup when an event goes away.

use std::sync::Mutex;

use async_trait::async_trait;
use time::macros::datetime;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{PublicUser, User},
    },
    db::StoreError,
    events::{
        repo::{EventRepo, RegistrationRepo},
        repo_types::{Event, EventFields},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    events: Vec<Event>,
    registrations: Vec<(i64, i64)>,
    next_user_id: i64,
    next_event_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

pub fn sample_fields(name: &str) -> EventFields {
    EventFields {
        name: name.to_string(),
        description: format!("{name} description"),
        location: "Berlin".into(),
        start_time: datetime!(2026-11-01 18:00 UTC),
    }
}

impl MemoryStore {
    /// Inserts a user with a placeholder hash, skipping the slow hasher.
    pub async fn seed_user(&self, email: &str) -> i64 {
        UserRepo::insert(self, email, "$argon2id$placeholder")
            .await
            .unwrap()
            .id
    }

    pub fn registration_count(&self, event_id: i64, user_id: i64) -> usize {
        self.tables
            .lock()
            .unwrap()
            .registrations
            .iter()
            .filter(|pair| **pair == (event_id, user_id))
            .count()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.email == email) {
            return Err(StoreError::UniqueViolation);
        }
        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<PublicUser>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().cloned().map(PublicUser::from).collect())
    }
}

#[async_trait]
impl EventRepo for MemoryStore {
    async fn insert(&self, fields: &EventFields, owner_id: i64) -> Result<Event, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if !t.users.iter().any(|u| u.id == owner_id) {
            return Err(StoreError::ForeignKeyViolation);
        }
        t.next_event_id += 1;
        let event = Event {
            id: t.next_event_id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            location: fields.location.clone(),
            start_time: fields.start_time,
            created_by: owner_id,
        };
        t.events.push(event.clone());
        Ok(event)
    }

    async fn find(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.tables.lock().unwrap().events.clone())
    }

    async fn update(&self, id: i64, fields: &EventFields) -> Result<Option<Event>, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let Some(event) = t.events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        event.name = fields.name.clone();
        event.description = fields.description.clone();
        event.location = fields.location.clone();
        event.start_time = fields.start_time;
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.events.len();
        t.events.retain(|e| e.id != id);
        t.registrations.retain(|(event_id, _)| *event_id != id);
        Ok(t.events.len() < before)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let deleted = t.events.len() as u64;
        t.events.clear();
        t.registrations.clear();
        Ok(deleted)
    }
}

#[async_trait]
impl RegistrationRepo for MemoryStore {
    async fn insert(&self, event_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if !t.events.iter().any(|e| e.id == event_id) || !t.users.iter().any(|u| u.id == user_id)
        {
            return Err(StoreError::ForeignKeyViolation);
        }
        if t.registrations.contains(&(event_id, user_id)) {
            return Ok(false);
        }
        t.registrations.push((event_id, user_id));
        Ok(true)
    }

    async fn delete(&self, event_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.registrations.len();
        t.registrations.retain(|pair| *pair != (event_id, user_id));
        Ok(t.registrations.len() < before)
    }
}
