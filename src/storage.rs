use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, Session, User};
use crate::lists::repo_types::{Item, ListItem, ListLookup};

/// Persistence seam for users, sessions, flat items and custom lists.
///
/// Every list/item call is scoped by `user_id`; nothing crosses accounts.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Returns `None` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> anyhow::Result<Option<User>>;

    async fn create_session(&self, user_id: Uuid, expires_at: OffsetDateTime)
        -> anyhow::Result<Session>;
    async fn find_session(&self, id: Uuid) -> anyhow::Result<Option<Session>>;
    async fn delete_session(&self, id: Uuid) -> anyhow::Result<()>;
    /// Deletes every session expired at `now`; returns how many went.
    async fn purge_expired_sessions(&self, now: OffsetDateTime) -> anyhow::Result<u64>;

    async fn list_today_items(&self, user_id: Uuid) -> anyhow::Result<Vec<Item>>;
    async fn insert_today_item(&self, user_id: Uuid, name: &str) -> anyhow::Result<Item>;
    /// Returns whether a row was removed.
    async fn delete_today_item(&self, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool>;

    /// Inserts the list seeded with `defaults` unless `(user_id, name)` exists, atomically.
    async fn find_or_create_list(
        &self,
        user_id: Uuid,
        name: &str,
        defaults: Vec<ListItem>,
    ) -> anyhow::Result<ListLookup>;
    /// Returns `false` when the list does not exist.
    async fn push_list_item(&self, user_id: Uuid, list: &str, item: ListItem)
        -> anyhow::Result<bool>;
    /// Returns `false` when nothing matched.
    async fn pull_list_item(&self, user_id: Uuid, list: &str, item_id: Uuid)
        -> anyhow::Result<bool>;

    /// Deletes every item and list owned by the user.
    async fn drop_user_data(&self, user_id: Uuid) -> anyhow::Result<()>;
}
