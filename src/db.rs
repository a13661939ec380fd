use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, Session, User};
use crate::lists::repo;
use crate::lists::repo_types::{Item, ListItem, ListLookup};
use crate::storage::TodoStore;

/// Postgres-backed [`TodoStore`].
#[derive(Clone)]
pub struct PgStore {
    pub db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        User::find_by_email(&self.db, email).await
    }

    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        User::find_by_id(&self.db, id).await
    }

    async fn create_user(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        User::create(&self.db, user).await
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<Session> {
        Session::create(&self.db, user_id, expires_at).await
    }

    async fn find_session(&self, id: Uuid) -> anyhow::Result<Option<Session>> {
        Session::find(&self.db, id).await
    }

    async fn delete_session(&self, id: Uuid) -> anyhow::Result<()> {
        Session::delete(&self.db, id).await
    }

    async fn purge_expired_sessions(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        Session::purge_expired(&self.db, now).await
    }

    async fn list_today_items(&self, user_id: Uuid) -> anyhow::Result<Vec<Item>> {
        repo::list_today_items(&self.db, user_id).await
    }

    async fn insert_today_item(&self, user_id: Uuid, name: &str) -> anyhow::Result<Item> {
        repo::insert_today_item(&self.db, user_id, name).await
    }

    async fn delete_today_item(&self, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        repo::delete_today_item(&self.db, user_id, item_id).await
    }

    async fn find_or_create_list(
        &self,
        user_id: Uuid,
        name: &str,
        defaults: Vec<ListItem>,
    ) -> anyhow::Result<ListLookup> {
        repo::find_or_create_list(&self.db, user_id, name, defaults).await
    }

    async fn push_list_item(
        &self,
        user_id: Uuid,
        list: &str,
        item: ListItem,
    ) -> anyhow::Result<bool> {
        repo::push_list_item(&self.db, user_id, list, item).await
    }

    async fn pull_list_item(
        &self,
        user_id: Uuid,
        list: &str,
        item_id: Uuid,
    ) -> anyhow::Result<bool> {
        repo::pull_list_item(&self.db, user_id, list, item_id).await
    }

    async fn drop_user_data(&self, user_id: Uuid) -> anyhow::Result<()> {
        repo::drop_user_data(&self.db, user_id).await
    }
}
