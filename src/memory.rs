use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, Session, User};
use crate::lists::repo_types::{Item, ListItem, ListLookup, TodoList};
use crate::storage::TodoStore;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<Session>,
    items: Vec<Item>,
    /// Lists keyed by owner.
    lists: Vec<(Uuid, TodoList)>,
}

/// In-process [`TodoStore`] for tests; one lock guards all tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn list_count(&self, user_id: Uuid) -> usize {
        let t = self.tables.read().await;
        t.lists.iter().filter(|(owner, _)| *owner == user_id).count()
    }
}

fn find_list<'a>(
    lists: &'a mut [(Uuid, TodoList)],
    user_id: Uuid,
    name: &str,
) -> Option<&'a mut TodoList> {
    lists
        .iter_mut()
        .find(|(owner, l)| *owner == user_id && l.name == name)
        .map(|(_, l)| l)
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(Some(user))
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            expires_at,
        };
        self.tables.write().await.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, id: Uuid) -> anyhow::Result<Option<Session>> {
        let t = self.tables.read().await;
        Ok(t.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn delete_session(&self, id: Uuid) -> anyhow::Result<()> {
        self.tables.write().await.sessions.retain(|s| s.id != id);
        Ok(())
    }

    async fn purge_expired_sessions(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let mut t = self.tables.write().await;
        let before = t.sessions.len();
        t.sessions.retain(|s| !s.is_expired(now));
        Ok((before - t.sessions.len()) as u64)
    }

    async fn list_today_items(&self, user_id: Uuid) -> anyhow::Result<Vec<Item>> {
        let t = self.tables.read().await;
        Ok(t.items.iter().filter(|i| i.user_id == user_id).cloned().collect())
    }

    async fn insert_today_item(&self, user_id: Uuid, name: &str) -> anyhow::Result<Item> {
        let item = Item {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.tables.write().await.items.push(item.clone());
        Ok(item)
    }

    async fn delete_today_item(&self, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        let before = t.items.len();
        t.items.retain(|i| !(i.id == item_id && i.user_id == user_id));
        Ok(t.items.len() < before)
    }

    async fn find_or_create_list(
        &self,
        user_id: Uuid,
        name: &str,
        defaults: Vec<ListItem>,
    ) -> anyhow::Result<ListLookup> {
        let mut t = self.tables.write().await;
        if let Some(list) = find_list(&mut t.lists, user_id, name) {
            return Ok(ListLookup::Found(list.clone()));
        }
        t.lists.push((
            user_id,
            TodoList {
                name: name.to_owned(),
                items: Json(defaults),
            },
        ));
        Ok(ListLookup::Created)
    }

    async fn push_list_item(
        &self,
        user_id: Uuid,
        list: &str,
        item: ListItem,
    ) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        match find_list(&mut t.lists, user_id, list) {
            Some(l) => {
                l.items.0.push(item);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn pull_list_item(
        &self,
        user_id: Uuid,
        list: &str,
        item_id: Uuid,
    ) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        let Some(l) = find_list(&mut t.lists, user_id, list) else {
            return Ok(false);
        };
        let before = l.items.0.len();
        l.items.0.retain(|i| i.id != item_id);
        Ok(l.items.0.len() < before)
    }

    async fn drop_user_data(&self, user_id: Uuid) -> anyhow::Result<()> {
        let mut t = self.tables.write().await;
        t.items.retain(|i| i.user_id != user_id);
        t.lists.retain(|(owner, _)| *owner != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::repo_types::DEFAULT_ITEMS;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "h".into(),
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_refused() {
        let store = MemoryStore::new();
        assert!(store.create_user(new_user("a@x.com")).await.unwrap().is_some());
        assert!(store.create_user(new_user("a@x.com")).await.unwrap().is_none());
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn find_or_create_creates_once_then_finds() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let first = store
            .find_or_create_list(user, "Work", ListItem::defaults(DEFAULT_ITEMS))
            .await
            .unwrap();
        assert!(matches!(first, ListLookup::Created));
        let second = store
            .find_or_create_list(user, "Work", ListItem::defaults(DEFAULT_ITEMS))
            .await
            .unwrap();
        let ListLookup::Found(list) = second else {
            panic!("expected existing list");
        };
        assert_eq!(list.name, "Work");
        assert_eq!(list.items.0.len(), DEFAULT_ITEMS.len());
        assert_eq!(store.list_count(user).await, 1);
    }

    #[tokio::test]
    async fn push_and_pull_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        store.find_or_create_list(alice, "Home", vec![]).await.unwrap();
        let item = ListItem { id: Uuid::new_v4(), name: "Dishes".into() };

        assert!(!store.push_list_item(bob, "Home", item.clone()).await.unwrap());
        assert!(store.push_list_item(alice, "Home", item.clone()).await.unwrap());
        assert!(!store.pull_list_item(bob, "Home", item.id).await.unwrap());
        assert!(store.pull_list_item(alice, "Home", item.id).await.unwrap());
        assert!(!store.pull_list_item(alice, "Home", item.id).await.unwrap());
    }

    #[tokio::test]
    async fn drop_only_touches_one_user() {
        let store = MemoryStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        store.insert_today_item(alice, "a").await.unwrap();
        store.insert_today_item(bob, "b").await.unwrap();
        store.find_or_create_list(alice, "Work", vec![]).await.unwrap();

        store.drop_user_data(alice).await.unwrap();

        assert!(store.list_today_items(alice).await.unwrap().is_empty());
        assert_eq!(store.list_today_items(bob).await.unwrap().len(), 1);
        assert_eq!(store.list_count(alice).await, 0);
    }
}
