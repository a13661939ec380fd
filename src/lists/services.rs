use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::lists::repo_types::{
    Item, ItemName, ListItem, ListLookup, ListName, TodoList, DEFAULT_ITEMS,
};
use crate::storage::TodoStore;

/// URL a list is rendered at; "Today" lives at `/`.
pub fn list_path(name: &ListName) -> String {
    if name.is_today() {
        return "/".to_owned();
    }
    let mut url = Url::parse("http://localhost/").expect("static base url parses");
    url.path_segments_mut()
        .expect("http urls have path segments")
        .clear()
        .push(name.as_str());
    url.path().to_owned()
}

pub async fn today_items(store: &dyn TodoStore, user_id: Uuid) -> anyhow::Result<Vec<Item>> {
    store.list_today_items(user_id).await
}

#[derive(Debug)]
pub enum Resolved {
    /// The name capitalizes to "Today", which is the flat list at `/`.
    Today,
    /// Freshly seeded; the caller redirects to render it.
    Created,
    Found(TodoList),
}

pub async fn resolve_list(
    store: &dyn TodoStore,
    user_id: Uuid,
    name: &ListName,
) -> anyhow::Result<Resolved> {
    if name.is_today() {
        return Ok(Resolved::Today);
    }
    let lookup = store
        .find_or_create_list(user_id, name.as_str(), ListItem::defaults(DEFAULT_ITEMS))
        .await?;
    Ok(match lookup {
        ListLookup::Created => {
            info!(%user_id, list = name.as_str(), "list created");
            Resolved::Created
        }
        ListLookup::Found(list) => Resolved::Found(list),
    })
}

#[derive(Debug, PartialEq, Eq)]
pub enum Added {
    Today,
    List,
    /// Blank item text; nothing stored.
    Blank,
    MissingList,
}

pub async fn add_item(
    store: &dyn TodoStore,
    user_id: Uuid,
    list: &ListName,
    raw_item: &str,
) -> anyhow::Result<Added> {
    let Some(name) = ItemName::parse(raw_item) else {
        debug!(%user_id, list = list.as_str(), "blank item ignored");
        return Ok(Added::Blank);
    };
    if list.is_today() {
        store.insert_today_item(user_id, name.as_str()).await?;
        return Ok(Added::Today);
    }
    if store.push_list_item(user_id, list.as_str(), ListItem::new(&name)).await? {
        Ok(Added::List)
    } else {
        warn!(%user_id, list = list.as_str(), "add to unknown list");
        Ok(Added::MissingList)
    }
}

/// Removes an item by id; unknown or malformed ids are logged and ignored.
pub async fn delete_item(
    store: &dyn TodoStore,
    user_id: Uuid,
    list: &ListName,
    raw_id: &str,
) -> anyhow::Result<bool> {
    let Ok(item_id) = Uuid::parse_str(raw_id.trim()) else {
        warn!(%user_id, id = raw_id, "malformed item id");
        return Ok(false);
    };
    let removed = if list.is_today() {
        store.delete_today_item(user_id, item_id).await?
    } else {
        store.pull_list_item(user_id, list.as_str(), item_id).await?
    };
    if !removed {
        warn!(%user_id, %item_id, list = list.as_str(), "item not found");
    }
    Ok(removed)
}

pub async fn drop_all(store: &dyn TodoStore, user_id: Uuid) -> anyhow::Result<()> {
    store.drop_user_data(user_id).await?;
    info!(%user_id, "dropped all items and lists");
    Ok(())
}
