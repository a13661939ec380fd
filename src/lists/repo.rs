use anyhow::Context;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::lists::repo_types::{Item, ListItem, ListLookup, TodoList};

pub async fn list_today_items(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Item>> {
    let rows = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, user_id, name, created_at
        FROM items
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list today items")?;
    Ok(rows)
}

pub async fn insert_today_item(db: &PgPool, user_id: Uuid, name: &str) -> anyhow::Result<Item> {
    let item = sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (id, user_id, name)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .fetch_one(db)
    .await
    .context("insert item")?;
    Ok(item)
}

pub async fn delete_today_item(db: &PgPool, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete item")?;
    Ok(res.rows_affected() > 0)
}

/// Single-statement upsert; the `(user_id, name)` unique key makes concurrent first
/// visits converge on one row.
pub async fn find_or_create_list(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    defaults: Vec<ListItem>,
) -> anyhow::Result<ListLookup> {
    let created = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO lists (id, user_id, name, items)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, name) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(Json(defaults))
    .fetch_optional(db)
    .await
    .context("insert list")?;

    if created.is_some() {
        return Ok(ListLookup::Created);
    }

    let list = sqlx::query_as::<_, TodoList>(
        r#"
        SELECT name, items
        FROM lists
        WHERE user_id = $1 AND name = $2
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(db)
    .await
    .context("load list")?;
    Ok(ListLookup::Found(list))
}

pub async fn push_list_item(
    db: &PgPool,
    user_id: Uuid,
    list: &str,
    item: ListItem,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE lists
           SET items = items || $3
         WHERE user_id = $1 AND name = $2
        "#,
    )
    .bind(user_id)
    .bind(list)
    .bind(Json(vec![item]))
    .execute(db)
    .await
    .context("push list item")?;
    Ok(res.rows_affected() > 0)
}

pub async fn pull_list_item(
    db: &PgPool,
    user_id: Uuid,
    list: &str,
    item_id: Uuid,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE lists
           SET items = COALESCE(
                 (SELECT jsonb_agg(e) FROM jsonb_array_elements(items) e WHERE e->>'id' <> $3),
                 '[]'::jsonb)
         WHERE user_id = $1
           AND name = $2
           AND EXISTS (SELECT 1 FROM jsonb_array_elements(items) e WHERE e->>'id' = $3)
        "#,
    )
    .bind(user_id)
    .bind(list)
    .bind(item_id.to_string())
    .execute(db)
    .await
    .context("pull list item")?;
    Ok(res.rows_affected() > 0)
}

pub async fn drop_user_data(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin tx")?;
    sqlx::query("DELETE FROM items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("drop items")?;
    sqlx::query("DELETE FROM lists WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("drop lists")?;
    tx.commit().await.context("commit tx")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::{NewUser, User};
    use crate::lists::repo_types::{ItemName, DEFAULT_ITEMS};

    async fn user(db: &PgPool, email: &str) -> Uuid {
        let new = NewUser {
            email: email.into(),
            password_hash: "h".into(),
            first_name: None,
            last_name: None,
        };
        User::create(db, new).await.unwrap().expect("fresh email").id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn find_or_create_inserts_once_then_loads(pool: PgPool) {
        let alice = user(&pool, "alice@x.com").await;
        let first = find_or_create_list(&pool, alice, "Work", ListItem::defaults(DEFAULT_ITEMS))
            .await
            .unwrap();
        assert!(matches!(first, ListLookup::Created));

        let second = find_or_create_list(&pool, alice, "Work", ListItem::defaults(DEFAULT_ITEMS))
            .await
            .unwrap();
        let ListLookup::Found(list) = second else {
            panic!("expected the existing list");
        };
        assert_eq!(list.name, "Work");
        assert_eq!(list.items.0.len(), 1);
        assert_eq!(list.items.0[0].name, "First Action");

        let rows: i64 = sqlx::query_scalar("SELECT count(*) FROM lists WHERE user_id = $1")
            .bind(alice)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn push_then_pull_edits_the_embedded_items(pool: PgPool) {
        let alice = user(&pool, "alice@x.com").await;
        find_or_create_list(&pool, alice, "Home", vec![]).await.unwrap();
        let item = ListItem::new(&ItemName::parse("Dishes").unwrap());

        assert!(push_list_item(&pool, alice, "Home", item.clone()).await.unwrap());
        let ListLookup::Found(list) = find_or_create_list(&pool, alice, "Home", vec![]).await.unwrap()
        else {
            panic!("expected the existing list");
        };
        assert_eq!(list.items.0, vec![item.clone()]);

        assert!(pull_list_item(&pool, alice, "Home", item.id).await.unwrap());
        let ListLookup::Found(list) = find_or_create_list(&pool, alice, "Home", vec![]).await.unwrap()
        else {
            panic!("expected the existing list");
        };
        assert!(list.items.0.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn pull_and_push_miss_quietly(pool: PgPool) {
        let alice = user(&pool, "alice@x.com").await;
        find_or_create_list(&pool, alice, "Home", ListItem::defaults(DEFAULT_ITEMS))
            .await
            .unwrap();

        assert!(!pull_list_item(&pool, alice, "Home", Uuid::new_v4()).await.unwrap());
        let item = ListItem::new(&ItemName::parse("Dishes").unwrap());
        assert!(!push_list_item(&pool, alice, "Nowhere", item).await.unwrap());
        assert!(!delete_today_item(&pool, alice, Uuid::new_v4()).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn drop_removes_only_the_owners_rows(pool: PgPool) {
        let alice = user(&pool, "alice@x.com").await;
        let bob = user(&pool, "bob@x.com").await;
        insert_today_item(&pool, alice, "a").await.unwrap();
        insert_today_item(&pool, bob, "b").await.unwrap();
        find_or_create_list(&pool, alice, "Work", vec![]).await.unwrap();
        find_or_create_list(&pool, bob, "Work", vec![]).await.unwrap();

        drop_user_data(&pool, alice).await.unwrap();

        assert!(list_today_items(&pool, alice).await.unwrap().is_empty());
        let left = list_today_items(&pool, bob).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "b");
        let lists: Vec<Uuid> = sqlx::query_scalar("SELECT user_id FROM lists")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(lists, vec![bob]);
    }
}
