use anyhow::{Context, Result};
use itertools::Itertools;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Postgres, Row, Transaction};

use crate::model::{Amount, Id, Item, Product, ShoppingList};
use crate::store::traits::{ListStore, NewItem, ProductStore};

const ITEM_COLUMNS: &str = "i.id, i.list_id, i.amount, i.bought, p.id AS product_id, p.name AS product_name";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        list_id: Id,
        items: Vec<NewItem>,
    ) -> Result<Vec<Item>> {
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query(
                "INSERT INTO items (list_id, product_id, amount, bought) VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(list_id)
            .bind(item.product.id)
            .bind(item.amount.to_json())
            .bind(item.bought)
            .fetch_one(&mut **tx)
            .await
            .context("Failed to insert item")?;

            created.push(Item::new(
                row.get("id"),
                list_id,
                item.product,
                item.amount,
                item.bought,
            ));
        }
        Ok(created)
    }
}

fn item_from_row(row: &PgRow) -> Result<Item> {
    let amount: serde_json::Value = row.get("amount");
    let amount = Amount::from_json(amount)
        .ok_or_else(|| anyhow::anyhow!("Item has a malformed amount"))?;

    Ok(Item::new(
        row.get("id"),
        row.get("list_id"),
        Product::new(row.get("product_id"), row.get("product_name")),
        amount,
        row.get("bought"),
    ))
}

#[async_trait::async_trait]
impl ProductStore for PostgresStore {
    async fn resolve_product(&self, name: &str) -> Result<Product> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            r#"
            INSERT INTO products (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .context("Failed to resolve product")?;

        Ok(Product::new(row.get("id"), row.get("name")))
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT id, name FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list products")?;

        Ok(rows
            .into_iter()
            .map(|row| Product::new(row.get("id"), row.get("name")))
            .collect())
    }
}

#[async_trait::async_trait]
impl ListStore for PostgresStore {
    async fn create_list(&self, name: &str, items: Vec<NewItem>) -> Result<ShoppingList> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let row = sqlx::query("INSERT INTO lists (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to insert list")?;
        let id: Id = row.get("id");

        let created = Self::insert_items(&mut tx, id, items).await?;
        tx.commit().await.context("Failed to commit list")?;

        Ok(ShoppingList::from_parts(id, name.to_string(), created))
    }

    async fn get_list(&self, id: Id) -> Result<Option<ShoppingList>> {
        let row = sqlx::query("SELECT id, name FROM lists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch list")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM items i JOIN products p ON p.id = i.product_id WHERE i.list_id = $1 ORDER BY i.id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch list items")?;

        let items = item_rows.iter().map(item_from_row).collect::<Result<Vec<_>>>()?;

        Ok(Some(ShoppingList::from_parts(row.get("id"), row.get("name"), items)))
    }

    async fn list_lists(&self) -> Result<Vec<ShoppingList>> {
        let rows = sqlx::query("SELECT id, name FROM lists ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list lists")?;

        let item_rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM items i JOIN products p ON p.id = i.product_id ORDER BY i.id"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list items")?;

        // Grouping keeps the id order within each list.
        let mut items_by_list = item_rows
            .iter()
            .map(item_from_row)
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .into_group_map_by(|item| item.list_id());

        Ok(rows
            .into_iter()
            .map(|row| {
                let id: Id = row.get("id");
                let items = items_by_list.remove(&id).unwrap_or_default();
                ShoppingList::from_parts(id, row.get("name"), items)
            })
            .collect())
    }

    async fn list_exists(&self, id: Id) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM lists WHERE id = $1) AS found")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check list")?;

        Ok(row.get("found"))
    }

    async fn append_items(&self, list_id: Id, items: Vec<NewItem>) -> Result<Option<Vec<Item>>> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let exists = sqlx::query("SELECT id FROM lists WHERE id = $1")
            .bind(list_id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to fetch list")?
            .is_some();

        if !exists {
            return Ok(None);
        }

        let created = Self::insert_items(&mut tx, list_id, items).await?;
        tx.commit().await.context("Failed to commit items")?;

        Ok(Some(created))
    }

    async fn remove_item(&self, list_id: Id, item_id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND list_id = $2")
            .bind(item_id)
            .bind(list_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete item")?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_item_bought(&self, list_id: Id, item_id: Id, bought: bool) -> Result<Option<Item>> {
        let row = sqlx::query(&format!(
            r#"
            WITH updated AS (
                UPDATE items SET bought = $3
                WHERE id = $1 AND list_id = $2
                RETURNING id, list_id, product_id, amount, bought
            )
            SELECT {} FROM updated i JOIN products p ON p.id = i.product_id
            "#,
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .bind(list_id)
        .bind(bought)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update item")?;

        row.as_ref().map(item_from_row).transpose()
    }
}
