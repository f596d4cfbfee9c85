use crate::model::{Amount, Id, Item, Product, ShoppingList};
use anyhow::Result;

/// A new item ready to be written: the product is already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub product: Product,
    pub amount: Amount,
    pub bought: bool,
}

/// Catalog of products keyed by name
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Return the product with this name, creating it if absent. Must never
    /// create two products with the same name, even under concurrent calls.
    async fn resolve_product(&self, name: &str) -> Result<Product>;
    /// All products in creation order
    async fn list_products(&self) -> Result<Vec<Product>>;
}

/// Lists and the items they own.
///
/// Every item operation takes the owning list id alongside the item id and
/// must only match an item that list currently owns.
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    /// Create a list together with its initial items, in order
    async fn create_list(&self, name: &str, items: Vec<NewItem>) -> Result<ShoppingList>;
    async fn get_list(&self, id: Id) -> Result<Option<ShoppingList>>;
    /// Existence check that does not load the list's items
    async fn list_exists(&self, id: Id) -> Result<bool>;
    /// All lists in creation order
    async fn list_lists(&self) -> Result<Vec<ShoppingList>>;
    /// Append items to a list. Returns `None` if the list does not exist.
    async fn append_items(&self, list_id: Id, items: Vec<NewItem>) -> Result<Option<Vec<Item>>>;
    /// Returns `false` if the list does not own an item with this id
    async fn remove_item(&self, list_id: Id, item_id: Id) -> Result<bool>;
    /// Returns `None` if the list does not own an item with this id
    async fn set_item_bought(&self, list_id: Id, item_id: Id, bought: bool) -> Result<Option<Item>>;
}

pub trait Store: ProductStore + ListStore + Send + Sync {}

impl<T: ProductStore + ListStore + Send + Sync> Store for T {}
