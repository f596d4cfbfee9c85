use anyhow::Result;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

use crate::model::{Id, Item, Product, ShoppingList};
use crate::store::traits::{ListStore, NewItem, ProductStore};

#[derive(Debug)]
struct MemoryState {
    products: Vec<Product>,
    products_by_name: HashMap<String, usize>,
    /// Items live only inside their list
    lists: BTreeMap<Id, ShoppingList>,
    next_product_id: Id,
    next_list_id: Id,
    next_item_id: Id,
}

impl MemoryState {
    fn take_item_id(&mut self) -> Id {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }
}

/// Process-local store. One mutex guards all state and is never held across
/// an await point, so every operation is atomic with respect to the others.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                products: Vec::new(),
                products_by_name: HashMap::new(),
                lists: BTreeMap::new(),
                next_product_id: 1,
                next_list_id: 1,
                next_item_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProductStore for MemoryStore {
    async fn resolve_product(&self, name: &str) -> Result<Product> {
        let mut state = self.state.lock();

        if let Some(&index) = state.products_by_name.get(name) {
            return Ok(state.products[index].clone());
        }

        let product = Product::new(state.next_product_id, name.to_string());
        state.next_product_id += 1;
        let index = state.products.len();
        state.products.push(product.clone());
        state.products_by_name.insert(name.to_string(), index);

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.state.lock().products.clone())
    }
}

#[async_trait::async_trait]
impl ListStore for MemoryStore {
    async fn create_list(&self, name: &str, items: Vec<NewItem>) -> Result<ShoppingList> {
        let mut state = self.state.lock();

        let id = state.next_list_id;
        state.next_list_id += 1;

        let mut list = ShoppingList::new(id, name.to_string());
        for item in items {
            let item_id = state.take_item_id();
            list.push_item(item_id, item.product, item.amount, item.bought);
        }

        state.lists.insert(id, list.clone());
        Ok(list)
    }

    async fn get_list(&self, id: Id) -> Result<Option<ShoppingList>> {
        Ok(self.state.lock().lists.get(&id).cloned())
    }

    async fn list_exists(&self, id: Id) -> Result<bool> {
        Ok(self.state.lock().lists.contains_key(&id))
    }

    async fn list_lists(&self) -> Result<Vec<ShoppingList>> {
        Ok(self.state.lock().lists.values().cloned().collect())
    }

    async fn append_items(&self, list_id: Id, items: Vec<NewItem>) -> Result<Option<Vec<Item>>> {
        let mut state = self.state.lock();
        let MemoryState {
            lists, next_item_id, ..
        } = &mut *state;

        let Some(list) = lists.get_mut(&list_id) else {
            return Ok(None);
        };

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let item_id = *next_item_id;
            *next_item_id += 1;
            created.push(list.push_item(item_id, item.product, item.amount, item.bought).clone());
        }

        Ok(Some(created))
    }

    async fn remove_item(&self, list_id: Id, item_id: Id) -> Result<bool> {
        let mut state = self.state.lock();
        Ok(state
            .lists
            .get_mut(&list_id)
            .and_then(|list| list.remove_item(item_id))
            .is_some())
    }

    async fn set_item_bought(&self, list_id: Id, item_id: Id, bought: bool) -> Result<Option<Item>> {
        let mut state = self.state.lock();
        let Some(list) = state.lists.get_mut(&list_id) else {
            return Ok(None);
        };

        let item = if bought {
            list.mark_bought(item_id)
        } else {
            list.mark_unbought(item_id)
        };

        Ok(item.cloned())
    }
}
