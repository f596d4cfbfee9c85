use crate::model::{Amount, Id, Item, ItemDescriptor, ItemView, Product};
use serde::{Deserialize, Serialize};

/// A named, ordered collection of items.
///
/// The list is the only way to reach its items: lookups by item id only
/// consider the items this list currently holds, so an id that belongs to a
/// different list behaves exactly like an id that does not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingList {
    pub id: Id,
    pub name: String,
    items: Vec<Item>,
}

impl ShoppingList {
    pub fn new(id: Id, name: String) -> Self {
        Self {
            id,
            name,
            items: Vec::new(),
        }
    }

    /// Rebuild a list from stored rows. Items owned by another list are dropped.
    pub fn from_parts(id: Id, name: String, items: Vec<Item>) -> Self {
        let items = items.into_iter().filter(|item| item.list_id() == id).collect();
        Self { id, name, items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a new item owned by this list.
    pub fn push_item(&mut self, item_id: Id, product: Product, amount: Amount, bought: bool) -> &Item {
        let index = self.items.len();
        self.items.push(Item::new(item_id, self.id, product, amount, bought));
        &self.items[index]
    }

    pub fn item(&self, item_id: Id) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    /// Detach an item from the list, returning it if this list owned it.
    pub fn remove_item(&mut self, item_id: Id) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id() == item_id)?;
        Some(self.items.remove(index))
    }

    pub fn mark_bought(&mut self, item_id: Id) -> Option<&Item> {
        self.set_bought(item_id, true)
    }

    pub fn mark_unbought(&mut self, item_id: Id) -> Option<&Item> {
        self.set_bought(item_id, false)
    }

    // Unconditional set, never a toggle: repeating it changes nothing.
    fn set_bought(&mut self, item_id: Id, bought: bool) -> Option<&Item> {
        let item = self.items.iter_mut().find(|item| item.id() == item_id)?;
        item.set_bought(bought);
        Some(&*item)
    }

    pub fn view(&self) -> ListView {
        ListView {
            name: self.name.clone(),
            items: self.items.iter().map(ItemView::from).collect(),
        }
    }
}

/// Rendered form of a list, shared by the collection and by-id endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListView {
    pub name: String,
    pub items: Vec<ItemView>,
}

impl From<&ShoppingList> for ListView {
    fn from(list: &ShoppingList) -> Self {
        list.view()
    }
}

/// Input model for creating a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewList {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ItemDescriptor>,
}
