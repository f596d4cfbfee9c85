use crate::model::{Amount, Id, Product};
use serde::{Deserialize, Serialize};

/// A line on a shopping list.
///
/// The bought flag has no public setter: it changes only through the owning
/// [`ShoppingList`](crate::model::ShoppingList) or a list-scoped store call.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: Id,
    list_id: Id,
    product: Product,
    amount: Amount,
    bought: bool,
}

impl Item {
    pub fn new(id: Id, list_id: Id, product: Product, amount: Amount, bought: bool) -> Self {
        Self {
            id,
            list_id,
            product,
            amount,
            bought,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn list_id(&self) -> Id {
        self.list_id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn is_bought(&self) -> bool {
        self.bought
    }

    pub(crate) fn set_bought(&mut self, bought: bool) {
        self.bought = bought;
    }

    pub fn view(&self) -> ItemView {
        ItemView {
            id: self.id,
            name: self.product.name.clone(),
            amount: self.amount.clone(),
            bought: self.bought,
        }
    }
}

/// Rendered form of an item: the product shows up as its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: Id,
    pub name: String,
    pub amount: Amount,
    pub bought: bool,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        item.view()
    }
}

/// One entry of a create-list or add-items payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Product name, resolved through the catalog
    pub name: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bought: Option<bool>,
}

impl ItemDescriptor {
    pub fn new(name: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            bought: None,
        }
    }

    pub fn bought(mut self, bought: bool) -> Self {
        self.bought = Some(bought);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_view_uses_product_name() {
        let item = Item::new(1, 7, Product::new(3, "Banana".to_string()), Amount::from(3), true);
        let json = serde_json::to_value(item.view()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Banana", "amount": 3, "bought": true})
        );
    }

    #[test]
    fn test_descriptor_bought_is_optional() {
        let d: ItemDescriptor = serde_json::from_str(r#"{"name": "Lime", "amount": "3"}"#).unwrap();
        assert_eq!(d, ItemDescriptor::new("Lime", "3"));

        let d: ItemDescriptor =
            serde_json::from_str(r#"{"name": "tomato", "amount": 5, "bought": true}"#).unwrap();
        assert_eq!(d.bought, Some(true));
    }
}
