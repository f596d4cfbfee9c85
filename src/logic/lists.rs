use serde::{Deserialize, Serialize};

use crate::logic::catalog::ProductCatalog;
use crate::logic::error::{ListError, ListResult};
use crate::model::{normalize_product_name, Id, Item, ItemDescriptor, NewList, ShoppingList};
use crate::store::traits::{NewItem, Store};

/// What to do with a batch of item descriptors when some of them are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Reject the whole batch, writing nothing
    #[default]
    AllOrNothing,
    /// Drop invalid descriptors and apply the rest in order
    SkipInvalid,
}

/// Operations on the list aggregate. Every item operation is addressed
/// through its owning list.
pub struct ListOperations;

impl ListOperations {
    pub async fn create<S: Store + ?Sized>(
        store: &S,
        new_list: NewList,
        policy: BatchPolicy,
    ) -> ListResult<ShoppingList> {
        let descriptors = Self::validate_batch(new_list.items, policy)?;
        let items = Self::resolve_batch(store, descriptors, true).await?;

        let list = store.create_list(&new_list.name, items).await?;
        log::info!(
            "Created list {} '{}' with {} item(s)",
            list.id,
            list.name,
            list.items().len()
        );
        Ok(list)
    }

    pub async fn find<S: Store + ?Sized>(store: &S, list_id: Id) -> ListResult<ShoppingList> {
        store.get_list(list_id).await?.ok_or(ListError::NotFound)
    }

    /// Succeeds only if a list with this id exists.
    pub async fn ensure_list<S: Store + ?Sized>(store: &S, list_id: Id) -> ListResult<()> {
        if store.list_exists(list_id).await? {
            Ok(())
        } else {
            Err(ListError::NotFound)
        }
    }

    pub async fn list_all<S: Store + ?Sized>(store: &S) -> ListResult<Vec<ShoppingList>> {
        Ok(store.list_lists().await?)
    }

    /// Append one item per descriptor, in order. Repeated products are not
    /// merged; each descriptor becomes its own item, always unbought.
    pub async fn add_items<S: Store + ?Sized>(
        store: &S,
        list_id: Id,
        descriptors: Vec<ItemDescriptor>,
        policy: BatchPolicy,
    ) -> ListResult<Vec<Item>> {
        // Unknown lists must not leave new products behind.
        Self::ensure_list(store, list_id).await?;

        let descriptors = Self::validate_batch(descriptors, policy)?;
        let items = Self::resolve_batch(store, descriptors, false).await?;

        let created = store
            .append_items(list_id, items)
            .await?
            .ok_or(ListError::NotFound)?;
        log::info!("Added {} item(s) to list {}", created.len(), list_id);
        Ok(created)
    }

    pub async fn remove_item<S: Store + ?Sized>(store: &S, list_id: Id, item_id: Id) -> ListResult<()> {
        if store.remove_item(list_id, item_id).await? {
            log::info!("Removed item {} from list {}", item_id, list_id);
            Ok(())
        } else {
            Err(ListError::NotFound)
        }
    }

    pub async fn mark_bought<S: Store + ?Sized>(store: &S, list_id: Id, item_id: Id) -> ListResult<Item> {
        Self::set_bought(store, list_id, item_id, true).await
    }

    pub async fn mark_unbought<S: Store + ?Sized>(store: &S, list_id: Id, item_id: Id) -> ListResult<Item> {
        Self::set_bought(store, list_id, item_id, false).await
    }

    async fn set_bought<S: Store + ?Sized>(
        store: &S,
        list_id: Id,
        item_id: Id,
        bought: bool,
    ) -> ListResult<Item> {
        let item = store
            .set_item_bought(list_id, item_id, bought)
            .await?
            .ok_or(ListError::NotFound)?;
        log::info!("Item {} on list {} bought={}", item_id, list_id, bought);
        Ok(item)
    }

    /// Check every descriptor before anything is written.
    fn validate_batch(
        descriptors: Vec<ItemDescriptor>,
        policy: BatchPolicy,
    ) -> ListResult<Vec<ItemDescriptor>> {
        let mut valid = Vec::with_capacity(descriptors.len());

        for (index, descriptor) in descriptors.into_iter().enumerate() {
            if normalize_product_name(&descriptor.name).is_some() {
                valid.push(descriptor);
                continue;
            }

            match policy {
                BatchPolicy::AllOrNothing => {
                    return Err(ListError::InvalidItem {
                        index,
                        reason: "product name must not be empty".to_string(),
                    })
                }
                BatchPolicy::SkipInvalid => {
                    log::warn!("Skipping item at index {}: empty product name", index);
                }
            }
        }

        Ok(valid)
    }

    /// `keep_bought` is false for additions: a freshly added item starts unbought.
    async fn resolve_batch<S: Store + ?Sized>(
        store: &S,
        descriptors: Vec<ItemDescriptor>,
        keep_bought: bool,
    ) -> ListResult<Vec<NewItem>> {
        let mut items = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let product = ProductCatalog::resolve(store, &descriptor.name).await?;
            items.push(NewItem {
                product,
                amount: descriptor.amount,
                bought: keep_bought && descriptor.bought.unwrap_or(false),
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::store::{MemoryStore, ProductStore};

    fn named(name: &str) -> NewList {
        NewList {
            name: name.to_string(),
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_with_initial_items() {
        let store = MemoryStore::new();
        let new_list = NewList {
            name: "A Shopping List".to_string(),
            items: vec![
                ItemDescriptor::new("potato", 3),
                ItemDescriptor::new("tomato", 5).bought(true),
            ],
        };

        let list = ListOperations::create(&store, new_list, BatchPolicy::default())
            .await
            .unwrap();

        let items = list.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product().name, "potato");
        assert!(!items[0].is_bought());
        assert_eq!(items[1].product().name, "tomato");
        assert_eq!(items[1].amount(), &Amount::from(5));
        assert!(items[1].is_bought());

        let found = ListOperations::find(&store, list.id).await.unwrap();
        assert_eq!(found, list);
    }

    #[tokio::test]
    async fn test_find_unknown_list() {
        let store = MemoryStore::new();
        let err = ListOperations::find(&store, 1).await.unwrap_err();
        assert!(matches!(err, ListError::NotFound));
    }

    #[tokio::test]
    async fn test_add_items_appends_in_order_without_merging() {
        let store = MemoryStore::new();
        let list = ListOperations::create(&store, named("Cheesecake"), BatchPolicy::default())
            .await
            .unwrap();

        let batch = vec![
            ItemDescriptor::new("Cream Cheese", "1"),
            ItemDescriptor::new("Lime", "3"),
            ItemDescriptor::new("Lime", "1"),
        ];
        ListOperations::add_items(&store, list.id, batch, BatchPolicy::default())
            .await
            .unwrap();

        let list = ListOperations::find(&store, list.id).await.unwrap();
        let rendered: Vec<_> = list
            .items()
            .iter()
            .map(|i| (i.product().name.clone(), i.amount().to_string(), i.is_bought()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("Cream Cheese".to_string(), "1".to_string(), false),
                ("Lime".to_string(), "3".to_string(), false),
                ("Lime".to_string(), "1".to_string(), false),
            ]
        );
        assert_eq!(store.list_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_added_items_start_unbought() {
        let store = MemoryStore::new();
        let list = ListOperations::create(&store, named("Cheesecake"), BatchPolicy::default())
            .await
            .unwrap();

        let created = ListOperations::add_items(
            &store,
            list.id,
            vec![ItemDescriptor::new("Lime", "1").bought(true)],
            BatchPolicy::default(),
        )
        .await
        .unwrap();

        assert!(!created[0].is_bought());
        let list = ListOperations::find(&store, list.id).await.unwrap();
        assert!(!list.items()[0].is_bought());
    }

    #[tokio::test]
    async fn test_add_items_to_unknown_list_creates_no_products() {
        let store = MemoryStore::new();

        let err = ListOperations::add_items(
            &store,
            7,
            vec![ItemDescriptor::new("Banana", 3)],
            BatchPolicy::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ListError::NotFound));
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_or_nothing_rejects_whole_batch() {
        let store = MemoryStore::new();
        let list = ListOperations::create(&store, named("A"), BatchPolicy::AllOrNothing)
            .await
            .unwrap();

        let batch = vec![ItemDescriptor::new("Banana", 3), ItemDescriptor::new(" ", 1)];
        let err = ListOperations::add_items(&store, list.id, batch, BatchPolicy::AllOrNothing)
            .await
            .unwrap_err();

        assert!(matches!(err, ListError::InvalidItem { index: 1, .. }));
        assert!(ListOperations::find(&store, list.id).await.unwrap().is_empty());
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_skip_invalid_applies_the_rest() {
        let store = MemoryStore::new();
        let new_list = NewList {
            name: "A".to_string(),
            items: vec![
                ItemDescriptor::new("", 1),
                ItemDescriptor::new("Banana", 3),
                ItemDescriptor::new("Lime", 2),
            ],
        };

        let list = ListOperations::create(&store, new_list, BatchPolicy::SkipInvalid)
            .await
            .unwrap();

        let names: Vec<_> = list.items().iter().map(|i| i.product().name.as_str()).collect();
        assert_eq!(names, vec!["Banana", "Lime"]);
    }

    #[tokio::test]
    async fn test_item_operations_on_wrong_list_are_not_found() {
        let store = MemoryStore::new();
        let owner = ListOperations::create(
            &store,
            NewList {
                name: "Some other list".to_string(),
                items: vec![ItemDescriptor::new("Banana", 3)],
            },
            BatchPolicy::default(),
        )
        .await
        .unwrap();
        let list = ListOperations::create(&store, named("Cheesecake"), BatchPolicy::default())
            .await
            .unwrap();
        let item_id = owner.items()[0].id();

        for result in [
            ListOperations::mark_bought(&store, list.id, item_id).await.map(|_| ()),
            ListOperations::mark_unbought(&store, list.id, item_id).await.map(|_| ()),
            ListOperations::remove_item(&store, list.id, item_id).await,
            ListOperations::remove_item(&store, list.id, 999).await,
        ] {
            assert!(matches!(result, Err(ListError::NotFound)));
        }

        assert!(ListOperations::find(&store, owner.id)
            .await
            .unwrap()
            .item(item_id)
            .is_some());
    }

    #[tokio::test]
    async fn test_mark_bought_and_unbought_are_idempotent() {
        let store = MemoryStore::new();
        let list = ListOperations::create(
            &store,
            NewList {
                name: "Cheesecake".to_string(),
                items: vec![ItemDescriptor::new("Banana", 3)],
            },
            BatchPolicy::default(),
        )
        .await
        .unwrap();
        let item_id = list.items()[0].id();

        let first = ListOperations::mark_bought(&store, list.id, item_id).await.unwrap();
        let second = ListOperations::mark_bought(&store, list.id, item_id).await.unwrap();
        assert!(first.is_bought());
        assert_eq!(first.view(), second.view());

        let first = ListOperations::mark_unbought(&store, list.id, item_id).await.unwrap();
        let second = ListOperations::mark_unbought(&store, list.id, item_id).await.unwrap();
        assert!(!second.is_bought());
        assert_eq!(first.view(), second.view());
    }

    #[tokio::test]
    async fn test_second_removal_is_not_found() {
        let store = MemoryStore::new();
        let list = ListOperations::create(
            &store,
            NewList {
                name: "Cheesecake".to_string(),
                items: vec![ItemDescriptor::new("Banana", 3)],
            },
            BatchPolicy::default(),
        )
        .await
        .unwrap();
        let item_id = list.items()[0].id();

        ListOperations::remove_item(&store, list.id, item_id).await.unwrap();
        let err = ListOperations::remove_item(&store, list.id, item_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ListError::NotFound));
        assert!(ListOperations::find(&store, list.id).await.unwrap().is_empty());
    }
}
