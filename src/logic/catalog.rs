use crate::logic::error::{ListError, ListResult};
use crate::model::{normalize_product_name, Product};
use crate::store::traits::ProductStore;

/// Resolve-or-create access to the product catalog.
pub struct ProductCatalog;

impl ProductCatalog {
    /// Return the product called `name`, creating it on first reference.
    /// Surrounding whitespace is not part of the name.
    pub async fn resolve<S: ProductStore + ?Sized>(store: &S, name: &str) -> ListResult<Product> {
        let name = normalize_product_name(name).ok_or_else(|| ListError::InvalidItem {
            index: 0,
            reason: "product name must not be empty".to_string(),
        })?;

        let product = store.resolve_product(name).await?;
        log::debug!("Resolved product '{}' to id {}", product.name, product.id);
        Ok(product)
    }

    pub async fn list<S: ProductStore + ?Sized>(store: &S) -> ListResult<Vec<Product>> {
        Ok(store.list_products().await?)
    }
}
