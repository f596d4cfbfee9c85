use crate::model::Id;
use serde::{Deserialize, Serialize};

/// A catalog entry, shared by every item that refers to it by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub name: String,
}

impl Product {
    pub fn new(id: Id, name: String) -> Self {
        Self { id, name }
    }
}

/// Normalize a product name for catalog lookup. Returns `None` for names that
/// are empty once surrounding whitespace is removed.
pub fn normalize_product_name(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_product_name() {
        assert_eq!(normalize_product_name("Banana"), Some("Banana"));
        assert_eq!(normalize_product_name("  Lime "), Some("Lime"));
        assert_eq!(normalize_product_name(""), None);
        assert_eq!(normalize_product_name("   "), None);
    }
}
