use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductCatalog;
use crate::domain::product::{Product, ProductQuery};
use crate::schema::products;

use super::models::ProductRow;

/// Read-only view over the product catalog; catalog maintenance lives in a
/// different service.
pub struct DieselProductCatalog {
    pool: DbPool,
}

impl DieselProductCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductCatalog for DieselProductCatalog {
    fn find_product(&self, query: &ProductQuery) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = match query {
            ProductQuery::Id(id) => products::table
                .filter(products::id.eq(id))
                .select(ProductRow::as_select())
                .first(&mut conn)
                .optional()?,
            ProductQuery::Name(name) => products::table
                .filter(products::name.eq(name))
                .select(ProductRow::as_select())
                .first(&mut conn)
                .optional()?,
        };

        Ok(row.map(|row| Product {
            id: row.id,
            name: row.name,
            price: row.price,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::DieselProductCatalog;
    use crate::domain::ports::ProductCatalog;
    use crate::domain::product::ProductQuery;
    use crate::infrastructure::testutil::{seed_product, setup_db};

    #[tokio::test]
    async fn finds_a_product_by_id() {
        let (_container, pool) = setup_db().await;
        let product_id = seed_product(&pool, "burger", "5.00");
        let catalog = DieselProductCatalog::new(pool);

        let product = catalog
            .find_product(&ProductQuery::Id(product_id))
            .expect("lookup failed")
            .expect("product should exist");

        assert_eq!(product.id, product_id);
        assert_eq!(product.name, "burger");
        assert_eq!(product.price, BigDecimal::from_str("5.00").unwrap());
    }

    #[tokio::test]
    async fn finds_a_product_by_name() {
        let (_container, pool) = setup_db().await;
        let product_id = seed_product(&pool, "soda", "3.00");
        let catalog = DieselProductCatalog::new(pool);

        let product = catalog
            .find_product(&ProductQuery::Name("soda".to_string()))
            .expect("lookup failed")
            .expect("product should exist");

        assert_eq!(product.id, product_id);
    }

    #[tokio::test]
    async fn returns_none_for_an_unknown_product() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselProductCatalog::new(pool);

        let result = catalog
            .find_product(&ProductQuery::Id(Uuid::new_v4()))
            .expect("lookup should not error");

        assert!(result.is_none());
    }
}
