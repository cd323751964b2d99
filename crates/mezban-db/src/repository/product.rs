//! # Product Repository
//!
//! Catalog operations.
//!
//! ## Deletion Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Deleting a product NEVER touches sale history.                     │
//! │                                                                     │
//! │  sale_items stores the product as a TEXT snapshot (name, price,     │
//! │  unit at time of sale), not a foreign key. A deleted or renamed     │
//! │  product leaves every past receipt and analytic exactly as it was. │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{db_err, StoreError, StoreResult};
use mezban_core::validation::{validate_price_cents, validate_product_name};
use mezban_core::{NewProduct, Product, ValidationError};

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the whole catalog, ordered by name ascending.
    ///
    /// Ordering is case-insensitive so "apple" and "Apricot" sort the
    /// way a cashier expects.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, unit, created_at
            FROM products
            ORDER BY name COLLATE NOCASE ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("list_products"))?;

        Ok(products)
    }

    /// Adds a product to the catalog and returns its assigned id.
    ///
    /// ## Failure Modes
    /// - empty name, non-positive price → `Validation`
    /// - name already present (case-insensitively) → `Validation(Duplicate)`
    pub async fn add(&self, product: &NewProduct) -> StoreResult<i64> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;

        let name = product.name.trim();
        let unit = if product.unit.trim().is_empty() {
            mezban_core::DEFAULT_UNIT
        } else {
            product.unit.trim()
        };

        // Pre-check the case-insensitive unique rule for a precise
        // error; the NOCASE unique index is the last line of defense.
        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = ?1 COLLATE NOCASE)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("add_product"))?;

        if duplicate {
            return Err(StoreError::Validation(ValidationError::Duplicate {
                field: "name".to_string(),
                value: name.to_string(),
            }));
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, unit, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(product.price_cents)
        .bind(unit)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err("add_product"))?;

        let id = result.last_insert_rowid();
        debug!(id, name = %name, price_cents = product.price_cents, "Product added");

        Ok(id)
    }

    /// Deletes a product from the catalog.
    ///
    /// Historical sales referencing the product by name are unaffected.
    /// Fails with `NotFound` when the id does not exist.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("delete_product"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        debug!(id, "Product deleted");
        Ok(())
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("count_products"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
