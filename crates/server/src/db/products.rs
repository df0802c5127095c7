//! Product catalog repository.
//!
//! The catalog has an independent lifecycle from orders: rows here are
//! created, edited, and deleted by admins, and only ever copied (never
//! referenced) when an order is submitted.

use sqlx::PgPool;

use greengrocer_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, ProductRow, ProductUpdate};

/// Page size for the admin product listing.
const PAGE_SIZE: i64 = 6;

const PRODUCT_COLUMNS: &str = "id, name, image, price, quantity, category, description";

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the catalog, optionally filtered by a case-insensitive search
    /// over name, description, and category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<ProductRow>, RepositoryError> {
        let rows = match search {
            Some(term) => {
                let pattern = format!("%{term}%");
                sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM store.product
                     WHERE name ILIKE $1 OR description ILIKE $1 OR category ILIKE $1
                     ORDER BY id"
                ))
                .bind(&pattern)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM store.product ORDER BY id"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    /// List products in one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_category(&self, category: &str) -> Result<Vec<ProductRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.product WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Paginated catalog listing for the admin console, filtered by name.
    ///
    /// Returns the rows for `page` (1-based) and the total page count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        &self,
        page: u32,
        search: &str,
    ) -> Result<(Vec<ProductRow>, u32), RepositoryError> {
        let pattern = format!("%{search}%");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store.product WHERE name ILIKE $1")
            .bind(&pattern)
            .fetch_one(self.pool)
            .await?;

        let offset = i64::from(page.max(1) - 1) * PAGE_SIZE;
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.product
             WHERE name ILIKE $1
             ORDER BY name
             LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let total_pages = u32::try_from((total + PAGE_SIZE - 1) / PAGE_SIZE).unwrap_or(u32::MAX);
        Ok((rows, total_pages))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<ProductRow, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO store.product (name, image, price, quantity, category, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.image)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.category)
        .bind(&product.description)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a partial update; absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<ProductRow, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE store.product SET
                 name = COALESCE($2, name),
                 image = COALESCE($3, image),
                 price = COALESCE($4, price),
                 quantity = COALESCE($5, quantity),
                 category = COALESCE($6, category),
                 description = COALESCE($7, description)
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.image.as_deref())
        .bind(update.price)
        .bind(update.quantity)
        .bind(update.category.as_deref())
        .bind(update.description.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product, returning the deleted row.
    ///
    /// Historical orders are unaffected: they hold snapshots, not
    /// references.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<ProductRow, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM store.product WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }
}
