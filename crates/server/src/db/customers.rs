//! Customer repository.
//!
//! Customers are the document root for orders: every order lives in the
//! `orders` JSONB array of exactly one customer row. Appends and status
//! updates therefore only ever touch a single row, which is what makes them
//! atomic without application-level locking.

use sqlx::PgPool;
use sqlx::types::Json;
use thiserror::Error;

use greengrocer_core::{CustomerId, Email, Order, OrderId, OrderStatus, StatusError};

use super::RepositoryError;
use crate::models::customer::CustomerRow;

/// Page size for the admin customer listing.
const PAGE_SIZE: i64 = 5;

/// Error from an order status update: either the store failed, or the
/// requested transition is illegal.
#[derive(Debug, Error)]
pub enum StatusUpdateError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Transition(#[from] StatusError),
}

const CUSTOMER_COLUMNS: &str = "id, username, email, phone, password_hash, is_admin, orders";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<CustomerRow>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM store.customer WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        email: &Email,
        phone: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<CustomerRow, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO store.customer (username, email, phone, password_hash, is_admin)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(username)
        .bind(email.as_str())
        .bind(phone)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row)
    }

    /// Append one order to a customer's embedded order list.
    ///
    /// A single-statement JSONB append: either the whole order becomes
    /// visible or nothing does, so no partial order can ever be observed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this email.
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn append_order(&self, email: &Email, order: &Order) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE store.customer SET orders = orders || jsonb_build_array($2::jsonb)
             WHERE email = $1",
        )
        .bind(email.as_str())
        .bind(Json(order))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set the status of the order with the given globally unique id.
    ///
    /// Locks the owning customer row, validates the transition against the
    /// current status, rewrites the embedded array, and returns the updated
    /// customer document. Two racing updates on the same order serialize on
    /// the row lock; the loser re-reads the winner's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` (wrapped) if no customer owns an
    /// order with this id, and `StatusError::Terminal` (wrapped) if the
    /// order is already delivered or cancelled.
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<CustomerRow, StatusUpdateError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::Database)?;

        let probe = serde_json::json!([{ "orderId": order_id }]);
        let locked = sqlx::query_as::<_, (CustomerId, Json<Vec<Order>>)>(
            "SELECT id, orders FROM store.customer WHERE orders @> $1 FOR UPDATE",
        )
        .bind(&probe)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::Database)?;

        let Some((customer_id, Json(mut orders))) = locked else {
            return Err(RepositoryError::NotFound.into());
        };

        let order = orders
            .iter_mut()
            .find(|order| order.order_id == order_id)
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "customer {customer_id} matched containment probe but order {order_id} is missing"
                ))
            })?;
        order.status = order.status.transition(new_status)?;

        let updated = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE store.customer SET orders = $2 WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(Json(&orders))
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::Database)?;

        tx.commit().await.map_err(RepositoryError::Database)?;

        Ok(updated)
    }

    /// Get every customer row, in natural storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all(&self) -> Result<Vec<CustomerRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM store.customer"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Paginated customer listing for the admin console, filtered by a
    /// case-insensitive search over username and email.
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
    ) -> Result<(Vec<CustomerRow>, u32), RepositoryError> {
        let pattern = format!("%{search}%");

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM store.customer WHERE username ILIKE $1 OR email ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(self.pool)
        .await?;

        let offset = i64::from(page.max(1) - 1) * PAGE_SIZE;
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM store.customer
             WHERE username ILIKE $1 OR email ILIKE $1
             ORDER BY id
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
}
