//! Catalog seeding command.
//!
//! # Usage
//!
//! ```bash
//! grocer-cli seed
//! ```
//!
//! Inserts a small sample catalog for local development. Products that
//! already exist (matched by name) are skipped, so the command is safe to
//! re-run.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{CommandError, database_url};

struct SeedProduct {
    name: &'static str,
    image: &'static str,
    price: Decimal,
    quantity: i32,
    category: &'static str,
    description: &'static str,
}

fn sample_catalog() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Gala Apples",
            image: "/images/gala-apples.jpg",
            price: Decimal::from(45_000),
            quantity: 120,
            category: "fruit",
            description: "Sweet and crisp, sold per kilogram.",
        },
        SeedProduct {
            name: "Bananas",
            image: "/images/bananas.jpg",
            price: Decimal::from(25_000),
            quantity: 200,
            category: "fruit",
            description: "A hand of ripe bananas.",
        },
        SeedProduct {
            name: "Baby Spinach",
            image: "/images/baby-spinach.jpg",
            price: Decimal::from(32_000),
            quantity: 80,
            category: "vegetable",
            description: "Washed baby spinach, 300g bag.",
        },
        SeedProduct {
            name: "Cherry Tomatoes",
            image: "/images/cherry-tomatoes.jpg",
            price: Decimal::from(38_000),
            quantity: 95,
            category: "vegetable",
            description: "Vine-ripened cherry tomatoes, 500g punnet.",
        },
        SeedProduct {
            name: "Fresh Basil",
            image: "/images/fresh-basil.jpg",
            price: Decimal::from(15_000),
            quantity: 60,
            category: "herb",
            description: "A bunch of fragrant sweet basil.",
        },
        SeedProduct {
            name: "Carrots",
            image: "/images/carrots.jpg",
            price: Decimal::from(20_000),
            quantity: 150,
            category: "vegetable",
            description: "Crunchy carrots, sold per kilogram.",
        },
    ]
}

/// Seed the catalog with sample products.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let mut inserted = 0_u32;
    for product in sample_catalog() {
        let result = sqlx::query(
            "INSERT INTO store.product (name, image, price, quantity, category, description)
             SELECT $1, $2, $3, $4, $5, $6
             WHERE NOT EXISTS (SELECT 1 FROM store.product WHERE name = $1)",
        )
        .bind(product.name)
        .bind(product.image)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.category)
        .bind(product.description)
        .execute(&pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
            tracing::info!("Seeded product: {}", product.name);
        } else {
            tracing::info!("Skipped existing product: {}", product.name);
        }
    }

    tracing::info!("Seeding complete: {inserted} products inserted");
    Ok(())
}
