//! HTTP route definitions.
//!
//! | Method | Path                            | Auth  | Handler                        |
//! |--------|---------------------------------|-------|--------------------------------|
//! | POST   | `/auth/register`                | none  | [`auth::register`]             |
//! | POST   | `/auth/login`                   | none  | [`auth::login`]                |
//! | GET    | `/api/products`                 | none  | [`products::list`]             |
//! | GET    | `/api/products/{category}`      | none  | [`products::by_category`]      |
//! | POST   | `/api/order`                    | user  | [`orders::submit`]             |
//! | GET    | `/api/myorders/{email}`         | user  | [`orders::my_orders`]          |
//! | GET    | `/api/admin/orders`             | admin | [`orders::list_all`]           |
//! | PATCH  | `/api/admin/orders/{id}`        | admin | [`orders::update_status`]      |
//! | GET    | `/api/admin/products`           | admin | [`products::admin_page`]       |
//! | POST   | `/api/admin/products`           | admin | [`products::create`]           |
//! | PUT    | `/api/admin/products/{id}`      | admin | [`products::update`]           |
//! | DELETE | `/api/admin/products/{id}`      | admin | [`products::delete`]           |
//! | GET    | `/api/admin/customers`          | admin | [`customers::page`]            |
//! | GET    | `/api/admin/export/{data_type}` | admin | [`export::export`]             |

pub mod auth;
pub mod customers;
pub mod export;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// All application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api", api_routes().nest("/admin", admin_routes()))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/{category}", get(products::by_category))
        .route("/order", post(orders::submit))
        .route("/myorders/{email}", get(orders::my_orders))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::list_all))
        .route("/orders/{id}", patch(orders::update_status))
        .route("/products", get(products::admin_page).post(products::create))
        .route("/products/{id}", put(products::update).delete(products::delete))
        .route("/customers", get(customers::page))
        .route("/export/{data_type}", get(export::export))
}
