//! Local storefront API for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Product id whose endpoints always answer with a server error.
pub const BROKEN_PRODUCT: i64 = 500;

/// Stock levels served by the fake API, adjustable while it runs.
#[derive(Clone, Default)]
pub struct Shop {
    stock: Arc<Mutex<HashMap<i64, u32>>>,
}

impl Shop {
    pub fn with_stock(levels: &[(i64, u32)]) -> Self {
        let shop = Self::default();
        for (id, amount) in levels {
            shop.set_stock(*id, *amount);
        }
        shop
    }

    pub fn set_stock(&self, id: i64, amount: u32) {
        self.stock.lock().unwrap().insert(id, amount);
    }

    fn amount(&self, id: i64) -> Option<u32> {
        self.stock.lock().unwrap().get(&id).copied()
    }
}

async fn stock(State(shop): State<Shop>, Path(id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    if id == BROKEN_PRODUCT {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let amount = shop.amount(id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "id": id, "amount": amount })))
}

async fn product(
    State(shop): State<Shop>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    if id == BROKEN_PRODUCT {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    shop.amount(id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({
        "id": id,
        "title": format!("Tênis {}", id),
        "price": 139.9,
        "image": format!("https://rocketseat-cdn.s3.amazonaws.com/tenis{}.jpg", id),
    })))
}

/// Serve the API on an ephemeral port and return its base URL.
pub async fn spawn_api(shop: Shop) -> String {
    let app = Router::new()
        .route("/stock/{id}", get(stock))
        .route("/products/{id}", get(product))
        .with_state(shop);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
