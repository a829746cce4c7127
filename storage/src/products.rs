//! Catalogue products.
//!
//! The full record is kept as a JSON document; `id`, `slug` and `sku` are
//! also stored as columns so SQLite can enforce their uniqueness.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use sqlx::types::Json;
use tracing::debug;
use validator::Validate;

use crate::{StorageError, StorageResult, timestamp};

const RESOURCE: &str = "Product";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[validate(length(min = 1))]
    pub sku: String,
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub compare_at_price: Option<f64>,
    #[serde(default)]
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dimensions: BTreeMap<String, f64>,
    pub inventory_quantity: i64,
    pub inventory_status: String,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default = "default_true")]
    pub track_inventory: bool,
    #[serde(default)]
    pub allow_backorder: bool,
    pub status: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub variants: Vec<Map<String, Value>>,
    #[serde(default)]
    pub images: Vec<Map<String, Value>>,
    #[serde(default)]
    pub additional_data: Map<String, Value>
}

#[derive(Clone)]
pub struct ProductStore {
    pool: SqlitePool
}

impl ProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a product. Duplicate `id`, `slug` or `sku` yields `Conflict`.
    pub async fn create(&self, product: &Product) -> StorageResult<Product> {
        sqlx::query("INSERT INTO products (id, name, slug, sku, document) VALUES (?, ?, ?, ?, ?)")
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.sku)
            .bind(Json(product))
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::on_insert(RESOURCE, e))?;

        debug!(product_id = %product.id, "Inserted product");
        Ok(product.clone())
    }

    pub async fn list(&self) -> StorageResult<Vec<Product>> {
        let documents: Vec<Json<Product>> =
            sqlx::query_scalar("SELECT document FROM products ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;

        Ok(documents.into_iter().map(|doc| doc.0).collect())
    }
}
