use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Fresh in-memory database with every table created.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory SQLite should open");

    storage::initialize_schema(&pool)
        .await
        .expect("schema should initialize");
    tracing::debug!("In-memory test database ready");
    pool
}

/// A complete explicit-fields note payload.
pub fn note_payload() -> Value {
    json!({
        "title": "Team Sync",
        "description": "Weekly sync",
        "status": "open",
        "date": "2024-01-01T10:00:00Z",
        "action_items": ["Send summary", "Create tickets"]
    })
}

/// [`note_payload`] with the given top-level keys replaced.
pub fn note_payload_with(overrides: Value) -> Value {
    let mut payload = note_payload();
    if let (Some(base), Value::Object(extra)) = (payload.as_object_mut(), overrides) {
        base.extend(extra);
    }
    payload
}

/// [`note_payload`] without the given keys.
pub fn note_payload_without(keys: &[&str]) -> Value {
    let mut payload = note_payload();
    if let Some(base) = payload.as_object_mut() {
        for key in keys {
            base.remove(*key);
        }
    }
    payload
}

pub fn task_payload() -> Value {
    json!({
        "title": "Write release notes",
        "description": "Cover the AI note endpoints",
        "completed": false
    })
}

pub fn product_payload() -> Value {
    json!({
        "id": "a1b2c3d4-e5f6-7890-ab12-34567890abcd",
        "created_at": "2025-07-25T03:00:00Z",
        "updated_at": "2025-07-25T03:00:00Z",
        "name": "iPhone 15 Pro",
        "slug": "iphone-15-pro",
        "description": "The latest iPhone with advanced features",
        "short_description": "Latest iPhone with Pro camera system",
        "sku": "IPHONE15PRO",
        "brand_id": "b2b2c3d4-e5f6-7890-ab12-34567890abcd",
        "category_ids": ["c1c2c3d4-e5f6-7890-ab12-34567890abcd"],
        "tags": ["smartphone", "apple", "pro"],
        "price": 999.0,
        "compare_at_price": 1099.0,
        "cost_price": 850.0,
        "weight": 0.5,
        "dimensions": { "length": 15.0, "width": 7.5, "height": 0.7 },
        "inventory_quantity": 100,
        "inventory_status": "in_stock",
        "low_stock_threshold": 10,
        "track_inventory": true,
        "allow_backorder": false,
        "status": "active",
        "is_featured": true,
        "sort_order": 1,
        "meta_title": "iPhone 15 Pro - Buy Now",
        "meta_description": "Get the new iPhone 15 Pro",
        "attributes": [
            { "attribute_id": "d3d3c3d4-e5f6-7890-ab12-34567890abcd", "value": "128GB" }
        ],
        "variants": [
            { "id": "v1", "sku": "IPHONE15PRO-128GB-BLACK", "price": 999.0 }
        ],
        "images": [
            { "id": "i1", "image_url": "https://example.com/images/iphone15pro.jpg" }
        ],
        "additional_data": { "warranty": "1 year" }
    })
}

/// [`product_payload`] with the given top-level keys replaced.
pub fn product_payload_with(overrides: Value) -> Value {
    let mut payload = product_payload();
    if let (Some(base), Value::Object(extra)) = (payload.as_object_mut(), overrides) {
        base.extend(extra);
    }
    payload
}
