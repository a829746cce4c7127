use storage::{NewTask, Product, ProductStore, StorageError, TaskStore};

fn product(overrides: serde_json::Value) -> Product {
    serde_json::from_value(testing::product_payload_with(overrides)).unwrap()
}

#[tokio::test]
async fn test_tasks_create_and_list() {
    let store = TaskStore::new(testing::memory_pool().await);

    let task = NewTask {
        title: "Write docs".to_string(),
        description: None,
        completed: true
    };
    let created = store.create(&task).await.unwrap();
    assert!(created.id > 0);
    assert!(created.completed);

    let tasks = store.list().await.unwrap();
    assert_eq!(tasks, vec![created]);
}

#[tokio::test]
async fn test_product_round_trips_document() {
    let store = ProductStore::new(testing::memory_pool().await);
    let product = product(serde_json::json!({}));

    store.create(&product).await.unwrap();
    let listed = store.list().await.unwrap();

    assert_eq!(listed, vec![product]);
    assert_eq!(listed[0].dimensions["width"], 7.5);
    assert_eq!(listed[0].attributes[0]["value"], "128GB");
}

#[tokio::test]
async fn test_duplicate_sku_is_conflict() {
    let store = ProductStore::new(testing::memory_pool().await);
    store.create(&product(serde_json::json!({}))).await.unwrap();

    let duplicate = product(serde_json::json!({
        "id": "another-id",
        "slug": "another-slug"
    }));
    let err = store.create(&duplicate).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict { .. }));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_id_is_conflict() {
    let store = ProductStore::new(testing::memory_pool().await);
    store.create(&product(serde_json::json!({}))).await.unwrap();

    let duplicate = product(serde_json::json!({
        "slug": "other-slug",
        "sku": "OTHER-SKU"
    }));
    let err = store.create(&duplicate).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict { .. }));
}

#[test]
fn test_product_defaults() {
    let minimal = serde_json::json!({
        "id": "p1",
        "created_at": "2025-07-25T03:00:00Z",
        "updated_at": "2025-07-25",
        "name": "Widget",
        "slug": "widget",
        "sku": "W-1",
        "price": 10.0,
        "inventory_quantity": 3,
        "inventory_status": "in_stock",
        "status": "active"
    });
    let product: Product = serde_json::from_value(minimal).unwrap();
    assert!(product.track_inventory);
    assert!(!product.allow_backorder);
    assert!(!product.is_featured);
    assert!(product.tags.is_empty());
    assert!(product.additional_data.is_empty());
}
