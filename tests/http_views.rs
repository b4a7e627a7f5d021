use backoffice_views::adapters::{DebugRenderer, InMemoryDataSource};
use backoffice_views::domain::ports::DataSource;
use backoffice_views::domain::model::RecordExt;
use backoffice_views::view::labels::Labels;
use backoffice_views::view::{ViewDeps, ViewSettings};
use backoffice_views::{router, AppState};
use serde_json::json;
use std::sync::Arc;

const SEED: &str = r#"{
  "product": [
    { "id": "p1", "name": "Ceramic Mug", "price": 199.5, "currency": "PHP", "active": true },
    { "id": "p2", "name": "Teapot", "price": 850, "active": false }
  ],
  "price_list": [
    { "id": "pl-1", "name": "Holiday", "date_start_string": "2026-12-01", "active": true }
  ],
  "inventory_item": [
    { "id": "i1", "name": "Ceramic Mug", "sku": "MUG-01", "location_id": "sm-city-cebu",
      "quantity_on_hand": 10, "quantity_reserved": 3, "reorder_level": 5, "active": true }
  ],
  "revenue": [
    { "id": "r1", "reference_number": "INV-001", "status": "ongoing", "total_amount": 0 },
    { "id": "r2", "reference_number": "INV-002", "status": "ongoing", "total_amount": 399 }
  ],
  "revenue_line_item": [
    { "id": "li1", "revenue_id": "r2", "inventory_item_id": "i1", "quantity": 2, "unit_price": 199.5 }
  ],
  "plan": [
    { "id": "basic", "name": "Basic", "interval": "monthly", "price": "499" }
  ]
}"#;

async fn spawn_app() -> (String, Arc<InMemoryDataSource>) {
    let db = Arc::new(InMemoryDataSource::from_json_str(SEED).expect("seed"));
    let deps = ViewDeps::new(db.clone(), Arc::new(Labels::default()), ViewSettings::default());
    let app = router(AppState::new(deps, Arc::new(DebugRenderer)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    (format!("http://{}", addr), db)
}

fn header<'a>(resp: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_healthz() {
    let (base, _db) = spawn_app().await;
    let resp = reqwest::get(format!("{}/healthz", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_full_page_renders_template() {
    let (base, _db) = spawn_app().await;
    let resp = reqwest::get(format!("{}/app/products/list/active", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "content-type").unwrap().starts_with("text/html"));
    let html = resp.text().await.unwrap();
    assert!(html.contains("data-template=\"product-list\""));
    assert!(html.contains("Ceramic Mug"));
    assert!(!html.contains("Teapot"));
}

#[tokio::test]
async fn test_inventory_available_quantity() {
    let (base, _db) = spawn_app().await;
    let html = reqwest::get(format!("{}/app/inventory/list/sm-city-cebu", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("MUG-01"));
    assert!(html.contains("&quot;available&quot;: &quot;7&quot;"));
}

#[tokio::test]
async fn test_missing_record_is_404() {
    let (base, _db) = spawn_app().await;
    let resp = reqwest::get(format!("{}/app/products/detail/nope", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
    let html = resp.text().await.unwrap();
    assert!(html.contains("data-template=\"error\""));
    assert!(html.contains("could not be found"));
}

#[tokio::test]
async fn test_form_post_triggers_table_refresh() {
    let (base, db) = spawn_app().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/action/products/add", base))
        .form(&[("name", "Saucer"), ("price", "75"), ("currency", "PHP"), ("active", "true")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let trigger: serde_json::Value = serde_json::from_str(header(&resp, "HX-Trigger").unwrap()).unwrap();
    assert_eq!(trigger, json!({ "formSuccess": true, "refreshTable": "products-table" }));
    assert_eq!(db.count("product").await, 3);
}

#[tokio::test]
async fn test_multipart_bulk_delete() {
    let (base, db) = spawn_app().await;
    let form = reqwest::multipart::Form::new().text("id", "p1").text("id", "p2");
    let resp = reqwest::Client::new()
        .post(format!("{}/action/products/bulk-delete", base))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(db.count("product").await, 0);
}

#[tokio::test]
async fn test_validation_error_is_422_with_message() {
    let (base, _db) = spawn_app().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/action/price-lists/pl-1/products/add", base))
        .form(&[("amount", "100")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    assert_eq!(header(&resp, "HX-Error-Message"), Some("Product is required"));
}

#[tokio::test]
async fn test_completing_sale_gated_on_line_items() {
    let (base, db) = spawn_app().await;
    let client = reqwest::Client::new();

    let rejected = client
        .post(format!("{}/action/sales/set-status?id=r1&status=complete", base))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), 422);
    assert_eq!(
        header(&rejected, "HX-Error-Message"),
        Some("Cannot complete a sale with no items. Add items first.")
    );

    let accepted = client
        .post(format!("{}/action/sales/set-status?id=r2&status=complete", base))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), 200);
    let sale = db.read("revenue", "r2").await.unwrap();
    assert_eq!(sale.str_field("status"), "complete");
    let item = db.read("inventory_item", "i1").await.unwrap();
    assert_eq!(item.num("quantity_on_hand"), 8.0);
}

#[tokio::test]
async fn test_sale_add_redirects_to_items_tab() {
    let (base, _db) = spawn_app().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/action/sales/add", base))
        .form(&[("name", "Walk-in"), ("revenue_date_string", "2026-10-16"), ("currency", "PHP")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let redirect = header(&resp, "HX-Redirect").unwrap();
    assert!(redirect.starts_with("/app/sales/detail/"));
    assert!(redirect.ends_with("tab=items"));
}

#[tokio::test]
async fn test_read_only_list() {
    let (base, _db) = spawn_app().await;
    let resp = reqwest::get(format!("{}/app/plans/list/active", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("data-template=\"plan-list\""));
    assert!(html.contains("Basic"));
}
