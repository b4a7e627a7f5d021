//! Drawer and row actions on inventory items.

use super::{item_name, INVENTORY_TABLE};
use crate::domain::model::{collections, format_quantity, Record, RecordExt};
use crate::record;
use crate::routes;
use crate::view::labels::InventoryFormLabels;
use crate::view::page::{FormPage, SelectOption};
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use crate::views::{bulk_delete, bulk_set_status as bulk_set_active, delete_one, location_options, set_status_one};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryForm {
    pub id: String,
    pub product_name: String,
    pub sku: String,
    pub quantity_on_hand: String,
    pub quantity_reserved: String,
    pub reorder_level: String,
    pub unit_of_measure: String,
    pub location_id: String,
    pub notes: String,
    pub active: bool,
    pub locations: Vec<SelectOption>,
    pub labels: InventoryFormLabels,
}

fn item_record(ctx: &ViewContext) -> Record {
    let form = &ctx.form;
    record! {
        "name" => form.get("product_name"),
        "sku" => form.get("sku"),
        "quantity_on_hand" => form.number("quantity_on_hand"),
        "quantity_reserved" => form.number("quantity_reserved"),
        "reorder_level" => form.number("reorder_level"),
        "unit_of_measure" => form.get("unit_of_measure"),
        "location_id" => form.get("location_id"),
        "notes" => form.get("notes"),
        "active" => form.checkbox("active"),
    }
}

pub async fn add(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    if ctx.is_get() {
        let location_id = match ctx.query_param("location") {
            "" => deps.settings.default_location.clone(),
            location => location.to_string(),
        };
        let form = InventoryForm {
            unit_of_measure: "pcs".to_string(),
            active: true,
            locations: location_options(deps, &location_id).await,
            location_id,
            labels: deps.labels.inventory.form.clone(),
            ..Default::default()
        };
        return ViewResult::ok("inventory-drawer-form", &FormPage::add(routes::INVENTORY_ADD, form));
    }

    if let Err(e) = deps.db.create(collections::INVENTORY_ITEM, item_record(ctx)).await {
        tracing::error!("Failed to create inventory item: {}", e);
        return htmx_error("Failed to create inventory item");
    }
    htmx_success(INVENTORY_TABLE)
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");

    if ctx.is_get() {
        let item = match deps.db.read(collections::INVENTORY_ITEM, id).await {
            Ok(item) => item,
            Err(e) => {
                tracing::error!("Failed to read inventory_item {}: {}", id, e);
                return htmx_error("Inventory item not found");
            }
        };
        let location_id = item.text("location_id");
        let form = InventoryForm {
            id: id.to_string(),
            product_name: item_name(&item).to_string(),
            sku: item.text("sku"),
            quantity_on_hand: format_quantity(item.num("quantity_on_hand")),
            quantity_reserved: format_quantity(item.num("quantity_reserved")),
            reorder_level: format_quantity(item.num("reorder_level")),
            unit_of_measure: item.text("unit_of_measure"),
            notes: item.text("notes"),
            active: item.flag("active") != Some(false),
            locations: location_options(deps, &location_id).await,
            location_id,
            labels: deps.labels.inventory.form.clone(),
        };
        return ViewResult::ok(
            "inventory-drawer-form",
            &FormPage::edit(routes::url(routes::INVENTORY_EDIT, &[id]), form),
        );
    }

    if let Err(e) = deps.db.update(collections::INVENTORY_ITEM, id, item_record(ctx)).await {
        tracing::error!("Failed to update inventory_item {}: {}", id, e);
        return htmx_error("Failed to update inventory item");
    }
    htmx_success(INVENTORY_TABLE)
}

pub async fn delete(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    delete_one(deps.db.as_ref(), ctx, collections::INVENTORY_ITEM, INVENTORY_TABLE, "Inventory item").await
}

pub async fn bulk_delete_items(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    bulk_delete(deps.db.as_ref(), ctx, collections::INVENTORY_ITEM, INVENTORY_TABLE, "inventory item").await
}

pub async fn set_status(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    set_status_one(deps.db.as_ref(), ctx, collections::INVENTORY_ITEM, INVENTORY_TABLE, "Inventory item").await
}

pub async fn bulk_set_status(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    bulk_set_active(deps.db.as_ref(), ctx, collections::INVENTORY_ITEM, INVENTORY_TABLE, "inventory item").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::domain::ports::DataSource;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    fn deps(db: Arc<InMemoryDataSource>) -> ViewDeps {
        ViewDeps::new(db, Arc::new(Labels::default()), ViewSettings::default())
    }

    #[tokio::test]
    async fn test_add_form_defaults() {
        let deps = deps(Arc::new(InMemoryDataSource::new()));
        let result = add(&deps, &ViewContext::get("/action/inventory/add")).await;
        assert_eq!(result.template(), Some("inventory-drawer-form"));
        let data = result.data().unwrap();
        assert_eq!(data["unitOfMeasure"], "pcs");
        assert_eq!(data["active"], true);
        assert_eq!(data["isEdit"], false);
        assert_eq!(data["locationId"], "ayala-central-bloc");
    }

    #[tokio::test]
    async fn test_add_parses_quantities() {
        let db = Arc::new(InMemoryDataSource::new());
        let deps = deps(db.clone());
        let ctx = ViewContext::post("/action/inventory/add")
            .with_form("product_name", "Mug")
            .with_form("quantity_on_hand", "12")
            .with_form("quantity_reserved", "2.5")
            .with_form("reorder_level", "abc")
            .with_form("active", "on");
        let result = add(&deps, &ctx).await;
        assert!(result.header("HX-Trigger").unwrap().contains(INVENTORY_TABLE));

        let items = db.list_simple(collections::INVENTORY_ITEM).await.unwrap();
        assert_eq!(items[0].str_field("name"), "Mug");
        assert_eq!(items[0].num("quantity_on_hand"), 12.0);
        assert_eq!(items[0].num("quantity_reserved"), 2.5);
        assert_eq!(items[0].num("reorder_level"), 0.0);
        assert_eq!(items[0].flag("active"), Some(false));
    }

    #[tokio::test]
    async fn test_edit_missing_and_update() {
        let db = Arc::new(InMemoryDataSource::new());
        let deps = deps(db.clone());
        let missing = edit(&deps, &ViewContext::get("/x").with_param("id", "nope")).await;
        assert_eq!(missing.header("HX-Error-Message"), Some("Inventory item not found"));

        db.create(
            collections::INVENTORY_ITEM,
            record! { "id" => "i1", "product_name" => "Mug", "quantity_on_hand" => 3 },
        )
        .await
        .unwrap();
        let form = edit(&deps, &ViewContext::get("/x").with_param("id", "i1")).await;
        let data = form.data().unwrap();
        assert_eq!(data["productName"], "Mug");
        assert_eq!(data["quantityOnHand"], "3");
        assert_eq!(data["formAction"], "/action/inventory/edit/i1");

        let ctx = ViewContext::post("/x")
            .with_param("id", "i1")
            .with_form("product_name", "Big Mug")
            .with_form("quantity_on_hand", "9")
            .with_form("active", "true");
        edit(&deps, &ctx).await;
        let item = db.read(collections::INVENTORY_ITEM, "i1").await.unwrap();
        assert_eq!(item.str_field("name"), "Big Mug");
        assert_eq!(item.num("quantity_on_hand"), 9.0);
    }

    #[tokio::test]
    async fn test_delete_and_bulk_messages() {
        let deps = deps(Arc::new(InMemoryDataSource::new()));
        let result = delete(&deps, &ViewContext::post("/x")).await;
        assert_eq!(result.header("HX-Error-Message"), Some("Inventory item ID is required"));
        let result = bulk_delete_items(&deps, &ViewContext::post("/x")).await;
        assert_eq!(result.header("HX-Error-Message"), Some("No inventory item IDs provided"));
    }

    #[tokio::test]
    async fn test_bulk_set_status() {
        let db = Arc::new(InMemoryDataSource::new());
        for id in ["i1", "i2"] {
            db.create(collections::INVENTORY_ITEM, record! { "id" => id, "active" => true })
                .await
                .unwrap();
        }
        let deps = deps(db.clone());
        let ctx = ViewContext::post("/x")
            .with_form("id", "i1")
            .with_form("id", "i2")
            .with_form("target_status", "inactive");
        bulk_set_status(&deps, &ctx).await;
        for id in ["i1", "i2"] {
            let item = db.read(collections::INVENTORY_ITEM, id).await.unwrap();
            assert_eq!(item.flag("active"), Some(false));
        }
    }
}
