//! Sale status transitions and their side effects on stock and serials.
//!
//! Every step is a separate `DataSource` call. Follow-up writes after the
//! status update are logged and skipped on failure; nothing is rolled back.

use crate::domain::model::{collections, format_quantity, Record, RecordExt, SaleStatus, SerialStatus};
use crate::domain::ports::DataSource;
use crate::record;
use crate::utils::error::BackofficeError;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Rejections and failures of a status change. `Display` is the user-facing message.
#[derive(Debug, Error)]
pub enum StatusChangeError {
    #[error("Invalid status")]
    InvalidStatus,

    #[error("Invalid target status")]
    InvalidTargetStatus,

    #[error("Cannot complete a sale with no items. Add items first.")]
    NoLineItems,

    #[error("Cannot cancel a sale with recorded payments. Remove payments first.")]
    HasPayments,

    #[error("{offending} of {total} selected sales have no items. Add items first.")]
    BulkNoLineItems { offending: usize, total: usize },

    #[error("{offending} of {total} selected sales have recorded payments. Remove payments first.")]
    BulkHasPayments { offending: usize, total: usize },

    #[error("Failed to check sale items")]
    LineItemsUnavailable(#[source] BackofficeError),

    #[error("Failed to check sale payments")]
    PaymentsUnavailable(#[source] BackofficeError),

    #[error("Failed to update sale status")]
    UpdateFailed(#[source] BackofficeError),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub updated: usize,
    pub failed: usize,
}

pub async fn line_items_for(db: &dyn DataSource, sale_id: &str) -> crate::Result<Vec<Record>> {
    db.list_where(collections::REVENUE_LINE_ITEM, "revenue_id", sale_id)
        .await
}

pub async fn payments_for(db: &dyn DataSource, sale_id: &str) -> crate::Result<Vec<Record>> {
    db.list_where(collections::REVENUE_PAYMENT, "revenue_id", sale_id)
        .await
}

fn status_patch(status: SaleStatus) -> Record {
    record! { "status" => status.as_str() }
}

/// Guards, updates and applies follow-ups for one sale.
pub async fn set_sale_status(
    db: &dyn DataSource,
    sale_id: &str,
    target: SaleStatus,
) -> Result<(), StatusChangeError> {
    let items = match target {
        SaleStatus::Complete => {
            let items = line_items_for(db, sale_id)
                .await
                .map_err(StatusChangeError::LineItemsUnavailable)?;
            if items.is_empty() {
                return Err(StatusChangeError::NoLineItems);
            }
            Some(items)
        }
        SaleStatus::Cancelled => {
            let payments = payments_for(db, sale_id)
                .await
                .map_err(StatusChangeError::PaymentsUnavailable)?;
            if !payments.is_empty() {
                return Err(StatusChangeError::HasPayments);
            }
            None
        }
        SaleStatus::Ongoing => None,
    };

    let sale = db
        .update(collections::REVENUE, sale_id, status_patch(target))
        .await
        .map_err(StatusChangeError::UpdateFailed)?;
    tracing::info!(sale_id, status = target.as_str(), "sale status updated");

    apply_follow_ups(db, &sale, target, items).await;
    Ok(())
}

/// Rejects the whole batch when any selected sale fails the guard, then
/// updates sale by sale, skipping the ones that fail.
pub async fn bulk_set_sale_status(
    db: &dyn DataSource,
    sale_ids: &[&str],
    target: SaleStatus,
) -> Result<BulkOutcome, StatusChangeError> {
    let total = sale_ids.len();
    match target {
        SaleStatus::Cancelled => {
            let payments = db
                .list_simple(collections::REVENUE_PAYMENT)
                .await
                .map_err(StatusChangeError::PaymentsUnavailable)?;
            let paid: HashSet<&str> = payments.iter().map(|p| p.str_field("revenue_id")).collect();
            let offending = sale_ids.iter().filter(|id| paid.contains(**id)).count();
            if offending > 0 {
                return Err(StatusChangeError::BulkHasPayments { offending, total });
            }
        }
        SaleStatus::Complete => {
            let items = db
                .list_simple(collections::REVENUE_LINE_ITEM)
                .await
                .map_err(StatusChangeError::LineItemsUnavailable)?;
            let with_items: HashSet<&str> = items.iter().map(|i| i.str_field("revenue_id")).collect();
            let offending = sale_ids.iter().filter(|id| !with_items.contains(**id)).count();
            if offending > 0 {
                return Err(StatusChangeError::BulkNoLineItems { offending, total });
            }
        }
        SaleStatus::Ongoing => {}
    }

    let mut outcome = BulkOutcome::default();
    for id in sale_ids {
        let sale = match db
            .update(collections::REVENUE, id, status_patch(target))
            .await
        {
            Ok(sale) => sale,
            Err(e) => {
                tracing::warn!(sale_id = %id, "failed to update sale status: {}", e);
                outcome.failed += 1;
                continue;
            }
        };
        outcome.updated += 1;
        apply_follow_ups(db, &sale, target, None).await;
    }

    tracing::info!(
        updated = outcome.updated,
        failed = outcome.failed,
        status = target.as_str(),
        "bulk sale status change finished"
    );
    Ok(outcome)
}

async fn apply_follow_ups(
    db: &dyn DataSource,
    sale: &Record,
    target: SaleStatus,
    items: Option<Vec<Record>>,
) {
    if target == SaleStatus::Ongoing {
        return;
    }

    let items = match items {
        Some(items) => items,
        None => match line_items_for(db, sale.id()).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(sale_id = sale.id(), "failed to load line items: {}", e);
                return;
            }
        },
    };

    match target {
        SaleStatus::Complete => deduct_stock(db, sale, &items).await,
        SaleStatus::Cancelled => release_serials(db, sale, &items).await,
        SaleStatus::Ongoing => {}
    }
}

fn sale_reference(sale: &Record) -> String {
    match sale.str_field("reference_number") {
        "" => sale.id().to_string(),
        reference => reference.to_string(),
    }
}

/// Subtracts each line's quantity from its inventory item and marks serials sold.
///
/// The serial step runs for every line with a serial, whether or not the stock step applied.
pub async fn deduct_stock(db: &dyn DataSource, sale: &Record, items: &[Record]) {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let reference = sale_reference(sale);

    for item in items {
        let inventory_item_id = item.str_field("inventory_item_id");
        let serial_id = item.str_field("inventory_serial_id");

        if !inventory_item_id.is_empty() {
            deduct_line(db, item, inventory_item_id, &today, &reference).await;
        }

        if !serial_id.is_empty() {
            move_serial(
                db,
                sale,
                inventory_item_id,
                serial_id,
                SerialStatus::Sold,
                "Auto: sale completed",
            )
            .await;
        }
    }
}

async fn deduct_line(
    db: &dyn DataSource,
    item: &Record,
    inventory_item_id: &str,
    today: &str,
    reference: &str,
) {
    let inventory = match db.read(collections::INVENTORY_ITEM, inventory_item_id).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(inventory_item_id, "stock deduction skipped: {}", e);
            return;
        }
    };

    let sold = item.num("quantity");
    let remaining = inventory.num("quantity_on_hand") - sold;
    if let Err(e) = db
        .update(
            collections::INVENTORY_ITEM,
            inventory_item_id,
            record! { "quantity_on_hand" => remaining },
        )
        .await
    {
        tracing::warn!(inventory_item_id, "failed to deduct stock: {}", e);
        return;
    }

    let movement = record! {
        "inventory_item_id" => inventory_item_id,
        "transaction_type" => "sold",
        "quantity" => sold,
        "transaction_date" => today,
        "reference" => reference,
        "serial_number" => item.str_field("inventory_serial_id"),
        "notes" => "Auto: sale completed",
        "performed_by" => "system",
    };
    if let Err(e) = db.create(collections::INVENTORY_TRANSACTION, movement).await {
        tracing::warn!(inventory_item_id, "failed to record sale movement: {}", e);
    }

    tracing::debug!(
        inventory_item_id,
        remaining = %format_quantity(remaining),
        "stock deducted"
    );
}

/// Puts every serial referenced by the sale back to `available`.
pub async fn release_serials(db: &dyn DataSource, sale: &Record, items: &[Record]) {
    for item in items {
        let serial_id = item.str_field("inventory_serial_id");
        if serial_id.is_empty() {
            continue;
        }
        move_serial(
            db,
            sale,
            item.str_field("inventory_item_id"),
            serial_id,
            SerialStatus::Available,
            "Auto: sale cancelled",
        )
        .await;
    }
}

async fn move_serial(
    db: &dyn DataSource,
    sale: &Record,
    inventory_item_id: &str,
    serial_id: &str,
    to: SerialStatus,
    notes: &str,
) {
    let from = match db.read(collections::INVENTORY_SERIAL, serial_id).await {
        Ok(serial) => match serial.str_field("status") {
            "" => SerialStatus::Reserved.as_str().to_string(),
            status => status.to_string(),
        },
        Err(e) => {
            tracing::warn!(serial_id, "serial not found: {}", e);
            return;
        }
    };

    let mut patch = record! { "status" => to.as_str() };
    if to == SerialStatus::Sold {
        patch.insert("sold_reference".into(), Value::from(sale_reference(sale)));
    }
    if let Err(e) = db.update(collections::INVENTORY_SERIAL, serial_id, patch).await {
        tracing::warn!(serial_id, "failed to update serial status: {}", e);
        return;
    }

    let history = record! {
        "inventory_serial_id" => serial_id,
        "inventory_item_id" => inventory_item_id,
        "from_status" => from,
        "to_status" => to.as_str(),
        "reference_type" => "revenue",
        "reference_id" => sale.id(),
        "notes" => notes,
        "changed_by" => "",
        "changed_by_role" => "",
    };
    if let Err(e) = db.create(collections::INVENTORY_SERIAL_HISTORY, history).await {
        tracing::warn!(serial_id, "failed to record serial history: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;

    async fn seeded() -> InMemoryDataSource {
        let db = InMemoryDataSource::new();
        db.create(
            collections::REVENUE,
            record! { "id" => "s1", "reference_number" => "INV-1", "status" => "ongoing" },
        )
        .await
        .unwrap();
        db.create(
            collections::INVENTORY_ITEM,
            record! { "id" => "inv1", "name" => "Phone", "quantity_on_hand" => "10" },
        )
        .await
        .unwrap();
        db.create(
            collections::INVENTORY_SERIAL,
            record! { "id" => "ser1", "inventory_item_id" => "inv1", "status" => "reserved" },
        )
        .await
        .unwrap();
        db
    }

    async fn add_line(db: &InMemoryDataSource, sale: &str, qty: &str, serial: &str) {
        db.create(
            collections::REVENUE_LINE_ITEM,
            record! {
                "revenue_id" => sale,
                "inventory_item_id" => "inv1",
                "inventory_serial_id" => serial,
                "quantity" => qty,
                "total" => "100.00",
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_complete_without_items_is_rejected() {
        let db = seeded().await;
        let err = set_sale_status(&db, "s1", SaleStatus::Complete).await.unwrap_err();
        assert!(matches!(err, StatusChangeError::NoLineItems));
        assert_eq!(
            err.to_string(),
            "Cannot complete a sale with no items. Add items first."
        );
        let sale = db.read(collections::REVENUE, "s1").await.unwrap();
        assert_eq!(sale.str_field("status"), "ongoing");
    }

    #[tokio::test]
    async fn test_complete_deducts_stock_and_sells_serial() {
        let db = seeded().await;
        add_line(&db, "s1", "3", "ser1").await;

        set_sale_status(&db, "s1", SaleStatus::Complete).await.unwrap();

        let sale = db.read(collections::REVENUE, "s1").await.unwrap();
        assert_eq!(sale.str_field("status"), "complete");
        let item = db.read(collections::INVENTORY_ITEM, "inv1").await.unwrap();
        assert_eq!(item.num("quantity_on_hand"), 7.0);

        let serial = db.read(collections::INVENTORY_SERIAL, "ser1").await.unwrap();
        assert_eq!(serial.str_field("status"), "sold");
        assert_eq!(serial.str_field("sold_reference"), "INV-1");

        let history = db.list_simple(collections::INVENTORY_SERIAL_HISTORY).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].str_field("from_status"), "reserved");
        assert_eq!(history[0].str_field("to_status"), "sold");
        assert_eq!(history[0].str_field("reference_type"), "revenue");
        assert_eq!(history[0].str_field("reference_id"), "s1");

        let movements = db.list_simple(collections::INVENTORY_TRANSACTION).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].str_field("transaction_type"), "sold");
        assert_eq!(movements[0].num("quantity"), 3.0);
    }

    #[tokio::test]
    async fn test_complete_sells_serial_without_stock_line() {
        let db = seeded().await;
        db.create(
            collections::INVENTORY_SERIAL,
            record! { "id" => "ser2", "status" => "reserved" },
        )
        .await
        .unwrap();
        db.create(
            collections::REVENUE_LINE_ITEM,
            record! { "revenue_id" => "s1", "inventory_serial_id" => "ser1", "quantity" => "1" },
        )
        .await
        .unwrap();
        db.create(
            collections::REVENUE_LINE_ITEM,
            record! {
                "revenue_id" => "s1",
                "inventory_item_id" => "gone",
                "inventory_serial_id" => "ser2",
                "quantity" => "1",
            },
        )
        .await
        .unwrap();

        set_sale_status(&db, "s1", SaleStatus::Complete).await.unwrap();

        for serial_id in ["ser1", "ser2"] {
            let serial = db.read(collections::INVENTORY_SERIAL, serial_id).await.unwrap();
            assert_eq!(serial.str_field("status"), "sold", "serial {}", serial_id);
        }
        let history = db.list_simple(collections::INVENTORY_SERIAL_HISTORY).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|h| h.str_field("to_status") == "sold"));

        // no stock movement without a readable inventory item
        assert!(db.list_simple(collections::INVENTORY_TRANSACTION).await.unwrap().is_empty());
        let item = db.read(collections::INVENTORY_ITEM, "inv1").await.unwrap();
        assert_eq!(item.num("quantity_on_hand"), 10.0);
    }

    #[tokio::test]
    async fn test_cancel_with_payments_is_rejected() {
        let db = seeded().await;
        db.create(
            collections::REVENUE_PAYMENT,
            record! { "revenue_id" => "s1", "amount_paid" => "50" },
        )
        .await
        .unwrap();

        let err = set_sale_status(&db, "s1", SaleStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, StatusChangeError::HasPayments));
        let sale = db.read(collections::REVENUE, "s1").await.unwrap();
        assert_eq!(sale.str_field("status"), "ongoing");
    }

    #[tokio::test]
    async fn test_cancel_releases_serials() {
        let db = seeded().await;
        add_line(&db, "s1", "1", "ser1").await;
        db.update(collections::INVENTORY_SERIAL, "ser1", record! { "status" => "sold" })
            .await
            .unwrap();

        set_sale_status(&db, "s1", SaleStatus::Cancelled).await.unwrap();

        let serial = db.read(collections::INVENTORY_SERIAL, "ser1").await.unwrap();
        assert_eq!(serial.str_field("status"), "available");
        let history = db.list_simple(collections::INVENTORY_SERIAL_HISTORY).await.unwrap();
        assert_eq!(history[0].str_field("from_status"), "sold");
        assert_eq!(history[0].str_field("to_status"), "available");
        assert_eq!(history[0].str_field("notes"), "Auto: sale cancelled");

        // cancelling never touches stock levels
        let item = db.read(collections::INVENTORY_ITEM, "inv1").await.unwrap();
        assert_eq!(item.num("quantity_on_hand"), 10.0);
    }

    #[tokio::test]
    async fn test_missing_sale_fails_update() {
        let db = seeded().await;
        let err = set_sale_status(&db, "nope", SaleStatus::Ongoing).await.unwrap_err();
        assert!(matches!(err, StatusChangeError::UpdateFailed(_)));
    }

    #[tokio::test]
    async fn test_bulk_complete_counts_empty_sales() {
        let db = seeded().await;
        db.create(collections::REVENUE, record! { "id" => "s2", "status" => "ongoing" })
            .await
            .unwrap();
        db.create(collections::REVENUE, record! { "id" => "s3", "status" => "ongoing" })
            .await
            .unwrap();
        add_line(&db, "s1", "1", "").await;

        let err = bulk_set_sale_status(&db, &["s1", "s2", "s3"], SaleStatus::Complete)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "2 of 3 selected sales have no items. Add items first."
        );
    }

    #[tokio::test]
    async fn test_bulk_cancel_continues_past_missing_sales() {
        let db = seeded().await;
        let outcome = bulk_set_sale_status(&db, &["s1", "ghost"], SaleStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(outcome, BulkOutcome { updated: 1, failed: 1 });
        let sale = db.read(collections::REVENUE, "s1").await.unwrap();
        assert_eq!(sale.str_field("status"), "cancelled");
    }
}
