use crate::domain::model::{collections, DepreciationMethod, Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::record;
use crate::routes;
use crate::view::labels::InventoryDepreciationLabels;
use crate::view::page::{FormPage, SelectOption};
use crate::view::{htmx_error, htmx_redirect, ViewContext, ViewDeps, ViewResult};
use serde::Serialize;

/// Depreciation policy as shown on the item's depreciation tab.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationInfo {
    pub id: String,
    pub method: String,
    pub cost_basis: String,
    pub salvage_value: String,
    pub useful_life: String,
    pub start_date: String,
    pub accumulated: String,
    pub book_value: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationForm {
    pub id: String,
    pub method: String,
    pub cost_basis: String,
    pub salvage_value: String,
    pub useful_life: String,
    pub start_date: String,
    pub method_options: Vec<SelectOption>,
    pub labels: InventoryDepreciationLabels,
}

pub fn method_label(method: &str, l: &InventoryDepreciationLabels) -> String {
    match method.parse::<DepreciationMethod>() {
        Ok(DepreciationMethod::StraightLine) => l.method_straight_line.clone(),
        Ok(DepreciationMethod::DecliningBalance) => l.method_declining_balance.clone(),
        Ok(DepreciationMethod::SumOfYears) => l.method_sum_of_years.clone(),
        Err(_) => method.to_string(),
    }
}

fn method_options(l: &InventoryDepreciationLabels, current: &str) -> Vec<SelectOption> {
    SelectOption::list(
        DepreciationMethod::ALL
            .iter()
            .map(|m| (m.as_str(), method_label(m.as_str(), l))),
        current,
    )
}

/// First depreciation record of the item, if any.
pub async fn load(
    db: &dyn DataSource,
    item_id: &str,
    l: &InventoryDepreciationLabels,
) -> Option<DepreciationInfo> {
    let records = match db
        .list_where(collections::INVENTORY_DEPRECIATION, "inventory_item_id", item_id)
        .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list inventory_depreciation: {}", e);
            return None;
        }
    };
    records.first().map(|r| DepreciationInfo {
        id: r.id().to_string(),
        method: method_label(r.str_field("method"), l),
        cost_basis: r.text("cost_basis"),
        salvage_value: r.text("salvage_value"),
        useful_life: format!("{} months", r.text("useful_life_months")),
        start_date: r.text("start_date"),
        accumulated: r.text("accumulated_depreciation"),
        book_value: r.text("book_value"),
    })
}

fn depreciation_record(ctx: &ViewContext) -> Record {
    let form = &ctx.form;
    record! {
        "method" => form.get("method"),
        "cost_basis" => form.get("cost_basis"),
        "salvage_value" => form.get("salvage_value"),
        "useful_life_months" => form.get("useful_life_months"),
        "start_date" => form.get("start_date"),
    }
}

pub async fn assign(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let item_id = ctx.param("id");
    let l = &deps.labels.inventory.depreciation;

    if ctx.is_get() {
        let method = DepreciationMethod::StraightLine.as_str();
        let form = DepreciationForm {
            method: method.to_string(),
            method_options: method_options(l, method),
            labels: l.clone(),
            ..Default::default()
        };
        return ViewResult::ok(
            "depreciation-drawer-form",
            &FormPage::add(routes::url(routes::INVENTORY_DEPRECIATION_ASSIGN, &[item_id]), form),
        );
    }

    let mut data = depreciation_record(ctx);
    data.insert("inventory_item_id".into(), item_id.into());
    if let Err(e) = deps.db.create(collections::INVENTORY_DEPRECIATION, data).await {
        tracing::error!("Failed to create depreciation: {}", e);
        return htmx_error("Failed to configure depreciation");
    }
    htmx_redirect(&routes::inventory_detail_tab(item_id, "depreciation"))
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let item_id = ctx.param("id");
    let depreciation_id = ctx.param("did");
    let l = &deps.labels.inventory.depreciation;

    if ctx.is_get() {
        let record = match deps.db.read(collections::INVENTORY_DEPRECIATION, depreciation_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Failed to read depreciation {}: {}", depreciation_id, e);
                return htmx_error("Depreciation record not found");
            }
        };
        let method = record.text("method");
        let form = DepreciationForm {
            id: depreciation_id.to_string(),
            method_options: method_options(l, &method),
            method,
            cost_basis: record.text("cost_basis"),
            salvage_value: record.text("salvage_value"),
            useful_life: record.text("useful_life_months"),
            start_date: record.text("start_date"),
            labels: l.clone(),
        };
        return ViewResult::ok(
            "depreciation-drawer-form",
            &FormPage::edit(
                routes::url(routes::INVENTORY_DEPRECIATION_EDIT, &[item_id, depreciation_id]),
                form,
            ),
        );
    }

    if let Err(e) = deps
        .db
        .update(collections::INVENTORY_DEPRECIATION, depreciation_id, depreciation_record(ctx))
        .await
    {
        tracing::error!("Failed to update depreciation {}: {}", depreciation_id, e);
        return htmx_error("Failed to update depreciation");
    }
    htmx_redirect(&routes::inventory_detail_tab(item_id, "depreciation"))
}
