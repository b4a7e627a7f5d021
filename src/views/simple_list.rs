//! Read-only status lists backed by a single collection.

use crate::domain::model::{Record, RecordExt};
use crate::view::page::PageMeta;
use crate::view::table::{TableCell, TableColumn, TableConfig, TableRow};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use serde::Serialize;

pub struct ListColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub width: Option<&'static str>,
    /// Renders the cell as a badge with this variant mapping.
    pub badge: Option<fn(&str) -> &'static str>,
}

impl ListColumn {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self { key, label, width: None, badge: None }
    }

    pub const fn sized(key: &'static str, label: &'static str, width: &'static str) -> Self {
        Self { key, label, width: Some(width), badge: None }
    }

    pub const fn badge(key: &'static str, label: &'static str, width: &'static str, variant: fn(&str) -> &'static str) -> Self {
        Self { key, label, width: Some(width), badge: Some(variant) }
    }
}

/// Everything that differs between one read-only list page and the next.
pub struct SimpleList {
    pub collection: &'static str,
    pub table_id: &'static str,
    pub template: &'static str,
    pub content_template: &'static str,
    pub nav: &'static str,
    pub icon: &'static str,
    pub plural: &'static str,
    pub default_status: &'static str,
    pub columns: &'static [ListColumn],
    pub heading: fn(&str) -> &'static str,
    pub caption: fn(&str) -> &'static str,
    pub status_variant: fn(&str) -> &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleListPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub status: String,
    pub table: TableConfig,
}

impl SimpleList {
    pub async fn render(&self, deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
        let status = match ctx.param("status") {
            "" => self.default_status,
            status => status,
        };

        let records = match deps.db.list_simple(self.collection).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Failed to list {}: {}", self.plural, e);
                return ViewResult::error(e);
            }
        };

        let mut columns: Vec<TableColumn> = self
            .columns
            .iter()
            .map(|c| match c.width {
                Some(width) => TableColumn::new(c.key, c.label).width(width),
                None => TableColumn::new(c.key, c.label),
            })
            .collect();
        columns.push(TableColumn::new("status", "Status").width("120px"));

        let mut table = TableConfig::list(self.table_id, columns, self.build_rows(&records, status), deps.table_labels())
            .empty(
                &format!("No {} found", self.plural),
                &format!("No {} {} to display.", status, self.plural),
            );
        table.show_actions = false;
        table.show_filters = false;
        table.show_export = false;

        let heading = (self.heading)(status);
        let page = SimpleListPage {
            meta: PageMeta::new(ctx, &deps.labels.common, heading)
                .nav(self.nav, status)
                .header((self.caption)(status), self.icon),
            content_template: self.content_template,
            status: status.to_string(),
            table: table.finish(),
        };
        ViewResult::ok(self.template, &page)
    }

    /// Records without a status are listed under the requested one.
    fn build_rows(&self, records: &[Record], status: &str) -> Vec<TableRow> {
        records
            .iter()
            .filter(|r| {
                let stored = r.str_field("status");
                stored.is_empty() || stored == status
            })
            .map(|r| {
                let record_status = match r.str_field("status") {
                    "" => status,
                    s => s,
                };
                let mut cells: Vec<TableCell> = self
                    .columns
                    .iter()
                    .map(|c| {
                        let value = r.text(c.key);
                        match c.badge {
                            Some(variant) => {
                                let v = variant(&value);
                                TableCell::badge(value, v)
                            }
                            None => TableCell::text(value),
                        }
                    })
                    .collect();
                cells.push(TableCell::badge(record_status, (self.status_variant)(record_status)));

                let row = TableRow::new(r.id(), cells);
                self.columns
                    .iter()
                    .fold(row, |row, c| row.attr(c.key, r.text(c.key)))
                    .attr("status", record_status)
            })
            .collect()
    }
}

/// Shared by plans and subscriptions.
pub fn active_variant(status: &str) -> &'static str {
    match status {
        "active" => "success",
        "inactive" => "warning",
        _ => "default",
    }
}
