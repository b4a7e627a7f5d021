use crate::view::labels::CommonLabels;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Flat label set consumed by the table template.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLabels {
    pub search: String,
    pub search_placeholder: String,
    pub filters: String,
    pub filter_conditions: String,
    pub clear_all: String,
    pub add_condition: String,
    pub clear: String,
    pub apply_filters: String,
    pub sort: String,
    pub columns: String,
    pub export: String,
    pub density_default: String,
    pub density_comfortable: String,
    pub density_compact: String,
    pub show: String,
    pub entries: String,
    pub showing: String,
    pub to: String,
    pub of: String,
    pub entries_label: String,
    pub select_all: String,
    pub actions: String,
    pub prev: String,
    pub next: String,
}

pub fn map_table_labels(common: &CommonLabels) -> TableLabels {
    let table = &common.table;
    TableLabels {
        search: table.search.clone(),
        search_placeholder: table.search_placeholder.clone(),
        filters: table.filters.clone(),
        filter_conditions: table.filter_conditions.clone(),
        clear_all: table.clear_all.clone(),
        add_condition: table.add_condition.clone(),
        clear: table.clear.clone(),
        apply_filters: table.apply_filters.clone(),
        sort: table.sort.clone(),
        columns: table.columns.clone(),
        export: table.export.clone(),
        density_default: common.density.default.clone(),
        density_comfortable: common.density.comfortable.clone(),
        density_compact: common.density.compact.clone(),
        show: table.show.clone(),
        entries: table.entries.clone(),
        showing: table.showing.clone(),
        to: table.to.clone(),
        of: table.of.clone(),
        entries_label: table.entries_label.clone(),
        select_all: table.select_all.clone(),
        actions: table.actions.clone(),
        prev: common.pagination.prev.clone(),
        next: common.pagination.next.clone(),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkActionsConfig {
    pub enabled: bool,
    pub select_all_label: String,
    pub selected_label: String,
    pub cancel_label: String,
    pub actions: Vec<BulkAction>,
    pub status_field: String,
}

pub fn map_bulk_config(common: &CommonLabels) -> BulkActionsConfig {
    BulkActionsConfig {
        enabled: true,
        select_all_label: common.bulk.select_all.clone(),
        selected_label: common.bulk.selected.clone(),
        cancel_label: common.bulk.clear_selection.clone(),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAction {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub variant: String,
    pub endpoint: String,
    pub confirm_title: String,
    pub confirm_message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_params: BTreeMap<String, String>,
}

impl BulkAction {
    pub fn delete(label: &str, endpoint: &str, noun: &str) -> Self {
        Self {
            key: "delete".into(),
            label: label.into(),
            icon: "icon-trash-2".into(),
            variant: "danger".into(),
            endpoint: endpoint.into(),
            confirm_title: label.into(),
            confirm_message: format!("Are you sure you want to delete {{{{count}}}} {}?", noun),
            ..Default::default()
        }
    }

    /// Bulk status change posting `target_status`.
    pub fn set_status(key: &str, label: &str, endpoint: &str, target: &str) -> Self {
        let mut extra_params = BTreeMap::new();
        extra_params.insert("target_status".to_string(), target.to_string());
        Self {
            key: key.into(),
            label: label.into(),
            icon: if target == "inactive" || target == "cancelled" {
                "icon-x-circle".into()
            } else {
                "icon-check-circle".into()
            },
            variant: "default".into(),
            endpoint: endpoint.into(),
            confirm_title: label.into(),
            confirm_message: format!("{} {{{{count}}}} selected item(s)?", label),
            extra_params,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub width: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub align: String,
}

impl TableColumn {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            ..Default::default()
        }
    }

    pub fn width(mut self, width: &str) -> Self {
        self.width = width.into();
        self
    }

    pub fn right(mut self) -> Self {
        self.align = "right".into();
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub variant: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub width: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub align: String,
}

impl TableCell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: "text".into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn badge(value: impl Into<String>, variant: &str) -> Self {
        Self {
            kind: "badge".into(),
            value: value.into(),
            variant: variant.into(),
            ..Default::default()
        }
    }

    pub fn date(value: impl Into<String>) -> Self {
        Self {
            kind: "date".into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub href: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drawer_title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub item_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub confirm_title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub confirm_message: String,
}

impl TableAction {
    pub fn view(label: &str, href: String) -> Self {
        Self {
            kind: "view".into(),
            label: label.into(),
            action: "view".into(),
            href,
            ..Default::default()
        }
    }

    pub fn edit(label: &str, url: String, drawer_title: &str) -> Self {
        Self {
            kind: "edit".into(),
            label: label.into(),
            action: "edit".into(),
            url,
            drawer_title: drawer_title.into(),
            ..Default::default()
        }
    }

    pub fn delete(label: &str, url: String, item_name: &str) -> Self {
        Self {
            kind: "delete".into(),
            label: label.into(),
            action: "delete".into(),
            url,
            item_name: item_name.into(),
            ..Default::default()
        }
    }

    /// Posts to `url` after a confirmation prompt.
    pub fn post(kind: &str, label: &str, url: String, confirm_message: String) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            action: kind.into(),
            url,
            confirm_title: label.into(),
            confirm_message,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub href: String,
    pub cells: Vec<TableCell>,
    pub data_attrs: BTreeMap<String, String>,
    pub actions: Vec<TableAction>,
}

impl TableRow {
    pub fn new(id: impl Into<String>, cells: Vec<TableCell>) -> Self {
        Self {
            id: id.into(),
            cells,
            ..Default::default()
        }
    }

    pub fn href(mut self, href: String) -> Self {
        self.href = href;
        self
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data_attrs.insert(key.into(), value.into());
        self
    }

    pub fn actions(mut self, actions: Vec<TableAction>) -> Self {
        self.actions = actions;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEmptyState {
    pub title: String,
    pub message: String,
}

impl TableEmptyState {
    pub fn new(title: &str, message: &str) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryAction {
    pub label: String,
    pub action_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
}

impl PrimaryAction {
    pub fn new(label: &str, action_url: &str) -> Self {
        Self {
            label: label.into(),
            action_url: action_url.into(),
            icon: "icon-plus".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub refresh_url: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    pub show_search: bool,
    pub show_actions: bool,
    pub show_filters: bool,
    pub show_sort: bool,
    pub show_columns: bool,
    pub show_export: bool,
    pub show_density: bool,
    pub show_entries: bool,
    pub page_size: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_sort_column: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_sort_direction: String,
    pub labels: TableLabels,
    pub empty_state: TableEmptyState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_action: Option<PrimaryAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_actions: Option<BulkActionsConfig>,
}

impl TableConfig {
    /// Full-featured list table: search, filters, sort, export and density controls on.
    pub fn list(id: &str, columns: Vec<TableColumn>, rows: Vec<TableRow>, labels: TableLabels) -> Self {
        Self {
            id: id.into(),
            columns,
            rows,
            show_search: true,
            show_actions: true,
            show_filters: true,
            show_sort: true,
            show_columns: true,
            show_export: true,
            show_density: true,
            show_entries: true,
            labels,
            ..Default::default()
        }
    }

    /// Compact table used inside detail tabs.
    pub fn embedded(id: &str, columns: Vec<TableColumn>, rows: Vec<TableRow>, labels: TableLabels) -> Self {
        Self {
            id: id.into(),
            columns,
            rows,
            show_actions: true,
            labels,
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, column: &str, direction: &str) -> Self {
        self.default_sort_column = column.into();
        self.default_sort_direction = direction.into();
        self
    }

    pub fn refresh_url(mut self, url: String) -> Self {
        self.refresh_url = url;
        self
    }

    pub fn empty(mut self, title: &str, message: &str) -> Self {
        self.empty_state = TableEmptyState::new(title, message);
        self
    }

    pub fn primary(mut self, action: PrimaryAction) -> Self {
        self.primary_action = Some(action);
        self
    }

    pub fn bulk(mut self, bulk: BulkActionsConfig) -> Self {
        self.bulk_actions = Some(bulk);
        self
    }

    /// Applies column styles and table settings; call once the rows are in.
    pub fn finish(mut self) -> Self {
        apply_column_styles(&self.columns, &mut self.rows);
        apply_table_settings(&mut self);
        self
    }
}

/// Copies column width and alignment onto the matching cells.
pub fn apply_column_styles(columns: &[TableColumn], rows: &mut [TableRow]) {
    for row in rows.iter_mut() {
        for (cell, column) in row.cells.iter_mut().zip(columns) {
            if cell.width.is_empty() {
                cell.width = column.width.clone();
            }
            if cell.align.is_empty() {
                cell.align = column.align.clone();
            }
        }
    }
}

/// Fills in the page size and applies the default sort against `data_attrs`.
pub fn apply_table_settings(config: &mut TableConfig) {
    if config.page_size == 0 {
        config.page_size = DEFAULT_PAGE_SIZE;
    }
    if config.default_sort_column.is_empty() {
        return;
    }

    let key = config.default_sort_column.clone();
    let descending = config.default_sort_direction.eq_ignore_ascii_case("desc");
    config.rows.sort_by(|a, b| {
        let left = a.data_attrs.get(&key).map(String::as_str).unwrap_or("");
        let right = b.data_attrs.get(&key).map(String::as_str).unwrap_or("");
        let ord = compare_sort_values(left, right);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

fn compare_sort_values(left: &str, right: &str) -> Ordering {
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => left.to_lowercase().cmp(&right.to_lowercase()),
    }
}
