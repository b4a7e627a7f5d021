use super::simple_list::{active_variant, ListColumn, SimpleList};
use crate::domain::model::collections;
use crate::view::{ViewContext, ViewDeps, ViewResult};

pub const PLANS_TABLE: &str = "plans-table";

fn heading(status: &str) -> &'static str {
    match status {
        "active" => "Active Plans",
        "inactive" => "Inactive Plans",
        _ => "Plans",
    }
}

fn caption(status: &str) -> &'static str {
    match status {
        "active" => "Manage your active billing plans",
        "inactive" => "View inactive billing plans",
        _ => "Plan management",
    }
}

fn interval_variant(interval: &str) -> &'static str {
    match interval {
        "monthly" => "info",
        "annual" => "primary",
        _ => "default",
    }
}

const PLANS: SimpleList = SimpleList {
    collection: collections::PLAN,
    table_id: PLANS_TABLE,
    template: "plan-list",
    content_template: "plan-list-content",
    nav: "plans",
    icon: "icon-file-text",
    plural: "plans",
    default_status: "active",
    columns: &[
        ListColumn::text("name", "Name"),
        ListColumn::badge("interval", "Interval", "150px", interval_variant),
        ListColumn::sized("price", "Price", "120px"),
    ],
    heading,
    caption,
    status_variant: active_variant,
};

/// `/app/plans/list/:status`
pub async fn list(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    PLANS.render(deps, ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::domain::ports::DataSource;
    use crate::record;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_plan_list_interval_badges() {
        let db = InMemoryDataSource::new();
        db.create(collections::PLAN, record! { "id" => "b", "name" => "Basic", "interval" => "monthly", "status" => "active" })
            .await
            .unwrap();
        db.create(collections::PLAN, record! { "id" => "p", "name" => "Pro", "interval" => "annual", "status" => "inactive" })
            .await
            .unwrap();
        let deps = ViewDeps::new(Arc::new(db), Arc::new(Labels::default()), ViewSettings::default());

        let result = list(&deps, &ViewContext::get("/x").with_param("status", "inactive")).await;
        assert_eq!(result.template(), Some("plan-list"));
        let data = result.data().unwrap();
        assert_eq!(data["title"], "Inactive Plans");
        let rows = data["table"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["cells"][1]["variant"], "primary");
        assert_eq!(rows[0]["cells"][3]["variant"], "warning");
    }
}
