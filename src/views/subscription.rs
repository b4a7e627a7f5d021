use super::simple_list::{active_variant, ListColumn, SimpleList};
use crate::domain::model::collections;
use crate::view::{ViewContext, ViewDeps, ViewResult};

pub const SUBSCRIPTIONS_TABLE: &str = "subscriptions-table";

fn heading(status: &str) -> &'static str {
    match status {
        "active" => "Active Subscriptions",
        "inactive" => "Inactive Subscriptions",
        _ => "Subscriptions",
    }
}

fn caption(status: &str) -> &'static str {
    match status {
        "active" => "Manage your active subscriptions",
        "inactive" => "View cancelled or expired subscriptions",
        _ => "Subscription management",
    }
}

const SUBSCRIPTIONS: SimpleList = SimpleList {
    collection: collections::SUBSCRIPTION,
    table_id: SUBSCRIPTIONS_TABLE,
    template: "subscription-list",
    content_template: "subscription-list-content",
    nav: "subscriptions",
    icon: "icon-refresh-cw",
    plural: "subscriptions",
    default_status: "active",
    columns: &[
        ListColumn::text("customer", "Customer"),
        ListColumn::text("plan", "Plan"),
        ListColumn::sized("start_date", "Start Date", "150px"),
    ],
    heading,
    caption,
    status_variant: active_variant,
};

/// `/app/subscriptions/list/:status`
pub async fn list(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    SUBSCRIPTIONS.render(deps, ctx).await
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
    async fn test_subscription_list_defaults_to_active() {
        let db = InMemoryDataSource::new();
        db.create(collections::SUBSCRIPTION, record! { "id" => "s1", "customer" => "Ana", "plan" => "Basic" })
            .await
            .unwrap();
        let deps = ViewDeps::new(Arc::new(db), Arc::new(Labels::default()), ViewSettings::default());
        let result = list(&deps, &ViewContext::get("/app/subscriptions/list/active")).await;
        let data = result.data().unwrap();
        assert_eq!(data["title"], "Active Subscriptions");
        assert_eq!(data["headerIcon"], "icon-refresh-cw");
        assert_eq!(data["table"]["rows"][0]["cells"][3]["value"], "active");
    }
}
