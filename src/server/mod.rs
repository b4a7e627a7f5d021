//! HTTP surface: axum router, request decoding and response rendering.

mod middleware;
mod request;

pub use request::{build_context, respond};

use crate::adapters::{DebugRenderer, InMemoryDataSource};
use crate::config::AppConfig;
use crate::domain::ports::TemplateRenderer;
use crate::routes;
use crate::utils::error::Result;
use crate::view::labels::{Labels, Translator};
use crate::view::ViewDeps;
use crate::views::{inventory, paymentcollection, plan, pricelist, product, sales, subscription};
use axum::extract::{DefaultBodyLimit, Path, Request, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub deps: ViewDeps,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub translator: Arc<Translator>,
    pub cache_version: String,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(deps: ViewDeps, renderer: Arc<dyn TemplateRenderer>) -> Self {
        let translator = Arc::new(Translator::new(&deps.labels));
        Self {
            deps,
            renderer,
            translator,
            cache_version: String::new(),
            max_body_bytes: crate::config::toml_config::DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// In-memory store (seeded when configured), label overrides and the debug renderer.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let db = match &config.store.seed {
            Some(seed) => {
                tracing::info!("🌱 seeding store from {}", seed);
                InMemoryDataSource::from_json_file(seed)?
            }
            None => InMemoryDataSource::new(),
        };
        let labels = match &config.labels.file {
            Some(file) => {
                tracing::info!("🏷️ loading labels from {}", file);
                Labels::from_file(file)?
            }
            None => Labels::default(),
        };

        let deps = ViewDeps::new(Arc::new(db), Arc::new(labels), config.view_settings());
        let mut state = Self::new(deps, Arc::new(DebugRenderer));
        state.cache_version = config.server.cache_version.clone();
        state.max_body_bytes = config.server.max_body_bytes;
        Ok(state)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.deps)
            .field("cache_version", &self.cache_version)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

/// Wraps a view handler as an axum handler.
macro_rules! view {
    ($handler:path) => {
        |State(state): State<AppState>, params: Option<Path<HashMap<String, String>>>, req: Request| async move {
            let params = params.map(|Path(p)| p).unwrap_or_default();
            match build_context(&state, params, req).await {
                Ok(ctx) => respond(&state, $handler(&state.deps, &ctx).await),
                Err(response) => response,
            }
        }
    };
}

/// Drawer actions: GET renders the form, POST submits it.
macro_rules! form {
    ($handler:path) => {
        get(view!($handler)).post(view!($handler))
    };
}

/// Mutations without a form step.
macro_rules! mutate {
    ($handler:path) => {
        axum::routing::post(view!($handler)).delete(view!($handler))
    };
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.max_body_bytes;

    Router::new()
        .route(routes::HEALTHZ, get(healthz))
        // inventory
        .route(routes::INVENTORY_LIST, get(view!(inventory::list::list)))
        .route(routes::INVENTORY_DASHBOARD, get(view!(inventory::dashboard::page)))
        .route(routes::INVENTORY_DASHBOARD_STATS, get(view!(inventory::dashboard::stats)))
        .route(routes::INVENTORY_DASHBOARD_CHART, get(view!(inventory::dashboard::chart)))
        .route(routes::INVENTORY_DASHBOARD_MOVEMENTS, get(view!(inventory::dashboard::movements)))
        .route(routes::INVENTORY_DASHBOARD_ALERTS, get(view!(inventory::dashboard::alerts)))
        .route(routes::INVENTORY_MOVEMENTS, get(view!(inventory::movements::page)))
        .route(routes::INVENTORY_DETAIL, get(view!(inventory::detail::page)))
        .route(routes::INVENTORY_TAB_ACTION, get(view!(inventory::detail::tab)))
        .route(routes::INVENTORY_ADD, form!(inventory::action::add))
        .route(routes::INVENTORY_EDIT, form!(inventory::action::edit))
        .route(routes::INVENTORY_DELETE, mutate!(inventory::action::delete))
        .route(routes::INVENTORY_BULK_DELETE, mutate!(inventory::action::bulk_delete_items))
        .route(routes::INVENTORY_SET_STATUS, mutate!(inventory::action::set_status))
        .route(routes::INVENTORY_BULK_SET_STATUS, mutate!(inventory::action::bulk_set_status))
        .route(routes::INVENTORY_SERIAL_TABLE, get(view!(inventory::serial::table)))
        .route(routes::INVENTORY_SERIAL_ASSIGN, form!(inventory::serial::assign))
        .route(routes::INVENTORY_SERIAL_EDIT, form!(inventory::serial::edit))
        .route(routes::INVENTORY_SERIAL_REMOVE, mutate!(inventory::serial::remove))
        .route(routes::INVENTORY_TRANSACTION_TABLE, get(view!(inventory::transaction::table)))
        .route(routes::INVENTORY_TRANSACTION_ASSIGN, form!(inventory::transaction::assign))
        .route(routes::INVENTORY_DEPRECIATION_ASSIGN, form!(inventory::depreciation::assign))
        .route(routes::INVENTORY_DEPRECIATION_EDIT, form!(inventory::depreciation::edit))
        // sales
        .route(routes::SALES_LIST, get(view!(sales::list::list)))
        .route(routes::SALES_DETAIL, get(view!(sales::detail::page)))
        .route(routes::SALES_ADD, form!(sales::action::add))
        .route(routes::SALES_EDIT, form!(sales::action::edit))
        .route(routes::SALES_DELETE, mutate!(sales::action::delete))
        .route(routes::SALES_BULK_DELETE, mutate!(sales::action::bulk_delete_sales))
        .route(routes::SALES_SET_STATUS, mutate!(sales::action::set_status))
        .route(routes::SALES_BULK_SET_STATUS, mutate!(sales::action::bulk_set_status))
        .route(routes::SALES_ITEMS_TABLE, get(view!(sales::line_items::table)))
        .route(routes::SALES_ITEMS_ADD, form!(sales::line_items::add))
        .route(routes::SALES_ITEMS_EDIT, form!(sales::line_items::edit))
        .route(routes::SALES_ITEMS_REMOVE, mutate!(sales::line_items::remove))
        .route(routes::SALES_ITEMS_DISCOUNT, form!(sales::line_items::add_discount))
        .route(routes::SALES_PAYMENT_TABLE, get(view!(sales::payment::table)))
        .route(routes::SALES_PAYMENT_ADD, form!(sales::payment::add))
        .route(routes::SALES_PAYMENT_EDIT, form!(sales::payment::edit))
        .route(routes::SALES_PAYMENT_REMOVE, mutate!(sales::payment::remove))
        // products
        .route(routes::PRODUCT_LIST, get(view!(product::list::list)))
        .route(routes::PRODUCT_DETAIL, get(view!(product::detail::page)))
        .route(routes::PRODUCT_TAB_ACTION, get(view!(product::detail::tab)))
        .route(routes::PRODUCT_ADD, form!(product::action::add))
        .route(routes::PRODUCT_EDIT, form!(product::action::edit))
        .route(routes::PRODUCT_DELETE, mutate!(product::action::delete))
        .route(routes::PRODUCT_BULK_DELETE, mutate!(product::action::bulk_delete_products))
        .route(routes::PRODUCT_SET_STATUS, mutate!(product::action::set_status))
        .route(routes::PRODUCT_BULK_SET_STATUS, mutate!(product::action::bulk_set_status))
        .route(routes::PRODUCT_VARIANT_TABLE, get(view!(product::variant::table)))
        .route(routes::PRODUCT_VARIANT_ASSIGN, form!(product::variant::assign))
        .route(routes::PRODUCT_VARIANT_EDIT, form!(product::variant::edit))
        .route(routes::PRODUCT_VARIANT_REMOVE, mutate!(product::variant::remove))
        .route(routes::PRODUCT_ATTRIBUTE_TABLE, get(view!(product::attribute::table)))
        .route(routes::PRODUCT_ATTRIBUTE_ASSIGN, form!(product::attribute::assign))
        .route(routes::PRODUCT_ATTRIBUTE_REMOVE, mutate!(product::attribute::remove))
        // price lists
        .route(routes::PRICE_LIST_LIST, get(view!(pricelist::list::list)))
        .route(routes::PRICE_LIST_DETAIL, get(view!(pricelist::detail::page)))
        .route(routes::PRICE_LIST_ADD, form!(pricelist::action::add))
        .route(routes::PRICE_LIST_EDIT, form!(pricelist::action::edit))
        .route(routes::PRICE_LIST_DELETE, mutate!(pricelist::action::delete))
        .route(routes::PRICE_LIST_BULK_DELETE, mutate!(pricelist::action::bulk_delete_price_lists))
        .route(routes::PRICE_PRODUCT_ADD, form!(pricelist::price_product::add))
        .route(routes::PRICE_PRODUCT_DELETE, mutate!(pricelist::price_product::delete))
        // read-only lists
        .route(routes::PAYMENT_COLLECTION_LIST, get(view!(paymentcollection::list)))
        .route(routes::PLAN_LIST, get(view!(plan::list)))
        .route(routes::SUBSCRIPTION_LIST, get(view!(subscription::list)))
        .layer(axum::middleware::from_fn(middleware::trace_requests))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Serves until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 shutting down");
}
