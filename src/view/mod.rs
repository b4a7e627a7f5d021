//! Framework layer shared by every view module: request context, results,
//! HTMX helpers, table and page view models, labels.

pub mod context;
pub mod labels;
pub mod page;
pub mod result;
pub mod table;

pub use context::{FormData, ViewContext};
pub use result::{htmx_error, htmx_redirect, htmx_success, ViewResult};

use crate::domain::ports::DataSource;
use crate::view::labels::{Labels, Locations};
use crate::view::table::{map_bulk_config, map_table_labels, BulkActionsConfig, TableLabels};
use std::sync::Arc;

/// Defaults applied by forms and list pages.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub default_currency: String,
    pub default_location: String,
    pub locations: Locations,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            default_currency: "PHP".to_string(),
            default_location: "ayala-central-bloc".to_string(),
            locations: Locations::default(),
        }
    }
}

/// Dependencies handed to every view handler.
#[derive(Clone)]
pub struct ViewDeps {
    pub db: Arc<dyn DataSource>,
    pub labels: Arc<Labels>,
    pub settings: ViewSettings,
}

impl ViewDeps {
    pub fn new(db: Arc<dyn DataSource>, labels: Arc<Labels>, settings: ViewSettings) -> Self {
        Self {
            db,
            labels,
            settings,
        }
    }

    pub fn table_labels(&self) -> TableLabels {
        map_table_labels(&self.labels.common)
    }

    pub fn bulk_config(&self) -> BulkActionsConfig {
        map_bulk_config(&self.labels.common)
    }

    pub fn location_name<'a>(&'a self, slug: &'a str) -> &'a str {
        self.settings.locations.display_name(slug)
    }
}

impl std::fmt::Debug for ViewDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewDeps")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
