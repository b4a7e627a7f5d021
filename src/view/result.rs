use crate::utils::error::BackofficeError;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};

pub const HX_TRIGGER: &str = "HX-Trigger";
pub const HX_REDIRECT: &str = "HX-Redirect";
pub const HX_ERROR_MESSAGE: &str = "HX-Error-Message";

/// What a view handler hands back to the router.
#[derive(Debug)]
pub enum ViewResult {
    /// Template name plus view model, rendered into a page or fragment.
    Page { template: String, data: Value },
    /// Header-only HTMX response.
    Headers {
        status: StatusCode,
        headers: Vec<(String, String)>,
    },
    /// Page-level failure.
    Error(BackofficeError),
}

impl ViewResult {
    pub fn ok<T: Serialize>(template: &str, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self::Page {
                template: template.to_string(),
                data,
            },
            Err(e) => Self::Error(e.into()),
        }
    }

    pub fn error(err: impl Into<BackofficeError>) -> Self {
        Self::Error(err.into())
    }

    pub fn template(&self) -> Option<&str> {
        match self {
            Self::Page { template, .. } => Some(template),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Page { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Page { .. } => StatusCode::OK,
            Self::Headers { status, .. } => *status,
            Self::Error(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Error(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            Self::Headers { headers, .. } => headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn is_htmx_error(&self) -> bool {
        self.status() == StatusCode::UNPROCESSABLE_ENTITY
    }
}

/// Closes the drawer form and refreshes `table_id`.
pub fn htmx_success(table_id: &str) -> ViewResult {
    let trigger = json!({ "formSuccess": true, "refreshTable": table_id });
    ViewResult::Headers {
        status: StatusCode::OK,
        headers: vec![(HX_TRIGGER.to_string(), trigger.to_string())],
    }
}

pub fn htmx_error(message: &str) -> ViewResult {
    ViewResult::Headers {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        headers: vec![(HX_ERROR_MESSAGE.to_string(), message.to_string())],
    }
}

pub fn htmx_redirect(url: &str) -> ViewResult {
    let trigger = json!({ "formSuccess": true });
    ViewResult::Headers {
        status: StatusCode::OK,
        headers: vec![
            (HX_TRIGGER.to_string(), trigger.to_string()),
            (HX_REDIRECT.to_string(), url.to_string()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_htmx_success_trigger() {
        let result = htmx_success("sales-table");
        assert_eq!(result.status(), StatusCode::OK);
        let trigger: Value = serde_json::from_str(result.header("hx-trigger").unwrap()).unwrap();
        assert_eq!(trigger["formSuccess"], true);
        assert_eq!(trigger["refreshTable"], "sales-table");
    }

    #[test]
    fn test_htmx_error_is_422() {
        let result = htmx_error("Sale ID is required");
        assert!(result.is_htmx_error());
        assert_eq!(result.header(HX_ERROR_MESSAGE), Some("Sale ID is required"));
    }

    #[test]
    fn test_redirect_and_error_status() {
        let result = htmx_redirect("/app/sales/detail/1");
        assert_eq!(result.header(HX_REDIRECT), Some("/app/sales/detail/1"));
        assert!(result.header(HX_TRIGGER).unwrap().contains("formSuccess"));

        let missing = ViewResult::error(BackofficeError::not_found("revenue", "x"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert!(missing.template().is_none());
    }
}
