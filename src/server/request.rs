use super::AppState;
use crate::utils::error::BackofficeError;
use crate::view::result::HX_ERROR_MESSAGE;
use crate::view::{FormData, ViewContext, ViewResult};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use std::collections::HashMap;

/// Decodes path params, query string and form body into a `ViewContext`.
pub async fn build_context(
    state: &AppState,
    params: HashMap<String, String>,
    req: Request,
) -> Result<ViewContext, Response> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query: HashMap<String, String> = req
        .uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let mut ctx = ViewContext::new(method, path, state.translator.clone());
    ctx.path_params = params;
    ctx.query = query;
    ctx.cache_version = state.cache_version.clone();

    if !ctx.is_get() {
        ctx.form = read_form(req, state.max_body_bytes).await.map_err(|e| {
            tracing::warn!("rejected request body: {}", e);
            invalid_form()
        })?;
    }
    Ok(ctx)
}

fn invalid_form() -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, [(HX_ERROR_MESSAGE, "Invalid form data")]).into_response()
}

async fn read_form(req: Request, limit: usize) -> Result<FormData, BackofficeError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| form_error(e.body_text()))?;
        let mut form = FormData::new();
        while let Some(field) = multipart.next_field().await.map_err(|e| form_error(e.body_text()))? {
            let name = field.name().unwrap_or_default().to_string();
            // file parts are not used by any view
            if field.file_name().is_some() {
                continue;
            }
            let value = field.text().await.map_err(|e| form_error(e.body_text()))?;
            form.push(name, value);
        }
        return Ok(form);
    }

    let body = axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| form_error(e.to_string()))?;
    Ok(FormData::parse_urlencoded(&body))
}

fn form_error(message: String) -> BackofficeError {
    BackofficeError::FormError { message }
}

/// Turns a `ViewResult` into an HTTP response.
pub fn respond(state: &AppState, result: ViewResult) -> Response {
    match result {
        ViewResult::Page { template, data } => match state.renderer.render(&template, &data) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(template = %template, "render failed: {}", e);
                render_error(state, &e)
            }
        },
        ViewResult::Headers { status, headers } => {
            let mut response = status.into_response();
            for (name, value) in headers {
                match (HeaderName::try_from(name.as_str()), HeaderValue::from_str(&value)) {
                    (Ok(name), Ok(value)) => {
                        response.headers_mut().insert(name, value);
                    }
                    _ => tracing::warn!("dropping unencodable header {}", name),
                }
            }
            response
        }
        ViewResult::Error(e) => {
            if !e.is_not_found() {
                tracing::error!("page failed: {}", e);
            }
            render_error(state, &e)
        }
    }
}

/// Renders the `error` template; falls back to plain text when that fails too.
fn render_error(state: &AppState, err: &BackofficeError) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let common = &state.deps.labels.common;
    let data = json!({
        "title": common.errors.page_title,
        "message": err.user_friendly_message(),
        "status": status.as_u16(),
        "cacheVersion": state.cache_version,
        "commonLabels": common,
    });
    match state.renderer.render("error", &data) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("error template failed: {}", e);
            (status, err.user_friendly_message()).into_response()
        }
    }
}
