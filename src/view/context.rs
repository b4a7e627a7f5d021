use crate::view::labels::{Labels, Translator};
use axum::http::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered multi-valued form fields (urlencoded or multipart text parts).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_urlencoded(body: &[u8]) -> Self {
        Self {
            fields: url::form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// First value for `key`, `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Trimmed number; blank or unparseable input reads as 0.
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).trim().parse::<f64>().unwrap_or(0.0)
    }

    pub fn checkbox(&self, key: &str) -> bool {
        self.get(key) == "true"
    }
}

/// Everything a view handler knows about the request it serves.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub method: Method,
    pub current_path: String,
    pub path_params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub form: FormData,
    pub cache_version: String,
    translator: Arc<Translator>,
}

impl ViewContext {
    pub fn new(method: Method, current_path: impl Into<String>, translator: Arc<Translator>) -> Self {
        Self {
            method,
            current_path: current_path.into(),
            path_params: HashMap::new(),
            query: HashMap::new(),
            form: FormData::new(),
            cache_version: String::new(),
            translator,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path, Arc::new(Translator::new(&Labels::default())))
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path, Arc::new(Translator::new(&Labels::default())))
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_form(mut self, key: &str, value: &str) -> Self {
        self.form.push(key, value);
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }

    pub fn param(&self, key: &str) -> &str {
        self.path_params.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn query_param(&self, key: &str) -> &str {
        self.query.get(key).map(String::as_str).unwrap_or("")
    }

    /// Query string first, form body as fallback.
    pub fn query_or_form(&self, key: &str) -> &str {
        match self.query_param(key) {
            "" => self.form.get(key),
            value => value,
        }
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }
}
