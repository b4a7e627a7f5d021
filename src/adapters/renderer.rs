use crate::domain::ports::TemplateRenderer;
use crate::utils::error::{BackofficeError, Result};
use serde_json::Value;

/// Development renderer: emits the template name and the pretty-printed view model.
///
/// Production deployments plug a real template engine in through `TemplateRenderer`.
#[derive(Debug, Clone, Default)]
pub struct DebugRenderer;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

impl TemplateRenderer for DebugRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String> {
        if template.trim().is_empty() {
            return Err(BackofficeError::TemplateError {
                message: "template name is empty".to_string(),
            });
        }
        let title = data
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(template);
        let body = serde_json::to_string_pretty(data)?;

        Ok(format!(
            "<!doctype html>\n<html>\n<head><title>{}</title></head>\n<body data-template=\"{}\">\n<pre>{}</pre>\n</body>\n</html>\n",
            escape_html(title),
            escape_html(template),
            escape_html(&body),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_escapes_view_model() {
        let html = DebugRenderer
            .render("sales-list", &json!({"title": "Sales <ongoing>", "n": 1}))
            .unwrap();
        assert!(html.contains("data-template=\"sales-list\""));
        assert!(html.contains("<title>Sales &lt;ongoing&gt;</title>"));
        assert!(html.contains("&quot;n&quot;: 1"));
    }

    #[test]
    fn test_render_rejects_empty_template() {
        assert!(DebugRenderer.render(" ", &json!({})).is_err());
    }
}
