use crate::view::context::ViewContext;
use crate::view::labels::CommonLabels;
use serde::Serialize;

/// Shell data every full page template expects.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub title: String,
    pub current_path: String,
    pub active_nav: String,
    pub active_sub_nav: String,
    pub header_title: String,
    pub header_subtitle: String,
    pub header_icon: String,
    pub cache_version: String,
    pub common_labels: CommonLabels,
}

impl PageMeta {
    pub fn new(ctx: &ViewContext, common: &CommonLabels, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            header_title: title.clone(),
            title,
            current_path: ctx.current_path.clone(),
            cache_version: ctx.cache_version.clone(),
            common_labels: common.clone(),
            ..Default::default()
        }
    }

    pub fn nav(mut self, active: &str, sub: &str) -> Self {
        self.active_nav = active.into();
        self.active_sub_nav = sub.into();
        self
    }

    pub fn header(mut self, subtitle: impl Into<String>, icon: &str) -> Self {
        self.header_subtitle = subtitle.into();
        self.header_icon = icon.into();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub key: String,
    pub label: String,
    pub href: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub active: bool,
}

impl TabItem {
    pub fn new(key: &str, label: &str, href: String, icon: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            href,
            icon: icon.into(),
            ..Default::default()
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Marks the active tab; an unknown key falls back to the first tab.
pub fn activate_tab(mut tabs: Vec<TabItem>, active: &str) -> (Vec<TabItem>, String) {
    let key = if tabs.iter().any(|t| t.key == active) {
        active.to_string()
    } else {
        tabs.first().map(|t| t.key.clone()).unwrap_or_default()
    };
    for tab in tabs.iter_mut() {
        tab.active = tab.key == key;
    }
    (tabs, key)
}

/// `<select>` option for drawer forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected: false,
        }
    }

    /// Options from `(value, label)` pairs with `current` preselected.
    pub fn list<'a, I>(pairs: I, current: &str) -> Vec<Self>
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        pairs
            .into_iter()
            .map(|(value, label)| Self {
                selected: value == current,
                value: value.to_string(),
                label,
            })
            .collect()
    }
}

/// Label/value pair for read-only info panels.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InfoField {
    pub label: String,
    pub value: String,
}

impl InfoField {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Drawer form envelope: where to post, which labels to show, current values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPage<T: Serialize> {
    pub form_action: String,
    pub is_edit: bool,
    #[serde(flatten)]
    pub fields: T,
}

impl<T: Serialize> FormPage<T> {
    pub fn add(form_action: impl Into<String>, fields: T) -> Self {
        Self {
            form_action: form_action.into(),
            is_edit: false,
            fields,
        }
    }

    pub fn edit(form_action: impl Into<String>, fields: T) -> Self {
        Self {
            form_action: form_action.into(),
            is_edit: true,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_tab_falls_back_to_first() {
        let tabs = vec![
            TabItem::new("info", "Info", "/x?tab=info".into(), "icon-info"),
            TabItem::new("items", "Items", "/x?tab=items".into(), "icon-list").count(3),
        ];
        let (tabs, key) = activate_tab(tabs, "bogus");
        assert_eq!(key, "info");
        assert!(tabs[0].active);
        assert!(!tabs[1].active);

        let (tabs, key) = activate_tab(tabs, "items");
        assert_eq!(key, "items");
        assert!(tabs[1].active);
    }

    #[test]
    fn test_select_option_list() {
        let options = SelectOption::list(
            [("a", "Alpha".to_string()), ("b", "Beta".to_string())],
            "b",
        );
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }

    #[test]
    fn test_form_page_flattens_fields() {
        #[derive(Serialize)]
        struct Fields {
            name: String,
        }
        let page = FormPage::edit("/action/x/edit/1", Fields { name: "Mug".into() });
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["formAction"], "/action/x/edit/1");
        assert_eq!(json["isEdit"], true);
        assert_eq!(json["name"], "Mug");
    }
}
