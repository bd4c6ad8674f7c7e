//! Spider entity

use crate::entity::Entity;
use crate::kind::{private, EntityKind, RelationKind};
use serde_json::{json, Map, Value};

/// Spider configuration as edited in the UI
pub type Spider = Entity<SpiderKind>;

/// Kind marker for [`Spider`]
#[derive(Debug, Clone, Copy)]
pub struct SpiderKind;

impl private::Sealed for SpiderKind {}

impl EntityKind for SpiderKind {
    const TYPE_ID: &'static str = "spider";

    const SERIALIZED_PROPERTIES: &'static [&'static str] = &[
        "start_urls",
        "links_to_follow",
        "follow_patterns",
        "js_enabled",
        "js_enable_patterns",
        "js_disable_patterns",
        "exclude_patterns",
        "respect_nofollow",
        "init_requests",
        "template_names",
        "page_actions",
        "country_code",
        "currency_code",
        "english_url",
        "arabic_url",
        "english_url_args",
        "arabic_url_args",
        "cookies_enabled",
        "english_cookie_name",
        "english_cookie_value",
        "arabic_cookie_name",
        "arabic_cookie_value",
        "use_cookies",
    ];

    const SERIALIZED_RELATIONS: &'static [(&'static str, RelationKind)] =
        &[("templates", RelationKind::Reference)];

    // Element order is meaningful in all of these: pattern precedence,
    // action execution order.
    const ARRAY_PROPERTIES: &'static [&'static str] = &[
        "start_urls",
        "follow_patterns",
        "exclude_patterns",
        "js_enable_patterns",
        "js_disable_patterns",
        "allowed_domains",
        "templates",
        "template_names",
        "page_actions",
        "init_requests",
    ];

    const TRANSIENT_KEYS: &'static [(&'static str, &'static [&'static str])] =
        &[("page_actions", &["target", "_edited"])];

    fn defaults() -> Map<String, Value> {
        [
            ("links_to_follow", json!("patterns")),
            ("js_enabled", json!(false)),
            ("respect_nofollow", json!(true)),
            ("country_code", Value::Null),
            ("currency_code", Value::Null),
            ("english_url", Value::Null),
            ("english_url_args", Value::Null),
            ("arabic_url", Value::Null),
            ("arabic_url_args", Value::Null),
            ("cookies_enabled", json!(false)),
            ("english_cookie_name", Value::Null),
            ("english_cookie_value", Value::Null),
            ("arabic_cookie_name", Value::Null),
            ("arabic_cookie_value", Value::Null),
            ("use_cookies", json!(false)),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
    }
}

impl Entity<SpiderKind> {
    /// Display name; may differ from the id while a rename is pending
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set("name", name.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_list_field_starts_empty() {
        let spider = Spider::new();
        for field in SpiderKind::ARRAY_PROPERTIES {
            assert_eq!(spider.get_list(field).map(<[Value]>::len), Some(0), "{field}");
        }
    }

    #[test]
    fn scalar_defaults() {
        let spider = Spider::new();
        assert_eq!(spider.get_str("links_to_follow"), Some("patterns"));
        assert_eq!(spider.get_bool("respect_nofollow"), Some(true));
        assert_eq!(spider.get_bool("use_cookies"), Some(false));
        assert_eq!(spider.get("country_code"), Some(&Value::Null));
    }

    #[test]
    fn properties_are_unique() {
        let mut props = SpiderKind::SERIALIZED_PROPERTIES.to_vec();
        props.sort_unstable();
        props.dedup();
        assert_eq!(props.len(), SpiderKind::SERIALIZED_PROPERTIES.len());
    }

    #[test]
    fn name_round_trip() {
        let mut spider = Spider::new().with_id("s1");
        assert_eq!(spider.name(), None);
        spider.set_name("s1-renamed");
        assert_eq!(spider.name(), Some("s1-renamed"));
        assert_eq!(spider.id(), Some("s1"));
    }
}
