//! Turning push payloads into displayed notifications.

use serde::Serialize;
use serde_json::{Map, Value};

/// Fixed presentation defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDefaults {
    pub title: String,
    /// Used for both icon and badge.
    pub icon: String,
    /// Target of a click whose notification data carries no `url`.
    pub click_url: String,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            title: "Diego Y Danna".to_string(),
            icon: "/portada.jpeg".to_string(),
            click_url: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub data: Value,
    pub renotify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub options: NotificationOptions,
}

impl Notification {
    /// Build the notification for a push message body.
    ///
    /// JSON payloads supply `title`, `body`, `data` and `tag`. Anything that
    /// is not JSON is shown verbatim as the body under the default title.
    pub fn from_push(data: Option<&[u8]>, defaults: &NotificationDefaults) -> Self {
        let payload = match data {
            None => Map::new(),
            Some(bytes) => match serde_json::from_slice::<Value>(bytes) {
                Ok(Value::Object(map)) => map,
                Ok(_) => Map::new(),
                Err(_) => {
                    let mut map = Map::new();
                    map.insert(
                        "body".to_string(),
                        Value::String(String::from_utf8_lossy(bytes).into_owned()),
                    );
                    map
                }
            },
        };

        let title = truthy_text(payload.get("title")).unwrap_or_else(|| defaults.title.clone());
        let body = truthy_text(payload.get("body")).unwrap_or_default();
        let data = payload
            .get("data")
            .filter(|v| is_truthy(v))
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let tag = truthy_text(payload.get("tag"));

        Notification {
            title,
            options: NotificationOptions {
                body,
                icon: defaults.icon.clone(),
                badge: defaults.icon.clone(),
                data,
                renotify: false,
                tag,
            },
        }
    }

    /// URL a click on this notification should lead to.
    pub fn click_target(&self, defaults: &NotificationDefaults) -> String {
        truthy_text(self.options.data.get("url")).unwrap_or_else(|| defaults.click_url.clone())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value.filter(|v| is_truthy(v))? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> NotificationDefaults {
        NotificationDefaults::default()
    }

    #[test]
    fn test_json_payload() {
        let bytes = br#"{"title":"Hola","body":"amor","data":{"url":"/fotos"},"tag":"daily"}"#;
        let n = Notification::from_push(Some(bytes), &defaults());
        assert_eq!(n.title, "Hola");
        assert_eq!(n.options.body, "amor");
        assert_eq!(n.options.data, json!({"url": "/fotos"}));
        assert_eq!(n.options.tag.as_deref(), Some("daily"));
        assert_eq!(n.options.icon, "/portada.jpeg");
        assert_eq!(n.options.badge, "/portada.jpeg");
        assert!(!n.options.renotify);
    }

    #[test]
    fn test_plain_text_payload() {
        let n = Notification::from_push(Some(b"just text"), &defaults());
        assert_eq!(n.title, "Diego Y Danna");
        assert_eq!(n.options.body, "just text");
        assert_eq!(n.options.data, json!({}));
        assert_eq!(n.options.tag, None);
    }

    #[test]
    fn test_missing_payload_and_empty_title() {
        let n = Notification::from_push(None, &defaults());
        assert_eq!(n.title, "Diego Y Danna");
        assert_eq!(n.options.body, "");

        let n = Notification::from_push(Some(br#"{"title":"","body":"x"}"#), &defaults());
        assert_eq!(n.title, "Diego Y Danna");
        assert_eq!(n.options.body, "x");
    }

    #[test]
    fn test_click_target() {
        let n = Notification::from_push(Some(br#"{"data":{"url":"/carta"}}"#), &defaults());
        assert_eq!(n.click_target(&defaults()), "/carta");

        let n = Notification::from_push(Some(br#"{"data":{"other":1}}"#), &defaults());
        assert_eq!(n.click_target(&defaults()), "/");
    }
}
