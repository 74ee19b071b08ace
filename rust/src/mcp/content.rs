//! Tool result envelopes and the extraction rules applied to them.
//!
//! A `tools/call` result is an ordered list of heterogeneous content parts.
//! The JSON body is the first inline-text part or `application/json` resource;
//! the widget is the first `text/html` resource. Parts of any other kind are
//! carried through as `ContentPart::Other` and ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorKind, SecureLendError};

pub const JSON_MIME: &str = "application/json";
pub const HTML_MIME: &str = "text/html";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text { text: String },
    Resource { resource: EmbeddedResource },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn resource(mime_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Resource {
            resource: EmbeddedResource {
                uri: None,
                mime_type: Some(mime_type.into()),
                text: Some(text.into()),
            },
        }
    }

    fn json_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Resource { resource } if resource.has_mime(JSON_MIME) => {
                Some(resource.text.as_deref().unwrap_or_default())
            }
            _ => None,
        }
    }
}

impl EmbeddedResource {
    fn has_mime(&self, expected: &str) -> bool {
        self.mime_type
            .as_deref()
            .and_then(|mime| mime.split(';').next())
            .map(|essence| essence.trim().eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }
}

impl ToolResult {
    pub fn new(content: Vec<ContentPart>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Decode the first JSON-bearing part into `T`.
    ///
    /// Only the first candidate is tried; a later part is never used as a fallback.
    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<T, SecureLendError> {
        let text = self
            .content
            .iter()
            .find_map(ContentPart::json_text)
            .ok_or_else(|| {
                self.envelope_error("Invalid response from MCP server: missing JSON content")
            })?;

        serde_json::from_str(text).map_err(|err| {
            self.envelope_error(format!(
                "Invalid response from MCP server: failed to parse JSON content ({err})"
            ))
        })
    }

    pub fn widget(&self) -> Option<String> {
        self.content.iter().find_map(|part| match part {
            ContentPart::Resource { resource } if resource.has_mime(HTML_MIME) => {
                Some(resource.text.clone())
            }
            _ => None,
        })?
    }

    /// First inline text, used as the message when the tool flags its own failure.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn envelope_error(&self, message: impl Into<String>) -> SecureLendError {
        SecureLendError::new(ErrorKind::Mcp, message).with_details(self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_from(value: Value) -> ToolResult {
        serde_json::from_value(value).expect("valid tool result")
    }

    #[test]
    fn inline_text_json_is_decoded_without_widget() {
        let result = result_from(json!({
            "content": [{"type": "text", "text": "{\"offers\":[]}"}]
        }));

        let body: Value = result.parse_json().expect("json body");
        assert_eq!(body, json!({"offers": []}));
        assert_eq!(result.widget(), None);
    }

    #[test]
    fn json_resource_and_html_widget_are_both_extracted() {
        let result = result_from(json!({
            "content": [
                {"type": "image", "data": "AAAA", "mimeType": "image/png"},
                {"type": "resource", "resource": {"mimeType": "text/html", "text": "<h1>Test Widget</h1>"}},
                {"type": "resource", "resource": {"uri": "data://offers", "mimeType": "application/json", "text": "{\"cards\":[]}"}}
            ]
        }));

        let body: Value = result.parse_json().expect("json body");
        assert_eq!(body, json!({"cards": []}));
        assert_eq!(result.widget().as_deref(), Some("<h1>Test Widget</h1>"));
    }

    #[test]
    fn first_json_part_wins() {
        let result = ToolResult::new(vec![
            ContentPart::text("{\"rank\":1}"),
            ContentPart::resource(JSON_MIME, "{\"rank\":2}"),
        ]);

        let body: Value = result.parse_json().expect("json body");
        assert_eq!(body["rank"], json!(1));
    }

    #[test]
    fn mime_parameters_and_case_are_ignored() {
        let result = ToolResult::new(vec![
            ContentPart::resource("Text/HTML; charset=utf-8", "<p>hi</p>"),
            ContentPart::resource("application/json; charset=utf-8", "{\"ok\":true}"),
        ]);

        let body: Value = result.parse_json().expect("json body");
        assert_eq!(body, json!({"ok": true}));
        assert_eq!(result.widget().as_deref(), Some("<p>hi</p>"));
    }

    #[test]
    fn missing_json_part_is_mcp_error_with_raw_result() {
        let result = ToolResult::new(vec![ContentPart::resource(HTML_MIME, "<p>only html</p>")]);

        let err = result.parse_json::<Value>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Mcp);
        assert_eq!(err.details(), Some(&result.to_value()));
    }

    #[test]
    fn unparseable_first_part_is_not_skipped() {
        let result = ToolResult::new(vec![
            ContentPart::text("Here are your offers"),
            ContentPart::resource(JSON_MIME, "{\"offers\":[]}"),
        ]);

        let err = result.parse_json::<Value>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Mcp);
    }

    #[test]
    fn empty_content_has_no_widget_and_no_body() {
        let result = result_from(json!({}));
        assert!(result.content.is_empty());
        assert_eq!(result.widget(), None);
        assert_eq!(
            result.parse_json::<Value>().unwrap_err().kind(),
            ErrorKind::Mcp
        );
    }

    #[test]
    fn html_resource_without_text_yields_no_widget() {
        let result = result_from(json!({
            "content": [{"type": "resource", "resource": {"mimeType": "text/html", "blob": "PGgxPg=="}}]
        }));
        assert_eq!(result.widget(), None);
    }
}
