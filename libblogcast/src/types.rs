//! Core types for Blogcast

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{ContentError, Result};

/// Advisory length limits for generated posts (characters)
pub const TITLE_MAX_CHARS: usize = 80;
pub const EXCERPT_MAX_CHARS: usize = 160;

/// Structured blog content ready to publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    pub content_html: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    /// Empty lets the platform generate one
    pub slug: String,
}

impl PostDraft {
    /// Build a draft from a repaired JSON object
    ///
    /// `title`, `excerpt` and `content_html` are required and never defaulted.
    /// `tags`, `categories` and `slug` are expected to be repaired already;
    /// if they still have the wrong shape they are treated as empty.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            title: required_str(object, "title")?,
            excerpt: required_str(object, "excerpt")?,
            content_html: required_str(object, "content_html")?,
            tags: string_list(object.get("tags")),
            categories: string_list(object.get("categories")),
            slug: object
                .get("slug")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// Non-blocking problems with the draft
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let title_len = self.title.chars().count();
        if title_len > TITLE_MAX_CHARS {
            warnings.push(format!(
                "Title is {} characters (recommended maximum {})",
                title_len, TITLE_MAX_CHARS
            ));
        }

        let excerpt_len = self.excerpt.chars().count();
        if excerpt_len > EXCERPT_MAX_CHARS {
            warnings.push(format!(
                "Excerpt is {} characters (recommended maximum {})",
                excerpt_len, EXCERPT_MAX_CHARS
            ));
        }

        let lowered = self.content_html.to_lowercase();
        if lowered.contains("<script") || lowered.contains("<style") {
            warnings.push("Content contains <script> or <style> elements".to_string());
        }

        warnings
    }
}

fn required_str(object: &Map<String, Value>, field: &'static str) -> Result<String> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ContentError::MissingField(field).into()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ContentError::NotAString(field).into()),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Publication status accepted by the post-creation endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Publish,
    Future,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Publish => "publish",
            PostStatus::Future => "future",
        }
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "publish" => Ok(PostStatus::Publish),
            "future" => Ok(PostStatus::Future),
            _ => Err(format!(
                "Invalid post status: '{}'. Valid options: draft, publish, future",
                s
            )),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access token persisted by the authorization flow
///
/// Everything the token endpoint returned besides `access_token`
/// (`token_type`, `blog_id`, `blog_url`, `scope`, ...) is kept in `extra`.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenRecord {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            extra: Map::new(),
        }
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &"[REDACTED]")
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Post created on the remote platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPost {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlogcastError;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_object_full() {
        let draft = PostDraft::from_object(&object(json!({
            "title": "let vs var",
            "excerpt": "Scope rules explained",
            "content_html": "<h2>Overview</h2>",
            "tags": ["javascript", "es6"],
            "categories": ["Development"],
            "slug": "let-vs-var"
        })))
        .unwrap();

        assert_eq!(draft.title, "let vs var");
        assert_eq!(draft.tags, vec!["javascript", "es6"]);
        assert_eq!(draft.categories, vec!["Development"]);
        assert_eq!(draft.slug, "let-vs-var");
    }

    #[test]
    fn test_from_object_missing_required_fields() {
        for field in ["title", "excerpt", "content_html"] {
            let mut map = object(json!({
                "title": "A",
                "excerpt": "B",
                "content_html": "<p>x</p>"
            }));
            map.remove(field);

            let err = PostDraft::from_object(&map).unwrap_err();
            match err {
                BlogcastError::Content(ContentError::MissingField(name)) => assert_eq!(name, field),
                other => panic!("Expected MissingField({}), got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_from_object_null_required_field_is_missing() {
        let err = PostDraft::from_object(&object(json!({
            "title": null,
            "excerpt": "B",
            "content_html": "<p>x</p>"
        })))
        .unwrap_err();

        assert!(matches!(
            err,
            BlogcastError::Content(ContentError::MissingField("title"))
        ));
    }

    #[test]
    fn test_from_object_non_string_required_field() {
        let err = PostDraft::from_object(&object(json!({
            "title": 42,
            "excerpt": "B",
            "content_html": "<p>x</p>"
        })))
        .unwrap_err();

        assert!(matches!(
            err,
            BlogcastError::Content(ContentError::NotAString("title"))
        ));
    }

    #[test]
    fn test_from_object_drops_non_string_tags() {
        let draft = PostDraft::from_object(&object(json!({
            "title": "A",
            "excerpt": "B",
            "content_html": "<p>x</p>",
            "tags": ["rust", 7, null, "cli"]
        })))
        .unwrap();

        assert_eq!(draft.tags, vec!["rust", "cli"]);
        assert!(draft.categories.is_empty());
        assert_eq!(draft.slug, "");
    }

    #[test]
    fn test_warnings_for_long_fields() {
        let draft = PostDraft {
            title: "t".repeat(81),
            excerpt: "e".repeat(161),
            content_html: "<p>ok</p><SCRIPT>alert(1)</SCRIPT>".to_string(),
            tags: vec![],
            categories: vec![],
            slug: String::new(),
        };

        let warnings = draft.warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("81"));
        assert!(warnings[1].contains("161"));
    }

    #[test]
    fn test_limits_count_characters_not_bytes() {
        let draft = PostDraft {
            title: "가".repeat(80),
            excerpt: "나".repeat(160),
            content_html: "<p>본문</p>".to_string(),
            tags: vec![],
            categories: vec![],
            slug: String::new(),
        };

        assert!(draft.warnings().is_empty());
    }

    #[test]
    fn test_post_status_from_str() {
        assert_eq!("draft".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert_eq!("PUBLISH".parse::<PostStatus>().unwrap(), PostStatus::Publish);
        assert_eq!("Future".parse::<PostStatus>().unwrap(), PostStatus::Future);

        let err = "private".parse::<PostStatus>().unwrap_err();
        assert!(err.contains("Invalid post status: 'private'"));
    }

    #[test]
    fn test_token_record_keeps_auxiliary_fields() {
        let record: TokenRecord = serde_json::from_value(json!({
            "access_token": "abc",
            "token_type": "bearer",
            "blog_id": "123456",
            "blog_url": "https://notes.wordpress.com"
        }))
        .unwrap();

        assert_eq!(record.access_token, "abc");
        assert_eq!(record.extra["blog_id"], "123456");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["token_type"], "bearer");
        assert_eq!(back["access_token"], "abc");
    }

    #[test]
    fn test_token_record_debug_redacts_token() {
        let record = TokenRecord::new("super-secret-token");
        assert!(!format!("{:?}", record).contains("super-secret-token"));
    }

    #[test]
    fn test_published_post_wire_names() {
        let post: PublishedPost = serde_json::from_value(json!({
            "ID": 42,
            "URL": "https://notes.wordpress.com/2024/01/01/hello/",
            "status": "draft",
            "title": "Hello",
            "author": {"ID": 1}
        }))
        .unwrap();

        assert_eq!(post.id, 42);
        assert_eq!(post.status, "draft");
        assert!(post.url.ends_with("/hello/"));
    }
}
