//! Typed views of the two MediaWiki API responses we consume.
//!
//! The raw `Raw*` structs mirror the JSON (format version 1, where content
//! hides under a `"*"` key). They are converted into the public types right
//! after decoding so nothing downstream touches `serde_json::Value`.

use serde::Deserialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Category members
// ---------------------------------------------------------------------------

/// MediaWiki namespace of a category member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// `ns = 0`, content pages.
    Main,
    /// `ns = 14`, sub-categories.
    Category,
    /// Anything else (files, templates, user pages...).
    Other(i64),
}

impl From<i64> for Namespace {
    fn from(ns: i64) -> Self {
        match ns {
            0 => Self::Main,
            14 => Self::Category,
            other => Self::Other(other),
        }
    }
}

/// One direct member of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMember {
    pub title: String,
    pub namespace: Namespace,
}

impl CategoryMember {
    pub fn new(title: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            title: title.into(),
            namespace,
        }
    }
}

/// Opaque continuation token: the key/value pairs of the API's `continue`
/// object, echoed back verbatim on the next request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Continuation(Vec<(String, String)>);

impl Continuation {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// Query parameters to append to the next request.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn from_json(map: Map<String, Value>) -> Option<Self> {
        if map.is_empty() {
            return None;
        }
        let pairs = map
            .into_iter()
            .map(|(k, v)| match v {
                Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect();
        Some(Self(pairs))
    }
}

/// One page of a `list=categorymembers` listing.
#[derive(Debug, Clone, Default)]
pub struct MemberPage {
    pub members: Vec<CategoryMember>,
    /// Present while more members remain.
    pub continuation: Option<Continuation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMemberListing {
    #[serde(default)]
    query: Option<RawQuery>,
    #[serde(default, rename = "continue")]
    continuation: Option<Map<String, Value>>,
    #[serde(default)]
    pub(crate) error: Option<RawApiError>,
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    #[serde(default)]
    categorymembers: Vec<RawMember>,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    ns: Option<i64>,
    title: Option<String>,
}

impl From<RawMemberListing> for MemberPage {
    fn from(raw: RawMemberListing) -> Self {
        let members = raw
            .query
            .map(|q| q.categorymembers)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| {
                let title = m.title.filter(|t| !t.is_empty())?;
                // A member without a namespace can't be classified; treat it as foreign.
                let namespace = m.ns.map(Namespace::from).unwrap_or(Namespace::Other(-1));
                Some(CategoryMember { title, namespace })
            })
            .collect();

        Self {
            members,
            continuation: raw.continuation.and_then(Continuation::from_json),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendered page
// ---------------------------------------------------------------------------

/// Output of `action=parse` for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Rendered HTML body.
    pub html: String,
    /// Category names as returned by the API (underscored, no `Category:` prefix).
    pub categories: Vec<String>,
}

/// Whole render response: either a parse result, or the API's explanation of
/// why there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResponse {
    pub parse: Option<ParsedPage>,
    /// `error.info` from the API, when it sent one.
    pub error_info: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRender {
    #[serde(default)]
    parse: Option<RawParse>,
    #[serde(default)]
    error: Option<RawApiError>,
}

#[derive(Debug, Deserialize)]
struct RawParse {
    #[serde(default)]
    text: Option<RawStar>,
    #[serde(default)]
    categories: Vec<RawStar>,
}

#[derive(Debug, Deserialize)]
struct RawStar {
    #[serde(rename = "*", default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawApiError {
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) info: Option<String>,
}

impl From<RawRender> for RenderResponse {
    fn from(raw: RawRender) -> Self {
        let parse = raw.parse.map(|p| ParsedPage {
            html: p.text.and_then(|t| t.content).unwrap_or_default(),
            categories: p
                .categories
                .into_iter()
                .filter_map(|c| c.content.filter(|s| !s.is_empty()))
                .collect(),
        });

        Self {
            parse,
            error_info: raw.error.and_then(|e| e.info),
        }
    }
}
