// CMS REST API record types.
// Content blocks and options as returned by the collection and location endpoints.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// A named, categorized record stored in a CMS collection.
pub trait Record: Clone + DeserializeOwned + Send + Sync + 'static {
    /// Collection path relative to the API root.
    const COLLECTION: &'static str;

    /// What a caller supplies to create a missing record.
    type Draft: Send + Sync;

    fn category(&self) -> &str;
    fn name(&self) -> &str;

    /// The record's text payload (`body` or `value`).
    fn payload(&self) -> &str;

    /// Form fields sent to the collection endpoint to create a record.
    fn creation_form(category: &str, name: &str, draft: &Self::Draft) -> Vec<(&'static str, String)>;

    /// The draft payload as returned to the caller that supplied it.
    fn draft_payload(draft: &Self::Draft) -> &str;
}

/// Keyed sub-attribute of a content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAttribute {
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub body: String,
}

/// Rich text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub category: String,
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Vec<ContentAttribute>,
    /// Server-assigned fields (id, timestamps, ...), passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Default content for a block that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDraft {
    pub body: String,
    /// Whether the CMS should edit the block with a WYSIWYG editor.
    pub wysiwyg: bool,
}

impl Record for ContentBlock {
    const COLLECTION: &'static str = "content-blocks";
    type Draft = BlockDraft;

    fn category(&self) -> &str {
        &self.category
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn payload(&self) -> &str {
        &self.body
    }

    fn creation_form(category: &str, name: &str, draft: &BlockDraft) -> Vec<(&'static str, String)> {
        vec![
            ("category", category.to_string()),
            ("name", name.to_string()),
            ("body", draft.body.clone()),
            ("wysiwyg", u8::from(draft.wysiwyg).to_string()),
        ]
    }

    fn draft_payload(draft: &BlockDraft) -> &str {
        &draft.body
    }
}

/// Scalar configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub category: String,
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for OptionValue {
    const COLLECTION: &'static str = "options";
    type Draft = String;

    fn category(&self) -> &str {
        &self.category
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn payload(&self) -> &str {
        &self.value
    }

    fn creation_form(category: &str, name: &str, draft: &String) -> Vec<(&'static str, String)> {
        vec![
            ("category", category.to_string()),
            ("name", name.to_string()),
            ("value", draft.clone()),
        ]
    }

    fn draft_payload(draft: &String) -> &str {
        draft
    }
}

/// Accept any JSON scalar as text; null becomes the empty string.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
