use serde_json::{Map, Value};
use tracing::debug;

use super::error::DomainError;
use super::record::RawRecord;

/// Typed view of a data record: the parts the statistics care about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tweet {
    id: Option<String>,
    hashtags: Vec<String>,
}

impl Tweet {
    /// Create a tweet from already-extracted parts
    pub fn new(id: Option<String>, hashtags: Vec<String>) -> Self {
        Self { id, hashtags }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Hashtags in the order they appear in the record
    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    /// Extract the typed view from a raw record.
    ///
    /// Fields are read from the record root, or from a `data` envelope when
    /// the root carries no `entities`. A missing entity block or hashtag list
    /// yields zero tags. A container of the wrong type is a shape error.
    /// Individual hashtag entries without usable text are skipped.
    pub fn from_record(record: &RawRecord) -> Result<Self, DomainError> {
        let source = tweet_body(record);

        Ok(Self {
            id: source.get("id").and_then(id_text),
            hashtags: extract_hashtags(source)?,
        })
    }
}

fn tweet_body(record: &RawRecord) -> &Map<String, Value> {
    if record.contains("entities") {
        return record.fields();
    }
    record
        .get("data")
        .and_then(Value::as_object)
        .unwrap_or_else(|| record.fields())
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn extract_hashtags(source: &Map<String, Value>) -> Result<Vec<String>, DomainError> {
    let entities = match source.get("entities") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(entities)) => entities,
        Some(_) => {
            return Err(DomainError::UnexpectedShape {
                field: "entities",
                expected: "an object",
            });
        }
    };

    let entries = match entities.get("hashtags") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(DomainError::UnexpectedShape {
                field: "entities.hashtags",
                expected: "an array",
            });
        }
    };

    let hashtags = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match hashtag_text(entry) {
            Some(text) => Some(text.to_owned()),
            None => {
                debug!(index, "Skipping hashtag entry without text");
                None
            }
        })
        .collect();

    Ok(hashtags)
}

/// `text` is the v1.1 field name, `tag` the v2 one
fn hashtag_text(entry: &Value) -> Option<&str> {
    let entry = entry.as_object()?;
    entry
        .get("text")
        .or_else(|| entry.get("tag"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}
