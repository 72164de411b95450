use serde_json::Value;

use crate::domain::{ApiError, ClassifiedOutcome, RawRecord, Tweet, is_known_error_title};

/// Decide what a record is: data, a server-sent error, or malformed
pub fn classify(record: &RawRecord) -> ClassifiedOutcome {
    if let Some(error) = api_error(record) {
        return ClassifiedOutcome::ApiError(error);
    }

    match Tweet::from_record(record) {
        Ok(tweet) => ClassifiedOutcome::Data(tweet),
        Err(reason) => ClassifiedOutcome::Malformed(reason),
    }
}

/// Error objects come either flat (`title`/`detail` at the root) or wrapped
/// in an `errors` array without accompanying `data`
fn api_error(record: &RawRecord) -> Option<ApiError> {
    if let Some(title) = record.str_field("title") {
        return is_known_error_title(title)
            .then(|| ApiError::new(title, record.str_field("detail").unwrap_or_default()));
    }

    if record.contains("data") {
        return None;
    }

    record
        .get("errors")?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find_map(|entry| {
            let title = entry.get("title").and_then(Value::as_str)?;
            let detail = entry.get("detail").and_then(Value::as_str).unwrap_or_default();
            is_known_error_title(title).then(|| ApiError::new(title, detail))
        })
}
