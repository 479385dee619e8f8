//! Defensive parsing for list columns stored as serialized JSON text.
//!
//! Tags, colors and fonts are persisted as JSON arrays in TEXT columns. Reads
//! never fail: anything that is not an array of strings degrades to an empty
//! list.

/// Parse a JSON array of strings. Malformed input yields an empty list.
#[must_use]
pub fn parse_string_list(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(error) => {
            if !raw.trim().is_empty() {
                tracing::debug!(%error, "ignoring malformed JSON list column");
            }
            Vec::new()
        }
    }
}

/// Serialize a list of strings to the JSON text stored in list columns.
#[must_use]
pub fn to_json_list<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    // A Vec<&str> always serializes.
    serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
}
