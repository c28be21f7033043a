//! Query-string and shareable URL construction.

use quickchart_core::Error;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Flatten a serializable payload into query pairs.
///
/// Top-level fields become parameters in a stable order. Strings are passed
/// raw, numbers and booleans use their JSON text, and nested objects or
/// arrays are embedded as compact JSON. `null` fields are skipped.
pub fn query_pairs<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<(String, String)>, Error> {
    let value = serde_json::to_value(payload).map_err(|e| Error::Encode(e.to_string()))?;

    let Value::Object(map) = value else {
        return Err(Error::Encode("query payload must be an object".into()));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Append query pairs to an endpoint URL.
pub fn with_query(endpoint: &Url, pairs: &[(String, String)]) -> Url {
    let mut url = endpoint.clone();
    if !pairs.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    url
}

/// Append one percent-encoded path segment, e.g. `/natural/<description>`.
pub fn with_path_segment(endpoint: &Url, segment: &str) -> Result<Url, Error> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Encode(format!("cannot append a path segment to {endpoint}")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

/// Attach a fragment, e.g. `/sandbox#<chart JSON>`.
pub fn with_fragment(base: &Url, fragment: &str) -> Url {
    let mut url = base.clone();
    url.set_fragment(Some(fragment));
    url
}

/// Endpoint without query or fragment, for logs and error messages.
pub fn display_url(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.set_fragment(None);
    shown.to_string()
}
