//! Query string encoding for URI fragments.
//!
//! Components are `application/x-www-form-urlencoded` (space becomes `+`).
//! Nested values use bracket notation: `data[user][id]=7`, arrays are
//! indexed as `data[scopes][0]=read`. Empty objects and arrays emit nothing,
//! `null` emits an empty value.
//!
//! Decoding is lossy: every leaf comes back as a string, `null` comes back
//! as `""`, an object keyed `0..n` or `""` comes back as an array, and a key
//! containing `[` or `]` no longer parses as a nested path. Keys nested
//! deeper than [`MAX_DEPTH`] are rejected.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::{FragmentError, Payload};

/// Maximum number of bracket segments in one decoded key.
pub const MAX_DEPTH: usize = 32;

/// Serialization of an error payload as a redirect URI fragment.
pub trait UriFragment {
    fn payload(&self) -> &Payload;

    /// Encodes the payload as a query string, prefixed with `#` unless
    /// `exclude_hash` is set.
    fn to_uri_frag(&self, exclude_hash: bool) -> String {
        let query = stringify(&self.payload().to_map());
        if exclude_hash {
            query
        } else {
            format!("#{query}")
        }
    }
}

impl UriFragment for Payload {
    fn payload(&self) -> &Payload {
        self
    }
}

pub(crate) fn stringify(map: &Map<String, Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in map {
        append_value(&mut serializer, key, value);
    }
    serializer.finish()
}

fn append_value(serializer: &mut form_urlencoded::Serializer<'_, String>, key: &str, value: &Value) {
    match value {
        Value::Null => {
            serializer.append_pair(key, "");
        }
        Value::Bool(flag) => {
            serializer.append_pair(key, if *flag { "true" } else { "false" });
        }
        Value::Number(number) => {
            serializer.append_pair(key, &number.to_string());
        }
        Value::String(text) => {
            serializer.append_pair(key, text);
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                append_value(serializer, &format!("{key}[{index}]"), item);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                append_value(serializer, &format!("{key}[{field}]"), item);
            }
        }
    }
}

/// Decodes a query string into nested maps. Leaves are strings; objects
/// keyed `0..n` become arrays.
pub(crate) fn parse(query: &str) -> Result<Map<String, Value>, FragmentError> {
    let mut map = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let (root, segments) = split_key(&key)?;
        insert(&mut map, root, &segments, value.into_owned());
    }

    Ok(map
        .into_iter()
        .map(|(key, value)| (key, collapse_arrays(value)))
        .collect())
}

fn split_key(key: &str) -> Result<(&str, Vec<&str>), FragmentError> {
    let open = match key.find('[') {
        Some(open) if open > 0 => open,
        _ => return Ok((key, Vec::new())),
    };

    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => {
                if segments.len() == MAX_DEPTH {
                    return Err(FragmentError::TooDeep { max: MAX_DEPTH });
                }
                segments.push(&inner[..close]);
                rest = &inner[close + 1..];
            }
            None => return Ok((key, Vec::new())),
        }
    }

    if !rest.is_empty() {
        return Ok((key, Vec::new()));
    }
    Ok((&key[..open], segments))
}

fn insert(map: &mut Map<String, Value>, key: &str, segments: &[&str], value: String) {
    // `a[]=x` appends
    let key = if key.is_empty() {
        map.len().to_string()
    } else {
        key.to_string()
    };

    let Some((next, rest)) = segments.split_first() else {
        map.insert(key, Value::String(value));
        return;
    };

    let slot = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(inner) = slot {
        insert(inner, next, rest, value);
    }
}

fn collapse_arrays(value: Value) -> Value {
    let Value::Object(fields) = value else {
        return value;
    };

    let fields: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key, collapse_arrays(value)))
        .collect();

    let is_sequence = !fields.is_empty()
        && (0..fields.len()).all(|index| fields.contains_key(&index.to_string()));
    if !is_sequence {
        return Value::Object(fields);
    }

    let mut fields = fields;
    let items = (0..fields.len())
        .filter_map(|index| fields.remove(&index.to_string()))
        .collect();
    Value::Array(items)
}
