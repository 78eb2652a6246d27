use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ErrorCode, FragmentError, fragment};

/// Error code argument accepted by the factories.
///
/// `Internal` is the "internal error" sentinel: it, an absent code and an
/// empty code all produce a 500 internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code<'a> {
    Internal,
    Named(&'a str),
}

impl<'a> From<&'a str> for Code<'a> {
    fn from(code: &'a str) -> Self {
        if code.is_empty() {
            Code::Internal
        } else {
            Code::Named(code)
        }
    }
}

impl<'a> From<&'a String> for Code<'a> {
    fn from(code: &'a String) -> Self {
        Code::from(code.as_str())
    }
}

impl<'a> From<Option<&'a str>> for Code<'a> {
    fn from(code: Option<&'a str>) -> Self {
        code.map(Code::from).unwrap_or(Code::Internal)
    }
}

impl From<ErrorCode> for Code<'static> {
    fn from(code: ErrorCode) -> Self {
        Code::Named(code.as_str())
    }
}

/// The client-visible body of an error.
///
/// Field order is the serialization order for both JSON and URI fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Payload {
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("statusCode".to_string(), Value::from(self.status_code));
        map.insert("error".to_string(), Value::String(self.error.clone()));
        map.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(data) = &self.data {
            map.insert("data".to_string(), data.clone());
        }
        map
    }

    /// Parses a fragment produced by [`crate::UriFragment::to_uri_frag`],
    /// with or without the leading `#`.
    ///
    /// Every leaf of `data` comes back as a string. Keys nested deeper than
    /// [`crate::MAX_DEPTH`] fail with [`FragmentError::TooDeep`].
    pub fn from_uri_frag(fragment: &str) -> Result<Self, FragmentError> {
        let query = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut map = fragment::parse(query)?;

        let status = take_string(&mut map, "statusCode")?;
        let status_code = status
            .parse::<u16>()
            .map_err(|_| FragmentError::InvalidStatus { value: status })?;

        Ok(Self {
            status_code,
            error: take_string(&mut map, "error")?,
            message: take_string(&mut map, "message")?,
            data: map.remove("data"),
        })
    }
}

fn take_string(map: &mut Map<String, Value>, field: &'static str) -> Result<String, FragmentError> {
    match map.remove(field) {
        Some(Value::String(value)) => Ok(value),
        _ => Err(FragmentError::MissingField { field }),
    }
}

/// Options for [`crate::OAuth2Error::redirect_url`].
#[derive(Debug, Clone, Default)]
pub struct RedirectOptions {
    pub state: Option<String>,
}

impl RedirectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}
