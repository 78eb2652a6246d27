use http::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::{Url, form_urlencoded};

use crate::{ErrorCodeEntry, FragmentError, Payload, RedirectOptions, UriFragment};

/// Payload message for every 5xx error; the caller's message stays on the
/// error value only.
pub const INTERNAL_MESSAGE: &str = "An internal server error occurred";

/// An OAuth 2.0 error as an HTTP error.
///
/// Status, message and error code are fixed at construction. The payload
/// `error` label can only change through [`crate::wrap`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct OAuth2Error {
    status: StatusCode,
    error_code: Option<String>,
    message: String,
    payload: Payload,
}

impl OAuth2Error {
    pub(crate) fn new(
        status: StatusCode,
        error_code: Option<String>,
        message: String,
        data: Option<Value>,
    ) -> Self {
        let error = match &error_code {
            Some(code) => code.clone(),
            None => reason_phrase(status),
        };
        let payload_message = if status.is_server_error() {
            INTERNAL_MESSAGE.to_string()
        } else {
            message.clone()
        };

        Self {
            status,
            error_code,
            message,
            payload: Payload {
                status_code: status.as_u16(),
                error,
                message: payload_message,
                data,
            },
        }
    }

    pub(crate) fn from_entry(entry: &ErrorCodeEntry, data: Option<Value>) -> Self {
        Self::new(
            entry.code.status(),
            Some(entry.code.as_str().to_string()),
            entry.message.to_string(),
            data,
        )
    }

    pub(crate) fn internal(message: Option<&str>, data: Option<Value>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
            message.unwrap_or(INTERNAL_MESSAGE).to_string(),
            data,
        )
    }

    pub(crate) fn set_error_label(&mut self, label: String) {
        self.payload.error = label;
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// `None` for internal errors.
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.payload.data.as_ref()
    }

    pub fn is_internal(&self) -> bool {
        self.error_code.is_none()
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    pub fn to_json(&self) -> Result<String, FragmentError> {
        Ok(serde_json::to_string(&self.payload)?)
    }

    /// Builds the error redirect for an implicit-flow client: `redirect_uri`
    /// with the encoded payload (and `state`, if any) as its fragment. Any
    /// existing fragment is replaced.
    pub fn redirect_url(
        &self,
        redirect_uri: &str,
        options: &RedirectOptions,
    ) -> Result<Url, FragmentError> {
        let mut url = Url::parse(redirect_uri)?;
        if url.cannot_be_a_base() {
            return Err(FragmentError::InvalidRedirectUri(redirect_uri.to_string()));
        }

        let mut fragment = self.to_uri_frag(true);
        if let Some(state) = &options.state {
            fragment = form_urlencoded::Serializer::for_suffix(fragment, 0)
                .append_pair("state", state)
                .finish();
        }

        url.set_fragment(Some(&fragment));
        Ok(url)
    }
}

impl UriFragment for OAuth2Error {
    fn payload(&self) -> &Payload {
        &self.payload
    }
}

fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}
