use http::StatusCode;
use serde_json::Value;

use crate::{Code, ErrorCode, FragmentError, OAuth2Error, codes};

/// Builds an error from a table code. The table message always wins over
/// `message`; absent, internal and unknown codes become a 500.
pub fn create_from_code<'a>(
    code: impl Into<Code<'a>>,
    message: Option<&str>,
    data: Option<Value>,
) -> OAuth2Error {
    let name = match code.into() {
        Code::Internal => return OAuth2Error::internal(message, data),
        Code::Named(name) => name,
    };

    match codes::lookup(name) {
        Some(entry) => OAuth2Error::from_entry(entry, data),
        None => {
            tracing::warn!(code = name, "unknown oauth2 error code, using internal error");
            OAuth2Error::internal(message, data)
        }
    }
}

/// Builds an error with a caller-chosen code, status and message, bypassing
/// the table.
///
/// The internal sentinel is checked before `status_code` is looked at, so an
/// absent code still yields a 500. A status outside 400..=599 also yields a
/// 500.
pub fn create_with_status<'a>(
    code: impl Into<Code<'a>>,
    status_code: u16,
    message: &str,
    data: Option<Value>,
) -> OAuth2Error {
    let name = match code.into() {
        Code::Internal => return OAuth2Error::internal(Some(message), data),
        Code::Named(name) => name,
    };

    match error_status(status_code) {
        Some(status) => OAuth2Error::new(status, Some(name.to_string()), message.to_string(), data),
        None => {
            tracing::warn!(code = name, status_code, "invalid error status, using internal error");
            OAuth2Error::internal(Some(message), data)
        }
    }
}

/// Input to [`wrap`].
#[derive(Debug)]
pub enum Wrappable {
    Structured(OAuth2Error),
    Error(Box<dyn std::error::Error + Send + Sync>),
    /// Anything that is not an error; kept as `data` on a 500.
    Opaque(Value),
}

impl Wrappable {
    pub fn error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Wrappable::Error(Box::new(err))
    }
}

impl From<OAuth2Error> for Wrappable {
    fn from(err: OAuth2Error) -> Self {
        Wrappable::Structured(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Wrappable {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Wrappable::Error(err)
    }
}

impl From<FragmentError> for Wrappable {
    fn from(err: FragmentError) -> Self {
        Wrappable::error(err)
    }
}

impl From<std::io::Error> for Wrappable {
    fn from(err: std::io::Error) -> Self {
        Wrappable::error(err)
    }
}

impl From<Value> for Wrappable {
    fn from(value: Value) -> Self {
        Wrappable::Opaque(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WrapOptions {
    pub code: Option<String>,
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl WrapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Turns any error into an [`OAuth2Error`].
///
/// An `OAuth2Error` (boxed or not) comes back unchanged except for the
/// payload `error` label, which `options.code` overwrites. Other errors are
/// promoted with `options.status_code` (default 500) and `options.message`
/// prefixed to their own message.
///
/// Errors of other types go in through [`Wrappable::error`], e.g.
/// `wrap(Wrappable::error(my_err), &WrapOptions::new())`.
pub fn wrap(error: impl Into<Wrappable>, options: &WrapOptions) -> OAuth2Error {
    match error.into() {
        Wrappable::Structured(err) => relabel(err, options),
        Wrappable::Error(err) => match err.downcast::<OAuth2Error>() {
            Ok(err) => relabel(*err, options),
            Err(err) => promote(&*err, options),
        },
        Wrappable::Opaque(value) => {
            tracing::debug!("wrapping a non-error value as an internal error");
            let data = if value.is_null() { None } else { Some(value) };
            relabel(OAuth2Error::internal(options.message.as_deref(), data), options)
        }
    }
}

fn relabel(mut err: OAuth2Error, options: &WrapOptions) -> OAuth2Error {
    if let Some(code) = &options.code {
        err.set_error_label(code.clone());
    }
    err
}

fn promote(err: &(dyn std::error::Error + Send + Sync), options: &WrapOptions) -> OAuth2Error {
    let status = match options.status_code {
        None => StatusCode::INTERNAL_SERVER_ERROR,
        Some(status_code) => error_status(status_code).unwrap_or_else(|| {
            tracing::warn!(status_code, "invalid error status, using internal error");
            StatusCode::INTERNAL_SERVER_ERROR
        }),
    };
    let message = match &options.message {
        Some(message) => format!("{message}: {err}"),
        None => err.to_string(),
    };
    tracing::debug!(status = status.as_u16(), error = %err, "promoting error");

    OAuth2Error::new(status, options.code.clone(), message, None)
}

fn error_status(status_code: u16) -> Option<StatusCode> {
    StatusCode::from_u16(status_code)
        .ok()
        .filter(|status| status.is_client_error() || status.is_server_error())
}

macro_rules! shorthand {
    ($($name:ident => $code:ident,)*) => {
        $(
            #[doc = concat!("`", stringify!($name), "` error from the code table.")]
            pub fn $name(message: Option<&str>, data: Option<Value>) -> OAuth2Error {
                create_from_code(ErrorCode::$code, message, data)
            }
        )*
    };
}

shorthand! {
    invalid_client => InvalidClient,
    invalid_request => InvalidRequest,
    invalid_param => InvalidParam,
    invalid_redirect_uri => InvalidRedirectUri,
    unsupported_over_http => UnsupportedOverHttp,
    unsupported_response_type => UnsupportedResponseType,
    unsupported_grant_type => UnsupportedGrantType,
    unsupported_redirect_uri => UnsupportedRedirectUri,
    version_rejected => VersionRejected,
    invalid_token => InvalidToken,
    invalid_callback => InvalidCallback,
    invalid_client_secret => InvalidClientSecret,
    invalid_grant => InvalidGrant,
    token_expired => TokenExpired,
    unauthorized_client => UnauthorizedClient,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{INTERNAL_MESSAGE, UriFragment};

    #[test]
    fn create_from_code_ignores_caller_message_for_table_codes() {
        let err = create_from_code("invalid_grant", Some("custom"), None);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), "invalid or expired token");
        assert_eq!(err.payload().error, "invalid_grant");
    }

    #[test]
    fn create_from_code_degrades_unknown_and_internal_codes() {
        for err in [
            create_from_code(None::<&str>, None, None),
            create_from_code(Code::Internal, None, None),
            create_from_code("", None, None),
            create_from_code("not_a_real_code", Some("boom"), None),
        ] {
            assert_eq!(err.status_code(), 500);
            assert_eq!(err.error_code(), None);
        }

        let err = create_from_code("not_a_real_code", Some("boom"), Some(json!({"id": 1})));
        assert_eq!(err.message(), "boom");
        assert_eq!(err.data(), Some(&json!({"id": 1})));
    }

    #[test]
    fn create_with_status_uses_caller_values() {
        let err = create_with_status("slow_down", 429, "polling too fast", None);
        assert_eq!(err.status_code(), 429);
        assert_eq!(err.error_code(), Some("slow_down"));
        assert_eq!(err.payload().message, "polling too fast");
    }

    #[test]
    fn create_with_status_checks_sentinel_before_status() {
        let err = create_with_status(Code::Internal, 400, "hello", None);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "hello");
        assert_eq!(err.payload().message, INTERNAL_MESSAGE);
    }

    #[test]
    fn create_with_status_rejects_non_error_statuses() {
        for status_code in [0, 200, 302, 600, 1000] {
            let err = create_with_status("custom", status_code, "x", None);
            assert_eq!(err.status_code(), 500);
            assert!(err.is_internal());
        }
    }

    #[test]
    fn wrap_returns_structured_errors_unchanged() {
        let original = invalid_client(None, Some(json!({"client": "abc"})));
        let wrapped = wrap(original.clone(), &WrapOptions::new().with_status(418));
        assert_eq!(wrapped, original);

        let relabeled = wrap(original, &WrapOptions::new().with_code("access_denied"));
        assert_eq!(relabeled.payload().error, "access_denied");
        assert_eq!(relabeled.error_code(), Some("invalid_client"));
        assert_eq!(relabeled.status_code(), 400);
    }

    #[test]
    fn wrap_recognizes_boxed_structured_errors() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(token_expired(None, None));
        let wrapped = wrap(boxed, &WrapOptions::new());
        assert_eq!(wrapped, token_expired(None, None));
    }

    #[test]
    fn wrap_promotes_generic_errors() {
        let io = std::io::Error::other("disk full");
        let err = wrap(io, &WrapOptions::new());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "disk full");
        assert_eq!(err.payload().error, "Internal Server Error");
        assert!(err.to_uri_frag(false).starts_with("#statusCode=500"));

        let io = std::io::Error::other("bad input");
        let err = wrap(
            io,
            &WrapOptions::new()
                .with_code("invalid_request")
                .with_status(400)
                .with_message("parsing body"),
        );
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "parsing body: bad input");
        assert_eq!(err.payload().error, "invalid_request");
        assert_eq!(err.payload().message, "parsing body: bad input");
    }

    #[test]
    fn wrap_without_code_uses_reason_phrase() {
        let err = wrap(
            Wrappable::error(std::io::Error::other("nope")),
            &WrapOptions::new().with_status(404),
        );
        assert_eq!(err.payload().error, "Not Found");
        assert_eq!(err.error_code(), None);
    }

    #[test]
    fn wrap_accepts_caller_error_types() {
        #[derive(Debug, thiserror::Error)]
        #[error("session store unavailable")]
        struct StoreError;

        let err = wrap(
            Wrappable::error(StoreError),
            &WrapOptions::new().with_code("temporarily_unavailable").with_status(503),
        );
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.message(), "session store unavailable");
        assert_eq!(err.payload().error, "temporarily_unavailable");
    }

    #[test]
    fn wrap_turns_opaque_values_into_internal_errors() {
        let err = wrap(json!({"raw": true}), &WrapOptions::new().with_code("server_error"));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.payload().error, "server_error");
        assert_eq!(err.data(), Some(&json!({"raw": true})));

        let err = wrap(Value::Null, &WrapOptions::new());
        assert_eq!(err.data(), None);
    }

    #[test]
    fn shorthands_forward_to_table() {
        assert_eq!(unsupported_over_http(None, None).status_code(), 400);
        assert_eq!(unauthorized_client(None, None).status_code(), 401);
        assert_eq!(
            version_rejected(Some("ignored"), None).message(),
            "unsupported OAuth version"
        );
    }
}
