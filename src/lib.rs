//! OAuth 2.0 error codes as structured HTTP errors.
//!
//! Every error produced here knows its HTTP status, carries a JSON-ready
//! payload, and can serialize itself as a redirect URI fragment for
//! implicit-flow clients.

pub mod codes;
mod error;
mod factory;
mod fragment;
mod oauth2_error;
#[cfg(feature = "axum")]
mod response;
mod types;

pub use codes::{ErrorCode, ErrorCodeEntry, UnknownErrorCode};
pub use error::FragmentError;
pub use factory::{
    WrapOptions, Wrappable, create_from_code, create_with_status, invalid_callback,
    invalid_client, invalid_client_secret, invalid_grant, invalid_param, invalid_redirect_uri,
    invalid_request, invalid_token, token_expired, unauthorized_client, unsupported_grant_type,
    unsupported_over_http, unsupported_redirect_uri, unsupported_response_type, version_rejected,
    wrap,
};
pub use fragment::{MAX_DEPTH, UriFragment};
pub use oauth2_error::{INTERNAL_MESSAGE, OAuth2Error};
pub use types::{Code, Payload, RedirectOptions};
