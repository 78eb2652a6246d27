//! The fixed OAuth 2.0 error code table.

use std::fmt;
use std::str::FromStr;

use http::StatusCode;

/// One row of the error code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCodeEntry {
    pub code: ErrorCode,
    pub status_code: u16,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidClient,
    InvalidRequest,
    InvalidParam,
    InvalidRedirectUri,
    UnsupportedOverHttp,
    UnsupportedResponseType,
    UnsupportedGrantType,
    UnsupportedRedirectUri,
    VersionRejected,
    InvalidToken,
    InvalidCallback,
    InvalidClientSecret,
    InvalidGrant,
    TokenExpired,
    UnauthorizedClient,
}

static TABLE: [ErrorCodeEntry; 15] = [
    // 400
    entry(ErrorCode::InvalidClient, 400, "invalid client_id provided"),
    entry(ErrorCode::InvalidRequest, 400, "invalid request parameter provided"),
    entry(ErrorCode::InvalidParam, 400, "a provided request parameter is invalid"),
    entry(
        ErrorCode::InvalidRedirectUri,
        400,
        "redirect_uri mismatch with original authorization request",
    ),
    entry(ErrorCode::UnsupportedOverHttp, 400, "OAuth 2.0 only supports calls over HTTPS"),
    entry(
        ErrorCode::UnsupportedResponseType,
        400,
        "response_type not supported for this request",
    ),
    entry(ErrorCode::UnsupportedGrantType, 400, "grant_type not supported"),
    entry(
        ErrorCode::UnsupportedRedirectUri,
        400,
        "redirect_uri not supported for this request type",
    ),
    entry(ErrorCode::VersionRejected, 400, "unsupported OAuth version"),
    // 401
    entry(ErrorCode::InvalidToken, 401, "provided token is invalid"),
    entry(
        ErrorCode::InvalidCallback,
        401,
        "redirect_uri port unsupported or Client ID mismatch",
    ),
    entry(ErrorCode::InvalidClientSecret, 401, "invalid client_secret provided"),
    entry(ErrorCode::InvalidGrant, 401, "invalid or expired token"),
    entry(ErrorCode::TokenExpired, 401, "refresh token expired"),
    entry(
        ErrorCode::UnauthorizedClient,
        401,
        "client not allowed to use this grant_type",
    ),
];

const fn entry(code: ErrorCode, status_code: u16, message: &'static str) -> ErrorCodeEntry {
    ErrorCodeEntry {
        code,
        status_code,
        message,
    }
}

/// Every table entry, in table order.
pub fn entries() -> &'static [ErrorCodeEntry] {
    &TABLE
}

/// Looks up a wire code such as `invalid_grant`.
pub fn lookup(code: &str) -> Option<&'static ErrorCodeEntry> {
    TABLE.iter().find(|entry| entry.code.as_str() == code)
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 15] = [
        ErrorCode::InvalidClient,
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidParam,
        ErrorCode::InvalidRedirectUri,
        ErrorCode::UnsupportedOverHttp,
        ErrorCode::UnsupportedResponseType,
        ErrorCode::UnsupportedGrantType,
        ErrorCode::UnsupportedRedirectUri,
        ErrorCode::VersionRejected,
        ErrorCode::InvalidToken,
        ErrorCode::InvalidCallback,
        ErrorCode::InvalidClientSecret,
        ErrorCode::InvalidGrant,
        ErrorCode::TokenExpired,
        ErrorCode::UnauthorizedClient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidClient => "invalid_client",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::InvalidParam => "invalid_param",
            ErrorCode::InvalidRedirectUri => "invalid_redirect_uri",
            ErrorCode::UnsupportedOverHttp => "unsupported_over_http",
            ErrorCode::UnsupportedResponseType => "unsupported_response_type",
            ErrorCode::UnsupportedGrantType => "unsupported_grant_type",
            ErrorCode::UnsupportedRedirectUri => "unsupported_redirect_uri",
            ErrorCode::VersionRejected => "version_rejected",
            ErrorCode::InvalidToken => "invalid_token",
            ErrorCode::InvalidCallback => "invalid_callback",
            ErrorCode::InvalidClientSecret => "invalid_client_secret",
            ErrorCode::InvalidGrant => "invalid_grant",
            ErrorCode::TokenExpired => "token_expired",
            ErrorCode::UnauthorizedClient => "unauthorized_client",
        }
    }

    pub fn entry(&self) -> &'static ErrorCodeEntry {
        // ALL and TABLE share one ordering.
        &TABLE[*self as usize]
    }

    pub fn status(&self) -> StatusCode {
        match self.entry().status_code {
            400 => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn message(&self) -> &'static str {
        self.entry().message
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown oauth2 error code: {0}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        lookup(code)
            .map(|entry| entry.code)
            .ok_or_else(|| UnknownErrorCode(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_enum_order() {
        for (index, code) in ErrorCode::ALL.iter().enumerate() {
            assert_eq!(entries()[index].code, *code);
            assert_eq!(code.entry().code, *code);
        }
    }

    #[test]
    fn codes_are_unique_and_client_errors() {
        let mut seen = std::collections::HashSet::new();
        for entry in entries() {
            assert!(seen.insert(entry.code.as_str()), "duplicate {}", entry.code);
            assert!(matches!(entry.status_code, 400 | 401));
            assert_eq!(entry.code.status().as_u16(), entry.status_code);
        }
        assert_eq!(seen.len(), 15);
    }

    #[test]
    fn parses_wire_codes() {
        assert_eq!("token_expired".parse::<ErrorCode>(), Ok(ErrorCode::TokenExpired));
        assert_eq!(
            "nope".parse::<ErrorCode>(),
            Err(UnknownErrorCode("nope".to_string()))
        );
    }

    #[test]
    fn lookup_returns_table_message() {
        let entry = lookup("unsupported_over_http").unwrap();
        assert_eq!(entry.status_code, 400);
        assert_eq!(entry.message, "OAuth 2.0 only supports calls over HTTPS");
        assert!(lookup("").is_none());
    }
}
