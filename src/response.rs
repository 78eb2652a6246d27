use axum::{
    Json,
    response::{IntoResponse, Response},
};

use crate::OAuth2Error;

impl IntoResponse for OAuth2Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self.message(), "oauth2 request failed");
        } else {
            tracing::debug!(%status, code = ?self.error_code(), "oauth2 request rejected");
        }
        (status, Json(self.into_payload())).into_response()
    }
}
