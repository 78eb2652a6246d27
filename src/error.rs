use thiserror::Error;

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field in uri fragment: {field}")]
    MissingField { field: &'static str },

    #[error("invalid status code in uri fragment: {value}")]
    InvalidStatus { value: String },

    #[error("uri fragment key nested deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("redirect uri cannot carry a fragment: {0}")]
    InvalidRedirectUri(String),
}
