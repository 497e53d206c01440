use opensearch::http::{StatusCode, response::Response};
use serde::de::DeserializeOwned;


#[derive(thiserror::Error, Debug, serde::Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum OpensearchClientError {
    #[error("error deserializing response body. method: {method:?} details: {details}")]
    DeserializationFailed {
        details: String,
        method: Option<String>,
    },
    #[error("unable to serialize into json. method: {method:?} details: {details}")]
    SerializationFailed {
        details: String,
        method: Option<String>,
    },
    #[error("a network error occurred. status_code: {status_code} message: {message}")]
    NetworkError { status_code: u16, message: String },

    #[error("unable to reach opensearch. method: {method:?} details: {details}")]
    ConnectionFailed {
        details: String,
        method: Option<String>,
    },

    #[error("request timed out. method: {method:?}")]
    Timeout { method: Option<String> },

    #[error("index already exists. index: {index}")]
    IndexAlreadyExists { index: String },

    #[error("an unknown error occurred. method: {method:?} details: {details}")]
    Unknown {
        details: String,
        method: Option<String>,
    },
}

impl OpensearchClientError {
    /// True when the cluster could not be reached or kept failing with a transient status.
    /// These are the errors left over once the retry policy gave up.
    pub fn is_unavailable(&self) -> bool {
        match self {
            OpensearchClientError::ConnectionFailed { .. }
            | OpensearchClientError::Timeout { .. } => true,
            OpensearchClientError::NetworkError { status_code, .. } => {
                StatusCode::from_u16(*status_code)
                    .map(crate::retry::is_transient_status)
                    .unwrap_or(false)
            }
            _ => false,
        }
    }

    pub(crate) fn from_transport(err: &opensearch::Error, method: &str) -> Self {
        if err.is_timeout() {
            OpensearchClientError::Timeout {
                method: Some(method.to_string()),
            }
        } else {
            OpensearchClientError::ConnectionFailed {
                details: err.to_string(),
                method: Some(method.to_string()),
            }
        }
    }
}

pub trait ResponseExt {
    #[allow(async_fn_in_trait)]
    async fn map_client_error(self, method: &str) -> Result<Response, OpensearchClientError>;
}

impl ResponseExt for Response {
    async fn map_client_error(self, method: &str) -> Result<Response, OpensearchClientError> {
        let status_code = self.status_code();
        if status_code.is_success() {
            return Ok(self);
        }

        let message = self.text().await.unwrap_or_default();
        tracing::error!(
            status_code = ?status_code,
            body = %message,
            method = %method,
            "opensearch returned an error",
        );

        Err(OpensearchClientError::NetworkError {
            status_code: status_code.as_u16(),
            message,
        })
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    method: &str,
) -> Result<T, OpensearchClientError> {
    response
        .json::<T>()
        .await
        .map_err(|err| OpensearchClientError::DeserializationFailed {
            details: err.to_string(),
            method: Some(method.to_string()),
        })
}
