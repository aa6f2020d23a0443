//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use spendview_domain::SpendViewError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SpendViewError);

impl From<InfraError> for SpendViewError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SpendViewError> for InfraError {
    fn from(value: SpendViewError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSpendViewError {
    fn into_spendview(self) -> SpendViewError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SpendViewError */
/* -------------------------------------------------------------------------- */

impl IntoSpendViewError for HttpError {
    fn into_spendview(self) -> SpendViewError {
        if self.is_timeout() {
            return SpendViewError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SpendViewError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return SpendViewError::InvalidInput(format!("malformed HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => SpendViewError::Auth(message),
                404 => SpendViewError::NotFound(message),
                429 => SpendViewError::Network(message),
                400..=499 => SpendViewError::InvalidInput(message),
                _ => SpendViewError::Network(message),
            };
        }

        SpendViewError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_spendview())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → SpendViewError */
/* -------------------------------------------------------------------------- */

impl IntoSpendViewError for std::io::Error {
    fn into_spendview(self) -> SpendViewError {
        match self.kind() {
            std::io::ErrorKind::NotFound => SpendViewError::NotFound(self.to_string()),
            _ => SpendViewError::Internal(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_spendview())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
