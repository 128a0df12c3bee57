use crate::client::ClientError;
use crate::entry::ExpenseInputError;
use crate::onboarding::PledgeError;
use crate::period::PeriodError;
use crate::views::{ExpenseSubmitError, PledgeSubmitError};
use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let status = match &err {
            ClientError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<PledgeError> for AppError {
    fn from(err: PledgeError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ExpenseInputError> for AppError {
    fn from(err: ExpenseInputError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ExpenseSubmitError> for AppError {
    fn from(err: ExpenseSubmitError) -> Self {
        match err {
            ExpenseSubmitError::Rejected(err) => err.into(),
            ExpenseSubmitError::Upstream(err) => err.into(),
        }
    }
}

impl From<PledgeSubmitError> for AppError {
    fn from(err: PledgeSubmitError) -> Self {
        match err {
            PledgeSubmitError::Rejected(err) => err.into(),
            PledgeSubmitError::Upstream(err) => err.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failures_map_to_gateway_statuses() {
        let timeout = AppError::from(ClientError::Timeout {
            path: "/api/user/1/missions".to_string(),
        });
        assert_eq!(timeout.status, StatusCode::GATEWAY_TIMEOUT);

        let status = AppError::from(ClientError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "bad init data".to_string(),
        });
        assert_eq!(status.status, StatusCode::BAD_GATEWAY);
        assert!(status.message.contains("bad init data"));
    }

    #[test]
    fn validation_failures_are_bad_requests() {
        let err = AppError::from(PledgeSubmitError::Rejected(PledgeError::Empty));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Please enter the pledge text");

        let err = AppError::from(PeriodError::HalfConfigured);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = AppError::from(ExpenseSubmitError::Rejected(ExpenseInputError::AmountTooLarge));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "amount is too large");
    }
}
