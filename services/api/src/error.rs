use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use yamdb_auth_types::permission::PermissionDenied;
use yamdb_domain::validation::FieldErrors;

/// API error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication credentials were not provided")]
    NotAuthenticated,
    #[error("you do not have permission to perform this action")]
    Forbidden,
    #[error("title not found")]
    TitleNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("genre not found")]
    GenreNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("no user with this email and confirmation code")]
    InvalidConfirmationCode,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("you have already reviewed this title")]
    DuplicateReview,
    #[error("invalid input")]
    Validation(FieldErrors),
    #[error("category is used by existing titles")]
    CategoryInUse,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::TitleNotFound => "TITLE_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::CommentNotFound => "COMMENT_NOT_FOUND",
            Self::GenreNotFound => "GENRE_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidConfirmationCode => "INVALID_CONFIRMATION_CODE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::DuplicateReview => "DUPLICATE_REVIEW",
            Self::Validation(_) => "VALIDATION",
            Self::CategoryInUse => "CATEGORY_IN_USE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated | Self::InvalidCredentials | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::TitleNotFound
            | Self::ReviewNotFound
            | Self::CommentNotFound
            | Self::GenreNotFound
            | Self::CategoryNotFound
            | Self::UserNotFound
            | Self::InvalidConfirmationCode => StatusCode::NOT_FOUND,
            Self::DuplicateReview | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::CategoryInUse => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PermissionDenied> for ApiError {
    fn from(denied: PermissionDenied) -> Self {
        match denied {
            PermissionDenied::NotAuthenticated => Self::NotAuthenticated,
            PermissionDenied::Forbidden => Self::Forbidden,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx responses are already visible in the TraceLayer span.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(fields) = &self {
            body["fields"] = serde_json::to_value(fields).unwrap_or_default();
        }
        (status, axum::Json(body)).into_response()
    }
}
