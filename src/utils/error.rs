use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use thiserror::Error;
use validator::ValidationErrors;

/// Field name -> messages, as produced by request validation.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(String),

    #[error("Unexpected row shape: {0}")]
    RowShape(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input")]
    InvalidFields(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::DatabaseError(_) | AppError::RowShape(_) => Status::InternalServerError,
            AppError::AuthError(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::ValidationError(_) | AppError::BadRequest(_) => Status::BadRequest,
            AppError::InvalidFields(_) => Status::UnprocessableEntity,
            AppError::NotFound(_) => Status::NotFound,
            AppError::Conflict(_) => Status::Conflict,
        }
    }

    /// Single-field validation failure, shaped like the derive-based ones.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        AppError::InvalidFields(fields)
    }
}

// Decode failures mean the database handed back something our row types
// don't describe; everything else is an ordinary database failure.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_) => AppError::RowShape(err.to_string()),
            _ => AppError::DatabaseError(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for e in errs {
                let message = match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                };
                // struct-level checks are reported under their error code
                let key = if field == "__all__" {
                    e.code.to_string()
                } else {
                    field.to_string()
                };
                fields.entry(key).or_default().push(message);
            }
        }
        AppError::InvalidFields(fields)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// SQLSTATE of a database-side error, if the error came from Postgres.
pub fn sql_state(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|e| e.code())
        .map(|code| code.into_owned())
}

pub const UNIQUE_VIOLATION: &str = "23505";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
pub const RAISED_EXCEPTION: &str = "P0001";

// Format all errors from route level to an HTTP response
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();

        if let AppError::DatabaseError(detail) | AppError::RowShape(detail) = &self {
            tracing::error!(uri = %request.uri(), error = %detail, "request failed");
        }

        let body = match &self {
            AppError::InvalidFields(fields) => json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            _ => json!({
                "error": self.to_string()
            }),
        };

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(body.to_string()))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Contact {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn validation_errors_keep_field_messages() {
        let contact = Contact {
            email: "not-an-email".into(),
            name: String::new(),
        };
        let err: AppError = contact.validate().unwrap_err().into();

        match err {
            AppError::InvalidFields(fields) => {
                assert_eq!(fields["email"], vec!["must be a valid email".to_string()]);
                assert_eq!(fields["name"], vec!["length".to_string()]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn statuses() {
        assert_eq!(AppError::NotFound("x".into()).status(), Status::NotFound);
        assert_eq!(AppError::Forbidden("x".into()).status(), Status::Forbidden);
        assert_eq!(AppError::field("dates", "bad").status(), Status::UnprocessableEntity);
        assert_eq!(
            AppError::RowShape("x".into()).status(),
            Status::InternalServerError
        );
    }
}
