//! JSON body extractor that runs `validator` rules.
//!
//! Malformed bodies are rejected with 400, rule violations with 422 and a
//! message naming every offending field.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use brs_core::AppError;

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("{}: {}", field, message);
    }
    match (&*error.code, error.params.get("min"), error.params.get("max")) {
        ("length", Some(min), None) => format!("{}: must be at least {} characters", field, min),
        ("length", None, Some(max)) => format!("{}: must be at most {} characters", field, max),
        ("length", Some(min), Some(max)) => {
            format!("{}: must be between {} and {} characters", field, min, max)
        }
        ("range", Some(min), None) => format!("{}: must be at least {}", field, min),
        ("email", _, _) => format!("{}: must be a valid email address", field),
        _ => format!("{}: is invalid", field),
    }
}

/// Field errors sorted by field name, joined with `; `.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errors)| errors.iter().map(move |error| describe(field, error)))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Text between the first pair of backticks in a serde message.
fn quoted(message: &str, after: &str) -> Option<String> {
    message
        .split(after)
        .nth(1)
        .and_then(|rest| rest.split('`').nth(1))
        .map(str::to_string)
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let text = rejection.body_text();

    if text.contains("missing field") {
        let field = quoted(&text, "missing field").unwrap_or_else(|| "unknown".to_string());
        return AppError::bad_request(anyhow!("{} is required", field));
    }
    if text.contains("unknown variant") {
        let value = quoted(&text, "unknown variant").unwrap_or_default();
        return AppError::bad_request(anyhow!("{:?} is not an accepted value", value));
    }
    if text.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }
    if matches!(rejection, JsonRejection::JsonSyntaxError(_)) {
        return AppError::bad_request(anyhow!("Malformed JSON body"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate().map_err(|errors| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!("{}", format_errors(&errors)),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 8))]
        password: String,
        #[validate(email)]
        email: String,
        #[validate(length(max = 3))]
        code: String,
    }

    #[test]
    fn test_format_errors_names_each_field() {
        let signup = Signup {
            password: "short".to_string(),
            email: "not-an-email".to_string(),
            code: "ABCD".to_string(),
        };
        let errors = signup.validate().unwrap_err();

        assert_eq!(
            format_errors(&errors),
            "code: must be at most 3 characters; \
             email: must be a valid email address; \
             password: must be at least 8 characters"
        );
    }

    #[test]
    fn test_quoted_extracts_serde_names() {
        let message = "Failed to deserialize the JSON body into the target type: \
                       roles[0]: unknown variant `wizard`, expected one of `employee`";
        assert_eq!(quoted(message, "unknown variant").as_deref(), Some("wizard"));
        assert_eq!(
            quoted("missing field `username` at line 1", "missing field").as_deref(),
            Some("username")
        );
        assert_eq!(quoted("no ticks here", "missing field"), None);
    }
}
