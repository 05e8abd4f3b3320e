use validator::Validate;

use crate::error::AppError;

/// Run derive-based validation and flatten failures into a single 400 message.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(|errors| {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| {
                    let reason = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    format!("{field} {reason}")
                })
            })
            .collect();
        messages.sort();
        AppError::BadRequest(messages.join(", "))
    })
}
