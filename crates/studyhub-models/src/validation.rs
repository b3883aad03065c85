//! Custom `validator` checks shared by request DTOs.

use validator::ValidationError;

/// Rejects empty and whitespace-only strings.
///
/// Pair with a message: `#[validate(custom(function = "not_blank", message = "..."))]`.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("  \t").is_err());
    }
}
