/// Shared request-field validators
use validator::ValidationError;

/// Mobile numbers: optional leading `+`, then 8 to 15 digits.
pub fn validate_mobile_number(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('+').unwrap_or(value);

    if digits.len() < 8 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("mobile_number"));
    }

    Ok(())
}

/// Usernames: lowercase alphanumerics, dots and underscores.
pub fn validate_username_shape(value: &str) -> Result<(), ValidationError> {
    let ok = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_');

    if !ok || value.is_empty() {
        return Err(ValidationError::new("username"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_plus_prefixed_numbers() {
        assert!(validate_mobile_number("0412345678").is_ok());
        assert!(validate_mobile_number("+61412345678").is_ok());
    }

    #[test]
    fn rejects_short_and_non_numeric() {
        assert!(validate_mobile_number("1234567").is_err());
        assert!(validate_mobile_number("04123abc78").is_err());
        assert!(validate_mobile_number("+").is_err());
    }

    #[test]
    fn rejects_uppercase_usernames() {
        assert!(validate_username_shape("jane_doe.1").is_ok());
        assert!(validate_username_shape("JaneDoe").is_err());
        assert!(validate_username_shape("").is_err());
    }
}
