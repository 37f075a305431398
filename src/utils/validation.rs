use crate::utils::error::{DailiesError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(DailiesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DailiesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 使用者輸入的必填文字欄位，去除前後空白後不得為空
pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DailiesError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Validates and returns the trimmed form that gets stored.
pub fn required_text(field_name: &str, value: &str) -> Result<String> {
    validate_non_empty_string(field_name, value)?;
    Ok(value.trim().to_string())
}

/// BCP 47 風格的語系標籤，例如 `en`、`zh-TW`
pub fn validate_locale_tag(field_name: &str, locale: &str) -> Result<()> {
    let valid = !locale.is_empty()
        && locale.split(['-', '_']).all(|part| {
            !part.is_empty() && part.len() <= 8 && part.chars().all(|c| c.is_ascii_alphanumeric())
        });

    if !valid {
        return Err(DailiesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: locale.to_string(),
            reason: "Expected a locale tag such as `en` or `zh-TW`".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.path", "./data/commissions.json").is_ok());
        assert!(validate_path("storage.path", "").is_err());
        assert!(validate_path("storage.path", "   ").is_err());
        assert!(validate_path("storage.path", "bad\0path").is_err());
    }

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("realm", "  Bastion ").unwrap(), "Bastion");

        let err = required_text("realm", " \t\n").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_validate_locale_tag() {
        assert!(validate_locale_tag("app.locale", "en").is_ok());
        assert!(validate_locale_tag("app.locale", "zh-TW").is_ok());
        assert!(validate_locale_tag("app.locale", "pt_BR").is_ok());
        assert!(validate_locale_tag("app.locale", "").is_err());
        assert!(validate_locale_tag("app.locale", "en--US").is_err());
        assert!(validate_locale_tag("app.locale", "en US").is_err());
    }
}
