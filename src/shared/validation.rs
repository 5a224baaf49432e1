use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::core::error::{AppError, Result};
use crate::shared::constants::{AMOUNT_INTEGER_DIGITS, AMOUNT_SCALE};

lazy_static! {
    /// Regex for validating slugs (category/product links)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "nail-polish", "lips", "eye-shadow-2"
    /// - Invalid: "-nails", "nails-", "nail--polish", "Nails", "nail_polish"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Derive a slug from a display name.
///
/// Non-alphanumeric runs collapse into a single hyphen; the result is
/// lowercase ASCII and never starts or ends with a hyphen. Returns `None`
/// when the name has no usable characters.
pub fn slugify(name: &str) -> Option<String> {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// Use the supplied slug or derive one from the name
pub fn resolve_slug(slug: Option<String>, name: &str) -> Result<String> {
    match slug {
        Some(slug) => Ok(slug),
        None => slugify(name).ok_or_else(|| {
            AppError::Validation(format!(
                "Cannot derive a slug from name '{}'; supply one explicitly",
                name
            ))
        }),
    }
}

/// Exclusive upper bound for prices and totals
pub fn amount_limit() -> Decimal {
    Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS))
}

/// Prices must be non-negative, below [`amount_limit`] and carry at most
/// [`AMOUNT_SCALE`] significant decimal places, so the stored value equals
/// the submitted one.
pub fn validate_price(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("negative_price");
        err.message = Some("price must not be negative".into());
        return Err(err);
    }

    if price.abs() >= amount_limit() {
        let mut err = ValidationError::new("price_too_large");
        err.message = Some(format!("price must be below {}", amount_limit()).into());
        return Err(err);
    }

    if price.normalize().scale() > AMOUNT_SCALE {
        let mut err = ValidationError::new("price_scale");
        err.message =
            Some(format!("price must have at most {} decimal places", AMOUNT_SCALE).into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("nail-polish"));
        assert!(SLUG_REGEX.is_match("lips"));
        assert!(SLUG_REGEX.is_match("eye-shadow-2"));
        assert!(SLUG_REGEX.is_match("a"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-nails")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("nails-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("nail--polish")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Nails")); // uppercase
        assert!(!SLUG_REGEX.is_match("nail_polish")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Nail Polish").as_deref(), Some("nail-polish"));
        assert_eq!(slugify("  Eyes & Brows!! ").as_deref(), Some("eyes-brows"));
        assert_eq!(slugify("Lip-Gloss 2").as_deref(), Some("lip-gloss-2"));
        assert_eq!(slugify("Crème"), Some("cr-me".to_string()));
        assert_eq!(slugify("!!!"), None);
    }

    #[test]
    fn test_slugify_output_matches_regex() {
        for name in ["Nails", "New  Arrivals", "50% off", "a-b-c"] {
            let slug = slugify(name).unwrap();
            assert!(SLUG_REGEX.is_match(&slug), "{} -> {}", name, slug);
        }
    }

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug(None, "Nail Polish").unwrap(), "nail-polish");
        assert_eq!(resolve_slug(Some("polish".into()), "Nail Polish").unwrap(), "polish");
        assert!(matches!(resolve_slug(None, "!!!"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(&Decimal::new(1999, 2)).is_ok());
        assert!(validate_price(&Decimal::ZERO).is_ok());
        assert!(validate_price(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_validate_price_fits_storage_column() {
        // Trailing zeros beyond two places are harmless
        assert!(validate_price(&Decimal::new(12500, 3)).is_ok());
        assert!(validate_price(&Decimal::new(9_999_999_999_99, 2)).is_ok());

        let err = validate_price(&Decimal::new(12345, 3)).unwrap_err();
        assert_eq!(err.code, "price_scale");

        let err = validate_price(&amount_limit()).unwrap_err();
        assert_eq!(err.code, "price_too_large");

        let err = validate_price(&Decimal::MAX).unwrap_err();
        assert_eq!(err.code, "price_too_large");
    }
}
