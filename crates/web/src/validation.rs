//! Form validation.
//!
//! A [`Validator`] accumulates per-field and non-field errors while a
//! form runs its checks. The first failure recorded for a field wins;
//! later checks against an already-failed field are silently skipped.
//! Validation never partially applies a write: handlers only proceed
//! when [`Validator::is_valid`] holds.

use std::collections::HashMap;

use snipbin_core::Email;

/// Accumulated validation errors for a submitted form.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    /// Errors not tied to a single field (e.g. bad credentials).
    pub non_field_errors: Vec<String>,
    /// First error recorded per field name.
    pub field_errors: HashMap<String, String>,
}

impl Validator {
    /// True when no checks have failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Record an error not tied to a single field.
    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_owned());
    }

    /// Record an error for a field unless one is already present.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_owned())
            .or_insert_with(|| message.to_owned());
    }

    /// Record `message` for `key` when `ok` is false.
    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }

    /// The error recorded for a field, if any.
    #[must_use]
    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key).map(String::as_str)
    }
}

/// True if `value` contains any non-whitespace character.
#[must_use]
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// True if `value` contains at most `n` characters (not bytes).
#[must_use]
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

/// True if `value` contains at least `n` characters (not bytes).
#[must_use]
pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

/// True if `value` is one of `permitted_values`.
#[must_use]
pub fn permitted<T: PartialEq>(value: T, permitted_values: &[T]) -> bool {
    permitted_values.contains(&value)
}

/// True if `value` is structurally a valid email address.
#[must_use]
pub fn valid_email(value: &str) -> bool {
    Email::parse(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_validator_is_valid() {
        assert!(Validator::default().is_valid());
    }

    #[test]
    fn test_first_field_error_wins() {
        let mut v = Validator::default();
        v.add_field_error("title", "cannot be blank");
        v.add_field_error("title", "too long");
        assert_eq!(v.field_error("title"), Some("cannot be blank"));
        assert!(!v.is_valid());
    }

    #[test]
    fn test_check_field_records_only_failures() {
        let mut v = Validator::default();
        v.check_field(true, "title", "should not appear");
        assert!(v.is_valid());
        v.check_field(false, "title", "failure");
        assert_eq!(v.field_error("title"), Some("failure"));
    }

    #[test]
    fn test_non_field_errors_invalidate() {
        let mut v = Validator::default();
        v.add_non_field_error("Email or password is incorrect");
        assert!(!v.is_valid());
        assert_eq!(v.non_field_errors.len(), 1);
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x"));
        assert!(not_blank("  x  "));
        assert!(!not_blank(""));
        assert!(!not_blank("   \t\n"));
    }

    #[test]
    fn test_max_chars_counts_characters_not_bytes() {
        assert!(max_chars("abc", 3));
        assert!(!max_chars("abcd", 3));
        // 3 characters, 6 bytes
        assert!(max_chars("äöü", 3));
    }

    #[test]
    fn test_min_chars() {
        assert!(min_chars("password", 8));
        assert!(!min_chars("short", 8));
    }

    #[test]
    fn test_permitted() {
        assert!(permitted(7, &[1, 7, 365]));
        assert!(!permitted(9, &[1, 7, 365]));
    }

    #[test]
    fn test_valid_email() {
        assert!(valid_email("user@example.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("user@"));
    }
}
