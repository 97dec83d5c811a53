//! Field validators. Each appends messages to a [`FieldErrors`] so a use case
//! can report every failing field at once.

use yamdb_domain::validation::FieldErrors;

use crate::domain::types::{EMAIL_MAX, SLUG_MAX, USERNAME_MAX};

/// Reserved because `/users/me/` is a route.
const RESERVED_USERNAME: &str = "me";

pub fn required(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "this field may not be blank");
    }
}

pub fn max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("ensure this field has no more than {max} characters"));
    }
}

/// Letters, digits and `@ . + - _`, at most 150 characters.
pub fn username(errors: &mut FieldErrors, value: &str) {
    required(errors, "username", value);
    max_len(errors, "username", value, USERNAME_MAX);
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add(
            "username",
            "may contain only letters, digits and @/./+/-/_ characters",
        );
    }
    if value == RESERVED_USERNAME {
        errors.add("username", "this username is reserved");
    }
}

pub fn email(errors: &mut FieldErrors, value: &str) {
    required(errors, "email", value);
    max_len(errors, "email", value, EMAIL_MAX);
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !value.is_empty() && !valid {
        errors.add("email", "enter a valid email address");
    }
}

/// ASCII letters, digits, hyphens and underscores, at most 50 characters.
pub fn slug(errors: &mut FieldErrors, value: &str) {
    required(errors, "slug", value);
    max_len(errors, "slug", value, SLUG_MAX);
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.add(
            "slug",
            "may contain only letters, numbers, underscores or hyphens",
        );
    }
}

/// `0 ≤ year ≤ current_year`.
pub fn year(errors: &mut FieldErrors, value: i32, current_year: i32) {
    if value < 0 {
        errors.add("year", "ensure this value is greater than or equal to 0");
    }
    if value > current_year {
        errors.add(
            "year",
            format!("ensure this value is less than or equal to {current_year}"),
        );
    }
}

pub fn score(errors: &mut FieldErrors, value: i32) {
    if !(1..=10).contains(&value) {
        errors.add("score", "must be between 1 and 10");
    }
}
