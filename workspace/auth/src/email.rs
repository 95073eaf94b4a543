/// Normalizes an email address by lowercasing its domain part.
///
/// Only the substring after the last `@` is lowercased; the local part keeps
/// its casing. Surrounding whitespace is trimmed when the value contains an
/// `@`. A value without `@` is returned unchanged.
pub fn normalize_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}
