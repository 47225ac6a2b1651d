pub mod health;
pub mod hotel;
pub mod matcher;
pub mod pet;
pub mod user;

/// Submitted value without the surrounding whitespace, escaping is left to
/// the templates
pub(crate) fn trimmed(value: &str) -> String {
    value.trim().to_string()
}
