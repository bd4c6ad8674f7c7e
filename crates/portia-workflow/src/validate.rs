//! Spider name validation

use crate::error::RenameError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Allowed spider names: alphanumeric start, then alphanumerics, `_`, `.`, `-`
pub const SPIDER_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.-]*$";

/// Warning shown when a name is rejected
pub const INVALID_NAME_MESSAGE: &str =
    "Invalid spider name. Only letters, numbers, underscores, dashes and dots are allowed.";

static SPIDER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(SPIDER_NAME_PATTERN).expect("spider name pattern compiles"));

/// Check a candidate spider name
///
/// # Errors
/// `RenameError::InvalidName` if the name is empty or uses other characters
pub fn validate_spider_name(name: &str) -> Result<(), RenameError> {
    if SPIDER_NAME.is_match(name) {
        Ok(())
    } else {
        Err(RenameError::InvalidName {
            name: name.to_owned(),
        })
    }
}
