//! Short code generation.
//!
//! Codes are drawn uniformly from `[A-Za-z0-9]`.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Default number of characters in a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Shortest and longest code the link table accepts.
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 10;

/// Codes that would shadow a top-level route.
const RESERVED_CODES: &[&str] = &["links", "stats", "health"];

/// Generates a random alphanumeric code of `length` characters.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Returns true if `code` collides with a route name.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
