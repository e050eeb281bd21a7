//! Branch name validation following git-style conventions.
//!
//! Valid branch names:
//! - Must be non-empty
//! - Must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - Must not contain `..` (double dot)
//! - Must not start or end with `.` or `/`
//! - Must not end with `.lock`
//! - Must not contain consecutive slashes (`//`)
//! - Components between slashes must be non-empty and not start with `.`

use crate::error::{BranchError, BranchResult};

/// Characters that are forbidden anywhere in a branch name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a branch name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use sema_branch::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("feature/auth").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("bad..name").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> BranchResult<()> {
    let invalid = |reason: &str| BranchError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("branch name must not be empty"));
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(BranchError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    if name.contains("..") {
        return Err(invalid("must not contain '..'"));
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(invalid("must not start or end with '.'"));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(invalid("must not start or end with '/'"));
    }

    if name.ends_with(".lock") {
        return Err(invalid("must not end with '.lock'"));
    }

    if name.contains("//") {
        return Err(invalid("must not contain consecutive slashes '//'"));
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err(BranchError::InvalidName {
                name: name.to_string(),
                reason: format!("component must not start with '.': {component:?}"),
            });
        }
    }

    Ok(())
}
