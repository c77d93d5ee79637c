//! Lexical path canonicalization.

use crate::error::{CacheError, Result};

/// Normalizes an absolute path without touching the filesystem.
///
/// Drops empty and `.` components and resolves `..` against the preceding
/// component, never climbing above `/`.
///
/// # Errors
/// `InvalidInput` for empty, relative, or NUL-containing paths.
pub fn canonicalize(path: &str) -> Result<String> {
    if path.is_empty() {
        return Err(CacheError::InvalidInput("Path cannot be empty".to_string()));
    }
    if path.contains('\0') {
        return Err(CacheError::InvalidInput(
            "Path contains a NUL byte".to_string(),
        ));
    }
    if !path.starts_with('/') {
        return Err(CacheError::InvalidInput(format!(
            "Path must be absolute: {}",
            path
        )));
    }

    let mut components: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }

    if components.is_empty() {
        return Ok("/".to_string());
    }

    let mut canonical = String::with_capacity(path.len());
    for component in components {
        canonical.push('/');
        canonical.push_str(component);
    }
    Ok(canonical)
}
