//! URL path composition.
//!
//! Paths are joined segment by segment under `/`: empty segments and `.`
//! vanish, so duplicate and trailing separators collapse, and the result is
//! always absolute with no trailing separator unless it is the root itself.

use crate::error::PathError;

/// The root path.
pub const ROOT: &str = "/";

/// Join `segments` onto `base`.
///
/// Each segment may itself contain separators. `..` is rejected so the
/// result always extends `base` on a segment boundary.
pub fn join<I, S>(base: &str, segments: I) -> Result<String, PathError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parts: Vec<String> = Vec::new();
    push_parts(&mut parts, base)?;
    for segment in segments {
        push_parts(&mut parts, segment.as_ref())?;
    }

    if parts.is_empty() {
        return Ok(ROOT.to_string());
    }

    let mut path = String::with_capacity(parts.iter().map(|p| p.len() + 1).sum());
    for part in &parts {
        path.push('/');
        path.push_str(part);
    }
    Ok(path)
}

fn push_parts(parts: &mut Vec<String>, raw: &str) -> Result<(), PathError> {
    for part in raw.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(PathError::ParentSegment(raw.to_string())),
            _ => {
                validate_segment(part)?;
                parts.push(part.to_string());
            }
        }
    }
    Ok(())
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if let Some(ch) = segment
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '?' | '#'))
    {
        return Err(PathError::IllegalCharacter {
            segment: segment.to_string(),
            ch,
        });
    }

    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(PathError::InvalidEscape(segment.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    if segment.chars().skip(1).any(|c| matches!(c, ':' | '*')) {
        return Err(PathError::EmbeddedCapture(segment.to_string()));
    }

    if let Some(name) = segment.strip_prefix(':').or_else(|| segment.strip_prefix('*')) {
        if name.is_empty() {
            return Err(PathError::UnnamedCapture(segment.to_string()));
        }
    }

    Ok(())
}

/// Whether a segment captures a path parameter (`:name` or `*name`).
pub fn is_capture(segment: &str) -> bool {
    segment.starts_with(':') || segment.starts_with('*')
}

/// Check that a wildcard segment only appears last in a complete path.
pub fn check_wildcards(path: &str) -> Result<(), PathError> {
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    while let Some(segment) = segments.next() {
        if segment.starts_with('*') && segments.peek().is_some() {
            return Err(PathError::MisplacedWildcard {
                segment: segment.to_string(),
                path: path.to_string(),
            });
        }
    }
    Ok(())
}
