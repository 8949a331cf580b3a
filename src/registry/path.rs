//! Load-path normalization.
//!
//! Pure string manipulation. No side effects, never fails.

/// Normalize a load path to its registry key.
///
/// Strips one trailing source `suffix` so `models/post.src` and
/// `models/post` key the same entry across repeated loads. Never strips a
/// path down to nothing.
pub fn normalize_load_path(path: &str, suffix: &str) -> String {
    if !suffix.is_empty()
        && let Some(stem) = path.strip_suffix(suffix)
        && !stem.is_empty()
    {
        return stem.to_string();
    }
    path.to_string()
}

// =============================================================================
// Tests
// =============================================================================
