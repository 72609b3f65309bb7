use crate::config::{NAME_MASK_PREFIX, NAME_MASK_SUFFIX};

/// Light anonymization for public records: the first few characters of the
/// trimmed name followed by a fixed marker.
pub fn mask_name(name: &str) -> String {
    let prefix: String = name.trim().chars().take(NAME_MASK_PREFIX).collect();
    format!("{}{}", prefix, NAME_MASK_SUFFIX)
}
