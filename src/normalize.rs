//! Matching key for administrative unit names

use once_cell::sync::Lazy;
use regex::Regex;

/// Unit prefixes stripped before comparison. Case-sensitive, so the
/// lowercased output never matches again.
static UNIT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Thành phố|Tỉnh|Quận|Huyện|Phường|Xã|Thị xã|Thị trấn)\s+")
        .expect("unit prefix pattern is valid")
});

/// Equality key for a ward, district or province name.
///
/// Drops one leading unit prefix ("Phường", "Quận", "Thành phố", ...) and
/// lowercases the rest. Only used for matching, never for display.
///
/// ```rust
/// assert_eq!(vnaddr::normalize("Quận Gò Vấp"), "gò vấp");
/// assert_eq!(vnaddr::normalize("Thành phố Hồ Chí Minh"), "hồ chí minh");
/// assert_eq!(vnaddr::normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    UNIT_PREFIX.replace(text, "").trim().to_lowercase()
}

/// [`normalize`] for nullable table fields
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}
