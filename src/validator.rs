//! Cheap sanity checks on raw input and parsed components

use crate::address::FullAddress;
use once_cell::sync::Lazy;
use regex::Regex;

/// Letters incl. Vietnamese diacritics, digits, whitespace and `. - / ,`
static RAW_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-ZÀ-ỹ0-9\s.\-/,]+$").expect("raw charset pattern is valid")
});

/// Same as [`RAW_CHARSET`] without the comma
static COMPONENT_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-ZÀ-ỹ0-9\s.\-/]+$").expect("component charset pattern is valid")
});

const RAW_MIN_CHARS: usize = 3;
const RAW_MAX_CHARS: usize = 500;
const COMPONENT_MAX_CHARS: usize = 200;

/// Advisory pre-filter. The resolver does not depend on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressValidator;

impl AddressValidator {
    pub fn new() -> Self {
        Self
    }

    /// Whether a raw address string is worth parsing
    pub fn is_valid_raw(&self, address: &str) -> bool {
        let trimmed = address.trim();
        let len = trimmed.chars().count();

        (RAW_MIN_CHARS..=RAW_MAX_CHARS).contains(&len) && RAW_CHARSET.is_match(trimmed)
    }

    /// Whether segmented components look like an address.
    ///
    /// Needs a ward or a province, and every non-empty component must pass
    /// the comma-free charset and be at most 200 characters long.
    pub fn is_valid_components(&self, components: &FullAddress) -> bool {
        if components.ward.trim().is_empty() && components.province.trim().is_empty() {
            return false;
        }

        [
            &components.ward,
            &components.district,
            &components.province,
            &components.street,
        ]
        .into_iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .all(Self::is_valid_component)
    }

    fn is_valid_component(component: &str) -> bool {
        component.chars().count() <= COMPONENT_MAX_CHARS && COMPONENT_CHARSET.is_match(component)
    }
}
