//! Free-text address segmentation

use crate::address::ParsedAddress;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

/// Global parser instance
static GLOBAL_PARSER: Lazy<AddressParser> = Lazy::new(AddressParser::new);

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Centrally-governed cities and the spellings accepted for each
const CITY_SPELLINGS: [(&str, &str); 6] = [
    ("ho_chi_minh", "Hồ Chí Minh|Ho Chi Minh|HCM"),
    ("ha_noi", "Hà Nội|Ha Noi|Hanoi"),
    ("da_nang", "Đà Nẵng|Da Nang|Danang"),
    ("hai_phong", "Hải Phòng|Hai Phong|Haiphong"),
    ("can_tho", "Cần Thơ|Can Tho|Cantho"),
    ("hue", "Huế|Hue"),
];

/// One extraction rule: an optional unit prefix followed by the captured name
#[derive(Debug)]
struct Rule {
    label: &'static str,
    pattern: Regex,
}

/// Accepted rule hit
#[derive(Debug, PartialEq, Eq)]
struct RuleMatch {
    label: &'static str,
    value: String,
    span: Range<usize>,
}

impl Rule {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            pattern: Regex::new(pattern).expect("address rule pattern is valid"),
        }
    }

    /// City name anchored at the end, with an optional "Thành phố"/"TP." lead
    fn city(label: &'static str, spellings: &str) -> Self {
        Self::new(
            label,
            &format!(r"(?i),?\s*(?:Thành phố\s+|TP\.?\s*)?(?P<name>[^,]*(?:{spellings}))\s*$"),
        )
    }

    /// Unit written out (`long`) or abbreviated (`short`), name up to the next comma
    fn unit(label: &'static str, long: &str, short: &str) -> Self {
        Self::new(
            label,
            &format!(r"(?i),?\s*\b(?P<prefix>{long}\s+|{short}\.?\s*)(?P<name>[^,]*[^,\s])"),
        )
    }

    /// Leftmost acceptable hit in `text`
    fn find(&self, text: &str) -> Option<RuleMatch> {
        let mut start = 0;
        while start <= text.len() {
            let caps = self.pattern.captures_at(text, start)?;
            let whole = caps.get(0)?;
            let name = caps.name("name")?;

            if Self::accepts(&caps, name.as_str()) {
                return Some(RuleMatch {
                    label: self.label,
                    value: name.as_str().trim().to_string(),
                    span: whole.range(),
                });
            }

            start = whole.start()
                + text[whole.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
        }
        None
    }

    /// A bare abbreviation ("Q", "P", "TX", ...) counts only when followed by a
    /// dot, whitespace or a number. "Quang Trung" is a street, not "Q. uang Trung".
    fn accepts(caps: &Captures<'_>, name: &str) -> bool {
        match caps.name("prefix") {
            None => true,
            Some(prefix) => {
                prefix.as_str().ends_with(|c: char| c == '.' || c.is_whitespace())
                    || name.starts_with(|c: char| c.is_ascii_digit())
            }
        }
    }
}

/// Ordered rules for one administrative tier. The first rule with a hit wins.
#[derive(Debug)]
struct Tier {
    rules: Vec<Rule>,
}

impl Tier {
    fn extract(&self, text: &str) -> Option<RuleMatch> {
        self.rules.iter().find_map(|rule| rule.find(text))
    }
}

/// Vietnamese address parser.
///
/// Splits a raw address into street, ward, district and province by
/// peeling tiers off the string in the order province, district, ward.
/// Addresses are written specific-to-general, so the province is looked for
/// at the end and whatever survives all three tiers is the street.
#[derive(Debug)]
pub struct AddressParser {
    provinces: Tier,
    districts: Tier,
    wards: Tier,
}

impl AddressParser {
    /// Create a parser with the built-in rule tables
    pub fn new() -> Self {
        let mut province_rules: Vec<Rule> = CITY_SPELLINGS
            .iter()
            .map(|&(label, spellings)| Rule::city(label, spellings))
            .collect();
        province_rules.push(Rule::new(
            "province",
            r"(?i),?\s*(?:Tỉnh\s+|Thành phố\s+)(?P<name>[^,]+?)\s*$",
        ));

        Self {
            provinces: Tier {
                rules: province_rules,
            },
            districts: Tier {
                rules: vec![
                    Rule::unit("quan", "Quận", "Q"),
                    Rule::unit("huyen", "Huyện", "H"),
                    Rule::unit("thanh_pho", "Thành phố", "TP"),
                    Rule::unit("thi_xa", "Thị xã", "TX"),
                ],
            },
            wards: Tier {
                rules: vec![
                    Rule::unit("phuong", "Phường", "P"),
                    Rule::unit("xa", "Xã", "X"),
                    Rule::unit("thi_tran", "Thị trấn", "TT"),
                ],
            },
        }
    }

    /// Get the global parser instance
    pub fn global() -> &'static AddressParser {
        &GLOBAL_PARSER
    }

    /// Parse an address string.
    ///
    /// Tiers without a hit are left empty. Blank input gives a result with
    /// every component empty.
    ///
    /// ```rust
    /// use vnaddr::AddressParser;
    ///
    /// let parser = AddressParser::new();
    /// let r = parser.parse("45 Quang Trung, P.10, Q. Gò Vấp, TP.HCM");
    /// assert_eq!(r.street, "45 Quang Trung");
    /// assert_eq!(r.ward, "10");
    /// assert_eq!(r.district, "Gò Vấp");
    /// assert_eq!(r.province, "HCM");
    /// ```
    pub fn parse(&self, address: &str) -> ParsedAddress {
        if address.trim().is_empty() {
            return ParsedAddress {
                original: address.to_string(),
                ..ParsedAddress::empty()
            };
        }

        let mut remaining = clean(address);
        let mut result = ParsedAddress {
            original: address.to_string(),
            ..ParsedAddress::default()
        };

        for (tier, slot) in [
            (&self.provinces, &mut result.province),
            (&self.districts, &mut result.district),
            (&self.wards, &mut result.ward),
        ] {
            if let Some(hit) = tier.extract(&remaining) {
                log::trace!("rule {} matched {:?}", hit.label, hit.value);
                remaining = remove_span(&remaining, hit.span);
                *slot = hit.value;
            }
        }

        result.street = remaining.trim().to_string();
        log::debug!(
            "Parsed {:?} -> street={:?} ward={:?} district={:?} province={:?}",
            address,
            result.street,
            result.ward,
            result.district,
            result.province
        );

        result
    }

    /// Parse a list of addresses
    pub fn parse_batch(&self, addresses: &[&str]) -> Vec<ParsedAddress> {
        addresses.iter().map(|a| self.parse(a)).collect()
    }
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse whitespace, unify separators to commas, drop trailing separators
fn clean(address: &str) -> String {
    let collapsed = WHITESPACE.replace_all(address.trim(), " ");
    collapsed
        .replace([';', '|'], ",")
        .trim_end_matches([',', ' '])
        .to_string()
}

/// Cut `span` out of `text` and trim separators left at either end
fn remove_span(text: &str, span: Range<usize>) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..span.start]);
    out.push_str(&text[span.end..]);
    out.trim_matches([',', ' ']).to_string()
}
