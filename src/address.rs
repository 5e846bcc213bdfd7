//! Address and conversion result types

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Join the non-empty parts with ", "
fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Old-format address: street, ward, district, province
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FullAddress {
    /// Ward (phường / xã / thị trấn)
    pub ward: String,
    /// District (quận / huyện / thị xã / thành phố thuộc tỉnh)
    pub district: String,
    /// Province or centrally-governed city
    pub province: String,
    /// House number and street
    pub street: String,
}

impl FullAddress {
    pub fn new(
        ward: impl Into<String>,
        district: impl Into<String>,
        province: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        Self {
            ward: ward.into(),
            district: district.into(),
            province: province.into(),
            street: street.into(),
        }
    }

    /// "street, ward, district, province", skipping empty parts
    pub fn formatted(&self) -> String {
        join_parts(&[
            self.street.as_str(),
            self.ward.as_str(),
            self.district.as_str(),
            self.province.as_str(),
        ])
    }
}

impl fmt::Display for FullAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// New-format address. The district tier no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewAddress {
    pub ward: String,
    pub province: String,
    pub street: String,
}

impl NewAddress {
    pub fn new(
        ward: impl Into<String>,
        province: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        Self {
            ward: ward.into(),
            province: province.into(),
            street: street.into(),
        }
    }

    /// "street, ward, province", skipping empty parts
    pub fn formatted(&self) -> String {
        join_parts(&[
            self.street.as_str(),
            self.ward.as_str(),
            self.province.as_str(),
        ])
    }
}

impl fmt::Display for NewAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Segments extracted from a raw address string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedAddress {
    pub street: String,
    pub ward: String,
    pub district: String,
    pub province: String,
    /// Input exactly as given to the parser
    pub original: String,
}

impl ParsedAddress {
    /// Empty result, returned for blank input
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no component was recovered
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.ward.is_empty()
            && self.district.is_empty()
            && self.province.is_empty()
    }

    pub fn has_ward(&self) -> bool {
        !self.ward.is_empty()
    }

    pub fn has_district(&self) -> bool {
        !self.district.is_empty()
    }

    pub fn has_province(&self) -> bool {
        !self.province.is_empty()
    }

    pub fn to_full_address(&self) -> FullAddress {
        FullAddress::new(&self.ward, &self.district, &self.province, &self.street)
    }

    pub fn into_full_address(self) -> FullAddress {
        FullAddress {
            ward: self.ward,
            district: self.district,
            province: self.province,
            street: self.street,
        }
    }
}

/// How an old ward relates to its new ward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MappingType {
    /// Same code on both sides
    Exact,
    /// Same area under a new name
    Renamed,
    /// Several old wards folded into one new ward
    Merged,
    /// Not touched by the reform, found in the current ward table
    Unchanged,
    /// Code changed without any other criterion applying
    Mapped,
}

impl MappingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingType::Exact => "exact",
            MappingType::Renamed => "renamed",
            MappingType::Merged => "merged",
            MappingType::Unchanged => "unchanged",
            MappingType::Mapped => "mapped",
        }
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codes on both sides of a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MappingInfo {
    pub old_ward_code: Option<String>,
    pub new_ward_code: Option<String>,
    pub mapping_type: MappingType,
}

impl MappingInfo {
    pub fn new(
        old_ward_code: Option<String>,
        new_ward_code: Option<String>,
        mapping_type: MappingType,
    ) -> Self {
        Self {
            old_ward_code,
            new_ward_code,
            mapping_type,
        }
    }
}

/// What a conversion produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Converted {
        address: NewAddress,
        mapping: MappingInfo,
    },
    Failed {
        message: String,
    },
}

/// Result of converting one address.
///
/// A successful result always carries both the new address and the mapping
/// info; a failed one carries only a message. [`Outcome`] makes any other
/// combination unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "ResultRecord", try_from = "ResultRecord")
)]
pub struct ConversionResult {
    original: FullAddress,
    outcome: Outcome,
}

impl ConversionResult {
    pub fn converted(original: FullAddress, address: NewAddress, mapping: MappingInfo) -> Self {
        Self {
            original,
            outcome: Outcome::Converted { address, mapping },
        }
    }

    pub fn failed(original: FullAddress, message: impl Into<String>) -> Self {
        Self {
            original,
            outcome: Outcome::Failed {
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Converted { .. })
    }

    /// Address as it was understood before conversion
    pub fn original(&self) -> &FullAddress {
        &self.original
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn converted_address(&self) -> Option<&NewAddress> {
        match &self.outcome {
            Outcome::Converted { address, .. } => Some(address),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn mapping_info(&self) -> Option<&MappingInfo> {
        match &self.outcome {
            Outcome::Converted { mapping, .. } => Some(mapping),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Converted { .. } => None,
            Outcome::Failed { message } => Some(message),
        }
    }

    /// Pretty-printed JSON, absent fields omitted
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Flat wire shape of [`ConversionResult`]
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultRecord {
    success: bool,
    original_address: FullAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    converted_address: Option<NewAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mapping_info: Option<MappingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[cfg(feature = "serde")]
impl From<ConversionResult> for ResultRecord {
    fn from(result: ConversionResult) -> Self {
        match result.outcome {
            Outcome::Converted { address, mapping } => Self {
                success: true,
                original_address: result.original,
                converted_address: Some(address),
                mapping_info: Some(mapping),
                message: None,
            },
            Outcome::Failed { message } => Self {
                success: false,
                original_address: result.original,
                converted_address: None,
                mapping_info: None,
                message: Some(message),
            },
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<ResultRecord> for ConversionResult {
    type Error = String;

    fn try_from(record: ResultRecord) -> std::result::Result<Self, Self::Error> {
        match (
            record.success,
            record.converted_address,
            record.mapping_info,
            record.message,
        ) {
            (true, Some(address), Some(mapping), None) => {
                Ok(Self::converted(record.original_address, address, mapping))
            }
            (false, None, None, Some(message)) => {
                Ok(Self::failed(record.original_address, message))
            }
            _ => Err("success must hold exactly when convertedAddress and mappingInfo are present"
                .to_string()),
        }
    }
}

/// Input accepted by [`crate::AddressConverter::convert_address`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressInput<'a> {
    /// Free text, segmented by the parser first
    Raw(&'a str),
    /// Already segmented, goes straight to the resolver
    Structured(FullAddress),
}

impl<'a> From<&'a str> for AddressInput<'a> {
    fn from(raw: &'a str) -> Self {
        AddressInput::Raw(raw)
    }
}

impl<'a> From<&'a String> for AddressInput<'a> {
    fn from(raw: &'a String) -> Self {
        AddressInput::Raw(raw.as_str())
    }
}

impl From<FullAddress> for AddressInput<'_> {
    fn from(address: FullAddress) -> Self {
        AddressInput::Structured(address)
    }
}

impl From<&FullAddress> for AddressInput<'_> {
    fn from(address: &FullAddress) -> Self {
        AddressInput::Structured(address.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go_vap() -> FullAddress {
        FullAddress::new(
            "Phường 12",
            "Quận Gò Vấp",
            "Thành phố Hồ Chí Minh",
            "123 Nguyễn Văn Cừ",
        )
    }

    #[test]
    fn test_full_address_formatted() {
        assert_eq!(
            go_vap().formatted(),
            "123 Nguyễn Văn Cừ, Phường 12, Quận Gò Vấp, Thành phố Hồ Chí Minh"
        );

        let no_street = FullAddress::new("Phường 12", "", "Thành phố Hồ Chí Minh", "");
        assert_eq!(no_street.to_string(), "Phường 12, Thành phố Hồ Chí Minh");
    }

    #[test]
    fn test_new_address_formatted() {
        let addr = NewAddress::new("Phường An Hội Tây", "Thành phố Hồ Chí Minh", "");
        assert_eq!(addr.formatted(), "Phường An Hội Tây, Thành phố Hồ Chí Minh");
    }

    #[test]
    fn test_parsed_address_into_full() {
        let parsed = ParsedAddress {
            street: "5 Lê Lợi".to_string(),
            ward: "12".to_string(),
            district: "Gò Vấp".to_string(),
            province: "Hồ Chí Minh".to_string(),
            original: "5 Lê Lợi, P.12, Q. Gò Vấp, TP.HCM".to_string(),
        };
        assert!(!parsed.is_empty());
        assert!(parsed.has_ward() && parsed.has_district() && parsed.has_province());

        let full = parsed.into_full_address();
        assert_eq!(full, FullAddress::new("12", "Gò Vấp", "Hồ Chí Minh", "5 Lê Lợi"));
        assert!(ParsedAddress::empty().is_empty());
    }

    #[test]
    fn test_conversion_result_success_invariant() {
        let ok = ConversionResult::converted(
            go_vap(),
            NewAddress::new("Phường An Hội Tây", "Thành phố Hồ Chí Minh", "123 Nguyễn Văn Cừ"),
            MappingInfo::new(
                Some("26890".to_string()),
                Some("26882".to_string()),
                MappingType::Merged,
            ),
        );
        assert!(ok.is_success());
        assert!(ok.converted_address().is_some());
        assert!(ok.mapping_info().is_some());
        assert_eq!(ok.message(), None);

        let failed = ConversionResult::failed(go_vap(), "Address not found in mapping data");
        assert!(!failed.is_success());
        assert!(failed.converted_address().is_none());
        assert!(failed.mapping_info().is_none());
        assert_eq!(failed.message(), Some("Address not found in mapping data"));
    }

    #[test]
    fn test_mapping_type_display() {
        assert_eq!(MappingType::Merged.to_string(), "merged");
        assert_eq!(MappingType::Unchanged.as_str(), "unchanged");
    }

    #[test]
    fn test_address_input_from() {
        assert_eq!(AddressInput::from("Phường 1"), AddressInput::Raw("Phường 1"));
        assert_eq!(
            AddressInput::from(&go_vap()),
            AddressInput::Structured(go_vap())
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_result_json_omits_absent_fields() {
        let failed = ConversionResult::failed(FullAddress::default(), "Address cannot be empty");
        let value: serde_json::Value = serde_json::from_str(&failed.to_json().unwrap()).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Address cannot be empty");
        assert!(value.get("convertedAddress").is_none());
        assert!(value.get("mappingInfo").is_none());
        assert!(value.get("originalAddress").is_some());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_result_json_success_shape() {
        let ok = ConversionResult::converted(
            go_vap(),
            NewAddress::new("Phường An Hội Tây", "Thành phố Hồ Chí Minh", "123 Nguyễn Văn Cừ"),
            MappingInfo::new(None, Some("26882".to_string()), MappingType::Unchanged),
        );
        let json = ok.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["convertedAddress"]["ward"], "Phường An Hội Tây");
        assert_eq!(value["mappingInfo"]["mappingType"], "unchanged");
        assert!(value["mappingInfo"]["oldWardCode"].is_null());
        assert!(value.get("message").is_none());

        let back: ConversionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ok);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_result_json_rejects_inconsistent_record() {
        let bad = r#"{"success": true, "originalAddress": {"ward": "", "district": "", "province": "", "street": ""}, "message": "x"}"#;
        assert!(serde_json::from_str::<ConversionResult>(bad).is_err());
    }
}
