//! Old ward -> new ward resolution

use crate::address::{ConversionResult, FullAddress, MappingInfo, MappingType, NewAddress};
use crate::data::{AddressData, WardMapping};
use crate::error::{ConvertError, Result};

/// Message of a failed result when neither table has the address
pub const NOT_FOUND_MESSAGE: &str = "Address not found in mapping data";

/// Matches structured addresses against the mapping and ward tables
#[derive(Debug, Clone, Copy)]
pub struct MappingResolver<'a> {
    data: &'a AddressData,
}

impl<'a> MappingResolver<'a> {
    pub fn new(data: &'a AddressData) -> Self {
        Self { data }
    }

    /// Resolve one address.
    ///
    /// Tries the mapping table first, then the current ward table. Never
    /// fails: a missing match or a malformed row becomes a failed result.
    pub fn resolve(&self, address: FullAddress) -> ConversionResult {
        match self.try_resolve(&address) {
            Ok(Some((converted, mapping))) => {
                log::debug!(
                    "Resolved {:?} -> {:?} ({})",
                    address.formatted(),
                    converted.formatted(),
                    mapping.mapping_type
                );
                ConversionResult::converted(address, converted, mapping)
            }
            Ok(None) => {
                log::debug!("No mapping for {:?}", address.formatted());
                ConversionResult::failed(address, NOT_FOUND_MESSAGE)
            }
            Err(e) => {
                log::warn!("Conversion of {:?} failed: {}", address.formatted(), e);
                ConversionResult::failed(address, format!("Error during conversion: {e}"))
            }
        }
    }

    fn try_resolve(&self, address: &FullAddress) -> Result<Option<(NewAddress, MappingInfo)>> {
        if let Some((row, mapping)) = self.find_ward_mapping(address) {
            let ward = required(mapping.new_ward_name.as_deref(), "new_ward_name", row)?;
            let province =
                required(mapping.new_province_name.as_deref(), "new_province_name", row)?;

            return Ok(Some((
                NewAddress::new(ward, province, &address.street),
                MappingInfo::new(
                    mapping.old_ward_code.clone(),
                    mapping.new_ward_code.clone(),
                    self.determine_mapping_type(mapping),
                ),
            )));
        }

        if let Some((ward, province)) = self.data.find_ward(&address.ward, &address.province) {
            return Ok(Some((
                NewAddress::new(&ward.name, &province.name, &address.street),
                MappingInfo::new(None, Some(ward.ward_code.clone()), MappingType::Unchanged),
            )));
        }

        Ok(None)
    }

    /// First mapping row (and its position) whose old ward, district and
    /// province equal the address after normalization
    pub fn find_ward_mapping(&self, address: &FullAddress) -> Option<(usize, &'a WardMapping)> {
        self.data
            .find_mapping(&address.ward, &address.district, &address.province)
    }

    /// Classify a mapping row. Precedence: merged, renamed, exact, mapped.
    pub fn determine_mapping_type(&self, mapping: &WardMapping) -> MappingType {
        let shared = mapping
            .new_ward_code
            .as_deref()
            .map_or(0, |code| self.data.mappings_into(code));

        if shared > 1 {
            MappingType::Merged
        } else if mapping.new_ward_name.as_deref() != Some(mapping.old_ward_name.as_str()) {
            MappingType::Renamed
        } else if mapping.old_ward_code == mapping.new_ward_code {
            MappingType::Exact
        } else {
            MappingType::Mapped
        }
    }
}

fn required<'m>(value: Option<&'m str>, field: &'static str, row: usize) -> Result<&'m str> {
    value.ok_or(ConvertError::MissingField { field, row })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::{fixture, mapping, province};

    const HCM: &str = "Thành phố Hồ Chí Minh";

    fn go_vap(ward: &str) -> FullAddress {
        FullAddress::new(ward, "Quận Gò Vấp", HCM, "")
    }

    #[test]
    fn test_merged_wards_share_target() {
        let data = fixture();
        let resolver = MappingResolver::new(&data);

        let a = resolver.resolve(go_vap("Phường 12"));
        let b = resolver.resolve(go_vap("Phường 14"));

        assert!(a.is_success() && b.is_success());
        assert_eq!(a.converted_address(), b.converted_address());
        assert_eq!(a.converted_address().unwrap().ward, "Phường An Hội Tây");
        assert_eq!(a.mapping_info().unwrap().mapping_type, MappingType::Merged);
        assert_eq!(b.mapping_info().unwrap().mapping_type, MappingType::Merged);
        assert_eq!(a.mapping_info().unwrap().old_ward_code.as_deref(), Some("26896"));
        assert_eq!(a.mapping_info().unwrap().new_ward_code.as_deref(), Some("26890"));
    }

    #[test]
    fn test_single_row_with_new_name_is_renamed() {
        let data = fixture();
        let r = MappingResolver::new(&data).resolve(go_vap("Phường 15"));

        assert_eq!(r.converted_address().unwrap().ward, "Phường An Hội Đông");
        assert_eq!(r.mapping_info().unwrap().mapping_type, MappingType::Renamed);
    }

    #[test]
    fn test_same_name_same_code_is_exact() {
        let data = fixture();
        let r = MappingResolver::new(&data).resolve(FullAddress::new(
            "Phường Tân Định",
            "Quận 1",
            HCM,
            "12 Hai Bà Trưng",
        ));

        let converted = r.converted_address().unwrap();
        assert_eq!(converted.ward, "Phường Tân Định");
        assert_eq!(converted.street, "12 Hai Bà Trưng");
        assert_eq!(r.mapping_info().unwrap().mapping_type, MappingType::Exact);
    }

    #[test]
    fn test_same_name_new_code_is_mapped() {
        let data = AddressData::builder()
            .province(province(1, HCM, "79"))
            .mapping(mapping(
                ("27457", "Phường An Lạc", "Quận Bình Tân", HCM),
                ("27460", "Phường An Lạc", HCM),
            ))
            .build()
            .unwrap();

        let r = MappingResolver::new(&data).resolve(FullAddress::new(
            "Phường An Lạc",
            "Quận Bình Tân",
            HCM,
            "",
        ));
        assert_eq!(r.mapping_info().unwrap().mapping_type, MappingType::Mapped);
    }

    #[test]
    fn test_merge_takes_precedence_over_rename() {
        let data = fixture();
        let resolver = MappingResolver::new(&data);
        let row = &data.mappings()[0];

        assert_ne!(row.new_ward_name.as_deref(), Some(row.old_ward_name.as_str()));
        assert_eq!(resolver.determine_mapping_type(row), MappingType::Merged);
    }

    #[test]
    fn test_unchanged_ward_from_ward_table() {
        let data = fixture();
        let r = MappingResolver::new(&data).resolve(FullAddress::new(
            "Phường Bến Thành",
            "",
            "Hồ Chí Minh",
            "1 Lê Lợi",
        ));

        assert!(r.is_success());
        let converted = r.converted_address().unwrap();
        assert_eq!(converted.ward, "Phường Bến Thành");
        assert_eq!(converted.province, HCM);
        assert_eq!(converted.street, "1 Lê Lợi");

        let info = r.mapping_info().unwrap();
        assert_eq!(info.old_ward_code, None);
        assert_eq!(info.new_ward_code.as_deref(), Some("26743"));
        assert_eq!(info.mapping_type, MappingType::Unchanged);
    }

    #[test]
    fn test_not_found() {
        let data = fixture();
        let r = MappingResolver::new(&data).resolve(FullAddress::new(
            "Phường Không Tồn Tại",
            "Quận Không Có",
            "Thành phố Hư Cấu",
            "",
        ));

        assert!(!r.is_success());
        assert_eq!(r.message(), Some(NOT_FOUND_MESSAGE));
        assert!(r.converted_address().is_none());
        assert!(r.mapping_info().is_none());
        assert_eq!(r.original().ward, "Phường Không Tồn Tại");
    }

    #[test]
    fn test_malformed_row_becomes_failed_result() {
        let mut broken = mapping(
            ("1", "Phường 1", "Quận 3", HCM),
            ("10", "Phường Bàn Cờ", HCM),
        );
        broken.new_province_name = None;
        let data = AddressData::builder()
            .province(province(1, HCM, "79"))
            .mapping(broken)
            .build()
            .unwrap();

        let r = MappingResolver::new(&data).resolve(FullAddress::new("1", "3", HCM, ""));

        assert!(!r.is_success());
        let message = r.message().unwrap();
        assert!(message.starts_with("Error during conversion: "), "{message}");
        assert!(message.contains("new_province_name"), "{message}");
    }

    #[test]
    fn test_row_without_new_code_never_merges() {
        let mut a = mapping(("1", "Phường 1", "Quận 3", HCM), ("", "Phường 1", HCM));
        let mut b = mapping(("2", "Phường 2", "Quận 3", HCM), ("", "Phường 2", HCM));
        a.new_ward_code = None;
        b.new_ward_code = None;
        let data = AddressData::builder().mapping(a).mapping(b).build().unwrap();
        let resolver = MappingResolver::new(&data);

        // same name, codes differ (Some vs None)
        assert_eq!(
            resolver.determine_mapping_type(&data.mappings()[0]),
            MappingType::Mapped
        );
    }
}
