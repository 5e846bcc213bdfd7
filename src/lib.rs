//! # vnaddr - Vietnamese address converter
//!
//! Converts Vietnamese addresses written in the pre-2025 three-tier scheme
//! (ward, district, province) into the two-tier scheme (ward, province) that
//! replaced it when districts were abolished and wards merged.
//!
//! ## Features
//!
//! - Segment free-text addresses into street, ward, district and province
//! - Accept common abbreviations (`P.`, `Q.`, `H.`, `TX.`, `TP.`, `TT.`) and
//!   spelling variants of the centrally-governed cities (`TP.HCM`, `Ha Noi`, ...)
//! - Resolve old wards to new wards via a mapping table, falling back to the
//!   current ward table for wards the reform left alone
//! - Classify each conversion as merged, renamed, exact, mapped or unchanged
//! - Load the reference tables from a JSON database dump (feature `json`)
//!
//! ## Quick start
//!
//! ```rust
//! use vnaddr::{AddressConverter, AddressData, MappingType, Province, WardMapping};
//!
//! let hcm = "Thành phố Hồ Chí Minh";
//! let row = |code: &str, ward: &str| WardMapping {
//!     old_ward_code: Some(code.into()),
//!     old_ward_name: ward.into(),
//!     old_district_name: "Quận Gò Vấp".into(),
//!     old_province_name: hcm.into(),
//!     new_ward_code: Some("26890".into()),
//!     new_ward_name: Some("Phường An Hội Tây".into()),
//!     new_province_name: Some(hcm.into()),
//! };
//! let data = AddressData::builder()
//!     .province(Province { id: 1, name: hcm.into(), province_code: "79".into() })
//!     .mapping(row("26896", "Phường 12"))
//!     .mapping(row("26893", "Phường 14"))
//!     .build()
//!     .unwrap();
//!
//! let converter = AddressConverter::with_data(data);
//! let result = converter
//!     .convert_address("Phường 12, Quận Gò Vấp, Thành phố Hồ Chí Minh")
//!     .unwrap();
//!
//! assert!(result.is_success());
//! assert_eq!(
//!     result.converted_address().unwrap().formatted(),
//!     "Phường An Hội Tây, Thành phố Hồ Chí Minh"
//! );
//! assert_eq!(result.mapping_info().unwrap().mapping_type, MappingType::Merged);
//!
//! // Parsing alone needs no data
//! let parsed = vnaddr::parse("12 Lê Lợi, P.12, Q. Gò Vấp, TP.HCM");
//! assert_eq!(parsed.ward, "12");
//! ```

mod address;
mod converter;
mod data;
mod error;
#[cfg(feature = "json")]
mod loader;
mod normalize;
mod parser;
mod resolver;
mod validator;

pub use address::{
    AddressInput, ConversionResult, FullAddress, MappingInfo, MappingType, NewAddress, Outcome,
    ParsedAddress,
};
pub use converter::{AddressConverter, ConverterConfig, EMPTY_INPUT_MESSAGE, INVALID_INPUT_MESSAGE};
pub use data::{AddressData, AddressDataBuilder, DataStats, Province, Ward, WardMapping};
pub use error::{ConvertError, Result};
pub use normalize::{normalize, normalize_opt};
pub use parser::AddressParser;
pub use resolver::{MappingResolver, NOT_FOUND_MESSAGE};
pub use validator::AddressValidator;

/// Parse an address with the global parser
///
/// ```rust
/// let result = vnaddr::parse("Phường 12, Quận Gò Vấp, Thành phố Hồ Chí Minh");
/// assert_eq!(result.ward, "12");
/// assert_eq!(result.district, "Gò Vấp");
/// assert_eq!(result.province, "Hồ Chí Minh");
/// ```
pub fn parse(address: &str) -> ParsedAddress {
    AddressParser::global().parse(address)
}
