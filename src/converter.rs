//! Conversion entry point

use crate::address::{AddressInput, ConversionResult, FullAddress};
use crate::data::{AddressData, DataStats, Province, Ward, WardMapping};
use crate::error::{ConvertError, Result};
use crate::parser::AddressParser;
use crate::resolver::MappingResolver;
use crate::validator::AddressValidator;
use once_cell::sync::OnceCell;

/// Message of a failed result for blank string input
pub const EMPTY_INPUT_MESSAGE: &str = "Address cannot be empty";
/// Message of a failed result rejected by input validation
pub const INVALID_INPUT_MESSAGE: &str = "Invalid address format";

/// Converter options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Run [`AddressValidator`] on every input before resolving. Off by
    /// default: only blank strings are rejected.
    pub validate_input: bool,
}

impl ConverterConfig {
    pub fn with_validate_input(mut self, validate_input: bool) -> Self {
        self.validate_input = validate_input;
        self
    }
}

/// Converts old three-tier addresses to the two-tier scheme.
///
/// Holds the reference tables behind a once-only guard: they are installed by
/// a single [`initialize`](Self::initialize) call and read-only afterwards.
/// Queries made before that fail with [`ConvertError::NotInitialized`].
///
/// ```rust
/// use vnaddr::{AddressConverter, AddressData, Province, Ward};
///
/// let data = AddressData::builder()
///     .province(Province { id: 1, name: "Thành phố Hồ Chí Minh".into(), province_code: "79".into() })
///     .ward(Ward { name: "Phường Bến Thành".into(), province_code: "79".into(), ward_code: "26743".into() })
///     .build()
///     .unwrap();
/// let converter = AddressConverter::with_data(data);
///
/// let result = converter.convert_address("1 Lê Lợi, Phường Bến Thành, TP. Hồ Chí Minh").unwrap();
/// assert!(result.is_success());
/// assert_eq!(result.converted_address().unwrap().ward, "Phường Bến Thành");
/// ```
#[derive(Debug, Default)]
pub struct AddressConverter {
    config: ConverterConfig,
    validator: AddressValidator,
    data: OnceCell<AddressData>,
}

impl AddressConverter {
    /// Create an uninitialized converter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConverterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a converter that already holds `data`
    pub fn with_data(data: AddressData) -> Self {
        let converter = Self::new();
        converter.install(data);
        converter
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Install the reference tables. Only the first call succeeds.
    pub fn initialize(&self, data: AddressData) -> Result<()> {
        if !self.install(data) {
            return Err(ConvertError::AlreadyInitialized);
        }
        Ok(())
    }

    /// Load a JSON dump from `path` and install it
    #[cfg(feature = "json")]
    pub fn initialize_from_path(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.initialize(AddressData::from_json_path(path)?)
    }

    fn install(&self, data: AddressData) -> bool {
        let stats = data.stats();
        let installed = self.data.set(data).is_ok();
        if installed {
            log::info!(
                "Converter initialized: {} provinces, {} wards, {} mappings",
                stats.provinces,
                stats.wards,
                stats.mappings
            );
        }
        installed
    }

    pub fn is_initialized(&self) -> bool {
        self.data.get().is_some()
    }

    /// The installed tables
    pub fn data(&self) -> Result<&AddressData> {
        self.data.get().ok_or(ConvertError::NotInitialized)
    }

    /// Convert one address.
    ///
    /// Accepts a raw string (parsed first) or a [`FullAddress`] (resolved
    /// directly). Only [`ConvertError::NotInitialized`] is returned as an
    /// error; every other failure is a failed [`ConversionResult`].
    pub fn convert_address<'i>(&self, input: impl Into<AddressInput<'i>>) -> Result<ConversionResult> {
        let data = self.data()?;

        let original = match input.into() {
            AddressInput::Raw(raw) => {
                if raw.trim().is_empty() {
                    return Ok(ConversionResult::failed(
                        FullAddress::default(),
                        EMPTY_INPUT_MESSAGE,
                    ));
                }
                if self.config.validate_input && !self.validator.is_valid_raw(raw) {
                    return Ok(ConversionResult::failed(
                        FullAddress::default(),
                        INVALID_INPUT_MESSAGE,
                    ));
                }
                AddressParser::global().parse(raw).into_full_address()
            }
            AddressInput::Structured(address) => address,
        };

        if self.config.validate_input && !self.validator.is_valid_components(&original) {
            return Ok(ConversionResult::failed(original, INVALID_INPUT_MESSAGE));
        }

        Ok(MappingResolver::new(data).resolve(original))
    }

    /// Convert several addresses, one result per input in order
    pub fn convert_batch<'i, I>(&self, inputs: I) -> Result<Vec<ConversionResult>>
    where
        I: IntoIterator,
        I::Item: Into<AddressInput<'i>>,
    {
        inputs
            .into_iter()
            .map(|input| self.convert_address(input))
            .collect()
    }

    /// Mapping rows whose old ward, old district or new ward name contains
    /// `keyword`, ignoring case
    pub fn search_mappings(&self, keyword: &str) -> Result<Vec<&WardMapping>> {
        let keyword = keyword.to_lowercase();
        Ok(self
            .data()?
            .mappings()
            .iter()
            .filter(|m| m.mentions(&keyword))
            .collect())
    }

    /// Current wards of one province, in table order
    pub fn wards_by_province(&self, province_code: &str) -> Result<Vec<&Ward>> {
        Ok(self
            .data()?
            .wards()
            .iter()
            .filter(|w| w.province_code == province_code)
            .collect())
    }

    pub fn provinces(&self) -> Result<&[Province]> {
        Ok(self.data()?.provinces())
    }

    pub fn data_stats(&self) -> Result<DataStats> {
        Ok(self.data()?.stats())
    }
}
