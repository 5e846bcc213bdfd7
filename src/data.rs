//! Reference tables and the lookup index built over them

use crate::error::{ConvertError, Result};
use crate::normalize::normalize;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Province or centrally-governed city after the reform
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Province {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::number"))]
    pub id: u32,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::code"))]
    pub province_code: String,
}

/// Current ward
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ward {
    pub name: String,
    /// References [`Province::province_code`]
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::code"))]
    pub province_code: String,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::code"))]
    pub ward_code: String,
}

/// One old ward and the new ward it became.
///
/// Several rows sharing a `new_ward_code` means those old wards were merged.
/// Fields that dumps sometimes leave null are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WardMapping {
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de::opt_code"))]
    pub old_ward_code: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de::text"))]
    pub old_ward_name: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de::text"))]
    pub old_district_name: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de::text"))]
    pub old_province_name: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de::opt_code"))]
    pub new_ward_code: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub new_ward_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub new_province_name: Option<String>,
}

/// Table sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataStats {
    pub provinces: usize,
    pub wards: usize,
    pub mappings: usize,
}

/// Keys derived from the tables once, at construction
#[derive(Debug, Default)]
pub(crate) struct DataIndex {
    /// province_code -> row in `provinces`
    pub province_by_code: HashMap<String, usize>,
    /// new_ward_code -> number of mapping rows pointing at it
    pub merge_counts: HashMap<String, usize>,
    /// normalized (ward, district, province) -> first mapping row
    pub mapping_by_key: HashMap<(String, String, String), usize>,
    /// normalized (ward, province name) -> first ward row
    pub ward_by_key: HashMap<(String, String), usize>,
}

impl DataIndex {
    fn build(provinces: &[Province], wards: &[Ward], mappings: &[WardMapping]) -> Result<Self> {
        let mut index = DataIndex::default();

        for (i, province) in provinces.iter().enumerate() {
            if index
                .province_by_code
                .insert(province.province_code.clone(), i)
                .is_some()
            {
                return Err(ConvertError::InvalidData(format!(
                    "duplicate province_code {}",
                    province.province_code
                )));
            }
        }

        for (i, mapping) in mappings.iter().enumerate() {
            if let Some(ref code) = mapping.new_ward_code {
                *index.merge_counts.entry(code.clone()).or_default() += 1;
            }

            // first row in table order wins
            let key = (
                normalize(&mapping.old_ward_name),
                normalize(&mapping.old_district_name),
                normalize(&mapping.old_province_name),
            );
            index.mapping_by_key.entry(key).or_insert(i);
        }

        for (i, ward) in wards.iter().enumerate() {
            let Some(&p) = index.province_by_code.get(&ward.province_code) else {
                log::warn!(
                    "Ward {} ({}) references unknown province_code {}, skipping",
                    ward.name,
                    ward.ward_code,
                    ward.province_code
                );
                continue;
            };
            let key = (normalize(&ward.name), normalize(&provinces[p].name));
            index.ward_by_key.entry(key).or_insert(i);
        }

        Ok(index)
    }
}

/// The three read-only reference tables.
///
/// Built once and never mutated afterwards, so a shared reference can be
/// used from any number of threads.
#[derive(Debug)]
pub struct AddressData {
    provinces: Vec<Province>,
    wards: Vec<Ward>,
    mappings: Vec<WardMapping>,
    index: DataIndex,
}

impl AddressData {
    /// Build the tables and their index.
    ///
    /// Fails with [`ConvertError::InvalidData`] when two provinces share a
    /// `province_code`.
    pub fn new(
        provinces: Vec<Province>,
        wards: Vec<Ward>,
        mappings: Vec<WardMapping>,
    ) -> Result<Self> {
        let index = DataIndex::build(&provinces, &wards, &mappings)?;
        log::debug!(
            "Indexed {} mapping keys and {} ward keys",
            index.mapping_by_key.len(),
            index.ward_by_key.len()
        );

        Ok(Self {
            provinces,
            wards,
            mappings,
            index,
        })
    }

    pub fn builder() -> AddressDataBuilder {
        AddressDataBuilder::default()
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn wards(&self) -> &[Ward] {
        &self.wards
    }

    pub fn mappings(&self) -> &[WardMapping] {
        &self.mappings
    }

    /// Province owning `province_code`
    pub fn province_by_code(&self, province_code: &str) -> Option<&Province> {
        self.index
            .province_by_code
            .get(province_code)
            .map(|&i| &self.provinces[i])
    }

    /// Number of mapping rows whose new ward is `new_ward_code`
    pub fn mappings_into(&self, new_ward_code: &str) -> usize {
        self.index
            .merge_counts
            .get(new_ward_code)
            .copied()
            .unwrap_or(0)
    }

    pub fn stats(&self) -> DataStats {
        DataStats {
            provinces: self.provinces.len(),
            wards: self.wards.len(),
            mappings: self.mappings.len(),
        }
    }

    /// First mapping row whose old names equal the given ones after normalization
    pub(crate) fn find_mapping(
        &self,
        ward: &str,
        district: &str,
        province: &str,
    ) -> Option<(usize, &WardMapping)> {
        let key = (normalize(ward), normalize(district), normalize(province));
        self.index
            .mapping_by_key
            .get(&key)
            .map(|&i| (i, &self.mappings[i]))
    }

    /// First current ward with this name inside a province with this name
    pub(crate) fn find_ward(&self, ward: &str, province: &str) -> Option<(&Ward, &Province)> {
        let key = (normalize(ward), normalize(province));
        let ward = &self.wards[*self.index.ward_by_key.get(&key)?];
        let province = self.province_by_code(&ward.province_code)?;
        Some((ward, province))
    }
}

/// Collects the tables before building [`AddressData`]
#[derive(Debug, Default)]
pub struct AddressDataBuilder {
    provinces: Vec<Province>,
    wards: Vec<Ward>,
    mappings: Vec<WardMapping>,
}

impl AddressDataBuilder {
    pub fn provinces(mut self, provinces: Vec<Province>) -> Self {
        self.provinces = provinces;
        self
    }

    pub fn wards(mut self, wards: Vec<Ward>) -> Self {
        self.wards = wards;
        self
    }

    pub fn mappings(mut self, mappings: Vec<WardMapping>) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn province(mut self, province: Province) -> Self {
        self.provinces.push(province);
        self
    }

    pub fn ward(mut self, ward: Ward) -> Self {
        self.wards.push(ward);
        self
    }

    pub fn mapping(mut self, mapping: WardMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn build(self) -> Result<AddressData> {
        AddressData::new(self.provinces, self.wards, self.mappings)
    }
}

impl WardMapping {
    /// True when `keyword` (already lowercased) occurs in the old ward,
    /// old district or new ward name
    pub(crate) fn mentions(&self, keyword: &str) -> bool {
        [
            Some(self.old_ward_name.as_str()),
            Some(self.old_district_name.as_str()),
            self.new_ward_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| !field.is_empty() && field.to_lowercase().contains(keyword))
    }
}

/// Dumps encode numbers and codes either as JSON strings or numbers
#[cfg(feature = "serde")]
mod de {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Number(u64),
        Text(String),
    }

    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Scalar::Number(n) => n.to_string(),
                Scalar::Text(s) => s,
            }
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        match Scalar::deserialize(d)? {
            Scalar::Number(n) => u32::try_from(n).map_err(D::Error::custom),
            Scalar::Text(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }

    pub fn code<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Scalar::deserialize(d)?.into_string())
    }

    pub fn opt_code<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(d)?.map(Scalar::into_string))
    }

    /// Null reads as empty text
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }
}
