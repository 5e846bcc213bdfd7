//! JSON dataset loading
//!
//! Reads the database dump layout: a top-level array whose `"type": "table"`
//! entries carry rows under `"data"`. Entries of any other type (header,
//! database) and unknown tables are skipped.
//!
//! ```json
//! [
//!   {"type": "header", "version": "5.2.1"},
//!   {"type": "table", "name": "provinces", "data": [{"id": "1", "name": "Thành phố Hồ Chí Minh", "province_code": "79"}]},
//!   {"type": "table", "name": "wards", "data": []},
//!   {"type": "table", "name": "ward_mappings", "data": []}
//! ]
//! ```

use crate::data::{AddressData, Province, Ward, WardMapping};
use crate::error::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DumpEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl AddressData {
    /// Parse a JSON dump held in memory
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_entries(serde_json::from_str(json)?)
    }

    /// Parse a JSON dump from any reader
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_entries(serde_json::from_reader(reader)?)
    }

    /// Parse a JSON dump file
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading address data from {}", path.display());
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    fn from_entries(entries: Vec<DumpEntry>) -> Result<Self> {
        let mut provinces: Option<Vec<Province>> = None;
        let mut wards: Option<Vec<Ward>> = None;
        let mut mappings: Option<Vec<WardMapping>> = None;

        for entry in entries {
            if entry.kind != "table" {
                continue;
            }
            let rows = entry.data.unwrap_or(serde_json::Value::Array(Vec::new()));
            match entry.name.as_deref() {
                Some("provinces") => provinces = Some(serde_json::from_value(rows)?),
                Some("wards") => wards = Some(serde_json::from_value(rows)?),
                Some("ward_mappings") => mappings = Some(serde_json::from_value(rows)?),
                other => log::debug!("Skipping table {:?}", other),
            }
        }

        AddressData::new(
            table_or_empty(provinces, "provinces"),
            table_or_empty(wards, "wards"),
            table_or_empty(mappings, "ward_mappings"),
        )
    }
}

fn table_or_empty<T>(table: Option<Vec<T>>, name: &str) -> Vec<T> {
    table.unwrap_or_else(|| {
        log::warn!("Address data has no `{}` table, using an empty one", name);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    const DUMP: &str = r#"[
        {"type": "header", "version": "5.2.1", "comment": "Export to JSON plugin for PHPMyAdmin"},
        {"type": "database", "name": "address"},
        {"type": "table", "name": "provinces", "database": "address", "data": [
            {"id": "1", "name": "Thành phố Hồ Chí Minh", "province_code": "79"},
            {"id": 2, "name": "Thành phố Hà Nội", "province_code": 1}
        ]},
        {"type": "table", "name": "wards", "database": "address", "data": [
            {"name": "Phường An Hội Tây", "province_code": "79", "ward_code": "26890"}
        ]},
        {"type": "table", "name": "ward_mappings", "database": "address", "data": [
            {"old_ward_code": "26896", "old_ward_name": "Phường 12", "old_district_name": "Quận Gò Vấp",
             "old_province_name": "Thành phố Hồ Chí Minh", "new_ward_code": "26890",
             "new_ward_name": "Phường An Hội Tây", "new_province_name": "Thành phố Hồ Chí Minh"},
            {"old_ward_code": null, "old_ward_name": "Phường 14", "old_district_name": null,
             "old_province_name": "Thành phố Hồ Chí Minh", "new_ward_code": 26890,
             "new_ward_name": null, "new_province_name": "Thành phố Hồ Chí Minh"}
        ]},
        {"type": "table", "name": "migrations", "data": []}
    ]"#;

    #[test]
    fn test_load_dump() {
        let data = AddressData::from_json_str(DUMP).unwrap();
        let stats = data.stats();
        assert_eq!((stats.provinces, stats.wards, stats.mappings), (2, 1, 2));

        assert_eq!(data.provinces()[0].id, 1);
        assert_eq!(data.provinces()[1].province_code, "1");
        assert_eq!(data.mappings_into("26890"), 2);
    }

    #[test]
    fn test_nullable_fields() {
        let data = AddressData::from_json_str(DUMP).unwrap();
        let m = &data.mappings()[1];
        assert_eq!(m.old_ward_code, None);
        assert_eq!(m.old_district_name, "");
        assert_eq!(m.new_ward_code.as_deref(), Some("26890"));
        assert_eq!(m.new_ward_name, None);
    }

    #[test]
    fn test_missing_tables_load_empty() {
        let data = AddressData::from_json_str(r#"[{"type": "header"}]"#).unwrap();
        assert_eq!(data.stats().provinces, 0);
        assert_eq!(data.stats().mappings, 0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AddressData::from_json_str("{not json"),
            Err(ConvertError::Json(_))
        ));
        assert!(matches!(
            AddressData::from_json_str(r#"[{"type": "table", "name": "provinces", "data": [{"id": "x"}]}]"#),
            Err(ConvertError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AddressData::from_json_path("/nonexistent/address.json"),
            Err(ConvertError::Io(_))
        ));
    }
}
