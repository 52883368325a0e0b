//! JSON output for ranges.

use super::RangeRow;
use serde::Serialize;
use std::error::Error;

/// One entry of the `ranges` list.
#[derive(Serialize, Debug)]
pub struct JsonRange<'a> {
    pub start_address: &'a str,
    pub end_address: &'a str,
    pub num_of_addresses: Option<u128>,
    pub prefix: Option<u8>,
    pub available: bool,
    pub id: Option<&'a str>,
    pub name: Option<&'a str>,
}

/// Top-level document: `{"ranges": [...]}`.
#[derive(Serialize, Debug)]
pub struct JsonRanges<'a> {
    pub ranges: Vec<JsonRange<'a>>,
}

impl<'a> From<&'a RangeRow> for JsonRange<'a> {
    fn from(row: &'a RangeRow) -> Self {
        JsonRange {
            start_address: &row.start_address,
            end_address: &row.end_address,
            num_of_addresses: row.num_of_addresses,
            prefix: row.prefix,
            available: row.available,
            id: row.id.as_deref(),
            name: row.name.as_deref(),
        }
    }
}

/// Render rows as a JSON document.
pub fn ranges_json(rows: &[RangeRow]) -> Result<String, Box<dyn Error>> {
    let doc = JsonRanges {
        ranges: rows.iter().map(JsonRange::from).collect(),
    };
    serde_json::to_string(&doc).map_err(|e| format!("Error serializing JSON: {e}").into())
}
