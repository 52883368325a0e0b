//! Inventory files and the dated discovery cache.
//!
//! An inventory file lists the occupied blocks as JSON:
//!
//! ```json
//! {"blocks": [
//!   {"cidr": "10.8.0.0/14", "id": "vpc-0abc", "name": "shared", "kind": "top-level"},
//!   {"start": "10.50.0.0", "end": "10.50.3.255", "kind": "sub-block"}
//! ]}
//! ```

use crate::models::{AddressRange, BlockKind, OccupiedBlock, RangeSpec};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// One occupied block as stored on disk.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<IpAddr>,
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub kind: BlockKind,
}

/// Contents of an inventory or cache file.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct InventoryFile {
    pub blocks: Vec<InventoryRecord>,
}

impl InventoryRecord {
    pub fn to_block(&self) -> Result<OccupiedBlock, Box<dyn Error>> {
        let spec = match (&self.cidr, self.start, self.end) {
            (Some(cidr), None, None) => RangeSpec::Network(
                cidr.trim()
                    .parse()
                    .map_err(|e| format!("Invalid cidr {cidr}: {e}"))?,
            ),
            (None, Some(start), Some(end)) => RangeSpec::Bounds { start, end },
            _ => {
                return Err(format!(
                    "Block {:?} needs either a cidr or a start and an end",
                    self.id
                )
                .into())
            }
        };
        Ok(OccupiedBlock {
            range: AddressRange::try_from(spec)?,
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
        })
    }

    pub fn from_block(block: &OccupiedBlock) -> InventoryRecord {
        let range = block.range;
        let mut record = InventoryRecord {
            id: block.id.clone(),
            name: block.name.clone(),
            kind: block.kind,
            ..Default::default()
        };
        match range.as_prefix() {
            Some(prefix) => record.cidr = Some(format!("{}/{prefix}", range.start_ip())),
            None => {
                record.start = Some(range.start_ip());
                record.end = Some(range.end_ip());
            }
        }
        record
    }
}

/// Parse inventory JSON, naming the JSON path of any bad field.
pub fn parse_inventory(json: &str) -> Result<Vec<OccupiedBlock>, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let file: InventoryFile = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing inventory: path={} error={}", e.path(), e))?;
    file.blocks.iter().map(InventoryRecord::to_block).collect()
}

/// Read occupied blocks from an inventory file.
pub fn read_inventory(path: &Path) -> Result<Vec<OccupiedBlock>, Box<dyn Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading inventory {}: {e}", path.display()))?;
    let blocks = parse_inventory(&json)?;
    log::info!("Read {} blocks from {}", blocks.len(), path.display());
    Ok(blocks)
}

pub fn write_inventory(path: &Path, blocks: &[OccupiedBlock]) -> Result<(), Box<dyn Error>> {
    let file = InventoryFile {
        blocks: blocks.iter().map(InventoryRecord::from_block).collect(),
    };
    let json =
        serde_json::to_string_pretty(&file).map_err(|e| format!("Error serializing JSON: {e}"))?;
    std::fs::write(path, json)
        .map_err(|e| format!("Error writing cache file {}: {e}", path.display()))?;
    Ok(())
}

/// Cache file for `scope` (region, optionally with a VPC id) for today.
pub fn cache_path(dir: &str, scope: &str) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    let scope: String = scope
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    Path::new(dir).join(format!("inventory_{scope}_{today}.json"))
}

/// Read today's cache, or run `fetch` and cache its result.
///
/// # Arguments
/// * `cache_file` - Path from [`cache_path`]
/// * `fetch` - Discovery to run when the cache file does not exist
///
/// # Returns
/// * `Ok(Vec<OccupiedBlock>)` - Blocks from the cache or from `fetch`
/// * `Err` - If the cache cannot be read or written, or `fetch` fails
pub fn load_or_fetch<F>(cache_file: &Path, fetch: F) -> Result<Vec<OccupiedBlock>, Box<dyn Error>>
where
    F: FnOnce() -> Result<Vec<OccupiedBlock>, Box<dyn Error>>,
{
    if cache_file.exists() {
        log::info!("Reading from cache file: {}", cache_file.display());
        return read_inventory(cache_file);
    }

    log::warn!("Cache file not found: {}", cache_file.display());
    let blocks = fetch()?;
    log::warn!("Writing data to cache file: {}", cache_file.display());
    write_inventory(cache_file, &blocks)?;
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_inventory() {
        let blocks = read_inventory(Path::new("src/tests/test_data/inventory_01.json"))
            .expect("Error reading inventory");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].id.as_deref(), Some("vpc-0a1b2c3d"));
        assert_eq!(blocks[0].range.to_string(), "10.10.0.0-10.10.255.255");
        assert_eq!(blocks[1].kind, BlockKind::TopLevel);
        assert_eq!(blocks[2].kind, BlockKind::SubBlock);
        assert_eq!(blocks[2].range.num_addresses().unwrap(), 1024);
    }

    #[test]
    fn test_parse_inventory_reports_path() {
        let json = r#"{"blocks": [{"cidr": "10.0.0.0/8", "kind": "vpc"}]}"#;
        let err = parse_inventory(json).unwrap_err().to_string();
        assert!(err.contains("blocks[0].kind"), "{err}");
    }

    #[test]
    fn test_parse_inventory_bad_record() {
        let json = r#"{"blocks": [{"start": "10.0.0.0", "id": "half"}]}"#;
        assert!(parse_inventory(json).is_err());
        let json = r#"{"blocks": [{"cidr": "10.0.0.0/40"}]}"#;
        assert!(parse_inventory(json).is_err());
    }

    #[test]
    fn test_record_round_trip_keeps_unaligned_range() {
        let range = AddressRange::from_bounds(
            "10.0.0.5".parse().unwrap(),
            "10.0.0.9".parse().unwrap(),
        )
        .unwrap();
        let block = OccupiedBlock::new(range).with_name("odd");
        let record = InventoryRecord::from_block(&block);
        assert_eq!(record.cidr, None);
        assert_eq!(record.to_block().unwrap(), block);
    }

    #[test]
    fn test_load_or_fetch_writes_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_path(dir.path().to_str().unwrap(), "eu-west-1/vpc-1");
        assert!(cache
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("inventory_eu-west-1_vpc-1_"));

        let fetched = vec![OccupiedBlock::new("10.1.0.0/16".parse().unwrap()).with_id("vpc-1")];
        let blocks = load_or_fetch(&cache, || Ok(fetched.clone())).unwrap();
        assert_eq!(blocks, fetched);
        assert!(cache.exists());

        // second call must come from the cache
        let blocks = load_or_fetch(&cache, || Err("fetch should not run".into())).unwrap();
        assert_eq!(blocks, fetched);
    }
}
