//! Command line front end.
//!
//! Parses arguments, gathers the occupied blocks, runs the engine and renders
//! the result. Kept out of `main.rs` so it can be tested.

use crate::config::Settings;
use crate::inventory::{self, aws};
use crate::models::OccupiedBlock;
use crate::output::{self, RangeRow};
use crate::processing::{self, SuggestQuery};
use crate::validate;
use clap::{Parser, ValueEnum};
use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Find available and occupied CIDR ranges inside an address block
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address block to check, e.g. 10.0.0.0/8
    #[arg(long, conflicts_with_all = ["start", "end"], required_unless_present = "start")]
    pub cidr_range: Option<String>,

    /// First address of an explicit range
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Last address of an explicit range
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// JSON inventory of occupied blocks; skips AWS discovery
    #[arg(long, conflicts_with_all = ["region", "profile", "vpc_id", "no_cache"])]
    pub inventory: Option<PathBuf>,

    /// AWS region to discover VPCs in
    #[arg(long)]
    pub region: Option<String>,

    /// AWS CLI profile
    #[arg(long)]
    pub profile: Option<String>,

    /// Look for free space inside this VPC, against its subnets
    #[arg(long)]
    pub vpc_id: Option<String>,

    /// Always query AWS instead of today's cache file
    #[arg(long)]
    pub no_cache: bool,

    /// Suggest free blocks of exactly this prefix length
    #[arg(long, conflicts_with = "min_addresses")]
    pub suggest_prefix: Option<u8>,

    /// Suggest free blocks holding at least this many addresses
    #[arg(long, value_parser = parse_address_count)]
    pub min_addresses: Option<u128>,

    /// Suggest all free blocks
    #[arg(long)]
    pub suggest: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Disable colors in table output; colors are off anyway when stdout is not a terminal
    #[arg(long)]
    pub no_color: bool,
}

fn parse_address_count(value: &str) -> Result<u128, String> {
    validate::check_address_int(value).map_err(|e| e.to_string())
}

impl Args {
    /// The suggestion query, or `None` when only segments were asked for.
    pub fn query(&self) -> crate::Result<Option<SuggestQuery>> {
        let query = SuggestQuery::from_options(self.suggest_prefix, self.min_addresses)?;
        if query == SuggestQuery::All && !self.suggest {
            return Ok(None);
        }
        Ok(Some(query))
    }
}

/// Cache scope for a discovery: profile (when set), region and VPC id.
fn cache_scope(settings: &Settings, vpc_id: Option<&str>) -> String {
    settings
        .aws_profile
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(settings.region.as_str()))
        .chain(vpc_id)
        .collect::<Vec<&str>>()
        .join("_")
}

/// Occupied blocks from the inventory file or from AWS.
fn occupied_blocks(args: &Args, settings: &Settings) -> Result<Vec<OccupiedBlock>, Box<dyn Error>> {
    if let Some(path) = &args.inventory {
        return inventory::read_inventory(path);
    }

    let vpc_id = args.vpc_id.as_deref();
    let fetch = || aws::fetch_blocks(settings, vpc_id);
    if args.no_cache {
        return fetch();
    }
    let cache_file = inventory::cache_path(&settings.cache_dir, &cache_scope(settings, vpc_id));
    inventory::load_or_fetch(&cache_file, fetch)
}

/// Run the whole query against known blocks and render it.
pub fn render(args: &Args, occupied: &[OccupiedBlock]) -> Result<String, Box<dyn Error>> {
    let universe = validate::parse_range(
        args.cidr_range.as_deref(),
        args.start.as_deref(),
        args.end.as_deref(),
    )?;
    if let Some(prefix) = args.suggest_prefix {
        validate::check_prefix(prefix, universe.family)?;
    }

    let segments = crate::find_ranges(universe, occupied)?;
    let rows: Vec<RangeRow> = match args.query()? {
        None => output::segment_rows(&segments),
        Some(query) => {
            let blocks = processing::suggest(&segments, query)?;
            if blocks.is_empty() {
                log::warn!("No free block in {universe} satisfies {query:?}");
            }
            output::candidate_rows(&blocks)
        }
    };

    match args.output {
        OutputFormat::Table => {
            let color = use_color(args.no_color, std::io::stdout().is_terminal());
            Ok(output::ranges_table(&rows, color))
        }
        OutputFormat::Json => output::ranges_json(&rows),
    }
}

/// Table colors only when asked for and written to a terminal.
fn use_color(no_color: bool, is_terminal: bool) -> bool {
    !no_color && is_terminal
}

/// Entry point used by the binary.
pub fn run(args: &Args, settings: Settings) -> Result<String, Box<dyn Error>> {
    let settings = settings.with_overrides(args.region.clone(), args.profile.clone());
    log::debug!("settings={settings:?}");
    let occupied = occupied_blocks(args, &settings)?;
    render(args, &occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let argv = ["vpc-range-finder"].iter().chain(extra.iter()).copied();
        Args::try_parse_from(argv).expect("Error parsing args")
    }

    #[test]
    fn test_args_conflicts() {
        let argv = ["vpc-range-finder", "--cidr-range", "10.0.0.0/8", "--start", "10.0.0.1"];
        assert!(Args::try_parse_from(argv).is_err());

        let argv = [
            "vpc-range-finder",
            "--cidr-range",
            "10.0.0.0/8",
            "--suggest-prefix",
            "24",
            "--min-addresses",
            "100",
        ];
        assert!(Args::try_parse_from(argv).is_err());

        assert!(Args::try_parse_from(["vpc-range-finder"]).is_err());
        let argv = ["vpc-range-finder", "--cidr-range", "10.0.0.0/8", "--min-addresses", "-1"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_query() {
        assert_eq!(args(&["--cidr-range", "10.0.0.0/8"]).query().unwrap(), None);
        assert_eq!(
            args(&["--cidr-range", "10.0.0.0/8", "--suggest"]).query().unwrap(),
            Some(SuggestQuery::All)
        );
        assert_eq!(
            args(&["--cidr-range", "10.0.0.0/8", "--suggest-prefix", "24"])
                .query()
                .unwrap(),
            Some(SuggestQuery::Prefix(24))
        );
    }

    #[test]
    fn test_cache_scope_separates_profiles() {
        let settings = Settings::default();
        assert_eq!(cache_scope(&settings, None), "us-east-1");
        assert_eq!(cache_scope(&settings, Some("vpc-1")), "us-east-1_vpc-1");

        let a = settings.clone().with_overrides(None, Some("account-a".to_string()));
        let b = settings.with_overrides(None, Some("account-b".to_string()));
        assert_eq!(cache_scope(&a, Some("vpc-1")), "account-a_us-east-1_vpc-1");
        assert_ne!(
            inventory::cache_path(&a.cache_dir, &cache_scope(&a, None)),
            inventory::cache_path(&b.cache_dir, &cache_scope(&b, None))
        );
    }

    #[test]
    fn test_run_with_inventory_json() {
        let args = args(&[
            "--cidr-range",
            "10.0.0.0/8",
            "--inventory",
            "src/tests/test_data/inventory_01.json",
            "--output",
            "json",
        ]);
        let json = run(&args, Settings::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let ranges = value["ranges"].as_array().unwrap();
        assert_eq!(ranges.len(), 6);
        assert_eq!(ranges[0]["end_address"], "10.7.255.255");
        assert_eq!(ranges[2]["id"], "vpc-0a1b2c3d");
        assert_eq!(ranges[4]["num_of_addresses"], 1024);
    }

    #[test]
    fn test_render_min_addresses_empty_is_ok() {
        let args = args(&[
            "--cidr-range",
            "10.10.10.0/24",
            "--min-addresses",
            "200",
            "--output",
            "json",
        ]);
        let occupied = vec![OccupiedBlock::new("10.10.10.0/26".parse().unwrap())];
        assert_eq!(render(&args, &occupied).unwrap(), r#"{"ranges":[]}"#);
    }

    #[test]
    fn test_render_prefix_out_of_range() {
        let args = args(&["--cidr-range", "10.10.10.0/24", "--suggest-prefix", "40"]);
        assert!(render(&args, &[]).is_err());
    }

    #[test]
    fn test_use_color() {
        assert!(use_color(false, true));
        assert!(!use_color(true, true));
        assert!(!use_color(false, false));
        assert!(!use_color(true, false));
    }

    #[test]
    fn test_render_bounds_table() {
        let args = args(&["--start", "10.0.0.0", "--end", "10.0.0.255", "--no-color"]);
        let table = render(&args, &[]).unwrap();
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("| 10.0.0.0  | 10.0.0.255 |"));
    }
}
