//! AWS VPC and subnet discovery through the `aws` CLI.
//!
//! VPC CIDR associations become top-level blocks; subnet CIDRs become
//! sub-blocks. Only associations in the `associated` state count as occupied.

use super::cli;
use crate::config::{self, Settings};
use crate::models::{AddressRange, BlockKind, OccupiedBlock};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::error::Error;

const ASSOCIATED: &str = "associated";

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct AssociationState {
    pub state: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct CidrAssociation {
    pub cidr_block: String,
    pub cidr_block_state: Option<AssociationState>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Ipv6CidrAssociation {
    pub ipv6_cidr_block: String,
    pub ipv6_cidr_block_state: Option<AssociationState>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Vpc {
    pub vpc_id: String,
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub cidr_block_association_set: Vec<CidrAssociation>,
    #[serde(default)]
    pub ipv6_cidr_block_association_set: Vec<Ipv6CidrAssociation>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Subnet {
    pub subnet_id: String,
    pub vpc_id: String,
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub ipv6_cidr_block_association_set: Vec<Ipv6CidrAssociation>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Output of `aws ec2 describe-vpcs`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeVpcs {
    pub vpcs: Vec<Vpc>,
}

/// Output of `aws ec2 describe-subnets`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeSubnets {
    pub subnets: Vec<Subnet>,
}

fn name_tag(tags: &[Tag]) -> Option<String> {
    tags.iter()
        .find(|t| t.key == "Name")
        .map(|t| t.value.clone())
}

fn is_associated(state: &Option<AssociationState>) -> bool {
    // older CLI output leaves the state out for the primary block
    state.as_ref().map_or(true, |s| s.state == ASSOCIATED)
}

fn block(
    cidr: &str,
    id: &str,
    name: &Option<String>,
    kind: BlockKind,
) -> Result<OccupiedBlock, Box<dyn Error>> {
    let range: AddressRange = cidr
        .parse()
        .map_err(|e| format!("Bad CIDR {cidr} on {id}: {e}"))?;
    let mut block = OccupiedBlock::new(range).with_id(id).with_kind(kind);
    block.name = name.clone();
    Ok(block)
}

impl Vpc {
    /// All associated IPv4 and IPv6 blocks of this VPC.
    pub fn blocks(&self) -> Result<Vec<OccupiedBlock>, Box<dyn Error>> {
        let name = name_tag(&self.tags);
        let mut cidrs: Vec<&str> = self
            .cidr_block_association_set
            .iter()
            .filter(|a| is_associated(&a.cidr_block_state))
            .map(|a| a.cidr_block.as_str())
            .collect();
        if cidrs.is_empty() {
            cidrs.extend(self.cidr_block.as_deref());
        }
        cidrs.extend(
            self.ipv6_cidr_block_association_set
                .iter()
                .filter(|a| is_associated(&a.ipv6_cidr_block_state))
                .map(|a| a.ipv6_cidr_block.as_str()),
        );
        cidrs
            .into_iter()
            .map(|cidr| block(cidr, &self.vpc_id, &name, BlockKind::TopLevel))
            .collect()
    }
}

impl Subnet {
    pub fn blocks(&self) -> Result<Vec<OccupiedBlock>, Box<dyn Error>> {
        let name = name_tag(&self.tags);
        self.cidr_block
            .iter()
            .map(String::as_str)
            .chain(
                self.ipv6_cidr_block_association_set
                    .iter()
                    .filter(|a| is_associated(&a.ipv6_cidr_block_state))
                    .map(|a| a.ipv6_cidr_block.as_str()),
            )
            .map(|cidr| block(cidr, &self.subnet_id, &name, BlockKind::SubBlock))
            .collect()
    }
}

/// Parse CLI JSON output, naming the JSON path of any bad field.
pub fn parse_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", json);
        format!("Error parsing {what}: path={} error={}", e.path(), e).into()
    })
}

pub fn vpc_blocks(json: &str) -> Result<Vec<OccupiedBlock>, Box<dyn Error>> {
    let parsed: DescribeVpcs = parse_json("describe-vpcs", json)?;
    let mut blocks = Vec::new();
    for vpc in &parsed.vpcs {
        blocks.extend(vpc.blocks()?);
    }
    Ok(blocks)
}

pub fn subnet_blocks(json: &str) -> Result<Vec<OccupiedBlock>, Box<dyn Error>> {
    let parsed: DescribeSubnets = parse_json("describe-subnets", json)?;
    let mut blocks = Vec::new();
    for subnet in &parsed.subnets {
        blocks.extend(subnet.blocks()?);
    }
    Ok(blocks)
}

/// Arguments for an `aws ec2 <action>` call in the configured region and profile.
pub fn ec2_args(settings: &Settings, action: &str, vpc_id: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "ec2".to_string(),
        action.to_string(),
        "--region".to_string(),
        settings.region.clone(),
        "--output".to_string(),
        "json".to_string(),
    ];
    if let Some(profile) = &settings.aws_profile {
        args.push("--profile".to_string());
        args.push(profile.clone());
    }
    if let Some(vpc_id) = vpc_id {
        args.push("--filters".to_string());
        args.push(format!("Name=vpc-id,Values={vpc_id}"));
    }
    args
}

/// Discover the occupied blocks of a region.
///
/// With `vpc_id`, the result is that VPC's subnets, for finding room inside
/// the VPC. Without it, every VPC CIDR in the region.
pub fn fetch_blocks(
    settings: &Settings,
    vpc_id: Option<&str>,
) -> Result<Vec<OccupiedBlock>, Box<dyn Error>> {
    let blocks = match vpc_id {
        Some(vpc_id) => {
            let args = ec2_args(settings, "describe-subnets", Some(vpc_id));
            subnet_blocks(&cli::run(config::AWS_CLI, &args)?)?
        }
        None => {
            let args = ec2_args(settings, "describe-vpcs", None);
            vpc_blocks(&cli::run(config::AWS_CLI, &args)?)?
        }
    };
    log::info!(
        "Got {} occupied blocks from AWS region {} vpc={:?}",
        blocks.len(),
        settings.region,
        vpc_id
    );
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &str) -> String {
        std::fs::read_to_string(path).expect("Error reading test data")
    }

    #[test]
    fn test_vpc_blocks() {
        let blocks = vpc_blocks(&read("src/tests/test_data/aws_describe_vpcs_01.json")).unwrap();
        let cidrs: Vec<String> = blocks.iter().map(|b| b.range.to_string()).collect();
        assert_eq!(
            cidrs,
            vec![
                "10.8.0.0-10.11.255.255",
                "10.50.0.0-10.50.255.255",
                "2600:1f18:abc:de00::-2600:1f18:abc:deff:ffff:ffff:ffff:ffff",
                "10.10.0.0-10.10.255.255",
            ]
        );
        assert_eq!(blocks[0].id.as_deref(), Some("vpc-0a1b2c3d"));
        assert_eq!(blocks[0].name.as_deref(), Some("shared-services"));
        assert_eq!(blocks[3].name, None);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::TopLevel));
    }

    #[test]
    fn test_dual_stack_vpcs_keep_ipv4_tail() {
        let blocks = vpc_blocks(&read("src/tests/test_data/aws_describe_vpcs_01.json")).unwrap();
        let universe: AddressRange = "10.0.0.0/8".parse().unwrap();
        let segments = crate::find_ranges(universe, &blocks).unwrap();
        assert_eq!(segments.len(), 6);
        let tail = segments.last().unwrap();
        assert!(tail.available);
        assert_eq!(tail.range.to_string(), "10.51.0.0-10.255.255.255");
        assert!(segments.iter().all(|s| s.range.family == universe.family));
    }

    #[test]
    fn test_subnet_blocks() {
        let blocks =
            subnet_blocks(&read("src/tests/test_data/aws_describe_subnets_01.json")).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id.as_deref(), Some("subnet-11111111"));
        assert_eq!(blocks[0].name.as_deref(), Some("app-a"));
        assert_eq!(blocks[1].range.to_string(), "10.8.1.0-10.8.1.255");
        assert!(blocks.iter().all(|b| b.kind == BlockKind::SubBlock));
    }

    #[test]
    fn test_parse_error_names_path() {
        let json = r#"{"Vpcs": [{"VpcId": 7}]}"#;
        let err = vpc_blocks(json).unwrap_err().to_string();
        assert!(err.contains("Vpcs[0].VpcId"), "{err}");
    }

    #[test]
    fn test_ec2_args() {
        let settings = Settings {
            aws_profile: Some("prod".to_string()),
            region: "eu-west-1".to_string(),
            cache_dir: ".".to_string(),
        };
        assert_eq!(
            ec2_args(&settings, "describe-subnets", Some("vpc-1")),
            vec![
                "ec2",
                "describe-subnets",
                "--region",
                "eu-west-1",
                "--output",
                "json",
                "--profile",
                "prod",
                "--filters",
                "Name=vpc-id,Values=vpc-1",
            ]
        );
    }
}
