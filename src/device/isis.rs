use serde::Deserialize;

use super::de;
use super::scalar::NxDuration;

/// Body of `show isis adjacency detail`: process tag → VRF →
/// adjacency, three table levels.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IsisAdjacency {
    #[serde(rename = "TABLE_process_tag", default, deserialize_with = "de::one_or_many")]
    pub table_process_tag: Vec<IsisProcessTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct IsisProcessTable {
    #[serde(rename = "ROW_process_tag", default, deserialize_with = "de::one_or_many")]
    pub row_process_tag: Vec<IsisProcess>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct IsisProcess {
    #[serde(rename = "process-tag-out", default)]
    pub process_tag: String,
    #[serde(rename = "TABLE_vrf", default, deserialize_with = "de::one_or_many")]
    pub table_vrf: Vec<IsisVrfTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct IsisVrfTable {
    #[serde(rename = "ROW_vrf", default, deserialize_with = "de::one_or_many")]
    pub row_vrf: Vec<IsisVrf>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct IsisVrf {
    #[serde(rename = "vrf-name-out", default)]
    pub vrf_name: String,
    #[serde(rename = "TABLE_process_adj", default, deserialize_with = "de::one_or_many")]
    pub table_adj: Vec<IsisAdjTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct IsisAdjTable {
    #[serde(rename = "ROW_process_adj", default, deserialize_with = "de::one_or_many")]
    pub row_adj: Vec<IsisAdj>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct IsisAdj {
    #[serde(rename = "adj-sys-name-out", default)]
    pub sys_name: String,
    #[serde(rename = "adj-sys-id-out", default)]
    pub sys_id: String,
    #[serde(rename = "adj-usage-out", default)]
    pub usage: String,
    #[serde(rename = "adj-state-out", default)]
    pub state: String,
    #[serde(rename = "adj-intf-name-out", default)]
    pub interface: String,
    #[serde(rename = "adj-ipv4-addr-out", default)]
    pub ipv4_addr: String,
    #[serde(rename = "adj-hold-time-out", default)]
    pub hold_time: NxDuration,
    #[serde(rename = "adj-transitions-out", default, deserialize_with = "de::flex_i64")]
    pub transitions: i64,
    #[serde(rename = "adj-flap-time-out", default)]
    pub flap_time: NxDuration,
}
