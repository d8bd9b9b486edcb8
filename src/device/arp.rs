use serde::Deserialize;

use super::de;
use super::scalar::NxTimeStamp;

/// Body of `show ip arp detail vrf all`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IpArp {
    #[serde(rename = "TABLE_vrf", default, deserialize_with = "de::one_or_many")]
    pub table_vrf: Vec<ArpVrfTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ArpVrfTable {
    #[serde(rename = "ROW_vrf", default, deserialize_with = "de::one_or_many")]
    pub row_vrf: Vec<ArpVrf>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ArpVrf {
    #[serde(rename = "vrf-name-out", default)]
    pub vrf_name: String,
    #[serde(rename = "cnt-total", default, deserialize_with = "de::flex_i64")]
    pub entry_count: i64,
    #[serde(rename = "TABLE_adj", default, deserialize_with = "de::one_or_many")]
    pub table_adj: Vec<ArpAdjTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ArpAdjTable {
    #[serde(rename = "ROW_adj", default, deserialize_with = "de::one_or_many")]
    pub row_adj: Vec<ArpAdj>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ArpAdj {
    #[serde(rename = "intf-out", default)]
    pub interface: String,
    #[serde(rename = "ip-addr-out", default)]
    pub ip_addr: String,
    #[serde(rename = "time-stamp", default)]
    pub time_stamp: NxTimeStamp,
    #[serde(default)]
    pub mac: String,
    #[serde(rename = "phy-intf", default)]
    pub phy_interface: String,
}
