use serde::Deserialize;

use super::de;
use super::scalar::NxDuration;

/// Body of `show ip route`: the deepest nesting of any command kind,
/// six table levels from VRF down to the individual path.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IpRoute {
    #[serde(rename = "TABLE_vrf", default, deserialize_with = "de::one_or_many")]
    pub table_vrf: Vec<RouteVrfTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RouteVrfTable {
    #[serde(rename = "ROW_vrf", default, deserialize_with = "de::one_or_many")]
    pub row_vrf: Vec<RouteVrf>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RouteVrf {
    #[serde(rename = "vrf-name-out", default)]
    pub vrf_name: String,
    #[serde(rename = "TABLE_addrf", default, deserialize_with = "de::one_or_many")]
    pub table_addrf: Vec<RouteAddrfTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RouteAddrfTable {
    #[serde(rename = "ROW_addrf", default, deserialize_with = "de::one_or_many")]
    pub row_addrf: Vec<RouteAddrf>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RouteAddrf {
    #[serde(rename = "addrf", default)]
    pub addrf: String,
    #[serde(rename = "TABLE_prefix", default, deserialize_with = "de::one_or_many")]
    pub table_prefix: Vec<RoutePrefixTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RoutePrefixTable {
    #[serde(rename = "ROW_prefix", default, deserialize_with = "de::one_or_many")]
    pub row_prefix: Vec<RoutePrefix>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RoutePrefix {
    #[serde(rename = "ipprefix", default)]
    pub ip_prefix: String,
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub attached: bool,
    #[serde(rename = "ucast-nhops", default, deserialize_with = "de::flex_i64")]
    pub ucast_nhops: i64,
    #[serde(rename = "mcast-nhops", default, deserialize_with = "de::flex_i64")]
    pub mcast_nhops: i64,
    #[serde(rename = "TABLE_path", default, deserialize_with = "de::one_or_many")]
    pub table_path: Vec<RoutePathTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RoutePathTable {
    #[serde(rename = "ROW_path", default, deserialize_with = "de::one_or_many")]
    pub row_path: Vec<RoutePath>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RoutePath {
    #[serde(rename = "clientname", default)]
    pub client_name: String,
    #[serde(rename = "ifname", default)]
    pub if_name: String,
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub metric: i64,
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub pref: i64,
    #[serde(rename = "ubest", default, deserialize_with = "de::flex_bool")]
    pub unicast_best: bool,
    #[serde(rename = "uptime", default)]
    pub uptime: NxDuration,
}
