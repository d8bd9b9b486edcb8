use serde::Deserialize;

use super::de;
use super::scalar::NxDuration;

/// Body of `show bgp sessions`: VRFs, each holding its neighbor table.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BgpSessions {
    #[serde(rename = "TABLE_vrf", default, deserialize_with = "de::one_or_many")]
    pub table_vrf: Vec<BgpVrfTable>,
    #[serde(rename = "totalpeers", default, deserialize_with = "de::flex_i64")]
    pub total_peers: i64,
    #[serde(rename = "totalestablishedpeers", default, deserialize_with = "de::flex_i64")]
    pub total_established_peers: i64,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BgpVrfTable {
    #[serde(rename = "ROW_vrf", default, deserialize_with = "de::one_or_many")]
    pub row_vrf: Vec<BgpVrf>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BgpVrf {
    #[serde(rename = "vrf-name-out", default)]
    pub vrf_name: String,
    #[serde(rename = "router-id", default)]
    pub router_id: String,
    #[serde(rename = "local-as", default, deserialize_with = "de::flex_i64")]
    pub local_as: i64,
    #[serde(rename = "vrfpeers", default, deserialize_with = "de::flex_i64")]
    pub peers: i64,
    #[serde(rename = "vrfestablishedpeers", default, deserialize_with = "de::flex_i64")]
    pub established_peers: i64,
    #[serde(rename = "TABLE_neighbor", default, deserialize_with = "de::one_or_many")]
    pub table_neighbor: Vec<BgpNeighborTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BgpNeighborTable {
    #[serde(rename = "ROW_neighbor", default, deserialize_with = "de::one_or_many")]
    pub row_neighbor: Vec<BgpNeighbor>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BgpNeighbor {
    #[serde(rename = "neighbor-id", default)]
    pub neighbor_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "connectionsdropped", default, deserialize_with = "de::flex_i64")]
    pub connections_dropped: i64,
    #[serde(rename = "notificationsreceived", default, deserialize_with = "de::flex_i64")]
    pub notifications_received: i64,
    #[serde(rename = "notificationssent", default, deserialize_with = "de::flex_i64")]
    pub notifications_sent: i64,
    #[serde(rename = "remoteas", default, deserialize_with = "de::flex_i64")]
    pub remote_as: i64,
    #[serde(rename = "localport", default, deserialize_with = "de::flex_i64")]
    pub local_port: i64,
    #[serde(rename = "remoteport", default, deserialize_with = "de::flex_i64")]
    pub remote_port: i64,
    #[serde(rename = "lastflap", default)]
    pub last_flap: NxDuration,
    #[serde(rename = "lastread", default)]
    pub last_read: NxDuration,
    #[serde(rename = "lastwrite", default)]
    pub last_write: NxDuration,
}
