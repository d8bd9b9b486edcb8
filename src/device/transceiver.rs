use serde::Deserialize;

use super::de;

/// Body of `show interface transceiver details`. An interface with no
/// optics (or no DOM support) has no lane table at all.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransceiverDetail {
    #[serde(rename = "TABLE_interface", default, deserialize_with = "de::one_or_many")]
    pub table_interface: Vec<TransceiverTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransceiverTable {
    #[serde(rename = "ROW_interface", default, deserialize_with = "de::one_or_many")]
    pub row_interface: Vec<TransceiverRow>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransceiverRow {
    #[serde(default)]
    pub interface: String,
    #[serde(default)]
    pub sfp: String,
    #[serde(rename = "type", default)]
    pub sfp_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "serialnum", default)]
    pub serial_num: String,
    #[serde(rename = "TABLE_lane", default, deserialize_with = "de::one_or_many")]
    pub table_lane: Vec<LaneTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LaneTable {
    #[serde(rename = "ROW_lane", default, deserialize_with = "de::one_or_many")]
    pub row_lane: Vec<LaneRow>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LaneRow {
    #[serde(rename = "lane_number", default, deserialize_with = "de::flex_i64")]
    pub lane_number: i64,
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub temperature: i64,
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub voltage: i64,
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub current: i64,
    #[serde(rename = "tx_pwr", default, deserialize_with = "de::flex_i64")]
    pub tx_power: i64,
    #[serde(rename = "rx_pwr", default, deserialize_with = "de::flex_i64")]
    pub rx_power: i64,
    #[serde(rename = "xmit_faults", default, deserialize_with = "de::flex_i64")]
    pub xmit_faults: i64,
}
