use serde::Deserialize;

use super::de;

/// Body of `show interface quick`: one row per interface, two table
/// levels, no deeper nesting.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct InterfaceStatus {
    #[serde(rename = "TABLE_interface", default, deserialize_with = "de::one_or_many")]
    pub table_interface: Vec<InterfaceTable>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct InterfaceTable {
    #[serde(rename = "ROW_interface", default, deserialize_with = "de::one_or_many")]
    pub row_interface: Vec<InterfaceRow>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct InterfaceRow {
    #[serde(default)]
    pub interface: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "state_rsn_desc", default)]
    pub state_reason: String,
    #[serde(default)]
    pub admin_state: String,
    #[serde(rename = "eth_mtu", default, deserialize_with = "de::flex_i64")]
    pub mtu: i64,
    #[serde(rename = "eth_reliability", default, deserialize_with = "de::flex_i64")]
    pub reliability: i64,
    #[serde(rename = "eth_txload", default, deserialize_with = "de::flex_i64")]
    pub tx_load: i64,
    #[serde(rename = "eth_rxload", default, deserialize_with = "de::flex_i64")]
    pub rx_load: i64,
    #[serde(rename = "vdc_lvl_in_pkts", default, deserialize_with = "de::flex_i64")]
    pub in_pkts: i64,
    #[serde(rename = "vdc_lvl_in_bytes", default, deserialize_with = "de::flex_i64")]
    pub in_bytes: i64,
    #[serde(rename = "vdc_lvl_in_ucast", default, deserialize_with = "de::flex_i64")]
    pub in_ucast: i64,
    #[serde(rename = "vdc_lvl_in_mcast", default, deserialize_with = "de::flex_i64")]
    pub in_mcast: i64,
    #[serde(rename = "vdc_lvl_in_bcast", default, deserialize_with = "de::flex_i64")]
    pub in_bcast: i64,
    #[serde(rename = "vdc_lvl_out_pkts", default, deserialize_with = "de::flex_i64")]
    pub out_pkts: i64,
    #[serde(rename = "vdc_lvl_out_bytes", default, deserialize_with = "de::flex_i64")]
    pub out_bytes: i64,
    #[serde(rename = "vdc_lvl_out_ucast", default, deserialize_with = "de::flex_i64")]
    pub out_ucast: i64,
    #[serde(rename = "vdc_lvl_out_mcast", default, deserialize_with = "de::flex_i64")]
    pub out_mcast: i64,
    #[serde(rename = "vdc_lvl_out_bcast", default, deserialize_with = "de::flex_i64")]
    pub out_bcast: i64,
}
