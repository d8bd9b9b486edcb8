//! Renders flat records as Prometheus exposition lines.
//!
//! All metrics share the `nxos_` prefix and carry a fixed label set
//! per metric name. The emitter only appends to its buffer; writing
//! the result to stdout or the push collector is the caller's job.

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;

use crate::device::interface::InterfaceRow;
use crate::device::version::Version;
use crate::flatten::{ArpEntryFlat, BgpSessionFlat, IsisAdjFlat, RouteFlat, TransceiverFlat};

/// Append-only buffer of rendered metric lines.
#[derive(Debug, Default)]
pub struct MetricBuf {
    buf: String,
}

impl MetricBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `name{label="value",...} value` line.
    pub fn line(&mut self, name: &str, labels: &[(&str, &str)], value: impl fmt::Display) {
        self.buf.push_str(name);
        if !labels.is_empty() {
            self.buf.push('{');
            for (i, (key, val)) in labels.iter().enumerate() {
                if i > 0 {
                    self.buf.push(',');
                }
                let _ = write!(self.buf, "{}=\"{}\"", key, escape_label(val));
            }
            self.buf.push('}');
        }
        let _ = writeln!(self.buf, " {}", value);
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Escape a label value per the exposition format: backslash, quote
/// and newline.
fn escape_label(v: &str) -> Cow<'_, str> {
    if !v.contains(['\\', '"', '\n']) {
        return Cow::Borrowed(v);
    }
    let mut out = String::with_capacity(v.len() + 2);
    for c in v.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// BGP neighbor FSM states. Established first so a healthy session
/// reads as 1.
pub const BGP_STATE_CODES: &[(&str, i64)] = &[
    ("Established", 1),
    ("Idle", 2),
    ("Connect", 3),
    ("Active", 4),
    ("OpenSent", 5),
    ("OpenConfirm", 6),
    ("Shut", 7),
];

pub const INTERFACE_STATE_CODES: &[(&str, i64)] =
    &[("up", 1), ("down", 2), ("testing", 3)];

pub const ISIS_ADJ_STATE_CODES: &[(&str, i64)] =
    &[("UP", 1), ("INIT", 2), ("DOWN", 3), ("LOST", 4)];

/// Map an enumerable device state through an ordered lookup table.
/// Unrecognized states map to 0 rather than failing.
pub fn state_code(table: &[(&str, i64)], state: &str) -> i64 {
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(state))
        .map(|(_, code)| *code)
        .unwrap_or(0)
}

/// Multiplier from a device size-unit suffix to bytes. `None` for
/// unrecognized suffixes; the caller then keeps the raw value and
/// retains the unit as a label.
pub fn unit_multiplier(unit: &str) -> Option<f64> {
    match unit {
        "B" => Some(1.0),
        "kB" | "KB" => Some(1024.0),
        "mB" | "MB" => Some(1024.0 * 1024.0),
        "gB" | "GB" => Some(1024.0 * 1024.0 * 1024.0),
        "tB" | "TB" => Some(1024.0 * 1024.0 * 1024.0 * 1024.0),
        _ => None,
    }
}

/// `nxos_up{host,chassis,version}`, `nxos_uptime_seconds{host}`,
/// `nxos_memory_bytes{host}` (or `nxos_memory{host,unit}` when the
/// reported unit is unrecognized).
pub fn emit_version(buf: &mut MetricBuf, host: &str, v: &Version) {
    buf.line(
        "nxos_up",
        &[("host", host), ("chassis", v.chassis_id.as_str()), ("version", v.os_version())],
        1,
    );
    buf.line("nxos_uptime_seconds", &[("host", host)], v.uptime_secs());
    if v.memory > 0 {
        match unit_multiplier(&v.mem_type) {
            Some(mult) => {
                buf.line("nxos_memory_bytes", &[("host", host)], v.memory as f64 * mult)
            }
            None => buf.line(
                "nxos_memory",
                &[("host", host), ("unit", v.mem_type.as_str())],
                v.memory,
            ),
        }
    }
}

/// Per neighbor: `nxos_bgp_state{host,vrf,router_id,neighbor,remote_as}`
/// plus `nxos_bgp_{conndrop,notifications_sent,notifications_recv}_count`
/// and `nxos_bgp_{lastflap,lastread,lastwrite}_seconds`, all labelled
/// `{host,vrf,router_id,neighbor}`.
pub fn emit_bgp(buf: &mut MetricBuf, host: &str, records: &[BgpSessionFlat]) {
    for r in records {
        let remote_as = r.remote_as.to_string();
        let state_labels = [
            ("host", host),
            ("vrf", r.vrf_name.as_str()),
            ("router_id", r.router_id.as_str()),
            ("neighbor", r.neighbor_id.as_str()),
            ("remote_as", remote_as.as_str()),
        ];
        buf.line("nxos_bgp_state", &state_labels, state_code(BGP_STATE_CODES, &r.state));
        let labels = &state_labels[..4];
        buf.line("nxos_bgp_conndrop_count", labels, r.connections_dropped);
        buf.line("nxos_bgp_notifications_sent_count", labels, r.notifications_sent);
        buf.line("nxos_bgp_notifications_recv_count", labels, r.notifications_received);
        buf.line("nxos_bgp_lastflap_seconds", labels, r.last_flap.as_secs());
        buf.line("nxos_bgp_lastread_seconds", labels, r.last_read.as_secs());
        buf.line("nxos_bgp_lastwrite_seconds", labels, r.last_write.as_secs());
    }
}

/// Per path: `nxos_route_{best,pref,metric,uptime_seconds}` labelled
/// `{host,vrf,addrf,prefix,ifname,client}`.
pub fn emit_routes(buf: &mut MetricBuf, host: &str, records: &[RouteFlat]) {
    for r in records {
        let labels = [
            ("host", host),
            ("vrf", r.vrf_name.as_str()),
            ("addrf", r.addrf.as_str()),
            ("prefix", r.ip_prefix.as_str()),
            ("ifname", r.if_name.as_str()),
            ("client", r.client_name.as_str()),
        ];
        buf.line("nxos_route_best", &labels, r.unicast_best as i64);
        buf.line("nxos_route_pref", &labels, r.pref);
        buf.line("nxos_route_metric", &labels, r.metric);
        buf.line("nxos_route_uptime_seconds", &labels, r.uptime.as_secs());
    }
}

/// Per adjacency: `nxos_arp_entry{host,vrf,intf,phy_intf,ip,mac} 1`
/// and, when the device reported one, the entry's last-seen time as
/// `nxos_arp_seen_timestamp_seconds` with the same labels.
pub fn emit_arp(buf: &mut MetricBuf, host: &str, records: &[ArpEntryFlat]) {
    for r in records {
        let labels = [
            ("host", host),
            ("vrf", r.vrf_name.as_str()),
            ("intf", r.interface.as_str()),
            ("phy_intf", r.phy_interface.as_str()),
            ("ip", r.ip_addr.as_str()),
            ("mac", r.mac.as_str()),
        ];
        buf.line("nxos_arp_entry", &labels, 1);
        if r.time_stamp.unix_secs() != 0 {
            buf.line("nxos_arp_seen_timestamp_seconds", &labels, r.time_stamp.unix_secs());
        }
    }
}

/// Per interface, labelled `{host,interface}`: operational and admin
/// state codes, MTU, load/reliability gauges and the VDC-level
/// packet/byte counters.
pub fn emit_interfaces(buf: &mut MetricBuf, host: &str, rows: &[InterfaceRow]) {
    for r in rows {
        let labels = [("host", host), ("interface", r.interface.as_str())];
        buf.line("nxos_interface_state", &labels, state_code(INTERFACE_STATE_CODES, &r.state));
        buf.line(
            "nxos_interface_admin_state",
            &labels,
            state_code(INTERFACE_STATE_CODES, &r.admin_state),
        );
        buf.line("nxos_interface_mtu_bytes", &labels, r.mtu);
        buf.line("nxos_interface_reliability", &labels, r.reliability);
        buf.line("nxos_interface_txload", &labels, r.tx_load);
        buf.line("nxos_interface_rxload", &labels, r.rx_load);
        buf.line("nxos_interface_in_pkts_count", &labels, r.in_pkts);
        buf.line("nxos_interface_in_bytes_count", &labels, r.in_bytes);
        buf.line("nxos_interface_in_ucast_count", &labels, r.in_ucast);
        buf.line("nxos_interface_in_mcast_count", &labels, r.in_mcast);
        buf.line("nxos_interface_in_bcast_count", &labels, r.in_bcast);
        buf.line("nxos_interface_out_pkts_count", &labels, r.out_pkts);
        buf.line("nxos_interface_out_bytes_count", &labels, r.out_bytes);
        buf.line("nxos_interface_out_ucast_count", &labels, r.out_ucast);
        buf.line("nxos_interface_out_mcast_count", &labels, r.out_mcast);
        buf.line("nxos_interface_out_bcast_count", &labels, r.out_bcast);
    }
}

/// Per interface: one `nxos_transceiver_present{host,interface,sfp,
/// type,name,serial}` line, then per lane the DOM gauges labelled
/// `{host,interface,lane}`. Records arrive in depth-first order, so
/// lanes of one interface are contiguous.
pub fn emit_transceivers(buf: &mut MetricBuf, host: &str, records: &[TransceiverFlat]) {
    let mut last_interface = "";
    for r in records {
        if r.interface != last_interface {
            buf.line(
                "nxos_transceiver_present",
                &[
                    ("host", host),
                    ("interface", r.interface.as_str()),
                    ("sfp", r.sfp.as_str()),
                    ("type", r.sfp_type.as_str()),
                    ("name", r.name.as_str()),
                    ("serial", r.serial_num.as_str()),
                ],
                1,
            );
            last_interface = &r.interface;
        }
        let lane = r.lane_number.to_string();
        let labels = [
            ("host", host),
            ("interface", r.interface.as_str()),
            ("lane", lane.as_str()),
        ];
        buf.line("nxos_transceiver_temperature", &labels, r.temperature);
        buf.line("nxos_transceiver_voltage", &labels, r.voltage);
        buf.line("nxos_transceiver_current", &labels, r.current);
        buf.line("nxos_transceiver_tx_power", &labels, r.tx_power);
        buf.line("nxos_transceiver_rx_power", &labels, r.rx_power);
        buf.line("nxos_transceiver_xmit_faults_count", &labels, r.xmit_faults);
    }
}

/// Per adjacency, labelled `{host,vrf,neighbor,interface}`: state
/// code, transition counter and hold/flap times in seconds.
pub fn emit_isis(buf: &mut MetricBuf, host: &str, records: &[IsisAdjFlat]) {
    for r in records {
        let labels = [
            ("host", host),
            ("vrf", r.vrf_name.as_str()),
            ("neighbor", r.sys_name.as_str()),
            ("interface", r.interface.as_str()),
        ];
        buf.line("nxos_isis_adj_state", &labels, state_code(ISIS_ADJ_STATE_CODES, &r.state));
        buf.line("nxos_isis_adj_transitions_count", &labels, r.transitions);
        buf.line("nxos_isis_adj_holdtime_seconds", &labels, r.hold_time.as_secs());
        buf.line("nxos_isis_adj_flap_seconds", &labels, r.flap_time.as_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::scalar::NxDuration;

    #[test]
    fn line_renders_labels_and_value() {
        let mut buf = MetricBuf::new();
        buf.line("nxos_up", &[("host", "sw1"), ("version", "9.3(5)")], 1);
        assert_eq!(buf.as_str(), "nxos_up{host=\"sw1\",version=\"9.3(5)\"} 1\n");
        let mut buf = MetricBuf::new();
        buf.line("nxos_uptime_seconds", &[], 42);
        assert_eq!(buf.as_str(), "nxos_uptime_seconds 42\n");
    }

    #[test]
    fn label_values_are_escaped() {
        let mut buf = MetricBuf::new();
        buf.line("m", &[("desc", "a\"b\\c\nd")], 0);
        assert_eq!(buf.as_str(), "m{desc=\"a\\\"b\\\\c\\nd\"} 0\n");
    }

    #[test]
    fn state_codes_default_to_zero() {
        assert_eq!(state_code(BGP_STATE_CODES, "Established"), 1);
        assert_eq!(state_code(BGP_STATE_CODES, "Idle"), 2);
        assert_eq!(state_code(BGP_STATE_CODES, "weird"), 0);
        assert_eq!(state_code(INTERFACE_STATE_CODES, "up"), 1);
        assert_eq!(state_code(INTERFACE_STATE_CODES, "UP"), 1);
        assert_eq!(state_code(ISIS_ADJ_STATE_CODES, "LOST"), 4);
    }

    #[test]
    fn same_quantity_normalizes_identically_across_units() {
        // 1536 kB and 1.5 mB are the same quantity.
        let kb = 1536.0 * unit_multiplier("kB").unwrap();
        let mb = 1.5 * unit_multiplier("mB").unwrap();
        assert_eq!(kb, mb);
        assert_eq!(kb, 1_572_864.0);
        assert!(unit_multiplier("furlongs").is_none());
        // non-size suffixes are kept as labels, never guessed at
        assert!(unit_multiplier("mW").is_none());
    }

    #[test]
    fn unrecognized_memory_unit_kept_as_label() {
        use crate::device::version::Version;
        let v = Version { memory: 100, mem_type: "pages".into(), ..Default::default() };
        let mut buf = MetricBuf::new();
        emit_version(&mut buf, "sw1", &v);
        assert!(buf.as_str().contains("nxos_memory{host=\"sw1\",unit=\"pages\"} 100\n"));
    }

    #[test]
    fn established_neighbor_emits_state_one_and_conndrops() {
        let rec = crate::flatten::BgpSessionFlat {
            vrf_name: "default".into(),
            router_id: "10.0.0.1".into(),
            local_as: 65000,
            vrf_peers: 1,
            vrf_established_peers: 1,
            neighbor_id: "10.0.0.2".into(),
            state: "Established".into(),
            connections_dropped: 3,
            notifications_received: 0,
            notifications_sent: 0,
            remote_as: 65001,
            local_port: 179,
            remote_port: 30001,
            last_flap: NxDuration::from_secs(90),
            last_read: NxDuration::from_secs(1),
            last_write: NxDuration::from_secs(2),
        };
        let mut buf = MetricBuf::new();
        emit_bgp(&mut buf, "sw1", &[rec]);
        let text = buf.as_str();
        assert!(text.contains(
            "nxos_bgp_state{host=\"sw1\",vrf=\"default\",router_id=\"10.0.0.1\",neighbor=\"10.0.0.2\",remote_as=\"65001\"} 1\n"
        ));
        assert!(text.contains(
            "nxos_bgp_conndrop_count{host=\"sw1\",vrf=\"default\",router_id=\"10.0.0.1\",neighbor=\"10.0.0.2\"} 3\n"
        ));
        assert!(text.contains("nxos_bgp_lastflap_seconds{") && text.contains("} 90\n"));
    }

    #[test]
    fn transceiver_present_emitted_once_per_interface() {
        let lane = |iface: &str, n: i64| crate::flatten::TransceiverFlat {
            interface: iface.into(),
            sfp: "present".into(),
            lane_number: n,
            ..Default::default()
        };
        let mut buf = MetricBuf::new();
        emit_transceivers(&mut buf, "sw1", &[lane("Eth1/1", 1), lane("Eth1/1", 2), lane("Eth1/2", 1)]);
        let present = buf.as_str().matches("nxos_transceiver_present{").count();
        assert_eq!(present, 2);
    }
}
