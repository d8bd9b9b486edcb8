//! Converts the nested TABLE/ROW response trees into flat records.
//!
//! Each flattener walks its tree depth first and emits one record per
//! deepest-level row, with every ancestor scalar field inlined. The
//! walk is a pure structural expansion: it cannot fail on a decoded
//! tree, allocates a fresh output each call, and preserves the
//! source's left-to-right table order.

use crate::device::arp::IpArp;
use crate::device::bgp::BgpSessions;
use crate::device::interface::{InterfaceRow, InterfaceStatus};
use crate::device::isis::IsisAdjacency;
use crate::device::route::IpRoute;
use crate::device::scalar::{NxDuration, NxTimeStamp};
use crate::device::transceiver::TransceiverDetail;

/// One BGP neighbor with its enclosing VRF's fields inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct BgpSessionFlat {
    pub vrf_name: String,
    pub router_id: String,
    pub local_as: i64,
    pub vrf_peers: i64,
    pub vrf_established_peers: i64,
    pub neighbor_id: String,
    pub state: String,
    pub connections_dropped: i64,
    pub notifications_received: i64,
    pub notifications_sent: i64,
    pub remote_as: i64,
    pub local_port: i64,
    pub remote_port: i64,
    pub last_flap: NxDuration,
    pub last_read: NxDuration,
    pub last_write: NxDuration,
}

pub fn bgp_sessions(body: &BgpSessions) -> Vec<BgpSessionFlat> {
    let mut out = Vec::new();
    for tv in &body.table_vrf {
        for rv in &tv.row_vrf {
            for tn in &rv.table_neighbor {
                for rn in &tn.row_neighbor {
                    out.push(BgpSessionFlat {
                        vrf_name: rv.vrf_name.clone(),
                        router_id: rv.router_id.clone(),
                        local_as: rv.local_as,
                        vrf_peers: rv.peers,
                        vrf_established_peers: rv.established_peers,
                        neighbor_id: rn.neighbor_id.clone(),
                        state: rn.state.clone(),
                        connections_dropped: rn.connections_dropped,
                        notifications_received: rn.notifications_received,
                        notifications_sent: rn.notifications_sent,
                        remote_as: rn.remote_as,
                        local_port: rn.local_port,
                        remote_port: rn.remote_port,
                        last_flap: rn.last_flap,
                        last_read: rn.last_read,
                        last_write: rn.last_write,
                    });
                }
            }
        }
    }
    out
}

/// One routing path with its prefix, address family and VRF inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFlat {
    pub vrf_name: String,
    pub addrf: String,
    pub ip_prefix: String,
    pub attached: bool,
    pub ucast_nhops: i64,
    pub mcast_nhops: i64,
    pub client_name: String,
    pub if_name: String,
    pub metric: i64,
    pub pref: i64,
    pub unicast_best: bool,
    pub uptime: NxDuration,
}

pub fn ip_routes(body: &IpRoute) -> Vec<RouteFlat> {
    let mut out = Vec::new();
    for tv in &body.table_vrf {
        for rv in &tv.row_vrf {
            for ta in &rv.table_addrf {
                for ra in &ta.row_addrf {
                    for tp in &ra.table_prefix {
                        for rp in &tp.row_prefix {
                            for tpath in &rp.table_path {
                                for path in &tpath.row_path {
                                    out.push(RouteFlat {
                                        vrf_name: rv.vrf_name.clone(),
                                        addrf: ra.addrf.clone(),
                                        ip_prefix: rp.ip_prefix.clone(),
                                        attached: rp.attached,
                                        ucast_nhops: rp.ucast_nhops,
                                        mcast_nhops: rp.mcast_nhops,
                                        client_name: path.client_name.clone(),
                                        if_name: path.if_name.clone(),
                                        metric: path.metric,
                                        pref: path.pref,
                                        unicast_best: path.unicast_best,
                                        uptime: path.uptime,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    out
}

/// One ARP adjacency with its VRF fields inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct ArpEntryFlat {
    pub vrf_name: String,
    pub vrf_entry_count: i64,
    pub interface: String,
    pub ip_addr: String,
    pub time_stamp: NxTimeStamp,
    pub mac: String,
    pub phy_interface: String,
}

pub fn arp_entries(body: &IpArp) -> Vec<ArpEntryFlat> {
    let mut out = Vec::new();
    for tv in &body.table_vrf {
        for rv in &tv.row_vrf {
            for ta in &rv.table_adj {
                for adj in &ta.row_adj {
                    out.push(ArpEntryFlat {
                        vrf_name: rv.vrf_name.clone(),
                        vrf_entry_count: rv.entry_count,
                        interface: adj.interface.clone(),
                        ip_addr: adj.ip_addr.clone(),
                        time_stamp: adj.time_stamp,
                        mac: adj.mac.clone(),
                        phy_interface: adj.phy_interface.clone(),
                    });
                }
            }
        }
    }
    out
}

/// Interfaces carry no ancestor context; flattening just collects the
/// rows in table order.
pub fn interfaces(body: &InterfaceStatus) -> Vec<InterfaceRow> {
    body.table_interface
        .iter()
        .flat_map(|t| t.row_interface.iter().cloned())
        .collect()
}

/// One transceiver lane with its interface fields inlined. An
/// interface without lane rows still yields one record with the lane
/// fields zeroed, so absent optics are visible rather than dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransceiverFlat {
    pub interface: String,
    pub sfp: String,
    pub sfp_type: String,
    pub name: String,
    pub serial_num: String,
    pub lane_number: i64,
    pub temperature: i64,
    pub voltage: i64,
    pub current: i64,
    pub tx_power: i64,
    pub rx_power: i64,
    pub xmit_faults: i64,
}

pub fn transceivers(body: &TransceiverDetail) -> Vec<TransceiverFlat> {
    let mut out = Vec::new();
    for ti in &body.table_interface {
        for ri in &ti.row_interface {
            let base = TransceiverFlat {
                interface: ri.interface.clone(),
                sfp: ri.sfp.clone(),
                sfp_type: ri.sfp_type.clone(),
                name: ri.name.clone(),
                serial_num: ri.serial_num.clone(),
                ..Default::default()
            };
            if ri.table_lane.is_empty() {
                out.push(base);
                continue;
            }
            for tl in &ri.table_lane {
                for lane in &tl.row_lane {
                    out.push(TransceiverFlat {
                        lane_number: lane.lane_number,
                        temperature: lane.temperature,
                        voltage: lane.voltage,
                        current: lane.current,
                        tx_power: lane.tx_power,
                        rx_power: lane.rx_power,
                        xmit_faults: lane.xmit_faults,
                        ..base.clone()
                    });
                }
            }
        }
    }
    out
}

/// One IS-IS adjacency with its VRF name inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct IsisAdjFlat {
    pub vrf_name: String,
    pub sys_name: String,
    pub sys_id: String,
    pub usage: String,
    pub state: String,
    pub interface: String,
    pub ipv4_addr: String,
    pub hold_time: NxDuration,
    pub transitions: i64,
    pub flap_time: NxDuration,
}

pub fn isis_adjacencies(body: &IsisAdjacency) -> Vec<IsisAdjFlat> {
    let mut out = Vec::new();
    for tpt in &body.table_process_tag {
        for rpt in &tpt.row_process_tag {
            for tv in &rpt.table_vrf {
                for rv in &tv.row_vrf {
                    for ta in &rv.table_adj {
                        for adj in &ta.row_adj {
                            out.push(IsisAdjFlat {
                                vrf_name: rv.vrf_name.clone(),
                                sys_name: adj.sys_name.clone(),
                                sys_id: adj.sys_id.clone(),
                                usage: adj.usage.clone(),
                                state: adj.state.clone(),
                                interface: adj.interface.clone(),
                                ipv4_addr: adj.ipv4_addr.clone(),
                                hold_time: adj.hold_time,
                                transitions: adj.transitions,
                                flap_time: adj.flap_time,
                            });
                        }
                    }
                }
            }
        }
    }
    out
}
