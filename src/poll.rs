//! One polling round: query a device, decode what came back, render
//! metrics, then print or push them.

use serde::de::DeserializeOwned;
use tracing::{error, info_span, warn, Instrument};

use crate::device::{arp, bgp, interface, isis, route, transceiver, version};
use crate::device::{decode_body, DeviceClient, NxapiClient, RawResponseSet, ShowCommand};
use crate::metrics::{self, MetricBuf};
use crate::types::Target;
use crate::{flatten, upload};

/// Run one full round against one device. Never fails the caller:
/// every error is logged within the round's span and the round ends.
pub async fn run_round(target: Target, push: Option<String>) {
    let host = target.host.clone();
    let span = info_span!("round", host = %host);
    async move {
        let client = match NxapiClient::new(&target) {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "Client setup failed");
                return;
            }
        };
        let body = collect(&client, &host).await;
        if body.is_empty() {
            warn!("Round produced no metrics");
            return;
        }
        match &push {
            Some(base) => upload::push_metrics(base, &host, body).await,
            None => print!("metrics:\n{}", body),
        }
    }
    .instrument(span)
    .await
}

/// Fetch every command kind and render whatever decoded. Kinds decode
/// independently, so one malformed response costs only its own
/// metrics, not the round.
pub async fn collect(client: &dyn DeviceClient, host: &str) -> String {
    let raw = RawResponseSet::fetch(client).await;
    let mut buf = MetricBuf::new();
    if let Some(v) = decode::<version::Version>(&raw, ShowCommand::Version) {
        metrics::emit_version(&mut buf, host, &v);
    }
    if let Some(b) = decode::<bgp::BgpSessions>(&raw, ShowCommand::BgpSessions) {
        metrics::emit_bgp(&mut buf, host, &flatten::bgp_sessions(&b));
    }
    if let Some(b) = decode::<route::IpRoute>(&raw, ShowCommand::IpRoute) {
        metrics::emit_routes(&mut buf, host, &flatten::ip_routes(&b));
    }
    if let Some(b) = decode::<arp::IpArp>(&raw, ShowCommand::IpArp) {
        metrics::emit_arp(&mut buf, host, &flatten::arp_entries(&b));
    }
    if let Some(b) = decode::<interface::InterfaceStatus>(&raw, ShowCommand::InterfaceStatus) {
        metrics::emit_interfaces(&mut buf, host, &flatten::interfaces(&b));
    }
    if let Some(b) = decode::<transceiver::TransceiverDetail>(&raw, ShowCommand::TransceiverDetail)
    {
        metrics::emit_transceivers(&mut buf, host, &flatten::transceivers(&b));
    }
    if let Some(b) = decode::<isis::IsisAdjacency>(&raw, ShowCommand::IsisAdjacency) {
        metrics::emit_isis(&mut buf, host, &flatten::isis_adjacencies(&b));
    }
    buf.into_string()
}

fn decode<B>(raw: &RawResponseSet, cmd: ShowCommand) -> Option<B>
where
    B: DeserializeOwned + Default,
{
    let payload = raw.get(cmd)?;
    match decode_body(payload) {
        Ok(body) => Some(body),
        Err(e) => {
            // Keep the offending payload visible for diagnosis.
            warn!(
                kind = cmd.name(),
                error = %e,
                payload = %String::from_utf8_lossy(payload),
                "Decode failed"
            );
            None
        }
    }
}
