pub mod arp;
pub mod bgp;
pub mod de;
pub mod interface;
pub mod isis;
pub mod route;
pub mod scalar;
pub mod transceiver;
pub mod version;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::types::Target;

/// The fixed set of show commands issued per host per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    Version,
    BgpSessions,
    IpRoute,
    IpArp,
    InterfaceStatus,
    TransceiverDetail,
    IsisAdjacency,
}

impl ShowCommand {
    pub const ALL: [ShowCommand; 7] = [
        ShowCommand::Version,
        ShowCommand::BgpSessions,
        ShowCommand::IpRoute,
        ShowCommand::IpArp,
        ShowCommand::InterfaceStatus,
        ShowCommand::TransceiverDetail,
        ShowCommand::IsisAdjacency,
    ];

    /// The CLI string sent to the device.
    pub fn cli(&self) -> &'static str {
        match self {
            ShowCommand::Version => "show version",
            ShowCommand::BgpSessions => "show bgp sessions",
            ShowCommand::IpRoute => "show ip route",
            ShowCommand::IpArp => "show ip arp detail vrf all",
            ShowCommand::InterfaceStatus => "show interface quick",
            ShowCommand::TransceiverDetail => "show interface transceiver details",
            ShowCommand::IsisAdjacency => "show isis adjacency detail",
        }
    }

    /// Short name for logging and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ShowCommand::Version => "version",
            ShowCommand::BgpSessions => "bgp_sessions",
            ShowCommand::IpRoute => "ip_route",
            ShowCommand::IpArp => "ip_arp",
            ShowCommand::InterfaceStatus => "interface",
            ShowCommand::TransceiverDetail => "transceiver",
            ShowCommand::IsisAdjacency => "isis_adjacency",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }
}

/// Seam between the poller and the device transport. Implemented by
/// the real NX-API client and by test mocks.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Issue one show command and return the raw response payload.
    async fn show(&self, cmd: ShowCommand) -> Result<Vec<u8>>;
}

/// HTTP client for the NX-API endpoint of one device.
///
/// Devices commonly run self-signed certificates, so TLS verification
/// is disabled; the per-request timeout bounds a hung device.
pub struct NxapiClient {
    http: reqwest::Client,
    endpoint: String,
    user: String,
    password: String,
}

impl NxapiClient {
    pub fn new(target: &Target) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Building NX-API HTTP client")?;
        Ok(Self {
            http,
            endpoint: target.endpoint(),
            user: target.user.clone(),
            password: target.password.clone(),
        })
    }
}

#[async_trait]
impl DeviceClient for NxapiClient {
    async fn show(&self, cmd: ShowCommand) -> Result<Vec<u8>> {
        let body = serde_json::json!({
            "ins_api": {
                "version": "1.0",
                "type": "cli_show",
                "chunk": "0",
                "sid": "1",
                "input": cmd.cli(),
                "output_format": "json",
            }
        });
        let resp = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Sending {:?}", cmd.cli()))?
            .error_for_status()
            .with_context(|| format!("Device rejected {:?}", cmd.cli()))?;
        Ok(resp.bytes().await?.to_vec())
    }
}

/// One round's raw payloads: a fixed-arity collection with one slot
/// per command kind. Slots for failed queries stay empty.
pub struct RawResponseSet {
    slots: [Option<Vec<u8>>; 7],
}

impl RawResponseSet {
    /// Issue every show command against one device. Individual query
    /// failures are logged and leave their slot empty; the rest of
    /// the round proceeds.
    pub async fn fetch(client: &dyn DeviceClient) -> Self {
        let mut slots: [Option<Vec<u8>>; 7] = Default::default();
        for cmd in ShowCommand::ALL {
            match client.show(cmd).await {
                Ok(payload) => slots[cmd.index()] = Some(payload),
                Err(e) => {
                    tracing::warn!(kind = cmd.name(), error = %e, "Query failed");
                }
            }
        }
        Self { slots }
    }

    pub fn get(&self, cmd: ShowCommand) -> Option<&[u8]> {
        self.slots[cmd.index()].as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }
}

/// The envelope every NX-API response arrives in. Only the body
/// varies by command kind. The explicit serde bounds carry the
/// `Default` requirement of the `body` field through the generic.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "B: DeserializeOwned + Default"))]
struct Envelope<B> {
    ins_api: InsApi<B>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "B: DeserializeOwned + Default"))]
struct InsApi<B> {
    outputs: Outputs<B>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "B: DeserializeOwned + Default"))]
struct Outputs<B> {
    output: Output<B>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "B: DeserializeOwned + Default"))]
struct Output<B> {
    #[serde(default)]
    body: B,
    #[serde(default)]
    code: String,
    #[serde(default)]
    msg: String,
}

/// Unwrap the ins_api envelope around one response body.
pub fn decode_body<B>(payload: &[u8]) -> Result<B>
where
    B: DeserializeOwned + Default,
{
    let envelope: Envelope<B> =
        serde_json::from_slice(payload).context("Parsing NX-API response")?;
    let output = envelope.ins_api.outputs.output;
    if !output.code.is_empty() && !output.code.starts_with('2') {
        anyhow::bail!("device returned code {}: {}", output.code, output.msg);
    }
    Ok(output.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Body {
        #[serde(default)]
        value: i64,
    }

    #[test]
    fn decode_unwraps_envelope() {
        let raw = br#"{"ins_api":{"outputs":{"output":{"body":{"value":7},"code":"200","msg":"Success"}},"sid":"eoc","type":"cli_show","version":"1.0"}}"#;
        let body: Body = decode_body(raw).unwrap();
        assert_eq!(body, Body { value: 7 });
    }

    #[test]
    fn decode_defaults_a_missing_body() {
        let raw = br#"{"ins_api":{"outputs":{"output":{"code":"200","msg":"Success"}}}}"#;
        let body: Body = decode_body(raw).unwrap();
        assert_eq!(body, Body::default());
    }

    #[test]
    fn decode_rejects_cli_error() {
        let raw = br#"{"ins_api":{"outputs":{"output":{"code":"400","msg":"CLI execution error"}}}}"#;
        let err = decode_body::<Body>(raw).unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_body::<Body>(b"not json").is_err());
    }

    #[test]
    fn command_slots_are_stable() {
        for (i, cmd) in ShowCommand::ALL.iter().enumerate() {
            assert_eq!(cmd.index(), i);
        }
    }
}
