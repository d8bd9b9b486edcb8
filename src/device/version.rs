use serde::Deserialize;

use super::de;

/// Body of `show version`: a single record, no table nesting.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub bios_ver_str: String,
    #[serde(default)]
    pub kickstart_ver_str: String,
    #[serde(default)]
    pub nxos_ver_str: String,
    #[serde(default)]
    pub chassis_id: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub cpu_name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default, deserialize_with = "de::flex_u64")]
    pub memory: u64,
    #[serde(default)]
    pub mem_type: String,
    #[serde(default, deserialize_with = "de::flex_u64")]
    pub kern_uptm_days: u64,
    #[serde(default, deserialize_with = "de::flex_u64")]
    pub kern_uptm_hrs: u64,
    #[serde(default, deserialize_with = "de::flex_u64")]
    pub kern_uptm_mins: u64,
    #[serde(default, deserialize_with = "de::flex_u64")]
    pub kern_uptm_secs: u64,
    #[serde(default)]
    pub rr_reason: String,
}

impl Version {
    /// Firmware version string; newer images report nxos_ver_str,
    /// older ones kickstart_ver_str.
    pub fn os_version(&self) -> &str {
        if self.nxos_ver_str.is_empty() {
            &self.kickstart_ver_str
        } else {
            &self.nxos_ver_str
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        ((self.kern_uptm_days * 24 + self.kern_uptm_hrs) * 60 + self.kern_uptm_mins) * 60
            + self.kern_uptm_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_sums_components() {
        let v = Version {
            kern_uptm_days: 2,
            kern_uptm_hrs: 3,
            kern_uptm_mins: 4,
            kern_uptm_secs: 5,
            ..Default::default()
        };
        assert_eq!(v.uptime_secs(), 2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
    }

    #[test]
    fn os_version_prefers_nxos_string() {
        let mut v = Version { kickstart_ver_str: "7.0(3)".into(), ..Default::default() };
        assert_eq!(v.os_version(), "7.0(3)");
        v.nxos_ver_str = "9.3(5)".into();
        assert_eq!(v.os_version(), "9.3(5)");
    }
}
