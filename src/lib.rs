pub mod config;
pub mod device;
pub mod flatten;
pub mod metrics;
pub mod poll;
pub mod reload;
pub mod schedule;
pub mod upload;

/// Common types used across modules
pub mod types {
    /// One (query block, host) pair: everything needed to open an
    /// NX-API session against a single device.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Target {
        pub host: String,
        pub user: String,
        pub password: String,
        pub port: u16,
        pub protocol: String,
    }

    impl Target {
        /// Base URL of the device's NX-API endpoint.
        pub fn endpoint(&self) -> String {
            format!("{}://{}:{}/ins", self.protocol, self.host, self.port)
        }
    }
}
