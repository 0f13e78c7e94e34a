use {crate::Result, serde::Deserialize, std::time::Duration};

///
/// Configuration for the HTTP server
///
/// Controls where the engine binds, how large request bodies may be, how long
/// graceful shutdown may take, and which diagnostics are emitted while the route
/// table is built and served.
///
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// IP address to bind the HTTP server to
    /// The default `bind_addr` is "127.0.0.1".
    #[serde(default = "HttpConfig::default_bind_addr")]
    pub bind_addr: String,

    /// Port to bind the HTTP server to
    /// The default `bind_port` is 3000.
    #[serde(default = "HttpConfig::default_bind_port")]
    pub bind_port: u16,

    /// Maximum payload size in bytes for incoming HTTP requests.
    /// Requests with larger bodies are rejected with 413 Payload Too Large
    /// before any handler runs. By default `max_payload_size_bytes` is 32KiB.
    #[serde(default = "HttpConfig::default_max_payload_size_bytes")]
    pub max_payload_size_bytes: byte_unit::Byte,

    /// Maximum time to wait for in-flight requests once shutdown has begun.
    /// By default `shutdown_timeout` is set to 30 seconds.
    #[serde(
        default = "HttpConfig::default_shutdown_timeout",
        with = "humantime_serde"
    )]
    pub shutdown_timeout: Duration,

    /// Whether every request is wrapped in a `tower_http` trace span.
    /// Disabled by default.
    #[serde(default)]
    pub trace_requests: bool,

    /// Whether each route registration is logged at DEBUG level.
    /// Enabled by default.
    #[serde(default = "HttpConfig::default_log_routes")]
    pub log_routes: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: Self::default_bind_addr(),
            bind_port: Self::default_bind_port(),
            max_payload_size_bytes: Self::default_max_payload_size_bytes(),
            shutdown_timeout: Self::default_shutdown_timeout(),
            trace_requests: false,
            log_routes: Self::default_log_routes(),
        }
    }
}

impl HttpConfig {
    ///
    /// Returns the full bind address as a string in the format "IP:PORT".
    ///
    pub fn full_bind_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.bind_port)
    }

    /// Returns the payload limit as a `usize` suitable for body collection.
    pub fn max_payload_size(&self) -> usize {
        usize::try_from(self.max_payload_size_bytes.as_u64()).unwrap_or(usize::MAX)
    }

    fn default_bind_addr() -> String {
        "127.0.0.1".into()
    }

    fn default_bind_port() -> u16 {
        3000
    }

    fn default_max_payload_size_bytes() -> byte_unit::Byte {
        byte_unit::Byte::from_u64(32 * 1024)
    }

    fn default_shutdown_timeout() -> Duration {
        Duration::from_secs(30)
    }

    fn default_log_routes() -> bool {
        true
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(crate::Error::config(
                "HTTP bind_addr is required. Set [http] bind_addr = \"0.0.0.0\" or \"127.0.0.1\" in config.",
            ));
        }

        if self.bind_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(crate::Error::config(
                "HTTP bind_addr must be a valid IP address. Examples: \"127.0.0.1\", \"0.0.0.0\", \"::1\"",
            ));
        }

        Ok(())
    }
}
