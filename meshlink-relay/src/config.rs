pub const DEFAULT_RELAY_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// `host:port` to listen on.
    pub addr: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_RELAY_ADDR.to_owned(),
        }
    }
}
