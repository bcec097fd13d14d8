use super::RequestsLoggingLevel;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Address the listener binds to, e.g. "127.0.0.1" or "0.0.0.0".
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}
