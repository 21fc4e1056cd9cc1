use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum GatewayError {
    Network(String),
    Status(u16, String),
    Decode(String),
    Config(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Network(msg) => write!(f, "Network error: {msg}"),
            GatewayError::Status(code, msg) => write!(f, "Backend HTTP {code}: {msg}"),
            GatewayError::Decode(msg) => write!(f, "Response decode error: {msg}"),
            GatewayError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl Error for GatewayError {}
