// channel.rs
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::io::{BufRead, BufReader};
use std::sync::mpsc::{self, Receiver};
use url::Url;

use crate::gateway::GatewayError;

/// Events the push channel delivers. `Broadcast` means a new shipment was
/// created somewhere; `Exception` carries server-pushed error strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Broadcast,
    Exception(Vec<String>),
}

/// The live-update transport seam. The real wire protocol is an external
/// collaborator; anything that can authenticate with a bearer credential
/// and hand back a stream of events fits here.
pub trait PushChannel {
    fn connect(&self, credential: &str) -> Result<Receiver<ChannelEvent>, GatewayError>;
}

/// Minimal shipped transport: a long-lived GET of `{base}/events` whose
/// body is one JSON event per line, e.g.
/// `{"event":"broadcast"}` or `{"event":"exception","errors":["..."]}`.
pub struct HttpEventStream {
    client: Client,
    base: Url,
}

impl HttpEventStream {
    pub fn new(backend_url: &str) -> Result<Self, GatewayError> {
        let mut normalized = backend_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base = Url::parse(&normalized)
            .map_err(|e| GatewayError::Config(format!("bad backend URL: {e}")))?;

        // No request timeout: the whole point of this connection is to stay
        // open until the process shuts down.
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self { client, base })
    }
}

impl PushChannel for HttpEventStream {
    fn connect(&self, credential: &str) -> Result<Receiver<ChannelEvent>, GatewayError> {
        let url = self
            .base
            .join("events")
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {credential}"))
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(GatewayError::Status(status.as_u16(), body));
        }

        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let reader = BufReader::new(resp);
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        eprintln!("⚠️ event stream closed: {e}");
                        break;
                    }
                };

                if line.trim().is_empty() {
                    continue;
                }

                match parse_event(&line) {
                    Some(event) => {
                        if tx.send(event).is_err() {
                            // Listener detached, stop reading.
                            break;
                        }
                    }
                    None => eprintln!("⚠️ unrecognized channel event: {line}"),
                }
            }
        });

        Ok(rx)
    }
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    event: String,
    #[serde(default)]
    errors: Vec<String>,
}

fn parse_event(line: &str) -> Option<ChannelEvent> {
    let wire: WireEvent = serde_json::from_str(line).ok()?;

    match wire.event.as_str() {
        "broadcast" => Some(ChannelEvent::Broadcast),
        "exception" => Some(ChannelEvent::Exception(wire.errors)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_broadcast_events() {
        assert_eq!(parse_event(r#"{"event":"broadcast"}"#), Some(ChannelEvent::Broadcast));
    }

    #[test]
    fn parses_exception_events_with_errors() {
        let parsed = parse_event(r#"{"event":"exception","errors":["boom","again"]}"#);
        assert_eq!(
            parsed,
            Some(ChannelEvent::Exception(vec!["boom".to_string(), "again".to_string()]))
        );
    }

    #[test]
    fn unknown_or_malformed_lines_are_dropped() {
        assert_eq!(parse_event(r#"{"event":"ping"}"#), None);
        assert_eq!(parse_event("not json"), None);
    }
}
