// gateway.rs
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

use crate::domain::{FilterCriteria, PageResult, ShipmentRecord};
use crate::gateway::models::{ListResponse, RawShipment};
use crate::gateway::GatewayError;

const USER_AGENT: &str = concat!("envios-backoffice/", env!("CARGO_PKG_VERSION"));

/// Seam between the store and the backend, so the reconciliation logic can
/// be exercised against a scripted source in tests.
pub trait ShipmentSource: Send + Sync {
    fn fetch_page(&self, criteria: &FilterCriteria) -> Result<PageResult, GatewayError>;
}

pub struct ShipmentGateway {
    client: Client,
    base: Url,
}

impl ShipmentGateway {
    pub fn new(backend_url: &str) -> Result<Self, GatewayError> {
        let base = parse_base(backend_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self { client, base })
    }

    fn list_url(&self) -> Result<Url, GatewayError> {
        self.base
            .join("shipments")
            .map_err(|e| GatewayError::Config(e.to_string()))
    }
}

impl ShipmentSource for ShipmentGateway {
    /// One paginated round trip: pagination plus every set predicate go out
    /// as query parameters, the response comes back as rows + total +
    /// facets. Total and facets are the backend's word, never recomputed
    /// here.
    fn fetch_page(&self, criteria: &FilterCriteria) -> Result<PageResult, GatewayError> {
        let url = self.list_url()?;

        let resp = self
            .client
            .get(url)
            .query(&criteria.to_query_params())
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16(), text));
        }

        let decoded: ListResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(PageResult {
            rows: normalize(decoded.shipments),
            total: decoded.count,
            facets: decoded.filters,
        })
    }
}

/// Attach the client-visible identity to each raw record. Records without a
/// usable document id are skipped, not guessed at.
pub(crate) fn normalize(raw: Vec<RawShipment>) -> Vec<ShipmentRecord> {
    let mut rows = Vec::with_capacity(raw.len());

    for shipment in raw {
        let id = match shipment.document_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                eprintln!("Skipping shipment record: missing document id");
                continue;
            }
        };

        rows.push(ShipmentRecord {
            id,
            core_data: shipment.core_data,
        });
    }

    rows
}

fn parse_base(backend_url: &str) -> Result<Url, GatewayError> {
    // A base without a trailing slash would make Url::join replace the last
    // path segment instead of appending.
    let mut normalized = backend_url.trim_end_matches('/').to_string();
    normalized.push('/');

    Url::parse(&normalized).map_err(|e| GatewayError::Config(format!("bad backend URL: {e}")))
}
