use serde::Deserialize;

use crate::domain::{CoreData, FacetLists};

/// Body of the list endpoint:
/// `{ "shipments": [...], "filters": {...}, "count": n }`
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub shipments: Vec<RawShipment>,
    pub filters: FacetLists,
    pub count: u64,
}

/// A shipment as it appears on the wire, before the client identity is
/// derived from the document id.
#[derive(Debug, Deserialize)]
pub struct RawShipment {
    #[serde(rename = "_id")]
    pub document_id: Option<String>,
    #[serde(rename = "coreData")]
    pub core_data: CoreData,
}
