use serde::Deserialize;

// shipment
//  ├── _id            (server document id -> client identity)
//  └── coreData
//       ├── id, buyer, address, zipCode
//       ├── seller, sellerAddress
//       ├── deliveryPreferences, deliveryTime, status, order
//       └── destination/origin coordinates

/// Known delivery preference categories. The backend sends free-form
/// strings; anything outside these two is displayed as-is.
pub const DELIVERY_RESIDENTIAL: &str = "residential";
pub const DELIVERY_BUSINESS: &str = "business";

/// Core payload of a shipment as reported by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreData {
    pub id: i64,
    pub buyer: String,
    pub address: String,
    pub zip_code: String,
    pub seller: String,
    pub seller_address: String,
    pub delivery_preferences: String,
    #[serde(default)]
    pub status: String,
    pub delivery_time: Option<String>,
    pub order: Option<String>,
    pub delivery_type: Option<String>,
    pub destination_latitude: Option<f64>,
    pub destination_longitude: Option<f64>,
    pub origin_latitude: Option<f64>,
    pub origin_longitude: Option<f64>,
}

/// A shipment with its client-visible identity attached.
///
/// The identity comes from the server document id and never changes once
/// fetched; the whole record is replaced wholesale on each refetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRecord {
    pub id: String,
    pub core_data: CoreData,
}

/// Backend-reported distinct values per filterable field, used to populate
/// the filter dropdowns. Never mutated locally.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetLists {
    #[serde(default)]
    pub seller: Vec<String>,
    #[serde(default)]
    pub seller_address: Vec<String>,
    #[serde(default)]
    pub delivery_time: Vec<String>,
    #[serde(default)]
    pub status: Vec<String>,
}

/// One page of shipments plus the server-authoritative total and facets.
///
/// Superseded entirely by the next successful fetch. The total alone may be
/// bumped by live-update events in between, so it can run ahead of the row
/// set until the next real fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub rows: Vec<ShipmentRecord>,
    pub total: u64,
    pub facets: FacetLists,
}

impl Default for CoreData {
    fn default() -> Self {
        Self {
            id: 0,
            buyer: String::new(),
            address: String::new(),
            zip_code: String::new(),
            seller: String::new(),
            seller_address: String::new(),
            delivery_preferences: String::new(),
            status: String::new(),
            delivery_time: None,
            order: None,
            delivery_type: None,
            destination_latitude: None,
            destination_longitude: None,
            origin_latitude: None,
            origin_longitude: None,
        }
    }
}
