use astra::Request;
use chrono::Utc;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::Arc;
use url::form_urlencoded;

use crate::auth::codes::{AuthCodeService, IssuedAuthCode};
use crate::db::Database;
use crate::domain::FieldFilter;
use crate::errors::ServerError;
use crate::responses::{html_response, json_response, ResultResp};
use crate::spreadsheets::export_shipments_xlsx;
use crate::store::{ShipmentStore, Snapshot, StoreEvent};
use crate::views;

/// Shared handles for the request handlers.
#[derive(Clone)]
pub struct App {
    pub store: Arc<ShipmentStore>,
    pub db: Database,
    pub codes: AuthCodeService,
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") | ("GET", "/shipments") => shipments_page(&req, app),
        ("GET", "/shipments/export.xlsx") => export_xlsx(&req, app),
        ("GET", "/authorize/codes") => codes_page(app, None),
        ("POST", "/authorize/codes") => generate_code(app),
        ("POST", "/authorize/redeem") => redeem_code(req, app),
        _ => Err(ServerError::NotFound),
    }
}

/// The dashboard itself. Query parameters that differ from the current
/// snapshot become store events, so a page turn arrives as a pure
/// pagination event and a changed dropdown as a filter event.
fn shipments_page(req: &Request, app: &App) -> ResultResp {
    let params = parse_query(req);
    apply_params(&app.store, &params);

    let snap = app.store.snapshot();
    html_response(views::shipments::dashboard_page(&snap))
}

fn apply_params(store: &ShipmentStore, params: &HashMap<String, String>) {
    let snap = store.snapshot();
    let criteria = &snap.criteria;
    let mut events = Vec::new();

    collect_field(params, "deliveryPreferences", &criteria.delivery_preferences,
        StoreEvent::SetDeliveryPreferences, &mut events);
    collect_field(params, "sellerAddress", &criteria.seller_address,
        StoreEvent::SetSellerAddress, &mut events);
    collect_field(params, "seller", &criteria.seller, StoreEvent::SetSeller, &mut events);
    collect_field(params, "deliveryTime", &criteria.delivery_time,
        StoreEvent::SetDeliveryTime, &mut events);
    collect_field(params, "status", &criteria.status, StoreEvent::SetStatus, &mut events);

    let filters_changed = !events.is_empty();

    if let Some(size) = params.get("size").and_then(|s| s.parse::<usize>().ok()) {
        if size > 0 && size != criteria.page.size {
            events.push(StoreEvent::SetPageSize(size));
        }
    }

    if let Some(q) = params.get("q") {
        if *q != snap.query_input {
            events.push(StoreEvent::QueryInput(q.clone()));
        }
    }

    // A changed filter already sent the view back to the first page; an
    // explicit page parameter only counts when nothing else changed.
    if !filters_changed {
        if let Some(index) = params.get("page").and_then(|p| p.parse::<usize>().ok()) {
            if index != criteria.page.index {
                events.push(StoreEvent::SetPage(index));
            }
        }
    }

    for event in events {
        store.apply(event);
    }
}

fn collect_field(
    params: &HashMap<String, String>,
    name: &str,
    current: &FieldFilter,
    make: fn(FieldFilter) -> StoreEvent,
    events: &mut Vec<StoreEvent>,
) {
    if let Some(raw) = params.get(name) {
        let filter = FieldFilter::from_form_value(raw);
        if filter != *current {
            events.push(make(filter));
        }
    }
}

/// Export the current page, or the subset named by `?ids=a,b,c`, keeping
/// the on-screen order.
fn export_xlsx(req: &Request, app: &App) -> ResultResp {
    let params = parse_query(req);
    let snap: Snapshot = app.store.snapshot();

    let rows = match params.get("ids") {
        Some(ids) => {
            let wanted: HashSet<&str> = ids
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            snap.rows
                .iter()
                .filter(|r| wanted.contains(r.id.as_str()))
                .cloned()
                .collect()
        }
        None => snap.rows.clone(),
    };

    export_shipments_xlsx(&rows)
}

fn codes_page(app: &App, just_issued: Option<IssuedAuthCode>) -> ResultResp {
    let now = Utc::now().timestamp();
    let rows = app.db.with_conn(|conn| app.codes.outstanding(conn, now))?;
    html_response(views::codes::codes_page(&rows, just_issued.as_ref()))
}

fn generate_code(app: &App) -> ResultResp {
    let now = Utc::now().timestamp();
    let issued = app.db.with_conn(|conn| app.codes.issue(conn, now))?;
    codes_page(app, Some(issued))
}

#[derive(Debug, Deserialize)]
struct RedeemRequest {
    code: String,
    password: String,
}

/// The authorization exchange: the external page posts the URL token plus
/// the typed key as JSON, and reads back `ok` or a `message`.
fn redeem_code(req: Request, app: &App) -> ResultResp {
    let body = read_body(req)?;
    let parsed: RedeemRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("invalid redeem payload: {e}")))?;

    let now = Utc::now().timestamp();
    let result = app
        .db
        .with_conn(|conn| app.codes.redeem(conn, &parsed.code, &parsed.password, now));

    match result {
        Ok(_) => json_response(200, serde_json::json!({ "ok": true })),
        Err(ServerError::Unauthorized(msg)) => {
            json_response(401, serde_json::json!({ "message": msg }))
        }
        Err(ServerError::BadRequest(msg)) => {
            json_response(400, serde_json::json!({ "message": msg }))
        }
        Err(other) => Err(other),
    }
}

fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut body = req.into_body();
    let mut buf = Vec::new();
    body.reader()
        .read_to_end(&mut buf)
        .map_err(|_| ServerError::BadRequest("unreadable request body".into()))?;
    Ok(buf)
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if let Some(q) = req.uri().query() {
        for (k, v) in form_urlencoded::parse(q.as_bytes()) {
            map.insert(k.into_owned(), v.into_owned());
        }
    }

    map
}
