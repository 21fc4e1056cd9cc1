use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::db::{init_db, Database};
use crate::domain::{CoreData, FacetLists, FilterCriteria, PageResult, ShipmentRecord};
use crate::gateway::{GatewayError, ShipmentSource};

/// Initialize a fresh test DB using the production schema.
pub fn make_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "backoffice_test_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));

    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

pub fn record(id: i64, seller: &str, status: &str) -> ShipmentRecord {
    ShipmentRecord {
        id: format!("doc-{id}"),
        core_data: CoreData {
            id,
            buyer: format!("Comprador {id}"),
            address: format!("Calle {id}"),
            zip_code: "B1900".to_string(),
            seller: seller.to_string(),
            seller_address: format!("Depósito {seller}"),
            delivery_preferences: "residential".to_string(),
            status: status.to_string(),
            ..CoreData::default()
        },
    }
}

pub fn page_of(rows: &[ShipmentRecord], total: u64) -> PageResult {
    PageResult {
        rows: rows.to_vec(),
        total,
        facets: FacetLists::default(),
    }
}

/// Poll a condition instead of guessing at sleeps; background threads in
/// the store make some effects slightly asynchronous.
pub fn wait_until(timeout: Duration, mut pred: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    pred()
}

/// Source that replays pre-loaded results in order and records every
/// criteria it was asked for.
pub struct ScriptedSource {
    results: Mutex<VecDeque<Result<PageResult, GatewayError>>>,
    calls: Mutex<Vec<FilterCriteria>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn push_ok(&self, page: PageResult) {
        self.results.lock().unwrap().push_back(Ok(page));
    }

    pub fn push_err(&self, err: GatewayError) {
        self.results.lock().unwrap().push_back(Err(err));
    }

    pub fn criteria_log(&self) -> Vec<FilterCriteria> {
        self.calls.lock().unwrap().clone()
    }
}

impl ShipmentSource for ScriptedSource {
    fn fetch_page(&self, criteria: &FilterCriteria) -> Result<PageResult, GatewayError> {
        self.calls.lock().unwrap().push(criteria.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PageResult::default()))
    }
}

/// Source backed by a fixed dataset: applies the criteria the way the
/// backend would and paginates the matches.
pub struct StaticSource {
    pub records: Vec<ShipmentRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<ShipmentRecord>) -> Arc<Self> {
        Arc::new(Self { records })
    }

    fn facets(&self) -> FacetLists {
        FacetLists {
            seller: distinct(self.records.iter().map(|r| r.core_data.seller.clone())),
            seller_address: distinct(
                self.records.iter().map(|r| r.core_data.seller_address.clone()),
            ),
            delivery_time: distinct(
                self.records
                    .iter()
                    .filter_map(|r| r.core_data.delivery_time.clone()),
            ),
            status: distinct(self.records.iter().map(|r| r.core_data.status.clone())),
        }
    }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = values.filter(|v| !v.is_empty()).collect();
    out.sort();
    out.dedup();
    out
}

impl ShipmentSource for StaticSource {
    fn fetch_page(&self, criteria: &FilterCriteria) -> Result<PageResult, GatewayError> {
        let matching: Vec<ShipmentRecord> = self
            .records
            .iter()
            .filter(|r| criteria.matches(&r.core_data))
            .cloned()
            .collect();

        let total = matching.len() as u64;
        let rows = matching
            .into_iter()
            .skip(criteria.page.skip())
            .take(criteria.page.size)
            .collect();

        Ok(PageResult {
            rows,
            total,
            facets: self.facets(),
        })
    }
}
