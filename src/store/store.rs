// store.rs
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{FacetLists, FieldFilter, FilterCriteria, PageResult, ShipmentRecord};
use crate::gateway::{GatewayError, ShipmentSource};
use crate::store::debounce::Debouncer;
use crate::store::events::StoreEvent;

/// Immutable copy of the store at one point in time. Consumers only ever
/// see these; nobody gets a reference into the live state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub criteria: FilterCriteria,
    /// Raw search box content, possibly still inside the quiescence window.
    pub query_input: String,
    pub rows: Vec<ShipmentRecord>,
    pub total: u64,
    pub facets: FacetLists,
}

struct State {
    criteria: FilterCriteria,
    query_input: String,
    rows: Vec<ShipmentRecord>,
    total: u64,
    facets: FacetLists,
    /// Sequence of the most recently dispatched fetch. A completion is
    /// installed only while its sequence still equals this; anything older
    /// lost the race and is dropped.
    dispatched_seq: u64,
    subscribers: Vec<Sender<Snapshot>>,
}

/// The single source of truth for the shipments dashboard.
///
/// Holds the composite filter criteria, the raw and settled search text,
/// the pagination cursor, and the latest installed page. All mutation goes
/// through [`ShipmentStore::apply`]; reads get a [`Snapshot`].
///
/// Fetches run on whatever thread applied the triggering event, without the
/// state lock held across the round trip. Which result wins is decided by
/// the dispatch sequence, never by completion order.
pub struct ShipmentStore {
    state: Mutex<State>,
    source: Arc<dyn ShipmentSource>,
    debouncer: Debouncer,
}

impl ShipmentStore {
    pub fn new(
        source: Arc<dyn ShipmentSource>,
        page_size: usize,
        debounce_window: Duration,
    ) -> Arc<Self> {
        let (debouncer, settled) = Debouncer::new(debounce_window);

        let store = Arc::new(Self {
            state: Mutex::new(State {
                criteria: FilterCriteria::new(page_size),
                query_input: String::new(),
                rows: Vec::new(),
                total: 0,
                facets: FacetLists::default(),
                dispatched_seq: 0,
                subscribers: Vec::new(),
            }),
            source,
            debouncer,
        });

        // Settled search values re-enter the store as ordinary events. The
        // weak handle lets this thread die with the store.
        let weak = Arc::downgrade(&store);
        std::thread::spawn(move || {
            while let Ok(value) = settled.recv() {
                match weak.upgrade() {
                    Some(store) => store.apply(StoreEvent::QuerySettled(value)),
                    None => break,
                }
            }
        });

        store
    }

    pub fn snapshot(&self) -> Snapshot {
        let st = self.state.lock().unwrap();
        Self::snapshot_of(&st)
    }

    /// Register a subscriber. It receives a snapshot after every installed
    /// change (page install, live-total bump); dead receivers are pruned on
    /// the next notification.
    pub fn subscribe(&self) -> Receiver<Snapshot> {
        let (tx, rx) = mpsc::channel();
        self.state.lock().unwrap().subscribers.push(tx);
        rx
    }

    pub fn apply(&self, event: StoreEvent) {
        let refetch = {
            let mut st = self.state.lock().unwrap();

            match event {
                StoreEvent::SetDeliveryPreferences(value) => {
                    Self::apply_filter(&mut st.criteria, |c| &mut c.delivery_preferences, value)
                }
                StoreEvent::SetDeliveryTime(value) => {
                    Self::apply_filter(&mut st.criteria, |c| &mut c.delivery_time, value)
                }
                StoreEvent::SetSeller(value) => {
                    Self::apply_filter(&mut st.criteria, |c| &mut c.seller, value)
                }
                StoreEvent::SetSellerAddress(value) => {
                    Self::apply_filter(&mut st.criteria, |c| &mut c.seller_address, value)
                }
                StoreEvent::SetStatus(value) => {
                    Self::apply_filter(&mut st.criteria, |c| &mut c.status, value)
                }
                StoreEvent::QueryInput(raw) => {
                    st.query_input = raw.clone();
                    self.debouncer.update(raw);
                    false
                }
                StoreEvent::QuerySettled(settled) => {
                    let query = if settled.is_empty() { None } else { Some(settled) };
                    if st.criteria.query == query {
                        false
                    } else {
                        st.criteria.query = query;
                        st.criteria.page.index = 0;
                        true
                    }
                }
                StoreEvent::SetPage(index) => {
                    // Pagination only: the criteria stay untouched.
                    if st.criteria.page.index == index {
                        false
                    } else {
                        st.criteria.page.index = index;
                        true
                    }
                }
                StoreEvent::SetPageSize(size) => {
                    if size == 0 || st.criteria.page.size == size {
                        false
                    } else {
                        st.criteria.page.size = size;
                        true
                    }
                }
                StoreEvent::ShipmentCreated => {
                    // Deliberately stale: the row set catches up on the
                    // next real fetch.
                    st.total += 1;
                    Self::notify(&mut st);
                    false
                }
                StoreEvent::Refresh => true,
            }
        };

        if refetch {
            self.refetch();
        }
    }

    /// A changed filter always returns the operator to the first page.
    fn apply_filter(
        criteria: &mut FilterCriteria,
        slot: fn(&mut FilterCriteria) -> &mut FieldFilter,
        value: FieldFilter,
    ) -> bool {
        if *slot(criteria) == value {
            return false;
        }
        *slot(criteria) = value;
        criteria.page.index = 0;
        true
    }

    fn refetch(&self) {
        let (seq, criteria) = self.begin_fetch();
        let result = self.source.fetch_page(&criteria);
        self.finish_fetch(seq, result);
    }

    /// Stamp a fetch with the next sequence and grab the criteria it runs
    /// with. Split from [`Self::finish_fetch`] so the in-flight window is
    /// exactly the network round trip, with no lock held.
    pub(crate) fn begin_fetch(&self) -> (u64, FilterCriteria) {
        let mut st = self.state.lock().unwrap();
        st.dispatched_seq += 1;
        (st.dispatched_seq, st.criteria.clone())
    }

    /// Install a completed fetch, unless a newer one was dispatched while
    /// it was in flight. Failures keep the previous page intact.
    pub(crate) fn finish_fetch(&self, seq: u64, result: Result<PageResult, GatewayError>) {
        match result {
            Ok(page) => {
                let mut st = self.state.lock().unwrap();
                if seq != st.dispatched_seq {
                    eprintln!(
                        "🔁 Discarding superseded fetch #{seq} (latest is #{})",
                        st.dispatched_seq
                    );
                    return;
                }
                st.rows = page.rows;
                st.total = page.total;
                st.facets = page.facets;
                Self::notify(&mut st);
            }
            Err(e) => {
                eprintln!("⚠️ Shipments fetch #{seq} failed, keeping previous page: {e}");
            }
        }
    }

    fn notify(st: &mut State) {
        let snapshot = Self::snapshot_of(st);
        st.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    fn snapshot_of(st: &State) -> Snapshot {
        Snapshot {
            criteria: st.criteria.clone(),
            query_input: st.query_input.clone(),
            rows: st.rows.clone(),
            total: st.total,
            facets: st.facets.clone(),
        }
    }
}
