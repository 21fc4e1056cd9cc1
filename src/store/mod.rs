pub mod debounce;
mod events;
mod live;
mod store;

pub use debounce::Debouncer;
pub use events::StoreEvent;
pub use live::LiveUpdateListener;
pub use store::{ShipmentStore, Snapshot};
