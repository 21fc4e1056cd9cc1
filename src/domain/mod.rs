pub mod filters;
pub mod shipment;

pub use filters::{FieldFilter, FilterCriteria, Page};
pub use shipment::{CoreData, FacetLists, PageResult, ShipmentRecord};
