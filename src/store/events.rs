use crate::domain::FieldFilter;

/// Everything that can change the store. Filter events reset pagination to
/// the first page; pagination events leave the filters alone.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    SetDeliveryPreferences(FieldFilter),
    SetDeliveryTime(FieldFilter),
    SetSeller(FieldFilter),
    SetSellerAddress(FieldFilter),
    SetStatus(FieldFilter),
    /// Raw keystrokes of the search box. Goes through the debouncer; only
    /// the settled value touches the criteria.
    QueryInput(String),
    /// The debounced search value, back from the quiescence window.
    QuerySettled(String),
    SetPage(usize),
    SetPageSize(usize),
    /// A `broadcast` push event: one more shipment exists somewhere.
    ShipmentCreated,
    /// Refetch with the current criteria (startup, manual refresh).
    Refresh,
}
