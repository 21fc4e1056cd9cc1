mod export_xlsx;

pub use export_xlsx::{build_shipments_workbook, export_shipments_xlsx, SHIPMENT_HEADERS};
