use rust_xlsxwriter::Workbook;

use crate::domain::ShipmentRecord;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;

const SHEET_NAME: &str = "Envíos";

/// Column headers, in the product language. Origin coordinates and the
/// internal delivery-type field are deliberately not exported.
pub const SHIPMENT_HEADERS: [&str; 12] = [
    "Código de envío",
    "Comprador",
    "Destino",
    "Vendedor",
    "Origen",
    "Zip",
    "Tipo de envío",
    "Fecha estimada de envío",
    "Estado",
    "Código de venta",
    "Latitud",
    "Longitud",
];

/// Build the workbook bytes for an ordered set of shipments.
pub fn build_shipments_workbook(shipments: &[ShipmentRecord]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| ServerError::XlsxError(format!("Failed to name sheet: {e}")))?;

    for (col, header) in SHIPMENT_HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, shipment) in shipments.iter().enumerate() {
        let r = (i + 1) as u32;
        let core = &shipment.core_data;

        worksheet
            .write_number(r, 0, core.id as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write shipment id: {e}")))?;

        worksheet
            .write_string(r, 1, &core.buyer)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write buyer: {e}")))?;

        worksheet
            .write_string(r, 2, &core.address)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write address: {e}")))?;

        worksheet
            .write_string(r, 3, &core.seller)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write seller: {e}")))?;

        worksheet
            .write_string(r, 4, &core.seller_address)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write seller address: {e}")))?;

        worksheet
            .write_string(r, 5, &core.zip_code)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write zip code: {e}")))?;

        worksheet
            .write_string(r, 6, &core.delivery_preferences)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write delivery preferences: {e}"))
            })?;

        let delivery_time = core.delivery_time.as_deref().unwrap_or("");
        worksheet
            .write_string(r, 7, delivery_time)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write delivery time: {e}")))?;

        worksheet
            .write_string(r, 8, &core.status)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write status: {e}")))?;

        let order = core.order.as_deref().unwrap_or("");
        worksheet
            .write_string(r, 9, order)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write order: {e}")))?;

        if let Some(lat) = core.destination_latitude {
            worksheet
                .write_number(r, 10, lat)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write latitude: {e}")))?;
        }

        if let Some(lon) = core.destination_longitude {
            worksheet
                .write_number(r, 11, lon)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write longitude: {e}")))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_shipments_xlsx(shipments: &[ShipmentRecord]) -> ResultResp {
    let buffer = build_shipments_workbook(shipments)?;
    xlsx_response(buffer, "Envíos.xlsx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CoreData;

    fn record(id: i64, buyer: &str) -> ShipmentRecord {
        ShipmentRecord {
            id: format!("doc-{id}"),
            core_data: CoreData {
                id,
                buyer: buyer.to_string(),
                address: "Av. Siempreviva 742".to_string(),
                zip_code: "B1900".to_string(),
                seller: "Acme Depot".to_string(),
                seller_address: "Parque Industrial Sur".to_string(),
                delivery_preferences: "residential".to_string(),
                status: "pending".to_string(),
                destination_latitude: Some(-34.92),
                destination_longitude: Some(-57.95),
                // These two must never reach the spreadsheet.
                origin_latitude: Some(-34.60),
                origin_longitude: Some(-58.38),
                ..CoreData::default()
            },
        }
    }

    #[test]
    fn headers_omit_origin_and_internal_fields() {
        assert!(!SHIPMENT_HEADERS.iter().any(|h| h.contains("origen lat")));
        assert_eq!(SHIPMENT_HEADERS[0], "Código de envío");
        assert_eq!(SHIPMENT_HEADERS.len(), 12);
    }

    #[test]
    fn builds_a_zip_container_with_rows() {
        let rows = vec![record(1, "Ana"), record(2, "Bruno")];
        let buffer = build_shipments_workbook(&rows).unwrap();

        // XLSX is a zip archive: PK magic.
        assert!(buffer.len() > 4);
        assert_eq!(&buffer[0..2], b"PK");
    }

    #[test]
    fn empty_selection_still_builds_the_header_row() {
        let buffer = build_shipments_workbook(&[]).unwrap();
        assert_eq!(&buffer[0..2], b"PK");
    }
}
