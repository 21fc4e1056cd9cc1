use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// JSON response with an explicit status, for the authorize exchange.
pub fn json_response(status: u16, value: serde_json::Value) -> ResultResp {
    let body = value.to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::new(body))
        .map_err(|_| ServerError::InternalError)
}
