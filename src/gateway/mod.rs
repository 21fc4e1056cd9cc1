mod channel;
mod gateway;
mod gateway_error;
pub mod models;

pub use channel::{ChannelEvent, HttpEventStream, PushChannel};
pub use gateway::{ShipmentGateway, ShipmentSource};
pub use gateway_error::GatewayError;
