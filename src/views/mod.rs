pub mod codes;
pub mod layout;
pub mod shipments;
