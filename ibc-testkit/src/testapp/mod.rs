pub mod applications;
pub mod clients;
pub mod ibc_store;
pub mod router;
