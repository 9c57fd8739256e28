pub mod contract;
pub mod transfer;
