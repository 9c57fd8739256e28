pub mod acknowledgement;
pub mod genesis;
pub mod query;
pub mod recv_packet;
pub mod send_packet;
pub mod write_acknowledgement;
