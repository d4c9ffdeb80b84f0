//! Sends Wake-On-LAN magic packets over a UDP broadcast.
pub mod mac;
pub mod transmit;
pub mod wake;
pub mod wol;

pub use mac::HardwareAddress;
pub use transmit::{BroadcastTarget, SystemNetwork};
pub use wake::{wake, Delivery, Request, WakeError};
pub use wol::MagicPacket;
