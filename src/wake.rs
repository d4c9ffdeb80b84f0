//! Sequences address parsing, packet construction and transmission into a
//! single outcome for the command line.
use log::debug;
use thiserror::Error;

use crate::mac::{AddressError, HardwareAddress};
use crate::transmit::{self, BroadcastTarget, Network, TransmitError};
use crate::wol::MagicPacket;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub mac: String,
    pub broadcast: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub mac: HardwareAddress,
    pub target: BroadcastTarget,
    pub bytes: usize,
}

#[derive(Error, Debug)]
pub enum WakeError {
    /// A required value is missing or malformed.
    #[error("{0}")]
    Argument(String),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Transmit(#[from] TransmitError),
}

impl WakeError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            WakeError::Argument(_) => 1,
            WakeError::Address(_) => 2,
            WakeError::Transmit(err) => match err {
                TransmitError::InvalidPort(_) => 1,
                TransmitError::SocketCreate(_) => 3,
                TransmitError::Send(_) => 4,
                TransmitError::InvalidBroadcastAddress(_) => 5,
            },
        }
    }
}

/// Wakes the device named in `request`, stopping at the first failure. No
/// socket is opened unless every input is valid.
pub fn wake<N: Network>(request: &Request, network: &N) -> Result<Delivery, WakeError> {
    if request.mac.is_empty() {
        return Err(WakeError::Argument("a hardware address is required".into()));
    }

    let mac: HardwareAddress = request.mac.parse()?;
    let packet = MagicPacket::build(mac);

    let target =
        BroadcastTarget::resolve(request.broadcast.as_deref(), request.port.as_deref())?;
    debug!("waking {} via {}", mac, target);

    let bytes = transmit::send(network, &packet, target)?;
    Ok(Delivery { mac, target, bytes })
}
