//! Constructs a WakeOnLAN packet (so called "Magic Packet Technology") for an
//! EUI-48 hardware address.
use crate::mac::HardwareAddress;

pub const MAGIC_PACKET_LEN: usize = 102;

const SYNCHRONIZATION_STREAM: [u8; 6] = [0xFF; 6];
const REPETITIONS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicPacket([u8; MAGIC_PACKET_LEN]);

impl MagicPacket {
    /// Creates a magic packet for the given address: six bytes of `0xFF`
    /// followed by sixteen copies of the address.
    pub fn build(addr: HardwareAddress) -> MagicPacket {
        let mut packet = [0u8; MAGIC_PACKET_LEN];
        packet[..6].copy_from_slice(&SYNCHRONIZATION_STREAM);

        let octets = addr.octets();
        for block in packet[6..].chunks_exact_mut(6) {
            block.copy_from_slice(&octets);
        }

        MagicPacket(packet)
    }

    /// Returns the target address if `payload` is a well formed magic packet.
    pub fn inspect(payload: &[u8]) -> Option<HardwareAddress> {
        if payload.len() != MAGIC_PACKET_LEN || payload[..6] != SYNCHRONIZATION_STREAM {
            return None;
        }

        let mut blocks = payload[6..].chunks_exact(6);
        let first = blocks.next()?;
        if !blocks.all(|block| block == first) {
            return None;
        }

        let mut octets = [0u8; 6];
        octets.copy_from_slice(first);
        Some(HardwareAddress::from(octets))
    }

    pub fn target(&self) -> HardwareAddress {
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&self.0[6..12]);
        HardwareAddress::from(octets)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
fn addr(octets: [u8; 6]) -> HardwareAddress {
    HardwareAddress::from(octets)
}

#[test]
fn test_magic() {
    let pkt = MagicPacket::build(addr([0xAA; 6]));

    // starts with padding
    let cmp = [255, 255, 255, 255, 255, 255];
    assert_eq!(&pkt.0[..6], &cmp);

    // follows with mac
    let cmp = [170, 170, 170, 170, 170, 170];
    assert_eq!(&pkt.0[6..12], &cmp);

    // ends with mac
    assert_eq!(&pkt.0[MAGIC_PACKET_LEN - 6..], &cmp);
}

#[test]
fn test_magic_every_block() {
    let octets = [0x70, 0x85, 0xC2, 0x9D, 0x41, 0x70];
    let pkt = MagicPacket::build(addr(octets));

    assert_eq!(pkt.as_bytes().len(), MAGIC_PACKET_LEN);
    let blocks: Vec<&[u8]> = pkt.as_bytes()[6..].chunks(6).collect();
    assert_eq!(blocks.len(), REPETITIONS);
    for block in blocks {
        assert_eq!(block, &octets);
    }
    assert_eq!(pkt.target(), addr(octets));
}

#[test]
fn test_magic_idempotent() {
    let a = addr([0x00, 0x1A, 0x2B, 0x3C, 0x4D, 0x5E]);
    assert_eq!(MagicPacket::build(a), MagicPacket::build(a));
}

#[test]
fn test_inspect_roundtrip() {
    let a = addr([0x00, 0x1A, 0x2B, 0x3C, 0x4D, 0x5E]);
    assert_eq!(MagicPacket::inspect(MagicPacket::build(a).as_bytes()), Some(a));
}

#[test]
fn test_inspect_rejects_malformed() {
    let pkt = MagicPacket::build(addr([0x11; 6]));

    assert_eq!(MagicPacket::inspect(&pkt.as_bytes()[..101]), None);

    let mut bad_header = pkt.0;
    bad_header[0] = 0xFE;
    assert_eq!(MagicPacket::inspect(&bad_header), None);

    let mut bad_block = pkt.0;
    bad_block[MAGIC_PACKET_LEN - 1] = 0x12;
    assert_eq!(MagicPacket::inspect(&bad_block), None);
}
