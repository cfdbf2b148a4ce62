//! Types representing packet queues and their properties.
//!
//! A queue property:
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |    property      |      length    |
//! +--------+--------+--------+--------+
//! |              pad (4 bytes)        |
//! +--------+--------+--------+--------+
//! |              body                 |
//! +--------+--------+--------+--------+
//! ```
//!
//! A packet queue:
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |              queue_id              |
//! +--------+--------+--------+--------+
//! |                port                |
//! +--------+--------+--------+--------+
//! |      length     |   pad (6 bytes) |
//! +--------+--------+                 +
//! |                                   |
//! +--------+--------+--------+--------+
//! |             properties             |
//! |        (variable length)          |
//! +--------+--------+--------+--------+
//! ```
use super::walk;
use crate::{Error, Repr, Result};
use byteorder::{ByteOrder, NetworkEndian};

mod prop_field {
    use crate::field::*;
    pub const PROPERTY: Field = 0..2;
    pub const LENGTH: Field = 2..4;
    pub const REST: Rest = 8..;
}

enum_with_unknown! {
    /// Queue property type, as found in the `property` field of a queue property header.
    pub doc enum PropertyKind(u16) {
        /// Minimum datarate guaranteed, in tenths of a percent.
        MinRate = 1,
        /// Maximum datarate, in tenths of a percent.
        MaxRate = 2,
        /// Vendor-specific queue property.
        Experimenter = 0xffff
    }
}

/// A read/write wrapper around a buffer representing a queue property.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PropertyPacket<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> PropertyPacket<T> {
    pub fn new(buffer: T) -> Self {
        PropertyPacket { buffer }
    }

    pub fn new_checked(buffer: T) -> Result<Self> {
        let packet = Self::new(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    pub fn check_len(&self) -> Result<()> {
        let len = self.buffer.as_ref().len();
        if len < prop_field::REST.start {
            return Err(Error::Truncated);
        }
        let length = self.length() as usize;
        if length < prop_field::REST.start || len < length {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    pub fn property(&self) -> PropertyKind {
        PropertyKind::from(NetworkEndian::read_u16(
            &self.buffer.as_ref()[prop_field::PROPERTY],
        ))
    }

    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[prop_field::LENGTH])
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> PropertyPacket<&'a T> {
    pub fn payload(&self) -> &'a [u8] {
        &self.buffer.as_ref()[prop_field::REST.start..self.length() as usize]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> PropertyPacket<T> {
    pub fn set_property(&mut self, value: PropertyKind) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[prop_field::PROPERTY], value.into())
    }

    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[prop_field::LENGTH], value)
    }
}

/// A high-level representation of a queue property.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum QueueProperty {
    /// Minimum datarate guaranteed, in tenths of a percent (1 to 1000). A rate of 0 means that
    /// there is no minimum guaranteed rate, and 0xffff means the queue is disabled.
    MinRate(u16),
    /// Maximum datarate, in tenths of a percent (1 to 1000). A rate of 0 means that there is no
    /// maximum rate, and 0xffff means the queue is disabled.
    MaxRate(u16),
    /// Vendor-specific property, carried verbatim.
    Experimenter { experimenter: u32, data: Vec<u8> },
}

impl Repr for QueueProperty {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = PropertyPacket::new_checked(buffer)?;
        let payload = packet.payload();
        Ok(match packet.property() {
            PropertyKind::MinRate => {
                QueueProperty::MinRate(NetworkEndian::read_u16(&payload[0..2]))
            }
            PropertyKind::MaxRate => {
                QueueProperty::MaxRate(NetworkEndian::read_u16(&payload[0..2]))
            }
            PropertyKind::Experimenter => QueueProperty::Experimenter {
                experimenter: NetworkEndian::read_u32(&payload[0..4]),
                data: payload[8..].to_vec(),
            },
            PropertyKind::_Unknown(_) => return Err(Error::UnknownQueueProperty),
        })
    }

    fn buffer_len(&self) -> usize {
        match *self {
            QueueProperty::MinRate(_) | QueueProperty::MaxRate(_) => 16,
            QueueProperty::Experimenter { ref data, .. } => 16 + data.len(),
        }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        let mut packet = PropertyPacket::new(buffer);
        packet.set_length(self.buffer_len() as u16);
        let body = &mut packet.buffer.as_mut()[prop_field::REST.start..];
        match *self {
            QueueProperty::MinRate(rate) => {
                packet.set_property(PropertyKind::MinRate);
                NetworkEndian::write_u16(&mut body[0..2], rate);
            }
            QueueProperty::MaxRate(rate) => {
                packet.set_property(PropertyKind::MaxRate);
                NetworkEndian::write_u16(&mut body[0..2], rate);
            }
            QueueProperty::Experimenter {
                experimenter,
                ref data,
            } => {
                packet.set_property(PropertyKind::Experimenter);
                NetworkEndian::write_u32(&mut body[0..4], experimenter);
                body[8..8 + data.len()].copy_from_slice(data);
            }
        }
        Ok(())
    }
}

mod queue_field {
    use crate::field::*;
    pub const QUEUE_ID: Field = 0..4;
    pub const PORT: Field = 4..8;
    pub const LENGTH: Field = 8..10;
    pub const PROPERTIES: Rest = 16..;
}

/// A read/write wrapper around a buffer representing a packet queue.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub fn new(buffer: T) -> Self {
        Packet { buffer }
    }

    pub fn new_checked(buffer: T) -> Result<Self> {
        let packet = Self::new(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    pub fn check_len(&self) -> Result<()> {
        let len = self.buffer.as_ref().len();
        if len < queue_field::PROPERTIES.start {
            return Err(Error::Truncated);
        }
        let length = self.length() as usize;
        if length < queue_field::PROPERTIES.start || len < length {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    pub fn queue_id(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[queue_field::QUEUE_ID])
    }

    pub fn port(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[queue_field::PORT])
    }

    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[queue_field::LENGTH])
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    pub fn properties(&self) -> &'a [u8] {
        &self.buffer.as_ref()[queue_field::PROPERTIES.start..self.length() as usize]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_queue_id(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[queue_field::QUEUE_ID], value)
    }

    pub fn set_port(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[queue_field::PORT], value)
    }

    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[queue_field::LENGTH], value)
    }
}

/// A high-level representation of a packet queue.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PacketQueue {
    pub queue_id: u32,
    pub port: u32,
    pub properties: Vec<QueueProperty>,
}

impl Repr for PacketQueue {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        Ok(PacketQueue {
            queue_id: packet.queue_id(),
            port: packet.port(),
            properties: walk::walk(packet.properties())?,
        })
    }

    fn buffer_len(&self) -> usize {
        queue_field::PROPERTIES.start + walk::total_len(&self.properties)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        let mut packet = Packet::new(buffer);
        packet.set_queue_id(self.queue_id);
        packet.set_port(self.port);
        packet.set_length(self.buffer_len() as u16);
        walk::emit_all(
            &self.properties,
            &mut packet.buffer.as_mut()[queue_field::PROPERTIES.start..],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn queue() -> PacketQueue {
        PacketQueue {
            queue_id: 1,
            port: 2,
            properties: vec![QueueProperty::MinRate(500), QueueProperty::MaxRate(1000)],
        }
    }

    #[test]
    fn round_trip() {
        let repr = queue();
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        let parsed = PacketQueue::parse(&bytes).unwrap();
        assert_eq!(parsed, repr);
    }

    #[test]
    fn unknown_queue_property_is_rejected() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 16] = [
            0x12, 0x34, 0x00, 0x10,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            QueueProperty::parse(&bytes),
            Err(Error::UnknownQueueProperty)
        );
    }

    #[test]
    fn property_length_shorter_than_header_is_truncated_not_a_panic() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 16] = [
            0x00, 0x01, 0x00, 0x02, // length = 2, shorter than the 8-byte header
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(QueueProperty::parse(&bytes), Err(Error::Truncated));
    }

    #[test]
    fn queue_length_shorter_than_header_is_truncated_not_a_panic() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 16] = [
            0x00, 0x00, 0x00, 0x01, // queue_id
            0x00, 0x00, 0x00, 0x02, // port
            0x00, 0x02,             // length = 2, shorter than the 16-byte header
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(PacketQueue::parse(&bytes), Err(Error::Truncated));
    }
}
