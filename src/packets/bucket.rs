//! Types representing group buckets.
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |      length     |     weight      |
//! +--------+--------+--------+--------+
//! |            watch_port              |
//! +--------+--------+--------+--------+
//! |            watch_group             |
//! +--------+--------+--------+--------+
//! |              pad (4 bytes)        |
//! +--------+--------+--------+--------+
//! |              actions               |
//! |         (variable length)          |
//! +--------+--------+--------+--------+
//! ```
use super::action::Action;
use super::walk;
use crate::{Error, Repr, Result};
use byteorder::{ByteOrder, NetworkEndian};

mod field {
    use crate::field::*;
    pub const LENGTH: Field = 0..2;
    pub const WEIGHT: Field = 2..4;
    pub const WATCH_PORT: Field = 4..8;
    pub const WATCH_GROUP: Field = 8..12;
    pub const ACTIONS: Rest = 16..;
}

/// A read/write wrapper around a buffer representing a bucket.
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
        if len < field::ACTIONS.start {
            return Err(Error::Truncated);
        }
        let length = self.length() as usize;
        if length < field::ACTIONS.start || len < length {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::LENGTH])
    }

    pub fn weight(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::WEIGHT])
    }

    pub fn watch_port(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::WATCH_PORT])
    }

    pub fn watch_group(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::WATCH_GROUP])
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    pub fn actions(&self) -> &'a [u8] {
        &self.buffer.as_ref()[field::ACTIONS.start..self.length() as usize]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::LENGTH], value)
    }

    pub fn set_weight(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::WEIGHT], value)
    }

    pub fn set_watch_port(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::WATCH_PORT], value)
    }

    pub fn set_watch_group(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::WATCH_GROUP], value)
    }
}

/// A high-level representation of a group bucket.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Bucket<E> {
    pub weight: u16,
    pub watch_port: u32,
    pub watch_group: u32,
    pub actions: Vec<Action<E>>,
}

impl<E: Repr> Repr for Bucket<E> {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        Ok(Bucket {
            weight: packet.weight(),
            watch_port: packet.watch_port(),
            watch_group: packet.watch_group(),
            actions: walk::walk(packet.actions())?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::ACTIONS.start + walk::total_len(&self.actions)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        let mut packet = Packet::new(buffer);
        packet.set_length(self.buffer_len() as u16);
        packet.set_weight(self.weight);
        packet.set_watch_port(self.watch_port);
        packet.set_watch_group(self.watch_group);
        walk::emit_all(&self.actions, &mut packet.buffer.as_mut()[field::ACTIONS.start..])?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::port::PortNumber;

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct OxmExperimenter;

    impl Repr for OxmExperimenter {
        fn parse(_buffer: &[u8]) -> Result<Self> {
            unreachable!()
        }
        fn buffer_len(&self) -> usize {
            unreachable!()
        }
        fn emit(&self, _buffer: &mut [u8]) -> Result<()> {
            unreachable!()
        }
    }

    fn bucket() -> Bucket<OxmExperimenter> {
        Bucket {
            weight: 10,
            watch_port: 1,
            watch_group: 0xffff_ffff,
            actions: vec![Action::Output {
                port: PortNumber::Regular(1),
                max_length: 0xffff,
            }],
        }
    }

    #[test]
    fn round_trip() {
        let repr = bucket();
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        let parsed = Bucket::<OxmExperimenter>::parse(&bytes).unwrap();
        assert_eq!(parsed, repr);
    }

    #[test]
    fn length_shorter_than_header_is_truncated_not_a_panic() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 16] = [
            0x00, 0x02, 0x00, 0x00, // length = 2, shorter than the 16-byte header
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            Bucket::<OxmExperimenter>::parse(&bytes),
            Err(Error::Truncated)
        );
    }
}
