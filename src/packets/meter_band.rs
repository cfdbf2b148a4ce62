//! Types representing meter bands.
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |      type       |      length     |
//! +--------+--------+--------+--------+
//! |                rate                |
//! +--------+--------+--------+--------+
//! |             burst_size             |
//! +--------+--------+--------+--------+
//! |              body                 |
//! |        (variable length)          |
//! +--------+--------+--------+--------+
//! ```
use crate::{Error, Repr, Result};
use byteorder::{ByteOrder, NetworkEndian};

mod field {
    use crate::field::*;
    pub const TYPE: Field = 0..2;
    pub const LENGTH: Field = 2..4;
    pub const RATE: Field = 4..8;
    pub const BURST_SIZE: Field = 8..12;
    pub const REST: Rest = 12..;
}

enum_with_unknown! {
    /// Meter band type, as found in the `type` field of a meter band header.
    pub doc enum Kind(u16) {
        /// Drop packets
        Drop = 1,
        /// Remark DSCP in the IP header
        DscpRemark = 2,
        /// Vendor-specific meter band
        Experimenter = 0xffff
    }
}

/// A read/write wrapper around a buffer representing a meter band.
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
        if len < field::REST.start {
            return Err(Error::Truncated);
        }
        let length = self.length() as usize;
        if length < field::REST.start || len < length {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    pub fn kind(&self) -> Kind {
        Kind::from(NetworkEndian::read_u16(&self.buffer.as_ref()[field::TYPE]))
    }

    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::LENGTH])
    }

    pub fn rate(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::RATE])
    }

    pub fn burst_size(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::BURST_SIZE])
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    pub fn payload(&self) -> &'a [u8] {
        &self.buffer.as_ref()[field::REST.start..self.length() as usize]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_kind(&mut self, value: Kind) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::TYPE], value.into())
    }

    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::LENGTH], value)
    }

    pub fn set_rate(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::RATE], value)
    }

    pub fn set_burst_size(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::BURST_SIZE], value)
    }
}

/// A high-level representation of a meter band.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum MeterBand {
    /// Drop packets.
    Drop { rate: u32, burst_size: u32 },
    /// Remark the DSCP field in the IP header.
    DscpRemark {
        rate: u32,
        burst_size: u32,
        prec_level: u8,
    },
    /// Vendor-specific meter band, carried verbatim.
    Experimenter {
        rate: u32,
        burst_size: u32,
        experimenter: u32,
        data: Vec<u8>,
    },
}

impl Repr for MeterBand {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        let rate = packet.rate();
        let burst_size = packet.burst_size();
        let payload = packet.payload();
        Ok(match packet.kind() {
            Kind::Drop => MeterBand::Drop { rate, burst_size },
            Kind::DscpRemark => MeterBand::DscpRemark {
                rate,
                burst_size,
                prec_level: payload[0],
            },
            Kind::Experimenter => MeterBand::Experimenter {
                rate,
                burst_size,
                experimenter: NetworkEndian::read_u32(&payload[0..4]),
                data: payload[4..].to_vec(),
            },
            Kind::_Unknown(_) => return Err(Error::UnknownMeterBand),
        })
    }

    fn buffer_len(&self) -> usize {
        match *self {
            MeterBand::Drop { .. } | MeterBand::DscpRemark { .. } => 16,
            MeterBand::Experimenter { ref data, .. } => 12 + 4 + data.len(),
        }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        let mut packet = Packet::new(buffer);
        let (kind, rate, burst_size) = match *self {
            MeterBand::Drop { rate, burst_size } => (Kind::Drop, rate, burst_size),
            MeterBand::DscpRemark { rate, burst_size, .. } => (Kind::DscpRemark, rate, burst_size),
            MeterBand::Experimenter { rate, burst_size, .. } => (Kind::Experimenter, rate, burst_size),
        };
        packet.set_kind(kind);
        packet.set_length(self.buffer_len() as u16);
        packet.set_rate(rate);
        packet.set_burst_size(burst_size);
        let body = &mut packet.buffer.as_mut()[field::REST.start..];
        match *self {
            MeterBand::Drop { .. } => {}
            MeterBand::DscpRemark { prec_level, .. } => body[0] = prec_level,
            MeterBand::Experimenter {
                experimenter,
                ref data,
                ..
            } => {
                NetworkEndian::write_u32(&mut body[0..4], experimenter);
                body[4..4 + data.len()].copy_from_slice(data);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[cfg_attr(rustfmt, rustfmt_skip)]
    static DROP_BYTES: [u8; 16] = [
        0x00, 0x01,             // type = drop
        0x00, 0x10,             // length = 16
        0x00, 0x00, 0x27, 0x10, // rate = 10000
        0x00, 0x00, 0x13, 0x88, // burst_size = 5000
        0x00, 0x00, 0x00, 0x00, // padding
    ];

    #[test]
    fn parse_drop() {
        let band = MeterBand::parse(&DROP_BYTES).unwrap();
        assert_eq!(
            band,
            MeterBand::Drop {
                rate: 10000,
                burst_size: 5000,
            }
        );
    }

    #[test]
    fn emit_drop() {
        let band = MeterBand::Drop {
            rate: 10000,
            burst_size: 5000,
        };
        let mut bytes = [0xffu8; 16];
        band.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &DROP_BYTES[..]);
    }

    #[test]
    fn unknown_meter_band_is_rejected() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 16] = [
            0x12, 0x34, 0x00, 0x10,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(MeterBand::parse(&bytes), Err(Error::UnknownMeterBand));
    }

    #[test]
    fn length_shorter_than_header_is_truncated_not_a_panic() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 16] = [
            0x00, 0x01, 0x00, 0x02, // length = 2, shorter than the 12-byte header
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(MeterBand::parse(&bytes), Err(Error::Truncated));
    }
}
