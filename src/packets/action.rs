//! Types representing OpenFlow actions.
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |      type       |      length     |
//! +--------+--------+--------+--------+
//! |              body                 |
//! |        (variable length)          |
//! +--------+--------+--------+--------+
//! ```
//!
//! `length` is the total length of the action, header included, and the whole action is always
//! padded so that its length is a multiple of 8 bytes.
use crate::oxm::Oxm;
use crate::port::PortNumber;
use crate::{Error, Repr, Result};
use byteorder::{ByteOrder, NetworkEndian};

mod field {
    use crate::field::*;
    pub const TYPE: Field = 0..2;
    pub const LENGTH: Field = 2..4;
    pub const REST: Rest = 4..;
}

fn padded_len(len: usize) -> usize {
    ((len + 7) / 8) * 8
}

enum_with_unknown! {
    /// Action type, as found in the `type` field of an action header.
    pub doc enum Kind(u16) {
        /// Output to switch port.
        Output = 0,
        /// Copy TTL "outwards" -- from next-to-outermost to outermost
        CopyTtlOut = 11,
        /// Copy TTL "inwards" -- from outermost to next-to-outermost
        CopyTtlIn = 12,
        /// MPLS TTL
        SetMplsTtl = 15,
        /// Decrement MPLS TTL
        DecMplsTtl = 16,
        /// Push a new VLAN tag
        PushVlan = 17,
        /// Pop the outer VLAN tag
        PopVlan = 18,
        /// Push a new MPLS tag
        PushMpls = 19,
        /// Pop the outer MPLS tag
        PopMpls = 20,
        /// Set queue id when outputting to a port
        SetQueue = 21,
        /// Apply group.
        Group = 22,
        /// IP TTL.
        SetNwTtl = 23,
        /// Decrement IP TTL.
        DecNwTtl = 24,
        /// Set a header field using OXM.
        SetField = 25,
        /// Push a new PBB service tag (I-TAG)
        PushPbb = 26,
        /// Pop the outer PBB service tag (I-TAG)
        PopPbb = 27,
        /// Vendor-specific action.
        Experimenter = 0xffff
    }
}

/// A read/write wrapper around a buffer representing an action.
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
}

/// A high-level representation of an OpenFlow action.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Action<E> {
    /// Output to switch port.
    Output { port: PortNumber, max_length: u16 },
    /// Copy TTL "outwards".
    CopyTtlOut,
    /// Copy TTL "inwards".
    CopyTtlIn,
    /// Set the MPLS TTL.
    SetMplsTtl(u8),
    /// Decrement the MPLS TTL.
    DecMplsTtl,
    /// Push a VLAN tag with the given ethertype.
    PushVlan(u16),
    /// Pop the outer VLAN tag.
    PopVlan,
    /// Push an MPLS tag with the given ethertype.
    PushMpls(u16),
    /// Pop the outer MPLS tag, setting the given ethertype on the new outer header.
    PopMpls(u16),
    /// Set the queue id used when outputting to a port.
    SetQueue(u32),
    /// Apply the given group.
    Group(u32),
    /// Set the IP TTL.
    SetNwTtl(u8),
    /// Decrement the IP TTL.
    DecNwTtl,
    /// Set a header field, described by an OXM TLV.
    SetField(Oxm<E>),
    /// Push a PBB service tag (I-TAG) with the given ethertype.
    PushPbb(u16),
    /// Pop the outer PBB service tag (I-TAG).
    PopPbb,
    /// Vendor-specific action, carried verbatim.
    Experimenter { experimenter: u32, data: Vec<u8> },
}

impl<E: Repr> Action<E> {
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        let payload = packet.payload();
        Ok(match packet.kind() {
            Kind::Output => Action::Output {
                port: PortNumber::from(NetworkEndian::read_u32(&payload[0..4])),
                max_length: NetworkEndian::read_u16(&payload[4..6]),
            },
            Kind::CopyTtlOut => Action::CopyTtlOut,
            Kind::CopyTtlIn => Action::CopyTtlIn,
            Kind::SetMplsTtl => Action::SetMplsTtl(payload[0]),
            Kind::DecMplsTtl => Action::DecMplsTtl,
            Kind::PushVlan => Action::PushVlan(NetworkEndian::read_u16(&payload[0..2])),
            Kind::PopVlan => Action::PopVlan,
            Kind::PushMpls => Action::PushMpls(NetworkEndian::read_u16(&payload[0..2])),
            Kind::PopMpls => Action::PopMpls(NetworkEndian::read_u16(&payload[0..2])),
            Kind::SetQueue => Action::SetQueue(NetworkEndian::read_u32(&payload[0..4])),
            Kind::Group => Action::Group(NetworkEndian::read_u32(&payload[0..4])),
            Kind::SetNwTtl => Action::SetNwTtl(payload[0]),
            Kind::DecNwTtl => Action::DecNwTtl,
            Kind::SetField => Action::SetField(Oxm::parse(payload)?),
            Kind::PushPbb => Action::PushPbb(NetworkEndian::read_u16(&payload[0..2])),
            Kind::PopPbb => Action::PopPbb,
            Kind::Experimenter => Action::Experimenter {
                experimenter: NetworkEndian::read_u32(&payload[0..4]),
                data: payload[4..].to_vec(),
            },
            Kind::_Unknown(_) => return Err(Error::UnknownAction),
        })
    }

    fn body_len(&self) -> usize {
        match *self {
            Action::Output { .. } => 8,
            Action::CopyTtlOut
            | Action::CopyTtlIn
            | Action::DecMplsTtl
            | Action::PopVlan
            | Action::DecNwTtl
            | Action::PopPbb => 4,
            Action::SetMplsTtl(_) | Action::SetNwTtl(_) => 4,
            Action::PushVlan(_) | Action::PushMpls(_) | Action::PushPbb(_) | Action::PopMpls(_) => 4,
            Action::SetQueue(_) | Action::Group(_) => 4,
            Action::SetField(ref oxm) => oxm.buffer_len(),
            Action::Experimenter { ref data, .. } => 4 + data.len(),
        }
    }

    pub fn buffer_len(&self) -> usize {
        padded_len(4 + self.body_len())
    }

    fn kind(&self) -> Kind {
        match *self {
            Action::Output { .. } => Kind::Output,
            Action::CopyTtlOut => Kind::CopyTtlOut,
            Action::CopyTtlIn => Kind::CopyTtlIn,
            Action::SetMplsTtl(_) => Kind::SetMplsTtl,
            Action::DecMplsTtl => Kind::DecMplsTtl,
            Action::PushVlan(_) => Kind::PushVlan,
            Action::PopVlan => Kind::PopVlan,
            Action::PushMpls(_) => Kind::PushMpls,
            Action::PopMpls(_) => Kind::PopMpls,
            Action::SetQueue(_) => Kind::SetQueue,
            Action::Group(_) => Kind::Group,
            Action::SetNwTtl(_) => Kind::SetNwTtl,
            Action::DecNwTtl => Kind::DecNwTtl,
            Action::SetField(_) => Kind::SetField,
            Action::PushPbb(_) => Kind::PushPbb,
            Action::PopPbb => Kind::PopPbb,
            Action::Experimenter { .. } => Kind::Experimenter,
        }
    }

    pub fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        let mut packet = Packet::new(buffer);
        packet.set_kind(self.kind());
        packet.set_length(self.buffer_len() as u16);
        let body = &mut packet.buffer.as_mut()[field::REST.start..4 + self.body_len()];
        match *self {
            Action::Output { port, max_length } => {
                NetworkEndian::write_u32(&mut body[0..4], port.into());
                NetworkEndian::write_u16(&mut body[4..6], max_length);
            }
            Action::CopyTtlOut
            | Action::CopyTtlIn
            | Action::DecMplsTtl
            | Action::PopVlan
            | Action::DecNwTtl
            | Action::PopPbb => {}
            Action::SetMplsTtl(ttl) | Action::SetNwTtl(ttl) => body[0] = ttl,
            Action::PushVlan(ethertype)
            | Action::PushMpls(ethertype)
            | Action::PushPbb(ethertype)
            | Action::PopMpls(ethertype) => NetworkEndian::write_u16(&mut body[0..2], ethertype),
            Action::SetQueue(id) | Action::Group(id) => NetworkEndian::write_u32(&mut body[0..4], id),
            Action::SetField(ref oxm) => oxm.emit(body)?,
            Action::Experimenter {
                experimenter,
                ref data,
            } => {
                NetworkEndian::write_u32(&mut body[0..4], experimenter);
                body[4..].copy_from_slice(data);
            }
        }
        Ok(())
    }
}

impl<E: Repr> Repr for Action<E> {
    fn parse(buffer: &[u8]) -> Result<Self> {
        Action::parse(buffer)
    }

    fn buffer_len(&self) -> usize {
        Action::buffer_len(self)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        Action::emit(self, buffer)
    }
}

#[cfg(test)]
mod test {
    use super::*;

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

    #[cfg_attr(rustfmt, rustfmt_skip)]
    static OUTPUT_BYTES: [u8; 16] = [
        0x00, 0x00,             // type = output
        0x00, 0x10,             // length = 16
        0x00, 0x00, 0x00, 0x05, // port = 5
        0xff, 0xe5,             // max_length = 65509
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // padding
    ];

    #[test]
    fn parse_output() {
        let action = Action::<OxmExperimenter>::parse(&OUTPUT_BYTES).unwrap();
        assert_eq!(
            action,
            Action::Output {
                port: PortNumber::Regular(5),
                max_length: 0xffe5,
            }
        );
    }

    #[test]
    fn emit_output() {
        let action = Action::<OxmExperimenter>::Output {
            port: PortNumber::Regular(5),
            max_length: 0xffe5,
        };
        assert_eq!(action.buffer_len(), 16);
        let mut bytes = [0xffu8; 16];
        action.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &OUTPUT_BYTES[..]);
    }

    #[cfg_attr(rustfmt, rustfmt_skip)]
    static POP_VLAN_BYTES: [u8; 8] = [
        0x00, 0x12, // type = pop_vlan
        0x00, 0x08, // length = 8
        0x00, 0x00, 0x00, 0x00, // padding
    ];

    #[test]
    fn parse_header_only() {
        let action = Action::<OxmExperimenter>::parse(&POP_VLAN_BYTES).unwrap();
        assert_eq!(action, Action::PopVlan);
    }

    #[test]
    fn emit_header_only() {
        let action = Action::<OxmExperimenter>::PopVlan;
        assert_eq!(action.buffer_len(), 8);
        let mut bytes = [0xffu8; 8];
        action.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &POP_VLAN_BYTES[..]);
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 8] = [
            0x12, 0x34, // type = bogus
            0x00, 0x08,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            Action::<OxmExperimenter>::parse(&bytes),
            Err(Error::UnknownAction)
        );
    }

    #[test]
    fn length_shorter_than_header_is_truncated_not_a_panic() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 8] = [
            0x00, 0x00, // type = output
            0x00, 0x02, // length = 2, shorter than the 4-byte header
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            Action::<OxmExperimenter>::parse(&bytes),
            Err(Error::Truncated)
        );
    }
}
