//! Types representing OpenFlow instructions.
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
//! `length` is the total length of the instruction, header included. `WriteActions`,
//! `ApplyActions` and `ClearActions` embed an [`Action`] list; the other variants carry only
//! fixed-size fields.
use super::action::Action;
use super::walk;
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
    /// Instruction type, as found in the `type` field of an instruction header.
    pub doc enum Kind(u16) {
        /// Setup the next table in the lookup pipeline
        GotoTable = 1,
        /// Setup the metadata field for use later in pipeline
        WriteMetadata = 2,
        /// Write the action(s) onto the datapath action set
        WriteActions = 3,
        /// Applies the action(s) immediately
        ApplyActions = 4,
        /// Clears all actions from the datapath action set
        ClearActions = 5,
        /// Apply meter (rate limiter)
        Meter = 6,
        /// Vendor-specific instruction
        Experimenter = 0xffff
    }
}

/// A read/write wrapper around a buffer representing an instruction.
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

/// A high-level representation of an OpenFlow instruction.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Instruction<E> {
    /// Setup the next table in the lookup pipeline.
    GotoTable(u8),
    /// Setup the metadata field for use later in the pipeline.
    WriteMetadata { value: u64, mask: u64 },
    /// Write the given actions onto the datapath action set.
    WriteActions(Vec<Action<E>>),
    /// Apply the given actions immediately.
    ApplyActions(Vec<Action<E>>),
    /// Clear all actions from the datapath action set.
    ClearActions(Vec<Action<E>>),
    /// Apply the given meter.
    Meter(u32),
    /// Vendor-specific instruction, carried verbatim.
    Experimenter { experimenter: u32, data: Vec<u8> },
}

impl<E: Repr> Instruction<E> {
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        let payload = packet.payload();
        Ok(match packet.kind() {
            Kind::GotoTable => Instruction::GotoTable(payload[0]),
            Kind::WriteMetadata => Instruction::WriteMetadata {
                value: NetworkEndian::read_u64(&payload[4..12]),
                mask: NetworkEndian::read_u64(&payload[12..20]),
            },
            Kind::WriteActions => Instruction::WriteActions(walk::walk(&payload[4..])?),
            Kind::ApplyActions => Instruction::ApplyActions(walk::walk(&payload[4..])?),
            Kind::ClearActions => Instruction::ClearActions(walk::walk(&payload[4..])?),
            Kind::Meter => Instruction::Meter(NetworkEndian::read_u32(&payload[0..4])),
            Kind::Experimenter => Instruction::Experimenter {
                experimenter: NetworkEndian::read_u32(&payload[0..4]),
                data: payload[4..].to_vec(),
            },
            Kind::_Unknown(_) => return Err(Error::UnknownInstruction),
        })
    }

    fn body_len(&self) -> usize {
        match *self {
            Instruction::GotoTable(_) => 4,
            Instruction::WriteMetadata { .. } => 20,
            Instruction::WriteActions(ref actions)
            | Instruction::ApplyActions(ref actions)
            | Instruction::ClearActions(ref actions) => 4 + walk::total_len(actions),
            Instruction::Meter(_) => 4,
            Instruction::Experimenter { ref data, .. } => 4 + data.len(),
        }
    }

    pub fn buffer_len(&self) -> usize {
        padded_len(4 + self.body_len())
    }

    fn kind(&self) -> Kind {
        match *self {
            Instruction::GotoTable(_) => Kind::GotoTable,
            Instruction::WriteMetadata { .. } => Kind::WriteMetadata,
            Instruction::WriteActions(_) => Kind::WriteActions,
            Instruction::ApplyActions(_) => Kind::ApplyActions,
            Instruction::ClearActions(_) => Kind::ClearActions,
            Instruction::Meter(_) => Kind::Meter,
            Instruction::Experimenter { .. } => Kind::Experimenter,
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
            Instruction::GotoTable(table_id) => body[0] = table_id,
            Instruction::WriteMetadata { value, mask } => {
                NetworkEndian::write_u64(&mut body[4..12], value);
                NetworkEndian::write_u64(&mut body[12..20], mask);
            }
            Instruction::WriteActions(ref actions)
            | Instruction::ApplyActions(ref actions)
            | Instruction::ClearActions(ref actions) => {
                walk::emit_all(actions, &mut body[4..])?;
            }
            Instruction::Meter(meter_id) => NetworkEndian::write_u32(&mut body[0..4], meter_id),
            Instruction::Experimenter {
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

impl<E: Repr> Repr for Instruction<E> {
    fn parse(buffer: &[u8]) -> Result<Self> {
        Instruction::parse(buffer)
    }

    fn buffer_len(&self) -> usize {
        Instruction::buffer_len(self)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        Instruction::emit(self, buffer)
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

    #[cfg_attr(rustfmt, rustfmt_skip)]
    static GOTO_TABLE_BYTES: [u8; 8] = [
        0x00, 0x01,             // type = goto_table
        0x00, 0x08,             // length = 8
        0x05,                   // table_id = 5
        0x00, 0x00, 0x00,       // padding
    ];

    #[test]
    fn parse_goto_table() {
        let instruction = Instruction::<OxmExperimenter>::parse(&GOTO_TABLE_BYTES).unwrap();
        assert_eq!(instruction, Instruction::GotoTable(5));
    }

    #[test]
    fn emit_goto_table() {
        let instruction = Instruction::<OxmExperimenter>::GotoTable(5);
        assert_eq!(instruction.buffer_len(), 8);
        let mut bytes = [0xffu8; 8];
        instruction.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &GOTO_TABLE_BYTES[..]);
    }

    #[test]
    fn write_actions_round_trip() {
        let instruction = Instruction::<OxmExperimenter>::WriteActions(vec![
            Action::Output {
                port: PortNumber::Regular(1),
                max_length: 0xffff,
            },
        ]);
        assert_eq!(instruction.buffer_len(), 24);
        let mut bytes = vec![0u8; 24];
        instruction.emit(&mut bytes).unwrap();
        let parsed = Instruction::<OxmExperimenter>::parse(&bytes).unwrap();
        assert_eq!(parsed, instruction);
    }

    #[test]
    fn unknown_instruction_type_is_rejected() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 8] = [
            0x12, 0x34, // type = bogus
            0x00, 0x08,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            Instruction::<OxmExperimenter>::parse(&bytes),
            Err(Error::UnknownInstruction)
        );
    }

    #[cfg_attr(rustfmt, rustfmt_skip)]
    static WRITE_ACTIONS_TWO_OUTPUTS_BYTES: [u8; 40] = [
        0x00, 0x03,             // type = write_actions
        0x00, 0x28,             // length = 40
        0x00, 0x00, 0x00, 0x00, // padding
        0x00, 0x00,             // type = output
        0x00, 0x10,             // length = 16
        0x01, 0x02, 0x03, 0x04, // port
        0x05, 0x06,             // max_length
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // padding
        0x00, 0x00,             // type = output
        0x00, 0x10,             // length = 16
        0x07, 0x08, 0x09, 0x0a, // port
        0x0b, 0x0c,             // max_length
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // padding
    ];

    #[test]
    fn write_actions_emits_padded_inner_action_lengths() {
        let instruction = Instruction::<OxmExperimenter>::WriteActions(vec![
            Action::Output {
                port: PortNumber::Regular(0x0102_0304),
                max_length: 0x0506,
            },
            Action::Output {
                port: PortNumber::Regular(0x0708_090a),
                max_length: 0x0b0c,
            },
        ]);
        assert_eq!(instruction.buffer_len(), 40);
        let mut bytes = [0xffu8; 40];
        instruction.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &WRITE_ACTIONS_TWO_OUTPUTS_BYTES[..]);
        let parsed = Instruction::<OxmExperimenter>::parse(&bytes).unwrap();
        assert_eq!(parsed, instruction);
    }

    #[test]
    fn length_shorter_than_header_is_truncated_not_a_panic() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 8] = [
            0x00, 0x01, // type = goto_table
            0x00, 0x02, // length = 2, shorter than the 4-byte header
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            Instruction::<OxmExperimenter>::parse(&bytes),
            Err(Error::Truncated)
        );
    }
}
