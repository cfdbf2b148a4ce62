//! Types representing table features and their properties.
//!
//! A table feature property:
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
//! Unlike other TLV containers, each property's stride in the containing list is its own declared
//! `length` rounded up to the next multiple of 8, rather than `length` itself.
use super::walk;
use crate::{Error, Repr, Result};
use byteorder::{ByteOrder, NetworkEndian};

mod prop_field {
    use crate::field::*;
    pub const TYPE: Field = 0..2;
    pub const LENGTH: Field = 2..4;
    pub const REST: Rest = 4..;
}

fn padded_len(len: usize) -> usize {
    ((len + 7) / 8) * 8
}

enum_with_unknown! {
    /// Table feature property type, as found in the `type` field of a table feature property
    /// header.
    pub doc enum Kind(u16) {
        /// Instructions property.
        Instructions = 0,
        /// Instructions for table-miss.
        InstructionsMiss = 1,
        /// Next Table property.
        NextTables = 2,
        /// Next Table for table-miss.
        NextTablesMiss = 3,
        /// Write Actions property.
        WriteActions = 4,
        /// Write Actions for table-miss.
        WriteActionsMiss = 5,
        /// Apply Actions property.
        ApplyActions = 6,
        /// Apply Actions for table-miss.
        ApplyActionsMiss = 7,
        /// Match property.
        Match = 8,
        /// Wildcards property.
        Wildcards = 10,
        /// Write Set-Field property.
        WriteSetfield = 12,
        /// Write Set-Field for table-miss.
        WriteSetfieldMiss = 13,
        /// Apply Set-Field property.
        ApplySetfield = 14,
        /// Apply Set-Field for table-miss.
        ApplySetfieldMiss = 15,
        /// Vendor-specific property.
        Experimenter = 0xfffe,
        /// Vendor-specific property for table-miss.
        ExperimenterMiss = 0xffff
    }
}

/// A read/write wrapper around a buffer representing a table feature property.
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
        if len < prop_field::REST.start {
            return Err(Error::Truncated);
        }
        let length = self.length() as usize;
        if length < prop_field::REST.start || len < length {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    pub fn kind(&self) -> Kind {
        Kind::from(NetworkEndian::read_u16(&self.buffer.as_ref()[prop_field::TYPE]))
    }

    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[prop_field::LENGTH])
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    pub fn payload(&self) -> &'a [u8] {
        &self.buffer.as_ref()[prop_field::REST.start..self.length() as usize]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_kind(&mut self, value: Kind) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[prop_field::TYPE], value.into())
    }

    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[prop_field::LENGTH], value)
    }
}

/// A high-level representation of a table feature property.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TableFeatureProperty {
    /// Instructions supported by the table (a list of instruction type ids).
    Instructions(Vec<u16>),
    /// Instructions used for the table-miss flow entry.
    InstructionsMiss(Vec<u16>),
    /// Tables that can be directly reached from this one.
    NextTables(Vec<u8>),
    /// Tables reachable from the table-miss flow entry.
    NextTablesMiss(Vec<u8>),
    /// Actions supported by the Write-Actions instruction (a list of action type ids).
    WriteActions(Vec<u16>),
    /// Actions supported by the Write-Actions instruction of the table-miss flow entry.
    WriteActionsMiss(Vec<u16>),
    /// Actions supported by the Apply-Actions instruction.
    ApplyActions(Vec<u16>),
    /// Actions supported by the Apply-Actions instruction of the table-miss flow entry.
    ApplyActionsMiss(Vec<u16>),
    /// OXM fields that can be matched on (a list of raw oxm headers).
    Match(Vec<u32>),
    /// OXM fields that can be wildcarded.
    Wildcards(Vec<u32>),
    /// OXM fields settable with the Set-Field action in the Write-Actions instruction.
    WriteSetfield(Vec<u32>),
    /// Same as [`WriteSetfield`](TableFeatureProperty::WriteSetfield), for the table-miss entry.
    WriteSetfieldMiss(Vec<u32>),
    /// OXM fields settable with the Set-Field action in the Apply-Actions instruction.
    ApplySetfield(Vec<u32>),
    /// Same as [`ApplySetfield`](TableFeatureProperty::ApplySetfield), for the table-miss entry.
    ApplySetfieldMiss(Vec<u32>),
    /// Vendor-specific property, carried verbatim.
    Experimenter {
        experimenter: u32,
        exp_type: u32,
        data: Vec<u8>,
    },
    /// Vendor-specific property for the table-miss entry, carried verbatim.
    ExperimenterMiss {
        experimenter: u32,
        exp_type: u32,
        data: Vec<u8>,
    },
}

impl Repr for TableFeatureProperty {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        let payload = packet.payload();
        let u16_ids = || payload.chunks(2).map(NetworkEndian::read_u16).collect();
        let u32_ids = || payload.chunks(4).map(NetworkEndian::read_u32).collect();
        Ok(match packet.kind() {
            Kind::Instructions => TableFeatureProperty::Instructions(u16_ids()),
            Kind::InstructionsMiss => TableFeatureProperty::InstructionsMiss(u16_ids()),
            Kind::NextTables => TableFeatureProperty::NextTables(payload.to_vec()),
            Kind::NextTablesMiss => TableFeatureProperty::NextTablesMiss(payload.to_vec()),
            Kind::WriteActions => TableFeatureProperty::WriteActions(u16_ids()),
            Kind::WriteActionsMiss => TableFeatureProperty::WriteActionsMiss(u16_ids()),
            Kind::ApplyActions => TableFeatureProperty::ApplyActions(u16_ids()),
            Kind::ApplyActionsMiss => TableFeatureProperty::ApplyActionsMiss(u16_ids()),
            Kind::Match => TableFeatureProperty::Match(u32_ids()),
            Kind::Wildcards => TableFeatureProperty::Wildcards(u32_ids()),
            Kind::WriteSetfield => TableFeatureProperty::WriteSetfield(u32_ids()),
            Kind::WriteSetfieldMiss => TableFeatureProperty::WriteSetfieldMiss(u32_ids()),
            Kind::ApplySetfield => TableFeatureProperty::ApplySetfield(u32_ids()),
            Kind::ApplySetfieldMiss => TableFeatureProperty::ApplySetfieldMiss(u32_ids()),
            Kind::Experimenter => TableFeatureProperty::Experimenter {
                experimenter: NetworkEndian::read_u32(&payload[0..4]),
                exp_type: NetworkEndian::read_u32(&payload[4..8]),
                data: payload[8..].to_vec(),
            },
            Kind::ExperimenterMiss => TableFeatureProperty::ExperimenterMiss {
                experimenter: NetworkEndian::read_u32(&payload[0..4]),
                exp_type: NetworkEndian::read_u32(&payload[4..8]),
                data: payload[8..].to_vec(),
            },
            Kind::_Unknown(_) => return Err(Error::UnknownTableFeatureProp),
        })
    }

    fn buffer_len(&self) -> usize {
        padded_len(4 + self.body_len())
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        let mut packet = Packet::new(buffer);
        packet.set_kind(self.kind());
        packet.set_length((4 + self.body_len()) as u16);
        let body = &mut packet.buffer.as_mut()[prop_field::REST.start..4 + self.body_len()];
        match *self {
            TableFeatureProperty::Instructions(ref ids)
            | TableFeatureProperty::InstructionsMiss(ref ids)
            | TableFeatureProperty::WriteActions(ref ids)
            | TableFeatureProperty::WriteActionsMiss(ref ids)
            | TableFeatureProperty::ApplyActions(ref ids)
            | TableFeatureProperty::ApplyActionsMiss(ref ids) => {
                for (chunk, id) in body.chunks_mut(2).zip(ids) {
                    NetworkEndian::write_u16(chunk, *id);
                }
            }
            TableFeatureProperty::NextTables(ref ids)
            | TableFeatureProperty::NextTablesMiss(ref ids) => body.copy_from_slice(ids),
            TableFeatureProperty::Match(ref ids)
            | TableFeatureProperty::Wildcards(ref ids)
            | TableFeatureProperty::WriteSetfield(ref ids)
            | TableFeatureProperty::WriteSetfieldMiss(ref ids)
            | TableFeatureProperty::ApplySetfield(ref ids)
            | TableFeatureProperty::ApplySetfieldMiss(ref ids) => {
                for (chunk, id) in body.chunks_mut(4).zip(ids) {
                    NetworkEndian::write_u32(chunk, *id);
                }
            }
            TableFeatureProperty::Experimenter {
                experimenter,
                exp_type,
                ref data,
            }
            | TableFeatureProperty::ExperimenterMiss {
                experimenter,
                exp_type,
                ref data,
            } => {
                NetworkEndian::write_u32(&mut body[0..4], experimenter);
                NetworkEndian::write_u32(&mut body[4..8], exp_type);
                body[8..].copy_from_slice(data);
            }
        }
        Ok(())
    }
}

impl TableFeatureProperty {
    fn body_len(&self) -> usize {
        match *self {
            TableFeatureProperty::Instructions(ref ids)
            | TableFeatureProperty::InstructionsMiss(ref ids)
            | TableFeatureProperty::WriteActions(ref ids)
            | TableFeatureProperty::WriteActionsMiss(ref ids)
            | TableFeatureProperty::ApplyActions(ref ids)
            | TableFeatureProperty::ApplyActionsMiss(ref ids) => ids.len() * 2,
            TableFeatureProperty::NextTables(ref ids)
            | TableFeatureProperty::NextTablesMiss(ref ids) => ids.len(),
            TableFeatureProperty::Match(ref ids)
            | TableFeatureProperty::Wildcards(ref ids)
            | TableFeatureProperty::WriteSetfield(ref ids)
            | TableFeatureProperty::WriteSetfieldMiss(ref ids)
            | TableFeatureProperty::ApplySetfield(ref ids)
            | TableFeatureProperty::ApplySetfieldMiss(ref ids) => ids.len() * 4,
            TableFeatureProperty::Experimenter { ref data, .. }
            | TableFeatureProperty::ExperimenterMiss { ref data, .. } => 8 + data.len(),
        }
    }

    fn kind(&self) -> Kind {
        match *self {
            TableFeatureProperty::Instructions(_) => Kind::Instructions,
            TableFeatureProperty::InstructionsMiss(_) => Kind::InstructionsMiss,
            TableFeatureProperty::NextTables(_) => Kind::NextTables,
            TableFeatureProperty::NextTablesMiss(_) => Kind::NextTablesMiss,
            TableFeatureProperty::WriteActions(_) => Kind::WriteActions,
            TableFeatureProperty::WriteActionsMiss(_) => Kind::WriteActionsMiss,
            TableFeatureProperty::ApplyActions(_) => Kind::ApplyActions,
            TableFeatureProperty::ApplyActionsMiss(_) => Kind::ApplyActionsMiss,
            TableFeatureProperty::Match(_) => Kind::Match,
            TableFeatureProperty::Wildcards(_) => Kind::Wildcards,
            TableFeatureProperty::WriteSetfield(_) => Kind::WriteSetfield,
            TableFeatureProperty::WriteSetfieldMiss(_) => Kind::WriteSetfieldMiss,
            TableFeatureProperty::ApplySetfield(_) => Kind::ApplySetfield,
            TableFeatureProperty::ApplySetfieldMiss(_) => Kind::ApplySetfieldMiss,
            TableFeatureProperty::Experimenter { .. } => Kind::Experimenter,
            TableFeatureProperty::ExperimenterMiss { .. } => Kind::ExperimenterMiss,
        }
    }
}

mod tf_field {
    use crate::field::*;
    pub const LENGTH: Field = 0..2;
    pub const TABLE_ID: usize = 2;
    pub const NAME: Field = 8..40;
    pub const METADATA_MATCH: Field = 40..48;
    pub const METADATA_WRITE: Field = 48..56;
    pub const CONFIG: Field = 56..60;
    pub const MAX_ENTRIES: Field = 60..64;
    pub const PROPERTIES: Rest = 64..;
}

/// A read/write wrapper around a buffer representing a table features record.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TableFeaturesPacket<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> TableFeaturesPacket<T> {
    pub fn new(buffer: T) -> Self {
        TableFeaturesPacket { buffer }
    }

    pub fn new_checked(buffer: T) -> Result<Self> {
        let packet = Self::new(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    pub fn check_len(&self) -> Result<()> {
        let len = self.buffer.as_ref().len();
        if len < tf_field::PROPERTIES.start {
            return Err(Error::Truncated);
        }
        let length = self.length() as usize;
        if length < tf_field::PROPERTIES.start || len < length {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[tf_field::LENGTH])
    }

    pub fn table_id(&self) -> u8 {
        self.buffer.as_ref()[tf_field::TABLE_ID]
    }

    pub fn name(&self) -> &[u8] {
        &self.buffer.as_ref()[tf_field::NAME]
    }

    pub fn metadata_match(&self) -> u64 {
        NetworkEndian::read_u64(&self.buffer.as_ref()[tf_field::METADATA_MATCH])
    }

    pub fn metadata_write(&self) -> u64 {
        NetworkEndian::read_u64(&self.buffer.as_ref()[tf_field::METADATA_WRITE])
    }

    pub fn config(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[tf_field::CONFIG])
    }

    pub fn max_entries(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[tf_field::MAX_ENTRIES])
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> TableFeaturesPacket<&'a T> {
    pub fn properties(&self) -> &'a [u8] {
        &self.buffer.as_ref()[tf_field::PROPERTIES.start..self.length() as usize]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> TableFeaturesPacket<T> {
    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[tf_field::LENGTH], value)
    }

    pub fn set_table_id(&mut self, value: u8) {
        self.buffer.as_mut()[tf_field::TABLE_ID] = value;
    }

    pub fn set_name(&mut self, value: &[u8]) {
        let len = value.len().min(32);
        self.buffer.as_mut()[tf_field::NAME][..len].copy_from_slice(&value[..len]);
    }

    pub fn set_metadata_match(&mut self, value: u64) {
        NetworkEndian::write_u64(&mut self.buffer.as_mut()[tf_field::METADATA_MATCH], value)
    }

    pub fn set_metadata_write(&mut self, value: u64) {
        NetworkEndian::write_u64(&mut self.buffer.as_mut()[tf_field::METADATA_WRITE], value)
    }

    pub fn set_config(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[tf_field::CONFIG], value)
    }

    pub fn set_max_entries(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[tf_field::MAX_ENTRIES], value)
    }
}

/// A high-level representation of a table features record.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TableFeatures {
    pub table_id: u8,
    /// The table's name, null-padded to 32 bytes on the wire.
    pub name: String,
    pub metadata_match: u64,
    pub metadata_write: u64,
    pub config: u32,
    pub max_entries: u32,
    pub properties: Vec<TableFeatureProperty>,
}

impl Repr for TableFeatures {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = TableFeaturesPacket::new_checked(buffer)?;
        let name_bytes = packet.name();
        let nul = name_bytes.iter().position(|b| *b == 0).unwrap_or(name_bytes.len());
        let name = String::from_utf8_lossy(&name_bytes[..nul]).into_owned();
        Ok(TableFeatures {
            table_id: packet.table_id(),
            name,
            metadata_match: packet.metadata_match(),
            metadata_write: packet.metadata_write(),
            config: packet.config(),
            max_entries: packet.max_entries(),
            properties: walk::walk(packet.properties())?,
        })
    }

    fn buffer_len(&self) -> usize {
        tf_field::PROPERTIES.start + walk::total_len(&self.properties)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        let mut packet = TableFeaturesPacket::new(buffer);
        packet.set_length(self.buffer_len() as u16);
        packet.set_table_id(self.table_id);
        packet.set_name(self.name.as_bytes());
        packet.set_metadata_match(self.metadata_match);
        packet.set_metadata_write(self.metadata_write);
        packet.set_config(self.config);
        packet.set_max_entries(self.max_entries);
        walk::emit_all(
            &self.properties,
            &mut packet.buffer.as_mut()[tf_field::PROPERTIES.start..],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip_instructions_property() {
        let prop = TableFeatureProperty::Instructions(vec![1, 3, 4]);
        assert_eq!(prop.buffer_len(), 16); // 4 header + 6 body, padded to 16
        let mut bytes = vec![0u8; prop.buffer_len()];
        prop.emit(&mut bytes).unwrap();
        let parsed = TableFeatureProperty::parse(&bytes[..10]).unwrap();
        assert_eq!(parsed, prop);
    }

    #[test]
    fn round_trip_table_features() {
        let repr = TableFeatures {
            table_id: 0,
            name: "table0".to_string(),
            metadata_match: 0xffff_ffff_ffff_ffff,
            metadata_write: 0,
            config: 0,
            max_entries: 1024,
            properties: vec![TableFeatureProperty::NextTables(vec![1, 2, 3])],
        };
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        let parsed = TableFeatures::parse(&bytes).unwrap();
        assert_eq!(parsed, repr);
    }

    #[test]
    fn unknown_table_feature_property_is_rejected() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 8] = [
            0x12, 0x34, 0x00, 0x08,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            TableFeatureProperty::parse(&bytes),
            Err(Error::UnknownTableFeatureProp)
        );
    }

    #[test]
    fn property_length_shorter_than_header_is_truncated_not_a_panic() {
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let bytes: [u8; 8] = [
            0x00, 0x00, 0x00, 0x02, // length = 2, shorter than the 4-byte header
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            TableFeatureProperty::parse(&bytes),
            Err(Error::Truncated)
        );
    }

    #[test]
    fn table_features_length_shorter_than_header_is_truncated_not_a_panic() {
        let mut bytes = vec![0u8; 64];
        bytes[0] = 0x00;
        bytes[1] = 0x02; // length = 2, shorter than the 64-byte header
        assert_eq!(TableFeatures::parse(&bytes), Err(Error::Truncated));
    }
}
