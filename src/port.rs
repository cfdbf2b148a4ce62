use crate::{Error, Repr, Result};
use byteorder::{ByteOrder, NetworkEndian};

/// OpenFlow port numbers
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PortNumber {
    /// maximum number of physical and logical switch ports
    Max,
    /// Output port not set in action-set.
    Unset,
    /// Send the packet out the input port.
    InPort,
    /// Submit the packet to the first flow table. This destination port can only be used in
    /// packet-out messages.
    Table,
    /// Forward using non OpenFlow pipeline.
    Normal,
    /// Flood using non OpenFlow pipeline.
    Flood,
    /// Flood through all standard ports except input port.
    All,
    /// Send to controller
    Controller,
    /// Local OpenFlow "port"
    Local,
    /// Special value used in some requests when no port is specified (i.e. wildcarded)
    Any,
    /// A regular port number
    Regular(u32),
}

impl ::core::convert::From<u32> for PortNumber {
    fn from(value: u32) -> Self {
        match value {
            0xffff_ff00 => PortNumber::Max,
            0xffff_fff7 => PortNumber::Unset,
            0xffff_fff8 => PortNumber::InPort,
            0xffff_fff9 => PortNumber::Table,
            0xffff_fffa => PortNumber::Normal,
            0xffff_fffb => PortNumber::Flood,
            0xffff_fffc => PortNumber::All,
            0xffff_fffd => PortNumber::Controller,
            0xffff_fffe => PortNumber::Local,
            0xffff_ffff => PortNumber::Any,
            other => PortNumber::Regular(other),
        }
    }
}

impl ::core::convert::From<PortNumber> for u32 {
    fn from(value: PortNumber) -> Self {
        match value {
            PortNumber::Max => 0xffff_ff00,
            PortNumber::Unset => 0xffff_fff7,
            PortNumber::InPort => 0xffff_fff8,
            PortNumber::Table => 0xffff_fff9,
            PortNumber::Normal => 0xffff_fffa,
            PortNumber::Flood => 0xffff_fffb,
            PortNumber::All => 0xffff_fffc,
            PortNumber::Controller => 0xffff_fffd,
            PortNumber::Local => 0xffff_fffe,
            PortNumber::Any => 0xffff_ffff,
            PortNumber::Regular(other) => other,
        }
    }
}

mod field {
    use crate::field::*;
    pub const PORT_NO: Field = 0..4;
    pub const HW_ADDR: Field = 8..14;
    pub const NAME: Field = 16..32;
    pub const CONFIG: Field = 32..36;
    pub const STATE: Field = 36..40;
    pub const CURR: Field = 40..44;
    pub const ADVERTISED: Field = 44..48;
    pub const SUPPORTED: Field = 48..52;
    pub const PEER: Field = 52..56;
    pub const CURR_SPEED: Field = 56..60;
    pub const MAX_SPEED: Field = 60..64;
}

/// A read/write wrapper around a buffer representing a switch port description.
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
        if self.buffer.as_ref().len() < 64 {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    pub fn port_no(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::PORT_NO])
    }

    pub fn hw_addr(&self) -> [u8; 6] {
        let mut addr = [0u8; 6];
        addr.copy_from_slice(&self.buffer.as_ref()[field::HW_ADDR]);
        addr
    }

    pub fn name(&self) -> &[u8] {
        &self.buffer.as_ref()[field::NAME]
    }

    pub fn config(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::CONFIG])
    }

    pub fn state(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::STATE])
    }

    pub fn curr(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::CURR])
    }

    pub fn advertised(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::ADVERTISED])
    }

    pub fn supported(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::SUPPORTED])
    }

    pub fn peer(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::PEER])
    }

    pub fn curr_speed(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::CURR_SPEED])
    }

    pub fn max_speed(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::MAX_SPEED])
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_port_no(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::PORT_NO], value)
    }

    pub fn set_hw_addr(&mut self, value: [u8; 6]) {
        self.buffer.as_mut()[field::HW_ADDR].copy_from_slice(&value)
    }

    pub fn set_name(&mut self, value: &[u8]) {
        let len = value.len().min(16);
        self.buffer.as_mut()[field::NAME][..len].copy_from_slice(&value[..len]);
    }

    pub fn set_config(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::CONFIG], value)
    }

    pub fn set_state(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::STATE], value)
    }

    pub fn set_curr(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::CURR], value)
    }

    pub fn set_advertised(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::ADVERTISED], value)
    }

    pub fn set_supported(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::SUPPORTED], value)
    }

    pub fn set_peer(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::PEER], value)
    }

    pub fn set_curr_speed(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::CURR_SPEED], value)
    }

    pub fn set_max_speed(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::MAX_SPEED], value)
    }
}

/// A high-level representation of a switch port's description and state, as carried in
/// features replies, port-status messages and multipart port-description replies.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Port {
    pub port_no: PortNumber,
    pub hw_addr: [u8; 6],
    /// The port's name, null-padded to 16 bytes on the wire.
    pub name: String,
    pub config: u32,
    pub state: u32,
    pub curr: u32,
    pub advertised: u32,
    pub supported: u32,
    pub peer: u32,
    pub curr_speed: u32,
    pub max_speed: u32,
}

impl Repr for Port {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        let name_bytes = packet.name();
        let nul = name_bytes
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(name_bytes.len());
        let name = String::from_utf8_lossy(&name_bytes[..nul]).into_owned();
        Ok(Port {
            port_no: PortNumber::from(packet.port_no()),
            hw_addr: packet.hw_addr(),
            name,
            config: packet.config(),
            state: packet.state(),
            curr: packet.curr(),
            advertised: packet.advertised(),
            supported: packet.supported(),
            peer: packet.peer(),
            curr_speed: packet.curr_speed(),
            max_speed: packet.max_speed(),
        })
    }

    fn buffer_len(&self) -> usize {
        64
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        let mut packet = Packet::new(buffer);
        packet.set_port_no(self.port_no.into());
        packet.set_hw_addr(self.hw_addr);
        packet.set_name(self.name.as_bytes());
        packet.set_config(self.config);
        packet.set_state(self.state);
        packet.set_curr(self.curr);
        packet.set_advertised(self.advertised);
        packet.set_supported(self.supported);
        packet.set_peer(self.peer);
        packet.set_curr_speed(self.curr_speed);
        packet.set_max_speed(self.max_speed);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn port() -> Port {
        Port {
            port_no: PortNumber::Regular(1),
            hw_addr: [0x00, 0x11, 0x22, 0x33, 0x44, 0x55],
            name: "eth0".to_string(),
            config: 0,
            state: 4,
            curr: 0x80,
            advertised: 0x80,
            supported: 0x80,
            peer: 0,
            curr_speed: 10_000_000,
            max_speed: 10_000_000,
        }
    }

    #[test]
    fn round_trip() {
        let repr = port();
        let mut bytes = [0u8; 64];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(Port::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn buffer_too_short_is_truncated() {
        let mut bytes = [0u8; 64];
        port().emit(&mut bytes).unwrap();
        assert_eq!(Port::parse(&bytes[..32]), Err(Error::Truncated));
    }
}
