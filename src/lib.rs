mod field {
    pub type Field = ::core::ops::Range<usize>;
    pub type Rest = ::core::ops::RangeFrom<usize>;
}

/// The error type for the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An operation cannot proceed because a buffer is empty or full.
    #[error("buffer space exhausted")]
    Exhausted,
    /// An incoming packet could not be parsed because some of its fields were out of bounds
    /// of the received data.
    #[error("truncated packet")]
    Truncated,
    /// An incoming packet could not be recognized and was dropped.
    /// E.g. an Ethernet packet with an unknown EtherType.
    #[error("unrecognized packet")]
    Unrecognized,
    /// An incoming packet was recognized but was self-contradictory.
    /// E.g. a TCP packet with both SYN and FIN flags set.
    #[error("malformed packet")]
    Malformed,
    /// An OXM field could not be parsed because the "class" field in the header is invalid
    #[error("unknown oxm class")]
    BadOxmClass,
    /// An OXM field could not be parsed because the "class" field in the header is not supported.
    /// This library does not support the legacy Nicira eXtensible Match classes.
    #[error("unsupported oxm class")]
    UnsupportedOxmClass,
    /// An OXM field could not be parsed because the "field" field in the header is invalid
    #[error("unknown oxm field")]
    BadOxmField,
    /// The match type field in a flow match header is invalid
    #[error("unknown match type")]
    BadMatchType,
    /// An action's `type` field does not correspond to any known action.
    #[error("unknown action type")]
    UnknownAction,
    /// An instruction's `type` field does not correspond to any known instruction.
    #[error("unknown instruction type")]
    UnknownInstruction,
    /// A meter band's `type` field does not correspond to any known meter band.
    #[error("unknown meter band type")]
    UnknownMeterBand,
    /// A queue property's `property` field does not correspond to any known property.
    #[error("unknown queue property")]
    UnknownQueueProperty,
    /// A table feature property's `type` field does not correspond to any known property kind.
    #[error("unknown table feature property")]
    UnknownTableFeatureProp,
    /// A hello element's `type` field does not correspond to any known element.
    #[error("unknown hello element")]
    UnknownHelloElement,
}

/// The result type for the codec.
pub type Result<T> = core::result::Result<T, Error>;

pub trait Repr
where
    Self: Sized,
{
    /// Parse a packet and return a high-level representation.
    fn parse(buffer: &[u8]) -> Result<Self>;

    /// Return the length of a packet that will be emitted from this high-level representation.
    fn buffer_len(&self) -> usize;

    /// Emit a high-level representation into a buffer
    fn emit(&self, buffer: &mut [u8]) -> Result<()>;
}

#[macro_use]
mod macros;
pub mod port;
pub mod oxm;
mod packets;

pub use packets::openflow::{Packet, PacketRepr, PayloadRepr};
pub use packets::*;
