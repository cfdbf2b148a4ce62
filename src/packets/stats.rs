//! Types representing the various multipart/stats reply records.
//!
//! The fixed-size records (`AggregateStats`, `TableStats`, `PortStats`, `QueueStats`,
//! `BucketCounter`, `MeterBandStats`, `GroupFeaturesStats`, `MeterFeatures`) only need their
//! integer fields byte-swapped. The composite records (`FlowStats`, `GroupStats`, `GroupDesc`,
//! `MeterStats`, `MeterConfig`) additionally walk an embedded sub-TLV list.
use super::bucket::Bucket;
use super::instruction::Instruction;
use super::meter_band::MeterBand;
use super::walk;
use crate::oxm::FlowMatch;
use crate::{Error, Repr, Result};
use byteorder::{ByteOrder, NetworkEndian};

/// `ofp_aggregate_stats_reply`: packet/byte/flow counts matching a set of flow entries.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AggregateStats {
    pub packet_count: u64,
    pub byte_count: u64,
    pub flow_count: u32,
}

impl Repr for AggregateStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 24 {
            return Err(Error::Truncated);
        }
        Ok(AggregateStats {
            packet_count: NetworkEndian::read_u64(&buffer[0..8]),
            byte_count: NetworkEndian::read_u64(&buffer[8..16]),
            flow_count: NetworkEndian::read_u32(&buffer[16..20]),
        })
    }

    fn buffer_len(&self) -> usize {
        24
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u64(&mut buffer[0..8], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[8..16], self.byte_count);
        NetworkEndian::write_u32(&mut buffer[16..20], self.flow_count);
        Ok(())
    }
}

/// `ofp_table_stats`: per-table flow counters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TableStats {
    pub table_id: u8,
    pub active_count: u32,
    pub lookup_count: u64,
    pub matched_count: u64,
}

impl Repr for TableStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 24 {
            return Err(Error::Truncated);
        }
        Ok(TableStats {
            table_id: buffer[0],
            active_count: NetworkEndian::read_u32(&buffer[4..8]),
            lookup_count: NetworkEndian::read_u64(&buffer[8..16]),
            matched_count: NetworkEndian::read_u64(&buffer[16..24]),
        })
    }

    fn buffer_len(&self) -> usize {
        24
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        buffer[0] = self.table_id;
        NetworkEndian::write_u32(&mut buffer[4..8], self.active_count);
        NetworkEndian::write_u64(&mut buffer[8..16], self.lookup_count);
        NetworkEndian::write_u64(&mut buffer[16..24], self.matched_count);
        Ok(())
    }
}

/// `ofp_port_stats`: per-port traffic counters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PortStats {
    pub port_no: u32,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_frame_err: u64,
    pub rx_over_err: u64,
    pub rx_crc_err: u64,
    pub collisions: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
}

impl Repr for PortStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 112 {
            return Err(Error::Truncated);
        }
        Ok(PortStats {
            port_no: NetworkEndian::read_u32(&buffer[0..4]),
            rx_packets: NetworkEndian::read_u64(&buffer[8..16]),
            tx_packets: NetworkEndian::read_u64(&buffer[16..24]),
            rx_bytes: NetworkEndian::read_u64(&buffer[24..32]),
            tx_bytes: NetworkEndian::read_u64(&buffer[32..40]),
            rx_dropped: NetworkEndian::read_u64(&buffer[40..48]),
            tx_dropped: NetworkEndian::read_u64(&buffer[48..56]),
            rx_errors: NetworkEndian::read_u64(&buffer[56..64]),
            tx_errors: NetworkEndian::read_u64(&buffer[64..72]),
            rx_frame_err: NetworkEndian::read_u64(&buffer[72..80]),
            rx_over_err: NetworkEndian::read_u64(&buffer[80..88]),
            rx_crc_err: NetworkEndian::read_u64(&buffer[88..96]),
            collisions: NetworkEndian::read_u64(&buffer[96..104]),
            duration_sec: NetworkEndian::read_u32(&buffer[104..108]),
            duration_nsec: NetworkEndian::read_u32(&buffer[108..112]),
        })
    }

    fn buffer_len(&self) -> usize {
        112
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.port_no);
        NetworkEndian::write_u64(&mut buffer[8..16], self.rx_packets);
        NetworkEndian::write_u64(&mut buffer[16..24], self.tx_packets);
        NetworkEndian::write_u64(&mut buffer[24..32], self.rx_bytes);
        NetworkEndian::write_u64(&mut buffer[32..40], self.tx_bytes);
        NetworkEndian::write_u64(&mut buffer[40..48], self.rx_dropped);
        NetworkEndian::write_u64(&mut buffer[48..56], self.tx_dropped);
        NetworkEndian::write_u64(&mut buffer[56..64], self.rx_errors);
        NetworkEndian::write_u64(&mut buffer[64..72], self.tx_errors);
        NetworkEndian::write_u64(&mut buffer[72..80], self.rx_frame_err);
        NetworkEndian::write_u64(&mut buffer[80..88], self.rx_over_err);
        NetworkEndian::write_u64(&mut buffer[88..96], self.rx_crc_err);
        NetworkEndian::write_u64(&mut buffer[96..104], self.collisions);
        NetworkEndian::write_u32(&mut buffer[104..108], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[108..112], self.duration_nsec);
        Ok(())
    }
}

/// `ofp_queue_stats`: per-queue traffic counters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct QueueStats {
    pub port_no: u32,
    pub queue_id: u32,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errors: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
}

impl Repr for QueueStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 40 {
            return Err(Error::Truncated);
        }
        Ok(QueueStats {
            port_no: NetworkEndian::read_u32(&buffer[0..4]),
            queue_id: NetworkEndian::read_u32(&buffer[4..8]),
            tx_bytes: NetworkEndian::read_u64(&buffer[8..16]),
            tx_packets: NetworkEndian::read_u64(&buffer[16..24]),
            tx_errors: NetworkEndian::read_u64(&buffer[24..32]),
            duration_sec: NetworkEndian::read_u32(&buffer[32..36]),
            duration_nsec: NetworkEndian::read_u32(&buffer[36..40]),
        })
    }

    fn buffer_len(&self) -> usize {
        40
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.port_no);
        NetworkEndian::write_u32(&mut buffer[4..8], self.queue_id);
        NetworkEndian::write_u64(&mut buffer[8..16], self.tx_bytes);
        NetworkEndian::write_u64(&mut buffer[16..24], self.tx_packets);
        NetworkEndian::write_u64(&mut buffer[24..32], self.tx_errors);
        NetworkEndian::write_u32(&mut buffer[32..36], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[36..40], self.duration_nsec);
        Ok(())
    }
}

/// `ofp_bucket_counter`: per-bucket group counters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BucketCounter {
    pub packet_count: u64,
    pub byte_count: u64,
}

impl Repr for BucketCounter {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 16 {
            return Err(Error::Truncated);
        }
        Ok(BucketCounter {
            packet_count: NetworkEndian::read_u64(&buffer[0..8]),
            byte_count: NetworkEndian::read_u64(&buffer[8..16]),
        })
    }

    fn buffer_len(&self) -> usize {
        16
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u64(&mut buffer[0..8], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[8..16], self.byte_count);
        Ok(())
    }
}

/// `ofp_meter_band_stats`: per-band meter counters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MeterBandStats {
    pub packet_band_count: u64,
    pub byte_band_count: u64,
}

impl Repr for MeterBandStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 16 {
            return Err(Error::Truncated);
        }
        Ok(MeterBandStats {
            packet_band_count: NetworkEndian::read_u64(&buffer[0..8]),
            byte_band_count: NetworkEndian::read_u64(&buffer[8..16]),
        })
    }

    fn buffer_len(&self) -> usize {
        16
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u64(&mut buffer[0..8], self.packet_band_count);
        NetworkEndian::write_u64(&mut buffer[8..16], self.byte_band_count);
        Ok(())
    }
}

/// `ofp_group_features`: capabilities and limits of the group table.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GroupFeaturesStats {
    pub types: u32,
    pub capabilities: u32,
    pub max_groups: [u32; 4],
    pub actions: [u32; 4],
}

impl Repr for GroupFeaturesStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 40 {
            return Err(Error::Truncated);
        }
        let mut max_groups = [0u32; 4];
        let mut actions = [0u32; 4];
        for i in 0..4 {
            max_groups[i] = NetworkEndian::read_u32(&buffer[8 + i * 4..12 + i * 4]);
            actions[i] = NetworkEndian::read_u32(&buffer[24 + i * 4..28 + i * 4]);
        }
        Ok(GroupFeaturesStats {
            types: NetworkEndian::read_u32(&buffer[0..4]),
            capabilities: NetworkEndian::read_u32(&buffer[4..8]),
            max_groups,
            actions,
        })
    }

    fn buffer_len(&self) -> usize {
        40
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.types);
        NetworkEndian::write_u32(&mut buffer[4..8], self.capabilities);
        for i in 0..4 {
            NetworkEndian::write_u32(&mut buffer[8 + i * 4..12 + i * 4], self.max_groups[i]);
            NetworkEndian::write_u32(&mut buffer[24 + i * 4..28 + i * 4], self.actions[i]);
        }
        Ok(())
    }
}

/// `ofp_meter_features`: capabilities and limits of the meter table.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MeterFeatures {
    pub max_meter: u32,
    pub band_types: u32,
    pub capabilities: u32,
    pub max_bands: u8,
    pub max_color: u8,
}

impl Repr for MeterFeatures {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 16 {
            return Err(Error::Truncated);
        }
        Ok(MeterFeatures {
            max_meter: NetworkEndian::read_u32(&buffer[0..4]),
            band_types: NetworkEndian::read_u32(&buffer[4..8]),
            capabilities: NetworkEndian::read_u32(&buffer[8..12]),
            max_bands: buffer[12],
            max_color: buffer[13],
        })
    }

    fn buffer_len(&self) -> usize {
        16
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.max_meter);
        NetworkEndian::write_u32(&mut buffer[4..8], self.band_types);
        NetworkEndian::write_u32(&mut buffer[8..12], self.capabilities);
        buffer[12] = self.max_bands;
        buffer[13] = self.max_color;
        Ok(())
    }
}

/// `ofp_flow_stats`: one flow table entry's counters, alongside the match and instructions that
/// produced it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FlowStats<E> {
    pub table_id: u8,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub priority: u16,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub flags: u16,
    pub cookie: u64,
    pub packet_count: u64,
    pub byte_count: u64,
    pub flow_match: FlowMatch<E>,
    pub instructions: Vec<Instruction<E>>,
}

impl<E: Repr> Repr for FlowStats<E> {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 48 {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[0..2]) as usize;
        if length < 48 || buffer.len() < length {
            return Err(Error::Truncated);
        }
        let flow_match = FlowMatch::parse(&buffer[48..])?;
        let match_len = flow_match.buffer_len();
        if 48 + match_len > length {
            return Err(Error::Truncated);
        }
        let instructions = walk::walk(&buffer[48 + match_len..length])?;
        Ok(FlowStats {
            table_id: buffer[2],
            duration_sec: NetworkEndian::read_u32(&buffer[4..8]),
            duration_nsec: NetworkEndian::read_u32(&buffer[8..12]),
            priority: NetworkEndian::read_u16(&buffer[12..14]),
            idle_timeout: NetworkEndian::read_u16(&buffer[14..16]),
            hard_timeout: NetworkEndian::read_u16(&buffer[16..18]),
            flags: NetworkEndian::read_u16(&buffer[18..20]),
            cookie: NetworkEndian::read_u64(&buffer[24..32]),
            packet_count: NetworkEndian::read_u64(&buffer[32..40]),
            byte_count: NetworkEndian::read_u64(&buffer[40..48]),
            flow_match,
            instructions,
        })
    }

    fn buffer_len(&self) -> usize {
        48 + self.flow_match.buffer_len() + walk::total_len(&self.instructions)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u16(&mut buffer[0..2], self.buffer_len() as u16);
        buffer[2] = self.table_id;
        NetworkEndian::write_u32(&mut buffer[4..8], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[8..12], self.duration_nsec);
        NetworkEndian::write_u16(&mut buffer[12..14], self.priority);
        NetworkEndian::write_u16(&mut buffer[14..16], self.idle_timeout);
        NetworkEndian::write_u16(&mut buffer[16..18], self.hard_timeout);
        NetworkEndian::write_u16(&mut buffer[18..20], self.flags);
        NetworkEndian::write_u64(&mut buffer[24..32], self.cookie);
        NetworkEndian::write_u64(&mut buffer[32..40], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[40..48], self.byte_count);
        let match_len = self.flow_match.buffer_len();
        self.flow_match.emit(&mut buffer[48..48 + match_len])?;
        walk::emit_all(&self.instructions, &mut buffer[48 + match_len..])?;
        Ok(())
    }
}

/// `ofp_group_stats`: per-group counters, alongside per-bucket counters.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GroupStats {
    pub group_id: u32,
    pub ref_count: u32,
    pub packet_count: u64,
    pub byte_count: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub bucket_stats: Vec<BucketCounter>,
}

impl Repr for GroupStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 40 {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[0..2]) as usize;
        if length < 40 || buffer.len() < length {
            return Err(Error::Truncated);
        }
        Ok(GroupStats {
            group_id: NetworkEndian::read_u32(&buffer[4..8]),
            ref_count: NetworkEndian::read_u32(&buffer[8..12]),
            packet_count: NetworkEndian::read_u64(&buffer[16..24]),
            byte_count: NetworkEndian::read_u64(&buffer[24..32]),
            duration_sec: NetworkEndian::read_u32(&buffer[32..36]),
            duration_nsec: NetworkEndian::read_u32(&buffer[36..40]),
            bucket_stats: walk::walk(&buffer[40..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        40 + walk::total_len(&self.bucket_stats)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u16(&mut buffer[0..2], self.buffer_len() as u16);
        NetworkEndian::write_u32(&mut buffer[4..8], self.group_id);
        NetworkEndian::write_u32(&mut buffer[8..12], self.ref_count);
        NetworkEndian::write_u64(&mut buffer[16..24], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[24..32], self.byte_count);
        NetworkEndian::write_u32(&mut buffer[32..36], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[36..40], self.duration_nsec);
        walk::emit_all(&self.bucket_stats, &mut buffer[40..])?;
        Ok(())
    }
}

enum_with_unknown! {
    /// Group type, as found in the `type` field of a group descriptor.
    pub doc enum GroupKind(u8) {
        /// Execute all buckets in the group.
        All = 0,
        /// Execute one bucket, selected by a switch-computed algorithm.
        Select = 1,
        /// Execute the first live bucket.
        Indirect = 2,
        /// Fast failover: execute the first live bucket, in bucket order.
        FastFailover = 3
    }
}

/// `ofp_group_desc`: a group's configuration, as reported by the switch.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GroupDesc<E> {
    pub kind: GroupKind,
    pub group_id: u32,
    pub buckets: Vec<Bucket<E>>,
}

impl<E: Repr> Repr for GroupDesc<E> {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 8 {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[0..2]) as usize;
        if length < 8 || buffer.len() < length {
            return Err(Error::Truncated);
        }
        Ok(GroupDesc {
            kind: GroupKind::from(buffer[2]),
            group_id: NetworkEndian::read_u32(&buffer[4..8]),
            buckets: walk::walk(&buffer[8..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        8 + walk::total_len(&self.buckets)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u16(&mut buffer[0..2], self.buffer_len() as u16);
        buffer[2] = self.kind.into();
        NetworkEndian::write_u32(&mut buffer[4..8], self.group_id);
        walk::emit_all(&self.buckets, &mut buffer[8..])?;
        Ok(())
    }
}

/// `ofp_meter_stats`: per-meter counters, alongside per-band counters.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MeterStats {
    pub meter_id: u32,
    pub flow_count: u32,
    pub packet_in_count: u64,
    pub byte_in_count: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub band_stats: Vec<MeterBandStats>,
}

impl Repr for MeterStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 40 {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[4..6]) as usize;
        if length < 40 || buffer.len() < length {
            return Err(Error::Truncated);
        }
        Ok(MeterStats {
            meter_id: NetworkEndian::read_u32(&buffer[0..4]),
            flow_count: NetworkEndian::read_u32(&buffer[12..16]),
            packet_in_count: NetworkEndian::read_u64(&buffer[16..24]),
            byte_in_count: NetworkEndian::read_u64(&buffer[24..32]),
            duration_sec: NetworkEndian::read_u32(&buffer[32..36]),
            duration_nsec: NetworkEndian::read_u32(&buffer[36..40]),
            band_stats: walk::walk(&buffer[40..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        40 + walk::total_len(&self.band_stats)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.meter_id);
        NetworkEndian::write_u16(&mut buffer[4..6], self.buffer_len() as u16);
        NetworkEndian::write_u32(&mut buffer[12..16], self.flow_count);
        NetworkEndian::write_u64(&mut buffer[16..24], self.packet_in_count);
        NetworkEndian::write_u64(&mut buffer[24..32], self.byte_in_count);
        NetworkEndian::write_u32(&mut buffer[32..36], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[36..40], self.duration_nsec);
        walk::emit_all(&self.band_stats, &mut buffer[40..])?;
        Ok(())
    }
}

/// `ofp_meter_config`: a meter's configuration, as reported by the switch.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MeterConfig {
    pub flags: u16,
    pub meter_id: u32,
    pub bands: Vec<MeterBand>,
}

impl Repr for MeterConfig {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 8 {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[0..2]) as usize;
        if length < 8 || buffer.len() < length {
            return Err(Error::Truncated);
        }
        Ok(MeterConfig {
            flags: NetworkEndian::read_u16(&buffer[2..4]),
            meter_id: NetworkEndian::read_u32(&buffer[4..8]),
            bands: walk::walk(&buffer[8..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        8 + walk::total_len(&self.bands)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        NetworkEndian::write_u16(&mut buffer[0..2], self.buffer_len() as u16);
        NetworkEndian::write_u16(&mut buffer[2..4], self.flags);
        NetworkEndian::write_u32(&mut buffer[4..8], self.meter_id);
        walk::emit_all(&self.bands, &mut buffer[8..])?;
        Ok(())
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

    #[test]
    fn aggregate_stats_round_trip() {
        let repr = AggregateStats {
            packet_count: 1,
            byte_count: 2,
            flow_count: 3,
        };
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(AggregateStats::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn bucket_counter_round_trip() {
        let repr = BucketCounter {
            packet_count: 10,
            byte_count: 20,
        };
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(BucketCounter::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn meter_config_round_trip() {
        let repr = MeterConfig {
            flags: 1,
            meter_id: 7,
            bands: vec![MeterBand::Drop {
                rate: 100,
                burst_size: 10,
            }],
        };
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(MeterConfig::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn group_desc_round_trip() {
        use crate::port::PortNumber;

        let action = super::super::action::Action::Output {
            port: PortNumber::Regular(1),
            max_length: 0xffff,
        };
        let repr = GroupDesc::<OxmExperimenter> {
            kind: GroupKind::All,
            group_id: 1,
            buckets: vec![Bucket {
                weight: 0,
                watch_port: 0xffff_ffff,
                watch_group: 0xffff_ffff,
                actions: vec![action],
            }],
        };
        let mut bytes = vec![0u8; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(GroupDesc::<OxmExperimenter>::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn flow_stats_length_shorter_than_header_is_truncated_not_a_panic() {
        let mut bytes = vec![0u8; 48];
        NetworkEndian::write_u16(&mut bytes[0..2], 2);
        assert_eq!(
            FlowStats::<OxmExperimenter>::parse(&bytes),
            Err(Error::Truncated)
        );
    }

    #[test]
    fn group_stats_length_shorter_than_header_is_truncated_not_a_panic() {
        let mut bytes = vec![0u8; 40];
        NetworkEndian::write_u16(&mut bytes[0..2], 2);
        assert_eq!(GroupStats::parse(&bytes), Err(Error::Truncated));
    }

    #[test]
    fn group_desc_length_shorter_than_header_is_truncated_not_a_panic() {
        let mut bytes = vec![0u8; 8];
        NetworkEndian::write_u16(&mut bytes[0..2], 2);
        assert_eq!(
            GroupDesc::<OxmExperimenter>::parse(&bytes),
            Err(Error::Truncated)
        );
    }

    #[test]
    fn meter_stats_length_shorter_than_header_is_truncated_not_a_panic() {
        let mut bytes = vec![0u8; 40];
        NetworkEndian::write_u16(&mut bytes[4..6], 2);
        assert_eq!(MeterStats::parse(&bytes), Err(Error::Truncated));
    }

    #[test]
    fn meter_config_length_shorter_than_header_is_truncated_not_a_panic() {
        let mut bytes = vec![0u8; 8];
        NetworkEndian::write_u16(&mut bytes[0..2], 2);
        assert_eq!(MeterConfig::parse(&bytes), Err(Error::Truncated));
    }
}
