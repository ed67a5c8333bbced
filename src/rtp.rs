use crate::layout::{MAX_CSRC_COUNT, RTP_VERSION};

/// The fixed fields of an RTP header together with its CSRC list.
///
/// Padding and extension state are tracked by their owners
/// ([`Packet`](crate::Packet), [`PacketView`](crate::PacketView)) since
/// both carry sizes that live outside the fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpHeader {
    // version -- 2 bits, always 2 once validated
    pub version: u8,

    // marker flag -- 1 bit
    pub marker: bool,

    // payload type -- 7 bits
    pub payload_type: u8,

    // sequence number -- 2 bytes
    pub sequence_number: u16,

    // timestamp -- 4 bytes
    pub timestamp: u32,

    // synchronization source identifier
    pub ssrc: u32,

    // csrc count -- 4 bits
    pub csrc_count: u8,

    // contributing source identifiers, only the first `csrc_count` are meaningful
    pub csrc_list: [u32; MAX_CSRC_COUNT],
}

impl Default for RtpHeader {
    fn default() -> Self {
        RtpHeader {
            version: RTP_VERSION,
            marker: false,
            payload_type: 0,
            sequence_number: 0,
            timestamp: 0,
            ssrc: 0,
            csrc_count: 0,
            csrc_list: [0; MAX_CSRC_COUNT],
        }
    }
}

impl RtpHeader {
    /// The active contributing sources.
    pub fn csrc(&self) -> &[u32] {
        &self.csrc_list[..self.csrc_count as usize]
    }
}
