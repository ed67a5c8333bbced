//! Wire layout of the RTP header (RFC 3550 §5.1).
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |V=2|P|X|  CC   |M|     PT      |       sequence number         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           synchronization source (SSRC) identifier            |
//! +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
//! |            contributing source (CSRC) identifiers             |
//! |                             ....                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Regions always follow each other in this order: fixed header, CSRC list,
//! extension block, payload, padding.

/// Size of the fixed part of the header.
pub const FIXED_HEADER_SIZE: usize = 12;

/// Upper bound of the 4-bit CC field.
pub const MAX_CSRC_COUNT: usize = 15;

pub const CSRC_SIZE: usize = 4;

/// Size of the extension id and length fields preceding the extension data.
pub const EXTENSION_HEADER_SIZE: usize = 4;

pub const RTP_VERSION: u8 = 2;

/// A run of bits inside one header byte.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BitField {
    pub offset: usize,
    pub mask: u8,
    pub shift: u8,
}

impl BitField {
    const fn new(offset: usize, mask: u8, shift: u8) -> Self {
        BitField {
            offset,
            mask,
            shift,
        }
    }

    pub fn write(&self, bytes: &mut [u8], value: u8) {
        let byte = &mut bytes[self.offset];
        *byte = (*byte & !self.mask) | ((value << self.shift) & self.mask);
    }

    pub fn write_flag(&self, bytes: &mut [u8], flag: bool) {
        self.write(bytes, flag as u8);
    }
}

pub(crate) const VERSION: BitField = BitField::new(0, 0b1100_0000, 6);
pub(crate) const PADDING: BitField = BitField::new(0, 0b0010_0000, 5);
pub(crate) const EXTENSION: BitField = BitField::new(0, 0b0001_0000, 4);
pub(crate) const CSRC_COUNT: BitField = BitField::new(0, 0b0000_1111, 0);
pub(crate) const MARKER: BitField = BitField::new(1, 0b1000_0000, 7);
pub(crate) const PAYLOAD_TYPE: BitField = BitField::new(1, 0b0111_1111, 0);

pub(crate) const SEQUENCE_NUMBER_OFFSET: usize = 2;
pub(crate) const TIMESTAMP_OFFSET: usize = 4;
pub(crate) const SSRC_OFFSET: usize = 8;

/// Byte length of a CSRC list holding `count` identifiers.
pub const fn csrc_region_len(count: usize) -> usize {
    count * CSRC_SIZE
}

/// Offset at which the CSRC list ends and the extension (or payload) begins.
pub const fn csrc_region_end(count: usize) -> usize {
    FIXED_HEADER_SIZE + csrc_region_len(count)
}

pub(crate) fn write_be_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

pub(crate) fn write_be_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitfields_compose_first_octet() {
        let mut bytes = [0u8];
        VERSION.write(&mut bytes, RTP_VERSION);
        PADDING.write_flag(&mut bytes, true);
        CSRC_COUNT.write(&mut bytes, 5);
        assert_eq!(bytes[0], 0xA5);

        VERSION.write(&mut bytes, 2);
        assert_eq!(bytes[0], 0xA5);
    }

    #[test]
    fn bitfield_write_leaves_neighbours() {
        let mut bytes = [0x00u8, 0xFF];
        MARKER.write_flag(&mut bytes, false);
        assert_eq!(bytes[1], 0x7F);

        PAYLOAD_TYPE.write(&mut bytes, 8);
        assert_eq!(bytes[1], 0x08);

        EXTENSION.write_flag(&mut bytes, true);
        CSRC_COUNT.write(&mut bytes, 0x0F);
        assert_eq!(bytes[0], 0x1F);
    }

    #[test]
    fn region_offsets() {
        assert_eq!(csrc_region_end(0), 12);
        assert_eq!(csrc_region_end(15), 72);
    }

    #[test]
    fn big_endian_writes() {
        let mut bytes = [0u8; 6];
        write_be_u16(&mut bytes, 0, 0xBEDE);
        write_be_u32(&mut bytes, 2, 0x1234_5678);
        assert_eq!(bytes, [0xBE, 0xDE, 0x12, 0x34, 0x56, 0x78]);
    }
}
