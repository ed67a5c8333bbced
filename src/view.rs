use crate::error::Result;
use crate::layout::{csrc_region_end, EXTENSION_HEADER_SIZE};
use crate::parser::decode;
use crate::rtp::RtpHeader;
use crate::rtp_header_extension::ExtensionHeader;

/// A read-only RTP packet borrowing its bytes.
///
/// Validated exactly like [`Packet::parse`](crate::Packet::parse), for
/// buffers that cannot be handed out mutably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketView<'a> {
    pub header: RtpHeader,
    pub extension: Option<ExtensionHeader>,
    data: &'a [u8],
    payload_offset: usize,
    padding_bytes: u8,
}

impl<'a> PacketView<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let decoded = decode(data)?;
        Ok(PacketView {
            header: decoded.header,
            extension: decoded.extension,
            data,
            payload_offset: decoded.payload_offset,
            padding_bytes: decoded.padding_bytes,
        })
    }

    pub fn csrc(&self) -> &[u32] {
        self.header.csrc()
    }

    pub fn extension_data(&self) -> &'a [u8] {
        match self.extension {
            Some(ext) => {
                let start =
                    csrc_region_end(usize::from(self.header.csrc_count)) + EXTENSION_HEADER_SIZE;
                &self.data[start..start + ext.data_len()]
            }
            None => &[],
        }
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.data[self.payload_offset..self.data.len() - usize::from(self.padding_bytes)]
    }

    /// The padding bytes, count byte included.
    pub fn padding(&self) -> &'a [u8] {
        &self.data[self.data.len() - usize::from(self.padding_bytes)..]
    }

    pub fn padding_bytes(&self) -> u8 {
        self.padding_bytes
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}
