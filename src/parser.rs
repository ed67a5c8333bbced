use crate::error::{HeaderDefect, Result, RtpError};
use crate::layout::{csrc_region_end, FIXED_HEADER_SIZE, MAX_CSRC_COUNT, RTP_VERSION};
use crate::rtp::RtpHeader;
use crate::rtp_header_extension::ExtensionHeader;

extern crate nom;
use nom::bits::bits;
use nom::bits::complete::take;
use nom::number::complete::{be_u16, be_u32};
use nom::{sequence::tuple, IResult};
use tracing::debug;

/// The first twelve bytes of a packet, bit fields split out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FixedHeader {
    version: u8,
    padding: bool,
    extension: bool,
    csrc_count: u8,
    marker: bool,
    payload_type: u8,
    sequence_number: u16,
    timestamp: u32,
    ssrc: u32,
}

/// A validated packet: its fields and where the payload starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decoded {
    pub header: RtpHeader,
    pub extension: Option<ExtensionHeader>,
    pub padding_bytes: u8,
    pub payload_offset: usize,
}

/// Validates `packet` and decodes every header field.
///
/// `packet` must be exactly the packet window: its last byte is where the
/// padding count is read from.
pub(crate) fn decode(packet: &[u8]) -> Result<Decoded> {
    decode_packet(packet).map_err(|err| {
        debug!(packet_size = packet.len(), error = %err, "rejecting rtp packet");
        err
    })
}

fn decode_packet(packet: &[u8]) -> Result<Decoded> {
    let packet_size = packet.len();
    if packet_size < FIXED_HEADER_SIZE {
        return Err(RtpError::too_small(FIXED_HEADER_SIZE, packet_size));
    }

    let (_, fixed) = parse_fixed_header(packet)
        .map_err(|_| RtpError::too_small(FIXED_HEADER_SIZE, packet_size))?;

    if fixed.version != RTP_VERSION {
        return Err(RtpError::InvalidRtpHeader(HeaderDefect::Version(fixed.version)));
    }

    let mut padding_bytes = 0;
    if fixed.padding {
        padding_bytes = packet[packet_size - 1];
        if padding_bytes == 0 {
            return Err(RtpError::InvalidRtpHeader(HeaderDefect::ZeroPadding));
        }

        let needed = usize::from(padding_bytes) + FIXED_HEADER_SIZE;
        if needed > packet_size {
            return Err(RtpError::overflow(needed, packet_size));
        }
    }

    let csrc_end = csrc_region_end(usize::from(fixed.csrc_count));
    if csrc_end > packet_size {
        return Err(RtpError::overflow(csrc_end, packet_size));
    }

    let csrc_region = &packet[FIXED_HEADER_SIZE..csrc_end];
    let (_, csrc_list) = parse_csrc(csrc_region, usize::from(fixed.csrc_count))
        .map_err(|_| RtpError::overflow(csrc_end, packet_size))?;

    let header = RtpHeader {
        version: fixed.version,
        marker: fixed.marker,
        payload_type: fixed.payload_type,
        sequence_number: fixed.sequence_number,
        timestamp: fixed.timestamp,
        ssrc: fixed.ssrc,
        csrc_count: fixed.csrc_count,
        csrc_list,
    };

    let mut payload_offset = csrc_end;
    let mut extension = None;
    if fixed.extension {
        let (ext, data_offset) = decode_extension(packet, csrc_end)?;
        payload_offset = data_offset + ext.data_len();
        if payload_offset > packet_size {
            return Err(RtpError::ParseExtensionOverflow {
                needed: payload_offset,
                packet_size,
            });
        }
        extension = Some(ext);
    }

    // padding must fit after everything that precedes the payload
    let needed = payload_offset + usize::from(padding_bytes);
    if needed > packet_size {
        return Err(RtpError::overflow(needed, packet_size));
    }

    Ok(Decoded {
        header,
        extension,
        padding_bytes,
        payload_offset,
    })
}

/// Reads the extension id and length at `offset`, returning the header and
/// the offset of its data.
fn decode_extension(packet: &[u8], offset: usize) -> Result<(ExtensionHeader, usize)> {
    let packet_size = packet.len();
    let overflow = RtpError::ParseExtensionOverflow {
        needed: offset + 4,
        packet_size,
    };
    let input = packet.get(offset..).ok_or_else(|| overflow.clone())?;
    let (_, ext) = parse_extension_header(input).map_err(|_| overflow)?;
    Ok((ext, offset + 4))
}

fn parse_fixed_header(input: &[u8]) -> IResult<&[u8], FixedHeader> {
    let (
        input,
        (
            (version, padding, extension, csrc_count),
            (marker, payload_type),
            sequence_number,
            timestamp,
            ssrc,
        ),
    ) = tuple((parse_vpxcc, parse_mpt, be_u16, be_u32, be_u32))(input)?;

    Ok((
        input,
        FixedHeader {
            version,
            padding: padding != 0,
            extension: extension != 0,
            csrc_count,
            marker: marker != 0,
            payload_type,
            sequence_number,
            timestamp,
            ssrc,
        },
    ))
}

fn parse_vpxcc(input: &[u8]) -> IResult<&[u8], (u8, u8, u8, u8)> {
    let (input, (v, p, x, cc)) = bits(tuple((
        take::<_, _, _, (_, _)>(2usize),
        take::<_, _, _, (_, _)>(1usize),
        take::<_, _, _, (_, _)>(1usize),
        take::<_, _, _, (_, _)>(4usize),
    )))(input)?;

    Ok((input, (v, p, x, cc)))
}

fn parse_mpt(input: &[u8]) -> IResult<&[u8], (u8, u8)> {
    let (input, (m, pt)) = bits(tuple((
        take::<_, _, _, (_, _)>(1usize),
        take::<_, _, _, (_, _)>(7usize),
    )))(input)?;

    Ok((input, (m, pt)))
}

fn parse_csrc(input: &[u8], csrc_count: usize) -> IResult<&[u8], [u32; MAX_CSRC_COUNT]> {
    let mut csrc_list = [0u32; MAX_CSRC_COUNT];
    let mut input = input;
    for slot in csrc_list.iter_mut().take(csrc_count) {
        let (rest, id) = be_u32(input)?;
        *slot = id;
        input = rest;
    }
    Ok((input, csrc_list))
}

fn parse_extension_header(input: &[u8]) -> IResult<&[u8], ExtensionHeader> {
    let (input, (id, length)) = tuple((be_u16, be_u16))(input)?;
    Ok((input, ExtensionHeader { id, length }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    // helper function to take a byte and feed it into vpxcc parsing
    fn parse_vpxcc_helper(value: u8) -> (u8, u8, u8, u8) {
        let input: [u8; 1] = [value];
        let result = parse_vpxcc(&input);

        // parsing should work
        assert!(result.is_ok());

        // should have consumed all the data
        let data = result.ok().unwrap();
        assert_eq!(data.0.len(), 0);
        data.1
    }

    #[test]
    fn parse_vpxcc_all_one() {
        assert_eq!(parse_vpxcc_helper(0xFF), (0x03, 0x01, 0x01, 0x0F));
    }

    #[test]
    fn parse_vpxcc_all_zero() {
        assert_eq!(parse_vpxcc_helper(0x00), (0x00, 0x00, 0x00, 0x00));
    }

    #[test]
    fn parse_vpxcc_mixed() {
        assert_eq!(parse_vpxcc_helper(0xA5), (0x02, 0x01, 0x00, 0x05));
    }

    #[test]
    fn parse_vpxcc_missing_data() {
        let input: [u8; 0] = [];
        assert!(parse_vpxcc(&input).is_err());
    }

    #[test]
    fn parse_mpt_mixed() {
        let input = [0xA5u8];
        let (rest, (m, pt)) = parse_mpt(&input).unwrap();
        assert!(rest.is_empty());
        assert_eq!((m, pt), (0x01, 0x25));
    }

    #[test]
    fn parse_csrc_non_empty() {
        let input: [u8; 9] = [0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF, 0xA5];
        let (rest, list) = parse_csrc(&input, 2).unwrap();

        // should not have consumed all the data
        assert_eq!(rest.len(), 1);
        assert_eq!(&list[..2], &[0x12345678, 0x90ABCDEF]);
        assert!(list[2..].iter().all(|&id| id == 0));
    }

    #[test]
    fn parse_csrc_not_enough_data() {
        let input: [u8; 3] = [0x00, 0x00, 0x00];
        assert!(parse_csrc(&input, 1).is_err());
    }

    #[test]
    fn decode_no_csrc() {
        let data = [
            0x80, 0x11, 0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x09,
        ];
        let decoded = decode(&data).unwrap();

        assert_eq!(decoded.header.version, 2);
        assert!(!decoded.header.marker);
        assert_eq!(decoded.header.payload_type, 0x11);
        assert_eq!(decoded.header.sequence_number, 0x1234);
        assert_eq!(decoded.header.timestamp, 0x567890AB);
        assert_eq!(decoded.header.ssrc, 0xCDEFFEDC);
        assert!(decoded.header.csrc().is_empty());
        assert_eq!(decoded.extension, None);
        assert_eq!(decoded.padding_bytes, 0);
        assert_eq!(decoded.payload_offset, 12);
    }

    #[test]
    fn decode_one_csrc() {
        let data = [
            0x81, 0x11, 0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x09,
            0x87, 0x65, 0x43,
        ];
        let decoded = decode(&data).unwrap();

        assert_eq!(decoded.header.csrc(), &[0xBA098765]);
        assert_eq!(decoded.payload_offset, 16);
    }

    #[test]
    fn decode_short_buffer() {
        assert_eq!(
            decode(&[0x80; 11]),
            Err(RtpError::BufferTooSmall {
                needed: 12,
                capacity: 11
            })
        );
    }

    #[test]
    fn decode_truncated_extension_header() {
        // X=1 but the packet ends right after the fixed header + 2 bytes
        let mut data = [0u8; 14];
        data[0] = 0x90;
        assert_eq!(
            decode(&data),
            Err(RtpError::ParseExtensionOverflow {
                needed: 16,
                packet_size: 14
            })
        );
    }

    #[test]
    fn decode_padding_overlapping_extension() {
        // X=1, P=1, extension of one word fills bytes 12..20, padding claims 4
        let mut data = [0u8; 20];
        data[0] = 0xB0;
        data[15] = 1;
        data[19] = 4;
        assert_eq!(
            decode(&data),
            Err(RtpError::ParseBufferOverflow {
                needed: 24,
                packet_size: 20
            })
        );
    }

    #[traced_test]
    #[test]
    fn rejection_is_logged() {
        let mut data = [0u8; 12];
        data[0] = 0xC0;
        assert!(decode(&data).is_err());
        assert!(logs_contain("rejecting rtp packet"));
    }
}
