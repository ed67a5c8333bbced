//! # RTP packet
//!
//! This crate decodes RTP packets in place and edits them without copying
//! them out of their buffer. The header is parsed with nom; setters write
//! straight through to the bytes and move the variable length regions
//! (CSRC list, extension, payload, padding) when one of them is resized.
//!
//! A [`Packet`] works over any [`Storage`]: a fixed `[u8; N]`, a growable
//! `Vec<u8>` or `bytes::BytesMut`, or a borrowed `&mut [u8]`. Fixed and
//! borrowed storage refuse to grow with [`RtpError::BufferTooSmall`].
//!
//! ```
//! use rtp_packet::{ExtensionHeader, Packet};
//!
//! let mut packet: Packet<Vec<u8>> = Packet::new();
//! packet.set_payload_type(8);
//! packet.set_sequence_number(1);
//! packet.set_extension(Some(ExtensionHeader::new(0xBEDE, 1))).unwrap();
//! packet.set_payload(&[0xD5; 160]).unwrap();
//!
//! let bytes = packet.packet().to_vec();
//! let parsed = Packet::parse(bytes).unwrap();
//! assert_eq!(parsed.extension_id(), 0xBEDE);
//! assert_eq!(parsed.payload_size(), 160);
//! ```
//!
//! See also:
//! - [RFC 3550](https://tools.ietf.org/html/rfc3550): RTP: A Transport Protocol for Real-Time Applications
//! - [RFC 3551](https://tools.ietf.org/html/rfc3551): RTP Profile for Audio and Video Conferences

mod error;
pub use error::*;

pub mod layout;
pub use layout::{
    CSRC_SIZE, EXTENSION_HEADER_SIZE, FIXED_HEADER_SIZE, MAX_CSRC_COUNT, RTP_VERSION,
};

mod storage;
pub use storage::*;

mod rtp;
pub use rtp::*;

mod rtp_header_extension;
pub use rtp_header_extension::*;

mod parser;

mod packet;
pub use packet::*;

mod view;
pub use view::*;

pub mod payload_type;
pub use payload_type::PayloadType;
