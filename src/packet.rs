use crate::error::{Rejected, Result, RtpError};
use crate::layout::{
    csrc_region_end, write_be_u16, write_be_u32, CSRC_COUNT, CSRC_SIZE, EXTENSION,
    EXTENSION_HEADER_SIZE, FIXED_HEADER_SIZE, MARKER, MAX_CSRC_COUNT, PADDING, PAYLOAD_TYPE,
    RTP_VERSION, SEQUENCE_NUMBER_OFFSET, SSRC_OFFSET, TIMESTAMP_OFFSET, VERSION,
};
use crate::parser::decode;
use crate::rtp::RtpHeader;
use crate::rtp_header_extension::ExtensionHeader;
use crate::storage::{Growable, Storage};
use tracing::{debug, trace};

/// An RTP packet decoded from, and written through to, a byte storage.
///
/// Every setter updates the cached fields and the underlying bytes together.
/// Setters that resize a region move the regions that follow it so the
/// storage always holds a well formed packet of [`Packet::packet_size`]
/// bytes. Only the version bits are left to [`Packet::packet`].
#[derive(Debug, Clone)]
pub struct Packet<S> {
    storage: S,
    packet_size: usize,
    header: RtpHeader,
    extension: Option<ExtensionHeader>,
    padding_bytes: u8,
    payload_offset: usize,
}

impl<S: Growable + Default> Packet<S> {
    /// An empty packet: a bare 12 byte header in freshly allocated storage.
    pub fn new() -> Self {
        let mut storage = S::default();
        storage.grow(FIXED_HEADER_SIZE);
        Packet::empty(storage)
    }
}

impl<S: Growable + Default> Default for Packet<S> {
    fn default() -> Self {
        Packet::new()
    }
}

impl<S: Storage> Packet<S> {
    /// Starts building a packet from scratch in `storage`.
    ///
    /// The first 12 bytes are overwritten with an empty header.
    pub fn with_storage(mut storage: S) -> Result<Self> {
        storage.try_grow(FIXED_HEADER_SIZE)?;
        Ok(Packet::empty(storage))
    }

    /// Decodes a packet that spans all of `storage`.
    pub fn parse(storage: S) -> Result<Self> {
        Ok(Packet::try_parse(storage)?)
    }

    /// Decodes a packet occupying the first `packet_size` bytes of `storage`.
    pub fn parse_with_len(storage: S, packet_size: usize) -> Result<Self> {
        Ok(Packet::try_parse_with_len(storage, packet_size)?)
    }

    /// Like [`Packet::parse`], but a failure gives the storage back.
    pub fn try_parse(storage: S) -> core::result::Result<Self, Rejected<S>> {
        let packet_size = storage.capacity();
        Packet::try_parse_with_len(storage, packet_size)
    }

    /// Like [`Packet::parse_with_len`], but a failure gives the storage back.
    pub fn try_parse_with_len(
        storage: S,
        packet_size: usize,
    ) -> core::result::Result<Self, Rejected<S>> {
        let decoded = match window(&storage, packet_size).and_then(decode) {
            Ok(decoded) => decoded,
            Err(err) => return Err(Rejected::new(err, storage)),
        };
        Ok(Packet {
            storage,
            packet_size,
            header: decoded.header,
            extension: decoded.extension,
            padding_bytes: decoded.padding_bytes,
            payload_offset: decoded.payload_offset,
        })
    }

    /// Re-decodes the storage in place, e.g. after new data was received
    /// into it. `None` uses the whole storage.
    ///
    /// On failure the packet is [reset](Packet::reset) to an empty header.
    pub fn reparse(&mut self, packet_size: Option<usize>) -> Result<()> {
        let packet_size = packet_size.unwrap_or_else(|| self.storage.capacity());
        let decoded = match window(&self.storage, packet_size).and_then(decode) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.reset();
                return Err(err);
            }
        };

        self.packet_size = packet_size;
        self.header = decoded.header;
        self.extension = decoded.extension;
        self.padding_bytes = decoded.padding_bytes;
        self.payload_offset = decoded.payload_offset;
        Ok(())
    }

    /// Turns the packet back into an empty 12 byte header.
    pub fn reset(&mut self) {
        let bytes = self.storage.as_bytes_mut();
        bytes[..FIXED_HEADER_SIZE].fill(0);
        VERSION.write(bytes, RTP_VERSION);

        self.packet_size = FIXED_HEADER_SIZE;
        self.header = RtpHeader::default();
        self.extension = None;
        self.padding_bytes = 0;
        self.payload_offset = FIXED_HEADER_SIZE;
    }

    fn empty(storage: S) -> Self {
        let mut packet = Packet {
            storage,
            packet_size: FIXED_HEADER_SIZE,
            header: RtpHeader::default(),
            extension: None,
            padding_bytes: 0,
            payload_offset: FIXED_HEADER_SIZE,
        };
        packet.reset();
        packet
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the whole storage, e.g. to receive into it.
    ///
    /// The cached fields are not updated; call [`Packet::reparse`] after
    /// writing.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// A copy of the fixed fields and CSRC list.
    pub fn header(&self) -> RtpHeader {
        self.header
    }

    pub fn version(&self) -> u8 {
        self.header.version
    }

    pub fn has_padding(&self) -> bool {
        self.padding_bytes > 0
    }

    pub fn is_extended(&self) -> bool {
        self.extension.is_some()
    }

    pub fn is_marked(&self) -> bool {
        self.header.marker
    }

    pub fn payload_type(&self) -> u8 {
        self.header.payload_type
    }

    pub fn sequence_number(&self) -> u16 {
        self.header.sequence_number
    }

    pub fn timestamp(&self) -> u32 {
        self.header.timestamp
    }

    pub fn ssrc(&self) -> u32 {
        self.header.ssrc
    }

    pub fn csrc_count(&self) -> u8 {
        self.header.csrc_count
    }

    /// The contributing sources currently in the packet.
    pub fn csrc(&self) -> &[u32] {
        self.header.csrc()
    }

    /// All 15 CSRC slots.
    ///
    /// Values staged here reach the bytes on the next [`Packet::set_csrc`]
    /// or [`Packet::write_csrc`].
    pub fn csrc_mut(&mut self) -> &mut [u32; MAX_CSRC_COUNT] {
        &mut self.header.csrc_list
    }

    pub fn extension(&self) -> Option<ExtensionHeader> {
        self.extension
    }

    /// Extension id, 0 when there is no extension.
    pub fn extension_id(&self) -> u16 {
        self.extension.map_or(0, |ext| ext.id)
    }

    /// Extension length in 32 bit words, 0 when there is no extension.
    pub fn extension_length(&self) -> u16 {
        self.extension.map_or(0, |ext| ext.length)
    }

    pub fn extension_data(&self) -> &[u8] {
        let range = self.extension_data_range();
        &self.storage.as_bytes()[range]
    }

    pub fn extension_data_mut(&mut self) -> &mut [u8] {
        let range = self.extension_data_range();
        &mut self.storage.as_bytes_mut()[range]
    }

    pub fn payload(&self) -> &[u8] {
        let start = self.payload_offset;
        &self.storage.as_bytes()[start..start + self.payload_size()]
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        let start = self.payload_offset;
        let end = start + self.payload_size();
        &mut self.storage.as_bytes_mut()[start..end]
    }

    pub fn padding_bytes(&self) -> u8 {
        self.padding_bytes
    }

    /// Total length of the packet, padding included.
    pub fn packet_size(&self) -> usize {
        self.packet_size
    }

    pub fn payload_size(&self) -> usize {
        self.packet_size - self.payload_offset - usize::from(self.padding_bytes)
    }

    pub fn payload_offset(&self) -> usize {
        self.payload_offset
    }

    /// Where the extension block starts, or would start if one were added.
    pub fn extension_offset(&self) -> usize {
        csrc_region_end(usize::from(self.header.csrc_count))
    }

    fn extension_data_range(&self) -> core::ops::Range<usize> {
        let start = self.extension_offset() + EXTENSION_HEADER_SIZE;
        match self.extension {
            Some(ext) => start..start + ext.data_len(),
            None => self.payload_offset..self.payload_offset,
        }
    }

    pub fn set_marker(&mut self, marker: bool) {
        self.header.marker = marker;
        MARKER.write_flag(self.storage.as_bytes_mut(), marker);
    }

    /// Sets the 7 bit payload type; the high bit of `payload_type` is dropped.
    pub fn set_payload_type(&mut self, payload_type: u8) {
        self.header.payload_type = payload_type & PAYLOAD_TYPE.mask;
        PAYLOAD_TYPE.write(self.storage.as_bytes_mut(), payload_type);
    }

    pub fn set_sequence_number(&mut self, sequence_number: u16) {
        self.header.sequence_number = sequence_number;
        write_be_u16(
            self.storage.as_bytes_mut(),
            SEQUENCE_NUMBER_OFFSET,
            sequence_number,
        );
    }

    pub fn set_timestamp(&mut self, timestamp: u32) {
        self.header.timestamp = timestamp;
        write_be_u32(self.storage.as_bytes_mut(), TIMESTAMP_OFFSET, timestamp);
    }

    pub fn set_ssrc(&mut self, ssrc: u32) {
        self.header.ssrc = ssrc;
        write_be_u32(self.storage.as_bytes_mut(), SSRC_OFFSET, ssrc);
    }

    /// Resizes the CSRC list to `count` entries and writes the staged
    /// identifiers from [`Packet::csrc_mut`].
    ///
    /// Extension, payload and padding move with the end of the list.
    pub fn set_csrc(&mut self, count: u8) -> Result<()> {
        if usize::from(count) > MAX_CSRC_COUNT {
            return Err(RtpError::InvalidCsrcCount(count));
        }

        let old_end = self.extension_offset();
        let new_end = csrc_region_end(usize::from(count));
        let tail = self.packet_size - old_end;
        let new_size = new_end + tail;
        self.reserve(new_size)?;

        self.shift_tail(old_end, new_end, tail);
        self.packet_size = new_size;
        self.payload_offset = self.payload_offset - old_end + new_end;
        self.header.csrc_count = count;
        CSRC_COUNT.write(self.storage.as_bytes_mut(), count);
        self.write_csrc();
        Ok(())
    }

    /// Replaces the CSRC list with `ids`.
    pub fn set_csrc_list(&mut self, ids: &[u32]) -> Result<()> {
        if ids.len() > MAX_CSRC_COUNT {
            let count = ids.len().min(usize::from(u8::MAX)) as u8;
            return Err(RtpError::InvalidCsrcCount(count));
        }

        let staged = self.header.csrc_list;
        self.header.csrc_list[..ids.len()].copy_from_slice(ids);
        // length checked above
        let result = self.set_csrc(ids.len() as u8);
        if result.is_err() {
            self.header.csrc_list = staged;
        }
        result
    }

    /// Writes the staged CSRC identifiers without resizing the list.
    pub fn write_csrc(&mut self) {
        let count = usize::from(self.header.csrc_count);
        let bytes = self.storage.as_bytes_mut();
        for (idx, id) in self.header.csrc_list[..count].iter().enumerate() {
            write_be_u32(bytes, FIXED_HEADER_SIZE + idx * CSRC_SIZE, *id);
        }
    }

    /// Sets the number of trailing padding bytes, 0 removing padding.
    ///
    /// New padding is zero filled with the count in its last byte. When
    /// padding is removed the stale count byte is zeroed.
    pub fn set_padding_bytes(&mut self, padding_bytes: u8) -> Result<()> {
        let old = usize::from(self.padding_bytes);
        let new = usize::from(padding_bytes);
        let body_end = self.packet_size - old;
        let new_size = body_end + new;
        self.reserve(new_size)?;

        let bytes = self.storage.as_bytes_mut();
        if new > 0 {
            bytes[body_end..new_size - 1].fill(0);
            bytes[new_size - 1] = padding_bytes;
        } else if old > 0 {
            bytes[self.packet_size - 1] = 0;
        }
        PADDING.write_flag(bytes, new > 0);

        self.packet_size = new_size;
        self.padding_bytes = padding_bytes;
        Ok(())
    }

    /// Adds, resizes or removes the extension block.
    ///
    /// Data of an existing extension is kept up to the new length; any
    /// additional data bytes are zeroed. Payload and padding move with the
    /// end of the block.
    pub fn set_extension(&mut self, extension: Option<ExtensionHeader>) -> Result<()> {
        let ext_offset = self.extension_offset();
        let tail = self.packet_size - self.payload_offset;
        let dst = ext_offset + extension.map_or(0, |ext| ext.size_bytes());
        let new_size = dst + tail;
        self.reserve(new_size)?;

        let old_data_len = self.extension.map_or(0, |ext| ext.data_len());
        self.shift_tail(self.payload_offset, dst, tail);

        let bytes = self.storage.as_bytes_mut();
        if let Some(ext) = extension {
            write_be_u16(bytes, ext_offset, ext.id);
            write_be_u16(bytes, ext_offset + 2, ext.length);
            let kept = old_data_len.min(ext.data_len());
            bytes[ext_offset + EXTENSION_HEADER_SIZE + kept..dst].fill(0);
        }
        EXTENSION.write_flag(bytes, extension.is_some());

        self.extension = extension;
        self.payload_offset = dst;
        self.packet_size = new_size;
        Ok(())
    }

    /// Resizes the payload to `payload_size` bytes, moving the padding
    /// behind it. Newly exposed payload bytes are zeroed.
    pub fn set_payload_size(&mut self, payload_size: usize) -> Result<()> {
        let old = self.payload_size();
        let padding = usize::from(self.padding_bytes);
        let end = payload_size
            .checked_add(self.payload_offset + padding)
            .ok_or_else(|| RtpError::too_small(usize::MAX, self.storage.capacity()))?;
        self.reserve(end)?;

        let start = self.payload_offset;
        self.shift_tail(start + old, start + payload_size, padding);

        let bytes = self.storage.as_bytes_mut();
        if payload_size > old {
            bytes[start + old..start + payload_size].fill(0);
        }
        if padding > 0 {
            bytes[end - 1] = self.padding_bytes;
        }

        self.packet_size = end;
        Ok(())
    }

    /// Resizes the payload to fit `payload` and copies it in.
    pub fn set_payload(&mut self, payload: &[u8]) -> Result<()> {
        self.set_payload_size(payload.len())?;
        self.payload_mut().copy_from_slice(payload);
        Ok(())
    }

    /// The serialized packet.
    ///
    /// Patches the version bits before handing out the bytes. The returned
    /// slice must not be held across a setter: growable storage may
    /// reallocate.
    pub fn packet(&mut self) -> &[u8] {
        let bytes = self.storage.as_bytes_mut();
        VERSION.write(bytes, RTP_VERSION);
        &bytes[..self.packet_size]
    }

    /// Ensures the storage can hold `needed` bytes before any byte moves.
    fn reserve(&mut self, needed: usize) -> Result<()> {
        self.storage.try_grow(needed).map_err(|err| {
            debug!(
                needed,
                packet_size = self.packet_size,
                "storage cannot hold resized packet"
            );
            err
        })
    }

    /// Moves the `len` bytes at `from` to `to`. Ranges may overlap.
    fn shift_tail(&mut self, from: usize, to: usize, len: usize) {
        if from == to || len == 0 {
            return;
        }
        trace!(from, to, len, "shifting packet tail");
        self.storage
            .as_bytes_mut()
            .copy_within(from..from + len, to);
    }
}

fn window<S: Storage>(storage: &S, packet_size: usize) -> Result<&[u8]> {
    storage
        .as_bytes()
        .get(..packet_size)
        .ok_or_else(|| RtpError::too_small(packet_size, storage.capacity()))
}
