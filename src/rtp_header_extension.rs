use crate::layout::EXTENSION_HEADER_SIZE;

/// An RTP header extension, https://tools.ietf.org/html/rfc3550#section-5.3.1
///
/// Only the id and length live here; the data bytes stay in the packet buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExtensionHeader {
    // profile defined identifier -- 2 bytes
    pub id: u16,

    // length (in number of 32 bit words) -- 2 bytes
    pub length: u16,
}

impl ExtensionHeader {
    pub fn new(id: u16, length: u16) -> Self {
        ExtensionHeader { id, length }
    }

    /// Size of the extension data in bytes.
    pub fn data_len(&self) -> usize {
        usize::from(self.length) * 4
    }

    /// Size of the whole extension block, id and length included.
    pub fn size_bytes(&self) -> usize {
        EXTENSION_HEADER_SIZE + self.data_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_count_words() {
        let ext = ExtensionHeader::new(0xBEDE, 1);
        assert_eq!(ext.data_len(), 4);
        assert_eq!(ext.size_bytes(), 8);

        assert_eq!(ExtensionHeader::new(3, 0).size_bytes(), 4);
        assert_eq!(ExtensionHeader::new(3, u16::MAX).data_len(), 262_140);
    }
}
