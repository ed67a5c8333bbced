//! Static payload type assignments from RFC 3551 §6.
//!
//! Parsing never consults this table; it is for callers that want to name
//! or sanity check the 7 bit payload type of a packet.

use core::fmt;

pub const MIN_DYNAMIC_PT: u8 = 96;
pub const MAX_DYNAMIC_PT: u8 = 127;

/// Audio encodings with a static payload type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCodec {
    Pcmu = 0,
    Gsm = 3,
    G723 = 4,
    Dvi4_8000 = 5,
    Dvi4_16000 = 6,
    Lpc = 7,
    Pcma = 8,
    G722 = 9,
    L16Stereo = 10,
    L16Mono = 11,
    Qcelp = 12,
    Cn = 13,
    Mpa = 14,
    G728 = 15,
    Dvi4_11025 = 16,
    Dvi4_22050 = 17,
    G729 = 18,
}

impl AudioCodec {
    pub fn clock_rate(self) -> u32 {
        match self {
            AudioCodec::Dvi4_16000 => 16_000,
            AudioCodec::L16Stereo | AudioCodec::L16Mono => 44_100,
            AudioCodec::Mpa => 90_000,
            AudioCodec::Dvi4_11025 => 11_025,
            AudioCodec::Dvi4_22050 => 22_050,
            _ => 8_000,
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            AudioCodec::L16Stereo => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioCodec::Pcmu => "PCMU",
            AudioCodec::Gsm => "GSM",
            AudioCodec::G723 => "G723",
            AudioCodec::Dvi4_8000
            | AudioCodec::Dvi4_16000
            | AudioCodec::Dvi4_11025
            | AudioCodec::Dvi4_22050 => "DVI4",
            AudioCodec::Lpc => "LPC",
            AudioCodec::Pcma => "PCMA",
            AudioCodec::G722 => "G722",
            AudioCodec::L16Stereo | AudioCodec::L16Mono => "L16",
            AudioCodec::Qcelp => "QCELP",
            AudioCodec::Cn => "CN",
            AudioCodec::Mpa => "MPA",
            AudioCodec::G728 => "G728",
            AudioCodec::G729 => "G729",
        };
        write!(f, "{}/{}", name, self.clock_rate())?;
        if self.channels() > 1 {
            write!(f, "/{}", self.channels())?;
        }
        Ok(())
    }
}

/// Video encodings with a static payload type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoCodec {
    CelB = 25,
    Jpeg = 26,
    Nv = 28,
    H261 = 31,
    Mpv = 32,
    H263 = 34,
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VideoCodec::CelB => "CelB",
            VideoCodec::Jpeg => "JPEG",
            VideoCodec::Nv => "nv",
            VideoCodec::H261 => "H261",
            VideoCodec::Mpv => "MPV",
            VideoCodec::H263 => "H263",
        };
        write!(f, "{}/90000", name)
    }
}

/// What RFC 3551 says about a payload type value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadType {
    Audio(AudioCodec),
    Video(VideoCodec),
    /// MPEG-2 transport stream (33), carrying audio and video.
    Mp2t,
    /// 96..=127, bound by session signalling.
    Dynamic(u8),
    /// 1, 2, 19 and 72..=76.
    Reserved(u8),
    Unassigned(u8),
}

impl PayloadType {
    /// Classifies the low 7 bits of `pt`.
    pub fn classify(pt: u8) -> Self {
        use AudioCodec::*;
        use VideoCodec::*;

        let pt = pt & 0x7F;
        match pt {
            0 => PayloadType::Audio(Pcmu),
            3 => PayloadType::Audio(Gsm),
            4 => PayloadType::Audio(G723),
            5 => PayloadType::Audio(Dvi4_8000),
            6 => PayloadType::Audio(Dvi4_16000),
            7 => PayloadType::Audio(Lpc),
            8 => PayloadType::Audio(Pcma),
            9 => PayloadType::Audio(G722),
            10 => PayloadType::Audio(L16Stereo),
            11 => PayloadType::Audio(L16Mono),
            12 => PayloadType::Audio(Qcelp),
            13 => PayloadType::Audio(Cn),
            14 => PayloadType::Audio(Mpa),
            15 => PayloadType::Audio(G728),
            16 => PayloadType::Audio(Dvi4_11025),
            17 => PayloadType::Audio(Dvi4_22050),
            18 => PayloadType::Audio(G729),
            25 => PayloadType::Video(CelB),
            26 => PayloadType::Video(Jpeg),
            28 => PayloadType::Video(Nv),
            31 => PayloadType::Video(H261),
            32 => PayloadType::Video(Mpv),
            33 => PayloadType::Mp2t,
            34 => PayloadType::Video(H263),
            1 | 2 | 19 | 72..=76 => PayloadType::Reserved(pt),
            MIN_DYNAMIC_PT..=MAX_DYNAMIC_PT => PayloadType::Dynamic(pt),
            _ => PayloadType::Unassigned(pt),
        }
    }
}

/// Whether `pt` is assigned or dynamic, i.e. neither reserved nor unassigned.
pub fn is_valid_pt(pt: u8) -> bool {
    !matches!(
        PayloadType::classify(pt),
        PayloadType::Reserved(_) | PayloadType::Unassigned(_)
    )
}

pub fn is_audio_pt(pt: u8) -> bool {
    matches!(PayloadType::classify(pt), PayloadType::Audio(_))
}

/// Static video types only; MP2T (33) is not counted.
pub fn is_video_pt(pt: u8) -> bool {
    matches!(PayloadType::classify(pt), PayloadType::Video(_))
}

pub fn is_dynamic_pt(pt: u8) -> bool {
    (MIN_DYNAMIC_PT..=MAX_DYNAMIC_PT).contains(&(pt & 0x7F))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_static_types() {
        assert_eq!(PayloadType::classify(8), PayloadType::Audio(AudioCodec::Pcma));
        assert_eq!(PayloadType::classify(34), PayloadType::Video(VideoCodec::H263));
        assert_eq!(PayloadType::classify(33), PayloadType::Mp2t);
    }

    #[test]
    fn classify_ranges() {
        assert_eq!(PayloadType::classify(2), PayloadType::Reserved(2));
        assert_eq!(PayloadType::classify(74), PayloadType::Reserved(74));
        assert_eq!(PayloadType::classify(50), PayloadType::Unassigned(50));
        assert_eq!(PayloadType::classify(96), PayloadType::Dynamic(96));
        assert_eq!(PayloadType::classify(127), PayloadType::Dynamic(127));
    }

    #[test]
    fn predicates() {
        assert!(is_valid_pt(0));
        assert!(is_valid_pt(111));
        assert!(!is_valid_pt(20));
        assert!(is_audio_pt(18));
        assert!(!is_audio_pt(26));
        assert!(is_video_pt(26));
        assert!(!is_video_pt(33));
        assert!(is_dynamic_pt(100));
        assert!(!is_dynamic_pt(95));
    }

    #[test]
    fn display_names() {
        assert_eq!(AudioCodec::Pcmu.to_string(), "PCMU/8000");
        assert_eq!(AudioCodec::L16Stereo.to_string(), "L16/44100/2");
        assert_eq!(VideoCodec::Jpeg.to_string(), "JPEG/90000");
    }
}
