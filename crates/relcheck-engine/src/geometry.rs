//! GeoPackage binary geometry header and WKB prefix checks
//!
//! Layout (GeoPackage 1.2, section 2.1.3):
//!
//! ```text
//! magic "GP" | version | flags | srs_id (i32) | envelope (0/32/48/64 bytes) | WKB
//! ```
//!
//! Flags: bit 0 header byte order, bits 1-3 envelope contents indicator,
//! bit 4 empty geometry, bit 5 extended (non-WKB) body, bits 6-7 reserved.

const MAGIC: [u8; 2] = [0x47, 0x50];
const FIXED_HEADER_LEN: usize = 8;
const WKB_PREFIX_LEN: usize = 5;

/// Envelope carried in the geometry header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    None,
    Xy,
    Xyz,
    Xym,
    Xyzm,
}

impl Envelope {
    fn from_indicator(indicator: u8) -> Option<Self> {
        match indicator {
            0 => Some(Self::None),
            1 => Some(Self::Xy),
            2 => Some(Self::Xyz),
            3 => Some(Self::Xym),
            4 => Some(Self::Xyzm),
            _ => None,
        }
    }

    /// Size of the envelope in bytes
    pub fn byte_len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Xy => 32,
            Self::Xyz | Self::Xym => 48,
            Self::Xyzm => 64,
        }
    }
}

/// Decoded geometry header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryHeader {
    pub srs_id: i32,
    pub envelope: Envelope,
    pub empty: bool,
    pub extended: bool,
    /// ISO WKB geometry type code, when the body is standard WKB
    pub wkb_type: Option<u32>,
}

/// Why a geometry value is malformed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryDefect {
    #[error("Geometry blob is too short ({0} bytes)")]
    TooShort(usize),

    #[error("First two bytes of WKB are wrong")]
    BadMagic,

    #[error("Unsupported GeoPackage binary version {0}")]
    UnsupportedVersion(u8),

    #[error("Reserved flag bits are set (flags 0x{0:02x})")]
    ReservedFlags(u8),

    #[error("Invalid envelope contents indicator {0}")]
    InvalidEnvelopeIndicator(u8),

    #[error("Envelope is truncated (need {needed} bytes, blob has {actual})")]
    TruncatedEnvelope { needed: usize, actual: usize },

    #[error("WKB body is truncated")]
    TruncatedWkb,

    #[error("Invalid WKB byte order {0}")]
    InvalidWkbByteOrder(u8),

    #[error("Invalid WKB geometry type {0}")]
    InvalidWkbType(u32),
}

/// Validate a GeoPackage binary geometry and decode its header
///
/// Empty geometries and extended (non-WKB) bodies are accepted once the
/// header checks pass; their body is not inspected.
pub fn check_geometry(blob: &[u8]) -> Result<GeometryHeader, GeometryDefect> {
    if blob.len() < FIXED_HEADER_LEN {
        return Err(GeometryDefect::TooShort(blob.len()));
    }

    if blob[0..2] != MAGIC {
        return Err(GeometryDefect::BadMagic);
    }

    let version = blob[2];
    if version != 0 {
        return Err(GeometryDefect::UnsupportedVersion(version));
    }

    let flags = blob[3];
    if flags & 0b1100_0000 != 0 {
        return Err(GeometryDefect::ReservedFlags(flags));
    }

    let little_endian = flags & 0b0000_0001 != 0;
    let indicator = (flags >> 1) & 0b0000_0111;
    let envelope = Envelope::from_indicator(indicator)
        .ok_or(GeometryDefect::InvalidEnvelopeIndicator(indicator))?;
    let empty = flags & 0b0001_0000 != 0;
    let extended = flags & 0b0010_0000 != 0;

    let srs_bytes = [blob[4], blob[5], blob[6], blob[7]];
    let srs_id = if little_endian {
        i32::from_le_bytes(srs_bytes)
    } else {
        i32::from_be_bytes(srs_bytes)
    };

    let header_len = FIXED_HEADER_LEN + envelope.byte_len();
    if blob.len() < header_len {
        return Err(GeometryDefect::TruncatedEnvelope {
            needed: header_len,
            actual: blob.len(),
        });
    }

    let mut header = GeometryHeader {
        srs_id,
        envelope,
        empty,
        extended,
        wkb_type: None,
    };

    if empty || extended {
        return Ok(header);
    }

    header.wkb_type = Some(check_wkb_prefix(&blob[header_len..])?);
    Ok(header)
}

/// Check the byte order and geometry type of a WKB body
fn check_wkb_prefix(wkb: &[u8]) -> Result<u32, GeometryDefect> {
    if wkb.len() < WKB_PREFIX_LEN {
        return Err(GeometryDefect::TruncatedWkb);
    }

    let type_bytes = [wkb[1], wkb[2], wkb[3], wkb[4]];
    let code = match wkb[0] {
        0 => u32::from_be_bytes(type_bytes),
        1 => u32::from_le_bytes(type_bytes),
        other => return Err(GeometryDefect::InvalidWkbByteOrder(other)),
    };

    // ISO codes: base type 1..=17, plus 1000/2000/3000 for Z, M, ZM
    let base = code % 1000;
    let dimensions = code / 1000;
    if !(1..=17).contains(&base) || dimensions > 3 {
        return Err(GeometryDefect::InvalidWkbType(code));
    }

    Ok(code)
}
