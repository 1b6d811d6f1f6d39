//! PVR version 3 container.
//!
//! 52-byte little-endian header, then `metadata_size` bytes of metadata, then
//! the top mip level of the first surface.

use crate::codec::layout::PixelLayout;
use crate::codec::pvrtc::{PvrtcDecompressor, PvrtcMode};
use crate::decoder::unpack_payload;
use crate::error::{PvrError, Result};
use crate::types::{FormatTag, PvrTexture};
use byteorder::{ByteOrder, LE};
use tracing::{debug, warn};

pub const PVR3_MAGIC: u32 = 0x03525650;
pub const PVR3_HEADER_SIZE: usize = 52;

const PVRTC_2BPP_RGB: u8 = 0;
const PVRTC_2BPP_RGBA: u8 = 1;
const PVRTC_4BPP_RGB: u8 = 2;
const PVRTC_4BPP_RGBA: u8 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pvr3Header {
    pub version: u32,
    pub flags: u32,
    pub format: FormatTag,
    pub colorspace: u32,
    pub channel_type: u32,
    pub height: u32,
    pub width: u32,
    pub depth: u32,
    pub num_surfaces: u32,
    pub num_faces: u32,
    pub mip_count: u32,
    pub metadata_size: u32,
}

impl Pvr3Header {
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < PVR3_HEADER_SIZE {
            return Err(PvrError::InvalidFile(format!(
                "PVR3: {} bytes is smaller than the {}-byte header",
                data.len(),
                PVR3_HEADER_SIZE
            )));
        }

        let mut words = [0u32; PVR3_HEADER_SIZE / 4];
        LE::read_u32_into(&data[..PVR3_HEADER_SIZE], &mut words);
        let [
            version,
            flags,
            format_low,
            format_high,
            colorspace,
            channel_type,
            height,
            width,
            depth,
            num_surfaces,
            num_faces,
            mip_count,
            metadata_size,
        ] = words;

        Ok(Self {
            version,
            flags,
            format: FormatTag(u64::from(format_low) | (u64::from(format_high) << 32)),
            colorspace,
            channel_type,
            height,
            width,
            depth,
            num_surfaces,
            num_faces,
            mip_count,
            metadata_size,
        })
    }

    #[cfg(test)]
    pub(crate) fn to_bytes(&self) -> [u8; PVR3_HEADER_SIZE] {
        let (format_low, format_high) = self.format.split();
        let words = [
            self.version,
            self.flags,
            format_low,
            format_high,
            self.colorspace,
            self.channel_type,
            self.height,
            self.width,
            self.depth,
            self.num_surfaces,
            self.num_faces,
            self.mip_count,
            self.metadata_size,
        ];
        let mut out = [0u8; PVR3_HEADER_SIZE];
        LE::write_u32_into(&words, &mut out);
        out
    }
}

/// A supported PVR3 pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pvr3Format {
    pub tag: FormatTag,
    pub bpp: u32,
    pub layout: PixelLayout,
    pub label: &'static str,
}

const fn entry(tag: FormatTag, bpp: u32, layout: PixelLayout, label: &'static str) -> Pvr3Format {
    Pvr3Format {
        tag,
        bpp,
        layout,
        label,
    }
}

pub static FORMATS: [Pvr3Format; 10] = [
    entry(FormatTag::new(0, 0, 0, 8, 0, 0, 0, b'i'), 8, PixelLayout::I8, "I8"),
    entry(FormatTag::new(0, 0, 8, 8, 0, 0, b'i', b'a'), 16, PixelLayout::Ai8, "AI8"),
    entry(FormatTag::new(0, 5, 6, 5, 0, b'b', b'g', b'r'), 16, PixelLayout::Rgb565, "RGB565"),
    entry(FormatTag::new(4, 4, 4, 4, b'a', b'b', b'g', b'r'), 16, PixelLayout::Rgba4444, "RGBA4444"),
    entry(FormatTag::new(0, 8, 8, 8, 0, b'b', b'g', b'r'), 24, PixelLayout::Rgb888, "RGB888"),
    entry(FormatTag::new(8, 8, 8, 8, b'a', b'b', b'g', b'r'), 32, PixelLayout::Rgba8888, "RGBA8888"),
    entry(
        FormatTag::new(0, 0, 0, 0, 0, 0, 0, PVRTC_2BPP_RGB),
        2,
        PixelLayout::Pvrtc(PvrtcMode::TwoBit),
        "PVRTC2_RGB",
    ),
    entry(
        FormatTag::new(0, 0, 0, 0, 0, 0, 0, PVRTC_2BPP_RGBA),
        2,
        PixelLayout::Pvrtc(PvrtcMode::TwoBit),
        "PVRTC2_RGBA",
    ),
    entry(
        FormatTag::new(0, 0, 0, 0, 0, 0, 0, PVRTC_4BPP_RGB),
        4,
        PixelLayout::Pvrtc(PvrtcMode::FourBit),
        "PVRTC4_RGB",
    ),
    entry(
        FormatTag::new(0, 0, 0, 0, 0, 0, 0, PVRTC_4BPP_RGBA),
        4,
        PixelLayout::Pvrtc(PvrtcMode::FourBit),
        "PVRTC4_RGBA",
    ),
];

pub fn lookup(tag: FormatTag) -> Option<&'static Pvr3Format> {
    FORMATS.iter().find(|f| f.tag == tag)
}

pub fn decode<D: PvrtcDecompressor + ?Sized>(data: &[u8], decompressor: &D) -> Result<PvrTexture> {
    let header = Pvr3Header::read(data)?;
    if header.version != PVR3_MAGIC {
        return Err(PvrError::InvalidFile(format!(
            "PVR3: invalid header version {:#010x}",
            header.version
        )));
    }

    let format = lookup(header.format).ok_or_else(|| {
        warn!(tag = %header.format, "Unsupported PVR3 format");
        PvrError::UnknownFormat(header.format)
    })?;

    let surfaces = header.num_surfaces.max(header.num_faces);
    if surfaces > 1 {
        return Err(PvrError::MoreThanOneSurface(surfaces));
    }

    debug!(
        width = header.width,
        height = header.height,
        bpp = format.bpp,
        format = format.label,
        "PVR3 header"
    );

    let offset = PVR3_HEADER_SIZE as u64 + u64::from(header.metadata_size);
    if offset > data.len() as u64 {
        return Err(PvrError::InvalidFile(format!(
            "PVR3: metadata block of {} bytes runs past the end of the file",
            header.metadata_size
        )));
    }
    let payload = &data[offset as usize..];

    let pixels = unpack_payload(
        format.layout,
        payload,
        header.width,
        header.height,
        true,
        decompressor,
    )?;

    Ok(PvrTexture {
        width: header.width,
        height: header.height,
        bpp: format.bpp,
        mip_count: header.mip_count,
        format: format.label,
        should_flip: false,
        data: pixels,
    })
}
