//! Legacy PVR (version 2) container.
//!
//! A fixed 52-byte little-endian header followed by the pixel payload. The
//! pixel type lives in the low byte of `flags`.

use crate::codec::layout::PixelLayout;
use crate::codec::pvrtc::{PvrtcDecompressor, PvrtcMode};
use crate::decoder::unpack_payload;
use crate::error::{PvrError, Result};
use crate::types::PvrTexture;
use byteorder::{ByteOrder, LE};
use tracing::{debug, warn};

pub const PVR2_MAGIC: u32 = 0x21525650;
pub const PVR2_HEADER_SIZE: usize = 52;

pub const PVR_PIXEL_TYPE_MASK: u32 = 0xff;
pub const PVR_CUBEMAP_FLAG: u32 = 1 << 12;

pub const PVR_TYPE_RGBA4444: u32 = 0x10;
pub const PVR_TYPE_RGBA5551: u32 = 0x11;
pub const PVR_TYPE_RGBA8888: u32 = 0x12;
pub const PVR_TYPE_RGB565: u32 = 0x13;
pub const PVR_TYPE_RGB555: u32 = 0x14;
pub const PVR_TYPE_RGB888: u32 = 0x15;
pub const PVR_TYPE_I8: u32 = 0x16;
pub const PVR_TYPE_AI8: u32 = 0x17;
pub const PVR_TYPE_PVRTC2: u32 = 0x18;
pub const PVR_TYPE_PVRTC4: u32 = 0x19;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pvr2Header {
    pub size: u32,
    pub height: u32,
    pub width: u32,
    pub mip_count: u32,
    pub flags: u32,
    pub tex_data_size: u32,
    pub bpp: u32,
    pub r_mask: u32,
    pub g_mask: u32,
    pub b_mask: u32,
    pub a_mask: u32,
    pub magic: u32,
    pub num_tex: u32,
}

impl Pvr2Header {
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < PVR2_HEADER_SIZE {
            return Err(PvrError::InvalidFile(format!(
                "PVR2: {} bytes is smaller than the {}-byte header",
                data.len(),
                PVR2_HEADER_SIZE
            )));
        }

        let mut words = [0u32; PVR2_HEADER_SIZE / 4];
        LE::read_u32_into(&data[..PVR2_HEADER_SIZE], &mut words);
        let [
            size,
            height,
            width,
            mip_count,
            flags,
            tex_data_size,
            bpp,
            r_mask,
            g_mask,
            b_mask,
            a_mask,
            magic,
            num_tex,
        ] = words;

        Ok(Self {
            size,
            height,
            width,
            mip_count,
            flags,
            tex_data_size,
            bpp,
            r_mask,
            g_mask,
            b_mask,
            a_mask,
            magic,
            num_tex,
        })
    }

    /// Self-declared size and magic both match a PVR2 header.
    pub fn is_valid(&self) -> bool {
        self.size as usize == PVR2_HEADER_SIZE && self.magic == PVR2_MAGIC
    }

    pub fn pixel_type(&self) -> u32 {
        self.flags & PVR_PIXEL_TYPE_MASK
    }

    /// A zero surface count means one surface, or six for a cubemap.
    pub fn surface_count(&self) -> u32 {
        match self.num_tex {
            0 if self.flags & PVR_CUBEMAP_FLAG != 0 => 6,
            0 => 1,
            n => n,
        }
    }

    #[cfg(test)]
    pub(crate) fn to_bytes(&self) -> [u8; PVR2_HEADER_SIZE] {
        let words = [
            self.size,
            self.height,
            self.width,
            self.mip_count,
            self.flags,
            self.tex_data_size,
            self.bpp,
            self.r_mask,
            self.g_mask,
            self.b_mask,
            self.a_mask,
            self.magic,
            self.num_tex,
        ];
        let mut out = [0u8; PVR2_HEADER_SIZE];
        LE::write_u32_into(&words, &mut out);
        out
    }
}

pub fn pixel_layout(pixel_type: u32) -> Option<PixelLayout> {
    let layout = match pixel_type {
        PVR_TYPE_RGBA4444 => PixelLayout::Rgba4444,
        PVR_TYPE_RGBA5551 => PixelLayout::Rgba5551,
        PVR_TYPE_RGBA8888 => PixelLayout::Rgba8888,
        PVR_TYPE_RGB565 => PixelLayout::Rgb565,
        PVR_TYPE_RGB555 => PixelLayout::Rgb555,
        PVR_TYPE_RGB888 => PixelLayout::Rgb888,
        PVR_TYPE_I8 => PixelLayout::I8,
        PVR_TYPE_AI8 => PixelLayout::Ai8,
        PVR_TYPE_PVRTC2 => PixelLayout::Pvrtc(PvrtcMode::TwoBit),
        PVR_TYPE_PVRTC4 => PixelLayout::Pvrtc(PvrtcMode::FourBit),
        _ => return None,
    };
    Some(layout)
}

pub fn decode<D: PvrtcDecompressor + ?Sized>(data: &[u8], decompressor: &D) -> Result<PvrTexture> {
    let header = Pvr2Header::read(data)?;

    if header.size as usize != PVR2_HEADER_SIZE {
        return Err(PvrError::InvalidFile(format!(
            "PVR2: header size field is {}, expected {}",
            header.size, PVR2_HEADER_SIZE
        )));
    }
    if header.magic != PVR2_MAGIC {
        return Err(PvrError::InvalidFile(format!(
            "PVR2: invalid magic {:#010x}",
            header.magic
        )));
    }

    let surfaces = header.surface_count();
    if surfaces != 1 {
        return Err(PvrError::MoreThanOneSurface(surfaces));
    }

    let payload = &data[PVR2_HEADER_SIZE..];
    let declared = u64::from(header.width)
        .saturating_mul(u64::from(header.height))
        .saturating_mul(u64::from(header.bpp))
        / 8;
    if declared > payload.len() as u64 {
        return Err(PvrError::InvalidFile(format!(
            "PVR2: header declares {} bytes of pixels, only {} present",
            declared,
            payload.len()
        )));
    }

    let pixel_type = header.pixel_type();
    debug!(
        pixel_type,
        width = header.width,
        height = header.height,
        "PVR2 header"
    );

    let layout = pixel_layout(pixel_type).ok_or_else(|| {
        warn!(pixel_type, "Unknown PVR2 pixel type");
        PvrError::UnknownPixelType(pixel_type)
    })?;

    let pixels = unpack_payload(layout, payload, header.width, header.height, true, decompressor)?;

    Ok(PvrTexture {
        width: header.width,
        height: header.height,
        bpp: header.bpp,
        mip_count: header.mip_count,
        format: layout.label(),
        should_flip: false,
        data: pixels,
    })
}
