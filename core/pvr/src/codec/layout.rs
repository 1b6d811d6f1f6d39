use crate::codec::pvrtc::PvrtcMode;

/// Per-pixel expansion of one source pixel into RGBA8888.
pub type UnpackFn = fn(&[u8]) -> [u8; 4];

/// Source pixel encodings understood by both container dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    Rgba4444,
    Rgba5551,
    Rgba8888,
    Rgb565,
    Rgb555,
    Rgb888,
    I8,
    Ai8,
    Pvrtc(PvrtcMode),
}

/// How a layout turns into RGBA.
#[derive(Debug, Clone, Copy)]
pub enum Unpacker {
    Linear { stride: usize, unpack: UnpackFn },
    Pvrtc(PvrtcMode),
}

impl PixelLayout {
    pub fn label(self) -> &'static str {
        match self {
            PixelLayout::Rgba4444 => "RGBA4444",
            PixelLayout::Rgba5551 => "RGBA5551",
            PixelLayout::Rgba8888 => "RGBA8888",
            PixelLayout::Rgb565 => "RGB565",
            PixelLayout::Rgb555 => "RGB555",
            PixelLayout::Rgb888 => "RGB888",
            PixelLayout::I8 => "I8",
            PixelLayout::Ai8 => "AI8",
            PixelLayout::Pvrtc(mode) => mode.label(),
        }
    }

    pub fn bits_per_pixel(self) -> u32 {
        match self.unpacker() {
            Unpacker::Linear { stride, .. } => stride as u32 * 8,
            Unpacker::Pvrtc(mode) => mode.bits_per_pixel(),
        }
    }

    pub fn unpacker(self) -> Unpacker {
        let (stride, unpack): (usize, UnpackFn) = match self {
            PixelLayout::Rgba4444 => (2, rgba4444),
            PixelLayout::Rgba5551 => (2, rgba5551),
            PixelLayout::Rgba8888 => (4, rgba8888),
            PixelLayout::Rgb565 => (2, rgb565),
            PixelLayout::Rgb555 => (2, rgb555),
            PixelLayout::Rgb888 => (3, rgb888),
            PixelLayout::I8 => (1, intensity),
            PixelLayout::Ai8 => (2, intensity_alpha),
            PixelLayout::Pvrtc(mode) => return Unpacker::Pvrtc(mode),
        };
        Unpacker::Linear { stride, unpack }
    }

    /// Bytes of source payload needed for a `width` x `height` top level.
    pub fn required_len(self, width: u32, height: u32) -> u64 {
        match self.unpacker() {
            Unpacker::Linear { stride, .. } => {
                u64::from(width)
                    .saturating_mul(u64::from(height))
                    .saturating_mul(stride as u64)
            }
            Unpacker::Pvrtc(mode) => mode.min_payload_len(width, height),
        }
    }
}

fn rgba4444(src: &[u8]) -> [u8; 4] {
    let (v1, v2) = (src[0], src[1]);
    [v2 & 0xf0, (v2 & 0x0f) << 4, v1 & 0xf0, (v1 & 0x0f) << 4]
}

fn rgba5551(src: &[u8]) -> [u8; 4] {
    let v = u16::from_le_bytes([src[0], src[1]]);
    let a = if v & 0x0001 != 0 { 255 } else { 0 };
    [
        ((v & 0xf800) >> 8) as u8,
        ((v & 0x07c0) >> 3) as u8,
        ((v & 0x003e) << 2) as u8,
        a,
    ]
}

fn rgba8888(src: &[u8]) -> [u8; 4] {
    [src[0], src[1], src[2], src[3]]
}

fn rgb565(src: &[u8]) -> [u8; 4] {
    let v = u16::from_le_bytes([src[0], src[1]]);
    [
        ((v & 0xf800) >> 8) as u8,
        ((v & 0x07e0) >> 3) as u8,
        ((v & 0x001f) << 3) as u8,
        255,
    ]
}

// Red sits in the low bits for this legacy layout.
fn rgb555(src: &[u8]) -> [u8; 4] {
    let v = u16::from_le_bytes([src[0], src[1]]);
    [
        ((v & 0x001f) << 3) as u8,
        ((v & 0x03e0) >> 2) as u8,
        ((v & 0x7c00) >> 7) as u8,
        255,
    ]
}

fn rgb888(src: &[u8]) -> [u8; 4] {
    [src[0], src[1], src[2], 255]
}

fn intensity(src: &[u8]) -> [u8; 4] {
    let i = src[0];
    [i, i, i, 255]
}

fn intensity_alpha(src: &[u8]) -> [u8; 4] {
    let (i, a) = (src[0], src[1]);
    [i, i, i, a]
}
