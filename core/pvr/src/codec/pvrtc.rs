use crate::error::{PvrError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PvrtcMode {
    TwoBit,
    FourBit,
}

impl PvrtcMode {
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            PvrtcMode::TwoBit => 2,
            PvrtcMode::FourBit => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PvrtcMode::TwoBit => "PVRTC2",
            PvrtcMode::FourBit => "PVRTC4",
        }
    }

    /// Block payload size for the top mip level. PVRTC pads images up to
    /// 16x8 (2bpp) or 8x8 (4bpp).
    pub fn min_payload_len(self, width: u32, height: u32) -> u64 {
        let (min_w, min_h) = match self {
            PvrtcMode::TwoBit => (16, 8),
            PvrtcMode::FourBit => (8, 8),
        };
        let w = u64::from(width.max(min_w));
        let h = u64::from(height.max(min_h));
        w.saturating_mul(h)
            .saturating_mul(u64::from(self.bits_per_pixel()))
            / 8
    }
}

/// Block decompressor for PVRTC payloads.
///
/// `out` is exactly `width * height * 4` bytes and must be filled with RGBA
/// pixels, top row first. Callers guarantee `blocks` holds at least
/// [`PvrtcMode::min_payload_len`] bytes.
pub trait PvrtcDecompressor {
    fn decompress(
        &self,
        blocks: &[u8],
        mode: PvrtcMode,
        width: u32,
        height: u32,
        assume_tiled: bool,
        out: &mut [u8],
    ) -> Result<()>;
}

impl<D: PvrtcDecompressor + ?Sized> PvrtcDecompressor for &D {
    fn decompress(
        &self,
        blocks: &[u8],
        mode: PvrtcMode,
        width: u32,
        height: u32,
        assume_tiled: bool,
        out: &mut [u8],
    ) -> Result<()> {
        (**self).decompress(blocks, mode, width, height, assume_tiled, out)
    }
}

/// Backend built on `texture2ddecoder`.
///
/// That decoder always wraps block neighbours at the image edges, so
/// `assume_tiled` makes no difference here.
#[derive(Debug, Default, Clone, Copy)]
pub struct Texture2dDecoder;

impl PvrtcDecompressor for Texture2dDecoder {
    fn decompress(
        &self,
        blocks: &[u8],
        mode: PvrtcMode,
        width: u32,
        height: u32,
        _assume_tiled: bool,
        out: &mut [u8],
    ) -> Result<()> {
        let (w, h) = (width as usize, height as usize);
        let mut pixels = vec![0u32; w * h];
        let decoded = match mode {
            PvrtcMode::TwoBit => texture2ddecoder::decode_pvrtc_2bpp(blocks, w, h, &mut pixels),
            PvrtcMode::FourBit => texture2ddecoder::decode_pvrtc_4bpp(blocks, w, h, &mut pixels),
        };
        decoded.map_err(|e| PvrError::Decompress(e.to_string()))?;

        // texture2ddecoder packs pixels as little-endian BGRA words
        for (dst, px) in out.chunks_exact_mut(4).zip(&pixels) {
            let [b, g, r, a] = px.to_le_bytes();
            dst.copy_from_slice(&[r, g, b, a]);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Call {
        pub mode: PvrtcMode,
        pub width: u32,
        pub height: u32,
        pub assume_tiled: bool,
        pub payload_len: usize,
    }

    /// Writes `[x, y, bpp, 255]` for every pixel and records each call.
    #[derive(Debug, Default)]
    pub struct RecordingDecompressor {
        pub calls: RefCell<Vec<Call>>,
    }

    impl PvrtcDecompressor for RecordingDecompressor {
        fn decompress(
            &self,
            blocks: &[u8],
            mode: PvrtcMode,
            width: u32,
            height: u32,
            assume_tiled: bool,
            out: &mut [u8],
        ) -> Result<()> {
            self.calls.borrow_mut().push(Call {
                mode,
                width,
                height,
                assume_tiled,
                payload_len: blocks.len(),
            });
            for (i, px) in out.chunks_exact_mut(4).enumerate() {
                let x = i as u32 % width;
                let y = i as u32 / width;
                px.copy_from_slice(&[x as u8, y as u8, mode.bits_per_pixel() as u8, 255]);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_payload_len() {
        assert_eq!(PvrtcMode::FourBit.min_payload_len(8, 8), 32);
        assert_eq!(PvrtcMode::FourBit.min_payload_len(1, 1), 32);
        assert_eq!(PvrtcMode::TwoBit.min_payload_len(16, 16), 64);
        assert_eq!(PvrtcMode::TwoBit.min_payload_len(8, 8), 32);
        assert_eq!(PvrtcMode::FourBit.min_payload_len(256, 128), 16384);
    }

    #[test]
    fn test_texture2d_decoder_fills_buffer() {
        // All-zero blocks decode to a uniform colour; only the shape is checked here.
        let blocks = [0u8; 32];
        let mut out = vec![0xAAu8; 8 * 8 * 4];
        Texture2dDecoder
            .decompress(&blocks, PvrtcMode::FourBit, 8, 8, false, &mut out)
            .unwrap();
        let first = [out[0], out[1], out[2], out[3]];
        assert_ne!(first, [0xAA; 4]);
        assert!(out.chunks_exact(4).all(|px| px == first));
    }
}
