//! Header-less PVRTC as shipped by Apple's texturetool: nothing but the top
//! mip level of a square power-of-two texture, so dimensions and bit mode
//! have to be inferred from the buffer length.

use crate::codec::layout::PixelLayout;
use crate::codec::pvrtc::{PvrtcDecompressor, PvrtcMode};
use crate::decoder::unpack_payload;
use crate::error::{PvrError, Result};
use crate::pvr2::{PVR2_HEADER_SIZE, Pvr2Header};
use crate::types::{PvrTexture, mirror_rows};
use tracing::info;

const TEST_2BPP: usize = 0x40;
const TEST_4BPP: usize = 0x80;

/// Infers `(resolution, mode)` from the buffer length.
///
/// 32 bytes could be either mode at 8x8; it is taken as 4bpp.
pub fn detect(size: usize) -> Option<(u32, PvrtcMode)> {
    if size == 32 {
        return Some((8, PvrtcMode::FourBit));
    }
    (0..10).find_map(|shift| {
        let res = 16u32 << shift;
        if size & (TEST_2BPP << (shift * 2)) != 0 {
            Some((res, PvrtcMode::TwoBit))
        } else if size & (TEST_4BPP << (shift * 2)) != 0 {
            Some((res, PvrtcMode::FourBit))
        } else {
            None
        }
    })
}

fn looks_like_pvr2(data: &[u8]) -> bool {
    data.len() > PVR2_HEADER_SIZE && Pvr2Header::read(data).is_ok_and(|h| h.is_valid())
}

pub fn decode<D: PvrtcDecompressor + ?Sized>(data: &[u8], decompressor: &D) -> Result<PvrTexture> {
    if looks_like_pvr2(data) {
        return Err(PvrError::InvalidFile(
            "Buffer carries a PVR2 header".to_string(),
        ));
    }

    let (res, mode) = detect(data.len()).ok_or_else(|| {
        PvrError::InvalidFile(format!("{} bytes matches no Apple PVRTC size", data.len()))
    })?;
    info!(
        width = res,
        height = res,
        bpp = mode.bits_per_pixel(),
        "Detected Apple PVRTC"
    );

    let mut pixels = unpack_payload(PixelLayout::Pvrtc(mode), data, res, res, false, decompressor)?;
    mirror_rows(&mut pixels, res as usize, res as usize);

    Ok(PvrTexture {
        width: res,
        height: res,
        bpp: mode.bits_per_pixel(),
        mip_count: 0,
        format: mode.label(),
        should_flip: false,
        data: pixels,
    })
}
