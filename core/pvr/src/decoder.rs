use crate::codec::layout::{PixelLayout, Unpacker};
use crate::codec::pvrtc::{PvrtcDecompressor, Texture2dDecoder};
use crate::error::{PvrError, Result};
use crate::types::PvrTexture;
use crate::{apple, pvr2, pvr3};
use byteorder::{ByteOrder, LE};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Container flavour a buffer was decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dialect {
    ApplePvrtc,
    Pvr2,
    Pvr3,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::ApplePvrtc => "Apple PVRTC",
            Dialect::Pvr2 => "PVR2",
            Dialect::Pvr3 => "PVR3",
        })
    }
}

/// Classifies PVR buffers and decodes them to RGBA8888.
#[derive(Debug, Clone, Default)]
pub struct PvrDecoder<D = Texture2dDecoder> {
    decompressor: D,
}

impl<D: PvrtcDecompressor> PvrDecoder<D> {
    pub fn new(decompressor: D) -> Self {
        Self { decompressor }
    }

    pub fn decompressor(&self) -> &D {
        &self.decompressor
    }

    pub fn decode(&self, data: &[u8]) -> Result<PvrTexture> {
        self.decode_with_dialect(data).map(|(_, texture)| texture)
    }

    /// Power-of-two lengths try the header-less Apple layout first; anything
    /// else, or an Apple miss, dispatches on the 4-byte magic.
    pub fn decode_with_dialect(&self, data: &[u8]) -> Result<(Dialect, PvrTexture)> {
        if data.len().count_ones() == 1 {
            match apple::decode(data, &self.decompressor) {
                Ok(texture) => return Ok((Dialect::ApplePvrtc, texture)),
                Err(e) => debug!(len = data.len(), reason = %e, "Not an Apple PVRTC buffer"),
            }
        }

        if data.len() < 4 {
            return Err(PvrError::InvalidFile(format!(
                "{} bytes is too small to hold a magic",
                data.len()
            )));
        }

        if LE::read_u32(&data[..4]) == pvr3::PVR3_MAGIC {
            pvr3::decode(data, &self.decompressor).map(|t| (Dialect::Pvr3, t))
        } else {
            pvr2::decode(data, &self.decompressor).map(|t| (Dialect::Pvr2, t))
        }
    }
}

/// Expands the top-level payload into a fresh `width * height * 4` buffer.
///
/// The payload length is checked before anything is allocated or read.
pub(crate) fn unpack_payload<D: PvrtcDecompressor + ?Sized>(
    layout: PixelLayout,
    payload: &[u8],
    width: u32,
    height: u32,
    assume_tiled: bool,
    decompressor: &D,
) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(PvrError::InvalidFile(format!(
            "Degenerate dimensions {}x{}",
            width, height
        )));
    }

    let required = layout.required_len(width, height);
    if (payload.len() as u64) < required {
        return Err(PvrError::InvalidFile(format!(
            "Insufficient data for {}: expected {}, got {}",
            layout.label(),
            required,
            payload.len()
        )));
    }

    let out_len = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|n| n.checked_mul(4))
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            PvrError::InvalidFile(format!("Dimensions {}x{} overflow", width, height))
        })?;
    let mut out = vec![0u8; out_len];

    match layout.unpacker() {
        Unpacker::Linear { stride, unpack } => {
            for (src, dst) in payload.chunks_exact(stride).zip(out.chunks_exact_mut(4)) {
                dst.copy_from_slice(&unpack(src));
            }
        }
        Unpacker::Pvrtc(mode) => {
            decompressor.decompress(payload, mode, width, height, assume_tiled, &mut out)?
        }
    }
    Ok(out)
}
