//! Decoding of PVR textures (PVR2, PVR3 and header-less Apple PVRTC) into
//! RGBA8888.

pub mod apple;
pub mod codec;
pub mod decoder;
pub mod error;
pub mod process;
pub mod pvr2;
pub mod pvr3;
pub mod types;

pub use codec::layout::PixelLayout;
pub use codec::pvrtc::{PvrtcDecompressor, PvrtcMode, Texture2dDecoder};
pub use decoder::{Dialect, PvrDecoder};
pub use error::{LoadStatus, PvrError, Result};
pub use process::load;
pub use types::{FormatTag, PvrTexture};

/// Classifies and decodes an in-memory PVR buffer with the bundled PVRTC backend.
pub fn decode(data: &[u8]) -> Result<PvrTexture> {
    PvrDecoder::new(Texture2dDecoder).decode(data)
}
