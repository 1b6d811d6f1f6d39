use crate::codec::pvrtc::Texture2dDecoder;
use crate::decoder::{Dialect, PvrDecoder};
use crate::error::{LoadStatus, PvrError, Result};
use crate::types::PvrTexture;
use anyhow::{Context, anyhow};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// Reads and decodes a PVR file with the bundled PVRTC backend.
pub fn load(path: &Path) -> Result<PvrTexture> {
    let data = fs::read(path)?;
    PvrDecoder::new(Texture2dDecoder).decode(&data)
}

/// Header-level description of a decoded texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureInfo {
    pub dialect: Dialect,
    pub width: u32,
    pub height: u32,
    pub bpp: u32,
    pub mip_count: u32,
    pub format: &'static str,
}

pub fn pvr_info(input: &Path) -> Result<TextureInfo> {
    let data = fs::read(input)?;
    let (dialect, texture) = PvrDecoder::new(Texture2dDecoder).decode_with_dialect(&data)?;
    Ok(TextureInfo {
        dialect,
        width: texture.width,
        height: texture.height,
        bpp: texture.bpp,
        mip_count: texture.mip_count,
        format: texture.format,
    })
}

/// Decodes `input` and writes it as a PNG, returning the output path.
pub fn pvr_decode(input: &Path, output: &Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let mut texture = load(input).with_context(|| format!("Failed to decode {:?}", input))?;
    if texture.should_flip {
        texture.flip_vertical();
    }

    let out_path = match output {
        Some(p) => p.clone(),
        None => input.with_extension("png"),
    };
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let (width, height, format) = (texture.width, texture.height, texture.format);
    let img = texture
        .into_rgba_image()
        .ok_or_else(|| anyhow!("Decoded buffer does not match {}x{}", width, height))?;
    img.save(&out_path)
        .with_context(|| format!("Failed to save {:?}", out_path))?;
    info!(input = ?input, output = ?out_path, width, height, format, "Decoded PVR");
    Ok(out_path)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub decoded: usize,
    pub failed: usize,
}

/// Decodes every `.pvr` file under `input` in parallel, mirroring the
/// directory structure under `output` (defaults to `input`).
pub fn pvr_decode_batch(input: &Path, output: &Option<PathBuf>) -> anyhow::Result<BatchSummary> {
    let out_dir = match output {
        Some(p) => p.clone(),
        None => input.to_path_buf(),
    };

    let mut tasks = Vec::new();
    for entry in walkdir::WalkDir::new(input) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("pvr"))
        {
            tasks.push(path.to_path_buf());
        }
    }
    info!(count = tasks.len(), "Found PVR textures to decode");

    let decoded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    tasks.par_iter().for_each(|path| {
        let relative = path.strip_prefix(input).unwrap_or(path);
        let target = Some(out_dir.join(relative).with_extension("png"));
        match pvr_decode(path, &target) {
            Ok(_) => {
                decoded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                let status = e
                    .downcast_ref::<PvrError>()
                    .map(|e| e.status())
                    .unwrap_or(LoadStatus::InvalidFile);
                warn!(path = ?path, %status, error = %e, "Failed to decode");
                failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    Ok(BatchSummary {
        decoded: decoded.into_inner(),
        failed: failed.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("missing.pvr"));
        assert_eq!(LoadStatus::of(&result), LoadStatus::FileNotFound);
    }

    #[test]
    fn test_decode_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = pvr_decode(&dir.path().join("missing.pvr"), &None).unwrap_err();
        assert!(err.to_string().contains("missing.pvr"));
        let status = err.downcast_ref::<PvrError>().map(|e| e.status());
        assert_eq!(status, Some(LoadStatus::FileNotFound));
    }
}
