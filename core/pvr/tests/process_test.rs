use pvr::process::{pvr_decode, pvr_decode_batch, pvr_info};
use pvr::pvr2::{PVR_TYPE_I8, PVR_TYPE_RGBA8888, PVR2_MAGIC};
use pvr::{Dialect, LoadStatus};
use std::fs;

fn pvr2_file(width: u32, height: u32, pixel_type: u32, bpp: u32, payload: &[u8]) -> Vec<u8> {
    let words: [u32; 13] = [
        52, height, width, 2, pixel_type, 0, bpp, 0, 0, 0, 0, PVR2_MAGIC, 1,
    ];
    let mut data: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    data.extend_from_slice(payload);
    data
}

#[test]
fn test_load_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = pvr::load(&temp_dir.path().join("nope.pvr"));
    assert_eq!(LoadStatus::of(&result), LoadStatus::FileNotFound);
}

#[test]
fn test_info_reports_header() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("tex.pvr");
    fs::write(&path, pvr2_file(3, 2, PVR_TYPE_I8, 8, &[0; 6]))?;

    let info = pvr_info(&path)?;
    assert_eq!(info.dialect, Dialect::Pvr2);
    assert_eq!((info.width, info.height, info.bpp), (3, 2, 8));
    assert_eq!(info.mip_count, 2);
    assert_eq!(info.format, "I8");
    Ok(())
}

#[test]
fn test_decode_writes_png() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("red.pvr");
    let payload = [255, 0, 0, 255, 0, 0, 255, 128];
    fs::write(&path, pvr2_file(2, 1, PVR_TYPE_RGBA8888, 32, &payload))?;

    let out = pvr_decode(&path, &None)?;
    assert_eq!(out, path.with_extension("png"));

    let img = image::open(&out)?.to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 128]);
    Ok(())
}

#[test]
fn test_batch_counts_failures() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("in");
    fs::create_dir_all(input.join("nested"))?;
    fs::write(input.join("a.pvr"), pvr2_file(1, 1, PVR_TYPE_I8, 8, &[9]))?;
    fs::write(
        input.join("nested/b.PVR"),
        pvr2_file(1, 1, PVR_TYPE_RGBA8888, 32, &[1, 2, 3, 4]),
    )?;
    fs::write(input.join("broken.pvr"), [1, 2, 3])?;
    fs::write(input.join("notes.txt"), "ignored")?;

    let output = temp_dir.path().join("out");
    let summary = pvr_decode_batch(&input, &Some(output.clone()))?;
    assert_eq!(summary.decoded, 2);
    assert_eq!(summary.failed, 1);
    assert!(output.join("a.png").exists());
    assert!(output.join("nested/b.png").exists());
    Ok(())
}

#[test]
fn test_info_serializes_to_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("tex.pvr");
    fs::write(&path, pvr2_file(1, 1, PVR_TYPE_RGBA8888, 32, &[0; 4]))?;

    let value = serde_json::to_value(pvr_info(&path)?)?;
    assert_eq!(value["dialect"], "Pvr2");
    assert_eq!(value["format"], "RGBA8888");
    assert_eq!(value["width"], 1);
    Ok(())
}
