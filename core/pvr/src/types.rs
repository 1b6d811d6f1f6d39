use image::RgbaImage;
use std::fmt;

/// A decoded texture: top mip level of a single surface, expanded to RGBA8888.
///
/// `data` is either empty (default-constructed) or exactly `width * height * 4`
/// bytes, row-major, top row first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PvrTexture {
    pub width: u32,
    pub height: u32,
    /// Bits per pixel of the source encoding, not of `data`.
    pub bpp: u32,
    /// Mip levels declared by the container. Only level 0 is decoded.
    pub mip_count: u32,
    /// Human-readable name of the source encoding.
    pub format: &'static str,
    /// Orientation hint for consumers.
    pub should_flip: bool,
    pub data: Vec<u8>,
}

impl PvrTexture {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn flip_vertical(&mut self) {
        mirror_rows(&mut self.data, self.width as usize, self.height as usize);
    }

    pub fn into_rgba_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data)
    }
}

/// Swaps row `y` with row `height - y - 1` for the top half of an RGBA buffer.
pub(crate) fn mirror_rows(data: &mut [u8], width: usize, height: usize) {
    let row = width * 4;
    if data.len() < row * height {
        return;
    }
    for y in 0..height / 2 {
        let (top, bottom) = data.split_at_mut((height - y - 1) * row);
        top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
    }
}

/// The 8-byte PVR3 pixel format field, read as a little-endian `u64`.
///
/// Channel-layout tags store channel names in the low four bytes and bit depths
/// in the high four; compressed formats store an enum value in the low byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FormatTag(pub u64);

impl FormatTag {
    /// Builds a tag with `a` as the most significant byte.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8, g: u8, h: u8) -> Self {
        Self(u64::from_be_bytes([a, b, c, d, e, f, g, h]))
    }

    /// Bytes in file order.
    pub fn bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Low and high 32-bit halves.
    pub fn split(self) -> (u32, u32) {
        (self.0 as u32, (self.0 >> 32) as u32)
    }

    pub fn printable_prefix(self) -> String {
        self.bytes()[..4]
            .iter()
            .map(|&c| if (b' '..=b'}').contains(&c) { c as char } else { ' ' })
            .collect()
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (low, high) = self.split();
        let b = self.bytes();
        write!(
            f,
            "{:#010x} ('{}') {:#010x} ({} {} {} {})",
            low,
            self.printable_prefix(),
            high,
            b[4],
            b[5],
            b[6],
            b[7]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> PvrTexture {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        PvrTexture {
            width,
            height,
            data,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_is_empty() {
        let tex = PvrTexture::default();
        assert!(tex.is_empty());
        assert!(!tex.should_flip);
        assert_eq!(tex.pixel(0, 0), None);
    }

    #[test]
    fn test_flip_vertical_odd_height() {
        let mut tex = numbered(2, 3);
        tex.flip_vertical();
        assert_eq!(tex.pixel(0, 0), Some([0, 2, 0, 255]));
        assert_eq!(tex.pixel(1, 1), Some([1, 1, 0, 255]));
        assert_eq!(tex.pixel(1, 2), Some([1, 0, 0, 255]));
    }

    #[test]
    fn test_into_rgba_image() {
        let tex = numbered(4, 2);
        let img = tex.into_rgba_image().expect("buffer matches dimensions");
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(3, 1).0, [3, 1, 0, 255]);
    }

    #[test]
    fn test_format_tag_bytes_are_file_order() {
        let tag = FormatTag::new(8, 8, 8, 8, b'a', b'b', b'g', b'r');
        assert_eq!(tag.bytes(), [b'r', b'g', b'b', b'a', 8, 8, 8, 8]);
        assert_eq!(tag.split(), (0x6162_6772, 0x0808_0808));
        assert_eq!(tag.printable_prefix(), "rgba");
    }

    #[test]
    fn test_format_tag_display_masks_unprintable() {
        let tag = FormatTag(u64::from_le_bytes([b'r', 0x01, 0xff, b'~', 1, 2, 3, 4]));
        let text = tag.to_string();
        assert!(text.contains("('r   ')"), "{text}");
        assert!(text.ends_with("(1 2 3 4)"), "{text}");
    }
}
