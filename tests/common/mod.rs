use std::fs;
use std::path::Path;

/// Build a minimal 24-bit BMP of the given dimensions.
///
/// Dimension probing sniffs magic bytes rather than file extensions, so
/// these bytes work as a stand-in image under any filename, including
/// `.jpg` fixtures.
pub fn probe_image_bytes(width: u32, height: u32) -> Vec<u8> {
    const HEADER_SIZE: u32 = 54;

    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = HEADER_SIZE + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);

    // File header
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&HEADER_SIZE.to_le_bytes());

    // BITMAPINFOHEADER
    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

/// Write a probe image to `path`, creating parent directories as needed.
pub fn write_probe_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, probe_image_bytes(width, height)).expect("write probe image");
}
