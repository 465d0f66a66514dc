use crate::capture::types::FrameGeometry;

/// Size of the file header plus the 40-byte info header.
pub const HEADER_LEN: usize = 54;

const MAGIC: u16 = 0x4D42;
const INFO_HEADER_LEN: u32 = 40;
const BITS_PER_PIXEL: u16 = 24;
/// ~72 DPI.
const PIXELS_PER_METER: u32 = 2834;

/// Bitmap file header for an uncompressed 24-bit image stored bottom-up.
///
/// Rows are written without padding to a four-byte boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub file_size: u32,
    pub data_offset: u32,
    pub width: u32,
    pub height: u32,
    pub image_size: u32,
}

impl BitmapHeader {
    pub const fn for_geometry(geometry: &FrameGeometry) -> Self {
        let image_size = geometry.image_len() as u32;
        Self {
            file_size: HEADER_LEN as u32 + image_size,
            data_offset: HEADER_LEN as u32,
            width: geometry.width(),
            height: geometry.height(),
            image_size,
        }
    }

    /// Total on-disk size of a complete bitmap.
    pub const fn file_len(&self) -> u64 {
        self.file_size as u64
    }

    /// Little-endian, packed layout.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        let mut at = 0;
        let mut put = |bytes: &[u8]| {
            out[at..at + bytes.len()].copy_from_slice(bytes);
            at += bytes.len();
        };

        // File header
        put(&MAGIC.to_le_bytes());
        put(&self.file_size.to_le_bytes());
        put(&0u32.to_le_bytes());
        put(&self.data_offset.to_le_bytes());

        // Info header
        put(&INFO_HEADER_LEN.to_le_bytes());
        put(&self.width.to_le_bytes());
        put(&self.height.to_le_bytes());
        put(&1u16.to_le_bytes());
        put(&BITS_PER_PIXEL.to_le_bytes());
        put(&0u32.to_le_bytes());
        put(&self.image_size.to_le_bytes());
        put(&PIXELS_PER_METER.to_le_bytes());
        put(&PIXELS_PER_METER.to_le_bytes());
        put(&0u64.to_le_bytes());

        out
    }
}
