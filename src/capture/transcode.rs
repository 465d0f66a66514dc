//! Raw stream rows to bitmap rows.
//!
//! The compositor hands out pixels as `(r, g, b, pad)` with the top row first.
//! A 24-bit bitmap wants `(b, g, r)` with the bottom row first. Each chunk is
//! converted and flipped in a single pass; the caller walks the frame's chunks
//! from last to first so the whole file ends up bottom-up.

use super::types::{FrameGeometry, BITMAP_PIXEL_STRIDE, SOURCE_PIXEL_STRIDE};

/// Converts one chunk of raw rows into bitmap rows.
///
/// Destination row `d` receives source row `chunk_rows - d - 1`. Each source
/// pixel `(c0, c1, c2, c3)` becomes `(c2, c1, c0)`. Pure byte permutation.
///
/// `source` must be `geometry.source_chunk_len()` bytes and `output`
/// `geometry.bitmap_chunk_len()` bytes.
pub fn transcode_chunk(geometry: &FrameGeometry, source: &[u8], output: &mut [u8]) {
    debug_assert_eq!(source.len(), geometry.source_chunk_len());
    debug_assert_eq!(output.len(), geometry.bitmap_chunk_len());

    let source_rows = source.chunks_exact(geometry.source_row_len()).rev();
    let output_rows = output.chunks_exact_mut(geometry.bitmap_row_len());

    for (out_row, in_row) in output_rows.zip(source_rows) {
        transcode_row(in_row, out_row);
    }
}

/// Drops the padding channel and swaps red and blue for one row.
pub fn transcode_row(source: &[u8], output: &mut [u8]) {
    let pixels = output
        .chunks_exact_mut(BITMAP_PIXEL_STRIDE)
        .zip(source.chunks_exact(SOURCE_PIXEL_STRIDE));

    for (out, px) in pixels {
        out[0] = px[2];
        out[1] = px[1];
        out[2] = px[0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_row(width: u32, px: [u8; 4]) -> Vec<u8> {
        px.repeat(width as usize)
    }

    #[test]
    fn test_row_reorders_channels_and_drops_padding() {
        let source = solid_row(1280, [10, 20, 30, 99]);
        let mut output = vec![0; 1280 * 3];

        transcode_row(&source, &mut output);

        assert_eq!(output, [30u8, 20, 10].repeat(1280));
    }

    #[test]
    fn test_row_keeps_per_pixel_values() {
        let source = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut output = [0; 6];

        transcode_row(&source, &mut output);

        assert_eq!(output, [3, 2, 1, 7, 6, 5]);
    }

    #[test]
    fn test_chunk_flips_rows() {
        let geometry = FrameGeometry::new(2, 3, 3);
        let mut source = Vec::new();
        source.extend(solid_row(2, [1, 1, 1, 0]));
        source.extend(solid_row(2, [2, 2, 2, 0]));
        source.extend(solid_row(2, [3, 3, 3, 0]));
        let mut output = vec![0; geometry.bitmap_chunk_len()];

        transcode_chunk(&geometry, &source, &mut output);

        assert_eq!(&output[0..6], &[3; 6]);
        assert_eq!(&output[6..12], &[2; 6]);
        assert_eq!(&output[12..18], &[1; 6]);
    }

    #[test]
    fn test_single_row_chunk_is_not_flipped() {
        let geometry = FrameGeometry::new(4, 2, 1);
        let source = solid_row(4, [40, 50, 60, 99]);
        let mut output = vec![0; geometry.bitmap_chunk_len()];

        transcode_chunk(&geometry, &source, &mut output);

        assert_eq!(output, [60u8, 50, 40].repeat(4));
    }
}
