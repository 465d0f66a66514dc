use std::path::PathBuf;

use crate::capture::bitmap::{BitmapFileWriter, BitmapHeader};
use crate::capture::errors::CaptureError;
use crate::capture::finalize::finalize_capture;
use crate::capture::storage::{ensure_bitmap_dir, tick_path, CaptureFs};
use crate::capture::stream::{FrameStreamSession, RawFrameStream};
use crate::capture::transcode::transcode_chunk;
use crate::capture::types::{ChunkBuffers, Tick};

/// Writes the open stream to a new bitmap and names it after its creation time.
///
/// Chunks are pulled from the bottom of the frame up so the file comes out
/// bottom-up. Any failure after the file was created deletes it before the
/// error is returned. Returns the path the capture ended up at.
pub fn commit_capture<T, F>(
    stream: &mut FrameStreamSession<T>,
    fs: &F,
    tick: Tick,
    buffers: &mut ChunkBuffers,
) -> Result<PathBuf, CaptureError>
where
    T: RawFrameStream,
    F: CaptureFs,
{
    let geometry = *stream.geometry();
    debug_assert!(buffers.fits(&geometry));

    ensure_bitmap_dir(fs)?;

    let path = tick_path(tick);
    let mut writer = BitmapFileWriter::create(fs, &path, BitmapHeader::for_geometry(&geometry))?;
    writer.write_header()?;

    for chunk in (0..geometry.chunk_count()).rev() {
        stream.read_chunk(chunk * geometry.chunk_rows(), &mut buffers.source)?;
        transcode_chunk(&geometry, &buffers.source, &mut buffers.bitmap);
        writer.append_chunk(&buffers.bitmap)?;
    }

    let written = writer.finish()?;
    tracing::info!(target: "capture", "[BITMAP] Wrote {:?}", written);

    // The tick name is a fine place to stop
    match finalize_capture(fs, &written) {
        Ok(renamed) => {
            tracing::debug!(target: "capture", "[FINALIZE] Renamed to {:?}", renamed);
            Ok(renamed)
        }
        Err(e) => {
            tracing::debug!(target: "capture", "[FINALIZE] Keeping tick name: {}", e);
            Ok(written)
        }
    }
}
