use std::io;

use super::RawFrameStream;

/// A frame held in memory, served by positional reads.
pub struct SnapshotStream {
    pixels: Vec<u8>,
}

impl SnapshotStream {
    pub fn new(pixels: Vec<u8>) -> Self {
        Self { pixels }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl RawFrameStream for SnapshotStream {
    fn read(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset out of range"))?;
        let Some(available) = self.pixels.get(start..) else {
            return Ok(0);
        };
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }

    fn close(&mut self) {
        self.pixels = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_past_end_returns_zero() {
        let mut stream = SnapshotStream::new(vec![1, 2, 3]);
        let mut buf = [0; 4];
        assert_eq!(stream.read(&mut buf, 10).unwrap(), 0);
        assert_eq!(stream.read(&mut buf, 1).unwrap(), 2);
        assert_eq!(&buf[..2], &[2, 3]);
    }

    #[test]
    fn test_close_releases_pixels() {
        let mut stream = SnapshotStream::new(vec![0; 64]);
        stream.close();
        assert!(stream.is_empty());
    }
}
