mod header;
mod writer;

pub use header::{BitmapHeader, HEADER_LEN};
pub use writer::BitmapFileWriter;
