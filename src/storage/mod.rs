mod filename;
mod scratch_dir;

pub use filename::sanitize_filename;
pub use scratch_dir::ScratchDir;

use mime::Mime;

/// An uploaded file held in memory for the duration of one request.
#[derive(Debug)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub content_type: Option<Mime>,
    pub filename: String,
}
