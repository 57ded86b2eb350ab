use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::decode::{fill, read_sample, Sample};
use crate::error::IngestError;

/// Bytes to discard from the front of the image file before record 0.
pub const IMAGE_HEADER_LEN: usize = 16;
/// Bytes to discard from the front of the label file before record 0.
pub const LABEL_HEADER_LEN: usize = 8;

/// The paired image and label streams of one dataset.
///
/// Both sources are owned for the whole run and only ever advance in
/// lock-step: consuming one image record always consumes exactly one label
/// record with it.
#[derive(Debug)]
pub struct SampleStream<I, L> {
    images: I,
    labels: L,
}

impl SampleStream<BufReader<File>, BufReader<File>> {
    /// Opens a dataset pair and skips both file headers.
    ///
    /// Headers are discarded blind, without validating magic numbers;
    /// malformed files surface later as record-level truncation.
    ///
    /// # Errors
    /// Returns `IngestError::Io` if either file cannot be opened and
    /// `IngestError::Truncated` if a file is shorter than its header.
    pub fn open(images: &Path, labels: &Path) -> Result<Self, IngestError> {
        let mut images = BufReader::new(File::open(images)?);
        let mut labels = BufReader::new(File::open(labels)?);
        skip_header(&mut images, IMAGE_HEADER_LEN, "image")?;
        skip_header(&mut labels, LABEL_HEADER_LEN, "label")?;
        Ok(Self { images, labels })
    }
}

impl<I: Read, L: Read> SampleStream<I, L> {
    /// Wraps sources already positioned at their first record.
    pub fn from_readers(images: I, labels: L) -> Self {
        Self { images, labels }
    }

    /// Decodes the next (image, label) pair, advancing both streams.
    ///
    /// # Errors
    /// Propagates the decoder's `IngestError`; see [`read_sample`].
    pub fn next_sample(&mut self) -> Result<Sample, IngestError> {
        read_sample(&mut self.images, &mut self.labels)
    }
}

fn skip_header<R: Read>(
    source: &mut R,
    len: usize,
    stream: &'static str,
) -> Result<(), IngestError> {
    let mut header = vec![0u8; len];
    fill(source, &mut header, stream)
}
