use std::io::{self, Read};

use crate::error::IngestError;
use crate::grid::{ActivationVector, LabelVector, PixelGrid, CLASSES, PIXELS};

/// One decoded (image, label) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub pixels: PixelGrid,
    pub label: LabelVector,
}

impl Sample {
    /// Input-layer activations for this sample's image.
    pub fn activations(&self) -> ActivationVector {
        self.pixels.activations()
    }
}

/// Decodes one image record and its matching label record, in that order.
///
/// Both sources advance by exactly one record on success. On failure no
/// partial sample is exposed; the caller decides whether the run continues.
///
/// # Errors
/// Returns `IngestError::Truncated` if either source ends mid-record,
/// `IngestError::LabelOutOfRange` if the label byte is not in 0..=9, and
/// `IngestError::Io` for any other read failure.
pub fn read_sample<I, L>(images: &mut I, labels: &mut L) -> Result<Sample, IngestError>
where
    I: Read,
    L: Read,
{
    let pixels = read_pixels(images)?;
    let label = read_label(labels)?;
    Ok(Sample { pixels, label })
}

fn read_pixels<I: Read>(images: &mut I) -> Result<PixelGrid, IngestError> {
    let mut record = [0u8; PIXELS];
    fill(images, &mut record, "image")?;
    Ok(PixelGrid::from_record(&record))
}

fn read_label<L: Read>(labels: &mut L) -> Result<LabelVector, IngestError> {
    let mut record = [0u8; 1];
    fill(labels, &mut record, "label")?;

    let value = record[0];
    if (value as usize) >= CLASSES {
        return Err(IngestError::LabelOutOfRange { value });
    }
    Ok(LabelVector::one_hot(value))
}

pub(crate) fn fill<R: Read>(
    source: &mut R,
    buf: &mut [u8],
    stream: &'static str,
) -> Result<(), IngestError> {
    source.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => IngestError::Truncated {
            stream,
            expected: buf.len(),
        },
        _ => IngestError::Io(e),
    })
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;
    use crate::grid::GRID_SIDE;

    #[test]
    fn an_alternating_record_decodes_to_the_alternating_pattern() {
        let mut image = [0u8; PIXELS];
        for (i, byte) in image.iter_mut().enumerate() {
            *byte = if i % 2 == 0 { 0 } else { 255 };
        }
        let mut images = Cursor::new(image.to_vec());
        let mut labels = Cursor::new(vec![7u8]);

        let sample = read_sample(&mut images, &mut labels).unwrap();

        assert_eq!(sample.label, LabelVector::one_hot(7));
        assert_eq!(sample.label.digit(), 7);
        for i in 0..GRID_SIDE {
            for j in 0..GRID_SIDE {
                let expected = if (i * GRID_SIDE + j) % 2 == 0 { 0.0 } else { 1.0 };
                assert_eq!(sample.pixels.view()[[i, j]], expected);
            }
        }
        assert_eq!(sample.activations().len(), PIXELS);
    }

    #[test]
    fn a_short_image_record_is_reported_as_truncation() {
        let mut images = Cursor::new(vec![1u8; PIXELS - 1]);
        let mut labels = Cursor::new(vec![3u8]);

        let err = read_sample(&mut images, &mut labels).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Truncated {
                stream: "image",
                expected: PIXELS,
            }
        ));
    }

    #[test]
    fn a_label_byte_above_nine_is_rejected() {
        let mut images = Cursor::new(vec![0u8; PIXELS]);
        let mut labels = Cursor::new(vec![12u8]);

        let err = read_sample(&mut images, &mut labels).unwrap_err();
        assert!(matches!(err, IngestError::LabelOutOfRange { value: 12 }));
    }
}
