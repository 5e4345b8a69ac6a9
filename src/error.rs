use thiserror::Error;

/// The flat error taxonomy shared by every pipeline stage.
///
/// `Decode` is the only variant a caller should expect to see routinely: it
/// means the data in front of a stage does not parse as a QR code at that
/// point, and the pipeline driver treats it as "try the next candidate"
/// rather than as a hard failure.
#[derive(Debug, Error)]
pub enum QrError {
    #[error("decoding error: {0}")]
    Decode(String),

    #[error("memory allocation error: {0}")]
    Memory(String),

    #[error("could not load image: {0}")]
    Image(#[from] image::ImageError),
}

impl QrError {
    pub fn decode<S: Into<String>>(msg: S) -> QrError {
        QrError::Decode(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, QrError>;
