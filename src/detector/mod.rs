//! Camera frame classification.
//!
//! The controller only needs a yes/no answer to "does this frame contain
//! the flagged object". [`LabelDetector`] derives that answer from any
//! backend able to list labelled objects in a frame.

pub mod fake;

pub use fake::FakeLabelSource;

use crate::error::{Result, SecurityError};

/// Bytes per pixel in a [`Frame`] (packed RGB).
pub const BYTES_PER_PIXEL: usize = 3;

/// A single packed-RGB camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    /// Wrap a pixel buffer, checking it matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SecurityError::InvalidArgument(format!(
                "frame dimensions {width}x{height} must be non-zero"
            )));
        }
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(SecurityError::InvalidArgument(format!(
                "frame {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// All-black frame.
    pub fn blank(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height)?;
        Self::new(width, height, vec![0; len])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Bytes needed for a `width` x `height` frame.
pub fn buffer_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| {
            SecurityError::InvalidArgument(format!("frame {width}x{height} is too large"))
        })
}

/// Decides whether a frame shows a threat.
pub trait ThreatDetector {
    /// `confidence_threshold` is a percentage in `0.0..=100.0`.
    ///
    /// Backend failures surface as [`SecurityError::ClassificationUnavailable`].
    fn classify(&self, frame: &Frame, confidence_threshold: f32) -> Result<bool>;
}

/// An object recognised in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    /// Percent.
    pub confidence: f32,
}

impl Label {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Backend that lists the objects it recognises in a frame.
pub trait LabelSource {
    /// Labels recognised with at least `min_confidence` percent.
    fn detect_labels(&self, frame: &Frame, min_confidence: f32) -> Result<Vec<Label>>;
}

/// [`ThreatDetector`] that looks for one label among a [`LabelSource`]'s results.
///
/// A frame is a threat when some label whose name contains the target
/// (case-insensitive) reaches the confidence threshold.
pub struct LabelDetector<L> {
    source: L,
    target_label: String,
}

impl<L: LabelSource> LabelDetector<L> {
    pub fn new(source: L, target_label: impl Into<String>) -> Self {
        Self {
            source,
            target_label: target_label.into().to_lowercase(),
        }
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    pub fn source(&self) -> &L {
        &self.source
    }
}

impl<L: LabelSource> ThreatDetector for LabelDetector<L> {
    fn classify(&self, frame: &Frame, confidence_threshold: f32) -> Result<bool> {
        let labels = self.source.detect_labels(frame, confidence_threshold)?;
        let found = labels.iter().any(|label| {
            label.confidence >= confidence_threshold
                && label.name.to_lowercase().contains(&self.target_label)
        });
        log::debug!(
            "[Camera] {} label(s) in {}x{} frame, '{}' {}",
            labels.len(),
            frame.width(),
            frame.height(),
            self.target_label,
            if found { "present" } else { "absent" }
        );
        Ok(found)
    }
}
