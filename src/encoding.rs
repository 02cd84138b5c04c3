//! Character decoding for archive entries.
//!
//! PAGE documents exported from transcription platforms are usually UTF-8,
//! but older exports and hand-edited files turn up in legacy single-byte
//! encodings. Decoding order, first success wins:
//! 1. strict UTF-8
//! 2. chardetng statistical detection, accepted above a confidence threshold
//! 3. a fixed list of fallback labels (`latin-1`, `cp1252`, `iso-8859-1`)
//!
//! encoding_rs maps every Latin-1 label to windows-1252, so those labels are
//! decoded here as true ISO-8859-1: each byte becomes the code point of the
//! same value. A leading UTF-8 BOM is dropped, so decoded text may be three
//! bytes shorter than the entry.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Confidence assigned to a guess chardetng marks as confident.
const CONFIDENT_SCORE: f32 = 0.99;
/// Confidence assigned to a tentative guess.
const TENTATIVE_SCORE: f32 = 0.5;

/// Options controlling the decoding chain.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Run the statistical detector after UTF-8 fails
    pub detect: bool,

    /// Detector guesses must score strictly above this
    pub min_confidence: f32,

    /// Encoding labels tried in order once detection fails
    pub fallback_labels: Vec<String>,
}

impl DecodeOptions {
    /// Create new decode options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable statistical detection.
    pub fn with_detection(mut self, detect: bool) -> Self {
        self.detect = detect;
        self
    }

    /// Set the detector confidence threshold.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Replace the fallback label list.
    pub fn with_fallbacks<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            detect: true,
            min_confidence: 0.70,
            fallback_labels: vec!["latin-1".into(), "cp1252".into(), "iso-8859-1".into()],
        }
    }
}

/// How an entry was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedWith {
    /// Valid UTF-8
    Utf8,
    /// Statistical detector guess
    Detected(&'static Encoding),
    /// One of the fallback labels
    Fallback(&'static Encoding),
    /// A Latin-1 fallback label, decoded byte for byte
    Latin1,
}

impl std::fmt::Display for DecodedWith {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodedWith::Utf8 => write!(f, "UTF-8"),
            DecodedWith::Detected(enc) => write!(f, "{} (detected)", enc.name()),
            DecodedWith::Fallback(enc) => write!(f, "{} (fallback)", enc.name()),
            DecodedWith::Latin1 => write!(f, "ISO-8859-1 (fallback)"),
        }
    }
}

/// A detector guess with a normalised confidence.
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    pub encoding: &'static Encoding,
    pub confidence: f32,
}

/// Ask chardetng for the most likely legacy encoding.
pub fn detect_encoding(bytes: &[u8]) -> Detection {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let (encoding, confident) = detector.guess_assess(None, true);
    Detection {
        encoding,
        confidence: if confident {
            CONFIDENT_SCORE
        } else {
            TENTATIVE_SCORE
        },
    }
}

/// Decode raw entry bytes into text.
///
/// `name` only labels the error. Returns [`Error::Undecodable`] once every
/// stage has failed.
pub fn decode_entry(
    name: &str,
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<(String, DecodedWith)> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        return Ok((text.to_string(), DecodedWith::Utf8));
    }

    if options.detect {
        let detection = detect_encoding(bytes);
        if detection.confidence > options.min_confidence {
            if let Some(text) = decode_strict(detection.encoding, bytes) {
                return Ok((text, DecodedWith::Detected(detection.encoding)));
            }
        } else {
            log::debug!(
                "{}: detector guess {} below confidence threshold",
                name,
                detection.encoding.name()
            );
        }
    }

    for label in &options.fallback_labels {
        if is_latin1_label(label) {
            return Ok((decode_latin1(bytes), DecodedWith::Latin1));
        }
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            log::debug!("{}: unknown fallback encoding label {}", name, label);
            continue;
        };
        if let Some(text) = decode_strict(encoding, bytes) {
            return Ok((text, DecodedWith::Fallback(encoding)));
        }
    }

    Err(Error::Undecodable(name.to_string()))
}

fn is_latin1_label(label: &str) -> bool {
    matches!(
        label.trim().to_ascii_lowercase().as_str(),
        "latin1" | "latin-1" | "l1" | "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "iso88591"
    )
}

/// ISO-8859-1 never fails: bytes 0x00-0xFF map to U+0000-U+00FF.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decode without replacement characters; `None` on any malformed sequence.
fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_first() {
        let (text, with) =
            decode_entry("a.xml", "Grüße".as_bytes(), &DecodeOptions::default()).unwrap();
        assert_eq!(text, "Grüße");
        assert_eq!(with, DecodedWith::Utf8);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let bytes = b"\xEF\xBB\xBF<PcGts/>";
        let (text, _) = decode_entry("a.xml", bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(text, "<PcGts/>");
    }

    #[test]
    fn test_latin1_fallback() {
        // "Grüße" in ISO-8859-1
        let bytes = b"Gr\xFC\xDFe";
        let options = DecodeOptions::new().with_detection(false);
        let (text, with) = decode_entry("a.xml", bytes, &options).unwrap();
        assert_eq!(text, "Grüße");
        assert_eq!(with, DecodedWith::Latin1);
    }

    #[test]
    fn test_latin1_keeps_c1_controls() {
        let bytes = b"\x93quoted\x94";
        let options = DecodeOptions::new().with_detection(false);
        let (text, _) = decode_entry("a.xml", bytes, &options).unwrap();
        assert_eq!(text, "\u{93}quoted\u{94}");

        let options = options.with_fallbacks(["cp1252"]);
        let (text, with) = decode_entry("a.xml", bytes, &options).unwrap();
        assert_eq!(text, "\u{201c}quoted\u{201d}");
        assert!(matches!(with, DecodedWith::Fallback(_)));
    }

    #[test]
    fn test_default_fallbacks() {
        assert_eq!(
            DecodeOptions::default().fallback_labels,
            vec!["latin-1", "cp1252", "iso-8859-1"]
        );
    }

    #[test]
    fn test_legacy_bytes_always_decode_with_defaults() {
        let bytes = b"<Unicode>Stra\xDFe \xE9t\xE9 na\xEFve</Unicode>";
        assert!(decode_entry("a.xml", bytes, &DecodeOptions::default()).is_ok());
    }

    #[test]
    fn test_undecodable_when_chain_exhausted() {
        let bytes = b"\xFF\xFE\xFD invalid";
        let options = DecodeOptions::new()
            .with_detection(false)
            .with_fallbacks(Vec::<String>::new());
        let err = decode_entry("p/page/bad.xml", bytes, &options).unwrap_err();
        assert!(matches!(err, Error::Undecodable(name) if name == "p/page/bad.xml"));
    }

    #[test]
    fn test_unknown_fallback_label_is_skipped() {
        let bytes = b"caf\xE9";
        let options = DecodeOptions::new()
            .with_detection(false)
            .with_fallbacks(["no-such-encoding", "cp1252"]);
        let (text, _) = decode_entry("a.xml", bytes, &options).unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn test_threshold_above_one_disables_detector() {
        let bytes = b"caf\xE9";
        let options = DecodeOptions::new()
            .with_min_confidence(1.0)
            .with_fallbacks(Vec::<String>::new());
        assert!(decode_entry("a.xml", bytes, &options).is_err());
    }
}
