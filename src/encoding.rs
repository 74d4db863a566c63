//! User-data encodings
//!
//! Cloud APIs differ in what they accept: some take the document as-is,
//! EC2-style APIs want base64, and size-limited ones benefit from gzip.
//! cloud-init detects and decompresses gzip user-data itself.

use crate::BootstrapError;
use base64::Engine;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

/// How rendered user-data is encoded for delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// The document text unchanged
    #[default]
    Plain,
    /// Standard base64 of the document
    Base64,
    /// Standard base64 of the gzip-compressed document
    GzipBase64,
}

impl Encoding {
    /// Encode user-data
    pub fn encode(self, user_data: &str) -> Result<String, BootstrapError> {
        match self {
            Encoding::Plain => Ok(user_data.to_string()),
            Encoding::Base64 => Ok(base64::engine::general_purpose::STANDARD.encode(user_data)),
            Encoding::GzipBase64 => {
                let compressed = gzip(user_data.as_bytes())?;
                Ok(base64::engine::general_purpose::STANDARD.encode(compressed))
            }
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Plain => write!(f, "plain"),
            Encoding::Base64 => write!(f, "base64"),
            Encoding::GzipBase64 => write!(f, "gzip-base64"),
        }
    }
}

fn gzip(data: &[u8]) -> Result<Vec<u8>, BootstrapError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .map_err(|e| BootstrapError::Encoding(format!("gzip failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| BootstrapError::Encoding(format!("gzip failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    const DOC: &str = "#cloud-config\npackages:\n - git\n";

    #[test]
    fn test_plain_unchanged() {
        assert_eq!(Encoding::Plain.encode(DOC).unwrap(), DOC);
    }

    #[test]
    fn test_base64() {
        let encoded = Encoding::Base64.encode(DOC).unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, DOC.as_bytes());
    }

    #[test]
    fn test_gzip_base64() {
        let encoded = Encoding::GzipBase64.encode(DOC).unwrap();
        let compressed = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();

        // gzip magic number
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut text = String::new();
        decoder.read_to_string(&mut text).unwrap();
        assert_eq!(text, DOC);
    }

    #[test]
    fn test_display() {
        assert_eq!(Encoding::GzipBase64.to_string(), "gzip-base64");
        assert_eq!(Encoding::default(), Encoding::Plain);
    }
}
