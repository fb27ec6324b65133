//! QR code for sharing the page.
//!
//! The page URL is passed in by the caller rather than discovered here,
//! so the encoder can be exercised with any fixed URL.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use qrcode::render::svg;
use qrcode::types::QrError as EncodeError;
use qrcode::{Color, EcLevel, QrCode, Version};
use tracing::debug;

/// Pixels per module.
const CELL_SIZE: u32 = 2;

/// Quiet-zone width in modules on each side.
const QUIET_ZONE_MODULES: u32 = 4;

/// Errors from QR generation.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    /// Payload could not be encoded (e.g. too long for any version)
    #[error("failed to encode QR payload: {0}")]
    Encode(#[from] EncodeError),
}

/// An encoded and rendered QR code.
#[derive(Debug, Clone)]
pub struct QrImage {
    /// The exact string that was encoded.
    pub payload: String,
    /// Symbol version picked by the encoder (1-40).
    pub version: i16,
    /// Width of the symbol in modules, excluding the quiet zone.
    pub width: usize,
    /// Module colours of the encoded symbol, row by row.
    pub modules: Vec<Color>,
    /// Rendered SVG document.
    pub svg: String,
}

impl QrImage {
    /// Rendered side length in pixels, including the quiet zone.
    pub fn pixel_size(&self) -> u32 {
        (self.width as u32 + 2 * QUIET_ZONE_MODULES) * CELL_SIZE
    }

    /// The SVG as a `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(&self.svg))
    }

    /// An `<img>` element showing the code.
    pub fn img_tag(&self) -> String {
        let size = self.pixel_size();
        format!(
            "<img src=\"{}\" width=\"{size}\" height=\"{size}\" alt=\"\"/>",
            self.data_uri()
        )
    }
}

/// Encode `url` at error-correction level L with the smallest version
/// that fits.
pub fn generate_qr(url: &str) -> Result<QrImage, QrError> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)?;

    let version = match code.version() {
        Version::Normal(n) | Version::Micro(n) => n,
    };

    let svg = code
        .render::<svg::Color>()
        .quiet_zone(true)
        .module_dimensions(CELL_SIZE, CELL_SIZE)
        .build();

    debug!(version, width = code.width(), "generated QR code");

    Ok(QrImage {
        payload: url.to_string(),
        version,
        width: code.width(),
        modules: code.to_colors(),
        svg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "http://aqhi.example.test/?station=edmonton";

    fn encode(data: &str) -> QrCode {
        QrCode::with_error_correction_level(data, EcLevel::L).unwrap()
    }

    #[test]
    fn payload_is_url_verbatim() {
        let image = generate_qr(PAGE_URL).unwrap();
        assert_eq!(image.payload, PAGE_URL);
    }

    #[test]
    fn symbol_encodes_url_verbatim() {
        let image = generate_qr(PAGE_URL).unwrap();
        let expected = encode(PAGE_URL);

        assert_eq!(image.width, expected.width());
        assert_eq!(image.modules, expected.to_colors());
    }

    #[test]
    fn symbol_differs_for_altered_url() {
        let image = generate_qr(PAGE_URL).unwrap();

        let trimmed = &PAGE_URL[..PAGE_URL.len() - 1];
        assert_ne!(image.modules, encode(trimmed).to_colors());
        assert_ne!(image.modules, encode(&PAGE_URL.to_uppercase()).to_colors());
    }

    #[test]
    fn symbol_uses_level_l() {
        let image = generate_qr(PAGE_URL).unwrap();
        let level_m = QrCode::with_error_correction_level(PAGE_URL, EcLevel::M).unwrap();

        assert_ne!(image.modules, level_m.to_colors());
    }

    #[test]
    fn short_url_uses_small_version() {
        let image = generate_qr("http://localhost:3000/").unwrap();

        // 22 bytes fit in version 2 at level L
        assert_eq!(image.version, 2);
        assert_eq!(image.width, 25);
    }

    #[test]
    fn longer_url_grows_version() {
        let short = generate_qr("http://a.test/").unwrap();
        let long = generate_qr(&format!("http://a.test/{}", "x".repeat(200))).unwrap();
        assert!(long.version > short.version);
        assert_eq!(long.width, 17 + 4 * long.version as usize);
    }

    #[test]
    fn renders_svg() {
        let image = generate_qr(PAGE_URL).unwrap();
        assert!(image.svg.contains("<svg"));
        assert!(image.svg.contains("</svg>"));
    }

    #[test]
    fn img_tag_embeds_data_uri() {
        let image = generate_qr(PAGE_URL).unwrap();
        let tag = image.img_tag();

        assert!(tag.starts_with("<img src=\"data:image/svg+xml;base64,"));
        let size = image.pixel_size().to_string();
        assert!(tag.contains(&format!("width=\"{size}\"")));
        assert!(tag.contains(&format!("height=\"{size}\"")));
    }

    #[test]
    fn data_uri_decodes_to_svg() {
        let image = generate_qr(PAGE_URL).unwrap();
        let uri = image.data_uri();
        let encoded = uri.trim_start_matches("data:image/svg+xml;base64,");
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), image.svg);
    }

    #[test]
    fn pixel_size_includes_quiet_zone() {
        let image = generate_qr("http://localhost:3000/").unwrap();
        assert_eq!(image.pixel_size(), (25 + 8) * 2);
    }

    #[test]
    fn oversized_payload_is_error() {
        let huge = "x".repeat(5000);
        assert!(matches!(generate_qr(&huge), Err(QrError::Encode(_))));
    }
}
