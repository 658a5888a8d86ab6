//! Image payloads coming from the UI

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Decoded `data:<mime>;base64,<payload>` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl InlineImage {
    /// File extension matching the content type, `bin` when unknown
    pub fn extension(&self) -> &'static str {
        mime_guess::get_mime_extensions_str(&self.content_type)
            .and_then(|exts| exts.first().copied())
            .unwrap_or("bin")
    }
}

pub fn is_data_url(value: &str) -> bool {
    value.starts_with("data:")
}

/// `None` when `value` is not a base64 data URL or the payload is corrupt
pub fn parse_data_url(value: &str) -> Option<InlineImage> {
    let rest = value.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let content_type = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some(InlineImage {
        bytes,
        content_type: if content_type.is_empty() {
            "application/octet-stream".to_string()
        } else {
            content_type.to_string()
        },
    })
}

/// Content type guessed from a file name
pub fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base64_data_url() {
        let image = parse_data_url("data:image/png;base64,iVBORw0K").unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(&image.bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert_eq!(image.extension(), "png");
    }

    #[test]
    fn rejects_plain_urls_and_bad_payloads() {
        assert!(parse_data_url("https://cdn/x.png").is_none());
        assert!(parse_data_url("data:image/png,raw").is_none());
        assert!(parse_data_url("data:image/png;base64,@@@").is_none());
    }

    #[test]
    fn guesses_content_type_from_name() {
        assert_eq!(content_type_for("foto.JPG"), "image/jpeg");
        assert_eq!(content_type_for("archivo"), "application/octet-stream");
    }
}
