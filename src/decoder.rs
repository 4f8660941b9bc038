use crate::error::{Error, Result};
use bytes::Bytes;
use encoding_rs::SHIFT_JIS;
use flate2::read::{DeflateDecoder, GzDecoder};
use std::io::Read;

pub const ENC_IDENTITY: &str = "identity";
pub const ENC_GZIP: &str = "gzip";
pub const ENC_DEFLATE: &str = "deflate";
pub const ENC_ZSTD: &str = "zstd";

fn decode_gzip(data: &[u8]) -> Result<Bytes> {
    let mut decoder = GzDecoder::new(data);
    let mut decoded = Vec::new();
    decoder
        .read_to_end(&mut decoded)
        .map_err(|e| Error::Decode(format!("gzip: {e}")))?;
    Ok(Bytes::from(decoded))
}

fn decode_deflate(data: &[u8]) -> Result<Bytes> {
    let mut decoder = DeflateDecoder::new(data);
    let mut decoded = Vec::new();
    decoder
        .read_to_end(&mut decoded)
        .map_err(|e| Error::Decode(format!("deflate: {e}")))?;
    Ok(Bytes::from(decoded))
}

fn decode_zstd(data: &[u8]) -> Result<Bytes> {
    let decoded = zstd::decode_all(data).map_err(|e| Error::Decode(format!("zstd: {e}")))?;
    Ok(Bytes::from(decoded))
}

/// Undoes `Content-Encoding` and turns the body into text.
///
/// Unknown encodings pass through untouched. Text is UTF-8, then Shift_JIS,
/// then lossy UTF-8, so only a corrupt compressed stream is an error.
pub fn decode_body(data: &[u8], content_encoding: Option<&str>) -> Result<String> {
    let encoding = content_encoding
        .map(|e| e.trim().to_ascii_lowercase())
        .unwrap_or_else(|| ENC_IDENTITY.to_string());

    let body_bytes = match encoding.as_str() {
        ENC_GZIP => decode_gzip(data)?,
        ENC_DEFLATE => decode_deflate(data)?,
        ENC_ZSTD => decode_zstd(data)?,
        _ => Bytes::copy_from_slice(data),
    };

    Ok(bytes_to_text(&body_bytes))
}

fn bytes_to_text(data: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(data) {
        return s.to_string();
    }
    let (text, _, had_errors) = SHIFT_JIS.decode(data);
    if !had_errors {
        return text.into_owned();
    }
    tracing::debug!("body is neither utf8 nor shift-jis, decoding lossily");
    String::from_utf8_lossy(data).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;
    use flate2::write::{DeflateEncoder, GzEncoder};
    use std::io::Write;

    #[test]
    fn decode_gzip_should_return_correct_string() {
        let data = vec![
            31, 139, 8, 0, 0, 0, 0, 0, 0, 255, 43, 73, 45, 46, 137, 55, 52, 50, 6, 0, 21, 191, 53,
            241, 8, 0, 0, 0,
        ];
        let result = decode_body(&data, Some(ENC_GZIP)).unwrap();
        assert_eq!(result, "test_123");
    }

    #[test]
    fn decode_deflate_should_return_correct_string() {
        let data = vec![43, 73, 45, 46, 137, 55, 52, 50, 6, 0];
        let result = decode_body(&data, Some(ENC_DEFLATE)).unwrap();
        assert_eq!(result, "test_123");
    }

    #[test]
    fn decode_zstd_should_return_correct_string() {
        let data = vec![
            40, 181, 47, 253, 0, 88, 65, 0, 0, 116, 101, 115, 116, 95, 49, 50, 51,
        ];
        let result = decode_body(&data, Some(ENC_ZSTD)).unwrap();
        assert_eq!(result, "test_123");
    }

    #[test]
    fn decode_should_pass_plain_utf8_through() {
        let data = "{\"name\":\"世界\"}".as_bytes();
        assert_eq!(decode_body(data, None).unwrap(), "{\"name\":\"世界\"}");
    }

    #[test]
    fn decode_should_ignore_case_and_whitespace_in_encoding() {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"{\"id\":3}").unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode_body(&compressed, Some(" GZip ")).unwrap(), "{\"id\":3}");
    }

    #[test]
    fn decode_should_pass_unknown_encoding_through() {
        assert_eq!(decode_body(b"test data", Some("br")).unwrap(), "test data");
    }

    #[test]
    fn decode_should_fall_back_to_shift_jis() {
        // "テスト" in Shift_JIS
        let data = [0x83, 0x65, 0x83, 0x58, 0x83, 0x67];
        assert_eq!(decode_body(&data, None).unwrap(), "テスト");
    }

    #[test]
    fn decode_should_keep_undecodable_bytes_lossily() {
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xfe];
        let text = decode_body(&png, None).unwrap();
        assert!(text.contains("PNG"));
        assert!(text.contains('\u{fffd}'));

        let latin1 = decode_body(b"caf\xe9", None).unwrap();
        assert!(latin1.starts_with("caf"));
    }

    #[test]
    fn decode_corrupted_data_should_fail() {
        let corrupted = vec![31, 139, 8, 0, 0, 0, 0, 0, 0, 255, 1, 2, 3];
        assert!(matches!(
            decode_body(&corrupted, Some(ENC_GZIP)),
            Err(Error::Decode(_))
        ));
        assert!(decode_body(&[1, 2, 3, 4, 5], Some(ENC_ZSTD)).is_err());
    }

    #[test]
    fn deflate_roundtrip() {
        let original = "Hello, World! This is a test string for compression.";
        let mut encoder = DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(original.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode_body(&compressed, Some(ENC_DEFLATE)).unwrap(), original);
    }
}
