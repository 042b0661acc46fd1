use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::{FailureKind, FetchError};

/// Decodes a page body to text.
///
/// Order of precedence: byte-order mark, then the `charset` parameter of the
/// Content-Type header, then a `chardetng` guess over the whole body.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<String, FetchError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches(['"', '\'']))
        } else {
            None
        }
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<String, FetchError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(FetchError::new(
            FailureKind::Decode {
                encoding: encoding.name().to_string(),
            },
            "malformed byte sequence",
        ));
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_parameter_is_case_insensitive_and_unquoted() {
        assert_eq!(charset_param("text/html; Charset=\"ISO-8859-1\""), Some("ISO-8859-1"));
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn declared_charset_is_honoured() {
        let text = decode_body(&[0x63, 0x61, 0x66, 0xE9], Some("text/html; charset=latin1")).unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn bom_wins_over_declared_charset() {
        let text = decode_body(&[0xEF, 0xBB, 0xBF, 0x6F, 0x6B], Some("text/html; charset=latin1")).unwrap();
        assert_eq!(text, "ok");
    }

    #[test]
    fn invalid_utf8_is_rejected_when_declared() {
        let err = decode_body(&[0x61, 0xC3], Some("text/html; charset=utf-8")).unwrap_err();
        assert_eq!(
            err.kind,
            FailureKind::Decode {
                encoding: "UTF-8".to_string()
            }
        );
    }
}
