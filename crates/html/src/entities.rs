//! Character reference decoding for attribute values.

use memchr::memchr;
use std::borrow::Cow;

/// Decode character references in an attribute value with the HTML5
/// attribute-value rules.
///
/// Contract:
/// - Values without `&` are returned as-is, still borrowed.
/// - Every named reference from the HTML5 table decodes. Legacy names without
///   a trailing `;` decode unless followed by an ASCII alphanumeric or `=`.
/// - Numeric references decode with or without the trailing `;`; invalid code
///   points become U+FFFD.
/// - Anything else is kept literally.
pub(crate) fn decode_entities(raw: Cow<'_, str>) -> Cow<'_, str> {
    if memchr(b'&', raw.as_bytes()).is_none() {
        return raw;
    }
    htmlize::unescape_attribute(raw)
}
