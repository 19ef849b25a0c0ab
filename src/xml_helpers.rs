//! Shared XML attribute helpers for the XLSX reader.

use quick_xml::events::BytesStart;

/// Extract a string attribute value by key.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

/// Extract a string attribute by local name (ignoring namespace prefix).
///
/// Needed for `r:id`, whose prefix varies between producers.
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

/// Extract a raw attribute value by key without UTF-8 conversion.
pub fn attr_bytes(e: &BytesStart, key: &[u8]) -> Option<Vec<u8>> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| attr.value.into_owned())
}
