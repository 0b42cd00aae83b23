//! Path segment encoding

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a value for use as a single URL path segment.
///
/// Names such as the default vhost `"/"` must become `"%2F"` so they form one
/// segment instead of introducing extra path structure. Spaces become `%20`
/// and non-ASCII characters are escaped byte-wise from their UTF-8 encoding.
///
/// ```
/// use rabbitmq_http_client::encode_path_segment;
///
/// assert_eq!(encode_path_segment("/"), "%2F");
/// assert_eq!(encode_path_segment("http created"), "http%20created");
/// ```
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
