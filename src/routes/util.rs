//! Request parameter plumbing for the command surface.
//!
//! Commands arrive as URL-encoded form bodies or query strings
//! (`barcode=...&today=...`). Values are percent-decoded as UTF-8 —
//! product names and failure messages are not ASCII-safe.

use std::collections::HashMap;

pub type Params = HashMap<String, String>;

/// Parse `key=value&key2=value2` into a map. Later duplicates win.
pub fn form_params(body: &str) -> Params {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (percent_decode(k), percent_decode(v)),
            None => (percent_decode(pair), String::new()),
        })
        .collect()
}

/// Parse a query string, tolerating a leading `?`.
pub fn query_params(query: &str) -> Params {
    form_params(query.strip_prefix('?').unwrap_or(query))
}

/// Required parameter; the `Err` is a ready-made message for an error
/// reply.
pub fn require<'a>(params: &'a Params, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing parameter: {key}"))
}

/// Percent-decode into UTF-8. `+` reads as space; malformed escapes are
/// kept verbatim rather than dropped.
pub fn percent_decode(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let decoded = bytes.get(i + 1..i + 3).and_then(|pair| {
                    let hi = (pair[0] as char).to_digit(16)?;
                    let lo = (pair[1] as char).to_digit(16)?;
                    Some((hi * 16 + lo) as u8)
                });
                match decoded {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
