//! Listing fingerprints.
//!
//! A fingerprint is `hex(BLAKE3(canonical_json(listing)))`, where the
//! canonical form sorts object keys and drops all insignificant whitespace.
//! Two listings with equal fingerprints are byte-identical once serialized.

use crate::error::SchemaError;
use crate::model::Listing;

/// Computes the fingerprint of a listing.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
///
/// # Example
/// ```
/// use apicompat_core::model::{Listing, TypeDescriptor};
/// use apicompat_core::hash::listing_fingerprint;
///
/// let listing = Listing::new("Lib").with_type(TypeDescriptor::class("Lib.Foo"));
/// let hash = listing_fingerprint(&listing).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn listing_fingerprint(listing: &Listing) -> Result<String, SchemaError> {
    let value = listing.to_value()?;
    let canonical = canonicalize_json(&value);
    Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
}

/// Serializes a JSON value with sorted keys and no whitespace.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::Value::String(key.clone()).to_string());
                out.push(':');
                write_value(&map[key], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
