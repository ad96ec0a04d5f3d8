//! Defensive coercion for loosely-typed client payloads.
//!
//! The browser client treats the server as an untyped source and vice versa:
//! numbers may arrive as strings with mixed decimal separators, image fields
//! may be bare base64, data URIs or URLs. Everything funnels through here so
//! the handlers only ever see clean values.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

pub const IMAGE_PLACEHOLDER: &str = "/placeholder.svg";

/// Parse a number that may use `.` or `,` as decimal or thousands separator.
/// When both appear, the rightmost one is taken as the decimal point.
pub fn parse_loose_f64(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let cleaned = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => s.replace(',', ""),
        (Some(_), Some(_)) => s.replace('.', "").replace(',', "."),
        (None, Some(_)) if s.matches(',').count() == 1 => s.replace(',', "."),
        (None, Some(_)) => s.replace(',', ""),
        _ => s.to_string(),
    };
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_loose_i64(raw: &str) -> Option<i64> {
    parse_loose_f64(raw).map(|v| v.trunc() as i64)
}

/// A stored total of zero (or garbage) falls back to the recomputed value.
pub fn coerce_total(total: f64, quantity: i64, unit_price: f64) -> f64 {
    if total.is_finite() && total != 0.0 {
        total
    } else {
        quantity as f64 * unit_price
    }
}

/// Normalize an image field to one renderable form:
/// data URIs, http(s) URLs and upload paths pass through, bare base64 gains
/// a data-URI prefix, anything unrecognized or implausibly short is dropped
/// (callers substitute [`IMAGE_PLACEHOLDER`]).
pub fn normalize_image(raw: &str) -> Option<String> {
    lazy_static! {
        static ref BASE64_RE: Regex = Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").unwrap();
    }

    let trimmed = raw.trim();
    if trimmed.len() < 20 {
        return None;
    }
    if trimmed.starts_with("data:image")
        || trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with('/')
    {
        return Some(trimmed.to_string());
    }

    // Sample the prefix only; full blobs can be megabytes.
    let sample: String = trimmed.chars().take(100).collect();
    if BASE64_RE.is_match(&sample) {
        let cleaned: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        return Some(format!("data:image/jpeg;base64,{cleaned}"));
    }

    None
}

// ---- serde helpers ----

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Int(v) => Some(*v as f64),
            LooseNumber::Float(v) => Some(*v).filter(|v| v.is_finite()),
            LooseNumber::Text(s) => parse_loose_f64(s),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            LooseNumber::Int(v) => Some(*v),
            LooseNumber::Float(v) => Some(v.trunc() as i64).filter(|_| v.is_finite()),
            LooseNumber::Text(s) => parse_loose_i64(s),
        }
    }
}

pub fn flexible_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    LooseNumber::deserialize(d)?
        .as_f64()
        .ok_or_else(|| serde::de::Error::custom("expected a number"))
}

pub fn flexible_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    LooseNumber::deserialize(d)?
        .as_i64()
        .ok_or_else(|| serde::de::Error::custom("expected an integer"))
}

pub fn flexible_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match Option::<LooseNumber>::deserialize(d)? {
        None => Ok(None),
        Some(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected a number")),
    }
}

pub fn flexible_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<LooseNumber>::deserialize(d)? {
        None => Ok(None),
        Some(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected an integer")),
    }
}

/// Like [`flexible_i64`] but bounded to the width of the backing column,
/// so an oversized count can never wrap on its way into storage.
pub fn flexible_i32<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let n = LooseNumber::deserialize(d)?
        .as_i64()
        .ok_or_else(|| serde::de::Error::custom("expected an integer"))?;
    i32::try_from(n).map_err(|_| serde::de::Error::custom("integer out of range"))
}

pub fn flexible_opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    match Option::<LooseNumber>::deserialize(d)? {
        None => Ok(None),
        Some(n) => {
            let v = n
                .as_i64()
                .ok_or_else(|| serde::de::Error::custom("expected an integer"))?;
            i32::try_from(v)
                .map(Some)
                .map_err(|_| serde::de::Error::custom("integer out of range"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_numbers_accept_both_separators() {
        assert_eq!(parse_loose_f64("50000"), Some(50000.0));
        assert_eq!(parse_loose_f64(" 1234.5 "), Some(1234.5));
        assert_eq!(parse_loose_f64("1234,5"), Some(1234.5));
        assert_eq!(parse_loose_f64("1.234,56"), Some(1234.56));
        assert_eq!(parse_loose_f64("1,234.56"), Some(1234.56));
        assert_eq!(parse_loose_f64("1,234,567"), Some(1234567.0));
        assert_eq!(parse_loose_f64(""), None);
        assert_eq!(parse_loose_f64("abc"), None);
    }

    #[test]
    fn loose_integers_truncate() {
        assert_eq!(parse_loose_i64("3"), Some(3));
        assert_eq!(parse_loose_i64("3.9"), Some(3));
        assert_eq!(parse_loose_i64("x"), None);
    }

    #[test]
    fn zero_total_falls_back_to_recomputed() {
        assert_eq!(coerce_total(150000.0, 3, 50000.0), 150000.0);
        assert_eq!(coerce_total(0.0, 3, 50000.0), 150000.0);
        assert_eq!(coerce_total(f64::NAN, 2, 10.0), 20.0);
    }

    #[test]
    fn image_urls_pass_through() {
        let url = "https://cdn.example.com/p/product_1.png";
        assert_eq!(normalize_image(url).as_deref(), Some(url));
        let path = "/uploads/products/product_a_1.jpg";
        assert_eq!(normalize_image(path).as_deref(), Some(path));
        let data = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg";
        assert_eq!(normalize_image(data).as_deref(), Some(data));
    }

    #[test]
    fn bare_base64_gains_a_data_uri_prefix() {
        let blob = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAA=";
        let got = normalize_image(blob).unwrap();
        assert_eq!(got, format!("data:image/jpeg;base64,{blob}"));
    }

    #[test]
    fn short_or_garbage_images_are_dropped() {
        assert_eq!(normalize_image(""), None);
        assert_eq!(normalize_image("short.png"), None);
        assert_eq!(normalize_image("!!not base64 at all, not a url!!"), None);
    }

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "flexible_f64")]
        price: f64,
        #[serde(default, deserialize_with = "flexible_opt_i64")]
        qty: Option<i64>,
    }

    #[derive(Debug, Deserialize)]
    struct Bounded {
        #[serde(deserialize_with = "flexible_i32")]
        count: i32,
        #[serde(default, deserialize_with = "flexible_opt_i32")]
        extra: Option<i32>,
    }

    #[test]
    fn bounded_integers_reject_values_past_i32() {
        let b: Bounded = serde_json::from_str(r#"{"count": 2147483647}"#).unwrap();
        assert_eq!(b.count, i32::MAX);
        assert_eq!(b.extra, None);

        // one past i32::MAX must fail, not wrap negative
        assert!(serde_json::from_str::<Bounded>(r#"{"count": 2147483648}"#).is_err());
        assert!(serde_json::from_str::<Bounded>(r#"{"count": 1, "extra": -3000000000}"#).is_err());

        let b: Bounded = serde_json::from_str(r#"{"count": "12", "extra": "7"}"#).unwrap();
        assert_eq!(b.count, 12);
        assert_eq!(b.extra, Some(7));
    }

    #[test]
    fn serde_helpers_accept_numbers_and_strings() {
        let p: Probe = serde_json::from_str(r#"{"price": 50000, "qty": "3"}"#).unwrap();
        assert_eq!(p.price, 50000.0);
        assert_eq!(p.qty, Some(3));

        let p: Probe = serde_json::from_str(r#"{"price": "1.234,5"}"#).unwrap();
        assert_eq!(p.price, 1234.5);
        assert_eq!(p.qty, None);

        assert!(serde_json::from_str::<Probe>(r#"{"price": "nope"}"#).is_err());
    }
}
