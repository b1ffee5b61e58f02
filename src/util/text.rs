use std::{collections::HashSet, str::FromStr};

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

const NUMBER_ESCAPE_CHAR: &[char] = &['%', ',', ' ', '"', '\n', '\r', '\t'];

/// Converts a GBK encoded byte slice to a UTF-8 `String`.
///
/// qt.gtimg.cn and hq.sinajs.cn answer with GBK bodies regardless of the
/// `Accept-Charset` header. Malformed sequences are replaced, not rejected.
///
/// # Arguments
///
/// * `data: &[u8]`: The raw response body.
///
/// # Returns
///
/// * `String`: The decoded text.
pub fn gbk_2_utf8(data: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::GBK.decode(data);
    if had_errors {
        crate::logging::debug_file_async(format!(
            "GBK decode replaced malformed sequences in {} bytes",
            data.len()
        ));
    }

    text.into_owned()
}

/// Parses a decimal value from a given string.
///
/// This function accepts a string representation of a decimal number,
/// potentially containing commas as thousands separators and other escape characters,
/// and attempts to convert it into a `Decimal`. If the conversion fails, an error is returned.
///
/// # Arguments
///
/// * `s`: A string slice containing the representation of a decimal number.
/// * `escape_chars`: Optional characters to be escaped from the input string.
///
/// # Example
///
/// ```
/// let s = "1,234.56";
/// let decimal_value = parse_decimal(s, None).unwrap();
/// ```
pub fn parse_decimal(s: &str, escape_chars: Option<Vec<char>>) -> Result<Decimal> {
    let cleaned = clean_escape_chars(s, escape_chars);
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}

/// Parses a decimal that may legitimately be missing.
///
/// Empty, unparseable or negative values collapse to zero, which the quote
/// model reads as "unknown".
pub fn parse_decimal_or_zero(s: &str) -> Decimal {
    match parse_decimal(s, None) {
        Ok(d) if d > Decimal::ZERO => d.normalize(),
        _ => Decimal::ZERO,
    }
}

/// Removes a set of escape characters from a given string.
///
/// # Arguments
///
/// * `s`: The original string from which escape characters will be removed.
/// * `escape_chars`: Optional characters that will be removed from the
///   string if found, on top of the default number escape characters.
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}
