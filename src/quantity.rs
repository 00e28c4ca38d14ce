//! Kubernetes-style resource quantities ("500m", "2Ki", "1.5G", "1e3").

use crate::error::{Result, TopologyError};

/// Gibibyte, used when presenting memory.
pub const GI: f64 = (1u64 << 30) as f64;

enum Scale {
    Milli,
    Times(f64),
}

fn scale_for(suffix: &str) -> Option<Scale> {
    let scale = match suffix {
        "" => Scale::Times(1.0),
        "m" => Scale::Milli,
        "k" => Scale::Times(1e3),
        "M" => Scale::Times(1e6),
        "G" => Scale::Times(1e9),
        "T" => Scale::Times(1e12),
        "P" => Scale::Times(1e15),
        "E" => Scale::Times(1e18),
        "Ki" => Scale::Times((1u64 << 10) as f64),
        "Mi" => Scale::Times((1u64 << 20) as f64),
        "Gi" => Scale::Times((1u64 << 30) as f64),
        "Ti" => Scale::Times((1u64 << 40) as f64),
        "Pi" => Scale::Times((1u64 << 50) as f64),
        "Ei" => Scale::Times((1u64 << 60) as f64),
        _ => return None,
    };
    Some(scale)
}

/// Parse a quantity string into its base unit (cores, bytes, count).
///
/// Whitespace is significant: `" 4"` is malformed.
pub fn parse_quantity(s: &str) -> Result<f64> {
    let malformed = || TopologyError::MalformedQuantity(s.to_string());
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut digits = int_end - i;
    i = int_end;
    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        digits += frac_end - (i + 1);
        i = frac_end;
    }
    if digits == 0 {
        return Err(malformed());
    }

    // An exponent needs at least one digit; a bare "E" is the exa suffix.
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    let (mantissa, suffix) = s.split_at(i);
    let scale = scale_for(suffix).ok_or_else(malformed)?;
    let value: f64 = mantissa.parse().map_err(|_| malformed())?;

    let value = match scale {
        Scale::Milli => value / 1000.0,
        Scale::Times(factor) => value * factor,
    };
    if !value.is_finite() {
        return Err(malformed());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_milli() {
        assert_eq!(parse_quantity("4").unwrap(), 4.0);
        assert_eq!(parse_quantity("500m").unwrap(), 0.5);
        assert_eq!(parse_quantity("100m").unwrap(), 0.1);
        assert_eq!(parse_quantity("0").unwrap(), 0.0);
    }

    #[test]
    fn test_decimal_suffixes() {
        assert_eq!(parse_quantity("1.5G").unwrap(), 1_500_000_000.0);
        assert_eq!(parse_quantity("3k").unwrap(), 3000.0);
        assert_eq!(parse_quantity("2M").unwrap(), 2_000_000.0);
        assert_eq!(parse_quantity("1T").unwrap(), 1e12);
        assert_eq!(parse_quantity("1P").unwrap(), 1e15);
        assert_eq!(parse_quantity("2E").unwrap(), 2e18);
    }

    #[test]
    fn test_binary_suffixes() {
        assert_eq!(parse_quantity("2Ki").unwrap(), 2048.0);
        assert_eq!(parse_quantity("100Mi").unwrap(), 104_857_600.0);
        assert_eq!(parse_quantity("32Gi").unwrap(), 32.0 * GI);
        assert_eq!(parse_quantity("1Ti").unwrap(), (1u64 << 40) as f64);
        assert_eq!(parse_quantity("1Ei").unwrap(), (1u64 << 60) as f64);
    }

    #[test]
    fn test_sign_fraction_and_exponent() {
        assert_eq!(parse_quantity("-2").unwrap(), -2.0);
        assert_eq!(parse_quantity("+3").unwrap(), 3.0);
        assert_eq!(parse_quantity(".5").unwrap(), 0.5);
        assert_eq!(parse_quantity("1e3").unwrap(), 1000.0);
        assert_eq!(parse_quantity("1E3").unwrap(), 1000.0);
        assert_eq!(parse_quantity("2e-1").unwrap(), 0.2);
        assert_eq!(parse_quantity("1e3Ki").unwrap(), 1_024_000.0);
    }

    #[test]
    fn test_overflow_is_malformed() {
        for input in ["1e400", "-1e400", "1e300Ei", "1e309m"] {
            assert!(
                matches!(parse_quantity(input), Err(TopologyError::MalformedQuantity(ref s)) if s == input),
                "{input:?} should not parse"
            );
        }
        assert_eq!(parse_quantity("1e300").unwrap(), 1e300);
    }

    #[test]
    fn test_malformed() {
        for input in ["", "m", "Ki", "abc", "1.2.3", "4 ", " 4", "5Xi", "1e", "+", "-.", "nan", "inf"] {
            match parse_quantity(input) {
                Err(TopologyError::MalformedQuantity(s)) => assert_eq!(s, input),
                other => panic!("{input:?} parsed as {other:?}"),
            }
        }
    }
}
