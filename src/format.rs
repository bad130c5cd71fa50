//! Number formatting for substituted values
//!
//! Formats are written the same way everywhere: after the colon of a marker
//! (`{hil_ts:.6}`), in the `[format]` table of a parameter file, and on the
//! command line.
//!
//! | spec            | format                       | `1500.25` renders as |
//! |-----------------|------------------------------|----------------------|
//! | `shortest`      | shortest round-trip decimal  | `1500.25`            |
//! | `.2` or `.2f`   | two fractional digits        | `1500.25`            |
//! | `.3e`           | scientific, three digits     | `1.500e3`            |
//! | `e`             | shortest scientific          | `1.50025e3`          |
//!
//! Output never depends on the locale.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest precision accepted in a format spec
pub const MAX_PRECISION: usize = 32;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid number format '{spec}': {reason}")]
pub struct FormatSpecError {
    pub spec: String,
    pub reason: String,
}

impl FormatSpecError {
    fn new(spec: &str, reason: impl Into<String>) -> Self {
        Self {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// How numeric values are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// Integers as-is, floats as the shortest decimal that round-trips.
    /// Never uses exponent notation.
    #[default]
    Shortest,
    /// Fixed number of fractional digits
    Fixed(usize),
    /// Exponent notation, optionally with a fixed number of mantissa digits
    Scientific(Option<usize>),
}

impl NumberFormat {
    /// Format a floating-point value
    pub fn format_float(&self, value: f64) -> String {
        match *self {
            NumberFormat::Shortest => format!("{}", value),
            NumberFormat::Fixed(precision) => format!("{:.*}", precision, value),
            NumberFormat::Scientific(None) => format!("{:e}", value),
            NumberFormat::Scientific(Some(precision)) => format!("{:.*e}", precision, value),
        }
    }

    /// Format an integer value
    ///
    /// Fixed precisions pad the exact digits with zeros; scientific
    /// formats convert to floating point first.
    pub fn format_integer(&self, value: i64) -> String {
        match *self {
            NumberFormat::Shortest | NumberFormat::Fixed(0) => value.to_string(),
            NumberFormat::Fixed(precision) => format!("{}.{}", value, "0".repeat(precision)),
            NumberFormat::Scientific(_) => self.format_float(value as f64),
        }
    }
}

impl FromStr for NumberFormat {
    type Err = FormatSpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let trimmed = spec.trim();
        match trimmed {
            "" | "shortest" => return Ok(NumberFormat::Shortest),
            "e" => return Ok(NumberFormat::Scientific(None)),
            _ => {}
        }

        let Some(rest) = trimmed.strip_prefix('.') else {
            return Err(FormatSpecError::new(
                spec,
                "expected 'shortest', 'e', '.N', '.Nf' or '.Ne'",
            ));
        };

        let (digits, scientific) = if let Some(d) = rest.strip_suffix('e') {
            (d, true)
        } else if let Some(d) = rest.strip_suffix('f') {
            (d, false)
        } else {
            (rest, false)
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatSpecError::new(spec, "precision must be a number"));
        }
        let precision: usize = digits
            .parse()
            .map_err(|_| FormatSpecError::new(spec, "precision must be a number"))?;
        if precision > MAX_PRECISION {
            return Err(FormatSpecError::new(
                spec,
                format!("precision is limited to {}", MAX_PRECISION),
            ));
        }

        Ok(if scientific {
            NumberFormat::Scientific(Some(precision))
        } else {
            NumberFormat::Fixed(precision)
        })
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberFormat::Shortest => write!(f, "shortest"),
            NumberFormat::Fixed(p) => write!(f, ".{}", p),
            NumberFormat::Scientific(None) => write!(f, "e"),
            NumberFormat::Scientific(Some(p)) => write!(f, ".{}e", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortest_has_no_exponent() {
        let fmt = NumberFormat::Shortest;
        assert_eq!(fmt.format_float(0.001), "0.001");
        assert_eq!(fmt.format_float(157.08), "157.08");
        assert_eq!(fmt.format_float(0.00005), "0.00005");
        assert_eq!(fmt.format_float(2.0), "2");
    }

    #[test]
    fn test_shortest_integer() {
        assert_eq!(NumberFormat::Shortest.format_integer(8), "8");
        assert_eq!(NumberFormat::Shortest.format_integer(-4096), "-4096");
    }

    #[test]
    fn test_fixed_precision() {
        assert_eq!(NumberFormat::Fixed(3).format_float(0.1), "0.100");
        assert_eq!(NumberFormat::Fixed(0).format_float(2.4), "2");
        assert_eq!(NumberFormat::Fixed(2).format_integer(8), "8.00");
        assert_eq!(NumberFormat::Fixed(2).format_integer(-3), "-3.00");
    }

    #[test]
    fn test_fixed_integer_is_exact_beyond_f64() {
        let big = 9_007_199_254_740_993;
        assert_eq!(NumberFormat::Fixed(0).format_integer(big), "9007199254740993");
        assert_eq!(NumberFormat::Fixed(1).format_integer(big), "9007199254740993.0");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(NumberFormat::Scientific(Some(3)).format_float(1500.0), "1.500e3");
        assert_eq!(NumberFormat::Scientific(None).format_float(0.001), "1e-3");
    }

    #[test]
    fn test_parse_specs() {
        assert_eq!("".parse(), Ok(NumberFormat::Shortest));
        assert_eq!("shortest".parse(), Ok(NumberFormat::Shortest));
        assert_eq!(".6".parse(), Ok(NumberFormat::Fixed(6)));
        assert_eq!(".6f".parse(), Ok(NumberFormat::Fixed(6)));
        assert_eq!(".2e".parse(), Ok(NumberFormat::Scientific(Some(2))));
        assert_eq!("e".parse(), Ok(NumberFormat::Scientific(None)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("zz".parse::<NumberFormat>().is_err());
        assert!(".".parse::<NumberFormat>().is_err());
        assert!(".xf".parse::<NumberFormat>().is_err());
        assert!(".99".parse::<NumberFormat>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for fmt in [
            NumberFormat::Shortest,
            NumberFormat::Fixed(4),
            NumberFormat::Scientific(None),
            NumberFormat::Scientific(Some(1)),
        ] {
            assert_eq!(fmt.to_string().parse(), Ok(fmt));
        }
    }
}
