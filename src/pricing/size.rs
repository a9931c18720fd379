//! Billboard size parsing and orientation-insensitive matching.
//!
//! Sizes are stored as free text such as `"4x3"`, `"13 X 5"` or `"6×3"`.
//! Anything that does not parse as two positive numbers is treated as an
//! unmatched size, never as an error.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

static SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*[xX×*]\s*(\d+(?:\.\d+)?)\s*$")
        .expect("size pattern is a valid regex")
});

/// Parsed width and height of a billboard face, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillboardSize {
    pub width: Decimal,
    pub height: Decimal,
}

impl BillboardSize {
    /// Parse a `W x H` size string. Returns `None` for malformed or zero sizes.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = SIZE_PATTERN.captures(raw)?;
        let width = Decimal::from_str(caps.get(1)?.as_str()).ok()?;
        let height = Decimal::from_str(caps.get(2)?.as_str()).ok()?;

        // Area must be representable for print cost
        if width.is_zero() || height.is_zero() || width.checked_mul(height).is_none() {
            return None;
        }

        Some(Self {
            width: width.normalize(),
            height: height.normalize(),
        })
    }

    pub fn flipped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Face area in square meters.
    pub fn area(&self) -> Decimal {
        self.width * self.height
    }
}

/// How a stored size string relates to a requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMatch {
    Exact,
    Flipped,
}

/// Compare a stored size string against a requested one.
///
/// Exact string equality (after trimming) wins; otherwise both strings are
/// parsed and compared as dimensions in either orientation. Equal dimensions
/// written differently (`"4x3"` vs `"4 X 3"`) count as exact.
pub fn compare_sizes(candidate: &str, target: &str) -> Option<SizeMatch> {
    if candidate.trim() == target.trim() {
        return Some(SizeMatch::Exact);
    }

    let candidate = BillboardSize::parse(candidate)?;
    let target = BillboardSize::parse(target)?;

    if candidate == target {
        Some(SizeMatch::Exact)
    } else if candidate == target.flipped() {
        Some(SizeMatch::Flipped)
    } else {
        None
    }
}

/// Area of a size string, zero when it cannot be parsed.
pub fn area_of(raw: &str) -> Decimal {
    BillboardSize::parse(raw)
        .map(|size| size.area())
        .unwrap_or(Decimal::ZERO)
}
