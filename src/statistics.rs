//! Field comparison statistics
//!
//! A single pass over two index-aligned buffers folds every element whose
//! absolute value is below the ignore threshold into that file's running sum
//! and sum of squares. The squared difference at an index is folded in only
//! when both elements pass the threshold. Means and RMS values are derived
//! after the pass; a zero qualifying count is an error, never a NaN.

use crate::element::{format_g, Element, ElementType};
use crate::errors::{NcProbeError, Result};
use crate::reader::TypedBuffer;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Absolute-value cutoff at or above which elements are ignored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IgnoreThreshold(f64);

impl IgnoreThreshold {
    /// No exclusion
    pub const NONE: Self = Self(f64::INFINITY);

    /// Build a threshold, rejecting zero, negative and NaN values
    ///
    /// # Errors
    ///
    /// Returns a message suitable for a usage error.
    pub fn new(value: f64) -> std::result::Result<Self, String> {
        if value > 0.0 {
            Ok(Self(value))
        } else {
            Err("value to ignore must be greater than 0.0".to_string())
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether any finite cutoff is in effect
    #[must_use]
    pub fn is_set(self) -> bool {
        self.0.is_finite()
    }

    /// Strict test: a value equal to the threshold is excluded
    #[must_use]
    pub fn passes(self, value: f64) -> bool {
        value.abs() < self.0
    }
}

impl Default for IgnoreThreshold {
    fn default() -> Self {
        Self::NONE
    }
}

impl FromStr for IgnoreThreshold {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("expected a float for value to ignore, got {s}"))?;
        Self::new(value)
    }
}

/// Value parser for the `-i` option
///
/// # Errors
///
/// See [`IgnoreThreshold::from_str`].
pub fn parse_ignore_threshold(s: &str) -> std::result::Result<IgnoreThreshold, String> {
    s.parse()
}

/// Sum, sum of squares and count of the values folded so far
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStat {
    pub sum: f64,
    pub sum_sq: f64,
    pub count: usize,
}

impl RunningStat {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.sum_sq += value * value;
        self.count += 1;
    }

    /// Mean and RMS, or `None` when nothing was folded
    #[must_use]
    pub fn finish(&self) -> Option<FileSummary> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(FileSummary {
            mean: self.sum / n,
            rms: (self.sum_sq / n).sqrt(),
            count: self.count,
        })
    }
}

/// Running state of one field comparison
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    threshold: IgnoreThreshold,
    pub first: RunningStat,
    pub second: RunningStat,
    pub sum_sq_diff: f64,
    pub joint_count: usize,
}

impl Accumulator {
    #[must_use]
    pub fn new(threshold: IgnoreThreshold) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Fold one index-aligned pair
    pub fn push(&mut self, a: f64, b: f64) {
        let a_passes = self.threshold.passes(a);
        let b_passes = self.threshold.passes(b);
        if a_passes {
            self.first.push(a);
        }
        if b_passes {
            self.second.push(b);
        }
        if a_passes && b_passes {
            let d = a - b;
            self.sum_sq_diff += d * d;
            self.joint_count += 1;
        }
    }

    /// Fold two slices pairwise; the caller guarantees equal lengths
    pub fn accumulate<T: Element>(&mut self, a: &[T], b: &[T]) {
        debug_assert_eq!(a.len(), b.len());
        for (&x, &y) in a.iter().zip(b) {
            self.push(x.into(), y.into());
        }
    }

    /// Derive means, RMS values and the mean square difference
    ///
    /// # Errors
    ///
    /// [`NcProbeError::NoQualifyingElements`] if either file, or the pair of
    /// files jointly, contributed no element.
    pub fn finish(&self) -> Result<Summary> {
        let first = self
            .first
            .finish()
            .ok_or_else(|| no_qualifying("first file"))?;
        let second = self
            .second
            .finish()
            .ok_or_else(|| no_qualifying("second file"))?;
        if self.joint_count == 0 {
            return Err(no_qualifying("both files"));
        }
        Ok(Summary {
            first,
            second,
            mean_square_difference: self.sum_sq_diff / self.joint_count as f64,
            joint_count: self.joint_count,
        })
    }
}

fn no_qualifying(scope: &str) -> NcProbeError {
    NcProbeError::NoQualifyingElements {
        scope: scope.to_string(),
    }
}

/// Final statistics of one file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileSummary {
    pub mean: f64,
    pub rms: f64,
    pub count: usize,
}

/// Final statistics of one field comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub first: FileSummary,
    pub second: FileSummary,
    pub mean_square_difference: f64,
    pub joint_count: usize,
}

/// One side of a comparison: a file path and the values read from it
#[derive(Debug, Clone, Copy)]
pub struct Side<'a> {
    pub path: &'a str,
    pub values: &'a TypedBuffer,
}

/// Compare two buffers of the same field
///
/// # Errors
///
/// - [`NcProbeError::TypeMismatch`] if the buffers hold different types
/// - [`NcProbeError::ElementCountMismatch`] if their lengths differ
/// - [`NcProbeError::NoQualifyingElements`] from [`Accumulator::finish`]
pub fn compare_buffers(
    field: &str,
    first: Side<'_>,
    second: Side<'_>,
    threshold: IgnoreThreshold,
) -> Result<Summary> {
    let type_mismatch = || NcProbeError::TypeMismatch {
        var: field.to_string(),
        first: first.path.to_string(),
        second: second.path.to_string(),
    };
    if first.values.element_type() != second.values.element_type() {
        return Err(type_mismatch());
    }
    if first.values.len() != second.values.len() {
        return Err(NcProbeError::ElementCountMismatch {
            var: field.to_string(),
            first: first.path.to_string(),
            first_count: first.values.len(),
            second: second.path.to_string(),
            second_count: second.values.len(),
        });
    }

    let mut acc = Accumulator::new(threshold);
    match (first.values, second.values) {
        (TypedBuffer::Byte(a), TypedBuffer::Byte(b)) => acc.accumulate(a, b),
        (TypedBuffer::Char(a), TypedBuffer::Char(b)) => acc.accumulate(a, b),
        (TypedBuffer::Short(a), TypedBuffer::Short(b)) => acc.accumulate(a, b),
        (TypedBuffer::Int(a), TypedBuffer::Int(b)) => acc.accumulate(a, b),
        (TypedBuffer::Float(a), TypedBuffer::Float(b)) => acc.accumulate(a, b),
        (TypedBuffer::Double(a), TypedBuffer::Double(b)) => acc.accumulate(a, b),
        (TypedBuffer::UByte(a), TypedBuffer::UByte(b)) => acc.accumulate(a, b),
        (TypedBuffer::UShort(a), TypedBuffer::UShort(b)) => acc.accumulate(a, b),
        (TypedBuffer::UInt(a), TypedBuffer::UInt(b)) => acc.accumulate(a, b),
        _ => return Err(type_mismatch()),
    }

    debug!(
        "{}: {} of {} elements qualify in {}, {} in {}, {} jointly",
        field,
        acc.first.count,
        first.values.len(),
        first.path,
        acc.second.count,
        second.path,
        acc.joint_count
    );

    acc.finish()
}

/// Printable result of comparing one field across two files
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub field: String,
    pub element_type: ElementType,
    pub element_count: usize,
    pub first_path: String,
    pub second_path: String,
    pub threshold: IgnoreThreshold,
    pub summary: Summary,
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.threshold.is_set() {
            writeln!(
                f,
                "Ignoring values with absolute value >= {}",
                format_g(self.threshold.value())
            )?;
        }
        writeln!(
            f,
            "Field {}. {} {} elements",
            self.field,
            self.element_count,
            self.element_type.description()
        )?;
        let width = self
            .first_path
            .chars()
            .count()
            .max(self.second_path.chars().count());
        for (path, stats) in [
            (&self.first_path, &self.summary.first),
            (&self.second_path, &self.summary.second),
        ] {
            writeln!(
                f,
                "File {path:<width$}: mean = {} rms = {}",
                format_g(stats.mean),
                format_g(stats.rms)
            )?;
        }
        writeln!(
            f,
            "Mean square difference = {}",
            format_g(self.summary.mean_square_difference)
        )
    }
}
