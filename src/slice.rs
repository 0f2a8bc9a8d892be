//! Hyperslab requests built from command-line indices
//!
//! A caller names zero or more leading indices; every dimension they leave out
//! is read in full. The resulting [`SliceRequest`] is the only place element
//! counts are computed, so allocation, reading and printing always agree.

use crate::errors::{NcProbeError, Result};

/// Start offset and extent for every dimension of a variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRequest {
    pub start: Vec<usize>,
    pub count: Vec<usize>,
}

impl SliceRequest {
    /// Build a request from explicit vectors
    ///
    /// Both vectors must have one entry per dimension.
    #[must_use]
    pub fn new(start: Vec<usize>, count: Vec<usize>) -> Self {
        debug_assert_eq!(start.len(), count.len());
        Self { start, count }
    }

    /// Total elements the request selects, `None` on overflow
    #[must_use]
    pub fn element_count(&self) -> Option<usize> {
        element_count(&self.count)
    }

    /// Extent of the fastest-varying dimension, the length of one printed row
    ///
    /// A scalar prints as a single one-element row.
    #[must_use]
    pub fn line_length(&self) -> usize {
        self.count.last().copied().unwrap_or(1)
    }
}

/// Product of a shape, `None` if it overflows `usize`
///
/// An empty shape is a scalar and holds one element.
#[must_use]
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &len| acc.checked_mul(len))
}

/// Parse index tokens as non-negative integers
///
/// # Errors
///
/// Returns [`NcProbeError::MalformedIndex`] naming the first token that is not
/// a non-negative decimal integer and its zero-based position.
pub fn parse_indices<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<usize>> {
    tokens
        .iter()
        .enumerate()
        .map(|(position, token)| {
            let token = token.as_ref();
            token
                .trim()
                .parse::<usize>()
                .map_err(|_| NcProbeError::MalformedIndex {
                    position,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Resolve leading indices against a variable's dimensions
///
/// Dimension `i < indices.len()` gets `start = indices[i], count = 1`; every
/// later dimension gets `start = 0, count = dim_length(i)`.
///
/// # Errors
///
/// - [`NcProbeError::TooManyIndices`] if more indices than dimensions are given.
///   No lookup is made in that case.
/// - [`NcProbeError::IndexOutOfRange`] if an index is not below its dimension length.
/// - Any error returned by `dim_length`.
pub fn resolve<F>(ndims: usize, indices: &[usize], mut dim_length: F) -> Result<SliceRequest>
where
    F: FnMut(usize) -> Result<usize>,
{
    if indices.len() > ndims {
        return Err(NcProbeError::TooManyIndices {
            given: indices.len(),
            ndims,
        });
    }

    let mut start = Vec::with_capacity(ndims);
    let mut count = Vec::with_capacity(ndims);

    for dim in 0..ndims {
        let length = dim_length(dim)?;
        match indices.get(dim) {
            Some(&index) => {
                if index >= length {
                    return Err(NcProbeError::IndexOutOfRange {
                        position: dim,
                        index,
                        length,
                    });
                }
                start.push(index);
                count.push(1);
            }
            None => {
                start.push(0);
                count.push(length);
            }
        }
    }

    Ok(SliceRequest::new(start, count))
}
