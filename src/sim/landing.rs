//! Landing zone allocation
//!
//! The interior index range `[1, num_points - 1]` is cut into three thirds,
//! shuffled, and consumed without replacement: the major pad takes one
//! third and the minor pad another, so the two can never overlap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{shuffle, uniform};

/// Width multiplier for the wide pad
pub const MAJOR_WIDTH_UNIT: usize = 4;
/// Width multiplier for the narrow pad
pub const MINOR_WIDTH_UNIT: usize = 1;

/// Inclusive range of profile indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpan {
    pub min: usize,
    pub max: usize,
}

impl IndexSpan {
    /// Distance between the first and last index
    #[inline]
    pub fn width(&self) -> usize {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.min && index <= self.max
    }
}

/// Which of the two pads a span is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadKind {
    Major,
    Minor,
}

impl PadKind {
    pub fn width_unit(&self) -> usize {
        match self {
            PadKind::Major => MAJOR_WIDTH_UNIT,
            PadKind::Minor => MINOR_WIDTH_UNIT,
        }
    }
}

/// A run of profile indices flattened to a single height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingSpan {
    pub kind: PadKind,
    pub start_index: usize,
    /// Index distance from the first to the last flattened sample
    pub width: usize,
    pub flat_height: f32,
}

impl LandingSpan {
    /// Last flattened index (inclusive)
    #[inline]
    pub fn end_index(&self) -> usize {
        self.start_index + self.width
    }

    #[inline]
    pub fn covers(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index()
    }

    pub fn overlaps(&self, other: &LandingSpan) -> bool {
        self.start_index <= other.end_index() && other.start_index <= self.end_index()
    }
}

/// A landing pad in domain coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingZone {
    pub kind: PadKind,
    pub x: f32,
    pub width: f32,
    pub y: f32,
}

/// Inputs to the allocator
#[derive(Debug, Clone, Copy)]
pub struct AllocatorParams {
    /// Profile segment count (sample count minus one)
    pub num_points: usize,
    pub domain_width: f32,
    pub flat_height_range: (f32, f32),
    pub min_pad_width: f32,
}

impl AllocatorParams {
    /// Fewest indices a pad needs to be at least `min_pad_width` wide
    pub fn min_width_in_indices(&self) -> usize {
        let segment = self.domain_width / self.num_points as f32;
        (self.min_pad_width / segment).ceil().max(1.0) as usize
    }
}

/// Split `[1, num_points - 1]` into three contiguous thirds
///
/// Integer division leaves the remainder in the last third. Requires
/// `num_points >= 4` so every third holds at least one index.
pub fn partition_thirds(num_points: usize) -> [IndexSpan; 3] {
    let first_end = (num_points / 3).max(1);
    let second_end = (num_points * 2 / 3).max(first_end + 1);
    let last = num_points.saturating_sub(1).max(second_end + 1);
    [
        IndexSpan { min: 1, max: first_end },
        IndexSpan { min: first_end + 1, max: second_end },
        IndexSpan { min: second_end + 1, max: last },
    ]
}

/// Place one pad inside `span`
///
/// Spans narrower than the requested width clamp the pad to the whole span.
fn place_pad<R: Rng + ?Sized>(
    kind: PadKind,
    span: IndexSpan,
    params: &AllocatorParams,
    rng: &mut R,
) -> LandingSpan {
    let span_width = span.width();
    let width = (params.min_width_in_indices() * kind.width_unit()).min(span_width);

    let start_index = if width == span_width {
        span.min
    } else {
        let latest = span.max - width;
        let drawn = uniform(rng, span.min as f32, latest as f32).floor() as usize;
        drawn.clamp(span.min, latest)
    };

    let (low, high) = params.flat_height_range;
    LandingSpan {
        kind,
        start_index,
        width,
        flat_height: uniform(rng, low, high),
    }
}

/// Allocate the major and minor pads, in that order
pub fn allocate_landing_spans<R: Rng + ?Sized>(
    params: &AllocatorParams,
    rng: &mut R,
) -> [LandingSpan; 2] {
    let mut thirds = partition_thirds(params.num_points).to_vec();
    shuffle(&mut thirds, rng);

    let mut take = || thirds.pop().unwrap_or(IndexSpan { min: 1, max: 1 });
    let major_span = take();
    let minor_span = take();

    let major = place_pad(PadKind::Major, major_span, params, rng);
    let minor = place_pad(PadKind::Minor, minor_span, params, rng);
    [major, minor]
}
