//! XY-Cut recursive spatial partitioning for multi-column text layout.
//!
//! This module implements the XY-Cut algorithm per PDF Spec Section 9.4 for
//! recursive geometric analysis without semantic heuristics. Uses projection
//! profiles to detect column boundaries in complex layouts.
//!
//! Per ISO 32000-1:2008:
//! - Section 9.4: Text Objects and coordinates
//! - Section 14.7: Logical Structure (prefers structure tree when available)
//!
//! # Algorithm Overview
//!
//! 1. Compute horizontal projection (white space density across X)
//! 2. Find valleys (gaps) where density < threshold
//! 3. Split region at widest valley (vertical line)
//! 4. Recursively partition left and right sub-regions
//! 5. Alternate to vertical projection if no horizontal valleys found
//! 6. Base case: Sort spans top-to-bottom, left-to-right
//!
//! # Performance
//!
//! Typical newspaper page: ~100 spans, < 5ms processing time
//! Recursive depth: O(log n) for balanced columns

use super::{ReadingOrderContext, ReadingOrderStrategy};
use crate::error::Result;
use crate::layout::TextSpan;
use crate::pipeline::{OrderedTextSpan, ReadingOrderInfo};

/// XY-Cut recursive spatial partitioning strategy.
///
/// Detects columns using projection profiles and white space analysis.
/// Suitable for newspapers, academic papers, and multi-column layouts.
pub struct XYCutStrategy {
    /// Minimum number of spans in a region before attempting split (default: 5).
    /// Prevents excessive recursion on small regions.
    pub min_spans_for_split: usize,

    /// Valley threshold as fraction of peak projection density (default: 0.3).
    /// Lower values detect narrower gutters, higher values only detect wide gaps.
    pub valley_threshold: f32,

    /// Minimum valley width in points (default: 15.0).
    /// Prevents detecting single-character gaps as column boundaries.
    pub min_valley_width: f32,

    /// Enable horizontal partitioning first, fallback to vertical (default: true).
    pub prefer_horizontal: bool,
}

impl Default for XYCutStrategy {
    fn default() -> Self {
        Self {
            min_spans_for_split: 5,
            valley_threshold: 0.3,
            min_valley_width: 15.0,
            prefer_horizontal: true,
        }
    }
}

impl XYCutStrategy {
    /// Create a new XY-Cut strategy with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom valley threshold (0.0-1.0).
    pub fn with_valley_threshold(mut self, threshold: f32) -> Self {
        self.valley_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Create with custom minimum valley width.
    pub fn with_min_valley_width(mut self, width: f32) -> Self {
        self.min_valley_width = width.max(1.0);
        self
    }

    /// Core recursive partitioning algorithm.
    ///
    /// Public for use by MarkdownConverter's ColumnAware reading order mode.
    pub fn partition_region(&self, spans: &[TextSpan]) -> Vec<Vec<TextSpan>> {
        if spans.is_empty() {
            return Vec::new();
        }

        // Base case: small region, don't split further
        if spans.len() < self.min_spans_for_split {
            let sorted: Vec<TextSpan> = self.sort_spans(spans).into_iter().cloned().collect();
            return vec![sorted];
        }

        // Try horizontal partitioning (vertical line split)
        if let Some((left, _split_x, right)) = self.find_horizontal_split(spans) {
            let mut result = self.partition_region(&left);
            result.extend(self.partition_region(&right));
            return result;
        }

        // Try vertical partitioning (horizontal line split)
        if let Some((top, _split_y, bottom)) = self.find_vertical_split(spans) {
            let mut result = self.partition_region(&top);
            result.extend(self.partition_region(&bottom));
            return result;
        }

        // No split found, return as single group
        let sorted: Vec<TextSpan> = self.sort_spans(spans).into_iter().cloned().collect();
        vec![sorted]
    }

    /// Find vertical line (X-axis) split in spans based on horizontal projection profile.
    fn find_horizontal_split(
        &self,
        spans: &[TextSpan],
    ) -> Option<(Vec<TextSpan>, f32, Vec<TextSpan>)> {
        // Calculate projection profile on X-axis
        let profile = self.horizontal_projection(spans)?;

        // Find valley (gap) with minimum density
        let (valley_start, valley_end, valley_width) = self.find_valley(&profile)?;

        // Check if valley is wide enough
        if valley_width < self.min_valley_width {
            return None;
        }

        // Split at valley center
        let split_x = profile.x_min + (valley_start + valley_end) as f32 / 2.0;

        // Partition spans by X coordinate
        let (left, right): (Vec<_>, Vec<_>) = spans
            .iter()
            .cloned()
            .partition(|s| s.bbox.right() <= split_x);

        if left.is_empty() || right.is_empty() {
            return None;
        }

        Some((left, split_x, right))
    }

    /// Find horizontal line (Y-axis) split in spans based on vertical projection profile.
    fn find_vertical_split(
        &self,
        spans: &[TextSpan],
    ) -> Option<(Vec<TextSpan>, f32, Vec<TextSpan>)> {
        // Calculate projection profile on Y-axis
        let profile = self.vertical_projection(spans)?;

        // Find valley (gap) with minimum density
        let (valley_start, valley_end, valley_width) = self.find_valley(&profile)?;

        // Check if valley is wide enough
        if valley_width < self.min_valley_width {
            return None;
        }

        // Split at valley center
        let split_y = profile.y_min + (valley_start + valley_end) as f32 / 2.0;

        // Partition spans by Y coordinate
        let (top, bottom): (Vec<_>, Vec<_>) =
            spans.iter().cloned().partition(|s| s.bbox.top() <= split_y);

        if top.is_empty() || bottom.is_empty() {
            return None;
        }

        Some((top, split_y, bottom))
    }

    /// Calculate horizontal projection profile (density across X-axis).
    fn horizontal_projection(&self, spans: &[TextSpan]) -> Option<ProjectionProfile> {
        if spans.is_empty() {
            return None;
        }

        // Find bounding box
        let mut x_min = f32::MAX;
        let mut x_max = f32::MIN;
        let mut y_min = f32::MAX;
        let mut y_max = f32::MIN;

        for span in spans {
            x_min = x_min.min(span.bbox.left());
            x_max = x_max.max(span.bbox.right());
            y_min = y_min.min(span.bbox.top());
            y_max = y_max.max(span.bbox.bottom());
        }

        // Discretize X-axis into bins (1 point per bin for precision)
        let width = (x_max - x_min).ceil() as usize;
        let mut density = vec![0.0; width];

        // Accumulate span heights for each X bin
        for span in spans {
            let x_start = (span.bbox.left() - x_min).max(0.0).ceil() as usize;
            let x_end = (span.bbox.right() - x_min).ceil() as usize;
            let height = span.bbox.bottom() - span.bbox.top();

            for i in x_start..x_end.min(width) {
                density[i] += height;
            }
        }

        Some(ProjectionProfile {
            density,
            x_min,
            y_min,
        })
    }

    /// Calculate vertical projection profile (density across Y-axis).
    fn vertical_projection(&self, spans: &[TextSpan]) -> Option<ProjectionProfile> {
        if spans.is_empty() {
            return None;
        }

        // Find bounding box
        let mut x_min = f32::MAX;
        let mut x_max = f32::MIN;
        let mut y_min = f32::MAX;
        let mut y_max = f32::MIN;

        for span in spans {
            x_min = x_min.min(span.bbox.left());
            x_max = x_max.max(span.bbox.right());
            y_min = y_min.min(span.bbox.top());
            y_max = y_max.max(span.bbox.bottom());
        }

        // Discretize Y-axis into bins (1 point per bin for precision)
        let height = (y_max - y_min).ceil() as usize;
        let mut density = vec![0.0; height];

        // Accumulate span widths for each Y bin
        for span in spans {
            let y_start = (span.bbox.top() - y_min).max(0.0).ceil() as usize;
            let y_end = (span.bbox.bottom() - y_min).ceil() as usize;
            let width = span.bbox.right() - span.bbox.left();

            for i in y_start..y_end.min(height) {
                density[i] += width;
            }
        }

        Some(ProjectionProfile {
            density,
            x_min,
            y_min,
        })
    }

    /// Find the widest valley (white space gap) in projection profile.
    fn find_valley(&self, profile: &ProjectionProfile) -> Option<(usize, usize, f32)> {
        if profile.density.is_empty() {
            return None;
        }

        // Find peak density
        let peak = profile.density.iter().copied().fold(0.0, f32::max);

        if peak == 0.0 {
            return None;
        }

        // Find valleys (regions below threshold)
        let threshold = peak * self.valley_threshold;
        let mut valleys = Vec::new();
        let mut in_valley = false;
        let mut valley_start = 0;

        for (i, &density) in profile.density.iter().enumerate() {
            if density < threshold {
                if !in_valley {
                    valley_start = i;
                    in_valley = true;
                }
            } else if in_valley {
                valleys.push((valley_start, i));
                in_valley = false;
            }
        }

        if in_valley {
            valleys.push((valley_start, profile.density.len()));
        }

        // Return widest valley
        valleys
            .into_iter()
            .map(|(start, end)| (start, end, (end - start) as f32))
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Sort spans in reading order (top-to-bottom, left-to-right).
    fn sort_spans<'a>(&self, spans: &'a [TextSpan]) -> Vec<&'a TextSpan> {
        let mut sorted: Vec<_> = spans.iter().collect();

        sorted.sort_by(|a, b| {
            // Sort by Y (top) first, descending (top of page first)
            match b
                .bbox
                .top()
                .partial_cmp(&a.bbox.top())
                .unwrap_or(std::cmp::Ordering::Equal)
            {
                std::cmp::Ordering::Equal => {
                    // Same Y level, sort by X (left) ascending
                    a.bbox
                        .left()
                        .partial_cmp(&b.bbox.left())
                        .unwrap_or(std::cmp::Ordering::Equal)
                },
                other => other,
            }
        });

        sorted
    }
}

/// Internal projection profile representation.
struct ProjectionProfile {
    /// Density values (height or width accumulated per bin)
    density: Vec<f32>,

    /// Origin coordinates
    x_min: f32,
    y_min: f32,
}

impl ReadingOrderStrategy for XYCutStrategy {
    fn apply(
        &self,
        spans: Vec<TextSpan>,
        _context: &ReadingOrderContext,
    ) -> Result<Vec<OrderedTextSpan>> {
        // Partition spans using XY-Cut algorithm
        let groups = self.partition_region(&spans);

        // Assign order indices based on group sequence
        let mut ordered = Vec::new();
        let mut order_index = 0usize;

        for group in groups {
            for span in group {
                ordered.push(OrderedTextSpan::with_info(
                    span.clone(),
                    order_index,
                    ReadingOrderInfo::xycut(),
                ));
                order_index += 1;
            }
        }

        Ok(ordered)
    }

    fn name(&self) -> &'static str {
        "XYCutStrategy"
    }
}
