use tracing::{debug, info, warn};

use crate::{
    config::{MarkerOrder, SplitterConfig},
    error::{Result, SplitError},
    splitter::types::{SplitClip, SplitMethod, SplitReport, TimelineMarker},
    timing::FrameRange,
};

/// Splits a timeline at named markers
///
/// Clip `i` runs from marker `i` up to marker `i + 1`; the last clip runs to
/// the end of the timeline. Marker names are kept as they are, duplicates
/// included.
///
/// N markers do not always give N clips: a marker sharing its frame with the
/// next one would cover no frames, so it is skipped and recorded as
/// [`SplitError::EmptyRange`]. Markers outside the timeline are recorded as
/// [`SplitError::RangeOutOfBounds`].
#[derive(Debug, Clone, Copy)]
pub struct MarkerSplitter {
    order: MarkerOrder,
    offset_to_zero: bool,
}

impl MarkerSplitter {
    pub fn new(order: MarkerOrder, offset_to_zero: bool) -> Self {
        Self { order, offset_to_zero }
    }

    pub fn from_config(config: &SplitterConfig) -> Self {
        Self::new(config.marker_order, config.offset_to_zero)
    }

    /// Cut a `timeline_length`-frame timeline at `markers`
    ///
    /// Fails when there are no markers, or when markers are out of order and
    /// the policy is [`MarkerOrder::Strict`]. Markers outside the timeline and
    /// markers sharing a frame with the next one are skipped and recorded.
    pub fn split(&self, timeline_length: i64, markers: &[TimelineMarker]) -> Result<SplitReport> {
        if markers.is_empty() {
            return Err(SplitError::EmptyMarkerSet.into());
        }

        if timeline_length < 0 {
            return Err(SplitError::InvalidTimeline {
                length_frames: timeline_length,
                fps: 0.0,
            }.into());
        }

        let ordered = self.ordered(markers)?;
        let mut report = SplitReport::new(SplitMethod::Markers);

        for (index, marker) in ordered.iter().enumerate() {
            let name = if marker.name.trim().is_empty() {
                format!("Clip_{}", index)
            } else {
                marker.name.clone()
            };

            if marker.frame < 0 || marker.frame >= timeline_length {
                let err = SplitError::RangeOutOfBounds {
                    index,
                    name,
                    start_frame: marker.frame,
                    timeline_length,
                };
                warn!("Skipping marker: {}", err);
                report.skipped.push(err);
                continue;
            }

            let end = ordered
                .get(index + 1)
                .map(|next| next.frame)
                .unwrap_or(timeline_length);
            let source_range = FrameRange::new(marker.frame, end).clamp_end(timeline_length);

            if source_range.is_empty() {
                let err = SplitError::EmptyRange {
                    index,
                    name,
                    start_frame: marker.frame,
                };
                warn!("Skipping marker: {}", err);
                report.skipped.push(err);
                continue;
            }

            let local_range = if self.offset_to_zero {
                source_range.rebased()
            } else {
                source_range
            };

            debug!("Marker clip '{}' frames {} -> {}", name, source_range, local_range);
            report.clips.push(SplitClip {
                index,
                name,
                source_range,
                local_range,
            });
        }

        info!("Split {} clips from {} markers ({} skipped)",
              report.clips.len(), markers.len(), report.skipped.len());
        Ok(report)
    }

    fn ordered(&self, markers: &[TimelineMarker]) -> Result<Vec<TimelineMarker>> {
        match self.order {
            MarkerOrder::Sort => {
                let mut sorted = markers.to_vec();
                // Stable, so markers on the same frame keep their given order
                sorted.sort_by_key(|m| m.frame);
                Ok(sorted)
            }
            MarkerOrder::Strict => {
                if let Some((position, pair)) = markers
                    .windows(2)
                    .enumerate()
                    .find(|(_, pair)| pair[1].frame < pair[0].frame)
                {
                    return Err(SplitError::UnsortedMarkers {
                        position: position + 1,
                        frame: pair[1].frame,
                        previous: pair[0].frame,
                    }.into());
                }
                Ok(markers.to_vec())
            }
        }
    }
}

impl Default for MarkerSplitter {
    fn default() -> Self {
        Self::new(MarkerOrder::Sort, true)
    }
}

/// Split a `timeline_length_frames`-frame timeline at `markers`, sorting them first
pub fn split_by_markers(timeline_length_frames: i64, markers: &[TimelineMarker]) -> Result<SplitReport> {
    MarkerSplitter::default().split(timeline_length_frames, markers)
}
