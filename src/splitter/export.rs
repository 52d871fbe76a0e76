use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{
    error::{ExportError, Result},
    splitter::tracks::Track,
};

/// Receives split tracks and turns each into an independent output unit
pub trait ExportSink {
    /// Export one track whose frames are keyed at `fps`
    fn export(&mut self, track: &Track, fps: f64) -> Result<()>;
}

/// Outcome of exporting a set of tracks
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Names of tracks that were exported
    pub exported: Vec<String>,

    /// Tracks that failed; the others were still exported
    pub failed: Vec<ExportError>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Hand every track to `sink`, collecting failures instead of stopping
pub fn export_tracks(tracks: &[Track], fps: f64, sink: &mut dyn ExportSink) -> ExportReport {
    let mut report = ExportReport::default();

    for track in tracks {
        match sink.export(track, fps) {
            Ok(()) => {
                debug!("Exported track '{}'", track.name);
                report.exported.push(track.name.clone());
            }
            Err(e) => {
                warn!("Failed to export {}: {}", track.name, e);
                report.failed.push(ExportError::Failed {
                    name: track.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!("Exported {} tracks ({} failed)", report.exported.len(), report.failed.len());
    report
}

/// Track description written by [`TrackFileSink`]
#[derive(Debug, Serialize)]
struct TrackFile<'a> {
    name: &'a str,
    index: usize,
    fps: f64,
    strip_start: i64,
    frame_start: i64,
    frame_end: i64,
    source_frame_start: i64,
    source_frame_end: i64,
    muted: bool,
}

/// Writes one `<name>.<extension>` file per track into a directory
pub struct TrackFileSink {
    output_dir: PathBuf,
    extension: String,
    written: Vec<PathBuf>,
}

impl TrackFileSink {
    pub fn new<P: Into<PathBuf>>(output_dir: P, extension: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            written: Vec::new(),
        }
    }

    /// Files written so far, in export order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", file_safe(name), self.extension))
    }
}

impl ExportSink for TrackFileSink {
    fn export(&mut self, track: &Track, fps: f64) -> Result<()> {
        if !self.output_dir.is_dir() {
            std::fs::create_dir_all(&self.output_dir)?;
        }

        let path = self.path_for(&track.name);
        if self.written.contains(&path) {
            warn!("Track name '{}' repeats; overwriting {:?}", track.name, path);
        }

        let file = TrackFile {
            name: &track.name,
            index: track.index,
            fps,
            strip_start: track.strip_start,
            frame_start: track.frames.start,
            frame_end: track.frames.end,
            source_frame_start: track.source_frames.start,
            source_frame_end: track.source_frames.end,
            muted: track.muted,
        };

        let json = serde_json::to_string_pretty(&file).map_err(|e| ExportError::Failed {
            name: track.name.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json)?;

        debug!("Exported: {:?}", path);
        self.written.push(path);
        Ok(())
    }
}

/// Replace characters that are unsafe in file names
fn file_safe(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "track".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Names used by more than one track, in first-repeat order
pub fn repeated_names(tracks: &[Track]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for track in tracks {
        if !seen.insert(track.name.as_str()) && !repeated.contains(&track.name) {
            repeated.push(track.name.clone());
        }
    }
    repeated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplitterError;
    use crate::splitter::{layout_tracks, split_by_markers, TimelineMarker};
    use tempfile::tempdir;

    fn tracks() -> Vec<Track> {
        let markers = vec![
            TimelineMarker::new("idle", 0),
            TimelineMarker::new("walk/fast", 180),
            TimelineMarker::new("idle", 300),
        ];
        layout_tracks(&split_by_markers(450, &markers).unwrap())
    }

    struct FailingOn(&'static str, Vec<String>);

    impl ExportSink for FailingOn {
        fn export(&mut self, track: &Track, _fps: f64) -> Result<()> {
            if track.name == self.0 {
                return Err(SplitterError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")));
            }
            self.1.push(track.name.clone());
            Ok(())
        }
    }

    #[test]
    fn test_file_sink_writes_one_file_per_track() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("tracks");
        let mut sink = TrackFileSink::new(&out, ".json");

        let report = export_tracks(&tracks(), 30.0, &mut sink);
        assert!(report.is_complete());
        assert_eq!(report.exported, vec!["idle", "walk/fast", "idle"]);

        // Repeated name overwrites the earlier file
        assert_eq!(sink.written().len(), 3);
        assert!(out.join("idle.json").is_file());
        assert!(out.join("walk_fast.json").is_file());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("walk_fast.json")).unwrap()).unwrap();
        assert_eq!(written["frame_end"], 120);
        assert_eq!(written["source_frame_start"], 180);
        assert_eq!(written["muted"], true);
    }

    #[test]
    fn test_failures_do_not_stop_other_tracks() {
        let mut sink = FailingOn("walk/fast", Vec::new());
        let report = export_tracks(&tracks(), 30.0, &mut sink);

        assert_eq!(report.exported.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].to_string().contains("disk full"));
        assert_eq!(sink.1, vec!["idle", "idle"]);
    }

    #[test]
    fn test_file_safe_names() {
        assert_eq!(file_safe("walk/fast"), "walk_fast");
        assert_eq!(file_safe("a:b*c"), "a_b_c");
        assert_eq!(file_safe(".."), "track");
        assert_eq!(file_safe("Run Cycle"), "Run Cycle");
    }

    #[test]
    fn test_repeated_names() {
        assert_eq!(repeated_names(&tracks()), vec!["idle".to_string()]);
    }
}
