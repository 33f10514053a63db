//! GPX parsing into tracks of segments of timestamped points.
//!
//! Track geometry comes from the `gpx` crate. It skips `<extensions>`, so the
//! Garmin `TrackPointExtension` speed is read with a second streaming pass
//! and lined up with the points by track/segment/point index.

use std::path::Path;

use quick_xml::{Reader, events::Event};
use time::OffsetDateTime;
use tracing::debug;

use crate::models::{ParsedTrack, TrackPoint};

/// Error type for parsing failures. Any of these skips the whole file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse GPX file: {0}")]
    Gpx(String),
    #[error("Failed to read GPX extensions: {0}")]
    Xml(String),
    #[error("Point {point} of segment {segment} in track {track} has no timestamp")]
    MissingTimestamp {
        track: usize,
        segment: usize,
        point: usize,
    },
}

/// Device speeds per track, per segment, per point.
type ExtensionSpeeds = Vec<Vec<Vec<Option<f64>>>>;

pub fn parse_gpx_file(path: impl AsRef<Path>) -> Result<Vec<ParsedTrack>, ParseError> {
    let bytes = std::fs::read(path)?;
    parse_gpx(&bytes)
}

/// Parse GPX bytes. Every `<trk>` becomes one [`ParsedTrack`].
pub fn parse_gpx(bytes: &[u8]) -> Result<Vec<ParsedTrack>, ParseError> {
    let gpx = gpx::read(bytes).map_err(|e| ParseError::Gpx(e.to_string()))?;
    let speeds = extract_extension_speeds(bytes)?;

    let mut tracks = Vec::with_capacity(gpx.tracks.len());
    for (ti, track) in gpx.tracks.iter().enumerate() {
        let mut segments = Vec::with_capacity(track.segments.len());
        for (si, seg) in track.segments.iter().enumerate() {
            let mut points = Vec::with_capacity(seg.points.len());
            for (pi, pt) in seg.points.iter().enumerate() {
                let timestamp = pt
                    .time
                    .map(OffsetDateTime::from)
                    .ok_or(ParseError::MissingTimestamp {
                        track: ti,
                        segment: si,
                        point: pi,
                    })?;

                let extension_speed = speeds
                    .get(ti)
                    .and_then(|s| s.get(si))
                    .and_then(|p| p.get(pi))
                    .copied()
                    .flatten();

                points.push(TrackPoint {
                    lat: pt.point().y(),
                    lon: pt.point().x(),
                    elevation: pt.elevation,
                    timestamp,
                    speed: extension_speed.or(pt.speed),
                });
            }
            segments.push(points);
        }

        tracks.push(ParsedTrack {
            name: track.name.clone(),
            segments,
        });
    }

    Ok(tracks)
}

/// Collect `<speed>` values found inside each `<trkpt>`'s `<extensions>`.
/// Matching is on local names so any namespace prefix works.
fn extract_extension_speeds(bytes: &[u8]) -> Result<ExtensionSpeeds, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut speeds: ExtensionSpeeds = Vec::new();
    let mut buf = Vec::new();

    let mut in_trk = false;
    let mut in_trkseg = false;
    let mut in_trkpt = false;
    let mut in_extensions = false;
    let mut in_speed = false;
    let mut speed_text = String::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Err(e) => {
                return Err(ParseError::Xml(format!(
                    "error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            Ok(Event::Eof) => break,
            Ok(event) => event.into_owned(),
        };

        match event {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"trk" => {
                    in_trk = true;
                    speeds.push(Vec::new());
                }
                b"trkseg" if in_trk => {
                    in_trkseg = true;
                    if let Some(track) = speeds.last_mut() {
                        track.push(Vec::new());
                    }
                }
                b"trkpt" if in_trkseg => {
                    in_trkpt = true;
                    push_point(&mut speeds);
                }
                b"extensions" if in_trkpt => in_extensions = true,
                b"speed" if in_extensions => {
                    in_speed = true;
                    speed_text.clear();
                }
                _ => {}
            },

            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"trk" => speeds.push(Vec::new()),
                b"trkseg" if in_trk => {
                    if let Some(track) = speeds.last_mut() {
                        track.push(Vec::new());
                    }
                }
                b"trkpt" if in_trkseg => push_point(&mut speeds),
                _ => {}
            },

            Event::Text(ref e) if in_speed => {
                speed_text.push_str(&e.unescape().unwrap_or_default());
            }

            Event::End(ref e) => match e.local_name().as_ref() {
                b"speed" if in_speed => {
                    in_speed = false;
                    match speed_text.trim().parse::<f64>() {
                        Ok(speed) if speed.is_finite() && speed >= 0.0 => {
                            if let Some(slot) = speeds
                                .last_mut()
                                .and_then(|t| t.last_mut())
                                .and_then(|s| s.last_mut())
                            {
                                *slot = Some(speed);
                            }
                        }
                        _ => debug!("Ignoring unusable speed value {speed_text:?}"),
                    }
                }
                b"extensions" => in_extensions = false,
                b"trkpt" => in_trkpt = false,
                b"trkseg" => in_trkseg = false,
                b"trk" => in_trk = false,
                _ => {}
            },

            _ => {}
        }

        buf.clear();
    }

    Ok(speeds)
}

fn push_point(speeds: &mut ExtensionSpeeds) {
    if let Some(segment) = speeds.last_mut().and_then(|t| t.last_mut()) {
        segment.push(None);
    }
}
