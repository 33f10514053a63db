//! GPX file generation from generated tracks.
//!
//! Generates GPX 1.1 XML with one `<trk>` per track and one `<trkseg>` per
//! segment. Device speeds are written as Garmin TrackPointExtension v2
//! `<speed>` elements.

use std::path::Path;

use crate::track::GeneratedTrack;

const GARMIN_TPX_NS: &str = "http://www.garmin.com/xmlschemas/TrackPointExtension/v2";

/// Generates a GPX 1.1 XML document containing `tracks`.
pub fn generate_gpx(tracks: &[GeneratedTrack]) -> Vec<u8> {
    let mut gpx = String::new();

    // GPX 1.1 header
    gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    gpx.push('\n');
    gpx.push_str(r#"<gpx version="1.1" creator="best-efforts-test-data""#);
    gpx.push_str(r#" xmlns="http://www.topografix.com/GPX/1/1""#);
    gpx.push_str(&format!(r#" xmlns:gpxtpx="{GARMIN_TPX_NS}""#));
    gpx.push_str(r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#);
    gpx.push_str(r#" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#);
    gpx.push('\n');

    for track in tracks {
        gpx.push_str("  <trk>\n");
        if let Some(name) = &track.name {
            gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(name)));
        }

        for segment in &track.segments {
            gpx.push_str("    <trkseg>\n");
            for point in segment {
                gpx.push_str(&format!(
                    r#"      <trkpt lat="{:.9}" lon="{:.9}">"#,
                    point.lat, point.lon
                ));
                gpx.push('\n');

                if let Some(ele) = point.elevation {
                    gpx.push_str(&format!("        <ele>{:.2}</ele>\n", ele));
                }

                // Format as ISO 8601 / RFC 3339
                let formatted = point
                    .time
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_default();
                gpx.push_str(&format!("        <time>{}</time>\n", formatted));

                if let Some(speed) = point.speed {
                    gpx.push_str("        <extensions><gpxtpx:TrackPointExtension>");
                    gpx.push_str(&format!("<gpxtpx:speed>{:.3}</gpxtpx:speed>", speed));
                    gpx.push_str("</gpxtpx:TrackPointExtension></extensions>\n");
                }

                gpx.push_str("      </trkpt>\n");
            }
            gpx.push_str("    </trkseg>\n");
        }

        gpx.push_str("  </trk>\n");
    }

    gpx.push_str("</gpx>\n");

    gpx.into_bytes()
}

/// Writes `tracks` to `path` as a GPX file.
pub fn write_gpx_file(path: impl AsRef<Path>, tracks: &[GeneratedTrack]) -> std::io::Result<()> {
    std::fs::write(path, generate_gpx(tracks))
}

/// Escapes XML special characters in a string.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
