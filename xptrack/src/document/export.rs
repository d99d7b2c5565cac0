//! KML export of a [`DocumentTree`].
//!
//! The tree is converted into `kml` crate types and written as a KML 2.2
//! document: the shared pushpin styles first, then the Flight, Special and
//! Data folders in that order. Within a folder its own placemarks come
//! before its subfolder.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use kml::types::{
    AltitudeMode as KmlAltitudeMode, Coord, Element, Geometry as KmlGeometry,
    LineString as KmlLineString, Placemark as KmlPlacemark, Point,
};
use kml::{Kml, KmlDocument, KmlVersion, KmlWriter};
use thiserror::Error;
use tracing::{debug, info};

use super::{rfc3339, AltitudeMode, Coordinate, DocumentTree, Folder, Geometry, Placemark};

const PUSHPIN_ICON: &str = "http://maps.google.com/mapfiles/kml/pushpin/ylw-pushpin.png";

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Errors writing a KML file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Could not create or write the output file.
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The KML writer rejected the document.
    #[error("failed to serialize KML: {0}")]
    Kml(#[from] kml::Error),
}

/// Name of the exported document: `Flightlog <label> <RFC3339 start>`.
pub fn document_name(label: &str, started_at: DateTime<Local>) -> String {
    format!("Flightlog {} {}", label, rfc3339(started_at))
}

/// Convert the tree into a KML document named `doc_name`.
pub fn to_kml(tree: &DocumentTree, doc_name: &str) -> Kml {
    let mut elements = vec![Kml::Element(text_element("name", doc_name))];
    elements.extend(shared_styles());
    elements.extend(tree.folders().map(folder_to_kml));

    let document = Kml::Document {
        attrs: HashMap::new(),
        elements,
    };

    Kml::KmlDocument(KmlDocument {
        version: KmlVersion::V22,
        attrs: HashMap::from([("xmlns".to_string(), KML_NAMESPACE.to_string())]),
        elements: vec![document],
    })
}

/// Render the tree as a KML string.
pub fn to_kml_string(tree: &DocumentTree, doc_name: &str) -> String {
    to_kml(tree, doc_name).to_string()
}

/// Write the tree to `path` as a KML file.
pub fn write_kml(tree: &DocumentTree, doc_name: &str, path: &Path) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let kml = to_kml(tree, doc_name);
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    KmlWriter::from_writer(&mut writer).write(&kml)?;
    writer.flush().map_err(io_error)?;

    info!(
        path = %path.display(),
        placemarks = tree.total_placemarks(),
        "Flight log saved"
    );
    Ok(())
}

fn folder_to_kml(folder: &Folder) -> Kml {
    let mut elements = vec![Kml::Element(text_element("name", folder.name()))];
    elements.extend(folder.placemarks().iter().map(placemark_to_kml));
    if let Some(subfolder) = folder.subfolder() {
        elements.push(folder_to_kml(subfolder));
    }

    debug!(
        folder = folder.name(),
        placemarks = folder.placemarks().len(),
        "Exporting folder"
    );

    Kml::Folder {
        attrs: HashMap::new(),
        elements,
    }
}

fn placemark_to_kml(placemark: &Placemark) -> Kml {
    let geometry = match &placemark.geometry {
        Geometry::LineString(line) => {
            let coords = line
                .coordinates()
                .iter()
                .map(|c| to_coord(c, line.altitude))
                .collect();
            KmlGeometry::LineString(KmlLineString {
                extrude: line.extrude,
                tessellate: line.tessellate,
                altitude_mode: to_altitude_mode(line.altitude_mode),
                coords,
                ..Default::default()
            })
        }
        Geometry::Point(coordinate, altitude_mode) => {
            let mut point = Point::new(
                coordinate.longitude,
                coordinate.latitude,
                coordinate.altitude,
            );
            point.altitude_mode = to_altitude_mode(*altitude_mode);
            KmlGeometry::Point(point)
        }
    };

    let children = placemark
        .style_url
        .as_deref()
        .map(|url| text_element("styleUrl", url))
        .into_iter()
        .collect();

    Kml::Placemark(KmlPlacemark {
        name: placemark.name.clone(),
        description: placemark.description.clone(),
        geometry: Some(geometry),
        children,
        ..Default::default()
    })
}

fn to_coord(coordinate: &Coordinate, fixed_altitude: Option<f64>) -> Coord {
    Coord::new(
        coordinate.longitude,
        coordinate.latitude,
        coordinate.altitude.or(fixed_altitude),
    )
}

fn to_altitude_mode(mode: AltitudeMode) -> KmlAltitudeMode {
    match mode {
        AltitudeMode::ClampToGround => KmlAltitudeMode::ClampToGround,
        AltitudeMode::RelativeToGround => KmlAltitudeMode::RelativeToGround,
        AltitudeMode::Absolute => KmlAltitudeMode::Absolute,
    }
}

/// Yellow pushpin style map shared by every flight-track segment.
///
/// Every element carries at most one attribute, so the output does not
/// depend on attribute map iteration order.
fn shared_styles() -> Vec<Kml> {
    let pair = |key: &str, url: &str| {
        node(
            "Pair",
            vec![text_element("key", key), text_element("styleUrl", url)],
        )
    };

    let style_map = Element {
        attrs: HashMap::from([("id".to_string(), "msn_ylw-pushpin".to_string())]),
        ..node(
            "StyleMap",
            vec![
                pair("normal", "#sn_ylw-pushpin"),
                pair("highlight", "#sh_ylw-pushpin"),
            ],
        )
    };

    vec![
        Kml::Element(style_map),
        Kml::Element(pushpin_style("sn_ylw-pushpin", "1.1", "2")),
        Kml::Element(pushpin_style("sh_ylw-pushpin", "1.3", "3")),
    ]
}

fn pushpin_style(id: &str, scale: &str, line_width: &str) -> Element {
    let icon_style = node(
        "IconStyle",
        vec![
            text_element("scale", scale),
            node("Icon", vec![text_element("href", PUSHPIN_ICON)]),
        ],
    );
    let line_style = node(
        "LineStyle",
        vec![
            text_element("color", "ff00ff00"),
            text_element("width", line_width),
        ],
    );

    Element {
        attrs: HashMap::from([("id".to_string(), id.to_string())]),
        ..node("Style", vec![icon_style, line_style])
    }
}

fn text_element(name: &str, content: &str) -> Element {
    Element {
        name: name.to_string(),
        content: Some(content.to_string()),
        ..Default::default()
    }
}

fn node(name: &str, children: Vec<Element>) -> Element {
    Element {
        name: name.to_string(),
        children,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FolderKey;
    use crate::status::FlightSample;
    use crate::telemetry::{Attitude, PositionSample, Speed};
    use crate::track::{DataAltitude, DataTrackBuilder, TrackConfig};
    use chrono::TimeZone;

    fn started() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()
    }

    fn folders(kml: &Kml) -> Vec<&Vec<Kml>> {
        let Kml::KmlDocument(doc) = kml else {
            panic!("expected a KML document");
        };
        let Kml::Document { elements, .. } = &doc.elements[0] else {
            panic!("expected a Document");
        };
        elements
            .iter()
            .filter_map(|e| match e {
                Kml::Folder { elements, .. } => Some(elements),
                _ => None,
            })
            .collect()
    }

    fn placemarks(elements: &[Kml]) -> Vec<&KmlPlacemark> {
        elements
            .iter()
            .filter_map(|e| match e {
                Kml::Placemark(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_document_name() {
        assert!(document_name("FOO-BAR", started()).starts_with("Flightlog FOO-BAR 2024-03-01T10:30:00"));
    }

    #[test]
    fn test_empty_tree_has_three_empty_folders() {
        let tree = DocumentTree::new(started());
        let kml = to_kml(&tree, "empty");
        let folders = folders(&kml);

        assert_eq!(folders.len(), 3);
        // Flight folder holds only its FlightLog subfolder.
        assert!(placemarks(folders[0]).is_empty());
        assert!(folders[0].iter().any(|e| matches!(e, Kml::Folder { .. })));
        assert!(placemarks(folders[1]).is_empty());
        assert!(placemarks(folders[2]).is_empty());
    }

    #[test]
    fn test_ground_segment_uses_fixed_altitude() {
        let mut tree = DocumentTree::new(started());
        let mut segment = Placemark::flight_segment(true, 1.0);
        segment
            .line_string_mut()
            .unwrap()
            .push(Coordinate::new(-122.5, 45.5, None));
        tree.add_placemark_to_subfolder(FolderKey::Flight, segment)
            .unwrap();

        let kml = to_kml(&tree, "ground");
        let flight = folders(&kml)[0];
        let Some(Kml::Folder { elements, .. }) = flight.last() else {
            panic!("expected FlightLog subfolder");
        };
        let exported = placemarks(elements);
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].name.as_deref(), Some("On Ground"));

        let Some(KmlGeometry::LineString(line)) = &exported[0].geometry else {
            panic!("expected a line string");
        };
        assert_eq!(line.altitude_mode, KmlAltitudeMode::ClampToGround);
        assert_eq!(line.coords[0].z, Some(1.0));
    }

    #[test]
    fn test_data_point_export() {
        let sample = FlightSample {
            position: PositionSample::new(45.5, -122.5, 900.0, 1000.0),
            attitude: Attitude::default(),
            speed: Speed::default(),
            vertical_rate: 0.0,
        };
        let mut tree = DocumentTree::new(started());
        tree.add_placemark(
            FolderKey::Data,
            Placemark::flight_data(
                Coordinate::new(-122.5, 45.5, Some(1000.0)),
                AltitudeMode::Absolute,
                &sample,
                started(),
            ),
        );

        let kml = to_kml(&tree, "data");
        let data = placemarks(folders(&kml)[2]);
        assert_eq!(data.len(), 1);
        assert!(data[0].description.as_deref().unwrap().contains("Alt AGL"));
        let Some(KmlGeometry::Point(point)) = &data[0].geometry else {
            panic!("expected a point");
        };
        assert_eq!(point.coord.x, -122.5);
        assert_eq!(point.coord.y, 45.5);
        assert_eq!(point.coord.z, Some(1000.0));
        assert_eq!(point.altitude_mode, KmlAltitudeMode::Absolute);
    }

    #[test]
    fn test_agl_data_point_is_relative_to_ground() {
        let config = TrackConfig {
            data_altitude: DataAltitude::Agl,
            ..Default::default()
        };
        let sample = FlightSample {
            position: PositionSample::new(45.0, -122.0, 100.0, 5100.0),
            attitude: Attitude::default(),
            speed: Speed::default(),
            vertical_rate: 0.0,
        };
        let mut tree = DocumentTree::new(started());
        DataTrackBuilder::new(&config).on_sample(&sample, started(), &mut tree);

        let kml = to_kml(&tree, "agl");
        let data = placemarks(folders(&kml)[2]);
        let Some(KmlGeometry::Point(point)) = &data[0].geometry else {
            panic!("expected a point");
        };
        assert_eq!(point.coord.z, Some(100.0));
        assert_eq!(point.altitude_mode, KmlAltitudeMode::RelativeToGround);

        let text = to_kml_string(&tree, "agl");
        assert!(text.contains("relativeToGround"));
        assert!(!text.contains("<altitudeMode>absolute</altitudeMode>"));
    }

    #[test]
    fn test_document_declares_kml_namespace() {
        let kml = to_kml(&DocumentTree::new(started()), "ns");
        let Kml::KmlDocument(doc) = &kml else {
            panic!("expected a KML document");
        };
        assert_eq!(doc.attrs.get("xmlns").map(String::as_str), Some(KML_NAMESPACE));
    }

    fn max_attributes(element: &Element) -> usize {
        element
            .children
            .iter()
            .map(max_attributes)
            .fold(element.attrs.len(), usize::max)
    }

    #[test]
    fn test_shared_styles_have_stable_attributes() {
        for style in shared_styles() {
            let Kml::Element(element) = style else {
                panic!("expected a style element");
            };
            assert!(max_attributes(&element) <= 1, "{} has unordered attributes", element.name);
        }

        let mut tree = DocumentTree::new(started());
        tree.add_placemark_to_subfolder(FolderKey::Flight, Placemark::flight_segment(true, 1.0))
            .unwrap();
        assert_eq!(to_kml_string(&tree, "same"), to_kml_string(&tree, "same"));
    }

    #[test]
    fn test_write_kml_creates_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("flight.kml");
        let mut tree = DocumentTree::new(started());
        tree.add_placemark_to_subfolder(FolderKey::Flight, Placemark::flight_segment(false, 1.0))
            .unwrap();

        write_kml(&tree, "Flightlog test", &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<kml"));
        assert!(content.contains(r#"xmlns="http://www.opengis.net/kml/2.2""#));
        assert!(content.contains("In the air"));
    }

    #[test]
    fn test_write_kml_reports_path_on_failure() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // A directory cannot be opened as a file.
        let result = write_kml(&DocumentTree::new(started()), "x", temp_dir.path());
        match result {
            Err(ExportError::Io { path, .. }) => {
                assert_eq!(path, temp_dir.path().display().to_string())
            }
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }
}
