//! XML station loader for the tide gauge location listing.
//!
//! The listing looks like:
//!
//! ```xml
//! <Locations>
//!   <Location>
//!     <Code>DT_0001</Code>
//!     <Name>인천</Name>
//!     <Latitude>37.451944</Latitude>
//!     <Longitude>126.592222</Longitude>
//!     <marine_reg_name>서해중부</marine_reg_name>
//!   </Location>
//! </Locations>
//! ```
//!
//! Other child elements are ignored.

use std::path::{Path, PathBuf};

use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::{info, warn};

use super::error::SourceError;
use super::{LoadReport, PointSource, SourceRecord};
use crate::domain::{Capabilities, GeoPoint};

/// Field naming the marine forecast zone a station belongs to.
pub const MARINE_REGION_FIELD: &str = "marine_reg_name";

/// Header names reported for XML records, in field order.
pub const XML_HEADERS: [&str; 5] = ["Code", "Name", "Latitude", "Longitude", MARINE_REGION_FIELD];

#[derive(Debug, Deserialize)]
struct LocationsXml {
    #[serde(rename = "Location", default)]
    locations: Vec<LocationXml>,
}

#[derive(Debug, Deserialize)]
struct LocationXml {
    #[serde(rename = "Code", default)]
    code: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Latitude", default)]
    latitude: String,
    #[serde(rename = "Longitude", default)]
    longitude: String,
    #[serde(default)]
    marine_reg_name: Option<String>,
}

/// An XML file of tide gauge locations.
#[derive(Debug, Clone)]
pub struct XmlSource {
    path: PathBuf,
    provides: Capabilities,
}

impl XmlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            provides: Capabilities::new(),
        }
    }

    /// Tag every record from this file with these capabilities.
    pub fn with_provides(mut self, provides: Capabilities) -> Self {
        self.provides = provides;
        self
    }
}

impl PointSource for XmlSource {
    fn load(&self) -> Result<LoadReport, SourceError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| SourceError::from_io(&self.path, e))?;
        let report = read_xml(&text, &self.path, &self.provides)?;

        info!(
            source = %self.path.display(),
            records = report.records.len(),
            skipped = report.skipped,
            "loaded XML stations"
        );

        Ok(report)
    }

    fn describe(&self) -> String {
        format!("XML {}", self.path.display())
    }
}

/// Parse `<Location>` elements from an XML document.
pub fn read_xml(
    text: &str,
    origin: &Path,
    provides: &Capabilities,
) -> Result<LoadReport, SourceError> {
    let text = text.trim_start_matches('\u{feff}');
    let doc: LocationsXml = from_str(text).map_err(|e| SourceError::Xml {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut report = LoadReport {
        headers: XML_HEADERS.iter().map(|h| h.to_string()).collect(),
        records: Vec::with_capacity(doc.locations.len()),
        skipped: 0,
    };

    for (position, loc) in doc.locations.into_iter().enumerate() {
        match to_record(&loc, provides) {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                warn!(
                    source = %origin.display(),
                    location = position + 1,
                    code = %loc.code,
                    %reason,
                    "skipping location"
                );
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

fn to_record(loc: &LocationXml, provides: &Capabilities) -> Result<SourceRecord, String> {
    let lat: f64 = loc
        .latitude
        .trim()
        .parse()
        .map_err(|_| format!("latitude is not a number: {:?}", loc.latitude))?;
    let lon: f64 = loc
        .longitude
        .trim()
        .parse()
        .map_err(|_| format!("longitude is not a number: {:?}", loc.longitude))?;

    let point = GeoPoint::parse(&loc.code, loc.name.trim(), lat, lon).map_err(|e| e.to_string())?;

    Ok(SourceRecord {
        point,
        capabilities: provides.clone(),
        fields: vec![
            loc.code.clone(),
            loc.name.clone(),
            loc.latitude.clone(),
            loc.longitude.clone(),
            loc.marine_reg_name.clone().unwrap_or_default(),
        ],
    })
}
