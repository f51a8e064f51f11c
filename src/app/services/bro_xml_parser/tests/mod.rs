//! Test utilities for BRO XML parser testing
//!
//! [`BroFixture`] renders a single CPT either as a dispatch document or as a
//! member of a bulk feature collection.

use crate::constants::{BRO_NO_DATA, BRO_VALUE_COLUMNS};
use std::ops::Range;


const NAMESPACES: &str = concat!(
    r#"xmlns="http://www.broservices.nl/xsd/dscpt/1.1" "#,
    r#"xmlns:brocom="http://www.broservices.nl/xsd/brocommon/3.0" "#,
    r#"xmlns:cptcom="http://www.broservices.nl/xsd/cptcommon/1.1" "#,
    r#"xmlns:gml="http://www.opengis.net/gml/3.2" "#,
    r#"xmlns:om="http://www.opengis.net/om/2.0""#
);

/// One values row; named columns get the given values, the rest is no-data
pub fn value_row(values: &[(&str, f64)]) -> String {
    BRO_VALUE_COLUMNS
        .iter()
        .map(|name| {
            let value = values
                .iter()
                .find(|(column, _)| column == name)
                .map(|(_, v)| *v)
                .unwrap_or(BRO_NO_DATA);
            format!("{}", value)
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Row with the four required channels and u2 pore pressure (values in MPa)
pub fn standard_row(penetration_length: f64) -> String {
    value_row(&[
        ("penetrationLength", penetration_length),
        ("coneResistance", 2.5),
        ("localFriction", 0.05),
        ("frictionRatio", 2.0),
        ("porePressureU2", 0.1),
    ])
}

/// A single BRO CPT rendered as XML
#[derive(Debug, Clone)]
pub struct BroFixture {
    pub bro_id: Option<String>,
    pub srs_name: String,
    pub pos: String,
    pub offset: Option<String>,
    pub predrilled_depth: Option<String>,
    pub cone_surface_quotient: Option<String>,
    pub available: Vec<&'static str>,
    pub rows: Vec<String>,
}

impl Default for BroFixture {
    /// 60 samples from 0.1 m to 6.0 m
    fn default() -> Self {
        Self {
            bro_id: Some("CPT000000012345".to_string()),
            srs_name: "urn:ogc:def:crs:EPSG::28992".to_string(),
            pos: "155000.000 463000.000".to_string(),
            offset: Some("-1.230".to_string()),
            predrilled_depth: Some("0.000".to_string()),
            cone_surface_quotient: Some("0.75".to_string()),
            available: vec![
                "penetrationLength",
                "coneResistance",
                "localFriction",
                "frictionRatio",
                "porePressureU2",
            ],
            rows: (1..=60).map(|i| standard_row(i as f64 / 10.0)).collect(),
        }
    }
}

impl BroFixture {
    pub fn with_rows(mut self, rows: Vec<String>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_available(mut self, available: Vec<&'static str>) -> Self {
        self.available = available;
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.bro_id = Some(id.to_string());
        self
    }

    /// The `CPT_O` feature element
    pub fn feature(&self) -> String {
        let optional = |tag: &str, value: &Option<String>| {
            value
                .as_ref()
                .map(|v| format!("<{tag}>{v}</{tag}>"))
                .unwrap_or_default()
        };
        let parameters: String = BRO_VALUE_COLUMNS
            .iter()
            .map(|name| {
                let flag = if self.available.contains(name) {
                    "ja"
                } else {
                    "nee"
                };
                format!("<cptcom:{name}>{flag}</cptcom:{name}>")
            })
            .collect();

        format!(
            r#"<CPT_O gml:id="BRO_0001">
  {bro_id}
  <cptStandard codeSpace="urn:bro:cpt:CPTStandard">NEN-EN-ISO22476-1Klasse2TypeTE2</cptStandard>
  <deliveredLocation>
    <location>
      <gml:Point gml:id="BRO_0002" srsName="{srs}">
        <gml:pos>{pos}</gml:pos>
      </gml:Point>
    </location>
  </deliveredLocation>
  <deliveredVerticalPosition>
    <cptcom:localVerticalReferencePoint codeSpace="urn:bro:cpt:LocalVerticalReferencePoint">maaiveld</cptcom:localVerticalReferencePoint>
    {offset}
    <cptcom:verticalDatum codeSpace="urn:bro:cpt:VerticalDatum">NAP</cptcom:verticalDatum>
  </deliveredVerticalPosition>
  <conePenetrometerSurvey>
    <cptcom:qualityClass codeSpace="urn:bro:cpt:QualityClass">klasse2</cptcom:qualityClass>
    <cptcom:trajectory>{predrilled}</cptcom:trajectory>
    <cptcom:conePenetrometer>
      <cptcom:conePenetrometerType>F7.5CKEHG/B-1701-0745</cptcom:conePenetrometerType>
      {quotient}
    </cptcom:conePenetrometer>
    <cptcom:parameters>{parameters}</cptcom:parameters>
    <cptcom:conePenetrationTest gml:id="BRO_0003">
      <om:resultTime>
        <gml:TimeInstant gml:id="BRO_0004">
          <gml:timePosition>2019-03-13T00:00:00+01:00</gml:timePosition>
        </gml:TimeInstant>
      </om:resultTime>
      <cptcom:cptResult>
        <cptcom:values>{values};</cptcom:values>
      </cptcom:cptResult>
    </cptcom:conePenetrationTest>
  </conePenetrometerSurvey>
</CPT_O>"#,
            bro_id = optional("brocom:broId", &self.bro_id),
            srs = self.srs_name,
            pos = self.pos,
            offset = optional("cptcom:offset", &self.offset),
            predrilled = optional("cptcom:predrilledDepth", &self.predrilled_depth),
            quotient = optional("cptcom:coneSurfaceQuotient", &self.cone_surface_quotient),
            parameters = parameters,
            values = self.rows.join(";"),
        )
    }

    /// Single CPT dispatch document
    pub fn document(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<dispatchDocument {}>\n<dispatchCharacteristics/>\n{}\n</dispatchDocument>",
            NAMESPACES,
            self.feature()
        )
    }
}

/// Bulk feature collection and the byte range of each member
pub fn bulk_document(members: &[BroFixture]) -> (String, Vec<Range<usize>>) {
    let mut document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<gml:FeatureCollection {}>\n",
        NAMESPACES
    );
    let mut ranges = Vec::new();
    for member in members {
        let start = document.len();
        document.push_str("<gml:featureMember>");
        document.push_str(&member.feature());
        document.push_str("</gml:featureMember>");
        ranges.push(start..document.len());
        document.push('\n');
    }
    document.push_str("</gml:FeatureCollection>");
    (document, ranges)
}
