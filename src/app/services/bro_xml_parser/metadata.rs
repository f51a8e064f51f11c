//! Scalar metadata lookup in BRO XML documents

use crate::constants::{BRO_PARAMETER_AVAILABLE, DEFAULT_CONE_COEFFICIENT, bro_ns};
use crate::{Error, Result};
use roxmltree::{Document, Node};

/// Scalar values of a BRO CPT, as found in the document
#[derive(Debug, Clone, PartialEq)]
pub struct BroMetadata {
    pub bro_id: Option<String>,
    pub cpt_standard: Option<String>,
    /// Height of the local reference point relative to the vertical datum
    pub offset: Option<f64>,
    pub local_reference: Option<String>,
    pub vertical_datum: Option<String>,
    pub quality_class: Option<String>,
    pub cone_penetrometer_type: Option<String>,
    pub result_time: Option<String>,
    /// Zero when the document has no pre-drilled depth
    pub predrilled_depth: f64,
    pub cone_surface_quotient: f64,
    /// `true` when the document declared `coneSurfaceQuotient`
    pub cone_surface_quotient_declared: bool,
}

impl BroMetadata {
    /// Extract all scalars from a parsed document
    pub fn extract(doc: &Document) -> Result<Self> {
        let root = doc.root();

        let offset = find_text(root, bro_ns::CPT_COMMON, "offset")
            .map(|text| parse_number("offset", text))
            .transpose()?;
        let predrilled_depth = find_text(root, bro_ns::CPT_COMMON, "predrilledDepth")
            .map(|text| parse_number("predrilledDepth", text))
            .transpose()?
            .unwrap_or(0.0);
        let quotient = find_text(root, bro_ns::CPT_COMMON, "coneSurfaceQuotient")
            .map(|text| parse_number("coneSurfaceQuotient", text))
            .transpose()?;

        Ok(Self {
            bro_id: find_text(root, bro_ns::BRO_COMMON, "broId").map(str::to_string),
            cpt_standard: find_text(root, bro_ns::DS_CPT, "cptStandard").map(str::to_string),
            offset,
            local_reference: find_text(root, bro_ns::CPT_COMMON, "localVerticalReferencePoint")
                .map(str::to_string),
            vertical_datum: find_text(root, bro_ns::CPT_COMMON, "verticalDatum")
                .map(str::to_string),
            quality_class: find_text(root, bro_ns::CPT_COMMON, "qualityClass")
                .map(str::to_string),
            cone_penetrometer_type: find_text(root, bro_ns::CPT_COMMON, "conePenetrometerType")
                .map(str::to_string),
            result_time: result_time(root),
            predrilled_depth,
            cone_surface_quotient: quotient.unwrap_or(DEFAULT_CONE_COEFFICIENT),
            cone_surface_quotient_declared: quotient.is_some(),
        })
    }

    /// Names of required scalars the document lacks
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("broId", self.bro_id.is_some()),
            ("offset", self.offset.is_some()),
            ("coneSurfaceQuotient", self.cone_surface_quotient_declared),
            ("verticalDatum", self.vertical_datum.is_some()),
            ("localVerticalReferencePoint", self.local_reference.is_some()),
            ("qualityClass", self.quality_class.is_some()),
            ("conePenetrometerType", self.cone_penetrometer_type.is_some()),
            ("cptStandard", self.cpt_standard.is_some()),
            ("resultTime", self.result_time.is_some()),
        ];
        checks
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Whether an element has the given namespace and local name
pub fn is_element(node: &Node, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}

/// First descendant element with the given name
pub fn find_element<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants().find(|n| is_element(n, namespace, name))
}

/// Trimmed text of the first matching descendant, if non-empty
pub fn find_text<'a>(node: Node<'a, '_>, namespace: &str, name: &str) -> Option<&'a str> {
    find_element(node, namespace, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// `om:resultTime` of the cone penetration test
///
/// The time sits in a nested `gml:TimeInstant`, so the first non-empty text
/// below the element is taken.
fn result_time(root: Node) -> Option<String> {
    let test = find_element(root, bro_ns::CPT_COMMON, "conePenetrationTest")?;
    let time = find_element(test, bro_ns::OM, "resultTime")?;
    time.descendants()
        .filter_map(|n| n.text())
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Local names of the parameters flagged as populated
pub fn available_columns(doc: &Document) -> Vec<String> {
    doc.descendants()
        .filter(|n| is_element(n, bro_ns::CPT_COMMON, "parameters"))
        .flat_map(|parameters| parameters.children())
        .filter(|n| n.is_element())
        .filter(|n| n.text().map(str::trim) == Some(BRO_PARAMETER_AVAILABLE))
        .map(|n| n.tag_name().name().to_string())
        .collect()
}

fn parse_number(element: &str, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Error::xml_format(format!(
                "Element {} holds '{}', expected a finite number",
                element, text
            ))
        })
}
