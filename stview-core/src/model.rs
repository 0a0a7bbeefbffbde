/// Node and member records of a structural model
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use nalgebra::Point3;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::coordinate::parse_coordinate;
use crate::error::{Error, Result};

/// Node identifier as it appears in the datasets.
///
/// Numbers and strings are distinct identifiers: `1` never matches `"1"`.
/// Integral floats such as `1.0` are the same number as `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

/// Largest magnitude an f64 holds without losing integer precision
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNodeId {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawNodeId::deserialize(deserializer)? {
            RawNodeId::Integer(n) => Ok(NodeId::Number(n)),
            RawNodeId::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => {
                Ok(NodeId::Number(f as i64))
            }
            RawNodeId::Float(f) => Err(de::Error::custom(format!(
                "node id {f} is not an integer"
            ))),
            RawNodeId::Text(s) => Ok(NodeId::Text(s)),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Number(n) => write!(f, "{n}"),
            NodeId::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Number(value)
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        NodeId::Number(value.into())
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Text(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Text(value)
    }
}

/// Coordinate axis, used when reporting a bad coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(name)
    }
}

/// A coordinate field: numeric text in the exported datasets, or a plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// Numeric value, or `None` when the text is not a finite number
    pub fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Number(n) if n.is_finite() => Some(*n),
            Coordinate::Number(_) => None,
            Coordinate::Text(text) => parse_coordinate(text),
        }
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Coordinate::Number(n) => Cow::Owned(n.to_string()),
            Coordinate::Text(text) => Cow::Borrowed(text),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Number(value)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

/// One structural joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(rename = "Node")]
    pub id: NodeId,
    #[serde(rename = "X")]
    pub x: Coordinate,
    #[serde(rename = "Y")]
    pub y: Coordinate,
    #[serde(rename = "Z")]
    pub z: Coordinate,
}

impl NodeRecord {
    pub fn new(
        id: impl Into<NodeId>,
        x: impl Into<Coordinate>,
        y: impl Into<Coordinate>,
        z: impl Into<Coordinate>,
    ) -> Self {
        Self {
            id: id.into(),
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Parsed position, failing on the first coordinate that is not a finite number
    pub fn position(&self) -> Result<Point3<f32>> {
        let x = self.axis_value(Axis::X, &self.x)?;
        let y = self.axis_value(Axis::Y, &self.y)?;
        let z = self.axis_value(Axis::Z, &self.z)?;
        Ok(Point3::new(x, y, z))
    }

    fn axis_value(&self, axis: Axis, coordinate: &Coordinate) -> Result<f32> {
        // Checked after narrowing: values beyond the f32 range become infinite
        let value = coordinate
            .value()
            .map(|value| value as f32)
            .filter(|value| value.is_finite());
        value.ok_or_else(|| Error::InvalidCoordinate {
            node: self.id.clone(),
            axis,
            text: coordinate.as_text().into_owned(),
        })
    }
}

/// A connecting element between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    #[serde(rename = "Start Node")]
    pub start: NodeId,
    #[serde(rename = "End Node")]
    pub end: NodeId,
}

impl MemberRecord {
    pub fn new(start: impl Into<NodeId>, end: impl Into<NodeId>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// The node and member datasets of one structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuralModel {
    pub nodes: Vec<NodeRecord>,
    pub members: Vec<MemberRecord>,
}

impl StructuralModel {
    pub fn new(nodes: Vec<NodeRecord>, members: Vec<MemberRecord>) -> Self {
        Self { nodes, members }
    }

    /// Parse both datasets from JSON arrays
    pub fn from_json(nodes_json: &str, members_json: &str) -> Result<Self> {
        let nodes: Vec<NodeRecord> = serde_json::from_str(nodes_json)?;
        let members: Vec<MemberRecord> = serde_json::from_str(members_json)?;
        Ok(Self::new(nodes, members))
    }

    /// Read and parse both datasets from disk
    pub fn from_files(nodes_path: impl AsRef<Path>, members_path: impl AsRef<Path>) -> Result<Self> {
        let nodes_json = fs::read_to_string(nodes_path)?;
        let members_json = fs::read_to_string(members_path)?;
        Self::from_json(&nodes_json, &members_json)
    }

    /// Find a node by identifier.
    ///
    /// Linear scan; the datasets are small exports of a single structure.
    pub fn find_node(&self, id: &NodeId) -> Option<&NodeRecord> {
        self.nodes.iter().find(|node| &node.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_coordinates() {
        let json = r#"[{"Node": 1, "X": "1.5", "Y": "-2", "Z": "0"}]"#;
        let nodes: Vec<NodeRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes[0].id, NodeId::Number(1));
        assert_eq!(nodes[0].position().unwrap(), Point3::new(1.5, -2.0, 0.0));
    }

    #[test]
    fn test_parse_numeric_coordinates() {
        let json = r#"[{"Node": "N1", "X": 3, "Y": 4.5, "Z": -1}]"#;
        let nodes: Vec<NodeRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes[0].id, NodeId::from("N1"));
        assert_eq!(nodes[0].position().unwrap(), Point3::new(3.0, 4.5, -1.0));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let json = r#"[{"Member": 7, "Start Node": 1, "End Node": 2, "Section": "W12"}]"#;
        let members: Vec<MemberRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(members[0], MemberRecord::new(1, 2));
    }

    #[test]
    fn test_invalid_coordinate_names_node_and_axis() {
        let node = NodeRecord::new(4, "1", "oops", "2");
        match node.position() {
            Err(Error::InvalidCoordinate { node, axis, text }) => {
                assert_eq!(node, NodeId::Number(4));
                assert_eq!(axis, Axis::Y);
                assert_eq!(text, "oops");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_identifiers_compare_strictly() {
        let model = StructuralModel::new(vec![NodeRecord::new(1, 0.0, 0.0, 0.0)], Vec::new());
        assert!(model.find_node(&NodeId::Number(1)).is_some());
        assert!(model.find_node(&NodeId::from("1")).is_none());
    }

    #[test]
    fn test_out_of_range_coordinate_is_rejected() {
        let node = NodeRecord::new(2, "1e39", "0", "0");
        assert!(matches!(
            node.position(),
            Err(Error::InvalidCoordinate { axis: Axis::X, .. })
        ));

        let node = NodeRecord::new(3, 0.0, -1e300, 0.0);
        assert!(matches!(
            node.position(),
            Err(Error::InvalidCoordinate { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn test_integral_float_ids_match_integers() {
        let nodes = r#"[{"Node": 1.0, "X": 0, "Y": 0, "Z": 0}, {"Node": 2, "X": 5, "Y": 0, "Z": 0}]"#;
        let members = r#"[{"Start Node": 1, "End Node": 2.0}]"#;
        let model = StructuralModel::from_json(nodes, members).unwrap();

        assert_eq!(model.nodes[0].id, NodeId::Number(1));
        assert_eq!(model.members[0], MemberRecord::new(1, 2));
        assert!(model.find_node(&model.members[0].start).is_some());
        assert!(model.find_node(&model.members[0].end).is_some());
    }

    #[test]
    fn test_fractional_ids_are_rejected() {
        let result = StructuralModel::from_json(r#"[{"Node": 1.5, "X": 0, "Y": 0, "Z": 0}]"#, "[]");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = StructuralModel::from_json("[{\"Node\": 1}]", "[]");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
