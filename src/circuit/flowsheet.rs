//! The flowsheet graph.
//!
//! A [`Flowsheet`] is an arena of [`Node`]s keyed by [`NodeId`] plus a
//! separate list of [`Edge`]s. Nodes never hold references to each other, so
//! removing a node is a map removal plus a sweep of the edge list.
//!
//! Each [`NodeKind`] owns a fixed set of ports. [`Flowsheet::connect`] checks
//! that both ports exist, that they face the right way, and that the target
//! inlet is not already fed.

mod error;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::{
    models::comminution::crusher::CrusherFamily,
    support::constraint::{Constrained, ConstraintResult, StrictlyPositive},
};

pub use error::FlowsheetError;

/// Unique identifier of a node within a flowsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a port receives or emits a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    In,
    Out,
}

/// A port on a node.
///
/// The direction is fixed by the port itself: `Inlet` is the only `in` port,
/// all others emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortId {
    #[serde(rename = "in")]
    Inlet,
    #[serde(rename = "out")]
    Outlet,
    Oversize,
    Undersize,
}

impl PortId {
    #[must_use]
    pub fn direction(self) -> PortDirection {
        match self {
            Self::Inlet => PortDirection::In,
            Self::Outlet | Self::Oversize | Self::Undersize => PortDirection::Out,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inlet => "in",
            Self::Outlet => "out",
            Self::Oversize => "oversize",
            Self::Undersize => "undersize",
        }
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit operation a node performs, with its physical parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Emits the initial feed at plant throughput.
    Feed,
    JawCrusher {
        css: Constrained<Length, StrictlyPositive>,
    },
    ConeCrusher {
        css: Constrained<Length, StrictlyPositive>,
    },
    Screen {
        aperture: Constrained<Length, StrictlyPositive>,
    },
    /// Collects a final product.
    Product,
}

impl NodeKind {
    /// A jaw crusher at the given closed-side setting.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the CSS is not strictly positive.
    pub fn jaw_crusher(css: Length) -> ConstraintResult<Self> {
        Ok(Self::JawCrusher {
            css: StrictlyPositive::new(css)?,
        })
    }

    /// A cone crusher at the given closed-side setting.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the CSS is not strictly positive.
    pub fn cone_crusher(css: Length) -> ConstraintResult<Self> {
        Ok(Self::ConeCrusher {
            css: StrictlyPositive::new(css)?,
        })
    }

    /// A crusher of the given family.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the CSS is not strictly positive.
    pub fn crusher(family: CrusherFamily, css: Length) -> ConstraintResult<Self> {
        match family {
            CrusherFamily::Jaw => Self::jaw_crusher(css),
            CrusherFamily::Cone => Self::cone_crusher(css),
        }
    }

    /// A screen with the given aperture.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the aperture is not strictly positive.
    pub fn screen(aperture: Length) -> ConstraintResult<Self> {
        Ok(Self::Screen {
            aperture: StrictlyPositive::new(aperture)?,
        })
    }

    /// Ports owned by this kind of node.
    #[must_use]
    pub fn ports(&self) -> &'static [PortId] {
        match self {
            Self::Feed => &[PortId::Outlet],
            Self::JawCrusher { .. } | Self::ConeCrusher { .. } => &[PortId::Inlet, PortId::Outlet],
            Self::Screen { .. } => &[PortId::Inlet, PortId::Oversize, PortId::Undersize],
            Self::Product => &[PortId::Inlet],
        }
    }

    #[must_use]
    pub fn has_port(&self, port: PortId) -> bool {
        self.ports().contains(&port)
    }

    #[must_use]
    pub fn crusher_family(&self) -> Option<CrusherFamily> {
        match self {
            Self::JawCrusher { .. } => Some(CrusherFamily::Jaw),
            Self::ConeCrusher { .. } => Some(CrusherFamily::Cone),
            _ => None,
        }
    }

    /// The CSS of a crusher or the aperture of a screen.
    #[must_use]
    pub fn setting(&self) -> Option<Length> {
        match self {
            Self::JawCrusher { css } | Self::ConeCrusher { css } => Some(*css.as_ref()),
            Self::Screen { aperture } => Some(*aperture.as_ref()),
            Self::Feed | Self::Product => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::JawCrusher { .. } => "jaw crusher",
            Self::ConeCrusher { .. } => "cone crusher",
            Self::Screen { .. } => "screen",
            Self::Product => "product",
        }
    }
}

/// A unit operation instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,

    /// Display name used in reports.
    pub name: String,

    pub kind: NodeKind,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// A stream from an outlet port to an inlet port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub source_port: PortId,
    pub target: NodeId,
    pub target_port: PortId,
}

impl Edge {
    #[must_use]
    pub fn new(
        source: impl Into<NodeId>,
        source_port: PortId,
        target: impl Into<NodeId>,
        target_port: PortId,
    ) -> Self {
        Self {
            source: source.into(),
            source_port,
            target: target.into(),
            target_port,
        }
    }
}

/// Nodes keyed by id plus the edges between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flowsheet {
    nodes: BTreeMap<NodeId, Node>,

    /// Node ids in insertion order.
    order: Vec<NodeId>,

    edges: Vec<Edge>,
}

impl Flowsheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a flowsheet from raw parts.
    ///
    /// Node ids must be unique and every edge must join existing nodes
    /// through ports of the right direction. Unlike [`Flowsheet::connect`],
    /// an inlet may receive more than one edge here.
    ///
    /// Cycles are not rejected. They are reported when the flowsheet is
    /// evaluated.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowsheetError`] for duplicate ids or invalid edges.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, FlowsheetError> {
        let mut flowsheet = Self::new();
        for node in nodes {
            flowsheet.insert(node)?;
        }
        for edge in edges {
            flowsheet.check_edge(&edge)?;
            flowsheet.edges.push(edge);
        }
        Ok(flowsheet)
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::DuplicateNode`] if the id is taken.
    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId, FlowsheetError> {
        let node = Node::new(id, name, kind);
        let id = node.id.clone();
        self.insert(node)?;
        Ok(id)
    }

    fn insert(&mut self, node: Node) -> Result<(), FlowsheetError> {
        if self.nodes.contains_key(&node.id) {
            return Err(FlowsheetError::DuplicateNode(node.id));
        }
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Removes a node and every edge touching it.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::UnknownNode`] if no node has this id.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, FlowsheetError> {
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| FlowsheetError::UnknownNode(id.clone()))?;
        self.order.retain(|other| other != id);
        self.edges.retain(|e| &e.source != id && &e.target != id);
        Ok(node)
    }

    /// Connects an outlet port to a free inlet port.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowsheetError`] if either node or port is unknown, a port
    /// faces the wrong way, or the inlet is already fed.
    pub fn connect(
        &mut self,
        source: impl Into<NodeId>,
        source_port: PortId,
        target: impl Into<NodeId>,
        target_port: PortId,
    ) -> Result<(), FlowsheetError> {
        let edge = Edge::new(source, source_port, target, target_port);
        self.check_edge(&edge)?;

        if self
            .edges
            .iter()
            .any(|e| e.target == edge.target && e.target_port == edge.target_port)
        {
            return Err(FlowsheetError::InletOccupied {
                node: edge.target,
                port: edge.target_port,
            });
        }

        self.edges.push(edge);
        Ok(())
    }

    /// Removes the edge feeding `target`'s `port`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::NotConnected`] if nothing feeds that port.
    pub fn disconnect(&mut self, target: &NodeId, port: PortId) -> Result<Edge, FlowsheetError> {
        let index = self
            .edges
            .iter()
            .position(|e| &e.target == target && e.target_port == port)
            .ok_or_else(|| FlowsheetError::NotConnected {
                node: target.clone(),
                port,
            })?;
        Ok(self.edges.remove(index))
    }

    fn check_edge(&self, edge: &Edge) -> Result<(), FlowsheetError> {
        self.check_port(&edge.source, edge.source_port, PortDirection::Out)?;
        self.check_port(&edge.target, edge.target_port, PortDirection::In)
    }

    fn check_port(
        &self,
        id: &NodeId,
        port: PortId,
        expected: PortDirection,
    ) -> Result<(), FlowsheetError> {
        let node = self.node_or_err(id)?;
        if !node.kind.has_port(port) {
            return Err(FlowsheetError::UnknownPort {
                node: id.clone(),
                port,
            });
        }
        if port.direction() != expected {
            return Err(FlowsheetError::WrongDirection {
                node: id.clone(),
                port,
                expected,
            });
        }
        Ok(())
    }

    /// Changes a crusher's CSS or a screen's aperture.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowsheetError`] if the node is unknown, has no setting,
    /// or the value is not strictly positive.
    pub fn set_setting(&mut self, id: &NodeId, setting: Length) -> Result<(), FlowsheetError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| FlowsheetError::UnknownNode(id.clone()))?;

        let value = StrictlyPositive::new(setting).map_err(|source| {
            FlowsheetError::InvalidSetting {
                node: id.clone(),
                source,
            }
        });

        match &mut node.kind {
            NodeKind::JawCrusher { css } | NodeKind::ConeCrusher { css } => *css = value?,
            NodeKind::Screen { aperture } => *aperture = value?,
            NodeKind::Feed | NodeKind::Product => {
                return Err(FlowsheetError::NoSetting(id.clone()));
            }
        }
        Ok(())
    }

    /// Renames a node.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::UnknownNode`] if no node has this id.
    pub fn rename(&mut self, id: &NodeId, name: impl Into<String>) -> Result<(), FlowsheetError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| FlowsheetError::UnknownNode(id.clone()))?;
        node.name = name.into();
        Ok(())
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn node_or_err(&self, id: &NodeId) -> Result<&Node, FlowsheetError> {
        self.node(id)
            .ok_or_else(|| FlowsheetError::UnknownNode(id.clone()))
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges arriving at `id`, in insertion order.
    pub fn inbound<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.target == id)
    }

    /// Edges leaving `id`, in insertion order.
    pub fn outbound<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == id)
    }

    /// `id` and every node reachable from it.
    #[must_use]
    pub fn downstream(&self, id: &NodeId) -> BTreeSet<NodeId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([id.clone()]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            for edge in self.outbound(&current) {
                if !seen.contains(&edge.target) {
                    queue.push_back(edge.target.clone());
                }
            }
        }

        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::length::millimeter;

    use crate::support::constraint::ConstraintError;

    fn mm(value: f64) -> Length {
        Length::new::<millimeter>(value)
    }

    fn crusher_screen_product() -> Flowsheet {
        let mut fs = Flowsheet::new();
        fs.add_node("feed", "Feed", NodeKind::Feed).unwrap();
        fs.add_node("jaw", "Primary", NodeKind::jaw_crusher(mm(90.0)).unwrap())
            .unwrap();
        fs.add_node("screen", "Scalper", NodeKind::screen(mm(40.0)).unwrap())
            .unwrap();
        fs.add_node("fines", "Fines", NodeKind::Product).unwrap();
        fs.connect("feed", PortId::Outlet, "jaw", PortId::Inlet)
            .unwrap();
        fs.connect("jaw", PortId::Outlet, "screen", PortId::Inlet)
            .unwrap();
        fs.connect("screen", PortId::Undersize, "fines", PortId::Inlet)
            .unwrap();
        fs
    }

    #[test]
    fn ports_follow_the_node_kind() {
        assert_eq!(NodeKind::Feed.ports(), &[PortId::Outlet]);
        assert_eq!(NodeKind::Product.ports(), &[PortId::Inlet]);
        let screen = NodeKind::screen(mm(10.0)).unwrap();
        assert!(screen.has_port(PortId::Oversize));
        assert!(!screen.has_port(PortId::Outlet));
        assert_eq!(PortId::Undersize.direction(), PortDirection::Out);
        assert_eq!(PortId::Inlet.direction(), PortDirection::In);
    }

    #[test]
    fn settings_must_be_positive() {
        assert_eq!(NodeKind::cone_crusher(mm(0.0)), Err(ConstraintError::Zero));
        assert_eq!(NodeKind::screen(mm(-1.0)), Err(ConstraintError::Negative));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut fs = crusher_screen_product();
        assert_eq!(
            fs.add_node("jaw", "Again", NodeKind::Product),
            Err(FlowsheetError::DuplicateNode("jaw".into()))
        );
    }

    #[test]
    fn connect_checks_ports() {
        let mut fs = crusher_screen_product();

        assert_eq!(
            fs.connect("screen", PortId::Outlet, "fines", PortId::Inlet),
            Err(FlowsheetError::UnknownPort {
                node: "screen".into(),
                port: PortId::Outlet
            })
        );
        assert_eq!(
            fs.connect("screen", PortId::Inlet, "jaw", PortId::Inlet),
            Err(FlowsheetError::WrongDirection {
                node: "screen".into(),
                port: PortId::Inlet,
                expected: PortDirection::Out,
            })
        );
        assert_eq!(
            fs.connect("screen", PortId::Oversize, "missing", PortId::Inlet),
            Err(FlowsheetError::UnknownNode("missing".into()))
        );
    }

    #[test]
    fn an_inlet_takes_one_stream() {
        let mut fs = crusher_screen_product();
        assert_eq!(
            fs.connect("screen", PortId::Oversize, "fines", PortId::Inlet),
            Err(FlowsheetError::InletOccupied {
                node: "fines".into(),
                port: PortId::Inlet
            })
        );

        fs.disconnect(&"fines".into(), PortId::Inlet).unwrap();
        fs.connect("screen", PortId::Oversize, "fines", PortId::Inlet)
            .expect("inlet is free again");
    }

    #[test]
    fn from_parts_allows_merging_inlets() {
        let fs = Flowsheet::from_parts(
            [
                Node::new("a", "A", NodeKind::Feed),
                Node::new("b", "B", NodeKind::Feed),
                Node::new("p", "P", NodeKind::Product),
            ],
            [
                Edge::new("a", PortId::Outlet, "p", PortId::Inlet),
                Edge::new("b", PortId::Outlet, "p", PortId::Inlet),
            ],
        )
        .expect("valid parts");

        assert_eq!(fs.inbound(&"p".into()).count(), 2);
    }

    #[test]
    fn from_parts_rejects_dangling_edges() {
        let err = Flowsheet::from_parts(
            [Node::new("a", "A", NodeKind::Feed)],
            [Edge::new("a", PortId::Outlet, "ghost", PortId::Inlet)],
        )
        .unwrap_err();
        assert_eq!(err, FlowsheetError::UnknownNode("ghost".into()));
    }

    #[test]
    fn removing_a_node_drops_its_edges() {
        let mut fs = crusher_screen_product();
        let removed = fs.remove_node(&"screen".into()).unwrap();

        assert_eq!(removed.name, "Scalper");
        assert_eq!(fs.len(), 3);
        assert_eq!(fs.edges().len(), 1);
        assert_eq!(
            fs.nodes().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            ["feed", "jaw", "fines"]
        );
    }

    #[test]
    fn settings_can_be_edited() {
        let mut fs = crusher_screen_product();
        fs.set_setting(&"jaw".into(), mm(75.0)).unwrap();

        let css = fs.node(&"jaw".into()).unwrap().kind.setting().unwrap();
        assert!((css.get::<millimeter>() - 75.0).abs() < 1e-9);

        assert_eq!(
            fs.set_setting(&"feed".into(), mm(75.0)),
            Err(FlowsheetError::NoSetting("feed".into()))
        );
        assert_eq!(
            fs.set_setting(&"screen".into(), mm(0.0)),
            Err(FlowsheetError::InvalidSetting {
                node: "screen".into(),
                source: ConstraintError::Zero
            })
        );
    }

    #[test]
    fn downstream_includes_the_node_itself() {
        let fs = crusher_screen_product();
        let ids: Vec<_> = fs
            .downstream(&"jaw".into())
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, ["fines", "jaw", "screen"]);
    }
}
