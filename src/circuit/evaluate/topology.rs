use std::collections::{BTreeMap, VecDeque};

use crate::circuit::flowsheet::{Flowsheet, NodeId};

use super::EvaluationError;

/// Orders the nodes so every node follows all of its predecessors.
///
/// Kahn's algorithm with a FIFO queue, seeded with the zero in-degree nodes
/// in insertion order.
///
/// # Errors
///
/// Returns [`EvaluationError::CycleOrUnreachable`] listing, in insertion
/// order, every node the walk never reached.
pub(crate) fn topological_order(flowsheet: &Flowsheet) -> Result<Vec<NodeId>, EvaluationError> {
    let mut in_degree: BTreeMap<&NodeId, usize> =
        flowsheet.nodes().map(|node| (&node.id, 0)).collect();
    for edge in flowsheet.edges() {
        if let Some(degree) = in_degree.get_mut(&edge.target) {
            *degree += 1;
        }
    }

    let mut ready: VecDeque<&NodeId> = flowsheet
        .nodes()
        .map(|node| &node.id)
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();

    let mut order = Vec::with_capacity(flowsheet.len());
    while let Some(id) = ready.pop_front() {
        order.push(id.clone());
        for edge in flowsheet.outbound(id) {
            if let Some(degree) = in_degree.get_mut(&edge.target) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(&edge.target);
                }
            }
        }
    }

    if order.len() < flowsheet.len() {
        let unvisited = flowsheet
            .nodes()
            .map(|node| &node.id)
            .filter(|id| in_degree.get(id).is_some_and(|degree| *degree > 0))
            .cloned()
            .collect();
        return Err(EvaluationError::CycleOrUnreachable { unvisited });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Length, length::millimeter};

    use crate::circuit::flowsheet::{Edge, Node, NodeKind, PortId};

    fn cone(id: &str) -> Node {
        Node::new(
            id,
            id,
            NodeKind::cone_crusher(Length::new::<millimeter>(25.0)).unwrap(),
        )
    }

    fn ids(order: &[NodeId]) -> Vec<&str> {
        order.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn predecessors_come_first() {
        // Insert the chain backwards so insertion order differs from flow order.
        let fs = Flowsheet::from_parts(
            [
                Node::new("p", "P", NodeKind::Product),
                cone("c2"),
                cone("c1"),
                Node::new("f", "F", NodeKind::Feed),
            ],
            [
                Edge::new("c2", PortId::Outlet, "p", PortId::Inlet),
                Edge::new("c1", PortId::Outlet, "c2", PortId::Inlet),
                Edge::new("f", PortId::Outlet, "c1", PortId::Inlet),
            ],
        )
        .unwrap();

        assert_eq!(ids(&topological_order(&fs).unwrap()), ["f", "c1", "c2", "p"]);
    }

    #[test]
    fn siblings_follow_insertion_order() {
        let fs = Flowsheet::from_parts(
            [
                Node::new("f", "F", NodeKind::Feed),
                Node::new(
                    "s",
                    "S",
                    NodeKind::screen(Length::new::<millimeter>(30.0)).unwrap(),
                ),
                cone("over"),
                Node::new("under", "U", NodeKind::Product),
            ],
            [
                Edge::new("f", PortId::Outlet, "s", PortId::Inlet),
                Edge::new("s", PortId::Undersize, "under", PortId::Inlet),
                Edge::new("s", PortId::Oversize, "over", PortId::Inlet),
            ],
        )
        .unwrap();

        // Siblings are queued in edge order.
        assert_eq!(ids(&topological_order(&fs).unwrap()), ["f", "s", "under", "over"]);
    }

    #[test]
    fn cycles_are_reported_with_every_stuck_node() {
        let fs = Flowsheet::from_parts(
            [
                Node::new("f", "F", NodeKind::Feed),
                cone("a"),
                cone("b"),
                Node::new("p", "P", NodeKind::Product),
            ],
            [
                Edge::new("f", PortId::Outlet, "a", PortId::Inlet),
                Edge::new("a", PortId::Outlet, "b", PortId::Inlet),
                Edge::new("b", PortId::Outlet, "a", PortId::Inlet),
                Edge::new("b", PortId::Outlet, "p", PortId::Inlet),
            ],
        )
        .unwrap();

        assert_eq!(
            topological_order(&fs),
            Err(EvaluationError::CycleOrUnreachable {
                unvisited: vec!["a".into(), "b".into(), "p".into()]
            })
        );
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let fs = Flowsheet::from_parts(
            [cone("a")],
            [Edge::new("a", PortId::Outlet, "a", PortId::Inlet)],
        )
        .unwrap();
        assert!(matches!(
            topological_order(&fs),
            Err(EvaluationError::CycleOrUnreachable { .. })
        ));
    }
}
