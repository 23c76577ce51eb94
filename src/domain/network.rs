// ==========================================
// SpaceNet 货运清单引擎 - 补给网络模型
// ==========================================
// 职责: 节点、运输边、补给边 (SupplyEdge)、补给点 (SupplyPoint)
// 红线: 补给点按时间降序、节点升序排列（越晚的需求越靠前）
// 红线: 补给边排序与其补给点一致，同一结束时间按起点节点区分
// ==========================================

use crate::domain::carrier::CarrierId;
use crate::domain::types::NodeType;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 节点标识
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// Node - 网络节点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
    /// 所属天体 (EARTH / MOON / MARS ...)
    pub body: String,
}

impl Node {
    /// 地球表面节点（补给链的源头，无需再向上游追溯）
    pub fn is_earth_surface(&self) -> bool {
        self.node_type == NodeType::Surface && self.body.eq_ignore_ascii_case("EARTH")
    }
}

// ==========================================
// TransportLeg - 底层运输边（无方向）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportLeg {
    pub name: String,
    pub origin: NodeId,
    pub destination: NodeId,
}

/// 补给边标识（在 Manifest 内为排序后下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplyEdgeId(pub usize);

impl fmt::Display for SupplyEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

// ==========================================
// SupplyPoint - 补给点
// ==========================================
// 由补给边派生: (终点节点, 结束时间)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyPoint {
    pub node: NodeId,
    pub time: f64,
}

impl SupplyPoint {
    pub fn new(node: NodeId, time: f64) -> Self {
        Self { node, time }
    }
}

impl PartialEq for SupplyPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SupplyPoint {}

impl PartialOrd for SupplyPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SupplyPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        // 时间降序，其次节点升序
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl fmt::Display for SupplyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1})", self.node, self.time)
    }
}

// ==========================================
// SupplyEdge - 补给边
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyEdge {
    pub leg: TransportLeg,
    /// 是否反向通过底层运输边
    pub reversed: bool,
    pub start_time: f64,
    pub end_time: f64,
    /// 顶层运载器（嵌套运载器经 CarrierRegistry 展开）
    pub carriers: Vec<CarrierId>,
}

impl SupplyEdge {
    /// 实际起点（考虑方向）
    pub fn origin(&self) -> &NodeId {
        if self.reversed {
            &self.leg.destination
        } else {
            &self.leg.origin
        }
    }

    /// 实际终点（考虑方向）
    pub fn destination(&self) -> &NodeId {
        if self.reversed {
            &self.leg.origin
        } else {
            &self.leg.destination
        }
    }

    /// 本边派生的补给点
    pub fn point(&self) -> SupplyPoint {
        SupplyPoint::new(self.destination().clone(), self.end_time)
    }

    /// 补给边排序: 结束时间降序，其次起点节点升序
    pub fn natural_cmp(&self, other: &SupplyEdge) -> Ordering {
        other
            .end_time
            .total_cmp(&self.end_time)
            .then_with(|| self.origin().cmp(other.origin()))
    }
}

impl fmt::Display for SupplyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.1}) - {} ({:.1})",
            self.origin(),
            self.start_time,
            self.destination(),
            self.end_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn create_test_edge(origin: &str, destination: &str, start: f64, end: f64, reversed: bool) -> SupplyEdge {
        SupplyEdge {
            leg: TransportLeg {
                name: format!("{}-{}", origin, destination),
                origin: NodeId::new(origin),
                destination: NodeId::new(destination),
            },
            reversed,
            start_time: start,
            end_time: end,
            carriers: vec![],
        }
    }

    #[test]
    fn test_point_order_latest_first() {
        let mut points = BTreeSet::new();
        points.insert(SupplyPoint::new(NodeId::new("LEO"), 1.0));
        points.insert(SupplyPoint::new(NodeId::new("LLO"), 5.0));
        points.insert(SupplyPoint::new(NodeId::new("ALPHA"), 5.0));
        let ordered: Vec<_> = points.iter().map(|p| (p.node.0.as_str(), p.time)).collect();
        assert_eq!(ordered, vec![("ALPHA", 5.0), ("LLO", 5.0), ("LEO", 1.0)]);
    }

    #[test]
    fn test_point_equality_deduplicates() {
        let mut points = BTreeSet::new();
        points.insert(SupplyPoint::new(NodeId::new("LEO"), 2.0));
        points.insert(SupplyPoint::new(NodeId::new("LEO"), 2.0));
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_reversed_edge_direction() {
        let edge = create_test_edge("KSC", "LEO", 0.0, 1.0, true);
        assert_eq!(edge.origin(), &NodeId::new("LEO"));
        assert_eq!(edge.destination(), &NodeId::new("KSC"));
        assert_eq!(edge.point(), SupplyPoint::new(NodeId::new("KSC"), 1.0));
    }

    #[test]
    fn test_edge_order_matches_point_order() {
        let early = create_test_edge("KSC", "LEO", 0.0, 1.0, false);
        let late = create_test_edge("LEO", "LLO", 1.0, 4.0, false);
        assert_eq!(late.natural_cmp(&early), Ordering::Less);
        assert_eq!(late.point().cmp(&early.point()), Ordering::Less);
    }
}
