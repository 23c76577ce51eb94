// ==========================================
// SpaceNet 货运清单引擎 - 补给网络快照
// ==========================================
// 职责: 仿真器交给清单引擎的一次性输入
// 内容: 节点 / 运载器及嵌套 / 补给边 / 按补给点与按补给边聚合的需求
// 说明: 边需求以 edges 中的下标引用补给边（导入前顺序）
// ==========================================

use crate::domain::carrier::{Carrier, CarrierId};
use crate::domain::network::{Node, NodeId, SupplyEdge};
use crate::domain::resource::DemandSet;
use serde::{Deserialize, Serialize};

/// 运载器嵌套关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierNesting {
    pub child: CarrierId,
    pub parent: CarrierId,
}

/// 某补给点 (节点, 时间) 上的聚合需求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDemandEntry {
    pub node: NodeId,
    pub time: f64,
    pub demands: DemandSet,
}

/// 某补给边上的聚合需求（运输途中消耗）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDemandEntry {
    pub edge_index: usize,
    pub demands: DemandSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyNetworkSnapshot {
    pub nodes: Vec<Node>,
    pub carriers: Vec<Carrier>,
    #[serde(default)]
    pub carrier_nesting: Vec<CarrierNesting>,
    pub edges: Vec<SupplyEdge>,
    #[serde(default)]
    pub node_demands: Vec<NodeDemandEntry>,
    #[serde(default)]
    pub edge_demands: Vec<EdgeDemandEntry>,
}

impl SupplyNetworkSnapshot {
    /// 快照中聚合需求条目总数
    pub fn demand_count(&self) -> usize {
        self.node_demands.iter().map(|e| e.demands.len()).sum::<usize>()
            + self.edge_demands.iter().map(|e| e.demands.len()).sum::<usize>()
    }
}
