// ==========================================
// SpaceNet 货运清单引擎 - 货运清单聚合根
// ==========================================
// 职责: 持有补给边 / 补给点 / 聚合需求 / 已打包片段 / 容器 / 装载位置
// 红线: 同一聚合需求的片段之和 ≤ 需求量
// 红线: 容器至多一个装载位置，装载后不再移动（除非显式卸载）
// 红线: 引擎内部不以错误做流程控制，判定失败即空操作
// ==========================================
// 输入: DemandSource (import_demands)
// 输出: 查询接口 + 打包 / 装载操作
// ==========================================

mod core;
mod manifesting;
mod packing;
mod queries;


use crate::config::ManifestConfig;
use crate::domain::carrier::CarrierRegistry;
use crate::domain::container::{ContainerId, ResourceContainer};
use crate::domain::network::{Node, NodeId, SupplyEdge, SupplyEdgeId, SupplyPoint};
use crate::domain::resource::{Demand, DemandId, FragmentId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// DemandSlot - 聚合需求的归属
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandSlot {
    /// 补给点需求（节点上某时刻）
    Node(SupplyPoint),
    /// 补给边需求（运输途中消耗，只能随该边运输）
    Edge(SupplyEdgeId),
}

/// 聚合需求
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedDemand {
    pub id: DemandId,
    pub demand: Demand,
    pub slot: DemandSlot,
    /// 已打包片段
    pub fragments: BTreeSet<FragmentId>,
}

/// 已打包片段（聚合需求装入某个容器的部分）
#[derive(Debug, Clone, PartialEq)]
pub struct PackedDemand {
    pub id: FragmentId,
    pub aggregated: DemandId,
    pub container: ContainerId,
    pub demand: Demand,
}

// ==========================================
// ImportSummary - 导入统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub source: String,
    pub nodes: usize,
    pub carriers: usize,
    pub supply_edges: usize,
    pub supply_points: usize,
    pub node_demands: usize,
    pub edge_demands: usize,
    /// 因补给点 / 补给边不存在或数量为零而跳过的需求条目
    pub skipped_demands: usize,
}

// ==========================================
// Manifest - 货运清单
// ==========================================
#[derive(Debug, Clone)]
pub struct Manifest {
    pub(crate) config: ManifestConfig,
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) carriers: CarrierRegistry,
    /// 已排序补给边，下标即 SupplyEdgeId
    pub(crate) supply_edges: Vec<SupplyEdge>,
    pub(crate) supply_points: BTreeSet<SupplyPoint>,
    pub(crate) demands: BTreeMap<DemandId, AggregatedDemand>,
    pub(crate) node_demands: BTreeMap<SupplyPoint, Vec<DemandId>>,
    pub(crate) edge_demands: BTreeMap<SupplyEdgeId, Vec<DemandId>>,
    pub(crate) fragments: BTreeMap<FragmentId, PackedDemand>,
    pub(crate) containers: BTreeMap<ContainerId, ResourceContainer>,
    /// 容器 → 已打包片段
    pub(crate) packed: BTreeMap<ContainerId, BTreeSet<FragmentId>>,
    next_demand_id: u64,
    next_fragment_id: u64,
    next_container_id: u64,
}
