// ==========================================
// SpaceNet 货运清单引擎 - 货运清单查询
// ==========================================
// 职责: 剩余量 / 补给点 / 载荷 / 补给边能力等只读查询
// 红线: 未知标识返回 None / 0.0 / 空集合，不报错
// ==========================================

use super::{AggregatedDemand, DemandSlot, Manifest, PackedDemand};
use crate::config::ManifestConfig;
use crate::domain::carrier::{CarrierId, CarrierRegistry};
use crate::domain::container::{ContainerId, ResourceContainer};
use crate::domain::network::{Node, NodeId, SupplyEdge, SupplyEdgeId, SupplyPoint};
use crate::domain::resource::{DemandId, FragmentId};
use std::collections::BTreeSet;

impl Manifest {
    // ==========================================
    // 访问器
    // ==========================================

    pub fn config(&self) -> &ManifestConfig {
        &self.config
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn carriers(&self) -> &CarrierRegistry {
        &self.carriers
    }

    pub fn supply_edges(&self) -> &[SupplyEdge] {
        &self.supply_edges
    }

    pub fn supply_edge(&self, id: SupplyEdgeId) -> Option<&SupplyEdge> {
        self.supply_edges.get(id.0)
    }

    /// 全部补给点（时间降序）
    pub fn supply_points(&self) -> impl Iterator<Item = &SupplyPoint> {
        self.supply_points.iter()
    }

    pub fn demand(&self, id: DemandId) -> Option<&AggregatedDemand> {
        self.demands.get(&id)
    }

    pub fn demands(&self) -> impl Iterator<Item = &AggregatedDemand> {
        self.demands.values()
    }

    /// 某补给点上的聚合需求（导入顺序）
    pub fn node_demands_at(&self, point: &SupplyPoint) -> &[DemandId] {
        self.node_demands.get(point).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 某补给边上的聚合需求（导入顺序）
    pub fn edge_demands_of(&self, edge: SupplyEdgeId) -> &[DemandId] {
        self.edge_demands.get(&edge).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fragment(&self, id: FragmentId) -> Option<&PackedDemand> {
        self.fragments.get(&id)
    }

    pub fn container(&self, id: ContainerId) -> Option<&ResourceContainer> {
        self.containers.get(&id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &ResourceContainer> {
        self.containers.values()
    }

    /// 容器中的全部片段
    pub fn fragments_of(&self, container: ContainerId) -> Vec<&PackedDemand> {
        self.packed
            .get(&container)
            .map(|ids| ids.iter().filter_map(|id| self.fragments.get(id)).collect())
            .unwrap_or_default()
    }

    // ==========================================
    // 需求查询
    // ==========================================

    /// 已打包数量（按需求精度舍入）
    pub fn packed_amount(&self, demand: DemandId) -> f64 {
        let Some(aggregated) = self.demands.get(&demand) else {
            return 0.0;
        };
        let total: f64 = aggregated
            .fragments
            .iter()
            .filter_map(|id| self.fragments.get(id))
            .map(|f| f.demand.amount)
            .sum();
        self.config.rounded_demand(total)
    }

    /// 剩余数量 = 需求量 − 已打包数量
    pub fn remaining_amount(&self, demand: DemandId) -> f64 {
        match self.demands.get(&demand) {
            Some(aggregated) => self
                .config
                .rounded_demand(aggregated.demand.amount - self.packed_amount(demand)),
            None => 0.0,
        }
    }

    /// 聚合需求所在补给点（边需求取该边派生的补给点）
    pub fn supply_point_of_demand(&self, demand: DemandId) -> Option<SupplyPoint> {
        match &self.demands.get(&demand)?.slot {
            DemandSlot::Node(point) => Some(point.clone()),
            DemandSlot::Edge(edge) => self.supply_edge(*edge).map(SupplyEdge::point),
        }
    }

    pub fn is_edge_demand(&self, demand: DemandId) -> bool {
        matches!(
            self.demands.get(&demand).map(|d| &d.slot),
            Some(DemandSlot::Edge(_))
        )
    }

    /// 片段所属聚合需求
    pub fn aggregated_demand_of(&self, fragment: FragmentId) -> Option<DemandId> {
        self.fragments.get(&fragment).map(|f| f.aggregated)
    }

    fn fragment_point(&self, fragment: &PackedDemand) -> Option<SupplyPoint> {
        self.supply_point_of_demand(fragment.aggregated)
    }

    // ==========================================
    // 容器载荷
    // ==========================================

    /// 在某补给点仍留在容器中的片段（需求时间不早于该点）
    ///
    /// point 为 None 时返回全部片段
    pub fn fragments_at(&self, container: ContainerId, point: Option<&SupplyPoint>) -> Vec<&PackedDemand> {
        self.fragments_of(container)
            .into_iter()
            .filter(|f| match point {
                Some(p) => self.fragment_point(f).is_some_and(|fp| fp.time >= p.time),
                None => true,
            })
            .collect()
    }

    /// 容器在某补给点的货物质量
    pub fn container_cargo_mass(&self, container: ContainerId, point: Option<&SupplyPoint>) -> f64 {
        let total: f64 = self
            .fragments_at(container, point)
            .iter()
            .map(|f| f.demand.mass(&self.config))
            .sum();
        self.config.rounded_mass(total)
    }

    /// 容器在某补给点的货物体积
    pub fn container_cargo_volume(&self, container: ContainerId, point: Option<&SupplyPoint>) -> f64 {
        let total: f64 = self
            .fragments_at(container, point)
            .iter()
            .map(|f| f.demand.volume(&self.config))
            .sum();
        self.config.rounded_volume(total)
    }

    // ==========================================
    // 运载器载荷
    // ==========================================

    /// 截至某补给点装在该运载器上的容器（补给边结束时间不晚于该点）
    pub fn containers_on_carrier(&self, carrier: CarrierId, point: &SupplyPoint) -> Vec<&ResourceContainer> {
        self.containers
            .values()
            .filter(|c| {
                c.placement.is_some_and(|p| {
                    p.carrier == carrier
                        && self
                            .supply_edge(p.edge)
                            .is_some_and(|e| e.end_time <= point.time)
                })
            })
            .collect()
    }

    /// 运载器在某补给点的货物质量 = 内置货物 + Σ(容器自重 + 容器在该点的货物)
    ///
    /// 容器求和范围包括自身及各级嵌套运载器上装载的容器
    pub fn carrier_cargo_mass(&self, carrier: CarrierId, point: &SupplyPoint) -> f64 {
        let manifested: f64 = self
            .carriers
            .flatten_all_carriers(&[carrier])
            .into_iter()
            .flat_map(|id| self.containers_on_carrier(id, point))
            .map(|c| c.mass + self.container_cargo_mass(c.id, Some(point)))
            .sum();
        self.config
            .rounded_mass(self.carriers.cargo_mass(carrier, &self.config) + manifested)
    }

    /// 运载器在某补给点的货物体积 = 内置货物 + Σ 容器外形体积
    ///
    /// 嵌套运载器按外形体积计入内置货物，其舱内容器不再重复计入
    pub fn carrier_cargo_volume(&self, carrier: CarrierId, point: &SupplyPoint) -> f64 {
        let manifested: f64 = self
            .containers_on_carrier(carrier, point)
            .iter()
            .map(|c| c.volume)
            .sum();
        self.config
            .rounded_volume(self.carriers.cargo_volume(carrier, &self.config) + manifested)
    }

    // ==========================================
    // 补给边查询
    // ==========================================

    /// 装在某补给边某运载器上的容器
    pub fn manifested_containers(&self, edge: SupplyEdgeId, carrier: CarrierId) -> Vec<ContainerId> {
        self.containers
            .values()
            .filter(|c| c.placement.is_some_and(|p| p.edge == edge && p.carrier == carrier))
            .map(|c| c.id)
            .collect()
    }

    /// 运载器所在的第一条补给边（含嵌套运载器）
    pub fn supply_edge_of_carrier(&self, carrier: CarrierId) -> Option<SupplyEdgeId> {
        self.supply_edges
            .iter()
            .position(|e| self.carriers.flatten_all_carriers(&e.carriers).contains(&carrier))
            .map(SupplyEdgeId)
    }

    /// 能为某补给点服务的补给边: 终点为该节点且不晚于该时刻到达
    pub fn supply_edges_for_point(&self, point: &SupplyPoint) -> Vec<SupplyEdgeId> {
        self.supply_edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.destination() == &point.node && e.end_time <= point.time)
            .map(|(i, _)| SupplyEdgeId(i))
            .collect()
    }

    /// 派生出该补给点的补给边
    pub fn supply_edges_deriving(&self, point: &SupplyPoint) -> Vec<SupplyEdgeId> {
        self.supply_edges
            .iter()
            .enumerate()
            .filter(|(_, e)| &e.point() == point)
            .map(|(i, _)| SupplyEdgeId(i))
            .collect()
    }

    /// 上游补给点: 起点节点上不晚于出发时间的最近补给点
    ///
    /// 起点为地球表面时返回 None（补给链源头）
    pub fn next_supply_point(&self, edge: SupplyEdgeId) -> Option<SupplyPoint> {
        let edge = self.supply_edge(edge)?;
        if self.node(edge.origin()).is_some_and(Node::is_earth_surface) {
            return None;
        }
        // 补给点按时间降序，第一个命中即最近
        self.supply_points
            .iter()
            .find(|p| &p.node == edge.origin() && p.time <= edge.start_time)
            .cloned()
    }

    /// 补给边净能力 = Σ 顶层运载器 (最大载货质量 − 内置货物质量)
    pub fn edge_capacity(&self, edge: SupplyEdgeId) -> f64 {
        let Some(edge) = self.supply_edge(edge) else {
            return 0.0;
        };
        let total: f64 = edge
            .carriers
            .iter()
            .filter_map(|c| self.carriers.get(*c))
            .map(|c| c.max_cargo_mass - self.carriers.cargo_mass(c.id, &self.config))
            .sum();
        self.config.rounded_mass(total)
    }

    /// 补给边原始能力 = Σ 顶层运载器最大载货质量
    pub fn edge_raw_capacity(&self, edge: SupplyEdgeId) -> f64 {
        let Some(edge) = self.supply_edge(edge) else {
            return 0.0;
        };
        let total: f64 = edge
            .carriers
            .iter()
            .filter_map(|c| self.carriers.get(*c))
            .map(|c| c.max_cargo_mass)
            .sum();
        self.config.rounded_mass(total)
    }

    // ==========================================
    // 容器补给点
    // ==========================================

    /// 初始补给点: 已装载取装载边派生点，否则取片段中最早的需求点
    ///
    /// 已装载时，只有不早于装载边到达时刻的片段才会把补给点提前
    pub fn initial_supply_point(&self, container: ContainerId) -> Option<SupplyPoint> {
        let placement_edge = self
            .containers
            .get(&container)?
            .placement
            .and_then(|p| self.supply_edge(p.edge));
        let mut point = placement_edge.map(SupplyEdge::point);
        for fragment in self.fragments_of(container) {
            let Some(p) = self.fragment_point(fragment) else {
                continue;
            };
            let after_arrival = placement_edge.map_or(true, |e| p.time >= e.end_time);
            if after_arrival && point.as_ref().map_or(true, |cur| p.time < cur.time) {
                point = Some(p);
            }
        }
        point
    }

    /// 当前补给点: 装载边派生点与各片段需求点中时间最早者
    pub fn current_supply_point(&self, container: ContainerId) -> Option<SupplyPoint> {
        let mut point = self
            .containers
            .get(&container)?
            .placement
            .and_then(|p| self.supply_edge(p.edge))
            .map(SupplyEdge::point);
        for fragment in self.fragments_of(container) {
            let Some(p) = self.fragment_point(fragment) else {
                continue;
            };
            if point.as_ref().map_or(true, |cur| p.time < cur.time) {
                point = Some(p);
            }
        }
        point
    }

    /// 空容器: 无片段且未装载
    pub fn empty_containers(&self) -> Vec<ContainerId> {
        self.containers
            .values()
            .filter(|c| !c.is_placed() && self.packed.get(&c.id).map_or(true, BTreeSet::is_empty))
            .map(|c| c.id)
            .collect()
    }

    /// 容器绑定的补给边（装有边需求片段时）
    pub fn container_edge_slot(&self, container: ContainerId) -> Option<SupplyEdgeId> {
        self.fragments_of(container)
            .into_iter()
            .find_map(|f| match self.demands.get(&f.aggregated).map(|d| &d.slot) {
                Some(DemandSlot::Edge(edge)) => Some(*edge),
                _ => None,
            })
    }

    /// 容器是否装有边需求片段
    pub fn is_edge_container(&self, container: ContainerId) -> bool {
        self.container_edge_slot(container).is_some()
    }
}
