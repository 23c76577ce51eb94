// ==========================================
// SpaceNet 货运清单引擎 - 货运清单生命周期
// ==========================================
// 职责: 构造 / 重置 / 导入需求 / 容器注册与移除
// 红线: import_demands 是唯一的批量装载入口，且总是先 reset
// 红线: remove_container 必须清除所有引用该容器的片段与装载记录
// ==========================================

use super::{AggregatedDemand, DemandSlot, ImportSummary, Manifest, PackedDemand};
use crate::config::ManifestConfig;
use crate::domain::container::{ContainerArchetype, ContainerId, ResourceContainer};
use crate::domain::container_factory::ContainerFactory;
use crate::domain::network::{SupplyEdgeId, SupplyPoint};
use crate::domain::resource::{Demand, DemandId, FragmentId};
use crate::importer::{DemandSource, ImportResult, SupplyNetworkSnapshot};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

impl Manifest {
    /// 创建空清单
    ///
    /// # 参数
    /// - config: 精度 / 约束开关 / 容器目录
    pub fn new(config: ManifestConfig) -> Self {
        Self {
            config,
            nodes: BTreeMap::new(),
            carriers: Default::default(),
            supply_edges: Vec::new(),
            supply_points: BTreeSet::new(),
            demands: BTreeMap::new(),
            node_demands: BTreeMap::new(),
            edge_demands: BTreeMap::new(),
            fragments: BTreeMap::new(),
            containers: BTreeMap::new(),
            packed: BTreeMap::new(),
            next_demand_id: 1,
            next_fragment_id: 1,
            next_container_id: 1,
        }
    }

    /// 清空全部状态（容器编号继续递增，避免新旧容器同名）
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.carriers.clear();
        self.supply_edges.clear();
        self.supply_points.clear();
        self.demands.clear();
        self.node_demands.clear();
        self.edge_demands.clear();
        self.fragments.clear();
        self.containers.clear();
        self.packed.clear();
    }

    // ==========================================
    // 需求导入
    // ==========================================

    /// 从需求来源导入补给网络与聚合需求
    ///
    /// # 返回
    /// - Ok(ImportSummary): 导入统计
    /// - Err: 来源读取 / 校验失败（清单保持导入前状态）
    #[instrument(skip(self, source), fields(source = %source.source_name()))]
    pub fn import_demands(&mut self, source: &dyn DemandSource) -> ImportResult<ImportSummary> {
        let snapshot = source.load_snapshot()?;
        let mut summary = self.load_snapshot(snapshot);
        summary.source = source.source_name();
        Ok(summary)
    }

    /// 装载已校验的快照（不会失败；悬空引用记 warn 后跳过）
    pub fn load_snapshot(&mut self, snapshot: SupplyNetworkSnapshot) -> ImportSummary {
        self.reset();
        let mut summary = ImportSummary::default();

        // 1. 节点
        for node in snapshot.nodes {
            self.nodes.insert(node.id.clone(), node);
        }

        // 2. 运载器及嵌套
        for carrier in snapshot.carriers {
            self.carriers.insert(carrier);
        }
        for nesting in &snapshot.carrier_nesting {
            if !self.carriers.nest(nesting.child, nesting.parent) {
                warn!(child = %nesting.child, parent = %nesting.parent, "运载器嵌套关系无效，已忽略");
            }
        }

        // 3. 补给边: 时间舍入、过滤未知运载器、稳定排序
        let mut indexed: Vec<(usize, _)> = snapshot
            .edges
            .into_iter()
            .enumerate()
            .map(|(index, mut edge)| {
                edge.start_time = self.config.rounded_time(edge.start_time);
                edge.end_time = self.config.rounded_time(edge.end_time);
                edge.carriers.retain(|c| {
                    let known = self.carriers.contains(*c);
                    if !known {
                        warn!(edge = %edge.leg.name, carrier = %c, "补给边引用未知运载器，已忽略");
                    }
                    known
                });
                (index, edge)
            })
            .collect();
        indexed.sort_by(|(_, a), (_, b)| a.natural_cmp(b));

        let mut edge_ids: BTreeMap<usize, SupplyEdgeId> = BTreeMap::new();
        for (sorted, (original, edge)) in indexed.into_iter().enumerate() {
            edge_ids.insert(original, SupplyEdgeId(sorted));
            self.supply_points.insert(edge.point());
            self.supply_edges.push(edge);
        }

        // 4. 补给点需求
        for entry in snapshot.node_demands {
            let point = SupplyPoint::new(entry.node, self.config.rounded_time(entry.time));
            if !self.supply_points.contains(&point) {
                warn!(point = %point, demands = entry.demands.len(), "需求所在补给点无补给边到达，已跳过");
                summary.skipped_demands += entry.demands.len();
                continue;
            }
            for demand in entry.demands {
                if self.register_demand(DemandSlot::Node(point.clone()), demand) {
                    summary.node_demands += 1;
                } else {
                    summary.skipped_demands += 1;
                }
            }
        }

        // 5. 补给边需求
        for entry in snapshot.edge_demands {
            let Some(edge_id) = edge_ids.get(&entry.edge_index).copied() else {
                warn!(edge_index = entry.edge_index, "需求引用的补给边不存在，已跳过");
                summary.skipped_demands += entry.demands.len();
                continue;
            };
            for demand in entry.demands {
                if self.register_demand(DemandSlot::Edge(edge_id), demand) {
                    summary.edge_demands += 1;
                } else {
                    summary.skipped_demands += 1;
                }
            }
        }

        summary.nodes = self.nodes.len();
        summary.carriers = self.carriers.len();
        summary.supply_edges = self.supply_edges.len();
        summary.supply_points = self.supply_points.len();

        info!(
            supply_edges = summary.supply_edges,
            supply_points = summary.supply_points,
            node_demands = summary.node_demands,
            edge_demands = summary.edge_demands,
            skipped = summary.skipped_demands,
            "需求导入完成"
        );
        summary
    }

    /// 登记一条聚合需求（同一归属下同资源合并）
    ///
    /// # 返回
    /// - true: 已登记或合并
    /// - false: 舍入后数量不为正，跳过
    fn register_demand(&mut self, slot: DemandSlot, demand: Demand) -> bool {
        let amount = self.config.rounded_demand(demand.amount);
        if amount <= 0.0 {
            debug!(resource = %demand.resource, amount = demand.amount, "需求数量为零，跳过");
            return false;
        }

        let bucket = match &slot {
            DemandSlot::Node(point) => self.node_demands.entry(point.clone()).or_default(),
            DemandSlot::Edge(edge) => self.edge_demands.entry(*edge).or_default(),
        };

        let existing = bucket.iter().copied().find(|id| {
            self.demands
                .get(id)
                .is_some_and(|d| d.demand.resource.id == demand.resource.id)
        });
        if let Some(id) = existing {
            if let Some(aggregated) = self.demands.get_mut(&id) {
                aggregated.demand.amount = self.config.rounded_demand(aggregated.demand.amount + amount);
            }
            return true;
        }

        let id = DemandId(self.next_demand_id);
        self.next_demand_id += 1;
        bucket.push(id);
        self.demands.insert(
            id,
            AggregatedDemand {
                id,
                demand: Demand::new(demand.resource, amount),
                slot,
                fragments: BTreeSet::new(),
            },
        );
        true
    }

    // ==========================================
    // 容器注册与移除
    // ==========================================

    /// 分配下一个容器编号
    pub fn next_container_id(&mut self) -> ContainerId {
        let id = ContainerId(self.next_container_id);
        self.next_container_id += 1;
        id
    }

    /// 注册容器（唯一注册入口）
    ///
    /// # 返回
    /// - true: 已注册（装载位置清空）
    /// - false: 编号重复
    pub fn add_container(&mut self, mut container: ResourceContainer) -> bool {
        if self.containers.contains_key(&container.id) {
            warn!(container = %container.name, "容器编号重复，拒绝注册");
            return false;
        }
        container.placement = None;
        self.next_container_id = self.next_container_id.max(container.id.0 + 1);
        self.packed.insert(container.id, BTreeSet::new());
        self.containers.insert(container.id, container);
        true
    }

    /// 按目录创建并注册标准容器（定制原型返回 None）
    pub fn create_container(&mut self, archetype: ContainerArchetype) -> Option<ContainerId> {
        let id = ContainerId(self.next_container_id);
        let container = ContainerFactory::new(&self.config).create(archetype, id)?;
        self.next_container_id += 1;
        self.add_container(container).then_some(id)
    }

    /// 移除容器，同时清除其全部片段与装载位置
    pub fn remove_container(&mut self, container: ContainerId) -> bool {
        let Some(removed) = self.containers.remove(&container) else {
            return false;
        };
        for fragment in self.packed.remove(&container).unwrap_or_default() {
            self.drop_fragment(fragment);
        }
        debug!(container = %removed.name, "容器已移除");
        true
    }

    /// 从片段表与聚合需求中删除片段（不处理容器 → 片段映射）
    pub(crate) fn drop_fragment(&mut self, fragment: FragmentId) -> Option<PackedDemand> {
        let packed = self.fragments.remove(&fragment)?;
        if let Some(aggregated) = self.demands.get_mut(&packed.aggregated) {
            aggregated.fragments.remove(&fragment);
        }
        Some(packed)
    }

    /// 提交片段（调用方已完成全部校验）
    pub(crate) fn commit_fragment(&mut self, demand: DemandId, container: ContainerId, amount: f64) -> Option<FragmentId> {
        let aggregated = self.demands.get_mut(&demand)?;
        let fragments = self.packed.get_mut(&container)?;

        let id = FragmentId(self.next_fragment_id);
        self.next_fragment_id += 1;
        aggregated.fragments.insert(id);
        fragments.insert(id);
        self.fragments.insert(
            id,
            PackedDemand {
                id,
                aggregated: demand,
                container,
                demand: Demand::new(aggregated.demand.resource.clone(), amount),
            },
        );
        Some(id)
    }
}
