// ==========================================
// SpaceNet 货运清单引擎 - 逆向自动编排器
// ==========================================
// 职责: 按补给点时间降序，逐点自动打包并贪心装载
// 流程: 边需求打包 → 点需求打包 → 边绑定容器装载 → 其余容器装载
// 红线: "首个可接受" = 补给边按存储顺序，其次顶层运载器顺序
// ==========================================

use crate::domain::container::ContainerId;
use crate::domain::network::{SupplyEdgeId, SupplyPoint};
use crate::engine::manifest::Manifest;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

// ==========================================
// AutoManifestSummary - 编排统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoManifestSummary {
    pub points_visited: usize,      // 遍历补给点数
    pub demands_auto_packed: usize, // 执行自动打包的聚合需求数
    pub containers_created: usize,  // 新建容器数
    pub containers_manifested: usize, // 成功装载容器数
    pub containers_unmanifested: usize, // 结束时仍未装载的容器数
}

// ==========================================
// AutoManifestOrchestrator - 自动编排器
// ==========================================
// 无状态，清单通过参数传入
pub struct AutoManifestOrchestrator {}

impl AutoManifestOrchestrator {
    pub fn new() -> Self {
        Self {}
    }

    /// 执行逆向自动编排
    ///
    /// # 参数
    /// - manifest: 已导入需求的货运清单
    ///
    /// # 返回
    /// 编排统计
    pub fn run(&self, manifest: &mut Manifest) -> AutoManifestSummary {
        let mut summary = AutoManifestSummary::default();
        let points: Vec<SupplyPoint> = manifest.supply_points().cloned().collect();

        for point in &points {
            summary.points_visited += 1;

            // 1. 派生该点的补给边上的边需求
            for edge in manifest.supply_edges_deriving(point) {
                let demands = manifest.edge_demands_of(edge).to_vec();
                for demand in demands {
                    if manifest.can_auto_pack_demand(demand) {
                        summary.demands_auto_packed += 1;
                        summary.containers_created += manifest.auto_pack_demand(demand).len();
                    }
                }
            }

            // 2. 该点的点需求
            let demands = manifest.node_demands_at(point).to_vec();
            for demand in demands {
                if manifest.can_auto_pack_demand(demand) {
                    summary.demands_auto_packed += 1;
                    summary.containers_created += manifest.auto_pack_demand(demand).len();
                }
            }

            // 3 / 4. 当前补给点为该点的未装载容器，边绑定容器优先
            let (edge_bound, others): (Vec<ContainerId>, Vec<ContainerId>) = manifest
                .containers()
                .filter(|c| !c.is_placed())
                .map(|c| c.id)
                .filter(|id| manifest.current_supply_point(*id).as_ref() == Some(point))
                .partition(|id| manifest.is_edge_container(*id));

            for container in edge_bound.into_iter().chain(others) {
                if self.manifest_first_fit(manifest, container) {
                    summary.containers_manifested += 1;
                } else {
                    debug!(container = %container, point = %point, "无可接受的补给边 / 运载器");
                }
            }
        }

        summary.containers_unmanifested = manifest.containers().filter(|c| !c.is_placed()).count();
        info!(
            points = summary.points_visited,
            demands = summary.demands_auto_packed,
            created = summary.containers_created,
            manifested = summary.containers_manifested,
            unmanifested = summary.containers_unmanifested,
            "自动编排完成"
        );
        summary
    }

    /// 首次适配装载
    fn manifest_first_fit(&self, manifest: &mut Manifest, container: ContainerId) -> bool {
        let choice = manifest
            .supply_edges()
            .iter()
            .enumerate()
            .flat_map(|(i, edge)| edge.carriers.iter().map(move |c| (SupplyEdgeId(i), *c)))
            .find(|(edge, carrier)| manifest.can_manifest_container(container, *edge, *carrier));

        match choice {
            Some((edge, carrier)) => manifest.manifest_container(container, edge, carrier),
            None => false,
        }
    }
}

impl Default for AutoManifestOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    /// 逆向自动编排（见 AutoManifestOrchestrator）
    #[instrument(skip(self), fields(points = self.supply_points.len()))]
    pub fn auto_manifest(&mut self) -> AutoManifestSummary {
        AutoManifestOrchestrator::new().run(self)
    }
}
