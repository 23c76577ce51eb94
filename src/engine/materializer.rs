// ==========================================
// SpaceNet 货运清单引擎 - 装载事件物化
// ==========================================
// 职责: 片段 → 容器物化内容；装载位置 → 装载事件
// 红线: 唯一的写操作是重写容器物化内容
// 红线: 写入失败只记录不抛出，该片段不进入物化内容
// ==========================================
// 输出: MaterializationOutcome { events, failures }
// ==========================================

use crate::config::ManifestConfig;
use crate::domain::container::{ContainerId, ResourceContainer};
use crate::domain::event::ManifestEvent;
use crate::domain::network::SupplyEdgeId;
use crate::domain::resource::{DemandId, FragmentId, Resource};
use crate::engine::manifest::Manifest;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// ==========================================
// MaterializationFailure - 物化失败记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializationFailure {
    pub container: ContainerId,
    pub container_name: String,
    pub fragment: FragmentId,
    pub demand: DemandId,
    pub resource: String,
    pub amount: f64,
    pub reason: String,
}

// ==========================================
// MaterializationOutcome - 物化结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterializationOutcome {
    pub events: Vec<ManifestEvent>,
    pub failures: Vec<MaterializationFailure>,
}

impl MaterializationOutcome {
    /// 无任何写入失败
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ==========================================
// EventMaterializer - 事件物化器
// ==========================================
pub struct EventMaterializer {}

impl EventMaterializer {
    pub fn new() -> Self {
        Self {}
    }

    /// 物化容器内容并生成装载事件
    pub fn materialize(&self, manifest: &mut Manifest) -> MaterializationOutcome {
        let mut outcome = MaterializationOutcome::default();

        // 1. 重写物化内容
        let ids: Vec<ContainerId> = manifest.containers.keys().copied().collect();
        for id in ids {
            let fragments: Vec<(FragmentId, DemandId, Resource, f64)> = manifest
                .fragments_of(id)
                .into_iter()
                .map(|f| (f.id, f.aggregated, f.demand.resource.clone(), f.demand.amount))
                .collect();

            let config = &manifest.config;
            let Some(container) = manifest.containers.get_mut(&id) else {
                continue;
            };
            container.clear_contents();
            for (fragment, demand, resource, amount) in fragments {
                if container.add(&resource, amount, config) {
                    continue;
                }
                let reason = rejection_reason(container, &resource, amount, config);
                warn!(
                    container = %container.name,
                    fragment = %fragment,
                    resource = %resource.name,
                    amount = amount,
                    reason = %reason,
                    "片段无法写入容器物化内容"
                );
                outcome.failures.push(MaterializationFailure {
                    container: id,
                    container_name: container.name.clone(),
                    fragment,
                    demand,
                    resource: resource.name.clone(),
                    amount,
                    reason,
                });
            }
        }

        // 2. 每个 (补给边, 运载器) 生成一个装载事件
        for (index, edge) in manifest.supply_edges.iter().enumerate() {
            for carrier_id in manifest.carriers.flatten_all_carriers(&edge.carriers) {
                let containers: Vec<ResourceContainer> = manifest
                    .manifested_containers(SupplyEdgeId(index), carrier_id)
                    .into_iter()
                    .filter_map(|c| manifest.containers.get(&c).cloned())
                    .collect();
                if containers.is_empty() {
                    continue;
                }
                let Some(carrier) = manifest.carriers.get(carrier_id) else {
                    warn!(carrier = %carrier_id, "场景中找不到运载器，跳过装载事件");
                    continue;
                };
                outcome.events.push(ManifestEvent::new(
                    edge.start_time,
                    edge.origin().clone(),
                    carrier.clone(),
                    containers,
                ));
            }
        }

        info!(
            events = outcome.events.len(),
            failures = outcome.failures.len(),
            "装载事件生成完成"
        );
        outcome
    }
}

impl Default for EventMaterializer {
    fn default() -> Self {
        Self::new()
    }
}

/// 写入被拒原因（与 ResourceContainer::can_add 的判定顺序一致）
fn rejection_reason(
    container: &ResourceContainer,
    resource: &Resource,
    amount: f64,
    config: &ManifestConfig,
) -> String {
    let mass = container.cargo_mass(config) + resource.unit_mass * amount;
    if mass - config.rounded_mass(container.max_cargo_mass) > config.mass_tolerance() {
        return format!("超出最大载货质量: {:.3} > {:.3}", mass, container.max_cargo_mass);
    }
    let volume = container.cargo_volume(config) + resource.unit_volume * amount;
    if config.volume_constrained
        && volume - config.rounded_volume(container.max_cargo_volume) > config.volume_tolerance()
    {
        return format!("超出最大载货体积: {:.6} > {:.6}", volume, container.max_cargo_volume);
    }
    if container.violates_environment(resource, config) {
        return format!(
            "环境不符: 资源 {} / 容器 {}",
            resource.environment, container.cargo_environment
        );
    }
    "未知原因".to_string()
}

impl Manifest {
    /// 物化容器内容并生成装载事件（见 EventMaterializer）
    #[instrument(skip(self), fields(containers = self.containers.len()))]
    pub fn generate_manifest_events(&mut self) -> MaterializationOutcome {
        EventMaterializer::new().materialize(self)
    }
}
