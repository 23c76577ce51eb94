// ==========================================
// SpaceNet 货运清单引擎 - 货运清单报告
// ==========================================
// 职责: 将清单状态 + 编排统计 + 物化结果汇总为可序列化报告
// 输出: JSON（serde_json），供仿真器 / 人工复核使用
// ==========================================

use crate::config::ManifestConfig;
use crate::domain::carrier::CarrierId;
use crate::domain::container::{ContainerArchetype, ContainerId};
use crate::domain::event::ManifestEvent;
use crate::domain::network::SupplyEdgeId;
use crate::domain::resource::{DemandId, FragmentId};
use crate::domain::types::Environment;
use crate::engine::{
    AutoManifestSummary, DemandSlot, ImportSummary, Manifest, MaterializationFailure,
    MaterializationOutcome,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;
use uuid::Uuid;

// ==========================================
// 报告行
// ==========================================

/// 容器内的片段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentRow {
    pub fragment: FragmentId,
    pub demand: DemandId,
    pub resource: String,
    pub amount: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRow {
    pub id: ContainerId,
    pub name: String,
    pub archetype: ContainerArchetype,
    pub cargo_environment: Environment,
    pub mass: f64,
    pub max_cargo_mass: f64,
    pub cargo_mass: f64,
    pub total_mass: f64,
    pub edge: Option<SupplyEdgeId>,
    pub carrier: Option<CarrierId>,
    /// 当前补给点（"节点 (时间)"）
    pub current_point: Option<String>,
    pub fragments: Vec<FragmentRow>,
}

/// 某补给边某运载器上的装载清单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierManifest {
    pub edge: SupplyEdgeId,
    pub edge_name: String,
    pub departure_time: f64,
    pub arrival_time: f64,
    pub origin: String,
    pub destination: String,
    pub carrier: CarrierId,
    pub carrier_name: String,
    pub containers: Vec<ContainerId>,
    /// 到达补给点时的货物质量（含内置货物）
    pub cargo_mass: f64,
    pub max_cargo_mass: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRow {
    pub id: DemandId,
    pub resource: String,
    pub class_of_supply: String,
    /// NODE / EDGE
    pub slot: String,
    pub point: Option<String>,
    pub amount: f64,
    pub packed: f64,
    pub remaining: f64,
}

// ==========================================
// ManifestReport - 货运清单报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestReport {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub config: ManifestConfig,
    pub import: Option<ImportSummary>,
    pub summary: Option<AutoManifestSummary>,
    pub containers: Vec<ContainerRow>,
    pub carrier_manifests: Vec<CarrierManifest>,
    pub demands: Vec<DemandRow>,
    pub events: Vec<ManifestEvent>,
    pub failures: Vec<MaterializationFailure>,
}

impl ManifestReport {
    /// 汇总清单当前状态
    ///
    /// # 参数
    /// - manifest: 货运清单
    /// - import: 导入统计（可选）
    /// - summary: 自动编排统计（可选）
    /// - outcome: 事件物化结果
    pub fn build(
        manifest: &Manifest,
        import: Option<ImportSummary>,
        summary: Option<AutoManifestSummary>,
        outcome: MaterializationOutcome,
    ) -> Self {
        let config = manifest.config();

        let containers = manifest
            .containers()
            .map(|c| {
                let fragments: Vec<FragmentRow> = manifest
                    .fragments_of(c.id)
                    .into_iter()
                    .map(|f| FragmentRow {
                        fragment: f.id,
                        demand: f.aggregated,
                        resource: f.demand.resource.name.clone(),
                        amount: f.demand.amount,
                        mass: f.demand.mass(config),
                    })
                    .collect();
                let cargo_mass = manifest.container_cargo_mass(c.id, None);
                ContainerRow {
                    id: c.id,
                    name: c.name.clone(),
                    archetype: c.archetype,
                    cargo_environment: c.cargo_environment,
                    mass: c.mass,
                    max_cargo_mass: c.max_cargo_mass,
                    cargo_mass,
                    total_mass: config.rounded_mass(c.mass + cargo_mass),
                    edge: c.placement.map(|p| p.edge),
                    carrier: c.placement.map(|p| p.carrier),
                    current_point: manifest.current_supply_point(c.id).map(|p| p.to_string()),
                    fragments,
                }
            })
            .collect();

        let mut carrier_manifests = Vec::new();
        for (index, edge) in manifest.supply_edges().iter().enumerate() {
            let edge_id = SupplyEdgeId(index);
            let point = edge.point();
            for carrier_id in manifest.carriers().flatten_all_carriers(&edge.carriers) {
                let loaded = manifest.manifested_containers(edge_id, carrier_id);
                let Some(carrier) = manifest.carriers().get(carrier_id) else {
                    continue;
                };
                if loaded.is_empty() {
                    continue;
                }
                carrier_manifests.push(CarrierManifest {
                    edge: edge_id,
                    edge_name: edge.leg.name.clone(),
                    departure_time: edge.start_time,
                    arrival_time: edge.end_time,
                    origin: edge.origin().to_string(),
                    destination: edge.destination().to_string(),
                    carrier: carrier_id,
                    carrier_name: carrier.name.clone(),
                    containers: loaded,
                    cargo_mass: manifest.carrier_cargo_mass(carrier_id, &point),
                    max_cargo_mass: carrier.max_cargo_mass,
                });
            }
        }

        let demands = manifest
            .demands()
            .map(|d| DemandRow {
                id: d.id,
                resource: d.demand.resource.name.clone(),
                class_of_supply: d.demand.resource.class_of_supply.to_string(),
                slot: match d.slot {
                    DemandSlot::Node(_) => "NODE".to_string(),
                    DemandSlot::Edge(_) => "EDGE".to_string(),
                },
                point: manifest.supply_point_of_demand(d.id).map(|p| p.to_string()),
                amount: d.demand.amount,
                packed: manifest.packed_amount(d.id),
                remaining: manifest.remaining_amount(d.id),
            })
            .collect();

        Self {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            engine_version: crate::VERSION.to_string(),
            config: config.clone(),
            import,
            summary,
            containers,
            carrier_manifests,
            demands,
            events: outcome.events,
            failures: outcome.failures,
        }
    }

    /// 仍有剩余量的需求数
    pub fn unsatisfied_demands(&self) -> usize {
        self.demands.iter().filter(|d| d.remaining > 0.0).count()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 写出 JSON 报告文件
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::JsonScenarioSource;

    const SCENARIO: &str = r#"
    {
      "nodes": [
        { "id": "KSC", "name": "Kennedy", "node_type": "SURFACE", "body": "EARTH" },
        { "id": "LEO", "name": "Low Earth Orbit", "node_type": "ORBITAL", "body": "EARTH" }
      ],
      "resources": [
        { "id": 1, "name": "Food", "class_of_supply": 202, "unit_mass": 1.0 },
        { "id": 2, "name": "Spare Filter", "class_of_supply": 501, "unit_mass": 1.0 }
      ],
      "carriers": [
        { "id": 10, "name": "Launcher", "mass": 1000.0, "max_cargo_mass": 500.0 }
      ],
      "edges": [
        { "origin": "KSC", "destination": "LEO", "start_time": 0.0, "end_time": 1.0, "carriers": [10] }
      ],
      "node_demands": [
        { "node": "LEO", "time": 1.0, "demands": [ { "resource": 1, "amount": 20 }, { "resource": 2, "amount": 3 } ] }
      ]
    }
    "#;

    #[test]
    fn test_report_collects_rows() {
        let snapshot = JsonScenarioSource::parse_str(SCENARIO).unwrap();
        let mut manifest = Manifest::new(ManifestConfig::default());
        let import = manifest.load_snapshot(snapshot);
        let summary = manifest.auto_manifest();
        let outcome = manifest.generate_manifest_events();

        let report = ManifestReport::build(&manifest, Some(import), Some(summary), outcome);

        assert_eq!(report.demands.len(), 2);
        // COS501 不打包
        assert_eq!(report.unsatisfied_demands(), 1);
        assert_eq!(report.containers.len(), 1);
        assert_eq!(report.containers[0].archetype, ContainerArchetype::CargoTransferBag);
        assert!(report.containers.iter().all(|c| c.carrier == Some(CarrierId(10))));
        assert_eq!(report.carrier_manifests.len(), 1);
        assert_eq!(report.carrier_manifests[0].containers.len(), 1);
        assert!((report.carrier_manifests[0].cargo_mass - 20.83).abs() < 1e-9);
        assert_eq!(report.events.len(), 1);
        assert!(report.failures.is_empty());

        let json = report.to_json_pretty().unwrap();
        let parsed: ManifestReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.report_id, report.report_id);
    }
}
