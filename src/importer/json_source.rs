// ==========================================
// SpaceNet 货运清单引擎 - JSON 场景来源
// ==========================================
// 职责: 读取 JSON 场景文件，校验引用完整性，转换为 SupplyNetworkSnapshot
// 红线: 任何悬空引用（节点 / 资源 / 运载器 / 边下标）直接报错，不做猜测
// ==========================================
// 文件结构:
// {
//   "nodes":        [{ id, name, node_type, body }],
//   "resources":    [{ id, name, units, class_of_supply, environment, unit_mass, unit_volume, packing_factor }],
//   "carriers":     [{ id, name, mass, ..., parent? }],
//   "edges":        [{ name, origin, destination, reversed, start_time, end_time, carriers }],
//   "node_demands": [{ node, time, demands: [{ resource, amount }] }],
//   "edge_demands": [{ edge, demands: [{ resource, amount }] }]
// }
// ==========================================

use crate::domain::carrier::{Carrier, CarrierId, CarrierRegistry};
use crate::domain::network::{Node, NodeId, SupplyEdge, TransportLeg};
use crate::domain::resource::{Demand, DemandSet, Resource, ResourceId};
use crate::domain::types::ClassOfSupply;
use crate::importer::demand_source::DemandSource;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::snapshot::{CarrierNesting, EdgeDemandEntry, NodeDemandEntry, SupplyNetworkSnapshot};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

// ==========================================
// 文件结构（仅用于反序列化）
// ==========================================

#[derive(Debug, Deserialize)]
struct ScenarioDocument {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    resources: Vec<Resource>,
    #[serde(default)]
    carriers: Vec<CarrierRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
    #[serde(default)]
    node_demands: Vec<NodeDemandRecord>,
    #[serde(default)]
    edge_demands: Vec<EdgeDemandRecord>,
}

#[derive(Debug, Deserialize)]
struct CarrierRecord {
    #[serde(flatten)]
    carrier: Carrier,
    #[serde(default)]
    parent: Option<CarrierId>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    #[serde(default)]
    name: Option<String>,
    origin: NodeId,
    destination: NodeId,
    #[serde(default)]
    reversed: bool,
    start_time: f64,
    end_time: f64,
    #[serde(default)]
    carriers: Vec<CarrierId>,
}

#[derive(Debug, Deserialize)]
struct DemandRecord {
    resource: ResourceId,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct NodeDemandRecord {
    node: NodeId,
    time: f64,
    demands: Vec<DemandRecord>,
}

#[derive(Debug, Deserialize)]
struct EdgeDemandRecord {
    edge: usize,
    demands: Vec<DemandRecord>,
}

// ==========================================
// JsonScenarioSource
// ==========================================
pub struct JsonScenarioSource {
    path: PathBuf,
}

impl JsonScenarioSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 直接解析 JSON 文本（不经过文件）
    pub fn parse_str(raw: &str) -> ImportResult<SupplyNetworkSnapshot> {
        let document: ScenarioDocument = serde_json::from_str(raw)?;
        build_snapshot(document)
    }
}

impl DemandSource for JsonScenarioSource {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn load_snapshot(&self) -> ImportResult<SupplyNetworkSnapshot> {
        if !self.path.exists() {
            return Err(ImportError::FileNotFound(self.path.display().to_string()));
        }
        if let Some(ext) = self.path.extension() {
            if ext != "json" {
                return Err(ImportError::UnsupportedFormat(ext.to_string_lossy().to_string()));
            }
        }

        let raw = fs::read_to_string(&self.path)?;
        let snapshot = Self::parse_str(&raw)?;
        tracing::info!(
            source = %self.path.display(),
            nodes = snapshot.nodes.len(),
            carriers = snapshot.carriers.len(),
            edges = snapshot.edges.len(),
            demands = snapshot.demand_count(),
            "场景文件解析完成"
        );
        Ok(snapshot)
    }
}

// ==========================================
// 校验与转换
// ==========================================

fn build_snapshot(document: ScenarioDocument) -> ImportResult<SupplyNetworkSnapshot> {
    // 1. 节点
    let mut node_ids = BTreeSet::new();
    for node in &document.nodes {
        if !node_ids.insert(node.id.clone()) {
            return Err(ImportError::DuplicateId {
                kind: "node".to_string(),
                id: node.id.to_string(),
            });
        }
    }

    // 2. 资源
    let mut resources: BTreeMap<ResourceId, Resource> = BTreeMap::new();
    for resource in document.resources {
        if ClassOfSupply::from_id(resource.class_of_supply.id()).is_none() {
            return Err(ImportError::InvalidClassOfSupply(resource.class_of_supply.id()));
        }
        check_non_negative("resource.unit_mass", resource.unit_mass)?;
        check_non_negative("resource.unit_volume", resource.unit_volume)?;
        check_non_negative("resource.packing_factor", resource.packing_factor)?;
        let id = resource.id;
        if resources.insert(id, resource).is_some() {
            return Err(ImportError::DuplicateId {
                kind: "resource".to_string(),
                id: id.to_string(),
            });
        }
    }

    // 3. 运载器及嵌套（借助注册表检测成环）
    let mut registry = CarrierRegistry::new();
    let mut carriers = Vec::with_capacity(document.carriers.len());
    let mut parents = Vec::new();
    for record in document.carriers {
        let carrier = record.carrier;
        check_non_negative("carrier.max_cargo_mass", carrier.max_cargo_mass)?;
        if registry.contains(carrier.id) {
            return Err(ImportError::DuplicateId {
                kind: "carrier".to_string(),
                id: carrier.id.to_string(),
            });
        }
        if let Some(parent) = record.parent {
            parents.push(CarrierNesting {
                child: carrier.id,
                parent,
            });
        }
        registry.insert(carrier.clone());
        carriers.push(carrier);
    }
    for nesting in &parents {
        if !registry.contains(nesting.parent) {
            return Err(ImportError::UnknownCarrier {
                context: format!("parent of {}", nesting.child),
                carrier: nesting.parent.0,
            });
        }
        if !registry.nest(nesting.child, nesting.parent) {
            return Err(ImportError::InvalidCarrierNesting {
                child: nesting.child.0,
                parent: nesting.parent.0,
            });
        }
    }

    // 4. 补给边
    let mut edges = Vec::with_capacity(document.edges.len());
    for (index, record) in document.edges.into_iter().enumerate() {
        let label = record
            .name
            .clone()
            .unwrap_or_else(|| format!("{}-{}", record.origin, record.destination));
        for node in [&record.origin, &record.destination] {
            if !node_ids.contains(node) {
                return Err(ImportError::UnknownNode {
                    context: format!("edge #{} {}", index, label),
                    node: node.to_string(),
                });
            }
        }
        if !(record.start_time.is_finite() && record.end_time.is_finite()) || record.end_time < record.start_time {
            return Err(ImportError::InvalidTimeWindow {
                edge: label,
                start: record.start_time,
                end: record.end_time,
            });
        }
        for carrier in &record.carriers {
            if !registry.contains(*carrier) {
                return Err(ImportError::UnknownCarrier {
                    context: format!("edge #{} {}", index, label),
                    carrier: carrier.0,
                });
            }
        }
        edges.push(SupplyEdge {
            leg: TransportLeg {
                name: label,
                origin: record.origin,
                destination: record.destination,
            },
            reversed: record.reversed,
            start_time: record.start_time,
            end_time: record.end_time,
            carriers: record.carriers,
        });
    }

    // 5. 需求
    let mut node_demands = Vec::with_capacity(document.node_demands.len());
    for record in document.node_demands {
        if !node_ids.contains(&record.node) {
            return Err(ImportError::UnknownNode {
                context: "node_demands".to_string(),
                node: record.node.to_string(),
            });
        }
        let context = format!("node_demands {} @ {}", record.node, record.time);
        node_demands.push(NodeDemandEntry {
            node: record.node,
            time: record.time,
            demands: resolve_demands(&resources, record.demands, &context)?,
        });
    }

    let mut edge_demands = Vec::with_capacity(document.edge_demands.len());
    for record in document.edge_demands {
        if record.edge >= edges.len() {
            return Err(ImportError::EdgeIndexOutOfRange {
                index: record.edge,
                count: edges.len(),
            });
        }
        let context = format!("edge_demands #{}", record.edge);
        edge_demands.push(EdgeDemandEntry {
            edge_index: record.edge,
            demands: resolve_demands(&resources, record.demands, &context)?,
        });
    }

    Ok(SupplyNetworkSnapshot {
        nodes: document.nodes,
        carriers,
        carrier_nesting: parents,
        edges,
        node_demands,
        edge_demands,
    })
}

fn resolve_demands(
    resources: &BTreeMap<ResourceId, Resource>,
    records: Vec<DemandRecord>,
    context: &str,
) -> ImportResult<DemandSet> {
    let mut set = DemandSet::new();
    for record in records {
        let resource = resources
            .get(&record.resource)
            .ok_or_else(|| ImportError::UnknownResource {
                context: context.to_string(),
                resource: record.resource.0,
            })?;
        check_non_negative("demand.amount", record.amount)?;
        set.add(Demand::new(resource.clone(), record.amount));
    }
    Ok(set)
}

fn check_non_negative(field: &str, value: f64) -> ImportResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ImportError::ValueRangeError {
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SCENARIO: &str = r#"
    {
      "nodes": [
        { "id": "KSC", "name": "Kennedy", "node_type": "SURFACE", "body": "EARTH" },
        { "id": "LEO", "name": "Low Earth Orbit", "node_type": "ORBITAL", "body": "EARTH" }
      ],
      "resources": [
        { "id": 1, "name": "Water", "class_of_supply": 201, "unit_mass": 1.0, "unit_volume": 0.001 }
      ],
      "carriers": [
        { "id": 10, "name": "Launcher", "mass": 1000.0, "max_cargo_mass": 500.0 },
        { "id": 11, "name": "Capsule", "mass": 100.0, "max_cargo_mass": 50.0, "parent": 10 }
      ],
      "edges": [
        { "origin": "KSC", "destination": "LEO", "start_time": 0.0, "end_time": 1.0, "carriers": [10] }
      ],
      "node_demands": [
        { "node": "LEO", "time": 1.0, "demands": [ { "resource": 1, "amount": 20 }, { "resource": 1, "amount": 5 } ] }
      ],
      "edge_demands": [
        { "edge": 0, "demands": [ { "resource": 1, "amount": 2 } ] }
      ]
    }
    "#;

    #[test]
    fn test_parse_minimal_scenario() {
        let snapshot = JsonScenarioSource::parse_str(MINIMAL_SCENARIO).unwrap();
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.carriers.len(), 2);
        assert_eq!(
            snapshot.carrier_nesting,
            vec![CarrierNesting {
                child: CarrierId(11),
                parent: CarrierId(10)
            }]
        );
        assert_eq!(snapshot.edges[0].leg.name, "KSC-LEO");
        // 同资源合并
        assert_eq!(snapshot.node_demands[0].demands.len(), 1);
        assert_eq!(snapshot.node_demands[0].demands.iter().next().unwrap().amount, 25.0);
        assert_eq!(snapshot.demand_count(), 2);
    }

    #[test]
    fn test_unknown_node_rejected() {
        let raw = MINIMAL_SCENARIO.replace("\"destination\": \"LEO\"", "\"destination\": \"MARS\"");
        let err = JsonScenarioSource::parse_str(&raw).unwrap_err();
        assert!(matches!(err, ImportError::UnknownNode { .. }));
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let raw = MINIMAL_SCENARIO.replace("\"resource\": 1, \"amount\": 2", "\"resource\": 9, \"amount\": 2");
        let err = JsonScenarioSource::parse_str(&raw).unwrap_err();
        assert!(matches!(err, ImportError::UnknownResource { resource: 9, .. }));
    }

    #[test]
    fn test_edge_index_out_of_range() {
        let raw = MINIMAL_SCENARIO.replace("\"edge\": 0", "\"edge\": 3");
        let err = JsonScenarioSource::parse_str(&raw).unwrap_err();
        assert!(matches!(err, ImportError::EdgeIndexOutOfRange { index: 3, count: 1 }));
    }

    #[test]
    fn test_invalid_time_window() {
        let raw = MINIMAL_SCENARIO.replace("\"end_time\": 1.0", "\"end_time\": -1.0");
        let err = JsonScenarioSource::parse_str(&raw).unwrap_err();
        assert!(matches!(err, ImportError::InvalidTimeWindow { .. }));
    }

    #[test]
    fn test_missing_file() {
        let source = JsonScenarioSource::new("/nonexistent/scenario.json");
        assert!(matches!(source.load_snapshot(), Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_malformed_json() {
        let err = JsonScenarioSource::parse_str("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::JsonParseError(_)));
    }
}
