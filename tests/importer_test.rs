// ==========================================
// 场景导入集成测试
// ==========================================
// 测试目标: JSON 场景文件 → 清单，校验失败时清单保持原状
// ==========================================

mod test_helpers;

use serde_json::json;
use spacenet_manifest::config::ManifestConfig;
use spacenet_manifest::importer::{DemandSource, ImportError, JsonScenarioSource};
use spacenet_manifest::Manifest;
use test_helpers::{lunar_scenario, point, write_scenario_file};

#[test]
fn test_import_from_file() {
    let file = write_scenario_file(&lunar_scenario()).unwrap();
    let source = JsonScenarioSource::new(file.path());

    let snapshot = source.load_snapshot().unwrap();
    assert_eq!(snapshot.nodes.len(), 3);
    assert_eq!(snapshot.carriers.len(), 3);
    assert_eq!(snapshot.carrier_nesting.len(), 1);
    assert_eq!(snapshot.demand_count(), 5);

    let mut manifest = Manifest::new(ManifestConfig::default());
    let summary = manifest.import_demands(&source).unwrap();
    assert_eq!(summary.nodes, 3);
    assert_eq!(summary.carriers, 3);
    assert_eq!(summary.supply_edges, 2);
    assert_eq!(summary.supply_points, 2);
    assert_eq!(summary.skipped_demands, 0);
    assert_eq!(manifest.node_demands_at(&point("LLO", 4.0)).len(), 3);
}

#[test]
fn test_failed_import_keeps_previous_state() {
    let good = write_scenario_file(&lunar_scenario()).unwrap();
    let mut manifest = Manifest::new(ManifestConfig::default());
    manifest.import_demands(&JsonScenarioSource::new(good.path())).unwrap();

    let mut broken = lunar_scenario();
    broken["edges"][0]["carriers"] = json!([99]);
    let bad = write_scenario_file(&broken).unwrap();

    let result = manifest.import_demands(&JsonScenarioSource::new(bad.path()));
    assert!(matches!(result, Err(ImportError::UnknownCarrier { carrier: 99, .. })));
    assert_eq!(manifest.supply_edges().len(), 2);
    assert_eq!(manifest.demands().count(), 5);
}

#[test]
fn test_unsupported_extension() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    std::io::Write::write_all(&mut file, b"node,time\n").unwrap();

    let result = JsonScenarioSource::new(file.path()).load_snapshot();
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}

#[test]
fn test_duplicate_node_rejected() {
    let mut scenario = lunar_scenario();
    scenario["nodes"][2]["id"] = json!("LEO");

    let result = JsonScenarioSource::parse_str(&scenario.to_string());
    assert!(matches!(result, Err(ImportError::DuplicateId { .. })));
}

#[test]
fn test_unknown_class_of_supply_rejected() {
    let mut scenario = lunar_scenario();
    scenario["resources"][0]["class_of_supply"] = json!(777);

    let result = JsonScenarioSource::parse_str(&scenario.to_string());
    assert!(matches!(result, Err(ImportError::InvalidClassOfSupply(777))));
}

#[test]
fn test_self_nesting_rejected() {
    let mut scenario = lunar_scenario();
    scenario["carriers"][2]["parent"] = json!(21);

    let result = JsonScenarioSource::parse_str(&scenario.to_string());
    assert!(matches!(
        result,
        Err(ImportError::InvalidCarrierNesting { child: 21, parent: 21 })
    ));
}

#[test]
fn test_negative_amount_rejected() {
    let mut scenario = lunar_scenario();
    scenario["node_demands"][0]["demands"][0]["amount"] = json!(-1.0);

    let result = JsonScenarioSource::parse_str(&scenario.to_string());
    assert!(matches!(result, Err(ImportError::ValueRangeError { .. })));
}

#[test]
fn test_demand_at_unreached_point_skipped() {
    let mut scenario = lunar_scenario();
    // LLO 在 3.0 没有补给边到达
    scenario["node_demands"][1]["time"] = json!(3.0);
    let snapshot = JsonScenarioSource::parse_str(&scenario.to_string()).unwrap();

    let mut manifest = Manifest::new(ManifestConfig::default());
    let summary = manifest.load_snapshot(snapshot);

    assert_eq!(summary.node_demands, 1);
    assert_eq!(summary.skipped_demands, 3);
    assert!(manifest.node_demands_at(&point("LLO", 3.0)).is_empty());
}
