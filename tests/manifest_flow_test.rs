// ==========================================
// 货运清单端到端测试
// ==========================================
// 测试目标: 场景导入 → 自动打包/装载 → 事件物化 → 报告导出
// ==========================================

mod test_helpers;

use spacenet_manifest::config::ManifestConfig;
use spacenet_manifest::domain::carrier::CarrierId;
use spacenet_manifest::domain::container::ContainerArchetype;
use spacenet_manifest::domain::network::NodeId;
use spacenet_manifest::importer::JsonScenarioSource;
use spacenet_manifest::report::{write_packing_list_file, ManifestReport};
use spacenet_manifest::Manifest;
use test_helpers::{create_test_manifest, demand_by_resource, lunar_scenario, point, write_scenario_file};

// ==========================================
// 自动编排
// ==========================================

#[test]
fn test_auto_manifest_lunar_scenario() {
    let mut manifest = create_test_manifest(&lunar_scenario(), ManifestConfig::default()).unwrap();

    let summary = manifest.auto_manifest();

    assert_eq!(summary.points_visited, 2);
    assert_eq!(summary.demands_auto_packed, 5);
    // GTD(途中氧气) + CTB + HCTB(食物) + LT(水) + 定制(科学) + GTD(LEO 氧气)
    assert_eq!(summary.containers_created, 6);
    assert_eq!(summary.containers_manifested, 6);
    assert_eq!(summary.containers_unmanifested, 0);

    let archetypes: Vec<ContainerArchetype> = manifest.containers().map(|c| c.archetype).collect();
    assert_eq!(
        archetypes,
        vec![
            ContainerArchetype::GasTankDerivative,
            ContainerArchetype::CargoTransferBag,
            ContainerArchetype::HalfCargoTransferBag,
            ContainerArchetype::LiquidTank,
            ContainerArchetype::Custom,
            ContainerArchetype::GasTankDerivative,
        ]
    );

    // 所有需求均已装完
    let llo = point("LLO", 4.0);
    for resource in ["Food", "Water", "Science Kit"] {
        let demand = demand_by_resource(&manifest, &llo, resource).unwrap();
        assert!(manifest.remaining_amount(demand).abs() < 1e-9, "{} 未装完", resource);
    }
}

#[test]
fn test_carrier_load_includes_nested_carrier() {
    let mut manifest = create_test_manifest(&lunar_scenario(), ManifestConfig::default()).unwrap();
    manifest.auto_manifest();

    let llo = point("LLO", 4.0);
    // 乘员舱 500 + 13.8 + 27.63 + 3.7532 + 84.37 + 15
    let load = manifest.carrier_cargo_mass(CarrierId(20), &llo);
    assert!((load - 644.55).abs() < 0.011, "load = {}", load);

    let leo = point("LEO", 1.0);
    assert!((manifest.carrier_cargo_mass(CarrierId(10), &leo) - 15.8).abs() < 1e-9);
}

#[test]
fn test_generate_events_per_edge_and_carrier() {
    let mut manifest = create_test_manifest(&lunar_scenario(), ManifestConfig::default()).unwrap();
    manifest.auto_manifest();

    let outcome = manifest.generate_manifest_events();

    assert!(outcome.is_clean());
    assert_eq!(outcome.events.len(), 2);

    // 补给边按结束时间降序: LEO → LLO 在前
    let lunar = &outcome.events[0];
    assert_eq!(lunar.time, 1.5);
    assert_eq!(lunar.location, NodeId::new("LEO"));
    assert_eq!(lunar.carrier.id, CarrierId(20));
    assert_eq!(lunar.containers.len(), 5);

    let launch = &outcome.events[1];
    assert_eq!(launch.time, 0.0);
    assert_eq!(launch.location, NodeId::new("KSC"));
    assert_eq!(launch.containers.len(), 1);

    // 物化后容器内容与片段一致
    let contents: f64 = lunar
        .containers
        .iter()
        .flat_map(|c| c.contents())
        .map(|entry| entry.amount)
        .sum();
    // 3 + 26.8 + 3.2 + 50 + 5
    assert!((contents - 88.0).abs() < 1e-9);
}

#[test]
fn test_undersized_carrier_leaves_containers_unmanifested() {
    let mut scenario = lunar_scenario();
    scenario["carriers"][1]["max_cargo_mass"] = serde_json::json!(515.0);
    let mut manifest = create_test_manifest(&scenario, ManifestConfig::default()).unwrap();

    let summary = manifest.auto_manifest();

    // 乘员舱占用 500 kg，只余 15 kg: 仅途中氧气罐 (13.8) 能装上
    assert_eq!(summary.containers_created, 6);
    assert_eq!(summary.containers_unmanifested, 4);
    let outcome = manifest.generate_manifest_events();
    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.events[0].containers.len(), 1);
    assert_eq!(outcome.events[0].containers[0].archetype, ContainerArchetype::GasTankDerivative);
}

// ==========================================
// 手工操作
// ==========================================

#[test]
fn test_manual_pack_and_manifest_round_trip() {
    let mut manifest = create_test_manifest(&lunar_scenario(), ManifestConfig::default()).unwrap();
    let llo = point("LLO", 4.0);
    let food = demand_by_resource(&manifest, &llo, "Food").unwrap();

    let bag = manifest.create_container(ContainerArchetype::CargoTransferBag).unwrap();
    assert!(manifest.can_pack_demand(food, bag));
    let fragment = manifest.pack_demand(food, bag).unwrap();
    assert!((manifest.packed_amount(food) - 26.8).abs() < 1e-9);
    assert_eq!(manifest.current_supply_point(bag), Some(llo.clone()));

    let edges = manifest.supply_edges_for_point(&llo);
    assert_eq!(edges.len(), 1);
    let edge = edges[0];
    assert!(manifest.can_manifest_container(bag, edge, CarrierId(20)));
    // 嵌套乘员舱同样可作为装载目标
    assert!(manifest.can_manifest_container(bag, edge, CarrierId(21)));
    assert!(!manifest.can_manifest_container(bag, edge, CarrierId(10)));

    assert!(manifest.manifest_container(bag, edge, CarrierId(20)));
    assert_eq!(manifest.supply_edge_of_carrier(CarrierId(21)), Some(edge));
    assert_eq!(manifest.manifested_containers(edge, CarrierId(20)), vec![bag]);
    // 已装载容器不再接收打包
    assert!(!manifest.can_pack_demand(food, bag));

    assert!(manifest.unmanifest_container(bag, edge));
    assert!(manifest.unpack_fragment(fragment, bag));
    assert_eq!(manifest.packed_amount(food), 0.0);
    assert_eq!(manifest.empty_containers(), vec![bag]);
}

#[test]
fn test_next_supply_point_walks_upstream() {
    let manifest = create_test_manifest(&lunar_scenario(), ManifestConfig::default()).unwrap();
    let llo_edges = manifest.supply_edges_for_point(&point("LLO", 4.0));
    let leo_edges = manifest.supply_edges_for_point(&point("LEO", 1.0));

    assert_eq!(manifest.next_supply_point(llo_edges[0]), Some(point("LEO", 1.0)));
    // 地球表面出发的补给边没有上游
    assert_eq!(manifest.next_supply_point(leo_edges[0]), None);
}

// ==========================================
// 文件流程
// ==========================================

#[test]
fn test_file_import_to_report_and_packing_list() {
    let scenario_file = write_scenario_file(&lunar_scenario()).unwrap();
    let mut manifest = Manifest::new(ManifestConfig::default());

    let import = manifest
        .import_demands(&JsonScenarioSource::new(scenario_file.path()))
        .unwrap();
    assert_eq!(import.node_demands, 4);
    assert_eq!(import.edge_demands, 1);
    assert!(import.source.ends_with(".json"));

    let summary = manifest.auto_manifest();
    let outcome = manifest.generate_manifest_events();
    let report = ManifestReport::build(&manifest, Some(import), Some(summary), outcome);

    assert_eq!(report.unsatisfied_demands(), 0);
    assert_eq!(report.carrier_manifests.len(), 2);

    let out_dir = tempfile::tempdir().unwrap();
    let report_path = out_dir.path().join("report.json");
    report.write_json(&report_path).unwrap();
    let parsed: ManifestReport =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(parsed.events.len(), 2);

    let csv_path = out_dir.path().join("packing.csv");
    let rows = write_packing_list_file(&report, &csv_path).unwrap();
    assert_eq!(rows, 6);
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(text.lines().count(), 7);
}
