// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的场景文件、临时配置库等
// ==========================================

#![allow(dead_code)]

use serde_json::{json, Value};
use spacenet_manifest::config::ManifestConfig;
use spacenet_manifest::domain::network::{NodeId, SupplyPoint};
use spacenet_manifest::domain::resource::DemandId;
use spacenet_manifest::importer::JsonScenarioSource;
use spacenet_manifest::Manifest;
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// 地月运输场景
///
/// - KSC → LEO (0 - 1)，运载器 10（重型火箭，载货上限 2000 kg）
/// - LEO → LLO (1.5 - 4)，运载器 20（转移飞行器，上限 1000 kg），内嵌乘员舱 21（500 kg）
/// - LEO@1: 氧气 5 kg
/// - LLO@4: 食物 30 kg，水 50 kg，科学载荷 5 件（每件 2 kg）
/// - LEO → LLO 途中: 氧气 3 kg
pub fn lunar_scenario() -> Value {
    json!({
        "nodes": [
            { "id": "KSC", "name": "Kennedy Space Center", "node_type": "SURFACE", "body": "EARTH" },
            { "id": "LEO", "name": "Low Earth Orbit", "node_type": "ORBITAL", "body": "EARTH" },
            { "id": "LLO", "name": "Low Lunar Orbit", "node_type": "ORBITAL", "body": "MOON" }
        ],
        "resources": [
            { "id": 1, "name": "Oxygen", "class_of_supply": 203, "unit_mass": 1.0 },
            { "id": 2, "name": "Food", "class_of_supply": 202, "unit_mass": 1.0 },
            { "id": 3, "name": "Water", "class_of_supply": 201, "unit_mass": 1.0 },
            { "id": 4, "name": "Science Kit", "units": "件", "class_of_supply": 601, "unit_mass": 2.0, "packing_factor": 0.5 },
            { "id": 5, "name": "Spare Filter", "class_of_supply": 501, "unit_mass": 1.0 }
        ],
        "carriers": [
            { "id": 10, "name": "Heavy Launcher", "mass": 5000.0, "max_cargo_mass": 2000.0 },
            { "id": 20, "name": "Lunar Transfer Vehicle", "mass": 3000.0, "max_cargo_mass": 1000.0 },
            { "id": 21, "name": "Crew Module", "mass": 500.0, "max_cargo_mass": 200.0, "parent": 20 }
        ],
        "edges": [
            { "origin": "KSC", "destination": "LEO", "start_time": 0.0, "end_time": 1.0, "carriers": [10] },
            { "origin": "LEO", "destination": "LLO", "start_time": 1.5, "end_time": 4.0, "carriers": [20] }
        ],
        "node_demands": [
            { "node": "LEO", "time": 1.0, "demands": [ { "resource": 1, "amount": 5 } ] },
            { "node": "LLO", "time": 4.0, "demands": [
                { "resource": 2, "amount": 30 },
                { "resource": 3, "amount": 50 },
                { "resource": 4, "amount": 5 }
            ] }
        ],
        "edge_demands": [
            { "edge": 1, "demands": [ { "resource": 1, "amount": 3 } ] }
        ]
    })
}

/// 将场景写入临时 .json 文件
///
/// # 返回
/// - NamedTempFile: 临时文件（需要保持存活）
pub fn write_scenario_file(scenario: &Value) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    file.write_all(serde_json::to_string_pretty(scenario)?.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// 导入场景并返回清单
pub fn create_test_manifest(scenario: &Value, config: ManifestConfig) -> Result<Manifest, Box<dyn Error>> {
    let snapshot = JsonScenarioSource::parse_str(&scenario.to_string())?;
    let mut manifest = Manifest::new(config);
    manifest.load_snapshot(snapshot);
    Ok(manifest)
}

pub fn point(node: &str, time: f64) -> SupplyPoint {
    SupplyPoint::new(NodeId::new(node), time)
}

/// 按资源名称查找补给点上的聚合需求
pub fn demand_by_resource(manifest: &Manifest, at: &SupplyPoint, resource: &str) -> Option<DemandId> {
    manifest
        .node_demands_at(at)
        .iter()
        .copied()
        .find(|id| manifest.demand(*id).is_some_and(|d| d.demand.resource.name == resource))
}

/// 创建临时配置库文件
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径非 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}
