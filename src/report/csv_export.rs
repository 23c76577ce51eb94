// ==========================================
// SpaceNet 货运清单引擎 - 装箱清单 CSV 导出
// ==========================================
// 职责: 报告 → 每个片段一行的装箱清单（中文列名）
// ==========================================

use crate::report::manifest_report::{ContainerRow, FragmentRow, ManifestReport};
use csv::Writer;
use std::error::Error;
use std::fs::File;
use std::io;
use std::path::Path;

// CSV 表头（中文列名）
pub const PACKING_LIST_HEADER: &[&str] = &[
    "容器编号",
    "容器名称",
    "容器原型",
    "片段编号",
    "需求编号",
    "资源",
    "数量",
    "质量(kg)",
    "补给边",
    "运载器",
];

fn to_row(container: &ContainerRow, fragment: &FragmentRow) -> Vec<String> {
    vec![
        container.id.to_string(),
        container.name.clone(),
        container.archetype.to_string(),
        fragment.fragment.to_string(),
        fragment.demand.to_string(),
        fragment.resource.clone(),
        format!("{:.2}", fragment.amount),
        format!("{:.2}", fragment.mass),
        container.edge.map(|e| e.to_string()).unwrap_or_default(),
        container.carrier.map(|c| c.to_string()).unwrap_or_default(),
    ]
}

/// 写出装箱清单
///
/// # 返回
/// 写出的数据行数（不含表头）
pub fn write_packing_list<W: io::Write>(report: &ManifestReport, writer: W) -> Result<usize, Box<dyn Error>> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(PACKING_LIST_HEADER)?;

    let mut rows = 0;
    for container in &report.containers {
        for fragment in &container.fragments {
            wtr.write_record(&to_row(container, fragment))?;
            rows += 1;
        }
    }

    wtr.flush()?;
    Ok(rows)
}

/// 写出装箱清单文件
pub fn write_packing_list_file<P: AsRef<Path>>(report: &ManifestReport, path: P) -> Result<usize, Box<dyn Error>> {
    let file = File::create(path)?;
    write_packing_list(report, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManifestConfig;
    use crate::domain::container::{ContainerArchetype, ContainerId};
    use crate::domain::resource::{DemandId, FragmentId};
    use crate::domain::types::Environment;
    use chrono::Utc;

    fn create_test_report() -> ManifestReport {
        ManifestReport {
            report_id: "R-TEST".to_string(),
            generated_at: Utc::now(),
            engine_version: "0.0.0".to_string(),
            config: ManifestConfig::default(),
            import: None,
            summary: None,
            containers: vec![ContainerRow {
                id: ContainerId(3),
                name: "CTB 3".to_string(),
                archetype: ContainerArchetype::CargoTransferBag,
                cargo_environment: Environment::Unpressurized,
                mass: 0.83,
                max_cargo_mass: 26.8,
                cargo_mass: 12.5,
                total_mass: 13.33,
                edge: None,
                carrier: None,
                current_point: None,
                fragments: vec![
                    FragmentRow {
                        fragment: FragmentId(1),
                        demand: DemandId(1),
                        resource: "Food".to_string(),
                        amount: 10.0,
                        mass: 10.0,
                    },
                    FragmentRow {
                        fragment: FragmentId(2),
                        demand: DemandId(2),
                        resource: "Clothing".to_string(),
                        amount: 2.5,
                        mass: 2.5,
                    },
                ],
            }],
            carrier_manifests: vec![],
            demands: vec![],
            events: vec![],
            failures: vec![],
        }
    }

    #[test]
    fn test_packing_list_one_row_per_fragment() {
        let report = create_test_report();
        let mut buffer = Vec::new();

        let rows = write_packing_list(&report, &mut buffer).unwrap();

        assert_eq!(rows, 2);
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("容器编号"));
        assert_eq!(lines[1], "3,CTB 3,CARGO_TRANSFER_BAG,F1,D1,Food,10.00,10.00,,");
    }
}
