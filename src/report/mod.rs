// ==========================================
// SpaceNet 货运清单引擎 - 报告层
// ==========================================
// 职责: 清单结果导出（JSON 报告 / CSV 装箱清单）
// ==========================================

pub mod csv_export;
pub mod manifest_report;

pub use csv_export::{write_packing_list, write_packing_list_file};
pub use manifest_report::{CarrierManifest, ContainerRow, DemandRow, FragmentRow, ManifestReport};
