// ==========================================
// SpaceNet 货运清单引擎 - 导入层
// ==========================================
// 职责: 外部场景数据 → SupplyNetworkSnapshot
// 支持: JSON 场景文件, 内存快照
// 红线: 导入层只做引用完整性与数据质量校验，不做打包决策
// ==========================================

// 模块声明
pub mod demand_source;
pub mod error;
pub mod json_source;
pub mod snapshot;

// 重导出核心类型
pub use demand_source::DemandSource;
pub use error::{ImportError, ImportResult};
pub use json_source::JsonScenarioSource;
pub use snapshot::{CarrierNesting, EdgeDemandEntry, NodeDemandEntry, SupplyNetworkSnapshot};
