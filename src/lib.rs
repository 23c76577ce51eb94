// ==========================================
// SpaceNet 货运清单引擎 - 核心库
// ==========================================
// 职责: 将补给需求打包进容器，并把容器装载到补给边的运载器上
// 技术栈: Rust + SQLite（配置存储）
// 系统定位: 仿真前置规划（输出装载事件交由正向仿真器执行）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 打包 / 装载 / 编排
pub mod engine;

// 导入层 - 外部场景数据
pub mod importer;

// 配置层 - 引擎参数与覆写
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 报告层 - 结果导出
pub mod report;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ClassOfSupply, Environment, NodeType};

// 领域实体
pub use domain::{
    Carrier, CarrierId, CarrierRegistry, ContainerArchetype, ContainerId, Demand, DemandSet,
    ManifestEvent, Node, NodeId, Resource, ResourceContainer, SupplyEdge, SupplyEdgeId,
    SupplyPoint,
};

// 引擎
pub use engine::{
    AutoManifestOrchestrator, AutoManifestSummary, EventMaterializer, Manifest,
    MaterializationFailure, MaterializationOutcome,
};

// 配置
pub use config::{ConfigManager, ManifestConfig};

// 导入
pub use importer::{DemandSource, ImportError, JsonScenarioSource, SupplyNetworkSnapshot};

// 报告
pub use report::ManifestReport;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SpaceNet 货运清单引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(APP_NAME.starts_with("SpaceNet"));
    }
}
