// ==========================================
// SpaceNet 货运清单引擎 - 配置层
// ==========================================
// 职责: 引擎运行参数（精度 / 约束开关 / 容器目录）
// 存储: config_kv 表（可选，缺省时使用内置默认值）
// ==========================================

pub mod config_manager;
pub mod container_catalog;
pub mod manifest_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use container_catalog::{ArchetypeSpec, ContainerCatalog};
pub use manifest_config::ManifestConfig;
