// ==========================================
// SpaceNet 货运清单引擎 - 引擎层
// ==========================================
// 职责: 打包 / 装载 / 逆向自动编排 / 装载事件物化
// 红线: 引擎同步单线程，所有写操作经 &mut Manifest
// 红线: 引擎内部不以错误做流程控制
// ==========================================

pub mod manifest;
pub mod materializer;
pub mod orchestrator;

// 重导出核心类型
pub use manifest::{AggregatedDemand, DemandSlot, ImportSummary, Manifest, PackedDemand};
pub use materializer::{EventMaterializer, MaterializationFailure, MaterializationOutcome};
pub use orchestrator::{AutoManifestOrchestrator, AutoManifestSummary};
