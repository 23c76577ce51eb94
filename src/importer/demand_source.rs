// ==========================================
// SpaceNet 货运清单引擎 - 需求来源 Trait
// ==========================================
// 职责: 定义清单引擎的输入接口（不包含实现）
// 说明: 引擎层只依赖此 trait，仿真器 / 文件 / 测试桩各自实现
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::snapshot::SupplyNetworkSnapshot;

// ==========================================
// DemandSource Trait
// ==========================================
// 实现者: JsonScenarioSource / SupplyNetworkSnapshot（内存快照）
pub trait DemandSource {
    /// 来源描述（用于日志）
    fn source_name(&self) -> String;

    /// 读取一次完整的补给网络快照
    ///
    /// # 返回
    /// - Ok(SupplyNetworkSnapshot): 已通过引用完整性校验的快照
    /// - Err: 读取或校验失败
    fn load_snapshot(&self) -> ImportResult<SupplyNetworkSnapshot>;
}

// 内存快照直接作为来源
impl DemandSource for SupplyNetworkSnapshot {
    fn source_name(&self) -> String {
        "in-memory snapshot".to_string()
    }

    fn load_snapshot(&self) -> ImportResult<SupplyNetworkSnapshot> {
        Ok(self.clone())
    }
}
