// ==========================================
// SpaceNet 货运清单引擎 - 装载事件
// ==========================================
// 职责: 交给正向仿真器执行的"装货"事件
// 说明: 事件持有运载器与容器的快照，生成后与 Manifest 状态解耦
// ==========================================

use crate::domain::carrier::Carrier;
use crate::domain::container::ResourceContainer;
use crate::domain::network::NodeId;
use serde::{Deserialize, Serialize};

/// 装载事件默认名称
pub const MANIFEST_EVENT_NAME: &str = "Manifest Event";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEvent {
    pub name: String,
    /// 同一时刻事件的执行优先级（0 = 最先）
    pub priority: i32,
    /// 事件时间 = 补给边出发时间
    pub time: f64,
    /// 事件地点 = 补给边起点
    pub location: NodeId,
    /// 场景中的运载器（按 id 匹配）
    pub carrier: Carrier,
    pub containers: Vec<ResourceContainer>,
}

impl ManifestEvent {
    pub fn new(time: f64, location: NodeId, carrier: Carrier, containers: Vec<ResourceContainer>) -> Self {
        Self {
            name: MANIFEST_EVENT_NAME.to_string(),
            priority: 0,
            time,
            location,
            carrier,
            containers,
        }
    }
}
