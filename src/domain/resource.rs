// ==========================================
// SpaceNet 货运清单引擎 - 资源与需求
// ==========================================
// 职责: 资源定义、需求（聚合需求 / 已打包片段共用同一形态）、需求集合
// 红线: 同一聚合需求的已打包片段之和不得超过其需求量
// ==========================================

use crate::config::ManifestConfig;
use crate::domain::types::{ClassOfSupply, Environment};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 资源标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// 聚合需求标识（导入时分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandId(pub u64);

impl fmt::Display for DemandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

/// 已打包片段标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentId(pub u64);

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

// ==========================================
// Resource - 资源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    /// 计量单位（kg / L / 件）
    #[serde(default = "default_units")]
    pub units: String,
    pub class_of_supply: ClassOfSupply,
    #[serde(default)]
    pub environment: Environment,
    /// 单位质量 (kg/单位)
    pub unit_mass: f64,
    /// 单位体积 (m³/单位)
    #[serde(default)]
    pub unit_volume: f64,
    /// 包装系数（定制容器自重 = 货物质量 × 包装系数）
    #[serde(default)]
    pub packing_factor: f64,
}

fn default_units() -> String {
    "kg".to_string()
}

impl Resource {
    /// 是否属于某个补给类别子树
    pub fn is_instance_of(&self, cos: ClassOfSupply) -> bool {
        self.class_of_supply.is_instance_of(cos)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.class_of_supply)
    }
}

// ==========================================
// Demand - 需求
// ==========================================
// 聚合需求: 某补给点 / 某运输边所需的资源总量
// 已打包片段: 聚合需求中实际装入某个容器的那一部分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub resource: Resource,
    pub amount: f64,
}

impl Demand {
    pub fn new(resource: Resource, amount: f64) -> Self {
        Self { resource, amount }
    }

    /// 需求质量 (kg)
    pub fn mass(&self, config: &ManifestConfig) -> f64 {
        config.rounded_mass(self.resource.unit_mass * self.amount)
    }

    /// 需求体积 (m³)
    pub fn volume(&self, config: &ManifestConfig) -> f64 {
        config.rounded_volume(self.resource.unit_volume * self.amount)
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {} of {}", self.amount, self.resource.units, self.resource.name)
    }
}

// ==========================================
// DemandSet - 需求集合
// ==========================================
// 同一资源的需求自动合并，保持插入顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandSet {
    demands: Vec<Demand>,
}

impl DemandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加需求（同资源合并数量）
    pub fn add(&mut self, demand: Demand) {
        match self.demands.iter_mut().find(|d| d.resource.id == demand.resource.id) {
            Some(existing) => existing.amount += demand.amount,
            None => self.demands.push(demand),
        }
    }

    /// 移除数量为零（或负）的需求
    pub fn clean(&mut self) {
        self.demands.retain(|d| d.amount > 0.0);
    }

    pub fn total_mass(&self, config: &ManifestConfig) -> f64 {
        config.rounded_mass(self.demands.iter().map(|d| d.mass(config)).sum())
    }

    pub fn len(&self) -> usize {
        self.demands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Demand> {
        self.demands.iter()
    }
}

impl FromIterator<Demand> for DemandSet {
    fn from_iter<I: IntoIterator<Item = Demand>>(iter: I) -> Self {
        let mut set = DemandSet::new();
        for demand in iter {
            set.add(demand);
        }
        set
    }
}

impl IntoIterator for DemandSet {
    type Item = Demand;
    type IntoIter = std::vec::IntoIter<Demand>;

    fn into_iter(self) -> Self::IntoIter {
        self.demands.into_iter()
    }
}
