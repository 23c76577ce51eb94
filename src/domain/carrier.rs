// ==========================================
// SpaceNet 货运清单引擎 - 运载器与嵌套关系
// ==========================================
// 职责: 运载器定义 + 运载器注册表（arena，父子关系显式存储）
// 红线: 嵌套关系不得成环
// 输出: flatten_all_carriers / 内置货物质量与体积
// ==========================================

use crate::config::ManifestConfig;
use crate::domain::types::Environment;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// 运载器标识（场景内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarrierId(pub u32);

impl fmt::Display for CarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

// ==========================================
// Carrier - 运载器
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: CarrierId,
    pub name: String,
    /// 运载器自重 (kg)
    pub mass: f64,
    /// 运载器外形体积 (m³)
    #[serde(default)]
    pub volume: f64,
    pub max_cargo_mass: f64,
    #[serde(default)]
    pub max_cargo_volume: f64,
    #[serde(default)]
    pub cargo_environment: Environment,
    #[serde(default)]
    pub environment: Environment,
    /// 固有货物质量（与清单容器无关的既有载荷，不含嵌套运载器）
    #[serde(default)]
    pub fixed_cargo_mass: f64,
    /// 固有货物体积
    #[serde(default)]
    pub fixed_cargo_volume: f64,
}

// ==========================================
// CarrierRegistry - 运载器注册表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CarrierRegistry {
    carriers: BTreeMap<CarrierId, Carrier>,
    parent: BTreeMap<CarrierId, CarrierId>,
    children: BTreeMap<CarrierId, Vec<CarrierId>>,
}

impl CarrierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册运载器（同 id 覆盖定义，保留嵌套关系）
    pub fn insert(&mut self, carrier: Carrier) {
        self.carriers.insert(carrier.id, carrier);
    }

    /// 建立嵌套关系: child 装载于 parent 内
    ///
    /// # 返回
    /// - true: 建立成功（child 原有父级被替换）
    /// - false: 任一方未注册 / 自嵌套 / 将形成环
    pub fn nest(&mut self, child: CarrierId, parent: CarrierId) -> bool {
        if child == parent || !self.carriers.contains_key(&child) || !self.carriers.contains_key(&parent) {
            return false;
        }
        // parent 的祖先链中出现 child 即成环
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return false;
            }
            cursor = self.parent.get(&id).copied();
        }

        if let Some(old_parent) = self.parent.insert(child, parent) {
            if let Some(siblings) = self.children.get_mut(&old_parent) {
                siblings.retain(|c| *c != child);
            }
        }
        self.children.entry(parent).or_default().push(child);
        true
    }

    pub fn get(&self, id: CarrierId) -> Option<&Carrier> {
        self.carriers.get(&id)
    }

    pub fn contains(&self, id: CarrierId) -> bool {
        self.carriers.contains_key(&id)
    }

    pub fn parent_of(&self, id: CarrierId) -> Option<CarrierId> {
        self.parent.get(&id).copied()
    }

    pub fn children_of(&self, id: CarrierId) -> &[CarrierId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Carrier> {
        self.carriers.values()
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    pub fn clear(&mut self) {
        self.carriers.clear();
        self.parent.clear();
        self.children.clear();
    }

    /// 展开顶层运载器及其全部嵌套运载器（先序，去重）
    pub fn flatten_all_carriers(&self, roots: &[CarrierId]) -> Vec<CarrierId> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut stack: Vec<CarrierId> = roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !self.contains(id) || !seen.insert(id) {
                continue;
            }
            out.push(id);
            stack.extend(self.children_of(id).iter().rev().copied());
        }
        out
    }

    // ===== 质量 / 体积 =====

    /// 内置货物质量 = 固有货物 + 嵌套运载器总质量
    pub fn cargo_mass(&self, id: CarrierId, config: &ManifestConfig) -> f64 {
        let Some(carrier) = self.get(id) else {
            return 0.0;
        };
        let nested: f64 = self
            .children_of(id)
            .iter()
            .map(|child| self.total_mass(*child, config))
            .sum();
        config.rounded_mass(carrier.fixed_cargo_mass + nested)
    }

    /// 内置货物体积 = 固有货物 + 嵌套运载器外形体积
    pub fn cargo_volume(&self, id: CarrierId, config: &ManifestConfig) -> f64 {
        let Some(carrier) = self.get(id) else {
            return 0.0;
        };
        let nested: f64 = self
            .children_of(id)
            .iter()
            .filter_map(|child| self.get(*child))
            .map(|c| c.volume)
            .sum();
        config.rounded_volume(carrier.fixed_cargo_volume + nested)
    }

    /// 运载器总质量 = 自重 + 内置货物质量
    pub fn total_mass(&self, id: CarrierId, config: &ManifestConfig) -> f64 {
        match self.get(id) {
            Some(carrier) => config.rounded_mass(carrier.mass + self.cargo_mass(id, config)),
            None => 0.0,
        }
    }
}
