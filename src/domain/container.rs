// ==========================================
// SpaceNet 货运清单引擎 - 资源容器
// ==========================================
// 职责: 容器定义、原型标签、装载位置、物化内容
// 红线: 一个容器同一时刻至多一个装载位置 (placement)
// 红线: 物化内容写入必须通过 can_add 校验（质量 / 体积 / 环境）
// ==========================================

use crate::config::ManifestConfig;
use crate::domain::carrier::CarrierId;
use crate::domain::network::SupplyEdgeId;
use crate::domain::resource::{Resource, ResourceId};
use crate::domain::types::Environment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 容器标识（Manifest 内按创建顺序递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// 容器原型 (Container Archetype)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerArchetype {
    LiquidTank,           // 液体罐 (LT)
    LiquidTankDerivative, // 小型液体罐 (LTD)
    GasTank,              // 气罐 (GT)
    GasTankDerivative,    // 小型气罐 (GTD)
    CargoTransferBag,     // 货物转运袋 (CTB)
    HalfCargoTransferBag, // 半尺寸转运袋 (HCTB)
    Custom,               // 按需求定制
}

impl ContainerArchetype {
    pub fn as_str(&self) -> &str {
        match self {
            ContainerArchetype::LiquidTank => "LIQUID_TANK",
            ContainerArchetype::LiquidTankDerivative => "LIQUID_TANK_DERIVATIVE",
            ContainerArchetype::GasTank => "GAS_TANK",
            ContainerArchetype::GasTankDerivative => "GAS_TANK_DERIVATIVE",
            ContainerArchetype::CargoTransferBag => "CARGO_TRANSFER_BAG",
            ContainerArchetype::HalfCargoTransferBag => "HALF_CARGO_TRANSFER_BAG",
            ContainerArchetype::Custom => "CUSTOM",
        }
    }

    /// 容器命名前缀（名称 = 前缀 + 空格 + 容器编号）
    pub fn display_prefix(&self) -> &str {
        match self {
            ContainerArchetype::LiquidTank => "Liquid Tank",
            ContainerArchetype::LiquidTankDerivative => "Liquid Tank Derivative",
            ContainerArchetype::GasTank => "Gas Tank",
            ContainerArchetype::GasTankDerivative => "Gas Tank Derivative",
            ContainerArchetype::CargoTransferBag => "CTB",
            ContainerArchetype::HalfCargoTransferBag => "Half CTB",
            ContainerArchetype::Custom => "Container",
        }
    }

    pub fn is_liquid_tank(&self) -> bool {
        matches!(self, ContainerArchetype::LiquidTank | ContainerArchetype::LiquidTankDerivative)
    }

    pub fn is_gas_tank(&self) -> bool {
        matches!(self, ContainerArchetype::GasTank | ContainerArchetype::GasTankDerivative)
    }

    pub fn is_cargo_bag(&self) -> bool {
        matches!(
            self,
            ContainerArchetype::CargoTransferBag | ContainerArchetype::HalfCargoTransferBag
        )
    }
}

impl fmt::Display for ContainerArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 装载位置: 哪条补给边上的哪个运载器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub edge: SupplyEdgeId,
    pub carrier: CarrierId,
}

/// 物化内容条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub resource: Resource,
    pub amount: f64,
}

// ==========================================
// ResourceContainer - 资源容器
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContainer {
    pub id: ContainerId,
    pub name: String,
    pub archetype: ContainerArchetype,
    /// 容器自重 (kg)
    pub mass: f64,
    /// 容器外形体积 (m³)
    pub volume: f64,
    pub max_cargo_mass: f64,
    pub max_cargo_volume: f64,
    pub cargo_environment: Environment,
    /// 当前装载位置（None = 未装载）
    pub placement: Option<Placement>,
    /// 物化内容（仅由事件物化步骤写入）
    contents: BTreeMap<ResourceId, ContentEntry>,
}

impl ResourceContainer {
    /// 创建空容器
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ContainerId,
        name: String,
        archetype: ContainerArchetype,
        mass: f64,
        volume: f64,
        max_cargo_mass: f64,
        max_cargo_volume: f64,
        cargo_environment: Environment,
    ) -> Self {
        Self {
            id,
            name,
            archetype,
            mass,
            volume,
            max_cargo_mass,
            max_cargo_volume,
            cargo_environment,
            placement: None,
            contents: BTreeMap::new(),
        }
    }

    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    // ===== 物化内容 =====

    pub fn contents(&self) -> impl Iterator<Item = &ContentEntry> {
        self.contents.values()
    }

    pub fn clear_contents(&mut self) {
        self.contents.clear();
    }

    /// 物化内容质量
    pub fn cargo_mass(&self, config: &ManifestConfig) -> f64 {
        config.rounded_mass(
            self.contents
                .values()
                .map(|e| e.resource.unit_mass * e.amount)
                .sum(),
        )
    }

    /// 物化内容体积
    pub fn cargo_volume(&self, config: &ManifestConfig) -> f64 {
        config.rounded_volume(
            self.contents
                .values()
                .map(|e| e.resource.unit_volume * e.amount)
                .sum(),
        )
    }

    /// 容器总质量 = 自重 + 物化内容质量
    pub fn total_mass(&self, config: &ManifestConfig) -> f64 {
        config.rounded_mass(self.mass + self.cargo_mass(config))
    }

    /// 能否向物化内容追加资源（不修改状态）
    pub fn can_add(&self, resource: &Resource, amount: f64, config: &ManifestConfig) -> bool {
        let max_mass = config.rounded_mass(self.max_cargo_mass);
        let max_volume = config.rounded_volume(self.max_cargo_volume);

        if self.cargo_mass(config) + resource.unit_mass * amount - max_mass > config.mass_tolerance() {
            return false; // 质量超限
        }
        if config.volume_constrained
            && self.cargo_volume(config) + resource.unit_volume * amount - max_volume
                > config.volume_tolerance()
        {
            return false; // 体积超限
        }
        !self.violates_environment(resource, config)
    }

    /// 追加资源到物化内容
    ///
    /// # 返回
    /// - true: 已写入（同资源合并数量）
    /// - false: 校验失败，内容不变
    pub fn add(&mut self, resource: &Resource, amount: f64, config: &ManifestConfig) -> bool {
        if !self.can_add(resource, amount, config) {
            return false;
        }
        self.contents
            .entry(resource.id)
            .and_modify(|e| e.amount += amount)
            .or_insert_with(|| ContentEntry {
                resource: resource.clone(),
                amount,
            });
        true
    }

    /// 环境约束: 加压资源不得进入非加压容器
    pub fn violates_environment(&self, resource: &Resource, config: &ManifestConfig) -> bool {
        config.environment_constrained
            && resource.environment == Environment::Pressurized
            && self.cargo_environment == Environment::Unpressurized
    }
}

impl fmt::Display for ResourceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ClassOfSupply;

    fn create_test_resource(environment: Environment) -> Resource {
        Resource {
            id: ResourceId(7),
            name: "Food".to_string(),
            units: "kg".to_string(),
            class_of_supply: ClassOfSupply::COS2,
            environment,
            unit_mass: 1.0,
            unit_volume: 0.002,
            packing_factor: 0.1,
        }
    }

    fn create_test_container() -> ResourceContainer {
        ResourceContainer::new(
            ContainerId(1),
            "CTB 1".to_string(),
            ContainerArchetype::CargoTransferBag,
            0.83,
            0.053,
            26.8,
            0.049,
            Environment::Unpressurized,
        )
    }

    #[test]
    fn test_add_within_capacity() {
        let config = ManifestConfig::default();
        let mut container = create_test_container();
        let food = create_test_resource(Environment::Unpressurized);
        assert!(container.add(&food, 20.0, &config));
        assert!(container.add(&food, 6.8, &config));
        assert!(!container.add(&food, 0.5, &config));
        assert_eq!(container.contents().count(), 1);
        assert!((container.cargo_mass(&config) - 26.8).abs() < 1e-9);
    }

    #[test]
    fn test_volume_checked_only_when_constrained() {
        let mut config = ManifestConfig::default();
        let container = create_test_container();
        let food = create_test_resource(Environment::Unpressurized);
        // 25 kg → 0.05 m³ > 0.049 m³
        assert!(container.can_add(&food, 25.0, &config));
        config.volume_constrained = true;
        assert!(!container.can_add(&food, 25.0, &config));
    }

    #[test]
    fn test_environment_rejection() {
        let mut config = ManifestConfig::default();
        let container = create_test_container();
        let food = create_test_resource(Environment::Pressurized);
        assert!(!container.can_add(&food, 1.0, &config));
        config.environment_constrained = false;
        assert!(container.can_add(&food, 1.0, &config));
    }

    #[test]
    fn test_archetype_families() {
        assert!(ContainerArchetype::LiquidTankDerivative.is_liquid_tank());
        assert!(ContainerArchetype::GasTank.is_gas_tank());
        assert!(ContainerArchetype::HalfCargoTransferBag.is_cargo_bag());
        assert!(!ContainerArchetype::Custom.is_cargo_bag());
    }
}
