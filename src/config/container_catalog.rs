// ==========================================
// SpaceNet 货运清单引擎 - 标准容器目录
// ==========================================
// 职责: 各标准容器原型的自重 / 体积 / 载货上限
// 说明: 默认值为参考任务数据，可通过 config_kv 覆写
// ==========================================

use crate::domain::container::ContainerArchetype;
use crate::domain::types::Environment;
use serde::{Deserialize, Serialize};

/// 单个容器原型的规格
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    /// 容器自重 (kg)
    pub mass: f64,
    /// 容器外形体积 (m³)
    pub volume: f64,
    /// 最大载货质量 (kg)
    pub max_cargo_mass: f64,
    /// 最大载货体积 (m³)
    pub max_cargo_volume: f64,
    /// 舱内环境
    pub cargo_environment: Environment,
}

impl ArchetypeSpec {
    const fn unpressurized(mass: f64, max_cargo_mass: f64, volume: f64, max_cargo_volume: f64) -> Self {
        Self {
            mass,
            volume,
            max_cargo_mass,
            max_cargo_volume,
            cargo_environment: Environment::Unpressurized,
        }
    }
}

// ==========================================
// ContainerCatalog - 容器目录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerCatalog {
    pub liquid_tank: ArchetypeSpec,
    pub liquid_tank_derivative: ArchetypeSpec,
    pub gas_tank: ArchetypeSpec,
    pub gas_tank_derivative: ArchetypeSpec,
    pub cargo_transfer_bag: ArchetypeSpec,
    pub half_cargo_transfer_bag: ArchetypeSpec,
}

impl Default for ContainerCatalog {
    fn default() -> Self {
        Self {
            liquid_tank: ArchetypeSpec::unpressurized(34.37, 74.8, 0.0748, 0.0748),
            liquid_tank_derivative: ArchetypeSpec::unpressurized(11.4567, 24.9333, 0.0249, 0.0249),
            gas_tank: ArchetypeSpec::unpressurized(108.0, 100.0, 2.75, 2.75),
            gas_tank_derivative: ArchetypeSpec::unpressurized(10.8, 10.0, 0.275, 0.275),
            cargo_transfer_bag: ArchetypeSpec::unpressurized(0.83, 26.8, 0.053, 0.049),
            half_cargo_transfer_bag: ArchetypeSpec::unpressurized(0.5532, 13.4, 0.0265, 0.0245),
        }
    }
}

impl ContainerCatalog {
    /// 查询原型规格（定制容器无固定规格，返回 None）
    pub fn spec(&self, archetype: ContainerArchetype) -> Option<&ArchetypeSpec> {
        match archetype {
            ContainerArchetype::LiquidTank => Some(&self.liquid_tank),
            ContainerArchetype::LiquidTankDerivative => Some(&self.liquid_tank_derivative),
            ContainerArchetype::GasTank => Some(&self.gas_tank),
            ContainerArchetype::GasTankDerivative => Some(&self.gas_tank_derivative),
            ContainerArchetype::CargoTransferBag => Some(&self.cargo_transfer_bag),
            ContainerArchetype::HalfCargoTransferBag => Some(&self.half_cargo_transfer_bag),
            ContainerArchetype::Custom => None,
        }
    }

    /// 可变访问，供配置覆写使用
    pub fn spec_mut(&mut self, archetype: ContainerArchetype) -> Option<&mut ArchetypeSpec> {
        match archetype {
            ContainerArchetype::LiquidTank => Some(&mut self.liquid_tank),
            ContainerArchetype::LiquidTankDerivative => Some(&mut self.liquid_tank_derivative),
            ContainerArchetype::GasTank => Some(&mut self.gas_tank),
            ContainerArchetype::GasTankDerivative => Some(&mut self.gas_tank_derivative),
            ContainerArchetype::CargoTransferBag => Some(&mut self.cargo_transfer_bag),
            ContainerArchetype::HalfCargoTransferBag => Some(&mut self.half_cargo_transfer_bag),
            ContainerArchetype::Custom => None,
        }
    }
}
