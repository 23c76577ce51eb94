// ==========================================
// SpaceNet 货运清单引擎 - 容器原型工厂
// ==========================================
// 职责: 按容器目录生成标准容器，或按单个需求生成定制容器
// 输入: ContainerCatalog + 容器编号
// 输出: 未装载、无内容的 ResourceContainer
// ==========================================

use crate::config::ManifestConfig;
use crate::domain::container::{ContainerArchetype, ContainerId, ResourceContainer};
use crate::domain::resource::Demand;
use crate::domain::types::ClassOfSupply;

pub struct ContainerFactory<'a> {
    config: &'a ManifestConfig,
}

impl<'a> ContainerFactory<'a> {
    pub fn new(config: &'a ManifestConfig) -> Self {
        Self { config }
    }

    /// 生成标准容器；定制原型无固定规格，返回 None
    pub fn create(&self, archetype: ContainerArchetype, id: ContainerId) -> Option<ResourceContainer> {
        let spec = self.config.catalog.spec(archetype)?;
        Some(ResourceContainer::new(
            id,
            format!("{} {}", archetype.display_prefix(), id),
            archetype,
            spec.mass,
            spec.volume,
            spec.max_cargo_mass,
            spec.max_cargo_volume,
            spec.cargo_environment,
        ))
    }

    /// 按剩余需求生成定制容器
    ///
    /// 规则:
    /// - 自重 = 需求质量 × 包装系数
    /// - 载货上限 = 需求质量 / 需求体积
    /// - 外形体积 = 需求体积 × custom_container_volume_factor
    /// - 舱内环境跟随资源环境
    pub fn create_custom(&self, id: ContainerId, remaining: &Demand) -> ResourceContainer {
        let demand_mass = remaining.mass(self.config);
        let demand_volume = remaining.volume(self.config);
        let prefix = custom_name_prefix(remaining.resource.class_of_supply);
        ResourceContainer::new(
            id,
            format!("{} {}", prefix, id),
            ContainerArchetype::Custom,
            self.config
                .rounded_mass(demand_mass * remaining.resource.packing_factor),
            self.config
                .rounded_volume(demand_volume * self.config.custom_container_volume_factor),
            demand_mass,
            demand_volume,
            remaining.resource.environment,
        )
    }

    /// 大 / 小规格选择: 剩余质量（或启用体积约束时的剩余体积）超过小规格上限即取大规格
    pub fn choose_size(
        &self,
        remaining: &Demand,
        large: ContainerArchetype,
        small: ContainerArchetype,
    ) -> ContainerArchetype {
        let Some(small_spec) = self.config.catalog.spec(small) else {
            return large;
        };
        let exceeds_mass = remaining.resource.unit_mass * remaining.amount > small_spec.max_cargo_mass;
        let exceeds_volume = self.config.volume_constrained
            && remaining.resource.unit_volume * remaining.amount > small_spec.max_cargo_volume;
        if exceeds_mass || exceeds_volume {
            large
        } else {
            small
        }
    }
}

/// 定制容器命名前缀（按根类别）
fn custom_name_prefix(cos: ClassOfSupply) -> &'static str {
    match cos.base_class() {
        ClassOfSupply::COS6 => "Science",
        ClassOfSupply::COS8 => "Infrastructure",
        ClassOfSupply::COS9 => "Transportation",
        _ => "Miscellaneous",
    }
}
