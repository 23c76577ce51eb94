// ==========================================
// SpaceNet 货运清单引擎 - 打包引擎
// ==========================================
// 职责: 资源需求 → 容器（判定 / 打包 / 拆包 / 按补给类别自动打包）
// 红线: 打包量不超过剩余需求量，不突破容器质量 / 体积上限
// 红线: 加压资源不得装入非加压容器（启用环境约束时）
// 红线: 自动打包不允许无进展循环
// ==========================================

use super::{DemandSlot, Manifest};
use crate::domain::capacity::CargoCapacity;
use crate::domain::container::{ContainerArchetype, ContainerId};
use crate::domain::container_factory::ContainerFactory;
use crate::domain::resource::{Demand, DemandId, FragmentId};
use crate::domain::types::ClassOfSupply;
use tracing::{debug, instrument, warn};

// ==========================================
// 自动打包策略（按补给类别路由）
// ==========================================
enum PackingPolicy {
    /// 每轮新建容器，不复用已有容器
    FreshOnly {
        large: ContainerArchetype,
        small: ContainerArchetype,
    },
    /// 先首次适配已有同族容器，再新建
    TopUpThenFresh {
        family: fn(&ContainerArchetype) -> bool,
        large: ContainerArchetype,
        small: ContainerArchetype,
    },
    /// 按整个剩余需求定制一个容器
    Custom,
    /// 不打包（存放与固定类需求仅为估算）
    Ignore,
    /// 无对应策略
    Unsupported,
}

impl PackingPolicy {
    fn for_class(cos: ClassOfSupply) -> Self {
        // 子类别须先于其根类别判定（COS203 / COS201 属于 COS2）
        if cos.is_instance_of(ClassOfSupply::COS1) {
            PackingPolicy::FreshOnly {
                large: ContainerArchetype::LiquidTank,
                small: ContainerArchetype::LiquidTankDerivative,
            }
        } else if cos == ClassOfSupply::COS203 {
            PackingPolicy::TopUpThenFresh {
                family: ContainerArchetype::is_gas_tank,
                large: ContainerArchetype::GasTank,
                small: ContainerArchetype::GasTankDerivative,
            }
        } else if cos == ClassOfSupply::COS201 {
            PackingPolicy::TopUpThenFresh {
                family: ContainerArchetype::is_liquid_tank,
                large: ContainerArchetype::LiquidTank,
                small: ContainerArchetype::LiquidTankDerivative,
            }
        } else if [ClassOfSupply::COS2, ClassOfSupply::COS3, ClassOfSupply::COS4, ClassOfSupply::COS7]
            .iter()
            .any(|root| cos.is_instance_of(*root))
        {
            PackingPolicy::TopUpThenFresh {
                family: ContainerArchetype::is_cargo_bag,
                large: ContainerArchetype::CargoTransferBag,
                small: ContainerArchetype::HalfCargoTransferBag,
            }
        } else if cos.is_instance_of(ClassOfSupply::COS5) {
            PackingPolicy::Ignore
        } else if [ClassOfSupply::COS6, ClassOfSupply::COS8, ClassOfSupply::COS9, ClassOfSupply::COS10]
            .iter()
            .any(|root| cos.is_instance_of(*root))
        {
            PackingPolicy::Custom
        } else {
            PackingPolicy::Unsupported
        }
    }
}

impl Manifest {
    // ==========================================
    // 判定
    // ==========================================

    /// 能否将聚合需求（至少一部分）装入容器
    pub fn can_pack_demand(&self, demand: DemandId, container: ContainerId) -> bool {
        let (Some(aggregated), Some(target)) = (self.demands.get(&demand), self.containers.get(&container)) else {
            return false;
        };
        if self.remaining_amount(demand) <= 0.0 {
            return false;
        }
        if !target.accepts_environment(aggregated.demand.resource.environment, &self.config) {
            return false;
        }
        let Some(point) = self.supply_point_of_demand(demand) else {
            return false;
        };
        // 当前载荷不得已超限
        if !target.fits_mass(self.container_cargo_mass(container, Some(&point)), 0.0, &self.config)
            || !target.fits_volume(self.container_cargo_volume(container, Some(&point)), 0.0, &self.config)
        {
            return false;
        }
        self.placement_compatible(demand, container) && self.packable_amount(demand, container) > 0.0
    }

    /// 容器当前补给点与需求补给点是否相容
    ///
    /// 规则:
    /// - 已装载容器不再接收打包
    /// - 无当前补给点（空容器）接收任何需求
    /// - 边需求: 只进入同一补给点、且未绑定其他补给边的容器
    /// - 点需求: 同节点且需求时刻不晚于容器当前时刻；边绑定容器仅接收同一补给点
    pub(crate) fn placement_compatible(&self, demand: DemandId, container: ContainerId) -> bool {
        let (Some(aggregated), Some(target)) = (self.demands.get(&demand), self.containers.get(&container)) else {
            return false;
        };
        if target.is_placed() {
            return false;
        }
        let Some(container_point) = self.current_supply_point(container) else {
            return true;
        };
        let Some(demand_point) = self.supply_point_of_demand(demand) else {
            return false;
        };
        match (&aggregated.slot, self.container_edge_slot(container)) {
            (DemandSlot::Edge(edge), Some(slot)) => *edge == slot && demand_point == container_point,
            (DemandSlot::Edge(_), None) => demand_point == container_point,
            (DemandSlot::Node(_), Some(_)) => demand_point == container_point,
            (DemandSlot::Node(_), None) => {
                demand_point.node == container_point.node && demand_point.time <= container_point.time
            }
        }
    }

    /// 可装入数量 = min(剩余量, 质量余量 / 单位质量, 体积余量 / 单位体积)
    ///
    /// 余量按需求精度向下取整；环境冲突时为 0
    fn packable_amount(&self, demand: DemandId, container: ContainerId) -> f64 {
        let (Some(aggregated), Some(target)) = (self.demands.get(&demand), self.containers.get(&container)) else {
            return 0.0;
        };
        let resource = &aggregated.demand.resource;
        if !target.accepts_environment(resource.environment, &self.config) {
            return 0.0;
        }
        let remaining = self.remaining_amount(demand);
        if remaining <= 0.0 {
            return 0.0;
        }

        let point = self.supply_point_of_demand(demand);
        let by_mass = if resource.unit_mass > 0.0 {
            let headroom = target.mass_headroom(self.container_cargo_mass(container, point.as_ref()), &self.config);
            self.config.floored_demand(headroom / resource.unit_mass)
        } else {
            f64::INFINITY
        };
        let by_volume = if self.config.volume_constrained && resource.unit_volume > 0.0 {
            let headroom =
                target.volume_headroom(self.container_cargo_volume(container, point.as_ref()), &self.config);
            self.config.floored_demand(headroom / resource.unit_volume)
        } else {
            f64::INFINITY
        };

        remaining.min(by_mass).min(by_volume).max(0.0)
    }

    pub fn can_unpack_demand(&self, demand: DemandId) -> bool {
        self.packed_amount(demand) > 0.0
    }

    pub fn can_unpack_fragment(&self, fragment: FragmentId, container: ContainerId) -> bool {
        self.packed
            .get(&container)
            .is_some_and(|fragments| fragments.contains(&fragment))
    }

    pub fn can_auto_pack_demand(&self, demand: DemandId) -> bool {
        self.remaining_amount(demand) > 0.0
    }

    // ==========================================
    // 打包 / 拆包
    // ==========================================

    /// 将聚合需求尽可能多地装入容器
    ///
    /// # 返回
    /// - Some(FragmentId): 新建的片段
    /// - None: 补给点不相容或无余量（状态不变）
    pub fn pack_demand(&mut self, demand: DemandId, container: ContainerId) -> Option<FragmentId> {
        if !self.placement_compatible(demand, container) {
            return None;
        }
        let amount = self.packable_amount(demand, container);
        if amount <= 0.0 {
            debug!(demand = %demand, container = %container, "容器无可用余量");
            return None;
        }
        let fragment = self.commit_fragment(demand, container, amount)?;
        debug!(
            demand = %demand,
            container = %container,
            fragment = %fragment,
            amount = amount,
            remaining = self.remaining_amount(demand),
            "需求已打包"
        );
        Some(fragment)
    }

    /// 拆除聚合需求的全部片段
    ///
    /// # 返回
    /// 被拆除的片段数
    pub fn unpack_demand(&mut self, demand: DemandId) -> usize {
        if !self.can_unpack_demand(demand) {
            return 0;
        }
        let fragments: Vec<FragmentId> = self
            .demands
            .get(&demand)
            .map(|d| d.fragments.iter().copied().collect())
            .unwrap_or_default();
        for fragment in &fragments {
            if let Some(packed) = self.drop_fragment(*fragment) {
                if let Some(set) = self.packed.get_mut(&packed.container) {
                    set.remove(fragment);
                }
            }
        }
        debug!(demand = %demand, fragments = fragments.len(), "需求已全部拆包");
        fragments.len()
    }

    /// 从容器中拆除单个片段
    pub fn unpack_fragment(&mut self, fragment: FragmentId, container: ContainerId) -> bool {
        if !self.can_unpack_fragment(fragment, container) {
            return false;
        }
        if let Some(set) = self.packed.get_mut(&container) {
            set.remove(&fragment);
        }
        self.drop_fragment(fragment).is_some()
    }

    // ==========================================
    // 自动打包
    // ==========================================

    /// 按补给类别自动打包聚合需求
    ///
    /// # 返回
    /// 本次新建的容器
    #[instrument(skip(self), fields(demand = %demand))]
    pub fn auto_pack_demand(&mut self, demand: DemandId) -> Vec<ContainerId> {
        if !self.can_auto_pack_demand(demand) {
            return Vec::new();
        }
        let Some(cos) = self.demands.get(&demand).map(|d| d.demand.resource.class_of_supply) else {
            return Vec::new();
        };

        match PackingPolicy::for_class(cos) {
            PackingPolicy::FreshOnly { large, small } => self.pack_into_fresh(demand, large, small),
            PackingPolicy::TopUpThenFresh { family, large, small } => {
                self.top_up(demand, family);
                self.pack_into_fresh(demand, large, small)
            }
            PackingPolicy::Custom => self.pack_into_custom(demand).into_iter().collect(),
            PackingPolicy::Ignore => {
                debug!(class_of_supply = %cos, "该补给类别不打包");
                Vec::new()
            }
            PackingPolicy::Unsupported => {
                warn!(class_of_supply = %cos, "补给类别无自动打包策略");
                Vec::new()
            }
        }
    }

    /// 首次适配: 按容器编号顺序向已有同族容器补装
    fn top_up(&mut self, demand: DemandId, family: fn(&ContainerArchetype) -> bool) {
        let candidates: Vec<ContainerId> = self
            .containers
            .values()
            .filter(|c| family(&c.archetype))
            .map(|c| c.id)
            .collect();
        for container in candidates {
            if self.remaining_amount(demand) <= 0.0 {
                break;
            }
            if self.can_pack_demand(demand, container) {
                self.pack_demand(demand, container);
            }
        }
    }

    /// 逐个新建大 / 小规格容器直到需求装完
    fn pack_into_fresh(
        &mut self,
        demand: DemandId,
        large: ContainerArchetype,
        small: ContainerArchetype,
    ) -> Vec<ContainerId> {
        let mut created = Vec::new();
        while self.remaining_amount(demand) > 0.0 {
            let Some(resource) = self.demands.get(&demand).map(|d| d.demand.resource.clone()) else {
                break;
            };
            let remaining = Demand::new(resource, self.remaining_amount(demand));
            let archetype = ContainerFactory::new(&self.config).choose_size(&remaining, large, small);
            let Some(container) = self.create_container(archetype) else {
                warn!(archetype = %archetype, "容器目录缺少该原型，停止自动打包");
                break;
            };
            if self.pack_demand(demand, container).is_none() {
                self.remove_container(container);
                warn!(
                    demand = %demand,
                    archetype = %archetype,
                    remaining = remaining.amount,
                    "新建容器未装入任何需求，停止自动打包"
                );
                break;
            }
            created.push(container);
        }
        created
    }

    /// 定制容器: 按剩余需求整体定制并一次装入
    fn pack_into_custom(&mut self, demand: DemandId) -> Option<ContainerId> {
        let resource = self.demands.get(&demand)?.demand.resource.clone();
        let remaining = Demand::new(resource, self.remaining_amount(demand));
        let id = self.next_container_id();
        let container = ContainerFactory::new(&self.config).create_custom(id, &remaining);
        let name = container.name.clone();
        if !self.add_container(container) {
            return None;
        }
        self.commit_fragment(demand, id, remaining.amount)?;
        debug!(container = %name, amount = remaining.amount, "定制容器已装入全部剩余需求");
        Some(id)
    }
}
