// ==========================================
// SpaceNet 货运清单引擎 - 装载引擎
// ==========================================
// 职责: 容器 → (补给边, 运载器)
// 红线: 容器至多一个装载位置
// 红线: 边需求容器只能随其绑定的补给边运输
// 红线: 运载器载荷（含嵌套运载器上的容器）不突破质量 / 体积上限
// 红线: 加压容器不进非加压舱
// ==========================================

use super::Manifest;
use crate::domain::capacity::CargoCapacity;
use crate::domain::carrier::CarrierId;
use crate::domain::container::{ContainerId, Placement};
use crate::domain::network::SupplyEdgeId;
use tracing::debug;

impl Manifest {
    /// 能否将容器装到某补给边的某运载器上
    pub fn can_manifest_container(&self, container: ContainerId, edge: SupplyEdgeId, carrier: CarrierId) -> bool {
        let (Some(target), Some(supply_edge), Some(vehicle)) = (
            self.containers.get(&container),
            self.supply_edge(edge),
            self.carriers.get(carrier),
        ) else {
            return false;
        };
        if target.is_placed() {
            return false;
        }
        let Some(point) = self.current_supply_point(container) else {
            return false;
        };
        if !self
            .carriers
            .flatten_all_carriers(&supply_edge.carriers)
            .contains(&carrier)
        {
            return false;
        }

        // 时空约束: 边需求容器只走绑定边；其余容器需按时到达
        let reaches_point = match self.container_edge_slot(container) {
            Some(slot) => slot == edge,
            None => supply_edge.destination() == &point.node && supply_edge.end_time <= point.time,
        };
        if !reaches_point {
            return false;
        }

        let mass = self.carrier_cargo_mass(carrier, &point);
        let added_mass = target.mass + self.container_cargo_mass(container, Some(&point));
        if !vehicle.fits_mass(mass, added_mass, &self.config) {
            return false;
        }
        // 各级上级运载器同样承担新增质量
        let mut ancestor = self.carriers.parent_of(carrier);
        while let Some(id) = ancestor {
            let Some(outer) = self.carriers.get(id) else {
                return false;
            };
            if !outer.fits_mass(self.carrier_cargo_mass(id, &point), added_mass, &self.config) {
                return false;
            }
            ancestor = self.carriers.parent_of(id);
        }
        let volume = self.carrier_cargo_volume(carrier, &point);
        if !vehicle.fits_volume(volume, target.volume, &self.config) {
            return false;
        }
        vehicle.accepts_environment(target.cargo_environment, &self.config)
    }

    /// 装载容器
    ///
    /// # 返回
    /// - true: 已装载
    /// - false: 判定失败（状态不变）
    pub fn manifest_container(&mut self, container: ContainerId, edge: SupplyEdgeId, carrier: CarrierId) -> bool {
        if !self.can_manifest_container(container, edge, carrier) {
            return false;
        }
        let Some(target) = self.containers.get_mut(&container) else {
            return false;
        };
        target.placement = Some(Placement { edge, carrier });
        debug!(container = %target.name, edge = %edge, carrier = %carrier, "容器已装载");
        true
    }

    pub fn can_unmanifest_container(&self, container: ContainerId, edge: SupplyEdgeId) -> bool {
        self.containers
            .get(&container)
            .and_then(|c| c.placement)
            .is_some_and(|p| p.edge == edge)
    }

    /// 卸载容器
    pub fn unmanifest_container(&mut self, container: ContainerId, edge: SupplyEdgeId) -> bool {
        if !self.can_unmanifest_container(container, edge) {
            return false;
        }
        let Some(target) = self.containers.get_mut(&container) else {
            return false;
        };
        target.placement = None;
        debug!(container = %target.name, edge = %edge, "容器已卸载");
        true
    }
}
