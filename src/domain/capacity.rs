// ==========================================
// SpaceNet 货运清单引擎 - 载货能力约束
// ==========================================
// 职责: 容器与运载器共用的容量约束接口
// 红线: 所有"能否装入"判定一律使用 精度 / 2 的容差
// ==========================================

use crate::config::ManifestConfig;
use crate::domain::carrier::Carrier;
use crate::domain::container::ResourceContainer;
use crate::domain::types::Environment;

// ==========================================
// Trait: CargoCapacity
// ==========================================
// 用途: 打包引擎（资源 → 容器）与装载引擎（容器 → 运载器）的约束检查
pub trait CargoCapacity {
    fn max_cargo_mass(&self) -> f64;

    fn max_cargo_volume(&self) -> f64;

    fn cargo_environment(&self) -> Environment;

    /// 在已有载荷基础上追加质量后是否仍在上限内
    fn fits_mass(&self, current_mass: f64, added_mass: f64, config: &ManifestConfig) -> bool {
        current_mass + added_mass - config.rounded_mass(self.max_cargo_mass()) < config.mass_tolerance()
    }

    /// 追加体积后是否仍在上限内（未启用体积约束时恒为 true）
    fn fits_volume(&self, current_volume: f64, added_volume: f64, config: &ManifestConfig) -> bool {
        !config.volume_constrained
            || current_volume + added_volume - config.rounded_volume(self.max_cargo_volume())
                < config.volume_tolerance()
    }

    /// 环境约束: 加压物品不得进入非加压舱（未启用环境约束时恒为 true）
    fn accepts_environment(&self, item_environment: Environment, config: &ManifestConfig) -> bool {
        !(config.environment_constrained
            && item_environment == Environment::Pressurized
            && self.cargo_environment() == Environment::Unpressurized)
    }

    /// 剩余质量余量（不小于 0）
    fn mass_headroom(&self, current_mass: f64, config: &ManifestConfig) -> f64 {
        (config.rounded_mass(self.max_cargo_mass()) - current_mass).max(0.0)
    }

    /// 剩余体积余量（不小于 0）
    fn volume_headroom(&self, current_volume: f64, config: &ManifestConfig) -> f64 {
        (config.rounded_volume(self.max_cargo_volume()) - current_volume).max(0.0)
    }
}

// ==========================================
// CargoCapacity trait 实现
// ==========================================
impl CargoCapacity for ResourceContainer {
    fn max_cargo_mass(&self) -> f64 {
        self.max_cargo_mass
    }

    fn max_cargo_volume(&self) -> f64 {
        self.max_cargo_volume
    }

    fn cargo_environment(&self) -> Environment {
        self.cargo_environment
    }
}

impl CargoCapacity for Carrier {
    fn max_cargo_mass(&self) -> f64 {
        self.max_cargo_mass
    }

    fn max_cargo_volume(&self) -> f64 {
        self.max_cargo_volume
    }

    fn cargo_environment(&self) -> Environment {
        self.cargo_environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::carrier::CarrierId;

    fn create_test_carrier(cargo_environment: Environment) -> Carrier {
        Carrier {
            id: CarrierId(1),
            name: "Lander".to_string(),
            mass: 500.0,
            volume: 3.0,
            max_cargo_mass: 100.0,
            max_cargo_volume: 1.0,
            cargo_environment,
            environment: Environment::Unpressurized,
            fixed_cargo_mass: 0.0,
            fixed_cargo_volume: 0.0,
        }
    }

    #[test]
    fn test_fits_mass_with_tolerance() {
        let config = ManifestConfig::default();
        let carrier = create_test_carrier(Environment::Unpressurized);
        assert!(carrier.fits_mass(90.0, 10.0, &config));
        assert!(carrier.fits_mass(90.0, 10.004, &config));
        assert!(!carrier.fits_mass(90.0, 10.01, &config));
    }

    #[test]
    fn test_fits_volume_respects_flag() {
        let mut config = ManifestConfig::default();
        let carrier = create_test_carrier(Environment::Unpressurized);
        assert!(carrier.fits_volume(0.9, 0.5, &config));
        config.volume_constrained = true;
        assert!(!carrier.fits_volume(0.9, 0.5, &config));
    }

    #[test]
    fn test_environment_gate() {
        let config = ManifestConfig::default();
        let unpress = create_test_carrier(Environment::Unpressurized);
        let press = create_test_carrier(Environment::Pressurized);
        assert!(!unpress.accepts_environment(Environment::Pressurized, &config));
        assert!(unpress.accepts_environment(Environment::Unpressurized, &config));
        assert!(press.accepts_environment(Environment::Pressurized, &config));
    }

    #[test]
    fn test_headroom_never_negative() {
        let config = ManifestConfig::default();
        let carrier = create_test_carrier(Environment::Unpressurized);
        assert_eq!(carrier.mass_headroom(120.0, &config), 0.0);
        assert!((carrier.mass_headroom(40.0, &config) - 60.0).abs() < 1e-9);
    }
}
