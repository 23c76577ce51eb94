// ==========================================
// SpaceNet 货运清单引擎 - 引擎运行参数
// ==========================================
// 职责: 精度 / 约束开关 / 容器目录，作为显式值注入 Manifest
// 红线: 引擎内所有容量比较都以此处精度为准 (容差 = 精度 / 2)
// ==========================================

use crate::config::container_catalog::ContainerCatalog;
use serde::{Deserialize, Serialize};

/// 时间舍入时的十进制修正倍数（消除浮点残差）
const TIME_DECIMAL_FIX: f64 = 1000.0;

/// 向下取整前的浮点残差补偿
const FLOOR_EPSILON: f64 = 1e-9;

// ==========================================
// ManifestConfig - 引擎配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// 时间精度（天）
    pub time_precision: f64,
    /// 需求量精度（资源单位）
    pub demand_precision: f64,
    /// 质量精度（kg）
    pub mass_precision: f64,
    /// 体积精度（m³）
    pub volume_precision: f64,
    /// 是否启用体积约束
    pub volume_constrained: bool,
    /// 是否启用环境约束（加压货物不得进入非加压舱）
    pub environment_constrained: bool,
    /// 定制容器自身体积 = 需求体积 × 该系数
    pub custom_container_volume_factor: f64,
    /// 标准容器目录
    pub catalog: ContainerCatalog,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            time_precision: 0.05,
            demand_precision: 0.01,
            mass_precision: 0.01,
            volume_precision: 0.000001,
            volume_constrained: false,
            environment_constrained: true,
            custom_container_volume_factor: 1.1,
            catalog: ContainerCatalog::default(),
        }
    }
}

impl ManifestConfig {
    // ===== 舍入 =====

    pub fn rounded_time(&self, time: f64) -> f64 {
        ((time / self.time_precision).round() * self.time_precision * TIME_DECIMAL_FIX).round()
            / TIME_DECIMAL_FIX
    }

    pub fn rounded_demand(&self, amount: f64) -> f64 {
        round_to(amount, self.demand_precision)
    }

    /// 向下取整到需求精度（打包余量计算用，不得超出容量）
    pub fn floored_demand(&self, amount: f64) -> f64 {
        ((amount / self.demand_precision) + FLOOR_EPSILON).floor() * self.demand_precision
    }

    pub fn rounded_mass(&self, mass: f64) -> f64 {
        round_to(mass, self.mass_precision)
    }

    pub fn rounded_volume(&self, volume: f64) -> f64 {
        round_to(volume, self.volume_precision)
    }

    // ===== 容差 =====

    /// 质量比较容差
    pub fn mass_tolerance(&self) -> f64 {
        self.mass_precision / 2.0
    }

    /// 体积比较容差
    pub fn volume_tolerance(&self) -> f64 {
        self.volume_precision / 2.0
    }

    /// 精度参数是否合法（全部为正的有限数）
    pub fn is_valid(&self) -> bool {
        [
            self.time_precision,
            self.demand_precision,
            self.mass_precision,
            self.volume_precision,
            self.custom_container_volume_factor,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }
}

fn round_to(value: f64, precision: f64) -> f64 {
    (value / precision).round() * precision
}
