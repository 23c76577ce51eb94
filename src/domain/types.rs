// ==========================================
// SpaceNet 货运清单引擎 - 领域类型定义
// ==========================================
// 职责: 补给类别 (COS) 层级、环境标签、节点类型
// 红线: COS 层级判定只依赖编号前缀，不依赖名称
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 补给类别 (Class of Supply)
// ==========================================
// 编号规则: 0-10 为根类别，子类别编号以父类编号为前缀
// 例: 201 (水) 属于 COS2, 4011 属于 401 属于 COS4
// 特例: COS10 与任何类别都不构成父子关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassOfSupply(u32);

impl ClassOfSupply {
    pub const COS0: ClassOfSupply = ClassOfSupply(0);
    pub const COS1: ClassOfSupply = ClassOfSupply(1);
    pub const COS2: ClassOfSupply = ClassOfSupply(2);
    pub const COS3: ClassOfSupply = ClassOfSupply(3);
    pub const COS4: ClassOfSupply = ClassOfSupply(4);
    pub const COS5: ClassOfSupply = ClassOfSupply(5);
    pub const COS6: ClassOfSupply = ClassOfSupply(6);
    pub const COS7: ClassOfSupply = ClassOfSupply(7);
    pub const COS8: ClassOfSupply = ClassOfSupply(8);
    pub const COS9: ClassOfSupply = ClassOfSupply(9);
    pub const COS10: ClassOfSupply = ClassOfSupply(10);

    pub const COS101: ClassOfSupply = ClassOfSupply(101); // 低温推进剂
    pub const COS102: ClassOfSupply = ClassOfSupply(102); // 可贮存推进剂
    pub const COS201: ClassOfSupply = ClassOfSupply(201); // 水
    pub const COS203: ClassOfSupply = ClassOfSupply(203); // 气体
    pub const COS501: ClassOfSupply = ClassOfSupply(501); // 货物容器

    /// 已登记的全部补给类别编号
    const KNOWN_IDS: &'static [u32] = &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, //
        101, 102, 103, 104, 105, 106, //
        201, 202, 203, 204, 205, 206, //
        301, 302, 303, 304, 305, 306, //
        401, 402, 403, 404, 405, 4011, 4012, //
        501, 502, //
        601, 602, 603, //
        701, 702, 703, //
        801, 802, 803, 804, 805, 806, 8041, 8042, //
        901, 902, 9021, 9022, 9023, 9024,
    ];

    /// 按编号获取补给类别
    ///
    /// # 返回
    /// - Some: 编号已登记
    /// - None: 未知编号
    pub fn from_id(id: u32) -> Option<Self> {
        if Self::KNOWN_IDS.contains(&id) {
            Some(ClassOfSupply(id))
        } else {
            None
        }
    }

    pub fn id(&self) -> u32 {
        self.0
    }

    /// 父类别（根类别返回 None）
    pub fn parent(&self) -> Option<Self> {
        match self.0 {
            id if id >= 1000 => Some(ClassOfSupply(id / 10)),
            id if id >= 100 => Some(ClassOfSupply(id / 100)),
            _ => None,
        }
    }

    /// 是否为 `other` 的子类别（严格子类，不含自身）
    pub fn is_subclass_of(&self, other: ClassOfSupply) -> bool {
        if self.0 == 10 || other.0 == 10 {
            return false;
        }
        let sup = other.0.to_string();
        let sub = self.0.to_string();
        sup.len() < sub.len() && sub.starts_with(&sup)
    }

    /// 是否等于 `other` 或为其子类别
    pub fn is_instance_of(&self, other: ClassOfSupply) -> bool {
        *self == other || self.is_subclass_of(other)
    }

    /// 所属根类别 (0-10)
    pub fn base_class(&self) -> ClassOfSupply {
        (0..=10)
            .map(ClassOfSupply)
            .find(|root| self.is_instance_of(*root))
            .unwrap_or(ClassOfSupply::COS0)
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            0 => "None",
            1 => "Propellants and Fuels",
            2 => "Crew Provisions",
            3 => "Crew Operations",
            4 => "Maintenance and Upkeep",
            5 => "Stowage and Restraint",
            6 => "Exploration and Research",
            7 => "Waste and Disposal",
            8 => "Habitation and Infrastructure",
            9 => "Transportation and Carriers",
            10 => "Miscellaneous",
            101 => "Cryogens",
            102 => "Hypergols",
            103 => "Nuclear Fuel",
            104 => "Petroleum Fuels",
            105 => "Other Fuels",
            106 => "Green Propellant",
            201 => "Water and Support Equipment",
            202 => "Food and Support Equipment",
            203 => "Gases",
            204 => "Hygiene Items",
            205 => "Clothing",
            206 => "Personal Items",
            501 => "Cargo Containers and Restraints",
            502 => "Inventory Management",
            _ => "Unnamed Subclass",
        }
    }
}

impl fmt::Display for ClassOfSupply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COS{}", self.0)
    }
}

// ==========================================
// 环境标签 (Environment)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Environment {
    Pressurized,   // 加压
    Unpressurized, // 非加压
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Pressurized => "PRESSURIZED",
            Environment::Unpressurized => "UNPRESSURIZED",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Unpressurized
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 节点类型 (Node Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Surface,  // 天体表面
    Orbital,  // 轨道
    Lagrange, // 拉格朗日点
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Surface => write!(f, "SURFACE"),
            NodeType::Orbital => write!(f, "ORBITAL"),
            NodeType::Lagrange => write!(f, "LAGRANGE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cos_parent() {
        assert_eq!(ClassOfSupply::COS201.parent(), Some(ClassOfSupply::COS2));
        assert_eq!(
            ClassOfSupply::from_id(4011).and_then(|c| c.parent()),
            ClassOfSupply::from_id(401)
        );
        assert_eq!(ClassOfSupply::COS1.parent(), None);
    }

    #[test]
    fn test_cos_subclass_prefix_rule() {
        assert!(ClassOfSupply::COS101.is_subclass_of(ClassOfSupply::COS1));
        assert!(ClassOfSupply::COS203.is_instance_of(ClassOfSupply::COS2));
        assert!(!ClassOfSupply::COS1.is_subclass_of(ClassOfSupply::COS1));
        assert!(ClassOfSupply::COS1.is_instance_of(ClassOfSupply::COS1));
        // COS10 不是 COS1 的子类
        assert!(!ClassOfSupply::COS10.is_subclass_of(ClassOfSupply::COS1));
        assert!(!ClassOfSupply::COS201.is_subclass_of(ClassOfSupply::COS1));
    }

    #[test]
    fn test_cos_base_class() {
        let c = ClassOfSupply::from_id(9023).unwrap();
        assert_eq!(c.base_class(), ClassOfSupply::COS9);
        assert_eq!(ClassOfSupply::COS10.base_class(), ClassOfSupply::COS10);
        assert_eq!(ClassOfSupply::from_id(7777), None);
    }

    #[test]
    fn test_environment_serde() {
        let json = serde_json::to_string(&Environment::Pressurized).unwrap();
        assert_eq!(json, "\"PRESSURIZED\"");
        let env: Environment = serde_json::from_str("\"UNPRESSURIZED\"").unwrap();
        assert_eq!(env, Environment::Unpressurized);
    }
}
