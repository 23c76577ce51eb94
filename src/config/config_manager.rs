// ==========================================
// SpaceNet 货运清单引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 输出: ManifestConfig（缺失或格式错误的键回落到默认值）
// ==========================================

use crate::config::container_catalog::ContainerCatalog;
use crate::config::manifest_config::ManifestConfig;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_schema()?;
        Ok(manager)
    }

    fn ensure_schema(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL DEFAULT 'global',
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    // ===== 原始键值读写 =====

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::debug!(key, value, "配置已写入");
        Ok(())
    }

    /// 读取配置并解析，缺失或格式错误时回落到默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let Some(raw) = self.get_global_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    // ===== 引擎配置 =====

    /// 加载引擎配置（默认值之上叠加 config_kv 覆写）
    pub fn load_manifest_config(&self) -> Result<ManifestConfig, Box<dyn Error>> {
        let defaults = ManifestConfig::default();

        let catalog = match self.get_global_config_value(config_keys::CONTAINER_CATALOG)? {
            Some(raw) => serde_json::from_str::<ContainerCatalog>(&raw).unwrap_or_else(|e| {
                tracing::warn!(
                    config_key = config_keys::CONTAINER_CATALOG,
                    error = %e,
                    "容器目录配置格式错误，使用默认目录"
                );
                ContainerCatalog::default()
            }),
            None => defaults.catalog.clone(),
        };

        let config = ManifestConfig {
            time_precision: self.get_parsed_or_default(config_keys::TIME_PRECISION, defaults.time_precision)?,
            demand_precision: self
                .get_parsed_or_default(config_keys::DEMAND_PRECISION, defaults.demand_precision)?,
            mass_precision: self.get_parsed_or_default(config_keys::MASS_PRECISION, defaults.mass_precision)?,
            volume_precision: self
                .get_parsed_or_default(config_keys::VOLUME_PRECISION, defaults.volume_precision)?,
            volume_constrained: self
                .get_parsed_or_default(config_keys::VOLUME_CONSTRAINED, defaults.volume_constrained)?,
            environment_constrained: self.get_parsed_or_default(
                config_keys::ENVIRONMENT_CONSTRAINED,
                defaults.environment_constrained,
            )?,
            custom_container_volume_factor: self.get_parsed_or_default(
                config_keys::CUSTOM_CONTAINER_VOLUME_FACTOR,
                defaults.custom_container_volume_factor,
            )?,
            catalog,
        };

        if !config.is_valid() {
            tracing::warn!("精度配置非法（须为正数），整体回落到默认配置");
            return Ok(defaults);
        }

        tracing::info!(
            volume_constrained = config.volume_constrained,
            environment_constrained = config.environment_constrained,
            "引擎配置加载完成"
        );
        Ok(config)
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 写入导出报告，便于追溯本次装载规划使用的参数
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 精度
    pub const TIME_PRECISION: &str = "time_precision";
    pub const DEMAND_PRECISION: &str = "demand_precision";
    pub const MASS_PRECISION: &str = "mass_precision";
    pub const VOLUME_PRECISION: &str = "volume_precision";

    // 约束开关
    pub const VOLUME_CONSTRAINED: &str = "volume_constrained";
    pub const ENVIRONMENT_CONSTRAINED: &str = "environment_constrained";

    // 容器
    pub const CUSTOM_CONTAINER_VOLUME_FACTOR: &str = "custom_container_volume_factor";
    pub const CONTAINER_CATALOG: &str = "container_catalog"; // 容器目录 (JSON)
}
