// ==========================================
// SpaceNet 货运清单引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    // ===== 引用完整性错误 =====
    #[error("未知节点 ({context}): {node}")]
    UnknownNode { context: String, node: String },

    #[error("未知资源 ({context}): {resource}")]
    UnknownResource { context: String, resource: u32 },

    #[error("未知运载器 ({context}): {carrier}")]
    UnknownCarrier { context: String, carrier: u32 },

    #[error("补给边下标越界: {index}（共 {count} 条）")]
    EdgeIndexOutOfRange { index: usize, count: usize },

    #[error("重复标识 ({kind}): {id}")]
    DuplicateId { kind: String, id: String },

    #[error("运载器嵌套非法: {child} -> {parent}（自嵌套或成环）")]
    InvalidCarrierNesting { child: u32, parent: u32 },

    // ===== 数据质量错误 =====
    #[error("未知补给类别编号: {0}")]
    InvalidClassOfSupply(u32),

    #[error("数值范围错误 ({field}): {value}")]
    ValueRangeError { field: String, value: f64 },

    #[error("补给边时间窗非法 ({edge}): start={start}, end={end}")]
    InvalidTimeWindow { edge: String, start: f64, end: f64 },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
