//! # 统一错误处理模块
//!
//! 定义 gixform 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分级
//! - `InvalidParameter`: 非致命，调用方警告后跳过
//! - `MissingParameter`: 终止当前形状因子计算，不产生半成品场
//! - 其余为 I/O、解析、数值比较等常规错误
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// gixform 统一错误类型
#[derive(Error, Debug)]
pub enum GixformError {
    // ─────────────────────────────────────────────────────────────
    // 形状参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid shape parameter for role '{role}'")]
    InvalidParameter { role: String },

    #[error("Required parameter '{role}' missing or empty for shape '{shape}'")]
    MissingParameter { role: String, shape: String },

    #[error("Shape kind '{0}' has no analytic kernel (numeric mesh path is external)")]
    UnsupportedShape(String),

    // ─────────────────────────────────────────────────────────────
    // 距离度量错误
    // ─────────────────────────────────────────────────────────────
    #[error("Array size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {what}: '{input}'\nReason: {reason}")]
    ParseError {
        what: String,
        input: String,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV / 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot error: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GixformError>;
