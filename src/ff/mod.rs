//! # 形状因子计算模块
//!
//! 掠入射 X 射线散射（GISAXS）解析形状因子引擎的核心。
//!
//! ## 子模块
//! - `distribution`: 参数分布离散化（多分散性采样）
//! - `orientation`: 动量转移取向变换
//! - `numeric`: sinc / 板传播子 / 复贝塞尔等特殊函数
//! - `box_kernel` / `cylinder` / `sphere`: 各形状闭式核
//! - `engine`: 分发、后端调度、复数场与分片聚合
//! - `export`: 强度与复数场导出
//! - `plot`: 强度切片热图
//!
//! ## 依赖关系
//! - 被 `commands/compute.rs` 使用
//! - 使用 `model/` 的网格与描述符

pub mod box_kernel;
pub mod cylinder;
pub mod distribution;
pub mod engine;
pub mod export;
pub mod numeric;
pub mod orientation;
pub mod plot;
pub mod sphere;

pub use engine::{Backend, ComplexField, FormFactorEngine};
