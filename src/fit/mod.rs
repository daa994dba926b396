//! # 拟合接口模块
//!
//! 外层参数拟合回路消费的距离/误差度量。引擎本身对所选
//! 度量不敏感，只负责提供强度场。
//!
//! ## 子模块
//! - `distance`: 可互换的距离度量策略
//!
//! ## 依赖关系
//! - 被 `commands/distance.rs` 使用

pub mod distance;

pub use distance::DistanceMeasure;
