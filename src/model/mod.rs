//! # 数据模型模块
//!
//! 定义形状因子计算的输入数据结构。
//!
//! ## 子模块
//! - `qgrid`: 倒易空间网格（qx, qy, 复数 qz_extended）
//! - `shape`: 形状描述符、参数规格、取向状态
//!
//! ## 依赖关系
//! - 被 `ff/` 与 `commands/` 使用

pub mod qgrid;
pub mod shape;

pub use qgrid::ReciprocalGrid;
pub use shape::{
    DistributionKind, DistributionSpec, OrientationState, ParamRole, ParamValue, ShapeDescriptor,
    ShapeKind, ShapeParamSpec,
};
