//! # 形状描述符与参数规格
//!
//! 一次形状因子计算的全部输入：形状类别、参数规格列表
//! （定值或统计分布）、倾斜角 (tau, eta)、平移向量与取向基。
//! 描述符由外层拟合/配置层按候选参数构造，引擎消费一次后丢弃。
//!
//! ## 依赖关系
//! - 被 `ff/` 所有核使用
//! - 被 `commands/compute.rs` 构造

use serde::{Deserialize, Serialize};
use std::fmt;

/// 形状类别（封闭枚举，每类绑定一个解析核）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// 长方体
    Box,
    /// 圆柱
    Cylinder,
    /// 球
    Sphere,
    /// 自定义网格形状（走外部数值路径，本引擎不支持）
    Custom,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Box => write!(f, "box"),
            ShapeKind::Cylinder => write!(f, "cylinder"),
            ShapeKind::Sphere => write!(f, "sphere"),
            ShapeKind::Custom => write!(f, "custom"),
        }
    }
}

/// 参数角色（固定枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamRole {
    /// 立方体边长（同时提供 x、y 尺寸与高度）
    Edge,
    /// x 方向尺寸
    XSize,
    /// y 方向尺寸
    YSize,
    /// 高度
    Height,
    /// 半径
    Radius,
    /// 底角
    BaseAngle,
}

impl fmt::Display for ParamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamRole::Edge => write!(f, "edge"),
            ParamRole::XSize => write!(f, "x-size"),
            ParamRole::YSize => write!(f, "y-size"),
            ParamRole::Height => write!(f, "height"),
            ParamRole::Radius => write!(f, "radius"),
            ParamRole::BaseAngle => write!(f, "base-angle"),
        }
    }
}

/// 分布类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionKind {
    /// 均匀分布（mean ± spread 等间距采样，权重恒 1）
    Uniform,
    /// 高斯分布（mean ± 3·spread 等间距采样，权重为原始密度）
    Gaussian,
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionKind::Uniform => write!(f, "uniform"),
            DistributionKind::Gaussian => write!(f, "gaussian"),
        }
    }
}

/// 分布描述：类别、中心值、展宽、离散步数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistributionSpec {
    pub kind: DistributionKind,
    pub mean: f64,
    pub spread: f64,
    pub count: usize,
}

/// 参数取值：定值或分布
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ParamValue {
    Fixed(f64),
    Distributed(DistributionSpec),
}

/// 单个形状参数规格
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeParamSpec {
    /// 参数角色
    pub role: ParamRole,
    /// 有效标志；false 的规格必须被跳过，绝不静默取默认值
    pub valid: bool,
    /// 定值或分布
    pub value: ParamValue,
}

impl ShapeParamSpec {
    /// 构造定值参数
    pub fn fixed(role: ParamRole, value: f64) -> Self {
        Self {
            role,
            valid: true,
            value: ParamValue::Fixed(value),
        }
    }

    /// 构造分布参数
    pub fn distributed(role: ParamRole, spec: DistributionSpec) -> Self {
        Self {
            role,
            valid: true,
            value: ParamValue::Distributed(spec),
        }
    }
}

/// 取向状态：三个基向量定义的旋转，计算期间不可变
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrientationState {
    pub rot1: [f64; 3],
    pub rot2: [f64; 3],
    pub rot3: [f64; 3],
}

impl OrientationState {
    /// 单位取向（不旋转）
    pub fn identity() -> Self {
        Self {
            rot1: [1.0, 0.0, 0.0],
            rot2: [0.0, 1.0, 0.0],
            rot3: [0.0, 0.0, 1.0],
        }
    }
}

impl Default for OrientationState {
    fn default() -> Self {
        Self::identity()
    }
}

/// 形状描述符：一次计算的完整输入，消费一次后丢弃
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    /// 形状类别
    pub kind: ShapeKind,
    /// 参数规格列表（角色可重复，可含与形状无关的角色）
    pub params: Vec<ShapeParamSpec>,
    /// 倾斜角 tau（弧度）
    pub tau: f64,
    /// 倾斜方位角 eta（弧度）
    pub eta: f64,
    /// 平移向量 (tx, ty, tz)
    pub translation: [f64; 3],
    /// 取向状态
    pub orientation: OrientationState,
}

impl ShapeDescriptor {
    /// 构造无倾斜、无平移、单位取向的描述符
    pub fn new(kind: ShapeKind, params: Vec<ShapeParamSpec>) -> Self {
        Self {
            kind,
            params,
            tau: 0.0,
            eta: 0.0,
            translation: [0.0; 3],
            orientation: OrientationState::identity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ShapeKind::Cylinder.to_string(), "cylinder");
        assert_eq!(ParamRole::BaseAngle.to_string(), "base-angle");
        assert_eq!(DistributionKind::Gaussian.to_string(), "gaussian");
    }

    #[test]
    fn test_descriptor_defaults() {
        let desc = ShapeDescriptor::new(
            ShapeKind::Sphere,
            vec![ShapeParamSpec::fixed(ParamRole::Radius, 5.0)],
        );
        assert_eq!(desc.tau, 0.0);
        assert_eq!(desc.translation, [0.0; 3]);
        assert_eq!(desc.orientation.rot1, [1.0, 0.0, 0.0]);
        assert!(desc.params[0].valid);
    }
}
