//! # 参数分布离散化
//!
//! 把单个形状参数规格（定值或统计分布）解析为带权采样序列，
//! 供多分散性加权平均使用。
//!
//! ## 权重约定
//! 权重按分布自身的约定原样输出，不做归一化：
//! - 定值 / 零展宽：单个采样，权重 1
//! - 均匀分布：每个采样权重 1
//! - 高斯分布：采样点处的原始正态密度值
//!
//! 核直接消费原始权重；归一化与否由该约定决定，测试予以固定。
//!
//! ## 依赖关系
//! - 被 `ff/` 所有形状核使用
//! - 使用 `model/shape.rs` 的 ShapeParamSpec

use crate::error::{GixformError, Result};
use crate::model::{DistributionKind, DistributionSpec, ParamValue, ShapeParamSpec};

use std::f64::consts::PI;

/// 单个带权采样
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// 参数取值
    pub value: f64,
    /// 原始权重（不保证总和为 1）
    pub weight: f64,
}

/// 一个参数角色解析出的带权采样序列
pub type ParameterSamples = Vec<Sample>;

/// 解析一个参数规格
///
/// 无效规格返回 `InvalidParameter`；调用方（形状核）应警告后跳过该角色。
pub fn resolve(spec: &ShapeParamSpec) -> Result<ParameterSamples> {
    if !spec.valid {
        return Err(GixformError::InvalidParameter {
            role: spec.role.to_string(),
        });
    }
    match spec.value {
        ParamValue::Fixed(v) => Ok(vec![Sample {
            value: v,
            weight: 1.0,
        }]),
        ParamValue::Distributed(d) => Ok(discretize(&d)),
    }
}

/// 离散化一个分布描述
fn discretize(d: &DistributionSpec) -> ParameterSamples {
    // 展宽为零或步数不足时退化为定值
    if d.spread == 0.0 || d.count <= 1 {
        return vec![Sample {
            value: d.mean,
            weight: 1.0,
        }];
    }
    match d.kind {
        DistributionKind::Uniform => {
            // mean ± spread 上等间距采样，权重恒 1
            let min = d.mean - d.spread;
            let max = d.mean + d.spread;
            let step = (max - min) / (d.count - 1) as f64;
            (0..d.count)
                .map(|i| Sample {
                    value: min + step * i as f64,
                    weight: 1.0,
                })
                .collect()
        }
        DistributionKind::Gaussian => {
            // mean ± 3·spread 上等间距采样，权重为原始密度
            let min = d.mean - 3.0 * d.spread;
            let max = d.mean + 3.0 * d.spread;
            let step = (max - min) / (d.count - 1) as f64;
            let norm = 1.0 / (d.spread * (2.0 * PI).sqrt());
            (0..d.count)
                .map(|i| {
                    let x = min + step * i as f64;
                    let t = (x - d.mean) / d.spread;
                    Sample {
                        value: x,
                        weight: norm * (-0.5 * t * t).exp(),
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParamRole;

    #[test]
    fn test_fixed_yields_single_unit_sample() {
        let spec = ShapeParamSpec::fixed(ParamRole::Radius, 20.0);
        let samples = resolve(&spec).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 20.0);
        assert_eq!(samples[0].weight, 1.0);
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let mut spec = ShapeParamSpec::fixed(ParamRole::Height, 5.0);
        spec.valid = false;
        assert!(matches!(
            resolve(&spec),
            Err(GixformError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_zero_spread_collapses_to_fixed() {
        let spec = ShapeParamSpec::distributed(
            ParamRole::Radius,
            DistributionSpec {
                kind: DistributionKind::Gaussian,
                mean: 12.0,
                spread: 0.0,
                count: 25,
            },
        );
        let samples = resolve(&spec).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 12.0);
        assert_eq!(samples[0].weight, 1.0);
    }

    #[test]
    fn test_uniform_weights_are_unit() {
        let spec = ShapeParamSpec::distributed(
            ParamRole::Height,
            DistributionSpec {
                kind: DistributionKind::Uniform,
                mean: 10.0,
                spread: 2.0,
                count: 5,
            },
        );
        let samples = resolve(&spec).unwrap();
        assert_eq!(samples.len(), 5);
        assert!((samples[0].value - 8.0).abs() < 1e-12);
        assert!((samples[4].value - 12.0).abs() < 1e-12);
        assert!(samples.iter().all(|s| s.weight == 1.0));
    }

    #[test]
    fn test_gaussian_weights_are_raw_density() {
        let sigma = 2.0;
        let spec = ShapeParamSpec::distributed(
            ParamRole::Radius,
            DistributionSpec {
                kind: DistributionKind::Gaussian,
                mean: 20.0,
                spread: sigma,
                count: 7,
            },
        );
        let samples = resolve(&spec).unwrap();
        assert_eq!(samples.len(), 7);
        // 中心采样权重即峰值密度 1/(σ√2π)，总和不归一
        let peak = 1.0 / (sigma * (2.0 * PI).sqrt());
        assert!((samples[3].value - 20.0).abs() < 1e-12);
        assert!((samples[3].weight - peak).abs() < 1e-12);
        let total: f64 = samples.iter().map(|s| s.weight).sum();
        assert!((total - 1.0).abs() > 0.05);
        // 对称性
        assert!((samples[0].weight - samples[6].weight).abs() < 1e-12);
    }
}
