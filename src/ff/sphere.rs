//! # 球形状核
//!
//! 闭式：对每个半径采样 r，
//! `w · 4π·r³ · (sin(qr) − qr·cos(qr))/(qr)³ · exp(i·mqz·r)`，
//! 其中 `q = sqrt(mqx² + mqy² + mqz²)`。q → 0 时括号内比值
//! 取解析极限 1/3，对应经典球形状因子的体积极限。
//!
//! ## 依赖关系
//! - 被 `ff/engine.rs` 分发
//! - 使用 `ff/{distribution,orientation}.rs`

use crate::error::{GixformError, Result};
use crate::ff::distribution::{resolve, ParameterSamples};
use crate::ff::engine::{evaluate_grid, translation_phase, Backend};
use crate::ff::orientation::rotate_q;
use crate::model::{ParamRole, ReciprocalGrid, ShapeDescriptor};
use crate::utils::output;

use num_complex::Complex64;
use std::f64::consts::PI;
use std::ops::Range;

/// (sin(u) − u·cos(u))/u³ 的判零阈值
const QR_EPS: f64 = 1e-7;

/// 计算球形状因子场（z 切片区间）
pub fn compute(
    desc: &ShapeDescriptor,
    grid: &ReciprocalGrid,
    backend: &Backend,
    z_range: Range<usize>,
) -> Result<Vec<Complex64>> {
    let mut rs: ParameterSamples = Vec::new();

    for p in &desc.params {
        if !p.valid {
            output::print_warning(&format!(
                "invalid shape parameter for role '{}', skipping",
                p.role
            ));
            continue;
        }
        match p.role {
            ParamRole::Radius => rs.extend(resolve(p)?),
            ParamRole::Edge
            | ParamRole::XSize
            | ParamRole::YSize
            | ParamRole::Height
            | ParamRole::BaseAngle => {
                output::print_warning(&format!(
                    "ignoring parameter role '{}' for shape 'sphere'",
                    p.role
                ));
            }
        }
    }

    if rs.is_empty() {
        return Err(GixformError::MissingParameter {
            role: ParamRole::Radius.to_string(),
            shape: desc.kind.to_string(),
        });
    }

    Ok(evaluate_grid(grid, backend, z_range, |x, y, z| {
        let (mqx, mqy, mqz) = rotate_q(
            grid.qx(x),
            grid.qy(y),
            grid.qz_extended(z),
            &desc.orientation,
        );
        let q = (mqx * mqx + mqy * mqy + mqz * mqz).sqrt();
        let mut sum = Complex64::new(0.0, 0.0);
        for sr in &rs {
            let qr = q * sr.value;
            let shell = if qr.norm() < QR_EPS {
                Complex64::new(1.0 / 3.0, 0.0)
            } else {
                (qr.sin() - qr * qr.cos()) / (qr * qr * qr)
            };
            sum += sr.weight
                * 4.0
                * PI
                * sr.value.powi(3)
                * shell
                * (Complex64::i() * mqz * sr.value).exp();
        }
        sum * translation_phase(mqx, mqy, mqz, &desc.translation)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DistributionKind, DistributionSpec, ShapeKind, ShapeParamSpec};

    fn sphere_desc(radius: f64) -> ShapeDescriptor {
        ShapeDescriptor::new(
            ShapeKind::Sphere,
            vec![ShapeParamSpec::fixed(ParamRole::Radius, radius)],
        )
    }

    fn zero_q_grid() -> ReciprocalGrid {
        ReciprocalGrid::from_axes(vec![0.0], vec![0.0], vec![Complex64::new(0.0, 0.0)])
    }

    #[test]
    fn test_zero_q_amplitude_is_classical_volume_limit() {
        // q = 0: 振幅 = 4π·r³/3（0/0 由极限消去）
        let r = 5.0;
        let ff = compute(&sphere_desc(r), &zero_q_grid(), &Backend::Sequential, 0..1).unwrap();
        let volume = 4.0 * PI * r.powi(3) / 3.0;
        assert!((ff[0].re - volume).abs() < 1e-9 * volume);
        assert!(ff[0].im.abs() < 1e-9);
        // 强度为其平方
        assert!((ff[0].norm_sqr() - volume * volume).abs() < 1e-6 * volume * volume);
    }

    #[test]
    fn test_translation_leaves_intensity_unchanged() {
        // 无吸收网格上相位因子模恒为 1
        let grid =
            ReciprocalGrid::from_ranges(4, (-0.5, 0.5), 3, (-0.4, 0.4), 3, (0.0, 0.6), 0.0);
        let centered = sphere_desc(4.0);
        let mut shifted = sphere_desc(4.0);
        shifted.translation = [12.0, -7.0, 3.5];
        let a = compute(&centered, &grid, &Backend::Sequential, 0..grid.nz()).unwrap();
        let b = compute(&shifted, &grid, &Backend::Sequential, 0..grid.nz()).unwrap();
        for i in 0..a.len() {
            assert!(
                (a[i].norm_sqr() - b[i].norm_sqr()).abs() <= 1e-9 * a[i].norm_sqr().max(1e-12)
            );
        }
    }

    #[test]
    fn test_base_angle_role_is_a_no_op() {
        // 无关角色：警告后跳过，场不变，也不报 MissingParameter
        let grid =
            ReciprocalGrid::from_ranges(3, (-0.3, 0.3), 3, (-0.3, 0.3), 2, (0.0, 0.4), 0.01);
        let plain = sphere_desc(4.0);
        let mut with_angle = sphere_desc(4.0);
        with_angle
            .params
            .push(ShapeParamSpec::fixed(ParamRole::BaseAngle, 54.7));
        let a = compute(&plain, &grid, &Backend::Sequential, 0..grid.nz()).unwrap();
        let b = compute(&with_angle, &grid, &Backend::Sequential, 0..grid.nz()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_radius_fails() {
        let desc = ShapeDescriptor::new(
            ShapeKind::Sphere,
            vec![ShapeParamSpec::fixed(ParamRole::Height, 3.0)],
        );
        let err = compute(&desc, &zero_q_grid(), &Backend::Sequential, 0..1).unwrap_err();
        assert!(matches!(
            err,
            GixformError::MissingParameter { ref role, .. } if role == "radius"
        ));
    }

    #[test]
    fn test_collapsed_distribution_equals_fixed_value() {
        // 分布坍缩为单采样权重 1 时与定值公式完全一致
        let grid =
            ReciprocalGrid::from_ranges(3, (-0.4, 0.4), 2, (0.0, 0.3), 2, (0.0, 0.5), 0.0);
        let collapsed = ShapeDescriptor::new(
            ShapeKind::Sphere,
            vec![ShapeParamSpec::distributed(
                ParamRole::Radius,
                DistributionSpec {
                    kind: DistributionKind::Gaussian,
                    mean: 4.0,
                    spread: 0.0,
                    count: 25,
                },
            )],
        );
        let a = compute(&collapsed, &grid, &Backend::Sequential, 0..grid.nz()).unwrap();
        let b = compute(&sphere_desc(4.0), &grid, &Backend::Sequential, 0..grid.nz()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_is_finite_with_absorption() {
        let grid =
            ReciprocalGrid::from_ranges(5, (-1.0, 1.0), 5, (-1.0, 1.0), 4, (0.0, 1.2), 0.05);
        let ff = compute(&sphere_desc(8.0), &grid, &Backend::Sequential, 0..grid.nz()).unwrap();
        assert!(ff.iter().all(|v| v.re.is_finite() && v.im.is_finite()));
    }
}
