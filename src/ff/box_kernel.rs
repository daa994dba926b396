//! # 长方体形状核
//!
//! 闭式：对每个 (x, y, h) 采样三元组，
//! `4·w·x·y · sinc(mqx·x) · sinc(mqy·y) · fq(mqz + tan(tau)·(sin(eta)·mqx + cos(eta)·mqy), h)`，
//! 再乘平移相位因子。`edge` 角色同时馈入 x、y 与高度。
//!
//! ## 依赖关系
//! - 被 `ff/engine.rs` 分发
//! - 使用 `ff/{distribution,orientation,numeric}.rs`

use crate::error::{GixformError, Result};
use crate::ff::distribution::{resolve, ParameterSamples};
use crate::ff::engine::{evaluate_grid, translation_phase, Backend};
use crate::ff::numeric::{fq, sinc};
use crate::ff::orientation::rotate_q;
use crate::model::{ParamRole, ReciprocalGrid, ShapeDescriptor};
use crate::utils::output;

use num_complex::Complex64;
use std::ops::Range;

/// 计算长方体形状因子场（z 切片区间）
pub fn compute(
    desc: &ShapeDescriptor,
    grid: &ReciprocalGrid,
    backend: &Backend,
    z_range: Range<usize>,
) -> Result<Vec<Complex64>> {
    let mut xs: ParameterSamples = Vec::new();
    let mut ys: ParameterSamples = Vec::new();
    let mut hs: ParameterSamples = Vec::new();

    for p in &desc.params {
        if !p.valid {
            output::print_warning(&format!(
                "invalid shape parameter for role '{}', skipping",
                p.role
            ));
            continue;
        }
        match p.role {
            ParamRole::Edge => {
                let samples = resolve(p)?;
                xs.extend_from_slice(&samples);
                ys.extend_from_slice(&samples);
                hs.extend_from_slice(&samples);
            }
            ParamRole::XSize => xs.extend(resolve(p)?),
            ParamRole::YSize => ys.extend(resolve(p)?),
            ParamRole::Height => hs.extend(resolve(p)?),
            ParamRole::Radius | ParamRole::BaseAngle => {
                output::print_warning(&format!(
                    "ignoring parameter role '{}' for shape 'box'",
                    p.role
                ));
            }
        }
    }

    for (samples, role) in [
        (&xs, ParamRole::XSize),
        (&ys, ParamRole::YSize),
        (&hs, ParamRole::Height),
    ] {
        if samples.is_empty() {
            return Err(GixformError::MissingParameter {
                role: role.to_string(),
                shape: desc.kind.to_string(),
            });
        }
    }

    let tan_tau = desc.tau.tan();
    let sin_eta = desc.eta.sin();
    let cos_eta = desc.eta.cos();

    Ok(evaluate_grid(grid, backend, z_range, |x, y, z| {
        let (mqx, mqy, mqz) = rotate_q(
            grid.qx(x),
            grid.qy(y),
            grid.qz_extended(z),
            &desc.orientation,
        );
        let qm = (mqx * sin_eta + mqy * cos_eta) * tan_tau;
        let mut sum = Complex64::new(0.0, 0.0);
        for sh in &hs {
            let slab = fq(mqz + qm, sh.value);
            for sy in &ys {
                let sy_term = sinc(mqy * sy.value) * sy.value;
                for sx in &xs {
                    let w = 4.0 * sx.weight * sy.weight * sh.weight * sx.value;
                    sum += w * sinc(mqx * sx.value) * sy_term * slab;
                }
            }
        }
        sum * translation_phase(mqx, mqy, mqz, &desc.translation)
    }))
}
