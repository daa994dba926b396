//! # 圆柱形状核
//!
//! 闭式：对每个 (r, h) 采样对，
//! `w · 2π·r² · J1(q_par·r)/(q_par·r) · fq(q_m, h)`，
//! 其中 `q_par = sqrt(mqx² + mqy²)`，
//! `q_m = mqz + tan(tau)·(sin(eta)·mqx + cos(eta)·mqy)`。
//! q_par 恰为零时取解析极限 J1(u)/u → 1/2，避免 0/0。
//!
//! ## 依赖关系
//! - 被 `ff/engine.rs` 分发
//! - 使用 `ff/{distribution,orientation,numeric}.rs`

use crate::error::{GixformError, Result};
use crate::ff::distribution::{resolve, ParameterSamples};
use crate::ff::engine::{evaluate_grid, translation_phase, Backend};
use crate::ff::numeric::{cbess_j1, fq};
use crate::ff::orientation::rotate_q;
use crate::model::{ParamRole, ReciprocalGrid, ShapeDescriptor};
use crate::utils::output;

use num_complex::Complex64;
use std::f64::consts::PI;
use std::ops::Range;

/// 计算圆柱形状因子场（z 切片区间）
pub fn compute(
    desc: &ShapeDescriptor,
    grid: &ReciprocalGrid,
    backend: &Backend,
    z_range: Range<usize>,
) -> Result<Vec<Complex64>> {
    let mut rs: ParameterSamples = Vec::new();
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
            ParamRole::Radius => rs.extend(resolve(p)?),
            ParamRole::Height => hs.extend(resolve(p)?),
            ParamRole::Edge | ParamRole::XSize | ParamRole::YSize | ParamRole::BaseAngle => {
                output::print_warning(&format!(
                    "ignoring parameter role '{}' for shape 'cylinder'",
                    p.role
                ));
            }
        }
    }

    for (samples, role) in [(&rs, ParamRole::Radius), (&hs, ParamRole::Height)] {
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
        let qpar = (mqx * mqx + mqy * mqy).sqrt();
        let qm = mqz + (mqx * sin_eta + mqy * cos_eta) * tan_tau;
        let mut sum = Complex64::new(0.0, 0.0);
        for sr in &rs {
            let ring = if qpar.norm() == 0.0 {
                Complex64::new(0.5, 0.0)
            } else {
                let u = qpar * sr.value;
                cbess_j1(u) / u
            };
            let cross_section = 2.0 * PI * sr.value * sr.value * sr.weight;
            for sh in &hs {
                sum += cross_section * sh.weight * ring * fq(qm, sh.value);
            }
        }
        sum * translation_phase(mqx, mqy, mqz, &desc.translation)
    }))
}
