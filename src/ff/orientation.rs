//! # 取向变换
//!
//! 把网格点的动量转移三元组 (qx, qy, qz_extended) 按取向基
//! 旋转为 (mqx, mqy, mqz)。qz_extended 带虚部，故输出恒为复数。
//! 纯函数，无共享可变状态，可在数据并行循环中安全调用。
//!
//! ## 依赖关系
//! - 被 `ff/` 所有形状核在每个网格点调用
//! - 使用 `model/shape.rs` 的 OrientationState

use crate::model::OrientationState;
use num_complex::Complex64;

/// 基变换：每个输出分量是输入三元组与一个取向向量的点积
#[inline]
pub fn rotate_q(
    qx: f64,
    qy: f64,
    qz: Complex64,
    orientation: &OrientationState,
) -> (Complex64, Complex64, Complex64) {
    let row = |r: &[f64; 3]| r[0] * qx + r[1] * qy + qz * r[2];
    (
        row(&orientation.rot1),
        row(&orientation.rot2),
        row(&orientation.rot3),
    )
}
