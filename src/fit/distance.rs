//! # 距离度量策略
//!
//! 比较参考强度与计算强度的可互换度量，供外层拟合回路打分。
//! 接口用带长度的切片与布尔掩膜，消除裸指针/长度不匹配
//! 这一类错误；长度不一致返回 `SizeMismatch` 而非未定义行为。
//!
//! 返回值为标量（单元素向量）或逐点残差向量，取决于策略。
//!
//! ## 依赖关系
//! - 被 `commands/distance.rs` 使用
//! - 使用 `error.rs`

use crate::error::{GixformError, Result};

/// 距离度量公共契约
///
/// `reference`、`data`、`mask` 等长；掩膜为 false 的像素不参与。
pub trait DistanceMeasure {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>>;
}

/// 等长检查
fn check_sizes(reference: &[f64], data: &[f64], mask: &[bool]) -> Result<()> {
    if data.len() != reference.len() {
        return Err(GixformError::SizeMismatch {
            expected: reference.len(),
            actual: data.len(),
        });
    }
    if mask.len() != reference.len() {
        return Err(GixformError::SizeMismatch {
            expected: reference.len(),
            actual: mask.len(),
        });
    }
    Ok(())
}

/// 掩膜下的 L2 范数
fn norm_l2(arr: &[f64], mask: &[bool]) -> f64 {
    arr.iter()
        .zip(mask)
        .filter(|(_, &m)| m)
        .map(|(v, _)| v * v)
        .sum::<f64>()
        .sqrt()
}

/// 掩膜下的最小/最大值
fn min_max(arr: &[f64], mask: &[bool]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (v, &m) in arr.iter().zip(mask) {
        if m {
            min = min.min(*v);
            max = max.max(*v);
        }
    }
    (min, max)
}

/// 绝对差之和
pub struct AbsoluteDifference;

impl DistanceMeasure for AbsoluteDifference {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        let sum = reference
            .iter()
            .zip(data)
            .zip(mask)
            .filter(|(_, &m)| m)
            .map(|((r, d), _)| (r - d).abs())
            .sum();
        Ok(vec![sum])
    }
}

/// 绝对差平方和
pub struct AbsoluteDifferenceSquare;

impl DistanceMeasure for AbsoluteDifferenceSquare {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        let sum = reference
            .iter()
            .zip(data)
            .zip(mask)
            .filter(|(_, &m)| m)
            .map(|((r, d), _)| (r - d) * (r - d))
            .sum();
        Ok(vec![sum])
    }
}

/// 绝对差平方和，按参考平方和归一
pub struct AbsoluteDifferenceSquareNorm;

impl DistanceMeasure for AbsoluteDifferenceSquareNorm {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        let mut dist_sum = 0.0;
        let mut ref_sum = 0.0;
        for ((r, d), &m) in reference.iter().zip(data).zip(mask) {
            if m {
                dist_sum += (r - d) * (r - d);
                ref_sum += r * r;
            }
        }
        Ok(vec![dist_sum / ref_sum])
    }
}

/// 相对绝对差平方和
pub struct RelativeAbsoluteDifferenceSquare;

impl DistanceMeasure for RelativeAbsoluteDifferenceSquare {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        let sum = reference
            .iter()
            .zip(data)
            .zip(mask)
            .filter(|(_, &m)| m)
            .map(|((r, d), _)| {
                let t = (r - d) / r;
                t * t
            })
            .sum();
        Ok(vec![sum])
    }
}

/// 逐点残差向量（掩膜外为 0）
pub struct ResidualVector;

impl DistanceMeasure for ResidualVector {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        Ok(reference
            .iter()
            .zip(data)
            .zip(mask)
            .map(|((r, d), &m)| if m { r - d } else { 0.0 })
            .collect())
    }
}

/// 逐点相对残差向量
pub struct RelativeResidualVector;

impl DistanceMeasure for RelativeResidualVector {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        Ok(reference
            .iter()
            .zip(data)
            .zip(mask)
            .map(|((r, d), &m)| if m { (d - r) / r.abs() } else { 0.0 })
            .collect())
    }
}

/// 单位长度归一后的绝对差之和（L1）
pub struct UnitLengthNormalizedDifferenceL1;

impl DistanceMeasure for UnitLengthNormalizedDifferenceL1 {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        let ref_norm = norm_l2(reference, mask);
        let dat_norm = norm_l2(data, mask);
        let sum = reference
            .iter()
            .zip(data)
            .zip(mask)
            .filter(|(_, &m)| m)
            .map(|((r, d), _)| (d / dat_norm - r / ref_norm).abs())
            .sum();
        Ok(vec![sum])
    }
}

/// 单位长度归一后的差平方和（L2，默认度量）
pub struct UnitLengthNormalizedDifferenceSquare;

impl DistanceMeasure for UnitLengthNormalizedDifferenceSquare {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        let ref_norm = norm_l2(reference, mask);
        let dat_norm = norm_l2(data, mask);
        let sum = reference
            .iter()
            .zip(data)
            .zip(mask)
            .filter(|(_, &m)| m)
            .map(|((r, d), _)| {
                let t = d / dat_norm - r / ref_norm;
                t * t
            })
            .sum();
        Ok(vec![sum])
    }
}

/// 单位长度归一的逐点残差向量
pub struct UnitLengthNormalizedResidualVector;

impl DistanceMeasure for UnitLengthNormalizedResidualVector {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        let ref_norm = norm_l2(reference, mask);
        let dat_norm = norm_l2(data, mask);
        Ok(reference
            .iter()
            .zip(data)
            .zip(mask)
            .map(|((r, d), &m)| {
                if m {
                    d / dat_norm - r / ref_norm
                } else {
                    0.0
                }
            })
            .collect())
    }
}

/// min-max 缩放后的绝对差平方和
pub struct ScaledRelativeAbsoluteDifferenceSquare;

impl DistanceMeasure for ScaledRelativeAbsoluteDifferenceSquare {
    fn distance(&self, reference: &[f64], data: &[f64], mask: &[bool]) -> Result<Vec<f64>> {
        check_sizes(reference, data, mask)?;
        let (ref_min, ref_max) = min_max(reference, mask);
        let (dat_min, dat_max) = min_max(data, mask);
        // 常数数组缩放因子取 1，避免除零
        let tiny = 1e-30;
        let ref_range = if ref_max - ref_min < tiny {
            1.0
        } else {
            ref_max - ref_min
        };
        let dat_range = if dat_max - dat_min < tiny {
            1.0
        } else {
            dat_max - dat_min
        };
        let sum = reference
            .iter()
            .zip(data)
            .zip(mask)
            .filter(|(_, &m)| m)
            .map(|((r, d), _)| {
                let t = (r - ref_min) / ref_range - (d - dat_min) / dat_range;
                t * t
            })
            .sum();
        Ok(vec![sum])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REF: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
    const DAT: [f64; 4] = [1.5, 2.0, 2.0, 8.0];

    #[test]
    fn test_absolute_difference_respects_mask() {
        let mask = [true, true, true, false];
        let d = AbsoluteDifference.distance(&REF, &DAT, &mask).unwrap();
        assert_eq!(d.len(), 1);
        assert!((d[0] - (0.5 + 0.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_absolute_difference_square() {
        let mask = [true; 4];
        let d = AbsoluteDifferenceSquare.distance(&REF, &DAT, &mask).unwrap();
        assert!((d[0] - (0.25 + 0.0 + 1.0 + 16.0)).abs() < 1e-12);
    }

    #[test]
    fn test_residual_vector_zeroes_masked_pixels() {
        let mask = [true, false, true, true];
        let d = ResidualVector.distance(&REF, &DAT, &mask).unwrap();
        assert_eq!(d, vec![-0.5, 0.0, 1.0, -4.0]);
    }

    #[test]
    fn test_identical_arrays_give_zero_distance() {
        let mask = [true; 4];
        for measure in [
            &AbsoluteDifference as &dyn DistanceMeasure,
            &AbsoluteDifferenceSquare,
            &UnitLengthNormalizedDifferenceL1,
            &UnitLengthNormalizedDifferenceSquare,
            &ScaledRelativeAbsoluteDifferenceSquare,
        ] {
            let d = measure.distance(&REF, &REF, &mask).unwrap();
            assert!(d[0].abs() < 1e-12);
        }
    }

    #[test]
    fn test_unit_length_normalization_is_scale_invariant() {
        let mask = [true; 4];
        let scaled: Vec<f64> = DAT.iter().map(|v| v * 37.5).collect();
        let a = UnitLengthNormalizedDifferenceSquare
            .distance(&REF, &DAT, &mask)
            .unwrap();
        let b = UnitLengthNormalizedDifferenceSquare
            .distance(&REF, &scaled, &mask)
            .unwrap();
        assert!((a[0] - b[0]).abs() < 1e-12);
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let mask = [true; 4];
        let short = [1.0, 2.0];
        let err = AbsoluteDifference.distance(&REF, &short, &mask).unwrap_err();
        assert!(matches!(err, GixformError::SizeMismatch { .. }));
        let short_mask = [true; 2];
        let err = AbsoluteDifference
            .distance(&REF, &DAT, &short_mask)
            .unwrap_err();
        assert!(matches!(err, GixformError::SizeMismatch { .. }));
    }
}
