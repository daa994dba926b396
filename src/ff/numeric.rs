//! # 数值特殊函数
//!
//! 形状核公用的闭式积分构件：sinc、有限厚度板传播子 fq、
//! 复宗量一阶贝塞尔函数 J1。所有奇点取解析极限，
//! 有限输入下绝不向场中传播 NaN/Inf。
//!
//! ## 依赖关系
//! - 被 `ff/box_kernel.rs`、`ff/cylinder.rs`、`ff/sphere.rs` 使用
//! - 使用 `num-complex`

use num_complex::Complex64;

/// 判零阈值：低于该模长按解析极限处理
const ZERO_EPS: f64 = 1e-14;

/// 级数与渐近展开的分界模长
const J1_SERIES_CUTOFF: f64 = 15.0;

/// sinc(u) = sin(u)/u，u = 0 时取极限 1
#[inline]
pub fn sinc(u: Complex64) -> Complex64 {
    if u.norm() < ZERO_EPS {
        Complex64::new(1.0, 0.0)
    } else {
        u.sin() / u
    }
}

/// 有限厚度板沿 z 的传播子
///
/// `fq(q, h) = 2·exp(i·q·h/2)·sin(q·h/2)/q`，q → 0 时取极限 h。
#[inline]
pub fn fq(q: Complex64, h: f64) -> Complex64 {
    if q.norm() < ZERO_EPS {
        Complex64::new(h, 0.0)
    } else {
        let qh = q * (h / 2.0);
        2.0 * (Complex64::i() * qh).exp() * qh.sin() / q
    }
}

/// 复宗量一阶贝塞尔函数 J1(z)
///
/// |z| 较小时用幂级数，|z| 较大时用 Hankel 渐近展开
/// （分界处两者均有 ~1e-9 以内的相对精度）。
pub fn cbess_j1(z: Complex64) -> Complex64 {
    if z.norm() <= J1_SERIES_CUTOFF {
        j1_series(z)
    } else {
        j1_asymptotic(z)
    }
}

/// J1 幂级数：Σ (-1)^k/(k!(k+1)!)·(z/2)^(2k+1)
fn j1_series(z: Complex64) -> Complex64 {
    let half = z / 2.0;
    let neg_q = -half * half;
    let mut term = half;
    let mut sum = half;
    for k in 0..200u32 {
        term = term * neg_q / ((k + 1) as f64 * (k + 2) as f64);
        sum += term;
        if term.norm() < 1e-17 * sum.norm().max(f64::MIN_POSITIVE) {
            break;
        }
    }
    sum
}

/// J1 渐近展开（Numerical Recipes 多项式系数的复数延拓）
fn j1_asymptotic(z: Complex64) -> Complex64 {
    let w = 8.0 / z;
    let y = w * w;
    let omega = z - 3.0 * std::f64::consts::FRAC_PI_4;
    let p = 1.0
        + y * (0.183105e-2
            + y * (-0.3516396496e-4 + y * (0.2457520174e-5 + y * (-0.240337019e-6))));
    let q = 0.04687499995
        + y * (-0.2002690873e-3 + y * (0.8449199096e-5 + y * (-0.88228987e-6 + y * 0.105787412e-6)));
    let amp = (2.0 / (std::f64::consts::PI * z)).sqrt();
    amp * (omega.cos() * p - w * omega.sin() * q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_sinc_limit_and_value() {
        assert_eq!(sinc(c(0.0)), c(1.0));
        let v = sinc(c(std::f64::consts::PI));
        assert!(v.re.abs() < 1e-15);
        let v = sinc(c(1.0));
        assert!((v.re - 1.0f64.sin()).abs() < 1e-15);
    }

    #[test]
    fn test_fq_zero_limit() {
        assert_eq!(fq(c(0.0), 7.5), c(7.5));
        // 极限连续性：小 q 下与 h 的偏差为 O(q·h²)
        let v = fq(c(1e-9), 7.5);
        assert!((v - c(7.5)).norm() < 1e-6);
    }

    #[test]
    fn test_fq_known_value() {
        // fq(q, h) = 2 exp(i q h/2) sin(q h/2)/q
        let q = c(0.8);
        let h = 3.0;
        let expect = 2.0 * (Complex64::i() * 1.2).exp() * c(1.2f64.sin()) / 0.8;
        assert!((fq(q, h) - expect).norm() < 1e-14);
    }

    #[test]
    fn test_j1_series_real_values() {
        // 标准表值
        assert!((cbess_j1(c(1.0)).re - 0.440_050_585_744_933_5).abs() < 1e-12);
        assert!((cbess_j1(c(5.0)).re - (-0.327_579_137_591_465_2)).abs() < 1e-12);
        assert!(cbess_j1(c(1.0)).im.abs() < 1e-15);
    }

    #[test]
    fn test_j1_asymptotic_real_values() {
        assert!((cbess_j1(c(20.0)).re - 0.066_833_124_175_85).abs() < 1e-7);
        assert!((cbess_j1(c(16.0)).re - 0.090_397_175_661_304).abs() < 1e-7);
    }

    #[test]
    fn test_j1_over_x_small_argument() {
        // J1(u)/u → 1/2
        let u = c(1e-6);
        let ratio = cbess_j1(u) / u;
        assert!((ratio.re - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_j1_complex_argument_finite() {
        let v = cbess_j1(Complex64::new(3.0, 0.4));
        assert!(v.re.is_finite() && v.im.is_finite());
        let v = cbess_j1(Complex64::new(25.0, 0.1));
        assert!(v.re.is_finite() && v.im.is_finite());
    }
}
