//! # 倒易空间网格
//!
//! 三条轴采样数组：qx（长度 Nx，实数）、qy（长度 Ny，实数）、
//! qz_extended（长度 Nz，复数——虚部编码掠入射下的吸收/衰逝效应）。
//! 构造后不可变，所有形状核并行只读访问。
//!
//! ## 索引约定
//! 线性索引 `i = Nx*Ny*z + Nx*y + x`（x 变化最快）。
//! 访问函数不做越界检查，边界由核内循环保证。
//!
//! ## 依赖关系
//! - 被 `ff/` 所有核与引擎使用
//! - 被 `commands/compute.rs` 构造

use num_complex::Complex64;

/// 倒易空间网格（构造后只读）
#[derive(Debug, Clone)]
pub struct ReciprocalGrid {
    qx: Vec<f64>,
    qy: Vec<f64>,
    qz_extended: Vec<Complex64>,
}

impl ReciprocalGrid {
    /// 从显式轴数组构造（测试与合成网格）
    pub fn from_axes(qx: Vec<f64>, qy: Vec<f64>, qz_extended: Vec<Complex64>) -> Self {
        Self {
            qx,
            qy,
            qz_extended,
        }
    }

    /// 从各轴线性范围构造；`absorption` 为 qz_extended 的常数虚部
    pub fn from_ranges(
        nx: usize,
        qx_range: (f64, f64),
        ny: usize,
        qy_range: (f64, f64),
        nz: usize,
        qz_range: (f64, f64),
        absorption: f64,
    ) -> Self {
        Self {
            qx: linspace(qx_range.0, qx_range.1, nx),
            qy: linspace(qy_range.0, qy_range.1, ny),
            qz_extended: linspace(qz_range.0, qz_range.1, nz)
                .into_iter()
                .map(|re| Complex64::new(re, absorption))
                .collect(),
        }
    }

    /// 第 i 个 qx 采样值
    #[inline]
    pub fn qx(&self, i: usize) -> f64 {
        self.qx[i]
    }

    /// 第 j 个 qy 采样值
    #[inline]
    pub fn qy(&self, j: usize) -> f64 {
        self.qy[j]
    }

    /// 第 k 个扩展 qz 采样值（复数）
    #[inline]
    pub fn qz_extended(&self, k: usize) -> Complex64 {
        self.qz_extended[k]
    }

    /// x 方向采样数
    pub fn nx(&self) -> usize {
        self.qx.len()
    }

    /// y 方向采样数
    pub fn ny(&self) -> usize {
        self.qy.len()
    }

    /// z 方向采样数
    pub fn nz(&self) -> usize {
        self.qz_extended.len()
    }

    /// 网格总点数
    pub fn len(&self) -> usize {
        self.nx() * self.ny() * self.nz()
    }

    /// 网格是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 网格坐标到线性索引（x 变化最快）
    #[inline]
    pub fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        self.nx() * self.ny() * z + self.nx() * y + x
    }
}

/// 含两端点的等间距采样；n == 1 时取区间起点
fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![min];
    }
    let step = (max - min) / (n - 1) as f64;
    (0..n).map(|i| min + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_index_layout() {
        let grid = ReciprocalGrid::from_ranges(4, (0.0, 3.0), 3, (0.0, 2.0), 2, (0.0, 1.0), 0.0);
        assert_eq!(grid.len(), 24);
        // x 变化最快
        assert_eq!(grid.linear_index(0, 0, 0), 0);
        assert_eq!(grid.linear_index(1, 0, 0), 1);
        assert_eq!(grid.linear_index(0, 1, 0), 4);
        assert_eq!(grid.linear_index(0, 0, 1), 12);
        assert_eq!(grid.linear_index(3, 2, 1), 23);
    }

    #[test]
    fn test_from_ranges_axes() {
        let grid = ReciprocalGrid::from_ranges(3, (-1.0, 1.0), 2, (0.0, 1.0), 2, (0.0, 0.5), 0.01);
        assert!((grid.qx(0) + 1.0).abs() < 1e-12);
        assert!(grid.qx(1).abs() < 1e-12);
        assert!((grid.qx(2) - 1.0).abs() < 1e-12);
        assert!((grid.qz_extended(1).re - 0.5).abs() < 1e-12);
        assert!((grid.qz_extended(0).im - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_axis() {
        let grid = ReciprocalGrid::from_ranges(1, (0.2, 0.9), 1, (0.0, 0.0), 1, (0.0, 0.0), 0.0);
        assert_eq!(grid.nx(), 1);
        assert!((grid.qx(0) - 0.2).abs() < 1e-12);
    }
}
