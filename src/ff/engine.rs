//! # 形状因子引擎
//!
//! 分发器与聚合器：按形状类别选择解析核，用选定后端驱动核
//! 遍历整个倒易网格，持有结果复数场并提供读取与导出入口。
//!
//! ## 并行模型
//! 外层 (x,y,z) 三重循环为数据并行：每个网格点只读共享输入、
//! 写入互不相交的场槽位，无需加锁。多分散性内层求和是单点内的
//! 串行归约，不在更细粒度上并行。后端只改变调度方式，
//! 不改变逐点公式，数值结果在浮点舍入内等价。
//!
//! ## 分片契约
//! `compute_slab` 沿 z 轴计算一个不相交的切片区间（多节点分区
//! 的单机形式）；`ComplexField::gather` 按 z 升序拼接各分片，
//! 必须逐位重建单趟结果。
//!
//! ## 依赖关系
//! - 被 `commands/compute.rs` 调用
//! - 使用 `ff/{box_kernel,cylinder,sphere}.rs` 形状核
//! - 使用 `rayon` 线程池

use crate::error::{GixformError, Result};
use crate::ff::{box_kernel, cylinder, sphere};
use crate::model::{ReciprocalGrid, ShapeDescriptor, ShapeKind};

use num_complex::Complex64;
use rayon::prelude::*;
use std::ops::Range;

/// 计算后端（运行时选择，逐点公式相同）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// 单线程顺序遍历
    Sequential,
    /// rayon 数据并行；jobs == 0 时自动取 CPU 核数
    Parallel { jobs: usize },
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Parallel { jobs: 0 }
    }
}

/// 稠密复数振幅场
///
/// 线性索引 `i = nx*ny*(z - z_offset) + nx*y + x`；z_offset 供
/// z 轴分片使用，完整场为 0。引擎独占所有权，仅在一次计算中
/// 写入，之后只读，下次计算整体替换。
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexField {
    data: Vec<Complex64>,
    nx: usize,
    ny: usize,
    nz: usize,
    z_offset: usize,
}

impl ComplexField {
    pub(crate) fn new(
        data: Vec<Complex64>,
        nx: usize,
        ny: usize,
        nz: usize,
        z_offset: usize,
    ) -> Self {
        debug_assert_eq!(data.len(), nx * ny * nz);
        Self {
            data,
            nx,
            ny,
            nz,
            z_offset,
        }
    }

    /// 线性索引处的复数振幅
    #[inline]
    pub fn value_at(&self, index: usize) -> Complex64 {
        self.data[index]
    }

    /// 线性索引处的强度 |v|²
    #[inline]
    pub fn intensity_at(&self, index: usize) -> f64 {
        self.data[index].norm_sqr()
    }

    /// 底层复数数据
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// 全场强度数组（与数据同序）
    pub fn intensities(&self) -> Vec<f64> {
        self.data.iter().map(|v| v.norm_sqr()).collect()
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    /// 本场覆盖的全局 z 切片区间
    pub fn z_range(&self) -> Range<usize> {
        self.z_offset..self.z_offset + self.nz
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 按 z 升序拼接不相交分片，重建完整场
    ///
    /// 分片必须横截面一致、区间首尾相接（无重叠无空洞），
    /// 否则返回 `InvalidArgument`。
    pub fn gather(parts: Vec<ComplexField>) -> Result<ComplexField> {
        let first = parts.first().ok_or_else(|| {
            GixformError::InvalidArgument("gather requires at least one field slab".into())
        })?;
        let (nx, ny, z_start) = (first.nx, first.ny, first.z_offset);
        let mut next_z = z_start;
        let mut data = Vec::new();
        for part in &parts {
            if part.nx != nx || part.ny != ny {
                return Err(GixformError::InvalidArgument(
                    "gather: slab cross-sections differ".into(),
                ));
            }
            if part.z_offset != next_z {
                return Err(GixformError::InvalidArgument(format!(
                    "gather: slab starts at z={}, expected z={}",
                    part.z_offset, next_z
                )));
            }
            next_z += part.nz;
            data.extend_from_slice(&part.data);
        }
        Ok(ComplexField::new(data, nx, ny, next_z - z_start, z_start))
    }
}

/// 形状因子引擎
pub struct FormFactorEngine {
    backend: Backend,
    field: Option<ComplexField>,
}

impl FormFactorEngine {
    /// 创建引擎并选定后端
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            field: None,
        }
    }

    /// 计算整张网格的形状因子，成功后整体替换持有的场
    ///
    /// 失败（MissingParameter / UnsupportedShape）时保留上一次的
    /// 成功结果，绝不暴露半成品场。
    pub fn compute(&mut self, desc: &ShapeDescriptor, grid: &ReciprocalGrid) -> Result<()> {
        let field = self.compute_slab(desc, grid, 0..grid.nz())?;
        self.field = Some(field);
        Ok(())
    }

    /// 只计算 z ∈ [z_range.start, z_range.end) 的切片，不改变持有的场
    pub fn compute_slab(
        &self,
        desc: &ShapeDescriptor,
        grid: &ReciprocalGrid,
        z_range: Range<usize>,
    ) -> Result<ComplexField> {
        let data = match desc.kind {
            ShapeKind::Box => box_kernel::compute(desc, grid, &self.backend, z_range.clone())?,
            ShapeKind::Cylinder => cylinder::compute(desc, grid, &self.backend, z_range.clone())?,
            ShapeKind::Sphere => sphere::compute(desc, grid, &self.backend, z_range.clone())?,
            ShapeKind::Custom => {
                return Err(GixformError::UnsupportedShape(desc.kind.to_string()))
            }
        };
        Ok(ComplexField::new(
            data,
            grid.nx(),
            grid.ny(),
            z_range.len(),
            z_range.start,
        ))
    }

    /// 上一次成功计算的场
    pub fn field(&self) -> Option<&ComplexField> {
        self.field.as_ref()
    }

    /// 线性索引处的复数振幅（未计算时为 None）
    pub fn value_at(&self, index: usize) -> Option<Complex64> {
        self.field.as_ref().map(|f| f.value_at(index))
    }

    /// 线性索引处的强度（未计算时为 None）
    pub fn intensity_at(&self, index: usize) -> Option<f64> {
        self.field.as_ref().map(|f| f.intensity_at(index))
    }
}

/// 后端驱动：对选定 z 区间内的每个网格点求值
///
/// 逐点闭包只读共享输入；并行后端按行切块，每个工作线程写入
/// 自己的切片。节点内求值顺序与顺序后端一致，结果逐位相同。
pub(crate) fn evaluate_grid<F>(
    grid: &ReciprocalGrid,
    backend: &Backend,
    z_range: Range<usize>,
    point: F,
) -> Vec<Complex64>
where
    F: Fn(usize, usize, usize) -> Complex64 + Sync + Send,
{
    let (nx, ny) = (grid.nx(), grid.ny());
    match *backend {
        Backend::Sequential => {
            let mut data = Vec::with_capacity(nx * ny * z_range.len());
            for z in z_range {
                for y in 0..ny {
                    for x in 0..nx {
                        data.push(point(x, y, z));
                    }
                }
            }
            data
        }
        Backend::Parallel { jobs } => {
            let num_threads = if jobs == 0 { num_cpus::get() } else { jobs };
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .unwrap();
            let z_start = z_range.start;
            let mut data = vec![Complex64::new(0.0, 0.0); nx * ny * z_range.len()];
            pool.install(|| {
                data.par_chunks_mut(nx).enumerate().for_each(|(row, out)| {
                    let z = z_start + row / ny;
                    let y = row % ny;
                    for (x, slot) in out.iter_mut().enumerate() {
                        *slot = point(x, y, z);
                    }
                });
            });
            data
        }
    }
}

/// 平移相位因子 exp(i·(mqx·tx + mqy·ty + mqz·tz))
#[inline]
pub(crate) fn translation_phase(
    mqx: Complex64,
    mqy: Complex64,
    mqz: Complex64,
    translation: &[f64; 3],
) -> Complex64 {
    let arg = mqx * translation[0] + mqy * translation[1] + mqz * translation[2];
    (Complex64::i() * arg).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParamRole, ShapeParamSpec};

    fn small_grid() -> ReciprocalGrid {
        ReciprocalGrid::from_ranges(4, (-0.5, 0.5), 3, (-0.4, 0.4), 6, (0.0, 0.8), 0.0)
    }

    fn sphere_desc(radius: f64) -> ShapeDescriptor {
        ShapeDescriptor::new(
            ShapeKind::Sphere,
            vec![ShapeParamSpec::fixed(ParamRole::Radius, radius)],
        )
    }

    #[test]
    fn test_custom_shape_is_unsupported() {
        let mut engine = FormFactorEngine::new(Backend::Sequential);
        let desc = ShapeDescriptor::new(ShapeKind::Custom, vec![]);
        let err = engine.compute(&desc, &small_grid()).unwrap_err();
        assert!(matches!(err, GixformError::UnsupportedShape(_)));
        assert!(engine.field().is_none());
    }

    #[test]
    fn test_failed_compute_keeps_previous_field() {
        let grid = small_grid();
        let mut engine = FormFactorEngine::new(Backend::Sequential);
        engine.compute(&sphere_desc(5.0), &grid).unwrap();
        let before = engine.field().unwrap().clone();
        // 缺少 radius -> MissingParameter，旧场保持不变
        let bad = ShapeDescriptor::new(ShapeKind::Sphere, vec![]);
        assert!(engine.compute(&bad, &grid).is_err());
        assert_eq!(engine.field().unwrap(), &before);
    }

    #[test]
    fn test_backend_equivalence() {
        let grid = small_grid();
        let desc = sphere_desc(4.0);
        let seq = FormFactorEngine::new(Backend::Sequential)
            .compute_slab(&desc, &grid, 0..grid.nz())
            .unwrap();
        let par = FormFactorEngine::new(Backend::Parallel { jobs: 3 })
            .compute_slab(&desc, &grid, 0..grid.nz())
            .unwrap();
        assert_eq!(seq.len(), par.len());
        for i in 0..seq.len() {
            let (a, b) = (seq.value_at(i), par.value_at(i));
            assert!(
                (a - b).norm() <= 1e-6 * a.norm().max(1e-12),
                "mismatch at {}: {} vs {}",
                i,
                a,
                b
            );
        }
    }

    #[test]
    fn test_partition_gather_reconstructs_single_pass() {
        let grid = small_grid();
        let desc = sphere_desc(3.0);
        let engine = FormFactorEngine::new(Backend::Sequential);
        let whole = engine.compute_slab(&desc, &grid, 0..grid.nz()).unwrap();
        let lo = engine.compute_slab(&desc, &grid, 0..2).unwrap();
        let hi = engine.compute_slab(&desc, &grid, 2..grid.nz()).unwrap();
        let gathered = ComplexField::gather(vec![lo, hi]).unwrap();
        assert_eq!(gathered.len(), whole.len());
        for i in 0..whole.len() {
            assert_eq!(gathered.value_at(i), whole.value_at(i));
        }
    }

    #[test]
    fn test_gather_rejects_gap() {
        let grid = small_grid();
        let desc = sphere_desc(3.0);
        let engine = FormFactorEngine::new(Backend::Sequential);
        let lo = engine.compute_slab(&desc, &grid, 0..2).unwrap();
        let hi = engine.compute_slab(&desc, &grid, 3..grid.nz()).unwrap();
        assert!(ComplexField::gather(vec![lo, hi]).is_err());
    }

    #[test]
    fn test_intensity_is_squared_modulus() {
        let grid = small_grid();
        let mut engine = FormFactorEngine::new(Backend::Sequential);
        engine.compute(&sphere_desc(2.0), &grid).unwrap();
        let v = engine.value_at(5).unwrap();
        let i = engine.intensity_at(5).unwrap();
        assert!((i - v.norm_sqr()).abs() < 1e-12);
    }
}
