//! # 场数据导出
//!
//! 导出强度网格与原始复数场，并提供复数场的重新读入。
//!
//! ## 文本布局
//! - 强度：Nz 个块，每块 Ny 行，每行 Nx 个空格分隔的 |v|² 值，
//!   无表头、无空行；相同输入与后端下逐位可复现
//! - 复数场：同一遍历顺序下每点一对 "re im"，可与
//!   `load_complex` 往返
//! - 切片统计：CSV（z, min, max, mean）
//!
//! ## 依赖关系
//! - 被 `commands/compute.rs` 调用
//! - 使用 `ff/engine.rs` 的 ComplexField
//! - 使用 `csv` 库写入统计表

use crate::error::{GixformError, Result};
use crate::ff::engine::ComplexField;

use num_complex::Complex64;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 导出强度网格为固定文本布局
pub fn save_intensity(field: &ComplexField, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| GixformError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    let mut w = BufWriter::new(file);
    let write_err = |e: std::io::Error| GixformError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let (nx, ny, nz) = (field.nx(), field.ny(), field.nz());
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let index = nx * ny * z + nx * y + x;
                if x > 0 {
                    write!(w, " ").map_err(write_err)?;
                }
                write!(w, "{:.12e}", field.intensity_at(index)).map_err(write_err)?;
            }
            writeln!(w).map_err(write_err)?;
        }
    }
    w.flush().map_err(write_err)?;
    Ok(())
}

/// 导出原始复数场（每点一对 "re im"）
pub fn save_complex(field: &ComplexField, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| GixformError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    let mut w = BufWriter::new(file);
    let write_err = |e: std::io::Error| GixformError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let (nx, ny, nz) = (field.nx(), field.ny(), field.nz());
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let v = field.value_at(nx * ny * z + nx * y + x);
                if x > 0 {
                    write!(w, " ").map_err(write_err)?;
                }
                write!(w, "{:.17e} {:.17e}", v.re, v.im).map_err(write_err)?;
            }
            writeln!(w).map_err(write_err)?;
        }
    }
    w.flush().map_err(write_err)?;
    Ok(())
}

/// 读回 `save_complex` 导出的复数场
pub fn load_complex(path: &Path, nx: usize, ny: usize, nz: usize) -> Result<ComplexField> {
    let text = std::fs::read_to_string(path).map_err(|e| GixformError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut values = Vec::with_capacity(nx * ny * nz);
    let mut numbers = text.split_whitespace();
    while let Some(re) = numbers.next() {
        let im = numbers.next().ok_or_else(|| GixformError::ParseError {
            what: "complex field dump".to_string(),
            input: path.display().to_string(),
            reason: "odd number of values (re/im pairs expected)".to_string(),
        })?;
        let parse = |s: &str| {
            s.parse::<f64>().map_err(|e| GixformError::ParseError {
                what: "complex field dump".to_string(),
                input: s.to_string(),
                reason: e.to_string(),
            })
        };
        values.push(Complex64::new(parse(re)?, parse(im)?));
    }
    if values.len() != nx * ny * nz {
        return Err(GixformError::SizeMismatch {
            expected: nx * ny * nz,
            actual: values.len(),
        });
    }
    Ok(ComplexField::new(values, nx, ny, nz, 0))
}

/// 单个 z 切片的强度统计
#[derive(Debug, Clone, Serialize)]
pub struct SliceStat {
    pub z: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// 按 z 切片统计强度
pub fn slice_stats(field: &ComplexField) -> Vec<SliceStat> {
    let (nx, ny, nz) = (field.nx(), field.ny(), field.nz());
    let slice_len = nx * ny;
    (0..nz)
        .map(|z| {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            let mut sum = 0.0;
            for i in 0..slice_len {
                let v = field.intensity_at(slice_len * z + i);
                min = min.min(v);
                max = max.max(v);
                sum += v;
            }
            SliceStat {
                z,
                min,
                max,
                mean: sum / slice_len as f64,
            }
        })
        .collect()
}

/// 导出切片统计为 CSV
pub fn save_stats_csv(field: &ComplexField, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    for stat in slice_stats(field) {
        wtr.serialize(&stat)?;
    }
    wtr.flush().map_err(|e| GixformError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
