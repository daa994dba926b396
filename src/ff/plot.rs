//! # 强度切片热图
//!
//! 使用 `plotters` 把一个 z 切片的强度渲染为热图。
//! 强度跨多个数量级，按 log10 归一后着色。
//!
//! ## 依赖关系
//! - 被 `commands/compute.rs` 调用
//! - 使用 `ff/engine.rs` 的 ComplexField
//! - 使用 `plotters` 渲染图表

use crate::error::{GixformError, Result};
use crate::ff::engine::ComplexField;

use plotters::prelude::*;
use std::path::Path;

/// 渲染一个 z 切片的强度热图
pub fn plot_slice(
    field: &ComplexField,
    z: usize,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if z >= field.nz() {
        return Err(GixformError::InvalidArgument(format!(
            "slice index {} out of range (nz = {})",
            z,
            field.nz()
        )));
    }
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_heatmap(&root, field, z, title)?;
        root.present()
            .map_err(|e| GixformError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_heatmap(&root, field, z, title)?;
        root.present()
            .map_err(|e| GixformError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制热图主体
fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    field: &ComplexField,
    z: usize,
    title: &str,
) -> Result<()> {
    let plot_err = |e: String| GixformError::PlotError(e);

    root.fill(&WHITE).map_err(|e| plot_err(e.to_string()))?;

    let (nx, ny) = (field.nx(), field.ny());
    let slice_len = nx * ny;

    // log10 归一范围；空强度切片画全零色
    let mut log_min = f64::INFINITY;
    let mut log_max = f64::NEG_INFINITY;
    let floor = 1e-30;
    for i in 0..slice_len {
        let v = field.intensity_at(slice_len * z + i).max(floor).log10();
        log_min = log_min.min(v);
        log_max = log_max.max(v);
    }
    let span = (log_max - log_min).max(1e-12);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0..nx as u32, 0..ny as u32)
        .map_err(|e| plot_err(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("qx index")
        .y_desc("qy index")
        .draw()
        .map_err(|e| plot_err(e.to_string()))?;

    chart
        .draw_series((0..ny).flat_map(|y| (0..nx).map(move |x| (x, y))).map(|(x, y)| {
            let v = field
                .intensity_at(slice_len * z + nx * y + x)
                .max(floor)
                .log10();
            let t = (v - log_min) / span;
            Rectangle::new(
                [(x as u32, y as u32), (x as u32 + 1, y as u32 + 1)],
                heat_color(t).filled(),
            )
        }))
        .map_err(|e| plot_err(e.to_string()))?;

    Ok(())
}

/// 蓝到红的四段渐变；t ∈ [0, 1]
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let (r, g, b) = if t < 0.25 {
        (0.0, t / 0.25, 1.0)
    } else if t < 0.5 {
        (0.0, 1.0, 1.0 - (t - 0.25) / 0.25)
    } else if t < 0.75 {
        ((t - 0.5) / 0.25, 1.0, 0.0)
    } else {
        (1.0, 1.0 - (t - 0.75) / 0.25, 0.0)
    };
    RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0), RGBColor(0, 0, 255));
        assert_eq!(heat_color(1.0), RGBColor(255, 0, 0));
        // 中点落在绿色通道饱和区
        let mid = heat_color(0.5);
        assert_eq!(mid.1, 255);
    }
}
