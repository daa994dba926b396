//! # compute 子命令实现
//!
//! 解析 CLI 输入，构造网格与形状描述符，驱动引擎计算并导出。
//!
//! ## 功能
//! - 定值与分布参数（多分散性）
//! - 顺序 / rayon 并行后端
//! - 强度文本、复数场、切片统计 CSV 导出
//! - 可选强度切片热图 (PNG/SVG)
//!
//! ## 依赖关系
//! - 使用 `cli/compute.rs` 定义的 ComputeArgs 与解析函数
//! - 使用 `model/` 构造输入
//! - 使用 `ff/` 计算与导出

use crate::cli::compute::{
    parse_param_spec, parse_range, parse_translation, BackendArg, ComputeArgs,
};
use crate::error::{GixformError, Result};
use crate::ff::{export, plot, Backend, FormFactorEngine};
use crate::model::{ReciprocalGrid, ShapeDescriptor, ShapeKind};
use crate::utils::{output, progress};

use std::time::Instant;

/// 执行形状因子计算
pub fn execute(args: ComputeArgs) -> Result<()> {
    output::print_header("GISAXS Analytic Form Factor");

    // 解析参数规格
    let mut params = Vec::with_capacity(args.params.len());
    for spec in &args.params {
        params.push(parse_param_spec(spec).map_err(GixformError::InvalidArgument)?);
    }

    // 构造网格
    let qx_range = parse_range(&args.qx_range).map_err(GixformError::InvalidArgument)?;
    let qy_range = parse_range(&args.qy_range).map_err(GixformError::InvalidArgument)?;
    let qz_range = parse_range(&args.qz_range).map_err(GixformError::InvalidArgument)?;
    let grid = ReciprocalGrid::from_ranges(
        args.nx,
        qx_range,
        args.ny,
        qy_range,
        args.nz,
        qz_range,
        args.absorption,
    );
    output::print_info(&format!(
        "Grid: {} x {} x {} = {} points (absorption {})",
        grid.nx(),
        grid.ny(),
        grid.nz(),
        grid.len(),
        args.absorption
    ));

    // 构造描述符
    let kind: ShapeKind = args.shape.into();
    let mut desc = ShapeDescriptor::new(kind, params);
    desc.tau = args.tau.to_radians();
    desc.eta = args.eta.to_radians();
    desc.translation = parse_translation(&args.translation).map_err(GixformError::InvalidArgument)?;
    output::print_info(&format!(
        "Shape: {} (tau {:.2}°, eta {:.2}°)",
        kind, args.tau, args.eta
    ));

    // 选择后端
    let backend = match args.backend {
        BackendArg::Sequential => Backend::Sequential,
        BackendArg::Parallel => Backend::Parallel { jobs: args.jobs },
    };
    output::print_info(&format!("Backend: {:?}", backend));

    // 计算
    let spinner = progress::create_spinner("Computing form factor ...");
    let start = Instant::now();
    let mut engine = FormFactorEngine::new(backend);
    let result = engine.compute(&desc, &grid);
    spinner.finish_and_clear();
    result?;
    let field = engine
        .field()
        .ok_or_else(|| GixformError::Other("engine holds no field after compute".to_string()))?;
    output::print_success(&format!(
        "Computed {} points in {:.1} ms",
        field.len(),
        start.elapsed().as_secs_f64() * 1e3
    ));

    // 导出
    export::save_intensity(field, &args.output)?;
    output::print_success(&format!("Intensity grid -> {}", args.output.display()));

    if let Some(path) = &args.complex_output {
        export::save_complex(field, path)?;
        output::print_success(&format!("Complex field -> {}", path.display()));
    }

    if let Some(path) = &args.stats_csv {
        export::save_stats_csv(field, path)?;
        output::print_success(&format!("Slice statistics -> {}", path.display()));
    }

    if let Some(path) = &args.plot {
        let use_svg = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);
        let title = format!("{} |F|^2, slice z={}", kind, args.plot_slice);
        plot::plot_slice(
            field,
            args.plot_slice,
            path,
            &title,
            args.width,
            args.height,
            use_svg,
        )?;
        output::print_success(&format!("Heatmap -> {}", path.display()));
    }

    print_stats_table(field);
    output::print_done("Form factor computation finished");
    Ok(())
}

/// 打印切片统计表格
fn print_stats_table(field: &crate::ff::ComplexField) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct StatRow {
        #[tabled(rename = "z")]
        z: usize,
        #[tabled(rename = "I min")]
        min: String,
        #[tabled(rename = "I max")]
        max: String,
        #[tabled(rename = "I mean")]
        mean: String,
    }

    let rows: Vec<StatRow> = export::slice_stats(field)
        .into_iter()
        .take(8)
        .map(|s| StatRow {
            z: s.z,
            min: format!("{:.4e}", s.min),
            max: format!("{:.4e}", s.max),
            mean: format!("{:.4e}", s.mean),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("Intensity statistics (first {} slices)", rows.len()));
        let table = Table::new(&rows);
        println!("{}", table);
    }
}
