//! # distance 子命令实现
//!
//! 读取参考/计算强度文件与可选掩膜，套用选定距离度量并打印结果。
//! 对应外层拟合回路对引擎输出的打分方式。
//!
//! ## 依赖关系
//! - 使用 `cli/distance.rs` 定义的 DistanceArgs
//! - 使用 `fit/distance.rs` 的度量策略
//! - 使用 `utils/output.rs`

use crate::cli::distance::{DistanceArgs, MetricArg};
use crate::error::{GixformError, Result};
use crate::fit::distance::{
    AbsoluteDifference, AbsoluteDifferenceSquare, AbsoluteDifferenceSquareNorm,
    RelativeAbsoluteDifferenceSquare, RelativeResidualVector, ResidualVector,
    ScaledRelativeAbsoluteDifferenceSquare, UnitLengthNormalizedDifferenceL1,
    UnitLengthNormalizedDifferenceSquare, UnitLengthNormalizedResidualVector,
};
use crate::fit::DistanceMeasure;
use crate::utils::output;

use std::path::Path;

/// 执行距离比较
pub fn execute(args: DistanceArgs) -> Result<()> {
    output::print_header("Intensity Distance");

    let reference = read_values(&args.reference)?;
    let data = read_values(&args.data)?;
    let mask = match &args.mask {
        Some(path) => read_values(path)?.into_iter().map(|v| v != 0.0).collect(),
        None => vec![true; reference.len()],
    };
    output::print_info(&format!(
        "{} reference values, {} masked out",
        reference.len(),
        mask.iter().filter(|&&m| !m).count()
    ));
    output::print_info(&format!("Metric: {}", args.metric));

    let measure = select_metric(args.metric);
    let dist = measure.distance(&reference, &data, &mask)?;

    if dist.len() == 1 {
        output::print_success(&format!("Distance: {:.6e}", dist[0]));
    } else {
        let norm: f64 = dist.iter().map(|v| v * v).sum::<f64>().sqrt();
        output::print_success(&format!(
            "Residual vector of {} entries, L2 norm {:.6e}",
            dist.len(),
            norm
        ));
    }
    Ok(())
}

/// 按 CLI 选择实例化度量策略
fn select_metric(metric: MetricArg) -> Box<dyn DistanceMeasure> {
    match metric {
        MetricArg::Abs => Box::new(AbsoluteDifference),
        MetricArg::AbsSquare => Box::new(AbsoluteDifferenceSquare),
        MetricArg::AbsSquareNorm => Box::new(AbsoluteDifferenceSquareNorm),
        MetricArg::RelativeSquare => Box::new(RelativeAbsoluteDifferenceSquare),
        MetricArg::Residual => Box::new(ResidualVector),
        MetricArg::RelativeResidual => Box::new(RelativeResidualVector),
        MetricArg::UnitL1 => Box::new(UnitLengthNormalizedDifferenceL1),
        MetricArg::UnitL2 => Box::new(UnitLengthNormalizedDifferenceSquare),
        MetricArg::UnitResidual => Box::new(UnitLengthNormalizedResidualVector),
        MetricArg::ScaledSquare => Box::new(ScaledRelativeAbsoluteDifferenceSquare),
    }
}

/// 读取空白分隔的浮点文件
fn read_values(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path).map_err(|e| GixformError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    text.split_whitespace()
        .map(|s| {
            s.parse::<f64>().map_err(|e| GixformError::ParseError {
                what: "intensity file".to_string(),
                input: s.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}
