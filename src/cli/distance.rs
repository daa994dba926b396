//! # distance 子命令 CLI 定义
//!
//! 比较两个强度文件的距离度量选择与输入路径。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/distance.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 距离度量选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum MetricArg {
    /// Sum of absolute differences
    Abs,
    /// Sum of squared differences
    AbsSquare,
    /// Squared differences normalized by the reference
    AbsSquareNorm,
    /// Squared relative differences
    RelativeSquare,
    /// Per-pixel residual vector
    Residual,
    /// Per-pixel relative residual vector
    RelativeResidual,
    /// Unit-length normalized L1 difference
    UnitL1,
    /// Unit-length normalized squared difference (default)
    #[default]
    UnitL2,
    /// Unit-length normalized residual vector
    UnitResidual,
    /// Min-max scaled squared difference
    ScaledSquare,
}

impl std::fmt::Display for MetricArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MetricArg::Abs => "abs",
            MetricArg::AbsSquare => "abs-square",
            MetricArg::AbsSquareNorm => "abs-square-norm",
            MetricArg::RelativeSquare => "relative-square",
            MetricArg::Residual => "residual",
            MetricArg::RelativeResidual => "relative-residual",
            MetricArg::UnitL1 => "unit-l1",
            MetricArg::UnitL2 => "unit-l2",
            MetricArg::UnitResidual => "unit-residual",
            MetricArg::ScaledSquare => "scaled-square",
        };
        write!(f, "{}", name)
    }
}

/// distance 子命令参数
#[derive(Args, Debug)]
pub struct DistanceArgs {
    /// Reference intensity file (whitespace-separated values)
    pub reference: PathBuf,

    /// Computed intensity file (same layout as the reference)
    pub data: PathBuf,

    /// Optional pixel mask file (0 = excluded, nonzero = included)
    #[arg(short, long)]
    pub mask: Option<PathBuf>,

    /// Distance metric
    #[arg(long, value_enum, default_value = "unit-l2")]
    pub metric: MetricArg,
}
