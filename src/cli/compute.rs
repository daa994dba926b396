//! # compute 子命令 CLI 定义
//!
//! 形状、参数规格、网格范围、倾斜/平移、后端与输出路径。
//! 参数规格字符串在这里解析（`role=value` 或
//! `role=kind(mean,spread,count)`），与命令逻辑解耦。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/compute.rs`
//! - 解析结果使用 `model/shape.rs` 的类型

use crate::model::{
    DistributionKind, DistributionSpec, ParamRole, ShapeKind, ShapeParamSpec,
};

use clap::{Args, ValueEnum};
use regex::Regex;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// 值枚举
// ─────────────────────────────────────────────────────────────

/// 形状类别（CLI 侧）
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ShapeArg {
    /// Rectangular box
    Box,
    /// Upright cylinder
    Cylinder,
    /// Sphere
    Sphere,
    /// Custom mesh shape (external numeric path, not supported here)
    Custom,
}

impl From<ShapeArg> for ShapeKind {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Box => ShapeKind::Box,
            ShapeArg::Cylinder => ShapeKind::Cylinder,
            ShapeArg::Sphere => ShapeKind::Sphere,
            ShapeArg::Custom => ShapeKind::Custom,
        }
    }
}

/// 计算后端（CLI 侧）
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum BackendArg {
    /// Single-threaded sequential evaluation
    Sequential,
    /// Data-parallel evaluation with rayon
    #[default]
    Parallel,
}

// ─────────────────────────────────────────────────────────────
// compute 参数
// ─────────────────────────────────────────────────────────────

/// compute 子命令参数
#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Shape kind
    #[arg(short, long, value_enum)]
    pub shape: ShapeArg,

    /// Shape parameter, repeatable: role=value or role=kind(mean,spread,count)
    /// (roles: edge, x-size, y-size, height, radius, base-angle;
    ///  kinds: uniform, gaussian; e.g. radius=gaussian(20,2,25))
    #[arg(short, long = "param")]
    pub params: Vec<String>,

    /// Number of qx samples
    #[arg(long, default_value_t = 64)]
    pub nx: usize,

    /// qx range as "min:max" (1/nm)
    #[arg(long, default_value = "-1.5:1.5", allow_hyphen_values = true)]
    pub qx_range: String,

    /// Number of qy samples
    #[arg(long, default_value_t = 64)]
    pub ny: usize,

    /// qy range as "min:max" (1/nm)
    #[arg(long, default_value = "-1.5:1.5", allow_hyphen_values = true)]
    pub qy_range: String,

    /// Number of qz samples
    #[arg(long, default_value_t = 32)]
    pub nz: usize,

    /// qz range as "min:max" (1/nm)
    #[arg(long, default_value = "0:2.0", allow_hyphen_values = true)]
    pub qz_range: String,

    /// Constant imaginary part of qz_extended (absorption)
    #[arg(long, default_value_t = 0.0)]
    pub absorption: f64,

    /// Tilt angle tau in degrees
    #[arg(long, default_value_t = 0.0)]
    pub tau: f64,

    /// Tilt azimuth eta in degrees
    #[arg(long, default_value_t = 0.0)]
    pub eta: f64,

    /// Translation vector as "tx,ty,tz" (nm)
    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true)]
    pub translation: String,

    /// Compute backend
    #[arg(long, value_enum, default_value = "parallel")]
    pub backend: BackendArg,

    /// Number of worker threads (0 = auto, parallel backend only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Output file for the intensity grid
    #[arg(short, long, default_value = "intensity.txt")]
    pub output: PathBuf,

    /// Optional output file for the raw complex field
    #[arg(long)]
    pub complex_output: Option<PathBuf>,

    /// Optional CSV output for per-slice intensity statistics
    #[arg(long)]
    pub stats_csv: Option<PathBuf>,

    /// Optional heatmap image of one z-slice (PNG, or SVG by extension)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// z-slice index for the heatmap
    #[arg(long, default_value_t = 0)]
    pub plot_slice: usize,

    /// Heatmap width in pixels
    #[arg(long, default_value_t = 900)]
    pub width: u32,

    /// Heatmap height in pixels
    #[arg(long, default_value_t = 700)]
    pub height: u32,
}

// ─────────────────────────────────────────────────────────────
// 规格字符串解析
// ─────────────────────────────────────────────────────────────

/// 解析参数角色名
pub fn parse_role(input: &str) -> Result<ParamRole, String> {
    match input {
        "edge" => Ok(ParamRole::Edge),
        "x-size" | "xsize" => Ok(ParamRole::XSize),
        "y-size" | "ysize" => Ok(ParamRole::YSize),
        "height" => Ok(ParamRole::Height),
        "radius" => Ok(ParamRole::Radius),
        "base-angle" | "baseangle" => Ok(ParamRole::BaseAngle),
        _ => Err(format!(
            "Unknown parameter role '{}'. Use: edge, x-size, y-size, height, radius, base-angle",
            input
        )),
    }
}

/// 解析单条参数规格：`role=value` 或 `role=kind(mean,spread,count)`
pub fn parse_param_spec(input: &str) -> Result<ShapeParamSpec, String> {
    let (role_str, value_str) = input
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter spec '{}': expected role=value", input))?;
    let role = parse_role(role_str.trim())?;
    let value_str = value_str.trim();

    // 定值
    if let Ok(v) = value_str.parse::<f64>() {
        return Ok(ShapeParamSpec::fixed(role, v));
    }

    // 分布：kind(mean,spread,count)
    let re = Regex::new(r"^(uniform|gaussian)\(\s*([^,\s]+)\s*,\s*([^,\s]+)\s*,\s*(\d+)\s*\)$")
        .map_err(|e| e.to_string())?;
    let caps = re.captures(value_str).ok_or_else(|| {
        format!(
            "Invalid parameter value '{}'. Use a number or kind(mean,spread,count)",
            value_str
        )
    })?;
    let kind = match &caps[1] {
        "uniform" => DistributionKind::Uniform,
        _ => DistributionKind::Gaussian,
    };
    let mean = caps[2]
        .parse::<f64>()
        .map_err(|_| format!("Invalid mean '{}'", &caps[2]))?;
    let spread = caps[3]
        .parse::<f64>()
        .map_err(|_| format!("Invalid spread '{}'", &caps[3]))?;
    let count = caps[4]
        .parse::<usize>()
        .map_err(|_| format!("Invalid count '{}'", &caps[4]))?;
    Ok(ShapeParamSpec::distributed(
        role,
        DistributionSpec {
            kind,
            mean,
            spread,
            count,
        },
    ))
}

/// 解析 "min:max" 轴范围
pub fn parse_range(input: &str) -> Result<(f64, f64), String> {
    let (min, max) = input
        .split_once(':')
        .ok_or_else(|| format!("Invalid range '{}': expected min:max", input))?;
    let min = min
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid range minimum '{}'", min))?;
    let max = max
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid range maximum '{}'", max))?;
    if min > max {
        return Err(format!("Invalid range '{}': min > max", input));
    }
    Ok((min, max))
}

/// 解析 "tx,ty,tz" 平移向量
pub fn parse_translation(input: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Invalid translation '{}': expected tx,ty,tz",
            input
        ));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid translation component '{}'", part))?;
    }
    Ok(out)
}
