//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `compute`: 在倒易网格上计算一个形状的解析形状因子
//! - `distance`: 用选定度量比较两个强度文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: compute, distance

pub mod compute;
pub mod distance;

use clap::{Parser, Subcommand};

/// gixform - 掠入射 X 射线散射解析形状因子引擎
#[derive(Parser)]
#[command(name = "gixform")]
#[command(version)]
#[command(about = "Analytic form factor engine for grazing-incidence X-ray scattering", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compute the analytic form factor of a shape over a reciprocal-space grid
    Compute(compute::ComputeArgs),

    /// Compare two intensity grids with a distance metric
    Distance(distance::DistanceArgs),
}
