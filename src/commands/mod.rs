//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `model/`, `ff/`, `fit/`, `utils/`
//! - 子模块: compute, distance

pub mod compute;
pub mod distance;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compute(args) => compute::execute(args),
        Commands::Distance(args) => distance::execute(args),
    }
}
