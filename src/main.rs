//! # gixform - 掠入射 X 射线散射解析形状因子引擎
//!
//! 在三维倒易空间网格上计算纳米形状的远场散射振幅（形状因子），
//! 作为外层拟合/分析应用的计算内核。
//!
//! ## 子命令
//! - `compute` - 在倒易网格上计算一个形状的解析形状因子
//! - `distance` - 用选定度量比较两个强度网格
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── model/ (网格与形状描述符)
//!   │     ├── ff/    (形状核、引擎、导出)
//!   │     └── fit/   (距离度量)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod ff;
mod fit;
mod model;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
