//! # 工具模块
//!
//! 通用终端输出与进度显示工具。
//!
//! ## 子模块
//! - `output`: 彩色终端消息
//! - `progress`: 进度条封装
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `ff/` 模块使用

pub mod output;
pub mod progress;
