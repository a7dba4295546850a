//! Sketch 工具集
//!
//! 提供日志初始化、带索引的常量枚举表等通用工具。

pub mod init_log;
pub mod named_array;
