//! 渲染器与 GPU 之间的边界
//!
//! - 物理资源句柄与资源管理器
//! - 命令录制接口（以及用于 headless 运行和测试的录制实现）
//! - 设备能力等级
//! - 素描用的 hatch 纹理表

pub mod barrier;
pub mod capabilities;
pub mod command;
pub mod command_recorder;
pub mod gfx_resource_manager;
pub mod handles;
pub mod hatch_textures;
pub mod image;
pub mod pipeline_settings;
