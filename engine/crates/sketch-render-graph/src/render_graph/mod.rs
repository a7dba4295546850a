//! RenderGraph - 声明式渲染图系统
//!
//! 提供自动依赖分析和 barrier 生成的渲染图抽象。
//!
//! # 核心概念
//!
//! - **RgImageHandle**: 虚拟资源句柄，在 graph 内部标识图像
//! - **RgImageState**: 资源状态描述，包含 stage、access、layout
//! - **RgPass**: 渲染 Pass trait，声明资源依赖和执行逻辑
//! - **RenderGraphBuilder**: 构建器，用于注册资源和 Pass
//! - **CompiledGraph**: 编译结果，包含执行顺序和预计算的 barriers
//!
//! # 使用示例
//!
//! ```ignore
//! use sketch_render_graph::render_graph::*;
//!
//! struct MyPass {
//!     input: RgImageHandle,
//!     output: RgImageHandle,
//! }
//!
//! impl RgPass for MyPass {
//!     fn setup(&mut self, builder: &mut RgPassBuilder) {
//!         builder.read_image(self.input, RgImageState::SHADER_READ_FRAGMENT);
//!         builder.write_image(self.output, RgImageState::COLOR_ATTACHMENT_WRITE);
//!     }
//!
//!     fn execute(&self, ctx: &RgPassContext<'_>) {
//!         let output = ctx.get_image_handle(self.output).unwrap();
//!         ctx.cmd.draw_fullscreen(&draw);
//!     }
//! }
//!
//! let mut builder = RenderGraphBuilder::new();
//! let input = builder.import_image("input", input_handle, input_desc, RgImageState::SHADER_READ_FRAGMENT);
//! let output = builder.create_image("output", output_desc);
//! builder.export_image(output, RgImageState::SHADER_READ_FRAGMENT);
//! builder.add_pass("my-pass", MyPass { input, output });
//!
//! let graph = builder.compile();
//! let exports = graph.execute(&cmd, &mut resource_manager);
//! let output_handle = exports.get_image(output);
//! ```
//!
//! # 模块结构
//!
//! - `resource_handle`: 虚拟资源句柄定义
//! - `resource_state`: 资源状态（stage/access/layout）封装
//! - `image_resource` / `resource_registry`: 资源注册表
//! - `pass`: Pass trait 和 builder
//! - `graph`: 依赖图和拓扑排序
//! - `barrier`: 自动 barrier 计算
//! - `executor`: 构建器和执行器

mod barrier;
mod executor;
mod export_info;
mod graph;
mod image_resource;
mod pass;
mod resource_handle;
mod resource_registry;
mod resource_state;

pub use barrier::{PassBarriers, RgImageBarrierDesc};
pub use executor::{CompiledGraph, RenderGraphBuilder, RgExports};
pub use export_info::RgExportInfo;
pub use graph::{DependencyAnalyzer, DependencyEdge, DependencyGraph};
pub use image_resource::{RgImageResource, RgImageSource};
pub use pass::{RgPass, RgPassBuilder, RgPassContext, RgPassNode};
pub use resource_handle::RgImageHandle;
pub use resource_registry::RgResourceRegistry;
pub use resource_state::RgImageState;
