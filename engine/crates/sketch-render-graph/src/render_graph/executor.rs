//! RenderGraph 构建器和执行器
//!
//! 提供 `RenderGraphBuilder` 用于构建渲染图，
//! `CompiledGraph` 用于缓存编译结果并执行渲染。

use crate::render_graph::barrier::{PassBarriers, RgImageBarrierDesc};
use crate::render_graph::export_info::RgExportInfo;
use crate::render_graph::graph::{DependencyAnalyzer, DependencyGraph};
use crate::render_graph::image_resource::{RgImageResource, RgImageSource};
use crate::render_graph::pass::{RgPass, RgPassBuilder, RgPassContext, RgPassNode};
use crate::render_graph::resource_handle::RgImageHandle;
use crate::render_graph::resource_registry::RgResourceRegistry;
use crate::render_graph::resource_state::RgImageState;
use ash::vk;
use itertools::Itertools;
use sketch_render_interface::barrier::GfxImageBarrier;
use sketch_render_interface::command::GfxCommandEncoder;
use sketch_render_interface::gfx_resource_manager::GfxResourceManager;
use sketch_render_interface::handles::GfxImageHandle;
use sketch_render_interface::image::GfxImageDesc;
use slotmap::SecondaryMap;

/// RenderGraph 构建器
///
/// 用于声明式构建渲染图。
///
/// # 使用流程
///
/// 1. 创建 builder: `RenderGraphBuilder::new()`
/// 2. 导入外部资源: `builder.import_image(...)`
/// 3. 添加 Pass: `builder.add_pass("name", pass)`
/// 4. 编译: `builder.compile()`
/// 5. 执行: `compiled.execute(...)`
///
/// # 生命周期
///
/// `'a` 是 Pass 可以借用的外部资源的生命周期。
pub struct RenderGraphBuilder<'a> {
    resources: RgResourceRegistry,

    /// Pass 节点列表（按添加顺序）
    passes: Vec<RgPassNode<'a>>,
}

impl Default for RenderGraphBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// new & 资源声明
impl<'a> RenderGraphBuilder<'a> {
    pub fn new() -> Self {
        Self {
            resources: RgResourceRegistry::new(),
            passes: Vec::new(),
        }
    }

    /// 导入外部图像资源
    ///
    /// # 参数
    /// - `name`: 资源调试名称
    /// - `image_handle`: 物理图像句柄（来自 GfxResourceManager）
    /// - `desc`: 图像描述（尺寸、格式）
    /// - `initial_state`: 图像的初始状态
    pub fn import_image(
        &mut self,
        name: impl Into<String>,
        image_handle: GfxImageHandle,
        desc: GfxImageDesc,
        initial_state: RgImageState,
    ) -> RgImageHandle {
        self.resources.register_image(RgImageResource::imported(name, image_handle, desc, initial_state))
    }

    /// 声明一张由渲染图创建的临时图像
    pub fn create_image(&mut self, name: impl Into<String>, desc: GfxImageDesc) -> RgImageHandle {
        self.resources.register_image(RgImageResource::transient(name, desc))
    }

    /// 导出图像：执行结束后转换到 `final_state`，临时图像的所有权交给调用者
    ///
    /// 句柄无效时返回 false
    pub fn export_image(&mut self, handle: RgImageHandle, final_state: RgImageState) -> bool {
        match self.resources.get_image_mut(handle) {
            Some(image) => {
                image.export = Some(RgExportInfo::new(final_state));
                true
            }
            None => {
                log::warn!("RenderGraph: export of unknown image {:?}", handle);
                false
            }
        }
    }

    /// 添加 Pass
    ///
    /// # 参数
    /// - `name`: Pass 名称（用于调试 label）
    /// - `pass`: 实现了 `RgPass` trait 的 Pass 对象
    pub fn add_pass<P: RgPass + 'a>(&mut self, name: impl Into<String>, mut pass: P) -> &mut Self {
        let name = name.into();

        let mut builder = RgPassBuilder {
            name: name.clone(),
            image_reads: Vec::new(),
            image_writes: Vec::new(),
            resources: &mut self.resources,
        };

        pass.setup(&mut builder);

        let node = RgPassNode {
            name,
            image_reads: builder.image_reads,
            image_writes: builder.image_writes,
            pass: Box::new(pass),
        };

        self.passes.push(node);
        self
    }
}

// getters
impl RenderGraphBuilder<'_> {
    #[inline]
    pub fn image_desc(&self, handle: RgImageHandle) -> Option<&GfxImageDesc> {
        self.resources.get_image(handle).map(|image| &image.desc)
    }

    #[inline]
    pub fn image(&self, handle: RgImageHandle) -> Option<&RgImageResource> {
        self.resources.get_image(handle)
    }

    #[inline]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    #[inline]
    pub fn image_count(&self) -> usize {
        self.resources.image_count()
    }

    #[inline]
    pub fn transient_image_count(&self) -> usize {
        self.resources.transient_image_count()
    }
}

// compile
impl<'a> RenderGraphBuilder<'a> {
    /// 编译渲染图
    ///
    /// 执行依赖分析、拓扑排序、barrier 计算。
    ///
    /// # Panics
    /// 如果检测到循环依赖
    pub fn compile(self) -> CompiledGraph<'a> {
        let pass_count = self.passes.len();

        let image_reads = self.passes.iter().map(|p| p.image_reads.iter().map(|s| s.0).collect_vec()).collect_vec();
        let image_writes = self.passes.iter().map(|p| p.image_writes.iter().map(|s| s.0).collect_vec()).collect_vec();

        let dep_graph = DependencyAnalyzer::analyze(pass_count, &image_reads, &image_writes);

        let execution_order = dep_graph.topological_sort().unwrap_or_else(|cycle| {
            let cycle_names = cycle.iter().map(|&i| &self.passes[i].name).collect_vec();
            panic!("RenderGraph: Cycle detected involving passes: {:?}", cycle_names);
        });

        let (barriers, final_barriers) = self.compute_barriers(&execution_order);

        log::debug!(
            "RenderGraph compiled: {} passes, {} images, {} edges",
            pass_count,
            self.resources.image_count(),
            dep_graph.edges().len()
        );

        CompiledGraph {
            resources: self.resources,
            passes: self.passes,
            execution_order,
            barriers,
            final_barriers,
            dep_graph,
        }
    }

    /// 计算每个 Pass 需要的 barriers，以及导出图像在执行结束后的 barriers
    ///
    /// 模拟 pass 的执行顺序，跟踪资源的状态变化，生成必要的 barriers
    fn compute_barriers(&self, execution_order: &[usize]) -> (Vec<PassBarriers>, PassBarriers) {
        let mut barriers = vec![PassBarriers::new(); self.passes.len()];

        let mut image_states: SecondaryMap<RgImageHandle, RgImageState> = SecondaryMap::new();
        for (handle, res) in self.resources.iter_images() {
            image_states.insert(handle, res.initial_state);
        }

        let get_image_aspect = |handle: RgImageHandle| {
            self.resources.get_image(handle).map(|image| image.infer_aspect()).unwrap_or(vk::ImageAspectFlags::COLOR)
        };

        for &pass_idx in execution_order {
            let pass = &self.passes[pass_idx];
            let pass_barriers = &mut barriers[pass_idx];

            // 收集此 Pass 中每个图像的使用，保持声明顺序
            // (handle, is_write, required_state)
            let mut image_usage: Vec<(RgImageHandle, bool, RgImageState)> = Vec::new();
            for (handle, state) in &pass.image_reads {
                if !image_usage.iter().any(|(h, ..)| h == handle) {
                    image_usage.push((*handle, false, *state));
                }
            }
            // 写入会覆盖读取的目标状态
            for (handle, state) in &pass.image_writes {
                match image_usage.iter_mut().find(|(h, ..)| h == handle) {
                    Some(usage) => *usage = (*handle, true, *state),
                    None => image_usage.push((*handle, true, *state)),
                }
            }

            for (handle, is_write, required_state) in image_usage {
                if let Some(&crt_state) = image_states.get(handle) {
                    pass_barriers.add_image_barrier(
                        RgImageBarrierDesc::new(handle, crt_state, required_state)
                            .with_aspect(get_image_aspect(handle)),
                    );

                    if is_write || crt_state.layout != required_state.layout {
                        image_states.insert(handle, required_state);
                    }
                }
            }
        }

        let mut final_barriers = PassBarriers::new();
        for (handle, image) in self.resources.iter_images() {
            if let (Some(export), Some(&crt_state)) = (image.export, image_states.get(handle)) {
                final_barriers.add_image_barrier(
                    RgImageBarrierDesc::new(handle, crt_state, export.final_state).with_aspect(image.infer_aspect()),
                );
            }
        }

        (barriers, final_barriers)
    }
}

/// 执行结果：导出图像的物理句柄
///
/// 导出的临时图像由调用者负责销毁。
#[derive(Default)]
pub struct RgExports {
    images: SecondaryMap<RgImageHandle, GfxImageHandle>,
}

impl RgExports {
    #[inline]
    pub fn get_image(&self, handle: RgImageHandle) -> Option<GfxImageHandle> {
        self.images.get(handle).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RgImageHandle, GfxImageHandle)> + '_ {
        self.images.iter().map(|(rg, gfx)| (rg, *gfx))
    }
}

/// 编译后的渲染图
///
/// 包含执行顺序、预计算的 barriers，可以多次执行。
pub struct CompiledGraph<'a> {
    resources: RgResourceRegistry,
    passes: Vec<RgPassNode<'a>>,
    /// 执行顺序（拓扑排序后）
    execution_order: Vec<usize>,
    /// 每个 Pass 的 barriers（按 pass 索引）
    barriers: Vec<PassBarriers>,
    /// 导出图像转换到最终状态的 barriers
    final_barriers: PassBarriers,
    dep_graph: DependencyGraph,
}

// getters
impl<'a> CompiledGraph<'a> {
    #[inline]
    pub fn execution_order(&self) -> &[usize] {
        &self.execution_order
    }

    #[inline]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    #[inline]
    pub fn pass_name(&self, index: usize) -> &str {
        &self.passes[index].name
    }

    /// 按名称查找 Pass 索引（同名时返回第一个）
    pub fn find_pass(&self, name: &str) -> Option<usize> {
        self.passes.iter().position(|pass| pass.name == name)
    }

    /// 按执行顺序排列的 Pass 名称
    pub fn ordered_pass_names(&self) -> Vec<&str> {
        self.execution_order.iter().map(|&i| self.passes[i].name.as_str()).collect()
    }

    #[inline]
    pub fn pass_barriers(&self, index: usize) -> &PassBarriers {
        &self.barriers[index]
    }

    #[inline]
    pub fn final_barriers(&self) -> &PassBarriers {
        &self.final_barriers
    }

    #[inline]
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.dep_graph
    }

    #[inline]
    pub fn image(&self, handle: RgImageHandle) -> Option<&RgImageResource> {
        self.resources.get_image(handle)
    }
}

// execute
impl CompiledGraph<'_> {
    /// 执行渲染图
    ///
    /// 1. 创建临时图像
    /// 2. 按顺序录制每个 Pass（前面插入 barriers，外面包一层 debug label）
    /// 3. 将导出图像转换到最终状态
    /// 4. 销毁没有导出的临时图像
    pub fn execute(&self, cmd: &dyn GfxCommandEncoder, resource_manager: &mut GfxResourceManager) -> RgExports {
        let mut image_handles: SecondaryMap<RgImageHandle, GfxImageHandle> = SecondaryMap::new();
        for (rg_handle, image) in self.resources.iter_images() {
            let physical = match image.source {
                RgImageSource::Imported { image_handle } => image_handle,
                RgImageSource::Transient => resource_manager.create_image(image.name.clone(), image.desc),
            };
            image_handles.insert(rg_handle, physical);
        }

        {
            let resource_manager: &GfxResourceManager = resource_manager;

            for &pass_idx in &self.execution_order {
                let pass = &self.passes[pass_idx];

                self.record_barriers(cmd, &self.barriers[pass_idx], &image_handles);

                cmd.begin_label(&pass.name);
                let ctx = RgPassContext {
                    cmd,
                    resource_manager,
                    image_handles: &image_handles,
                    resources: &self.resources,
                };
                pass.pass.execute(&ctx);
                cmd.end_label();
            }

            self.record_barriers(cmd, &self.final_barriers, &image_handles);
        }

        let mut exports = RgExports::default();
        for (rg_handle, image) in self.resources.iter_images() {
            let Some(&physical) = image_handles.get(rg_handle) else {
                continue;
            };
            if image.is_exported() {
                exports.images.insert(rg_handle, physical);
            } else if image.is_transient() {
                resource_manager.destroy_image(physical);
            }
        }

        exports
    }

    fn record_barriers(
        &self,
        cmd: &dyn GfxCommandEncoder,
        pass_barriers: &PassBarriers,
        image_handles: &SecondaryMap<RgImageHandle, GfxImageHandle>,
    ) {
        if !pass_barriers.has_barriers() {
            return;
        }

        let image_barriers: Vec<GfxImageBarrier> = pass_barriers
            .image_barriers
            .iter()
            .filter_map(|desc| {
                let image = image_handles.get(desc.handle)?;
                Some(desc.to_gfx_barrier(*image))
            })
            .collect();

        if !image_barriers.is_empty() {
            cmd.image_memory_barrier(&image_barriers);
        }
    }
}

// 调试方法
impl CompiledGraph<'_> {
    /// 打印执行计划（用于调试）
    ///
    /// 输出每个 Pass 的执行顺序、image 读写信息以及 barrier 详细信息
    pub fn print_execution_plan(&self) {
        log::info!("╔══════════════════════════════════════════════════════════════════╗");
        log::info!("║              RenderGraph Execution Plan                          ║");
        log::info!("╠══════════════════════════════════════════════════════════════════╣");
        log::info!(
            "║ Total Passes: {}  |  Execution Order: [{}]",
            self.passes.len(),
            self.ordered_pass_names().join(" → ")
        );
        log::info!("╚══════════════════════════════════════════════════════════════════╝");

        for (order, &pass_idx) in self.execution_order.iter().enumerate() {
            let pass = &self.passes[pass_idx];
            let barriers = &self.barriers[pass_idx];

            log::info!("");
            log::info!("┌─────────────────────────────────────────────────────────────────┐");
            log::info!("│ [{}/{}] Pass: \"{}\"", order + 1, self.execution_order.len(), pass.name);
            log::info!("├─────────────────────────────────────────────────────────────────┤");

            if !pass.image_reads.is_empty() {
                log::info!("│ Image Reads:");
                for (handle, state) in &pass.image_reads {
                    log::info!(
                        "│   📖 \"{}\" @ {:?} (stage: {}, access: {})",
                        self.image_name(*handle),
                        state.layout,
                        Self::format_pipeline_stage(state.stage),
                        Self::format_access_flags(state.access)
                    );
                }
            }

            if !pass.image_writes.is_empty() {
                log::info!("│ Image Writes:");
                for (handle, state) in &pass.image_writes {
                    log::info!(
                        "│   ✏️  \"{}\" @ {:?} (stage: {}, access: {})",
                        self.image_name(*handle),
                        state.layout,
                        Self::format_pipeline_stage(state.stage),
                        Self::format_access_flags(state.access)
                    );
                }
            }

            if barriers.has_barriers() {
                log::info!("├─────────────────────────────────────────────────────────────────┤");
                log::info!("│ Barriers: {} image", barriers.image_barrier_count());
                self.print_barriers(barriers);
            } else {
                log::info!("│ No barriers required");
            }

            log::info!("└─────────────────────────────────────────────────────────────────┘");
        }

        if self.final_barriers.has_barriers() {
            log::info!("");
            log::info!("Exported images:");
            self.print_barriers(&self.final_barriers);
        }

        log::info!("");
        log::info!("═══════════════════════ End of Execution Plan ═══════════════════════");
    }

    fn image_name(&self, handle: RgImageHandle) -> &str {
        self.resources.get_image(handle).map(|r| r.name.as_str()).unwrap_or("<unknown>")
    }

    fn print_barriers(&self, barriers: &PassBarriers) {
        for barrier in &barriers.image_barriers {
            let layout_change = if barrier.src_state.layout != barrier.dst_state.layout {
                format!("{:?} → {:?}", barrier.src_state.layout, barrier.dst_state.layout)
            } else {
                format!("{:?} (no layout change)", barrier.src_state.layout)
            };
            log::info!("│   🔒 Image \"{}\":", self.image_name(barrier.handle));
            log::info!("│       Layout: {}", layout_change);
            log::info!(
                "│       Stage:  {} → {}",
                Self::format_pipeline_stage(barrier.src_state.stage),
                Self::format_pipeline_stage(barrier.dst_state.stage)
            );
            log::info!(
                "│       Access: {} → {}",
                Self::format_access_flags(barrier.src_state.access),
                Self::format_access_flags(barrier.dst_state.access)
            );
            log::info!("│       Aspect: {:?}", barrier.aspect);
        }
    }

    /// 格式化 PipelineStageFlags2 为可读字符串
    fn format_pipeline_stage(stage: vk::PipelineStageFlags2) -> String {
        const NAMES: &[(vk::PipelineStageFlags2, &str)] = &[
            (vk::PipelineStageFlags2::TOP_OF_PIPE, "TOP_OF_PIPE"),
            (vk::PipelineStageFlags2::BOTTOM_OF_PIPE, "BOTTOM_OF_PIPE"),
            (vk::PipelineStageFlags2::FRAGMENT_SHADER, "FRAGMENT_SHADER"),
            (vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT, "COLOR_ATTACHMENT_OUTPUT"),
            (vk::PipelineStageFlags2::COMPUTE_SHADER, "COMPUTE_SHADER"),
            (vk::PipelineStageFlags2::TRANSFER, "TRANSFER"),
            (vk::PipelineStageFlags2::ALL_COMMANDS, "ALL_COMMANDS"),
        ];

        let stages = NAMES.iter().filter(|(flag, _)| stage.contains(*flag)).map(|(_, name)| *name).collect_vec();
        if stages.is_empty() { format!("{:?}", stage) } else { stages.join(" | ") }
    }

    /// 格式化 AccessFlags2 为可读字符串
    fn format_access_flags(access: vk::AccessFlags2) -> String {
        const NAMES: &[(vk::AccessFlags2, &str)] = &[
            (vk::AccessFlags2::SHADER_SAMPLED_READ, "SAMPLED_READ"),
            (vk::AccessFlags2::SHADER_STORAGE_READ, "STORAGE_READ"),
            (vk::AccessFlags2::SHADER_STORAGE_WRITE, "STORAGE_WRITE"),
            (vk::AccessFlags2::COLOR_ATTACHMENT_READ, "COLOR_READ"),
            (vk::AccessFlags2::COLOR_ATTACHMENT_WRITE, "COLOR_WRITE"),
            (vk::AccessFlags2::TRANSFER_READ, "TRANSFER_READ"),
            (vk::AccessFlags2::TRANSFER_WRITE, "TRANSFER_WRITE"),
        ];

        if access == vk::AccessFlags2::NONE {
            return "NONE".to_string();
        }
        let names = NAMES.iter().filter(|(flag, _)| access.contains(*flag)).map(|(_, name)| *name).collect_vec();
        if names.is_empty() { format!("{:?}", access) } else { names.join(" | ") }
    }
}
