//! Pass 定义和构建器
//!
//! 提供 `RgPass` trait 用于声明式定义渲染 Pass，
//! 以及 `RgPassBuilder` 用于在 setup 阶段声明资源依赖。

use crate::render_graph::image_resource::RgImageResource;
use crate::render_graph::resource_handle::RgImageHandle;
use crate::render_graph::resource_registry::RgResourceRegistry;
use crate::render_graph::resource_state::RgImageState;
use slotmap::SecondaryMap;
use sketch_render_interface::command::GfxCommandEncoder;
use sketch_render_interface::gfx_resource_manager::GfxResourceManager;
use sketch_render_interface::handles::GfxImageHandle;
use sketch_render_interface::image::GfxImageDesc;

/// Pass 执行时的上下文
///
/// 提供 Pass 执行所需的资源访问和命令录制接口。
pub struct RgPassContext<'a> {
    pub cmd: &'a dyn GfxCommandEncoder,

    /// 资源管理器引用（用于获取物理资源）
    pub resource_manager: &'a GfxResourceManager,

    /// 物理资源查询表（执行前填充）
    pub(crate) image_handles: &'a SecondaryMap<RgImageHandle, GfxImageHandle>,
    pub(crate) resources: &'a RgResourceRegistry,
}

impl RgPassContext<'_> {
    /// 获取图像的物理句柄
    #[inline]
    pub fn get_image_handle(&self, handle: RgImageHandle) -> Option<GfxImageHandle> {
        self.image_handles.get(handle).copied()
    }

    #[inline]
    pub fn get_image_desc(&self, handle: RgImageHandle) -> Option<&GfxImageDesc> {
        self.resources.get_image(handle).map(|image| &image.desc)
    }
}

/// Pass 构建器
///
/// 在 `RgPass::setup()` 中使用，声明 Pass 的资源依赖。
pub struct RgPassBuilder<'a> {
    #[allow(dead_code)]
    pub(crate) name: String,

    pub(crate) image_reads: Vec<(RgImageHandle, RgImageState)>,
    pub(crate) image_writes: Vec<(RgImageHandle, RgImageState)>,

    /// 资源注册表引用（用于创建临时资源）
    pub(crate) resources: &'a mut RgResourceRegistry,
}

impl RgPassBuilder<'_> {
    /// 声明读取图像
    ///
    /// # 参数
    /// - `handle`: 要读取的图像句柄
    /// - `state`: 期望的图像状态（用于自动生成 barrier）
    #[inline]
    pub fn read_image(&mut self, handle: RgImageHandle, state: RgImageState) -> RgImageHandle {
        self.image_reads.push((handle, state));
        handle
    }

    /// 声明写入图像
    pub fn write_image(&mut self, handle: RgImageHandle, state: RgImageState) -> RgImageHandle {
        self.image_writes.push((handle, state));
        handle
    }

    /// 声明读写图像（同时读取和写入）
    ///
    /// 用于累积：写入之前的内容对本 Pass 可见。
    pub fn read_write_image(&mut self, handle: RgImageHandle, state: RgImageState) -> RgImageHandle {
        self.read_image(handle, state);
        self.write_image(handle, state)
    }

    /// 创建临时图像
    ///
    /// 图像在执行时创建，执行完毕后自动销毁（除非被导出）。
    pub fn create_image(&mut self, name: impl Into<String>, desc: GfxImageDesc) -> RgImageHandle {
        self.resources.register_image(RgImageResource::transient(name, desc))
    }

    #[inline]
    pub fn image_desc(&self, handle: RgImageHandle) -> Option<&GfxImageDesc> {
        self.resources.get_image(handle).map(|image| &image.desc)
    }
}

/// Pass 节点数据（编译后使用）
pub struct RgPassNode<'a> {
    pub name: String,

    pub image_reads: Vec<(RgImageHandle, RgImageState)>,
    pub image_writes: Vec<(RgImageHandle, RgImageState)>,

    pub(crate) pass: Box<dyn RgPass + 'a>,
}

/// RgPass trait
///
/// 定义渲染图中的一个 Pass。
///
/// Pass 不需要是 Send + Sync，因为 RenderGraph 在单线程中构建和执行。
/// Pass 可以借用外部资源，生命周期由 RenderGraphBuilder 的生命周期参数约束。
pub trait RgPass {
    /// 声明 Pass 的资源依赖
    fn setup(&mut self, builder: &mut RgPassBuilder);

    /// 录制 Pass 的命令
    fn execute(&self, ctx: &RgPassContext<'_>);
}
