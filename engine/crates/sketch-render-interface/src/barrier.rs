use crate::handles::GfxImageHandle;
use ash::vk;

/// 图像 memory barrier
///
/// 只记录同步信息和物理句柄，由命令录制端转换为 `vk::ImageMemoryBarrier2`。
/// layer 和 miplevel 都使用默认值（覆盖整张图像）。
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GfxImageBarrier {
    pub image: GfxImageHandle,
    pub old_layout: vk::ImageLayout,
    pub new_layout: vk::ImageLayout,
    pub src_stage: vk::PipelineStageFlags2,
    pub src_access: vk::AccessFlags2,
    pub dst_stage: vk::PipelineStageFlags2,
    pub dst_access: vk::AccessFlags2,
    pub aspect: vk::ImageAspectFlags,
}

impl Default for GfxImageBarrier {
    fn default() -> Self {
        Self {
            image: GfxImageHandle::default(),
            old_layout: vk::ImageLayout::UNDEFINED,
            new_layout: vk::ImageLayout::UNDEFINED,
            src_stage: vk::PipelineStageFlags2::NONE,
            src_access: vk::AccessFlags2::NONE,
            dst_stage: vk::PipelineStageFlags2::NONE,
            dst_access: vk::AccessFlags2::NONE,
            aspect: vk::ImageAspectFlags::empty(),
        }
    }
}

impl GfxImageBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// builder
    #[inline]
    pub fn image(mut self, image: GfxImageHandle) -> Self {
        self.image = image;
        self
    }

    /// builder
    #[inline]
    pub fn layout_transfer(mut self, old_layout: vk::ImageLayout, new_layout: vk::ImageLayout) -> Self {
        self.old_layout = old_layout;
        self.new_layout = new_layout;
        self
    }

    /// builder
    #[inline]
    pub fn src_mask(mut self, src_stage: vk::PipelineStageFlags2, src_access: vk::AccessFlags2) -> Self {
        self.src_stage = src_stage;
        self.src_access = src_access;
        self
    }

    /// builder
    #[inline]
    pub fn dst_mask(mut self, dst_stage: vk::PipelineStageFlags2, dst_access: vk::AccessFlags2) -> Self {
        self.dst_stage = dst_stage;
        self.dst_access = dst_access;
        self
    }

    /// builder
    #[inline]
    pub fn image_aspect_flag(mut self, aspect: vk::ImageAspectFlags) -> Self {
        self.aspect = aspect;
        self
    }
}
