//! Barrier 自动计算
//!
//! 根据资源状态转换自动生成 ImageMemoryBarrier。

use crate::render_graph::resource_handle::RgImageHandle;
use crate::render_graph::resource_state::RgImageState;
use ash::vk;
use sketch_render_interface::barrier::GfxImageBarrier;
use sketch_render_interface::handles::GfxImageHandle;

/// 图像 Barrier 描述
#[derive(Clone, Debug)]
pub struct RgImageBarrierDesc {
    pub handle: RgImageHandle,
    pub src_state: RgImageState,
    pub dst_state: RgImageState,
    /// 图像 aspect（COLOR / DEPTH / STENCIL）
    pub aspect: vk::ImageAspectFlags,
}

impl RgImageBarrierDesc {
    pub fn new(handle: RgImageHandle, src_state: RgImageState, dst_state: RgImageState) -> Self {
        Self {
            handle,
            src_state,
            dst_state,
            aspect: vk::ImageAspectFlags::COLOR,
        }
    }

    pub fn with_aspect(mut self, aspect: vk::ImageAspectFlags) -> Self {
        self.aspect = aspect;
        self
    }

    /// 检查是否需要 barrier
    ///
    /// layout 相同且前后都是只读时不需要 barrier
    pub fn needs_barrier(&self) -> bool {
        if self.src_state.layout != self.dst_state.layout {
            return true;
        }

        // 有写操作需要 barrier（确保可见性）
        self.src_state.is_write() || self.dst_state.is_write()
    }

    /// 转换为 GfxImageBarrier
    pub fn to_gfx_barrier(&self, image: GfxImageHandle) -> GfxImageBarrier {
        GfxImageBarrier::new()
            .image(image)
            .layout_transfer(self.src_state.layout, self.dst_state.layout)
            .src_mask(self.src_state.stage, self.src_state.src_access())
            .dst_mask(self.dst_state.stage, self.dst_state.access)
            .image_aspect_flag(self.aspect)
    }
}

/// Pass 执行前需要的 Barrier 集合
#[derive(Clone, Debug, Default)]
pub struct PassBarriers {
    pub image_barriers: Vec<RgImageBarrierDesc>,
}

impl PassBarriers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加图像 barrier，不需要的 barrier 会被忽略
    pub fn add_image_barrier(&mut self, barrier: RgImageBarrierDesc) {
        if barrier.needs_barrier() {
            self.image_barriers.push(barrier);
        }
    }

    pub fn has_barriers(&self) -> bool {
        !self.image_barriers.is_empty()
    }

    pub fn image_barrier_count(&self) -> usize {
        self.image_barriers.len()
    }

    pub fn find(&self, handle: RgImageHandle) -> Option<&RgImageBarrierDesc> {
        self.image_barriers.iter().find(|barrier| barrier.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_barrier_layout_change() {
        let barrier =
            RgImageBarrierDesc::new(RgImageHandle::default(), RgImageState::UNDEFINED, RgImageState::COLOR_ATTACHMENT_WRITE);

        assert!(barrier.needs_barrier());
    }

    #[test]
    fn test_image_barrier_read_to_read() {
        // 同 layout 的只读到只读可以跳过
        let barrier = RgImageBarrierDesc::new(
            RgImageHandle::default(),
            RgImageState::SHADER_READ_FRAGMENT,
            RgImageState::SHADER_READ_FRAGMENT,
        );

        assert!(!barrier.needs_barrier());

        let mut barriers = PassBarriers::new();
        barriers.add_image_barrier(barrier);
        assert!(!barriers.has_barriers());
    }

    #[test]
    fn test_image_barrier_feedback_to_read() {
        let barrier = RgImageBarrierDesc::new(
            RgImageHandle::default(),
            RgImageState::COLOR_ATTACHMENT_FEEDBACK,
            RgImageState::SHADER_READ_FRAGMENT,
        );
        assert!(barrier.needs_barrier());

        let gfx_barrier = barrier.to_gfx_barrier(GfxImageHandle::default());
        assert_eq!(gfx_barrier.old_layout, vk::ImageLayout::GENERAL);
        assert_eq!(gfx_barrier.new_layout, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
        assert_eq!(gfx_barrier.src_access, vk::AccessFlags2::COLOR_ATTACHMENT_WRITE);
        assert_eq!(gfx_barrier.dst_access, vk::AccessFlags2::SHADER_SAMPLED_READ);
    }
}
