use crate::error::SketchPassError;
use ash::vk;
use sketch_render_graph::render_graph::{RenderGraphBuilder, RgImageHandle, RgImageState};
use sketch_render_interface::gfx_resource_manager::GfxResourceManager;
use sketch_render_interface::handles::GfxImageHandle;
use sketch_render_interface::image::GfxImageDesc;
use sketch_render_interface::pipeline_settings::{DefaultRendererSettings, FrameSettings};

/// 每个 view 跨帧保留的素描状态
///
/// 持有 sketch data 图像。着色 Pass 每帧在其上累积，尺寸只在 `rebuild` 时改变。
pub struct SketchViewState {
    sketch_data: Option<GfxImageHandle>,
    desc: GfxImageDesc,
    /// 上一次导入的渲染图执行完之后图像所处的状态
    current_state: RgImageState,
}

// new & init
impl SketchViewState {
    pub fn new(frame_settings: &FrameSettings, gfx_resource_manager: &mut GfxResourceManager) -> Self {
        let desc = Self::sketch_data_desc(frame_settings.frame_extent);
        let sketch_data = gfx_resource_manager.create_image("sketch-data", desc);

        Self {
            sketch_data: Some(sketch_data),
            desc,
            current_state: RgImageState::UNDEFINED,
        }
    }

    /// 尺寸发生变化时重新创建 sketch data，之前累积的内容被丢弃
    pub fn rebuild(&mut self, frame_settings: &FrameSettings, gfx_resource_manager: &mut GfxResourceManager) {
        log::info!(
            "rebuild sketch data: {}x{} -> {}x{}",
            self.desc.extent.width,
            self.desc.extent.height,
            frame_settings.frame_extent.width,
            frame_settings.frame_extent.height
        );
        self.destroy_mut(gfx_resource_manager);
        *self = Self::new(frame_settings, gfx_resource_manager);
    }

    fn sketch_data_desc(extent: vk::Extent2D) -> GfxImageDesc {
        GfxImageDesc::new_2d(
            extent.width,
            extent.height,
            DefaultRendererSettings::SKETCH_DATA_FORMAT,
            vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
        )
        .with_clear_color(glam::Vec4::ZERO)
    }
}

// destroy
impl SketchViewState {
    pub fn destroy_mut(&mut self, gfx_resource_manager: &mut GfxResourceManager) {
        if let Some(sketch_data) = self.sketch_data.take() {
            gfx_resource_manager.destroy_image(sketch_data);
        }
        self.current_state = RgImageState::UNDEFINED;
    }

    pub fn destroy(mut self, gfx_resource_manager: &mut GfxResourceManager) {
        self.destroy_mut(gfx_resource_manager);
    }
}

// tools
impl SketchViewState {
    /// 把 sketch data 导入本帧的渲染图
    ///
    /// 图像在帧末转换到可采样状态，并假定这张渲染图会被执行。
    pub fn import(&mut self, builder: &mut RenderGraphBuilder<'_>) -> Result<RgImageHandle, SketchPassError> {
        let sketch_data = self.sketch_data.ok_or(SketchPassError::MissingSketchData)?;

        let handle = builder.import_image("SketchData", sketch_data, self.desc, self.current_state);
        builder.export_image(handle, RgImageState::SHADER_READ_FRAGMENT);
        self.current_state = RgImageState::SHADER_READ_FRAGMENT;

        Ok(handle)
    }
}

// getters
impl SketchViewState {
    #[inline]
    pub fn sketch_data(&self) -> Option<GfxImageHandle> {
        self.sketch_data
    }

    #[inline]
    pub fn desc(&self) -> &GfxImageDesc {
        &self.desc
    }

    #[inline]
    pub fn extent(&self) -> vk::Extent2D {
        self.desc.extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_settings(width: u32, height: u32) -> FrameSettings {
        FrameSettings::new(vk::Extent2D { width, height })
    }

    #[test]
    fn test_new_allocates_sketch_data() {
        let mut manager = GfxResourceManager::new();
        let view_state = SketchViewState::new(&frame_settings(1920, 1080), &mut manager);

        let image = manager.get_image(view_state.sketch_data().unwrap()).unwrap();
        assert_eq!(image.desc().extent, vk::Extent2D { width: 1920, height: 1080 });
        assert_eq!(image.desc().format, DefaultRendererSettings::SKETCH_DATA_FORMAT);
        assert_eq!(image.desc().clear_color, Some(glam::Vec4::ZERO));
    }

    #[test]
    fn test_import_tracks_state_across_frames() {
        let mut manager = GfxResourceManager::new();
        let mut view_state = SketchViewState::new(&frame_settings(64, 64), &mut manager);

        let mut builder = RenderGraphBuilder::new();
        let handle = view_state.import(&mut builder).unwrap();
        assert_eq!(builder.image(handle).unwrap().initial_state, RgImageState::UNDEFINED);
        assert!(builder.image(handle).unwrap().is_exported());

        let mut builder = RenderGraphBuilder::new();
        let handle = view_state.import(&mut builder).unwrap();
        assert_eq!(builder.image(handle).unwrap().initial_state, RgImageState::SHADER_READ_FRAGMENT);
    }

    #[test]
    fn test_rebuild_replaces_image() {
        let mut manager = GfxResourceManager::new();
        let mut view_state = SketchViewState::new(&frame_settings(64, 64), &mut manager);
        let old = view_state.sketch_data().unwrap();

        view_state.rebuild(&frame_settings(128, 32), &mut manager);
        assert!(!manager.contains_image(old));
        assert_eq!(view_state.extent(), vk::Extent2D { width: 128, height: 32 });
        assert_eq!(manager.image_count(), 1);
    }

    #[test]
    fn test_import_after_destroy() {
        let mut manager = GfxResourceManager::new();
        let mut view_state = SketchViewState::new(&frame_settings(64, 64), &mut manager);
        view_state.destroy_mut(&mut manager);
        assert_eq!(manager.image_count(), 0);

        let mut builder = RenderGraphBuilder::new();
        assert_eq!(view_state.import(&mut builder), Err(SketchPassError::MissingSketchData));
        assert_eq!(builder.image_count(), 0);
    }
}
