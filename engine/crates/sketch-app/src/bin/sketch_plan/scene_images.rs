use ash::vk;
use sketch_render_graph::render_graph::{RenderGraphBuilder, RgImageHandle, RgImageState};
use sketch_render_interface::gfx_resource_manager::GfxResourceManager;
use sketch_render_interface::handles::GfxImageHandle;
use sketch_render_interface::hatch_textures::{HatchLevel, HatchTextureTable};
use sketch_render_interface::image::GfxImageDesc;
use sketch_render_interface::pipeline_settings::FrameSettings;
use sketch_renderer::screen_pass::{ScreenPassTexture, SketchDrawRegion};
use sketch_renderer::sketch_renderer::SketchFrameInputs;

/// 延迟渲染阶段产生的 GBuffer 和场景颜色
///
/// 在真实的渲染器中由前面的 Pass 写入，这里只创建占位图像。
pub struct SceneImages {
    color_desc: GfxImageDesc,
    depth_desc: GfxImageDesc,

    scene_color: GfxImageHandle,
    scene_depth: GfxImageHandle,
    base_color: GfxImageHandle,
    shadow_mask: GfxImageHandle,
    world_normal: GfxImageHandle,
}

impl SceneImages {
    pub fn new(frame_settings: &FrameSettings, gfx_resource_manager: &mut GfxResourceManager) -> Self {
        let extent = frame_settings.frame_extent;
        let color_desc = GfxImageDesc::new_2d(
            extent.width,
            extent.height,
            frame_settings.color_format,
            vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::COLOR_ATTACHMENT,
        );
        let depth_desc = GfxImageDesc::new_2d(
            extent.width,
            extent.height,
            frame_settings.depth_format,
            vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
        );

        Self {
            color_desc,
            depth_desc,
            scene_color: gfx_resource_manager.create_image("scene-color", color_desc),
            scene_depth: gfx_resource_manager.create_image("scene-depth", depth_desc),
            base_color: gfx_resource_manager.create_image("gbuffer-base-color", color_desc),
            shadow_mask: gfx_resource_manager.create_image("shadow-mask", color_desc),
            world_normal: gfx_resource_manager.create_image("gbuffer-world-normal", color_desc),
        }
    }

    /// 资源加载层准备好的 hatch 纹理
    pub fn create_hatch_textures(gfx_resource_manager: &mut GfxResourceManager) -> HatchTextureTable {
        let desc = GfxImageDesc::new_2d(512, 512, vk::Format::R8_UNORM, vk::ImageUsageFlags::SAMPLED);
        let handles = HatchLevel::iter()
            .map(|level| gfx_resource_manager.create_image(format!("hatch-{}", level.index()), desc))
            .collect::<Vec<_>>();
        HatchTextureTable::from_handles(handles)
    }

    /// 把场景图像导入渲染图，sketch data 由调用者从 view state 导入
    pub fn import(
        &self,
        builder: &mut RenderGraphBuilder<'_>,
        sketch_data: RgImageHandle,
        draw_region: SketchDrawRegion,
    ) -> SketchFrameInputs {
        let read = RgImageState::SHADER_READ_FRAGMENT;
        let scene_color = builder.import_image("SceneColor", self.scene_color, self.color_desc, read);

        SketchFrameInputs {
            scene_color: ScreenPassTexture::full(scene_color, &self.color_desc),
            scene_depth: builder.import_image("SceneDepth", self.scene_depth, self.depth_desc, read),
            base_color: builder.import_image("BaseColor", self.base_color, self.color_desc, read),
            shadow_mask: builder.import_image("ShadowMask", self.shadow_mask, self.color_desc, read),
            world_normal: builder.import_image("WorldNormal", self.world_normal, self.color_desc, read),
            sketch_data,
            draw_region,
            override_output: None,
        }
    }

    pub fn destroy(self, gfx_resource_manager: &mut GfxResourceManager) {
        for image in [self.scene_color, self.scene_depth, self.base_color, self.shadow_mask, self.world_normal] {
            gfx_resource_manager.destroy_image(image);
        }
    }
}
