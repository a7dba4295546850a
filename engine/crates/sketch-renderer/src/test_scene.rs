//! 测试用的场景：一帧需要的全部物理图像

use crate::screen_pass::{ScreenPassRenderTarget, ScreenPassTexture};
use crate::sketch_outline_pass::SketchOutlineInputs;
use crate::sketch_shading_pass::SketchShadingInputs;
use ash::vk;
use sketch_render_graph::render_graph::{RenderGraphBuilder, RgImageHandle, RgImageState};
use sketch_render_interface::gfx_resource_manager::GfxResourceManager;
use sketch_render_interface::handles::GfxImageHandle;
use sketch_render_interface::hatch_textures::{HatchLevel, HatchTextureTable};
use sketch_render_interface::image::GfxImageDesc;
use sketch_render_interface::pipeline_settings::DefaultRendererSettings;

pub struct TestScene {
    pub manager: GfxResourceManager,

    pub scene_color_desc: GfxImageDesc,
    pub depth_desc: GfxImageDesc,
    pub sketch_data_desc: GfxImageDesc,

    pub scene_color: GfxImageHandle,
    pub scene_depth: GfxImageHandle,
    pub base_color: GfxImageHandle,
    pub shadow_mask: GfxImageHandle,
    pub world_normal: GfxImageHandle,
    pub sketch_data: GfxImageHandle,
    pub override_output: GfxImageHandle,
    pub hatch_textures: HatchTextureTable,

    /// 场景创建完成时 manager 中创建过的图像数量
    pub initial_image_count: usize,
}

/// 场景图像导入渲染图之后的句柄
pub struct TestSceneHandles {
    pub scene_color: RgImageHandle,
    pub scene_depth: RgImageHandle,
    pub base_color: RgImageHandle,
    pub shadow_mask: RgImageHandle,
    pub world_normal: RgImageHandle,
    pub sketch_data: RgImageHandle,
    pub override_output: RgImageHandle,
    pub scene_color_view: vk::Rect2D,
}

impl TestScene {
    pub fn new(width: u32, height: u32) -> Self {
        let color_usage = vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::COLOR_ATTACHMENT;
        let scene_color_desc =
            GfxImageDesc::new_2d(width, height, DefaultRendererSettings::DEFAULT_COLOR_FORMAT, color_usage);
        let depth_desc = GfxImageDesc::new_2d(
            width,
            height,
            DefaultRendererSettings::DEFAULT_DEPTH_FORMAT,
            vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
        );
        let sketch_data_desc =
            GfxImageDesc::new_2d(width, height, DefaultRendererSettings::SKETCH_DATA_FORMAT, color_usage);

        let mut manager = GfxResourceManager::new();
        let scene_color = manager.create_image("SceneColor", scene_color_desc);
        let scene_depth = manager.create_image("SceneDepth", depth_desc);
        let base_color = manager.create_image("BaseColor", scene_color_desc);
        let shadow_mask = manager.create_image("ShadowMask", scene_color_desc);
        let world_normal = manager.create_image("WorldNormal", scene_color_desc);
        let sketch_data = manager.create_image("SketchData", sketch_data_desc);
        let override_output = manager.create_image("OverrideOutput", scene_color_desc);

        let hatch_desc = GfxImageDesc::new_2d(256, 256, vk::Format::R8_UNORM, vk::ImageUsageFlags::SAMPLED);
        let hatch_textures = HatchTextureTable::from_handles(
            HatchLevel::iter()
                .map(|level| manager.create_image(level.binding_name(), hatch_desc))
                .collect::<Vec<_>>(),
        );

        let initial_image_count = manager.created_image_count();
        Self {
            manager,
            scene_color_desc,
            depth_desc,
            sketch_data_desc,
            scene_color,
            scene_depth,
            base_color,
            shadow_mask,
            world_normal,
            sketch_data,
            override_output,
            hatch_textures,
            initial_image_count,
        }
    }

    pub fn import(&self, builder: &mut RenderGraphBuilder<'_>) -> TestSceneHandles {
        let read = RgImageState::SHADER_READ_FRAGMENT;
        TestSceneHandles {
            scene_color: builder.import_image("SceneColor", self.scene_color, self.scene_color_desc, read),
            scene_depth: builder.import_image("SceneDepth", self.scene_depth, self.depth_desc, read),
            base_color: builder.import_image("BaseColor", self.base_color, self.scene_color_desc, read),
            shadow_mask: builder.import_image("ShadowMask", self.shadow_mask, self.scene_color_desc, read),
            world_normal: builder.import_image("WorldNormal", self.world_normal, self.scene_color_desc, read),
            sketch_data: builder.import_image("SketchData", self.sketch_data, self.sketch_data_desc, read),
            override_output: builder.import_image(
                "OverrideOutput",
                self.override_output,
                self.scene_color_desc,
                RgImageState::UNDEFINED,
            ),
            scene_color_view: self.scene_color_desc.full_rect(),
        }
    }

    /// 导入一张尺寸为 0 的图像，只用于检查输入校验
    pub fn import_empty(&self, builder: &mut RenderGraphBuilder<'_>) -> RgImageHandle {
        let desc = GfxImageDesc::new_2d(0, 0, DefaultRendererSettings::DEFAULT_COLOR_FORMAT, vk::ImageUsageFlags::SAMPLED);
        builder.import_image("Empty", GfxImageHandle::default(), desc, RgImageState::UNDEFINED)
    }
}

impl TestSceneHandles {
    pub fn shading_inputs(&self) -> SketchShadingInputs {
        SketchShadingInputs {
            scene_color: self.scene_color,
            scene_depth: self.scene_depth,
            base_color: self.base_color,
            shadow_mask: self.shadow_mask,
            sketch_data: self.sketch_data,
        }
    }

    pub fn outline_inputs(&self, override_output: Option<ScreenPassRenderTarget>) -> SketchOutlineInputs {
        SketchOutlineInputs {
            override_output,
            scene_color: ScreenPassTexture::new(self.scene_color, self.scene_color_view),
            world_normal: self.world_normal,
            sketch_data: self.sketch_data,
            outline_color: glam::Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}
