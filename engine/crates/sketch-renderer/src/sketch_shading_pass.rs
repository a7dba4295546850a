//! 素描着色（hatch）Pass
//!
//! 根据场景光照与阴影选择 hatch 笔触，累积写入 sketch data。
//! sketch data 以 LOAD 方式作为颜色 attachment，之前帧的内容会被保留并参与混合。

use crate::error::SketchPassError;
use crate::screen_pass::{SketchDrawRegion, is_empty_rect, validate_input};
use crate::sketch_shader::{SketchShader, bindings};
use ash::vk;
use itertools::Itertools;
use sketch_render_graph::render_graph::{RenderGraphBuilder, RgImageHandle, RgImageState, RgPass, RgPassBuilder, RgPassContext};
use sketch_render_interface::command::{GfxColorAttachment, GfxFullscreenDraw, GfxTextureBinding};
use sketch_render_interface::hatch_textures::{HatchLevel, HatchTextureProvider};

pub const SKETCH_SHADING_PASS_NAME: &str = "SketchShadowPassPS";

/// 素描着色 Pass 的输入
#[derive(Clone, Copy, Debug)]
pub struct SketchShadingInputs {
    pub scene_color: RgImageHandle,
    pub scene_depth: RgImageHandle,
    pub base_color: RgImageHandle,
    pub shadow_mask: RgImageHandle,
    /// 跨帧保留的素描数据，由 view 持有
    pub sketch_data: RgImageHandle,
}

impl SketchShadingInputs {
    /// 只读输入，按绑定顺序
    fn sampled_inputs(&self) -> [(&'static str, RgImageHandle); 4] {
        [
            (bindings::SCENE_COLOR, self.scene_color),
            (bindings::SCENE_DEPTH, self.scene_depth),
            (bindings::BASE_COLOR, self.base_color),
            (bindings::SHADOW_MASK, self.shadow_mask),
        ]
    }
}

pub struct SketchShadingPass {
    inputs: SketchShadingInputs,
    /// 已解析的 hatch 纹理绑定，按密度升序
    hatch_textures: Vec<GfxTextureBinding>,
    draw_rect: vk::Rect2D,
}

impl RgPass for SketchShadingPass {
    fn setup(&mut self, builder: &mut RgPassBuilder) {
        for (_, input) in self.inputs.sampled_inputs() {
            builder.read_image(input, RgImageState::SHADER_READ_FRAGMENT);
        }
        // 采样之前的内容并在其上累积
        builder.read_write_image(self.inputs.sketch_data, RgImageState::COLOR_ATTACHMENT_FEEDBACK);
    }

    fn execute(&self, ctx: &RgPassContext<'_>) {
        let Some(sketch_data) = ctx.get_image_handle(self.inputs.sketch_data) else {
            log::error!("{}: sketch data has no physical image", SKETCH_SHADING_PASS_NAME);
            return;
        };

        let mut textures = Vec::with_capacity(5 + self.hatch_textures.len());
        for (name, input) in self.inputs.sampled_inputs() {
            let Some(image) = ctx.get_image_handle(input) else {
                log::error!("{}: input \"{}\" has no physical image", SKETCH_SHADING_PASS_NAME, name);
                return;
            };
            textures.push(GfxTextureBinding { name, image });
        }
        textures.push(GfxTextureBinding {
            name: bindings::SKETCH_DATA,
            image: sketch_data,
        });
        textures.extend_from_slice(&self.hatch_textures);

        ctx.cmd.draw_fullscreen(&GfxFullscreenDraw {
            program: SketchShader::Shadow.program(),
            viewport: self.draw_rect,
            color_attachment: GfxColorAttachment::load(sketch_data),
            textures,
            push_constants: Vec::new(),
        });
    }
}

/// 向渲染图添加素描着色 Pass
///
/// 返回实际绘制的矩形。矩形为空时不添加 Pass。
/// 任意输入图像无效时返回错误，且不向渲染图添加任何内容。
pub fn add_sketch_shading_pass(
    builder: &mut RenderGraphBuilder<'_>,
    hatch_textures: &dyn HatchTextureProvider,
    inputs: &SketchShadingInputs,
    region: SketchDrawRegion,
) -> Result<vk::Rect2D, SketchPassError> {
    let pass = SKETCH_SHADING_PASS_NAME;
    let scene_color_extent = validate_input(builder, pass, "scene_color", inputs.scene_color)?.extent;
    validate_input(builder, pass, "scene_depth", inputs.scene_depth)?;
    validate_input(builder, pass, "base_color", inputs.base_color)?;
    validate_input(builder, pass, "shadow_mask", inputs.shadow_mask)?;
    validate_input(builder, pass, "sketch_data", inputs.sketch_data)?;

    let draw_rect = region.resolve(scene_color_extent);
    if is_empty_rect(&draw_rect) {
        log::debug!("{}: empty draw region {:?}, skipped", pass, region);
        return Ok(draw_rect);
    }

    let hatch_textures = HatchLevel::iter()
        .filter_map(|level| {
            hatch_textures.hatch_texture(level).map(|image| GfxTextureBinding {
                name: level.binding_name(),
                image,
            })
        })
        .collect_vec();
    if hatch_textures.len() < HatchLevel::COUNT {
        log::warn!("{}: only {} of {} hatch textures available", pass, hatch_textures.len(), HatchLevel::COUNT);
    }

    builder.add_pass(
        pass,
        SketchShadingPass {
            inputs: *inputs,
            hatch_textures,
            draw_rect,
        },
    );
    Ok(draw_rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scene::TestScene;
    use sketch_render_interface::command_recorder::GfxCommandRecorder;
    use sketch_render_interface::hatch_textures::HatchTextureTable;

    fn rect(x: i32, y: i32, width: u32, height: u32) -> vk::Rect2D {
        vk::Rect2D {
            offset: vk::Offset2D { x, y },
            extent: vk::Extent2D { width, height },
        }
    }

    #[test]
    fn test_full_extent_when_region_unspecified() {
        let mut scene = TestScene::new(1920, 1080);
        let mut builder = RenderGraphBuilder::new();
        let handles = scene.import(&mut builder);

        let draw_rect = add_sketch_shading_pass(
            &mut builder,
            &scene.hatch_textures,
            &handles.shading_inputs(),
            SketchDrawRegion::default(),
        )
        .unwrap();
        assert_eq!(draw_rect, rect(0, 0, 1920, 1080));

        let recorder = GfxCommandRecorder::new();
        builder.compile().execute(&recorder, &mut scene.manager);

        let draws = recorder.fullscreen_draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].viewport, rect(0, 0, 1920, 1080));
        assert_eq!(draws[0].program, SketchShader::Shadow.program());
    }

    #[test]
    fn test_explicit_region_and_load_action() {
        let mut scene = TestScene::new(1920, 1080);
        let mut builder = RenderGraphBuilder::new();
        let handles = scene.import(&mut builder);

        let region = SketchDrawRegion::Explicit(rect(200, 100, 800, 600));
        let draw_rect =
            add_sketch_shading_pass(&mut builder, &scene.hatch_textures, &handles.shading_inputs(), region).unwrap();
        assert_eq!(draw_rect, rect(200, 100, 800, 600));

        let recorder = GfxCommandRecorder::new();
        builder.compile().execute(&recorder, &mut scene.manager);

        let draw = &recorder.fullscreen_draws()[0];
        assert_eq!(draw.viewport, rect(200, 100, 800, 600));
        assert_eq!(draw.color_attachment.image, scene.sketch_data);
        assert_eq!(draw.color_attachment.load_op, vk::AttachmentLoadOp::LOAD);
        assert_eq!(draw.texture(bindings::SKETCH_DATA), Some(scene.sketch_data));
        assert_eq!(draw.texture(bindings::SCENE_COLOR), Some(scene.scene_color));
        // 不创建任何新资源
        assert_eq!(scene.manager.created_image_count(), scene.initial_image_count);
    }

    #[test]
    fn test_hatch_textures_bound_by_index() {
        let mut scene = TestScene::new(640, 480);
        let mut builder = RenderGraphBuilder::new();
        let handles = scene.import(&mut builder);

        let draw_rect =
            add_sketch_shading_pass(&mut builder, &scene.hatch_textures, &handles.shading_inputs(), Default::default())
                .unwrap();
        assert_eq!(draw_rect, rect(0, 0, 640, 480));

        let recorder = GfxCommandRecorder::new();
        builder.compile().execute(&recorder, &mut scene.manager);

        let draw = &recorder.fullscreen_draws()[0];
        for level in HatchLevel::iter() {
            assert_eq!(draw.texture(level.binding_name()), scene.hatch_textures.hatch_texture(level));
        }
        let hatch_names = draw.textures.iter().filter(|t| t.name.starts_with("InputHatchTexture")).map(|t| t.name);
        assert!(hatch_names.eq(HatchLevel::iter().map(HatchLevel::binding_name)));
    }

    #[test]
    fn test_binding_names_in_order() {
        let mut scene = TestScene::new(640, 480);
        let mut builder = RenderGraphBuilder::new();
        let handles = scene.import(&mut builder);

        let draw_rect =
            add_sketch_shading_pass(&mut builder, &scene.hatch_textures, &handles.shading_inputs(), Default::default())
                .unwrap();
        assert!(!is_empty_rect(&draw_rect));

        let recorder = GfxCommandRecorder::new();
        builder.compile().execute(&recorder, &mut scene.manager);

        let draw = &recorder.fullscreen_draws()[0];
        let names = draw.textures.iter().map(|t| t.name).collect_vec();
        assert_eq!(
            names,
            vec![
                "InputSceneColorTexture",
                "InputSceneDepthTexture",
                "InputBaseColorTexture",
                "InputShadowMaskTexture",
                "InputSketchDataTexture",
                "InputHatchTexture0",
                "InputHatchTexture1",
                "InputHatchTexture2",
                "InputHatchTexture3",
                "InputHatchTexture4",
                "InputHatchTexture5",
            ]
        );
        assert_eq!(draw.texture("InputSceneDepthTexture"), Some(scene.scene_depth));
        assert_eq!(draw.texture("InputBaseColorTexture"), Some(scene.base_color));
        assert_eq!(draw.texture("InputShadowMaskTexture"), Some(scene.shadow_mask));
    }

    #[test]
    fn test_partial_hatch_table_binds_present_levels() {
        let mut scene = TestScene::new(640, 480);
        let mut builder = RenderGraphBuilder::new();
        let handles = scene.import(&mut builder);

        let mut partial = HatchTextureTable::new();
        partial.set(HatchLevel::Level0, scene.hatch_textures.hatch_texture(HatchLevel::Level0).unwrap());
        partial.set(HatchLevel::Level3, scene.hatch_textures.hatch_texture(HatchLevel::Level3).unwrap());

        let draw_rect =
            add_sketch_shading_pass(&mut builder, &partial, &handles.shading_inputs(), Default::default()).unwrap();
        assert_eq!(draw_rect, rect(0, 0, 640, 480));

        let recorder = GfxCommandRecorder::new();
        builder.compile().execute(&recorder, &mut scene.manager);

        let draw = &recorder.fullscreen_draws()[0];
        let hatch_names: Vec<_> =
            draw.textures.iter().filter(|t| t.name.starts_with("InputHatchTexture")).map(|t| t.name).collect();
        assert_eq!(hatch_names, vec!["InputHatchTexture0", "InputHatchTexture3"]);
    }

    #[test]
    fn test_invalid_input_adds_nothing() {
        let scene = TestScene::new(640, 480);
        let mut builder = RenderGraphBuilder::new();
        let handles = scene.import(&mut builder);

        let mut inputs = handles.shading_inputs();
        inputs.shadow_mask = RgImageHandle::default();

        let result = add_sketch_shading_pass(&mut builder, &scene.hatch_textures, &inputs, Default::default());
        assert_eq!(
            result,
            Err(SketchPassError::UnknownImage {
                pass: SKETCH_SHADING_PASS_NAME,
                input: "shadow_mask"
            })
        );
        assert_eq!(builder.pass_count(), 0);
    }

    #[test]
    fn test_empty_input_rejected() {
        let scene = TestScene::new(640, 480);
        let mut builder = RenderGraphBuilder::new();
        let handles = scene.import(&mut builder);

        let mut inputs = handles.shading_inputs();
        inputs.base_color = scene.import_empty(&mut builder);

        let result = add_sketch_shading_pass(&mut builder, &scene.hatch_textures, &inputs, Default::default());
        assert!(matches!(result, Err(SketchPassError::EmptyImage { input: "base_color", .. })));
        assert_eq!(builder.pass_count(), 0);
    }

    #[test]
    fn test_empty_explicit_region_records_nothing() {
        let scene = TestScene::new(640, 480);
        let mut builder = RenderGraphBuilder::new();
        let handles = scene.import(&mut builder);

        let region = SketchDrawRegion::Explicit(rect(10, 10, 0, 100));
        let draw_rect =
            add_sketch_shading_pass(&mut builder, &scene.hatch_textures, &handles.shading_inputs(), region).unwrap();
        assert!(is_empty_rect(&draw_rect));
        assert_eq!(builder.pass_count(), 0);
    }
}
