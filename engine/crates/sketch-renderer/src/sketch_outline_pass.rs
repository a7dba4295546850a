//! 素描描边 Pass
//!
//! 根据世界法线的不连续和 sketch data 在场景颜色上绘制描边。
//! 输出可以由调用者指定（借用），否则创建一张和 Scene Color 同规格的新图像。

use crate::error::SketchPassError;
use crate::screen_pass::{ScreenPassRenderTarget, ScreenPassTexture, validate_input};
use crate::sketch_shader::{SketchShader, bindings};
use ash::vk;
use sketch_render_graph::render_graph::{RenderGraphBuilder, RgImageHandle, RgImageState, RgPass, RgPassBuilder, RgPassContext};
use sketch_render_interface::capabilities::{GfxCapabilities, ShadingTier};
use sketch_render_interface::command::{GfxColorAttachment, GfxFullscreenDraw, GfxTextureBinding};

pub const SKETCH_OUTLINE_PASS_NAME: &str = "SketchOutlinePassPS";

/// 描边需要的最低着色能力
pub const SKETCH_OUTLINE_MIN_TIER: ShadingTier = ShadingTier::Sm5;

#[derive(Clone, Copy, Debug)]
pub struct SketchOutlineInputs {
    /// 调用者指定的输出；为 None 时由 Pass 创建
    pub override_output: Option<ScreenPassRenderTarget>,
    pub scene_color: ScreenPassTexture,
    pub world_normal: RgImageHandle,
    pub sketch_data: RgImageHandle,
    pub outline_color: glam::Vec4,
}

/// 描边 Pass 的输出
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SketchOutlineOutput {
    /// 使用了调用者指定的输出
    Borrowed(ScreenPassRenderTarget),
    /// 新创建的输出，执行后从渲染图导出，所有权交给调用者
    Owned(ScreenPassRenderTarget),
    /// 设备不支持，没有录制任何内容；原样返回调用者指定的输出
    Skipped(Option<ScreenPassRenderTarget>),
}

impl SketchOutlineOutput {
    /// 可供后续 Pass 使用的渲染目标
    #[inline]
    pub fn target(&self) -> Option<ScreenPassRenderTarget> {
        match *self {
            Self::Borrowed(target) | Self::Owned(target) => Some(target),
            Self::Skipped(target) => target,
        }
    }

    #[inline]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// 与 `sketch_outline.slang` 中的 push constant 布局一致
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SketchOutlinePushConstant {
    pub outline_color: [f32; 4],
    /// Scene Color view 的宽高
    pub resolution: [f32; 2],
    pub _padding: [f32; 2],
}

impl SketchOutlinePushConstant {
    pub fn new(outline_color: glam::Vec4, view_rect: &vk::Rect2D) -> Self {
        Self {
            outline_color: outline_color.to_array(),
            resolution: [view_rect.extent.width as f32, view_rect.extent.height as f32],
            _padding: [0.0; 2],
        }
    }
}

pub struct SketchOutlinePass {
    scene_color: RgImageHandle,
    world_normal: RgImageHandle,
    sketch_data: RgImageHandle,
    output: ScreenPassRenderTarget,
    viewport: vk::Rect2D,
    push_constant: SketchOutlinePushConstant,
}

impl SketchOutlinePass {
    #[inline]
    fn writes_scene_color(&self) -> bool {
        self.output.texture == self.scene_color
    }
}

impl RgPass for SketchOutlinePass {
    fn setup(&mut self, builder: &mut RgPassBuilder) {
        builder.read_image(self.world_normal, RgImageState::SHADER_READ_FRAGMENT);
        builder.read_image(self.sketch_data, RgImageState::SHADER_READ_FRAGMENT);

        if self.writes_scene_color() {
            // 直接在 Scene Color 上描边：同一张图像既采样又作为 attachment
            builder.read_write_image(self.output.texture, RgImageState::COLOR_ATTACHMENT_FEEDBACK);
            return;
        }

        builder.read_image(self.scene_color, RgImageState::SHADER_READ_FRAGMENT);
        if self.output.load_op == vk::AttachmentLoadOp::CLEAR {
            builder.write_image(self.output.texture, RgImageState::COLOR_ATTACHMENT_WRITE);
        } else {
            builder.read_write_image(self.output.texture, RgImageState::COLOR_ATTACHMENT_READ_WRITE);
        }
    }

    fn execute(&self, ctx: &RgPassContext<'_>) {
        let resolve = |name: &str, handle: RgImageHandle| {
            let image = ctx.get_image_handle(handle);
            if image.is_none() {
                log::error!("{}: \"{}\" has no physical image", SKETCH_OUTLINE_PASS_NAME, name);
            }
            image
        };
        let (Some(output), Some(scene_color), Some(world_normal), Some(sketch_data)) = (
            resolve("output", self.output.texture),
            resolve("scene_color", self.scene_color),
            resolve("world_normal", self.world_normal),
            resolve("sketch_data", self.sketch_data),
        ) else {
            return;
        };

        let color_attachment = if self.output.load_op == vk::AttachmentLoadOp::CLEAR {
            let clear_color = ctx
                .get_image_desc(self.output.texture)
                .and_then(|desc| desc.clear_color)
                .unwrap_or(glam::Vec4::ZERO);
            GfxColorAttachment::clear(output, clear_color)
        } else {
            GfxColorAttachment::load(output)
        };

        ctx.cmd.draw_fullscreen(&GfxFullscreenDraw {
            program: SketchShader::Outline.program(),
            viewport: self.viewport,
            color_attachment,
            textures: vec![
                GfxTextureBinding {
                    name: bindings::SCENE_COLOR,
                    image: scene_color,
                },
                GfxTextureBinding {
                    name: bindings::WORLD_NORMAL,
                    image: world_normal,
                },
                GfxTextureBinding {
                    name: bindings::SKETCH_DATA,
                    image: sketch_data,
                },
            ],
            push_constants: bytemuck::bytes_of(&self.push_constant).to_vec(),
        });
    }
}

/// 描边 Pass 的执行策略，根据设备能力选择一次
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SketchOutlineStrategy {
    Available,
    Unavailable { shading_tier: ShadingTier },
}

impl SketchOutlineStrategy {
    pub fn select(capabilities: &GfxCapabilities) -> Self {
        if capabilities.supports(SKETCH_OUTLINE_MIN_TIER) {
            Self::Available
        } else {
            log::info!(
                "sketch outline disabled: shading tier {:?} is below {:?}",
                capabilities.shading_tier(),
                SKETCH_OUTLINE_MIN_TIER
            );
            Self::Unavailable {
                shading_tier: capabilities.shading_tier(),
            }
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// 向渲染图添加描边 Pass
    ///
    /// 不支持时不创建资源、不添加 Pass。
    /// Scene Color、世界法线或 sketch data 无效时返回错误，渲染图保持不变。
    pub fn add_pass(
        &self,
        builder: &mut RenderGraphBuilder<'_>,
        inputs: &SketchOutlineInputs,
    ) -> Result<SketchOutlineOutput, SketchPassError> {
        if let Self::Unavailable { shading_tier } = *self {
            log::debug!("{}: skipped on shading tier {:?}", SKETCH_OUTLINE_PASS_NAME, shading_tier);
            return Ok(SketchOutlineOutput::Skipped(inputs.override_output));
        }

        let pass = SKETCH_OUTLINE_PASS_NAME;
        let scene_color_desc = *validate_input(builder, pass, "scene_color", inputs.scene_color.texture)?;
        validate_input(builder, pass, "world_normal", inputs.world_normal)?;
        let viewport = validate_input(builder, pass, "sketch_data", inputs.sketch_data)?.full_rect();

        let override_output = inputs.override_output.filter(|target| {
            let valid = builder.image_desc(target.texture).is_some_and(|desc| !desc.is_empty());
            if !valid {
                log::warn!("{}: override output {:?} is invalid, creating a new one", pass, target.texture);
            }
            valid
        });

        let (output, target) = match override_output {
            Some(target) => (SketchOutlineOutput::Borrowed(target), target),
            None => {
                let desc = scene_color_desc
                    .with_usage(
                        scene_color_desc.usage | vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
                    )
                    .without_lossless_compression()
                    .with_clear_color(glam::Vec4::ZERO);
                let texture = builder.create_image("SketchOutlineOutput", desc);
                builder.export_image(texture, RgImageState::SHADER_READ_FRAGMENT);

                let target = ScreenPassRenderTarget {
                    texture,
                    view_rect: inputs.scene_color.view_rect,
                    load_op: vk::AttachmentLoadOp::CLEAR,
                };
                (SketchOutlineOutput::Owned(target), target)
            }
        };

        builder.add_pass(
            pass,
            SketchOutlinePass {
                scene_color: inputs.scene_color.texture,
                world_normal: inputs.world_normal,
                sketch_data: inputs.sketch_data,
                output: target,
                viewport,
                push_constant: SketchOutlinePushConstant::new(inputs.outline_color, &inputs.scene_color.view_rect),
            },
        );
        Ok(output)
    }
}
