use crate::error::SketchPassError;
use crate::screen_pass::{ScreenPassRenderTarget, ScreenPassTexture, SketchDrawRegion};
use crate::sketch_outline_pass::{SketchOutlineInputs, SketchOutlineOutput, SketchOutlineStrategy};
use crate::sketch_settings::SketchSettings;
use crate::sketch_shading_pass::{SketchShadingInputs, add_sketch_shading_pass};
use ash::vk;
use sketch_render_graph::render_graph::{RenderGraphBuilder, RgImageHandle};
use sketch_render_interface::capabilities::GfxCapabilities;
use sketch_render_interface::hatch_textures::HatchTextureProvider;
use std::sync::Arc;

/// 一帧素描后处理需要的全部输入
#[derive(Clone, Copy, Debug)]
pub struct SketchFrameInputs {
    pub scene_color: ScreenPassTexture,
    pub scene_depth: RgImageHandle,
    pub base_color: RgImageHandle,
    pub shadow_mask: RgImageHandle,
    pub world_normal: RgImageHandle,
    /// 来自 `SketchViewState::import`
    pub sketch_data: RgImageHandle,
    pub draw_region: SketchDrawRegion,
    pub override_output: Option<ScreenPassRenderTarget>,
}

impl SketchFrameInputs {
    fn shading_inputs(&self) -> SketchShadingInputs {
        SketchShadingInputs {
            scene_color: self.scene_color.texture,
            scene_depth: self.scene_depth,
            base_color: self.base_color,
            shadow_mask: self.shadow_mask,
            sketch_data: self.sketch_data,
        }
    }
}

/// 素描后处理的入口
///
/// 持有 hatch 纹理表和根据设备能力选定的描边策略；可以被多个 view 共享。
pub struct SketchRenderer {
    hatch_textures: Arc<dyn HatchTextureProvider + Send + Sync>,
    outline: SketchOutlineStrategy,
    settings: SketchSettings,
}

// new & init
impl SketchRenderer {
    pub fn new(
        capabilities: &GfxCapabilities,
        hatch_textures: Arc<dyn HatchTextureProvider + Send + Sync>,
        settings: SketchSettings,
    ) -> Self {
        let capabilities = match settings.shading_tier_override {
            Some(shading_tier) => {
                log::info!(
                    "sketch renderer: shading tier overridden {:?} -> {:?}",
                    capabilities.shading_tier(),
                    shading_tier
                );
                GfxCapabilities::new(shading_tier)
            }
            None => *capabilities,
        };

        Self {
            hatch_textures,
            outline: SketchOutlineStrategy::select(&capabilities),
            settings,
        }
    }
}

// getters
impl SketchRenderer {
    #[inline]
    pub fn settings(&self) -> &SketchSettings {
        &self.settings
    }

    #[inline]
    pub fn outline_strategy(&self) -> SketchOutlineStrategy {
        self.outline
    }
}

// passes
impl SketchRenderer {
    /// 添加素描着色 Pass，返回实际绘制的矩形
    pub fn add_shading_pass(
        &self,
        builder: &mut RenderGraphBuilder<'_>,
        inputs: &SketchShadingInputs,
        region: SketchDrawRegion,
    ) -> Result<vk::Rect2D, SketchPassError> {
        add_sketch_shading_pass(builder, self.hatch_textures.as_ref(), inputs, region)
    }

    /// 添加描边 Pass，描边颜色来自配置
    pub fn add_outline_pass(
        &self,
        builder: &mut RenderGraphBuilder<'_>,
        override_output: Option<ScreenPassRenderTarget>,
        scene_color: ScreenPassTexture,
        world_normal: RgImageHandle,
        sketch_data: RgImageHandle,
    ) -> Result<SketchOutlineOutput, SketchPassError> {
        self.outline.add_pass(
            builder,
            &SketchOutlineInputs {
                override_output,
                scene_color,
                world_normal,
                sketch_data,
                outline_color: self.settings.outline_color(),
            },
        )
    }

    /// 依次添加着色 Pass 和描边 Pass
    ///
    /// 关闭时不添加任何 Pass，原样返回调用者指定的输出。
    /// 着色 Pass 的输入无效时直接返回错误，不会尝试描边。
    pub fn add_passes(
        &self,
        builder: &mut RenderGraphBuilder<'_>,
        inputs: &SketchFrameInputs,
    ) -> Result<SketchOutlineOutput, SketchPassError> {
        if !self.settings.enabled {
            log::debug!("sketch renderer disabled");
            return Ok(SketchOutlineOutput::Skipped(inputs.override_output));
        }

        let draw_rect = self.add_shading_pass(builder, &inputs.shading_inputs(), inputs.draw_region)?;
        log::debug!("sketch renderer: shading rect {:?}", draw_rect);
        self.add_outline_pass(
            builder,
            inputs.override_output,
            inputs.scene_color,
            inputs.world_normal,
            inputs.sketch_data,
        )
    }
}
