//! 不依赖设备地构建两帧素描后处理，打印执行计划和录制的命令
//!
//! 用法：`sketch_plan [settings.toml]`

use anyhow::Result;
use ash::vk;
use sketch_crate_tools::init_log::init_log;
use sketch_render_graph::render_graph::RenderGraphBuilder;
use sketch_render_interface::capabilities::GfxCapabilities;
use sketch_render_interface::command_recorder::{GfxCommandRecorder, GfxRecordedCommand};
use sketch_render_interface::gfx_resource_manager::GfxResourceManager;
use sketch_render_interface::pipeline_settings::FrameSettings;
use sketch_renderer::screen_pass::SketchDrawRegion;
use sketch_renderer::sketch_outline_pass::SketchOutlineOutput;
use sketch_renderer::sketch_renderer::SketchRenderer;
use sketch_renderer::sketch_settings::SketchSettings;
use sketch_renderer::sketch_view_state::SketchViewState;
use std::sync::Arc;

mod scene_images;

use scene_images::SceneImages;

/// 模拟一张桌面显卡
fn desktop_capabilities() -> GfxCapabilities {
    let features = vk::PhysicalDeviceFeatures {
        geometry_shader: vk::TRUE,
        tessellation_shader: vk::TRUE,
        shader_image_gather_extended: vk::TRUE,
        shader_int64: vk::TRUE,
        ..Default::default()
    };
    GfxCapabilities::from_device_features(vk::API_VERSION_1_3, &features)
}

fn main() -> Result<()> {
    init_log();

    let settings = match std::env::args().nth(1) {
        Some(path) => SketchSettings::load(path)?,
        None => SketchSettings::default(),
    };

    let frame_settings = FrameSettings::new(vk::Extent2D {
        width: 1920,
        height: 1080,
    });
    let mut gfx_resource_manager = GfxResourceManager::new();

    let scene_images = SceneImages::new(&frame_settings, &mut gfx_resource_manager);
    let hatch_textures = Arc::new(SceneImages::create_hatch_textures(&mut gfx_resource_manager));
    let renderer = SketchRenderer::new(&desktop_capabilities(), hatch_textures, settings);
    let mut view_state = SketchViewState::new(&frame_settings, &mut gfx_resource_manager);

    // 第二帧只更新左上角的区域
    let regions = [
        SketchDrawRegion::default(),
        SketchDrawRegion::from_position_and_size(vk::Offset2D { x: 0, y: 0 }, vk::Extent2D {
            width: 960,
            height: 540,
        }),
    ];

    let recorder = GfxCommandRecorder::new();
    for (frame_id, draw_region) in regions.into_iter().enumerate() {
        let mut builder = RenderGraphBuilder::new();
        let sketch_data = view_state.import(&mut builder)?;
        let inputs = scene_images.import(&mut builder, sketch_data, draw_region);
        let output = renderer.add_passes(&mut builder, &inputs)?;

        let compiled = builder.compile();
        if renderer.settings().print_execution_plan {
            compiled.print_execution_plan();
        }
        let exports = compiled.execute(&recorder, &mut gfx_resource_manager);

        let commands = recorder.take_commands();
        let draw_count = commands.iter().filter(|c| matches!(c, GfxRecordedCommand::DrawFullscreen(_))).count();
        let barrier_count = commands.iter().filter(|c| matches!(c, GfxRecordedCommand::ImageBarriers(_))).count();
        log::info!(
            "frame {}: {} commands, {} draws, {} barrier batches, output {:?}",
            frame_id,
            commands.len(),
            draw_count,
            barrier_count,
            output
        );
        for command in &commands {
            if let GfxRecordedCommand::DrawFullscreen(draw) = command {
                log::info!(
                    "  draw {} @ {:?}, load {:?}, {} textures",
                    draw.program.path,
                    draw.viewport,
                    draw.color_attachment.load_op,
                    draw.textures.len()
                );
            }
        }

        // 新建的输出在这一帧之后不再使用
        if let SketchOutlineOutput::Owned(target) = output {
            if let Some(image) = exports.get_image(target.texture) {
                gfx_resource_manager.destroy_image(image);
            }
        }
    }

    view_state.destroy(&mut gfx_resource_manager);
    scene_images.destroy(&mut gfx_resource_manager);
    log::info!(
        "done: {} images created, {} still alive (hatch textures)",
        gfx_resource_manager.created_image_count(),
        gfx_resource_manager.image_count()
    );

    Ok(())
}
