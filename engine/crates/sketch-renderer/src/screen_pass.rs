//! 屏幕空间 Pass 的输入输出描述与区域计算

use crate::error::SketchPassError;
use ash::vk;
use sketch_render_graph::render_graph::{RenderGraphBuilder, RgImageHandle};
use sketch_render_interface::image::GfxImageDesc;

/// 作为输入的屏幕纹理：图像加上当前 view 使用的区域
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenPassTexture {
    pub texture: RgImageHandle,
    pub view_rect: vk::Rect2D,
}

impl ScreenPassTexture {
    pub fn new(texture: RgImageHandle, view_rect: vk::Rect2D) -> Self {
        Self { texture, view_rect }
    }

    /// view 覆盖整张图像
    pub fn full(texture: RgImageHandle, desc: &GfxImageDesc) -> Self {
        Self {
            texture,
            view_rect: desc.full_rect(),
        }
    }
}

/// 作为输出的屏幕渲染目标
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenPassRenderTarget {
    pub texture: RgImageHandle,
    pub view_rect: vk::Rect2D,
    /// 第一次写入时的 load 行为
    pub load_op: vk::AttachmentLoadOp,
}

/// 素描着色 Pass 的绘制区域
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SketchDrawRegion {
    /// 从 `origin` 开始，覆盖 Scene Color 的完整尺寸
    ///
    /// 超出 Scene Color 的部分会被裁掉：`origin` 为 (960, 0)、Scene Color 为 1920x1080 时，
    /// 实际绘制 (960, 0) 起的 960x1080，而不是完整的 1920x1080。
    FullExtent { origin: vk::Offset2D },
    /// 指定的矩形；宽或高为 0 时不绘制
    Explicit(vk::Rect2D),
}

impl Default for SketchDrawRegion {
    fn default() -> Self {
        Self::FullExtent {
            origin: vk::Offset2D { x: 0, y: 0 },
        }
    }
}

impl SketchDrawRegion {
    /// 由目标位置和尺寸构造；尺寸为 (0, 0) 表示使用完整尺寸
    pub fn from_position_and_size(dest_position: vk::Offset2D, size: vk::Extent2D) -> Self {
        if size.width == 0 && size.height == 0 {
            Self::FullExtent { origin: dest_position }
        } else {
            Self::Explicit(vk::Rect2D {
                offset: dest_position,
                extent: size,
            })
        }
    }

    /// 计算实际绘制的矩形，结果被裁剪到 Scene Color 的范围内
    pub fn resolve(&self, scene_color_extent: vk::Extent2D) -> vk::Rect2D {
        let rect = match *self {
            Self::FullExtent { origin } => vk::Rect2D {
                offset: origin,
                extent: scene_color_extent,
            },
            Self::Explicit(rect) => rect,
        };
        clip_rect(rect, scene_color_extent)
    }
}

/// 把矩形裁剪到 `[0, bounds)` 范围内，没有交集时返回空矩形
pub fn clip_rect(rect: vk::Rect2D, bounds: vk::Extent2D) -> vk::Rect2D {
    let clip_axis = |offset: i32, size: u32, bound: u32| {
        let min = i64::from(offset).clamp(0, i64::from(bound));
        let max = (i64::from(offset) + i64::from(size)).clamp(0, i64::from(bound));
        (min as i32, (max - min).max(0) as u32)
    };

    let (x, width) = clip_axis(rect.offset.x, rect.extent.width, bounds.width);
    let (y, height) = clip_axis(rect.offset.y, rect.extent.height, bounds.height);

    let clipped = vk::Rect2D {
        offset: vk::Offset2D { x, y },
        extent: vk::Extent2D { width, height },
    };
    if clipped != rect {
        log::debug!("draw rect {:?} clipped to {:?}", rect, clipped);
    }
    clipped
}

#[inline]
pub fn is_empty_rect(rect: &vk::Rect2D) -> bool {
    rect.extent.width == 0 || rect.extent.height == 0
}

/// 检查图像已在渲染图中注册且尺寸不为空，返回它的描述
pub(crate) fn validate_input<'b>(
    builder: &'b RenderGraphBuilder<'_>,
    pass: &'static str,
    input: &'static str,
    handle: RgImageHandle,
) -> Result<&'b GfxImageDesc, SketchPassError> {
    let desc = builder.image_desc(handle).ok_or(SketchPassError::UnknownImage { pass, input })?;
    if desc.is_empty() {
        return Err(SketchPassError::EmptyImage { pass, input });
    }
    Ok(desc)
}
