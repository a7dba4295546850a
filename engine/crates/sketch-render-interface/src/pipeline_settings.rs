use ash::vk;

/// 渲染器默认配置
pub struct DefaultRendererSettings;
impl DefaultRendererSettings {
    pub const DEFAULT_COLOR_FORMAT: vk::Format = vk::Format::R16G16B16A16_SFLOAT;
    pub const DEFAULT_DEPTH_FORMAT: vk::Format = vk::Format::D32_SFLOAT;
    /// 素描数据格式（跨帧累积）
    pub const SKETCH_DATA_FORMAT: vk::Format = vk::Format::R16G16B16A16_SFLOAT;
}

/// 帧级渲染配置
#[derive(Copy, Clone, Debug)]
pub struct FrameSettings {
    pub color_format: vk::Format,
    pub depth_format: vk::Format,
    pub frame_extent: vk::Extent2D,
}

impl FrameSettings {
    pub fn new(frame_extent: vk::Extent2D) -> Self {
        Self {
            color_format: DefaultRendererSettings::DEFAULT_COLOR_FORMAT,
            depth_format: DefaultRendererSettings::DEFAULT_DEPTH_FORMAT,
            frame_extent,
        }
    }
}
