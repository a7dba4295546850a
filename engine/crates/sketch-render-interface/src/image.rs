use ash::vk;

/// 图像描述
///
/// 导入的图像和渲染图创建的临时图像都使用它来描述尺寸、格式和初始化方式。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GfxImageDesc {
    pub extent: vk::Extent2D,
    pub format: vk::Format,
    pub usage: vk::ImageUsageFlags,
    pub samples: vk::SampleCountFlags,
    pub mip_levels: u32,
    /// 图像压缩策略（`VK_EXT_image_compression_control`）
    pub compression: vk::ImageCompressionFlagsEXT,
    /// 第一次作为 attachment 使用时的清除颜色
    pub clear_color: Option<glam::Vec4>,
}

impl Default for GfxImageDesc {
    fn default() -> Self {
        Self {
            extent: vk::Extent2D { width: 1, height: 1 },
            format: vk::Format::R8G8B8A8_UNORM,
            usage: vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::COLOR_ATTACHMENT,
            samples: vk::SampleCountFlags::TYPE_1,
            mip_levels: 1,
            compression: vk::ImageCompressionFlagsEXT::DEFAULT,
            clear_color: None,
        }
    }
}

// new & builder
impl GfxImageDesc {
    #[inline]
    pub fn new_2d(width: u32, height: u32, format: vk::Format, usage: vk::ImageUsageFlags) -> Self {
        Self {
            extent: vk::Extent2D { width, height },
            format,
            usage,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_usage(mut self, usage: vk::ImageUsageFlags) -> Self {
        self.usage = usage;
        self
    }

    /// 关闭无损压缩
    ///
    /// 多个 view 共享同一张图像的不同区域时，压缩元数据无法按区域单独维护。
    #[inline]
    pub fn without_lossless_compression(mut self) -> Self {
        self.compression = vk::ImageCompressionFlagsEXT::DISABLED;
        self
    }

    #[inline]
    pub fn with_clear_color(mut self, clear_color: glam::Vec4) -> Self {
        self.clear_color = Some(clear_color);
        self
    }
}

// getters
impl GfxImageDesc {
    /// 宽或高为 0 的图像视为空图像
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent.width == 0 || self.extent.height == 0
    }

    /// 整张图像的矩形
    #[inline]
    pub fn full_rect(&self) -> vk::Rect2D {
        vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent: self.extent,
        }
    }

    #[inline]
    pub fn is_compression_disabled(&self) -> bool {
        self.compression.contains(vk::ImageCompressionFlagsEXT::DISABLED)
    }

    /// 从格式推断 aspect
    pub fn infer_aspect(format: vk::Format) -> vk::ImageAspectFlags {
        match format {
            vk::Format::D16_UNORM | vk::Format::D32_SFLOAT | vk::Format::X8_D24_UNORM_PACK32 => {
                vk::ImageAspectFlags::DEPTH
            }
            vk::Format::S8_UINT => vk::ImageAspectFlags::STENCIL,
            vk::Format::D16_UNORM_S8_UINT | vk::Format::D24_UNORM_S8_UINT | vk::Format::D32_SFLOAT_S8_UINT => {
                vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
            }
            _ => vk::ImageAspectFlags::COLOR,
        }
    }
}
