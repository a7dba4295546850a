//! 命令录制接口
//!
//! 渲染图与 Pass 只通过 `GfxCommandEncoder` 录制命令，不直接接触设备。

use crate::barrier::GfxImageBarrier;
use crate::handles::GfxImageHandle;
use ash::vk;
use std::ffi::CStr;

/// 像素着色器程序
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GfxPixelProgram {
    pub path: &'static str,
    pub entry_point: &'static CStr,
}

/// 颜色 attachment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GfxColorAttachment {
    pub image: GfxImageHandle,
    pub load_op: vk::AttachmentLoadOp,
    /// 仅在 `load_op == CLEAR` 时有效
    pub clear_color: glam::Vec4,
}

impl GfxColorAttachment {
    /// 保留 attachment 原有内容
    #[inline]
    pub fn load(image: GfxImageHandle) -> Self {
        Self {
            image,
            load_op: vk::AttachmentLoadOp::LOAD,
            clear_color: glam::Vec4::ZERO,
        }
    }

    /// 绘制前使用 `clear_color` 清除
    #[inline]
    pub fn clear(image: GfxImageHandle, clear_color: glam::Vec4) -> Self {
        Self {
            image,
            load_op: vk::AttachmentLoadOp::CLEAR,
            clear_color,
        }
    }
}

/// 着色器中按名称绑定的纹理
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GfxTextureBinding {
    pub name: &'static str,
    pub image: GfxImageHandle,
}

/// 覆盖整个 viewport 的单次绘制
#[derive(Clone, Debug, PartialEq)]
pub struct GfxFullscreenDraw {
    pub program: GfxPixelProgram,
    pub viewport: vk::Rect2D,
    pub color_attachment: GfxColorAttachment,
    pub textures: Vec<GfxTextureBinding>,
    pub push_constants: Vec<u8>,
}

impl GfxFullscreenDraw {
    /// 按名称查找绑定的纹理
    pub fn texture(&self, name: &str) -> Option<GfxImageHandle> {
        self.textures.iter().find(|binding| binding.name == name).map(|binding| binding.image)
    }
}

/// 命令录制接口
///
/// 方法都使用 `&self`：和 command buffer 一样，录制是内部可变的。
pub trait GfxCommandEncoder {
    fn begin_label(&self, label: &str);

    fn end_label(&self);

    fn image_memory_barrier(&self, barriers: &[GfxImageBarrier]);

    fn draw_fullscreen(&self, draw: &GfxFullscreenDraw);
}
