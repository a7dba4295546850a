use crate::render_graph::export_info::RgExportInfo;
use crate::render_graph::resource_state::RgImageState;
use ash::vk;
use sketch_render_interface::handles::GfxImageHandle;
use sketch_render_interface::image::GfxImageDesc;

/// 图像资源的来源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RgImageSource {
    /// 从外部导入的图像（已存在于 GfxResourceManager）
    Imported { image_handle: GfxImageHandle },
    /// 由 RenderGraph 在执行时创建的临时图像
    Transient,
}

/// 图像资源条目
#[derive(Clone, Debug)]
pub struct RgImageResource {
    pub source: RgImageSource,
    pub desc: GfxImageDesc,
    /// 进入渲染图时的状态
    pub initial_state: RgImageState,
    /// 调试名称
    pub name: String,
    /// 执行结束后交给外部时的信息；临时图像没有导出时会在执行结束后释放
    pub export: Option<RgExportInfo>,
}

// new & init
impl RgImageResource {
    pub fn imported(
        name: impl Into<String>,
        image_handle: GfxImageHandle,
        desc: GfxImageDesc,
        initial_state: RgImageState,
    ) -> Self {
        Self {
            source: RgImageSource::Imported { image_handle },
            desc,
            initial_state,
            name: name.into(),
            export: None,
        }
    }

    pub fn transient(name: impl Into<String>, desc: GfxImageDesc) -> Self {
        Self {
            source: RgImageSource::Transient,
            desc,
            initial_state: RgImageState::UNDEFINED,
            name: name.into(),
            export: None,
        }
    }
}

// getters
impl RgImageResource {
    #[inline]
    pub fn infer_aspect(&self) -> vk::ImageAspectFlags {
        GfxImageDesc::infer_aspect(self.desc.format)
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        self.source == RgImageSource::Transient
    }

    #[inline]
    pub fn is_exported(&self) -> bool {
        self.export.is_some()
    }
}
