use crate::render_graph::resource_state::RgImageState;

/// 导出资源信息
///
/// 描述资源在渲染图执行完成后的最终状态。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RgExportInfo {
    pub final_state: RgImageState,
}

impl RgExportInfo {
    #[inline]
    pub fn new(final_state: RgImageState) -> Self {
        Self { final_state }
    }
}
