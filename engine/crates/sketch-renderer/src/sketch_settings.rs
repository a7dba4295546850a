use anyhow::Context;
use serde::{Deserialize, Serialize};
use sketch_render_interface::capabilities::ShadingTier;
use std::fs;
use std::path::Path;

/// 素描后处理的配置，可以从 TOML 文件加载
///
/// ```toml
/// enabled = true
/// outline_color = [0.0, 0.0, 0.0, 1.0]
/// print_execution_plan = false
/// shading_tier_override = "mobile"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchSettings {
    /// 为 false 时不添加任何 Pass
    pub enabled: bool,

    /// 描边颜色，RGBA
    pub outline_color: [f32; 4],

    /// 编译渲染图后打印执行计划
    pub print_execution_plan: bool,

    /// 可选：覆盖设备查询到的着色能力等级，用于在高端设备上验证降级路径
    pub shading_tier_override: Option<ShadingTier>,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            outline_color: [0.0, 0.0, 0.0, 1.0],
            print_execution_plan: false,
            shading_tier_override: None,
        }
    }
}

impl SketchSettings {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("解析素描配置失败")
    }

    /// 从 TOML 文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).with_context(|| format!("读取配置文件失败: {:?}", path.as_ref()))?;

        let settings =
            Self::from_toml_str(&content).with_context(|| format!("解析 TOML 配置失败: {:?}", path.as_ref()))?;
        log::info!("sketch settings loaded from {:?}: {:?}", path.as_ref(), settings);

        Ok(settings)
    }

    #[inline]
    pub fn outline_color(&self) -> glam::Vec4 {
        glam::Vec4::from_array(self.outline_color)
    }
}
