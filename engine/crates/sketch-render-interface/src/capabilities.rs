use ash::vk;
use serde::{Deserialize, Serialize};

/// 着色能力等级
///
/// 等级之间有序：高等级包含低等级的全部能力。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingTier {
    /// 移动端：没有几何/曲面细分着色器
    Mobile,
    /// 桌面端基础能力
    Sm5,
    /// Vulkan 1.2 + 64 位整数
    Sm6,
}

/// 当前平台的设备能力
///
/// 在设备创建后查询一次，之后整个生命周期内不变。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GfxCapabilities {
    shading_tier: ShadingTier,
}

// new & init
impl GfxCapabilities {
    #[inline]
    pub fn new(shading_tier: ShadingTier) -> Self {
        Self { shading_tier }
    }

    /// 根据物理设备的 API 版本与 features 推断能力等级
    pub fn from_device_features(api_version: u32, features: &vk::PhysicalDeviceFeatures) -> Self {
        let has = |feature: vk::Bool32| feature == vk::TRUE;

        let sm5 = has(features.geometry_shader)
            && has(features.tessellation_shader)
            && has(features.shader_image_gather_extended);
        let sm6 = sm5 && has(features.shader_int64) && api_version >= vk::API_VERSION_1_2;

        let shading_tier = if sm6 {
            ShadingTier::Sm6
        } else if sm5 {
            ShadingTier::Sm5
        } else {
            ShadingTier::Mobile
        };

        log::info!(
            "device capabilities: api {}.{}, shading tier {:?}",
            vk::api_version_major(api_version),
            vk::api_version_minor(api_version),
            shading_tier
        );
        Self { shading_tier }
    }
}

// getters
impl GfxCapabilities {
    #[inline]
    pub fn shading_tier(&self) -> ShadingTier {
        self.shading_tier
    }

    /// 是否满足最低等级要求
    #[inline]
    pub fn supports(&self, min_tier: ShadingTier) -> bool {
        self.shading_tier >= min_tier
    }
}
