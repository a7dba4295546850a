//! 素描 hatch 纹理表
//!
//! 六张 hatch 纹理按笔触密度从低到高排列，着色器按索引 0..5 采样。

use crate::handles::GfxImageHandle;
use sketch_crate_tools::enumed_map;

enumed_map!(pub HatchLevel<&'static str>: {
    Level0: "InputHatchTexture0",
    Level1: "InputHatchTexture1",
    Level2: "InputHatchTexture2",
    Level3: "InputHatchTexture3",
    Level4: "InputHatchTexture4",
    Level5: "InputHatchTexture5",
});

impl HatchLevel {
    /// 着色器中的绑定名称
    #[inline]
    pub fn binding_name(self) -> &'static str {
        self.value()
    }
}

/// hatch 纹理来源
///
/// 由资源加载层实现；渲染器只读访问，可以在多个 view 之间共享。
pub trait HatchTextureProvider {
    /// 某一级纹理尚未加载时返回 `None`
    fn hatch_texture(&self, level: HatchLevel) -> Option<GfxImageHandle>;
}

/// 固定大小的 hatch 纹理表
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HatchTextureTable {
    textures: [Option<GfxImageHandle>; HatchLevel::COUNT],
}

// new & init
impl HatchTextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按密度顺序构建，超出六张的部分被忽略
    pub fn from_handles(handles: impl IntoIterator<Item = GfxImageHandle>) -> Self {
        let mut table = Self::new();
        for (level, handle) in HatchLevel::iter().zip(handles) {
            table.set(level, handle);
        }
        table
    }
}

// setters
impl HatchTextureTable {
    pub fn set(&mut self, level: HatchLevel, handle: GfxImageHandle) -> &mut Self {
        self.textures[level.index()] = Some(handle);
        self
    }

    pub fn remove(&mut self, level: HatchLevel) -> Option<GfxImageHandle> {
        self.textures[level.index()].take()
    }
}

// getters
impl HatchTextureTable {
    #[inline]
    pub fn present_count(&self) -> usize {
        self.textures.iter().flatten().count()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.present_count() == HatchLevel::COUNT
    }
}

impl HatchTextureProvider for HatchTextureTable {
    #[inline]
    fn hatch_texture(&self, level: HatchLevel) -> Option<GfxImageHandle> {
        self.textures[level.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_levels_in_density_order() {
        let names: Vec<_> = HatchLevel::iter().map(HatchLevel::binding_name).collect();
        assert_eq!(
            names,
            vec![
                "InputHatchTexture0",
                "InputHatchTexture1",
                "InputHatchTexture2",
                "InputHatchTexture3",
                "InputHatchTexture4",
                "InputHatchTexture5",
            ]
        );
        assert_eq!(HatchLevel::COUNT, 6);
    }

    #[test]
    fn test_partial_table() {
        let mut keys: SlotMap<GfxImageHandle, ()> = SlotMap::with_key();
        let handles: Vec<_> = (0..3).map(|_| keys.insert(())).collect();

        let table = HatchTextureTable::from_handles(handles.clone());
        assert_eq!(table.present_count(), 3);
        assert!(!table.is_complete());
        assert_eq!(table.hatch_texture(HatchLevel::Level2), Some(handles[2]));
        assert_eq!(table.hatch_texture(HatchLevel::Level3), None);
    }

    #[test]
    fn test_extra_handles_ignored() {
        let mut keys: SlotMap<GfxImageHandle, ()> = SlotMap::with_key();
        let handles: Vec<_> = (0..8).map(|_| keys.insert(())).collect();

        let mut table = HatchTextureTable::from_handles(handles.clone());
        assert!(table.is_complete());
        assert_eq!(table.hatch_texture(HatchLevel::Level5), Some(handles[5]));

        assert_eq!(table.remove(HatchLevel::Level0), Some(handles[0]));
        assert_eq!(table.present_count(), 5);
    }
}
