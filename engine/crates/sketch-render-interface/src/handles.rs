use slotmap::new_key_type;

new_key_type! {
    /// 物理 Image 句柄，指向 `GfxResourceManager` 中的图像
    pub struct GfxImageHandle;
}
