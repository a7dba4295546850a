//! RenderGraph 资源句柄定义
//!
//! 这些句柄是 graph 内部的虚拟引用，与 `GfxResourceManager` 的物理句柄分离。
//! `RgImageHandle::default()` 是空句柄，不指向任何资源。

use slotmap::new_key_type;

new_key_type! {
    /// Graph 内部的 Image 句柄
    pub struct RgImageHandle;
}
