use crate::render_graph::image_resource::RgImageResource;
use crate::render_graph::resource_handle::RgImageHandle;
use slotmap::SlotMap;

/// 资源注册表
///
/// 管理 RenderGraph 中所有声明的资源，提供虚拟句柄到资源信息的映射。
#[derive(Default)]
pub struct RgResourceRegistry {
    images: SlotMap<RgImageHandle, RgImageResource>,
}

// new & init
impl RgResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

// register
impl RgResourceRegistry {
    pub fn register_image(&mut self, rg_image_resource: RgImageResource) -> RgImageHandle {
        self.images.insert(rg_image_resource)
    }
}

// getter & iter
impl RgResourceRegistry {
    #[inline]
    pub fn get_image(&self, handle: RgImageHandle) -> Option<&RgImageResource> {
        self.images.get(handle)
    }

    #[inline]
    pub fn get_image_mut(&mut self, handle: RgImageHandle) -> Option<&mut RgImageResource> {
        self.images.get_mut(handle)
    }

    #[inline]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn transient_image_count(&self) -> usize {
        self.images.values().filter(|image| image.is_transient()).count()
    }

    #[inline]
    pub fn iter_images(&self) -> impl Iterator<Item = (RgImageHandle, &RgImageResource)> {
        self.images.iter()
    }
}
