use crate::handles::GfxImageHandle;
use crate::image::GfxImageDesc;
use slotmap::SlotMap;

/// 资源管理器中的图像条目
#[derive(Clone, Debug)]
pub struct GfxImage {
    name: String,
    desc: GfxImageDesc,
}

impl GfxImage {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn desc(&self) -> &GfxImageDesc {
        &self.desc
    }
}

/// 资源管理器
///
/// 使用 SlotMap 存储图像，对外提供轻量级的 Handle。
/// 图像的生命周期由持有 Handle 的一方负责：渲染图只会销毁它自己创建且没有导出的临时图像。
#[derive(Default)]
pub struct GfxResourceManager {
    image_pool: SlotMap<GfxImageHandle, GfxImage>,

    /// 累计创建过的图像数量（包含已销毁的）
    created_image_count: usize,
}

// new & init
impl GfxResourceManager {
    pub fn new() -> Self {
        Self::default()
    }
}

// create & destroy
impl GfxResourceManager {
    pub fn create_image(&mut self, name: impl Into<String>, desc: GfxImageDesc) -> GfxImageHandle {
        let name = name.into();
        log::debug!(
            "create image \"{}\": {}x{} {:?}, compression: {:?}",
            name,
            desc.extent.width,
            desc.extent.height,
            desc.format,
            desc.compression
        );

        self.created_image_count += 1;
        self.image_pool.insert(GfxImage { name, desc })
    }

    /// 销毁图像，句柄无效时返回 `None`
    pub fn destroy_image(&mut self, handle: GfxImageHandle) -> Option<GfxImage> {
        let image = self.image_pool.remove(handle);
        match &image {
            Some(image) => log::debug!("destroy image \"{}\"", image.name),
            None => log::warn!("destroy image: invalid handle {:?}", handle),
        }
        image
    }
}

// getters
impl GfxResourceManager {
    #[inline]
    pub fn get_image(&self, handle: GfxImageHandle) -> Option<&GfxImage> {
        self.image_pool.get(handle)
    }

    #[inline]
    pub fn contains_image(&self, handle: GfxImageHandle) -> bool {
        self.image_pool.contains_key(handle)
    }

    /// 当前存活的图像数量
    #[inline]
    pub fn image_count(&self) -> usize {
        self.image_pool.len()
    }

    #[inline]
    pub fn created_image_count(&self) -> usize {
        self.created_image_count
    }

    #[inline]
    pub fn iter_images(&self) -> impl Iterator<Item = (GfxImageHandle, &GfxImage)> {
        self.image_pool.iter()
    }
}
