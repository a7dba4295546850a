use sketch_crate_tools::enumed_map;
use sketch_render_interface::command::GfxPixelProgram;

enumed_map!(pub SketchShader<GfxPixelProgram>: {
    Shadow: GfxPixelProgram {
        path: "shader/sketch/sketch_shadow.slang",
        entry_point: c"MainPS",
    },
    Outline: GfxPixelProgram {
        path: "shader/sketch/sketch_outline.slang",
        entry_point: c"MainPS",
    },
});

impl SketchShader {
    #[inline]
    pub fn program(self) -> GfxPixelProgram {
        *self.value()
    }
}

/// 着色器中的纹理绑定名称
pub mod bindings {
    pub const SCENE_COLOR: &str = "InputSceneColorTexture";
    pub const SCENE_DEPTH: &str = "InputSceneDepthTexture";
    pub const BASE_COLOR: &str = "InputBaseColorTexture";
    pub const SHADOW_MASK: &str = "InputShadowMaskTexture";
    pub const SKETCH_DATA: &str = "InputSketchDataTexture";
    pub const WORLD_NORMAL: &str = "InputWorldNormalTexture";
}
