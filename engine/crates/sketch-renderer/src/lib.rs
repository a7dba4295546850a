//! 素描风格后处理
//!
//! 在一帧的 RenderGraph 中插入两个 Pass：
//!
//! 1. **SketchShadowPass**：根据场景颜色、深度、基础色、阴影遮罩和六张 hatch 纹理，
//!    把素描信号累积到跨帧保留的 sketch data 中（attachment 使用 LOAD）
//! 2. **SketchOutlinePass**：根据世界法线的不连续和 sketch data 在场景颜色上绘制描边
//!
//! 两个 Pass 之间只通过 sketch data 传递数据，执行顺序和 barrier 由渲染图根据读写声明推导。

pub mod error;
pub mod screen_pass;
pub mod sketch_outline_pass;
pub mod sketch_renderer;
pub mod sketch_settings;
pub mod sketch_shader;
pub mod sketch_shading_pass;
pub mod sketch_view_state;

#[cfg(test)]
mod test_scene;
