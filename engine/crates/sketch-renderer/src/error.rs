/// 添加素描 Pass 时的前置条件错误
///
/// 出错时这一次调用不会向渲染图添加任何 Pass 或资源，帧的其余部分照常进行。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SketchPassError {
    #[error("{pass}: input \"{input}\" is not registered in the render graph")]
    UnknownImage { pass: &'static str, input: &'static str },

    #[error("{pass}: input \"{input}\" has an empty extent")]
    EmptyImage { pass: &'static str, input: &'static str },

    #[error("sketch data of this view has been released")]
    MissingSketchData,
}
