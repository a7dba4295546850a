use crate::barrier::GfxImageBarrier;
use crate::command::{GfxCommandEncoder, GfxFullscreenDraw};
use std::cell::RefCell;

/// 录制下来的命令
#[derive(Clone, Debug, PartialEq)]
pub enum GfxRecordedCommand {
    BeginLabel(String),
    EndLabel,
    ImageBarriers(Vec<GfxImageBarrier>),
    DrawFullscreen(GfxFullscreenDraw),
}

/// 只录制命令、不提交到设备的 encoder
///
/// 用于 headless 运行，也用于测试中检查 Pass 录制的内容。
#[derive(Default)]
pub struct GfxCommandRecorder {
    commands: RefCell<Vec<GfxRecordedCommand>>,
}

impl GfxCommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出目前录制的所有命令，并清空录制器
    pub fn take_commands(&self) -> Vec<GfxRecordedCommand> {
        self.commands.take()
    }

    pub fn command_count(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn commands(&self) -> Vec<GfxRecordedCommand> {
        self.commands.borrow().clone()
    }

    pub fn fullscreen_draws(&self) -> Vec<GfxFullscreenDraw> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|command| match command {
                GfxRecordedCommand::DrawFullscreen(draw) => Some(draw.clone()),
                _ => None,
            })
            .collect()
    }

    /// 所有 label 的名称，按录制顺序
    pub fn labels(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|command| match command {
                GfxRecordedCommand::BeginLabel(label) => Some(label.clone()),
                _ => None,
            })
            .collect()
    }
}

impl GfxCommandEncoder for GfxCommandRecorder {
    fn begin_label(&self, label: &str) {
        self.commands.borrow_mut().push(GfxRecordedCommand::BeginLabel(label.to_string()));
    }

    fn end_label(&self) {
        self.commands.borrow_mut().push(GfxRecordedCommand::EndLabel);
    }

    fn image_memory_barrier(&self, barriers: &[GfxImageBarrier]) {
        self.commands.borrow_mut().push(GfxRecordedCommand::ImageBarriers(barriers.to_vec()));
    }

    fn draw_fullscreen(&self, draw: &GfxFullscreenDraw) {
        log::trace!(
            "draw fullscreen {:?}::{:?} @ {:?}",
            draw.program.path,
            draw.program.entry_point,
            draw.viewport
        );
        self.commands.borrow_mut().push(GfxRecordedCommand::DrawFullscreen(draw.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{GfxColorAttachment, GfxPixelProgram};
    use crate::handles::GfxImageHandle;
    use ash::vk;

    #[test]
    fn test_record_order() {
        let recorder = GfxCommandRecorder::new();
        let draw = GfxFullscreenDraw {
            program: GfxPixelProgram {
                path: "test.slang",
                entry_point: c"main",
            },
            viewport: vk::Rect2D::default(),
            color_attachment: GfxColorAttachment::load(GfxImageHandle::default()),
            textures: vec![],
            push_constants: vec![],
        };

        recorder.begin_label("pass");
        recorder.draw_fullscreen(&draw);
        recorder.end_label();

        assert_eq!(recorder.command_count(), 3);
        assert_eq!(recorder.labels(), vec!["pass".to_string()]);
        assert_eq!(recorder.fullscreen_draws(), vec![draw]);

        let commands = recorder.take_commands();
        assert_eq!(commands.last(), Some(&GfxRecordedCommand::EndLabel));
        assert_eq!(recorder.command_count(), 0);
    }
}
