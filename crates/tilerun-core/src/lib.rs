pub mod frame;
pub mod geometry;
pub mod input;
pub mod state;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::frame::{FrameSnapshot, Renderer, SpriteKind};
    use crate::input::{InputFrame, InputIntent, ScriptStep, ScriptedInput};

    /// Intent with only the given flags held.
    pub fn intent(left: bool, right: bool, jump: bool) -> InputIntent {
        InputIntent { left, right, jump }
    }

    /// Script step holding `intent` for `ticks` ticks.
    pub fn hold(intent: InputIntent, ticks: u32) -> ScriptStep {
        ScriptStep::new(ticks, InputFrame::with_intent(intent))
    }

    /// Script that presses start once, idles for `ticks`, then quits.
    pub fn start_then_idle(ticks: u32) -> ScriptedInput {
        ScriptedInput::new([
            ScriptStep::new(1, InputFrame::start()),
            hold(InputIntent::IDLE, ticks),
        ])
    }

    /// Renderer that keeps every frame it is handed.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub frames: Vec<FrameSnapshot>,
    }

    impl RecordingRenderer {
        pub fn last(&self) -> Option<&FrameSnapshot> {
            self.frames.last()
        }

        /// Screen-space x of the player in every recorded frame.
        pub fn player_screen_xs(&self) -> Vec<f32> {
            self.frames
                .iter()
                .filter_map(|f| f.of_kind(SpriteKind::Player).next().map(|d| d.rect.x))
                .collect()
        }
    }

    impl Renderer for RecordingRenderer {
        fn present(&mut self, frame: &FrameSnapshot) {
            self.frames.push(frame.clone());
        }
    }
}
