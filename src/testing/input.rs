//! Scripted input playback for scenarios

use bevy::math::Vec2;
use std::collections::HashMap;

use super::parser::ScriptedFrame;
use crate::tutorial::FrameInput;

/// Sequencer API call scripted for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedCall {
    Start,
    Skip,
    Complete,
    Reset,
}

impl ScriptedCall {
    /// Parse call name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "start" => Some(ScriptedCall::Start),
            "skip" => Some(ScriptedCall::Skip),
            "complete" => Some(ScriptedCall::Complete),
            "reset" => Some(ScriptedCall::Reset),
            _ => None,
        }
    }
}

/// Per-frame inputs of a scenario. Frames without an entry get no input.
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    /// Map of frame -> (call, input)
    pub frames: HashMap<u64, (Option<ScriptedCall>, FrameInput)>,
    /// Current frame number
    pub current_frame: u64,
    /// Last scripted frame
    pub max_frame: u64,
}

impl ScriptedInputs {
    /// Create from parsed frames, rejecting unknown call names
    pub fn from_frames(frames: &[ScriptedFrame]) -> Result<Self, String> {
        let mut map = HashMap::new();
        let mut max_frame = 0u64;

        for scripted in frames {
            let call = match scripted.call.as_deref() {
                Some(name) => Some(ScriptedCall::from_str(name).ok_or_else(|| {
                    format!("Unknown call '{}' at frame {}", name, scripted.frame)
                })?),
                None => None,
            };
            let input = FrameInput {
                direction: scripted.direction,
                pointer_delta: scripted
                    .pointer
                    .map(|[x, y]| Vec2::new(x, y))
                    .unwrap_or(Vec2::ZERO),
                fire_pressed: scripted.fire,
                interact_pressed: scripted.interact,
                skip_pressed: scripted.skip,
            };
            max_frame = max_frame.max(scripted.frame);
            map.insert(scripted.frame, (call, input));
        }

        Ok(Self {
            frames: map,
            current_frame: 0,
            max_frame,
        })
    }

    /// Set max frame (for state assertions)
    pub fn set_max_frame(&mut self, frame: u64) {
        self.max_frame = self.max_frame.max(frame);
    }

    /// Call and input for the current frame, then move to the next frame
    pub fn advance_frame(&mut self) -> (Option<ScriptedCall>, FrameInput) {
        let entry = self
            .frames
            .get(&self.current_frame)
            .copied()
            .unwrap_or_default();
        self.current_frame += 1;
        entry
    }

    /// Whether scripted frames remain
    pub fn has_remaining(&self) -> bool {
        self.current_frame <= self.max_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::MoveDirection;

    #[test]
    fn test_playback() {
        let frames = vec![
            ScriptedFrame {
                frame: 1,
                direction: Some(MoveDirection::Up),
                ..Default::default()
            },
            ScriptedFrame {
                frame: 2,
                call: Some("Skip".into()),
                ..Default::default()
            },
        ];
        let mut inputs = ScriptedInputs::from_frames(&frames).unwrap();
        assert_eq!(inputs.max_frame, 2);

        assert_eq!(inputs.advance_frame(), (None, FrameInput::default()));
        assert_eq!(
            inputs.advance_frame(),
            (None, FrameInput::direction(MoveDirection::Up))
        );
        assert_eq!(inputs.advance_frame().0, Some(ScriptedCall::Skip));
        assert!(!inputs.has_remaining());
    }

    #[test]
    fn test_unknown_call_rejected() {
        let frames = vec![ScriptedFrame {
            frame: 0,
            call: Some("pause".into()),
            ..Default::default()
        }];
        assert!(ScriptedInputs::from_frames(&frames).is_err());
    }
}
