//! Test and helper sources for repcount_core

use std::collections::VecDeque;
use std::time::Duration;

use repcount_traits::{PoseFrame, PoseSource};

/// A pose source that replays a fixed script, then reports end of stream.
///
/// `Err` entries are returned once as provider errors, so callers can
/// exercise the retry path between frames.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<PoseFrame, String>>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<PoseFrame>) -> Self {
        Self {
            script: frames.into_iter().map(Ok).collect(),
        }
    }

    pub fn from_script(script: Vec<Result<PoseFrame, String>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl PoseSource for ScriptedSource {
    fn next_frame(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<PoseFrame>, Box<dyn std::error::Error + Send + Sync>> {
        match self.script.pop_front() {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(msg)) => Err(Box::new(std::io::Error::other(msg))),
            None => Ok(None),
        }
    }
}
