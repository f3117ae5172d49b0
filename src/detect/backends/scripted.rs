use std::collections::VecDeque;

use anyhow::Result;

use crate::detect::backend::InferenceBackend;
use crate::detect::result::SsdOutput;

/// Scripted backend for testing. Replays prepared detection tensors, one per
/// frame, without looking at pixels.
///
/// Once the script runs out every further frame gets an empty tensor, unless
/// `repeat_last` is set, in which case the final tensor keeps being returned.
#[derive(Default)]
pub struct ScriptedBackend {
    script: VecDeque<SsdOutput>,
    repeat_last: bool,
    last: Option<SsdOutput>,
    calls: u64,
}

impl ScriptedBackend {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = SsdOutput>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Keep returning the final scripted tensor after the script is exhausted.
    pub fn repeat_last(mut self) -> Self {
        self.repeat_last = true;
        self
    }

    /// Number of forward passes run so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl<F: ?Sized> InferenceBackend<F> for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn forward(&mut self, _frame: &F) -> Result<SsdOutput> {
        self.calls += 1;
        match self.script.pop_front() {
            Some(output) => {
                if self.repeat_last {
                    self.last = Some(output.clone());
                }
                Ok(output)
            }
            None => Ok(self.last.clone().unwrap_or_default()),
        }
    }
}
