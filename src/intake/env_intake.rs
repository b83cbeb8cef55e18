use crate::intake::TaskIntake;

/// Task passed directly to the worker through the command line or the `TASK` variable.
#[derive(Debug, Clone)]
pub struct EnvIntake {
    payload: String,
}

impl EnvIntake {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl TaskIntake for EnvIntake {
    fn messages(&self) -> anyhow::Result<Vec<String>> {
        Ok(vec![self.payload.clone()])
    }
}
