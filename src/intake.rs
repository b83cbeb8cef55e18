mod env_intake;
mod event_intake;
mod sns_event;
mod task_intake;

pub use self::{
    env_intake::EnvIntake, event_intake::EventIntake, sns_event::SnsEvent,
    task_intake::TaskIntake,
};
