mod load_shape;
mod task_descriptor;
mod task_type;

pub use self::{load_shape::LoadShape, task_descriptor::TaskDescriptor, task_type::TaskType};
