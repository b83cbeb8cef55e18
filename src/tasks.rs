mod api_ext;
mod task_run;

pub use self::task_run::TaskRun;
