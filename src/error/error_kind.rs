/// Describes a worker specific error types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The task payload can't be run, e.g. one of its timestamps can't be parsed.
    MalformedTask,
}
