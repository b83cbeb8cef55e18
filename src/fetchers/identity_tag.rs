use crate::tasks::TaskRun;

/// Builds the user agent like identity tag sent with every fetch of the run, e.g.
/// `SFB/1.0.0/eu-west-1 (lambda) TaskId=... EnvInitDuration=1200ms Latency=3ms`.
pub fn identity_tag(product: &str, run: &TaskRun) -> String {
    let descriptor = &run.descriptor;
    format!(
        "{product}/{}/{} ({}) TaskId={} EnvInitDuration={}ms Latency={}ms",
        descriptor.version,
        descriptor.region,
        descriptor.compute,
        descriptor.task_id,
        run.env_init_duration.as_millis(),
        run.latency.as_millis()
    )
}
