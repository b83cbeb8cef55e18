use crate::{
    config::SchedulerConfig,
    fetchers::{FetchExecutor, Fetcher},
    scheduler::{RunSummary, ScheduleWindow, StartGate},
    sinks::MeasurementSink,
    tasks::TaskRun,
};
use futures::future::join_all;
use sfb_types::tasks::{LoadShape, TaskDescriptor};
use std::{sync::Arc, time::Instant};
use time::OffsetDateTime;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Holds a task back until its start time and then issues fetches as the task load shape
/// dictates.
pub struct RateScheduler<F: Fetcher, S: MeasurementSink> {
    config: SchedulerConfig,
    gate: StartGate,
    executor: Arc<FetchExecutor<F, S>>,
}

impl<F: Fetcher, S: MeasurementSink> RateScheduler<F, S> {
    pub fn new(config: SchedulerConfig, executor: Arc<FetchExecutor<F, S>>) -> Self {
        Self {
            gate: StartGate::new(&config),
            config,
            executor,
        }
    }

    /// Runs the task to completion. Only a malformed task fails the run, fetch failures are
    /// counted in the summary.
    pub async fn run(&self, descriptor: TaskDescriptor) -> anyhow::Result<RunSummary> {
        if descriptor.url.trim().is_empty() {
            warn!(
                task.id = descriptor.task_id,
                "Task doesn't have a URL and will be skipped."
            );
            return Ok(RunSummary::default());
        }

        // All timestamps are validated before the task is allowed to wait.
        let window = ScheduleWindow::try_from(&descriptor)?;
        let env_init_duration = window.since_created(OffsetDateTime::now_utc());
        debug!(
            task.id = descriptor.task_id,
            task.env_init_duration = env_init_duration.as_millis(),
            "Waiting for the task start time ({} since the task was created).",
            humantime::format_duration(env_init_duration)
        );

        let opened_at = self.gate.wait_until(window.start_time).await;
        let latency = window.since_start(opened_at);
        info!(
            task.id = descriptor.task_id,
            task.url = descriptor.url,
            task.latency = latency.as_millis(),
            "Task started ({} late).",
            humantime::format_duration(latency)
        );

        let load_shape = descriptor.load_shape();
        let run = Arc::new(TaskRun {
            descriptor,
            window,
            env_init_duration,
            latency,
        });

        let summary = match load_shape {
            LoadShape::Paced { qps } => self.run_paced(run.clone(), qps).await,
            LoadShape::FixedCount { count } => self.run_fixed(&run, count).await,
            LoadShape::Idle => {
                warn!(
                    task.id = run.descriptor.task_id,
                    "Task doesn't define a load shape, no fetches will be issued."
                );
                RunSummary::default()
            }
        };

        info!(
            task.id = run.descriptor.task_id,
            run.ticks = summary.ticks,
            run.fetches = summary.fetches,
            run.failures = summary.failures,
            "Task finished."
        );

        Ok(summary)
    }

    /// Issues `qps` concurrent fetches every tick until the task end time passes. Without an
    /// end time the loop never ends.
    async fn run_paced(&self, run: Arc<TaskRun>, qps: u32) -> RunSummary {
        let success_code = run.descriptor.success_code;
        let mut summary = RunSummary::default();
        loop {
            let batch_started_at = Instant::now();
            let batch = (0..qps)
                .map(|_| {
                    let executor = self.executor.clone();
                    let run = run.clone();
                    tokio::spawn(async move { executor.execute(&run).await })
                })
                .collect::<Vec<_>>();

            for result in join_all(batch).await {
                match result {
                    Ok(result) => summary.record(&result, success_code),
                    Err(err) => {
                        error!(
                            task.id = run.descriptor.task_id,
                            "Fetch task didn't complete: {err:?}"
                        );
                        summary.record_lost();
                    }
                }
            }
            summary.ticks += 1;

            let batch_elapsed = batch_started_at.elapsed();
            let pause = self
                .config
                .cadence
                .pause(self.config.tick_interval, batch_elapsed);
            debug!(
                task.id = run.descriptor.task_id,
                run.tick = summary.ticks,
                "Batch completed in {}, next tick in {}.",
                humantime::format_duration(batch_elapsed),
                humantime::format_duration(pause)
            );
            sleep(pause).await;

            if run.window.has_ended(OffsetDateTime::now_utc()) {
                break;
            }
        }

        summary
    }

    /// Issues `count` fetches one after another.
    async fn run_fixed(&self, run: &TaskRun, count: u64) -> RunSummary {
        let mut summary = RunSummary::default();
        for _ in 0..count {
            let result = self.executor.execute(run).await;
            summary.record(&result, run.descriptor.success_code);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::RateScheduler;
    use crate::{
        config::{FetchConfig, SchedulerConfig},
        error::{Error as SfbError, ErrorKind},
        fetchers::FetchExecutor,
        scheduler::{RunSummary, TickCadence},
        tests::{MemorySink, MockFetcher, MockTaskBuilder},
    };
    use std::{
        sync::Arc,
        time::{Duration, Instant},
    };
    use time::{format_description::well_known::Rfc3339, OffsetDateTime};

    struct MockScheduler {
        fetcher: Arc<MockFetcher>,
        sink: Arc<MemorySink>,
        scheduler: RateScheduler<Arc<MockFetcher>, Arc<MemorySink>>,
    }

    fn mock_scheduler(fetcher: MockFetcher, sink: MemorySink) -> MockScheduler {
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(sink);
        let executor = Arc::new(FetchExecutor::new(
            fetcher.clone(),
            sink.clone(),
            &FetchConfig {
                teardown_grace: Duration::from_millis(50),
                ..Default::default()
            },
        ));
        MockScheduler {
            fetcher,
            sink,
            scheduler: RateScheduler::new(
                SchedulerConfig {
                    tick_interval: Duration::from_millis(200),
                    ..Default::default()
                },
                executor,
            ),
        }
    }

    #[tokio::test]
    async fn never_fetches_before_start_time() -> anyhow::Result<()> {
        let mock = mock_scheduler(MockFetcher::new(Duration::ZERO), MemorySink::default());
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_start_in(Duration::from_millis(300))
            .with_fixed_count(1, 1, None)
            .build();
        let start_time = OffsetDateTime::parse(&descriptor.start_time, &Rfc3339)?;

        let summary = mock.scheduler.run(descriptor).await?;
        assert_eq!(summary.fetches, 1);

        let calls = mock.fetcher.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].wall_started_at >= start_time);

        Ok(())
    }

    #[tokio::test]
    async fn issues_single_tick_if_end_time_is_close() -> anyhow::Result<()> {
        let mock = mock_scheduler(
            MockFetcher::new(Duration::from_millis(20)),
            MemorySink::default(),
        );
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_qps(2)
            .with_end_in(time::Duration::milliseconds(100))
            .build();

        let summary = mock.scheduler.run(descriptor).await?;
        assert_eq!(
            summary,
            RunSummary {
                ticks: 1,
                fetches: 2,
                failures: 0
            }
        );
        assert_eq!(mock.fetcher.calls().len(), 2);
        assert_eq!(mock.fetcher.max_in_flight(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn issues_single_tick_if_end_time_passed() -> anyhow::Result<()> {
        let mock = mock_scheduler(MockFetcher::new(Duration::ZERO), MemorySink::default());
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_qps(3)
            .with_end_in(time::Duration::seconds(-10))
            .build();

        let summary = mock.scheduler.run(descriptor).await?;
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.fetches, 3);

        Ok(())
    }

    #[tokio::test]
    async fn ticks_never_overlap() -> anyhow::Result<()> {
        let mock = mock_scheduler(
            MockFetcher::new(Duration::from_millis(50)),
            MemorySink::default(),
        );
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_qps(3)
            .with_end_in(time::Duration::milliseconds(500))
            .build();

        let summary = mock.scheduler.run(descriptor).await?;
        assert!(summary.ticks >= 2);
        assert_eq!(summary.fetches, summary.ticks * 3);
        assert_eq!(summary.failures, 0);

        let calls = mock.fetcher.calls();
        assert_eq!(calls.len() as u64, summary.fetches);
        assert_eq!(mock.fetcher.max_in_flight(), 3);
        for (previous, next) in calls.chunks(3).zip(calls.chunks(3).skip(1)) {
            let previous_finished_at = previous
                .iter()
                .filter_map(|call| call.finished_at)
                .max()
                .unwrap();
            assert!(next
                .iter()
                .all(|call| call.started_at >= previous_finished_at));
        }

        Ok(())
    }

    #[tokio::test]
    async fn keeps_tick_cadence() -> anyhow::Result<()> {
        // Every batch takes half a tick, the flat cadence stretches ticks by that half.
        for (cadence, ticks) in [(TickCadence::Corrected, 3), (TickCadence::Flat, 2)] {
            let fetcher = Arc::new(MockFetcher::new(Duration::from_millis(100)));
            let executor = Arc::new(FetchExecutor::new(
                fetcher.clone(),
                MemorySink::default(),
                &FetchConfig::default(),
            ));
            let scheduler = RateScheduler::new(
                SchedulerConfig {
                    tick_interval: Duration::from_millis(200),
                    cadence,
                    ..Default::default()
                },
                executor,
            );
            let descriptor = MockTaskBuilder::create("https://sfb.dev/")
                .with_qps(1)
                .with_end_in(time::Duration::milliseconds(500))
                .build();

            let started_at = Instant::now();
            let summary = scheduler.run(descriptor).await?;
            assert_eq!(summary.ticks, ticks);
            assert_eq!(fetcher.calls().len() as u64, ticks);
            assert!(started_at.elapsed() >= Duration::from_millis(600));
        }

        Ok(())
    }

    #[tokio::test]
    async fn issues_fixed_count_sequentially() -> anyhow::Result<()> {
        let mock = mock_scheduler(
            MockFetcher::new(Duration::from_millis(10)),
            MemorySink::default(),
        );
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_fixed_count(10, 2, Some(5))
            .with_end_in(time::Duration::seconds(-10))
            .build();

        let summary = mock.scheduler.run(descriptor).await?;
        assert_eq!(
            summary,
            RunSummary {
                ticks: 0,
                fetches: 5,
                failures: 0
            }
        );
        assert_eq!(mock.fetcher.calls().len(), 5);
        assert_eq!(mock.fetcher.max_in_flight(), 1);

        // Without `nPerClient` the total is split between clients.
        let mock = mock_scheduler(MockFetcher::new(Duration::ZERO), MemorySink::default());
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_fixed_count(9, 3, None)
            .build();
        assert_eq!(mock.scheduler.run(descriptor).await?.fetches, 3);

        Ok(())
    }

    #[tokio::test]
    async fn skips_tasks_without_url() -> anyhow::Result<()> {
        let mock = mock_scheduler(MockFetcher::new(Duration::ZERO), MemorySink::default());
        let mut descriptor = MockTaskBuilder::create("").with_qps(2).build();
        // The URL is checked first, malformed timestamps don't matter.
        descriptor.start_time = "not-a-date".to_string();

        assert_eq!(
            mock.scheduler.run(descriptor).await?,
            RunSummary::default()
        );
        assert!(mock.fetcher.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn fails_for_malformed_start_time() -> anyhow::Result<()> {
        let mock = mock_scheduler(MockFetcher::new(Duration::ZERO), MemorySink::default());
        let mut descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_qps(2)
            .build();
        descriptor.start_time = "not-a-date".to_string();

        let error = mock
            .scheduler
            .run(descriptor)
            .await
            .unwrap_err()
            .downcast::<SfbError>()?;
        assert_eq!(error.kind(), ErrorKind::MalformedTask);
        assert!(mock.fetcher.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn does_nothing_for_idle_tasks() -> anyhow::Result<()> {
        let mock = mock_scheduler(MockFetcher::new(Duration::ZERO), MemorySink::default());

        let descriptor = MockTaskBuilder::create("https://sfb.dev/").build();
        assert_eq!(mock.scheduler.run(descriptor).await?, RunSummary::default());

        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_qps(0)
            .with_fixed_count(10, 1, None)
            .build();
        assert_eq!(mock.scheduler.run(descriptor).await?, RunSummary::default());

        assert!(mock.fetcher.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn does_not_block_on_hanging_fetches() -> anyhow::Result<()> {
        let mock = mock_scheduler(
            MockFetcher::new(Duration::from_secs(10)),
            MemorySink::default(),
        );
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_qps(2)
            .with_timeout(Duration::from_millis(100))
            .with_end_in(time::Duration::seconds(-10))
            .build();

        let started_at = Instant::now();
        let summary = mock.scheduler.run(descriptor).await?;
        assert!(started_at.elapsed() < Duration::from_secs(1));
        assert_eq!(
            summary,
            RunSummary {
                ticks: 1,
                fetches: 2,
                failures: 2
            }
        );
        assert!(mock
            .fetcher
            .calls()
            .iter()
            .all(|call| call.finished_at.is_none()));

        Ok(())
    }

    #[tokio::test]
    async fn reports_every_fetch() -> anyhow::Result<()> {
        let mock = mock_scheduler(
            MockFetcher::new(Duration::from_millis(30)),
            MemorySink::default(),
        );
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_qps(2)
            .with_timeout(Duration::from_millis(500))
            .with_end_in(time::Duration::milliseconds(300))
            .with_report("sfb-stream")
            .build();

        let summary = mock.scheduler.run(descriptor).await?;

        let records = mock.sink.records();
        assert_eq!(records.len() as u64, summary.fetches);
        assert!(records
            .iter()
            .all(|record| record.ms <= Duration::from_millis(550) && record.success));
        assert!(records
            .iter()
            .all(|record| record.partition_key() == "00000000-0000-0000-0000-000000000001"));

        Ok(())
    }

    #[tokio::test]
    async fn tolerates_sink_failures() -> anyhow::Result<()> {
        let mock = mock_scheduler(MockFetcher::new(Duration::ZERO), MemorySink::failing());
        let descriptor = MockTaskBuilder::create("https://sfb.dev/")
            .with_fixed_count(3, 1, None)
            .with_report("sfb-stream")
            .build();

        assert_eq!(
            mock.scheduler.run(descriptor).await?,
            RunSummary {
                ticks: 0,
                fetches: 3,
                failures: 0
            }
        );
        assert!(mock.sink.records().is_empty());

        Ok(())
    }
}
