//! Progress reporting for long-running operations.
//!
//! A [`ProgressReporter`] owns one consumer task. Business logic publishes
//! [`ProgressEvent`]s through a [`Publisher`]; the consumer logs every event at
//! debug level and mirrors it on an [`Indicator`]. Whether the indicator is a
//! real spinner or a no-op is decided once, at construction, so callers never
//! branch on it.
//!
//! Publishing is a synchronous handoff: [`Publisher::publish`] resolves only
//! after the consumer has logged and displayed the event, so a burst of
//! updates cannot pile up behind a slow terminal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// An interactive status display.
pub trait Indicator: Send + Sync {
    fn start(&self, message: &str);
    fn set_message(&self, message: &str);
    fn stop(&self);
}

/// Terminal spinner on stderr.
#[derive(Debug)]
pub struct Spinner {
    bar: indicatif::ProgressBar,
}

impl Spinner {
    pub fn new() -> Self {
        let bar = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Spinner {
    fn start(&self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn stop(&self) {
        self.bar.finish_and_clear();
    }
}

/// Accepts every call and shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndicator;

impl Indicator for NoopIndicator {
    fn start(&self, _message: &str) {}
    fn set_message(&self, _message: &str) {}
    fn stop(&self) {}
}

/// How progress should be shown for an invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressOptions {
    /// Show a spinner on stderr
    pub spinner: bool,
}

/// One status update about an in-flight operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub stage: String,
    pub message: Option<String>,
}

impl ProgressEvent {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The message to show; the stage tag when no message was given.
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.stage)
    }
}

enum Signal {
    Event(ProgressEvent, oneshot::Sender<()>),
    Done,
}

/// Write end of the progress pipe.
#[derive(Clone)]
pub struct Publisher {
    tx: mpsc::Sender<Signal>,
}

impl Publisher {
    /// Hand `event` to the consumer and wait until it has been logged and displayed.
    ///
    /// After the reporter has stopped this returns immediately.
    pub async fn publish(&self, event: ProgressEvent) {
        let (ack, acked) = oneshot::channel();
        if self.tx.send(Signal::Event(event, ack)).await.is_err() {
            trace!("progress event dropped, reporter already stopped");
            return;
        }
        // Err only if the consumer was aborted mid-event
        let _ = acked.await;
    }

    pub async fn stage(&self, stage: &str) {
        self.publish(ProgressEvent::new(stage)).await;
    }

    pub async fn message(&self, stage: &str, message: impl Into<String>) {
        self.publish(ProgressEvent::new(stage).with_message(message)).await;
    }
}

/// Owns the consumer task and the indicator for one operation.
pub struct ProgressReporter {
    publisher: Publisher,
    consumer: Option<JoinHandle<()>>,
    indicator: Arc<dyn Indicator>,
}

impl ProgressReporter {
    /// Start reporting with a spinner or a no-op indicator, per `options`.
    pub fn start(options: ProgressOptions, initial: Option<&str>) -> Self {
        let indicator: Arc<dyn Indicator> = if options.spinner {
            Arc::new(Spinner::new())
        } else {
            Arc::new(NoopIndicator)
        };
        Self::with_indicator(indicator, initial)
    }

    /// Start reporting onto a caller-supplied indicator.
    pub fn with_indicator(indicator: Arc<dyn Indicator>, initial: Option<&str>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Signal>(1);
        indicator.start(initial.unwrap_or_default());

        let display = Arc::clone(&indicator);
        let consumer = tokio::spawn(async move {
            while let Some(signal) = rx.recv().await {
                match signal {
                    Signal::Event(event, ack) => {
                        let detail = event.display_message();
                        debug!(stage = %event.stage, detail, "progress update");
                        display.set_message(detail);
                        let _ = ack.send(());
                    }
                    Signal::Done => break,
                }
            }
        });

        Self {
            publisher: Publisher { tx },
            consumer: Some(consumer),
            indicator,
        }
    }

    /// A handle for publishing events.
    pub fn publisher(&self) -> Publisher {
        self.publisher.clone()
    }

    /// True until [`stop`](Self::stop) has run.
    pub const fn is_active(&self) -> bool {
        self.consumer.is_some()
    }

    /// Drain the pipe, wait for the consumer and stop the indicator.
    ///
    /// `outcome` is only logged. Safe to call more than once; later calls do nothing.
    pub async fn stop(&mut self, outcome: Option<&anyhow::Error>) {
        let Some(consumer) = self.consumer.take() else {
            return;
        };
        if let Some(err) = outcome {
            debug!(error = %err, "operation finished with error");
        }

        // Done queues behind any event still in flight
        let _ = self.publisher.tx.send(Signal::Done).await;
        if let Err(err) = consumer.await {
            debug!(error = %err, "progress consumer ended abnormally");
        }
        self.indicator.stop();
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Dropped without stop: early return, cancellation or unwind
        if let Some(consumer) = self.consumer.take() {
            consumer.abort();
            self.indicator.stop();
        }
    }
}

/// Run `op` with a progress reporter that is stopped on every exit path.
pub async fn with_progress<T, F, Fut>(
    options: ProgressOptions,
    initial: Option<&str>,
    op: F,
) -> anyhow::Result<T>
where
    F: FnOnce(Publisher) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut reporter = ProgressReporter::start(options, initial);
    run_reported(&mut reporter, op).await
}

/// [`with_progress`] onto a caller-supplied indicator.
pub async fn with_progress_on<T, F, Fut>(
    indicator: Arc<dyn Indicator>,
    initial: Option<&str>,
    op: F,
) -> anyhow::Result<T>
where
    F: FnOnce(Publisher) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut reporter = ProgressReporter::with_indicator(indicator, initial);
    run_reported(&mut reporter, op).await
}

async fn run_reported<T, F, Fut>(reporter: &mut ProgressReporter, op: F) -> anyhow::Result<T>
where
    F: FnOnce(Publisher) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let result = op(reporter.publisher()).await;
    reporter.stop(result.as_ref().err()).await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Default)]
    struct Recorder {
        started: Mutex<Option<String>>,
        messages: Mutex<Vec<String>>,
        stops: Mutex<u32>,
    }

    impl Indicator for Recorder {
        fn start(&self, message: &str) {
            *self.started.lock().unwrap() = Some(message.to_string());
        }
        fn set_message(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
        fn stop(&self) {
            *self.stops.lock().unwrap() += 1;
        }
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Self;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_three_events_are_displayed_before_stop_returns() {
        let recorder = Arc::new(Recorder::default());
        let mut reporter = ProgressReporter::with_indicator(recorder.clone(), Some("Starting"));
        let publisher = reporter.publisher();

        publisher.stage("connect").await;
        publisher.message("fetch", "Fetching page 1").await;
        publisher.message("fetch", "Fetching page 2").await;
        reporter.stop(None).await;

        assert_eq!(recorder.started.lock().unwrap().as_deref(), Some("Starting"));
        assert_eq!(
            *recorder.messages.lock().unwrap(),
            ["connect", "Fetching page 1", "Fetching page 2"]
        );
        assert_eq!(*recorder.stops.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_every_event_is_logged_at_debug() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut reporter = ProgressReporter::with_indicator(Arc::new(NoopIndicator), None);
        let publisher = reporter.publisher();
        publisher.stage("resolve").await;
        publisher.message("lookup", "Looking up 8.8.8.8").await;
        publisher.stage("render").await;
        reporter.stop(None).await;

        let logs = capture.text();
        let updates: Vec<_> = logs.lines().filter(|l| l.contains("progress update")).collect();
        assert_eq!(updates.len(), 3);
        assert!(updates[0].contains("DEBUG"));
        assert!(updates[1].contains("stage=lookup"));
        assert!(updates[1].contains("Looking up 8.8.8.8"));
        // no message: the stage doubles as the detail
        assert!(updates[2].contains("detail=\"render\""));
    }

    #[tokio::test]
    async fn test_stop_twice_is_a_noop() {
        let recorder = Arc::new(Recorder::default());
        let mut reporter = ProgressReporter::with_indicator(recorder.clone(), None);
        assert!(reporter.is_active());

        reporter.stop(None).await;
        reporter.stop(Some(&anyhow::anyhow!("late"))).await;

        assert!(!reporter.is_active());
        assert_eq!(*recorder.stops.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_publish_after_stop_returns() {
        let mut reporter = ProgressReporter::with_indicator(Arc::new(NoopIndicator), None);
        let publisher = reporter.publisher();
        reporter.stop(None).await;

        tokio::time::timeout(Duration::from_secs(1), publisher.stage("late"))
            .await
            .expect("publish must not block once stopped");
    }

    #[tokio::test]
    async fn test_drop_without_stop_releases_indicator() {
        let recorder = Arc::new(Recorder::default());
        {
            let reporter = ProgressReporter::with_indicator(recorder.clone(), None);
            reporter.publisher().stage("only").await;
        }
        assert_eq!(*recorder.stops.lock().unwrap(), 1);
        assert_eq!(*recorder.messages.lock().unwrap(), ["only"]);
    }

    #[tokio::test]
    async fn test_with_progress_stops_after_bail() {
        let recorder = Arc::new(Recorder::default());
        let result: anyhow::Result<()> = with_progress_on(recorder.clone(), Some("Working"), |p| async move {
            p.stage("work").await;
            anyhow::bail!("lookup failed")
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "lookup failed");
        assert_eq!(*recorder.messages.lock().unwrap(), ["work"]);
        assert_eq!(*recorder.stops.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_with_progress_stops_after_question_mark() {
        async fn fetch(p: &Publisher) -> anyhow::Result<u16> {
            p.message("fetch", "Fetching port").await;
            let port: u16 = "not-a-port".parse()?;
            p.stage("unreachable").await;
            Ok(port)
        }

        let recorder = Arc::new(Recorder::default());
        let result = with_progress_on(recorder.clone(), None, |p| async move { fetch(&p).await }).await;

        assert!(result.unwrap_err().is::<std::num::ParseIntError>());
        assert_eq!(*recorder.messages.lock().unwrap(), ["Fetching port"]);
        assert_eq!(*recorder.stops.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_with_progress_stops_on_success() {
        let recorder = Arc::new(Recorder::default());
        let value = with_progress_on(recorder.clone(), Some("Counting"), |p| async move {
            p.message("count", "1 of 1").await;
            Ok(42)
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(recorder.started.lock().unwrap().as_deref(), Some("Counting"));
        assert_eq!(*recorder.messages.lock().unwrap(), ["1 of 1"]);
        assert_eq!(*recorder.stops.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_with_progress_returns_value() {
        let value = with_progress(ProgressOptions::default(), Some("Counting"), |p| async move {
            p.message("count", "1 of 1").await;
            Ok(42)
        })
        .await
        .unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_display_message_falls_back_to_stage() {
        assert_eq!(ProgressEvent::new("fetch").display_message(), "fetch");
        assert_eq!(
            ProgressEvent::new("fetch").with_message("page 3").display_message(),
            "page 3"
        );
    }
}
