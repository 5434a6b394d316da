//! End-to-end scenarios across broker, scheduler and plugins.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use eventvisor::{
    Config, ErrorPolicy, EventBroker, Export, Handler, HandlerError, Namespace, Payload,
    PluginError, PluginFn, PluginModule, PluginRegistry, Scheduler, TaskError, TaskFn, discover,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::fmt::MakeWriter;

/// Captures formatted log output.
#[derive(Clone, Default)]
struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).to_string()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a subscriber writing into the returned buffer.
fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (String, R) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), out)
}

#[tokio::test]
async fn task_started_reaches_sync_and_async_handlers() {
    let broker = EventBroker::new();
    let seen: Arc<Mutex<Vec<(String, Payload)>>> = Arc::default();

    let sync_seen = Arc::clone(&seen);
    broker.subscribe(
        "task.started",
        Handler::sync_fn("record", move |event: &str, payload: &Payload| {
            sync_seen.lock().push((event.to_string(), payload.clone()));
            Ok::<_, HandlerError>(())
        }),
    );
    let async_seen = Arc::clone(&seen);
    broker.subscribe(
        "task.started",
        Handler::async_fn("record-async", move |event: String, payload: Payload| {
            let seen = Arc::clone(&async_seen);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                seen.lock().push((format!("async:{event}"), payload));
                Ok::<_, HandlerError>(())
            }
        }),
    );

    broker
        .emit("task.started", json!({"name": "t1"}))
        .await
        .unwrap();

    let mut got = seen.lock().clone();
    got.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        got,
        vec![
            ("async:task.started".to_string(), json!({"name": "t1"})),
            ("task.started".to_string(), json!({"name": "t1"})),
        ]
    );

    // Nothing subscribed: completes immediately.
    broker.emit("task.unknown", json!(null)).await.unwrap();
}

#[tokio::test]
async fn failing_handler_does_not_starve_peers() {
    let cfg = Config::default().with_emit_errors(ErrorPolicy::LogAndContinue);
    let broker = EventBroker::from_config(&cfg);
    let hits = Arc::new(AtomicUsize::new(0));

    broker.subscribe(
        "e",
        Handler::sync_fn("bad", |_: &str, _: &Payload| Err(HandlerError::failed("nope"))),
    );
    let h = Arc::clone(&hits);
    broker.subscribe(
        "e",
        Handler::sync_fn("good", move |_: &str, _: &Payload| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );

    broker.emit("e", json!(1)).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn scheduled_task_emits_through_broker() {
    let broker = Arc::new(EventBroker::new());
    let started = Arc::new(AtomicUsize::new(0));

    let s = Arc::clone(&started);
    broker.subscribe(
        "task.started",
        Handler::async_fn("count", move |_: String, _: Payload| {
            let s = Arc::clone(&s);
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HandlerError>(())
            }
        }),
    );

    let scheduler = Scheduler::from_config(&Config::default().with_interval(Duration::from_millis(100)));
    let b = Arc::clone(&broker);
    let handle = scheduler.schedule_periodic_default(TaskFn::arc("emitter", move |_ctx: CancellationToken| {
        let b = Arc::clone(&b);
        async move {
            b.emit("task.started", json!({"name": "emitter"}))
                .await
                .map_err(|e| TaskError::failed(e.to_string()))
        }
    }));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(scheduler.cancel_all(), 1);
    handle.await.unwrap();

    // Fires at 0, 100 and 200 ms.
    assert_eq!(started.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn once_failure_is_observed_by_awaiter() {
    let scheduler = Scheduler::new();
    let handle = scheduler.schedule_once(
        Duration::from_millis(50),
        TaskFn::arc("fails", |_ctx: CancellationToken| async move {
            Err::<(), _>(TaskError::failed("disk full"))
        }),
    );
    assert_eq!(handle.await, Err(TaskError::failed("disk full")));
}

#[test]
fn discovery_warns_about_broken_module_and_keeps_good_one() {
    let ns = Namespace::new("app.plugins")
        .with_module(PluginModule::new("broken", || {
            Err("cannot import name 'Missing'".to_string())
        }))
        .with_module(PluginModule::from_exports(
            "sample",
            vec![Export::factory("SamplePlugin", || {
                Ok(PluginFn::arc("sample", |_: &str, _: &Payload| Ok(())))
            })],
        ));

    let (logs, found) = with_captured_logs(|| discover(&ns));

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "sample");
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("broken"), "logs: {logs}");
    assert!(logs.contains("cannot import name"), "logs: {logs}");
}

#[tokio::test]
async fn plugins_receive_broadcast_and_broker_events() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let s = Arc::clone(&seen);
    let ns = Namespace::new("app.plugins").with_module(PluginModule::from_exports(
        "sample",
        vec![
            Export::instance(PluginFn::arc("recorder", move |event: &str, _: &Payload| {
                s.lock().push(event.to_string());
                Ok(())
            })),
            Export::instance(PluginFn::arc("grumpy", |_: &str, _: &Payload| {
                Err(PluginError::EventFailed {
                    plugin: "grumpy".into(),
                    error: "not today".into(),
                })
            })),
        ],
    ));

    let registry = PluginRegistry::discover(&ns);
    let failures = registry.broadcast("init", &json!({"debug": false}));
    assert_eq!(failures.len(), 1);

    let broker = EventBroker::with_error_policy(ErrorPolicy::LogAndContinue);
    registry.attach(&broker, "task.finished");
    broker.emit("task.finished", json!({"name": "t1"})).await.unwrap();

    assert_eq!(
        *seen.lock(),
        vec!["init".to_string(), "task.finished".to_string()]
    );
}
