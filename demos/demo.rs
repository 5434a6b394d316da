use std::sync::Arc;
use std::time::Duration;

use eventvisor::{
    Config, EventBroker, Export, Handler, HandlerError, LogPlugin, Namespace, Payload, PluginFn,
    PluginModule, PluginRef, PluginRegistry, Scheduler, TaskError, TaskFn, TaskRef,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn sample_plugin() -> PluginRef {
    PluginFn::arc("sample", |event: &str, payload: &Payload| {
        println!("[sample] event {event} -> payload={payload}");
        Ok(())
    })
}

fn plugin_namespace() -> Namespace {
    Namespace::new("demo.plugins")
        .with_module(PluginModule::from_exports(
            "sample",
            vec![
                Export::factory("SamplePlugin", || Ok(sample_plugin())),
                Export::instance(sample_plugin()),
            ],
        ))
        .with_module(PluginModule::from_exports(
            "log",
            vec![Export::instance(Arc::new(LogPlugin::new()))],
        ))
        .with_module(PluginModule::new("broken", || {
            Err("missing symbol `register`".to_string())
        }))
}

fn demo_task(name: &'static str, broker: Arc<EventBroker>) -> TaskRef {
    TaskFn::arc(name, move |_ctx: CancellationToken| {
        let broker = Arc::clone(&broker);
        async move {
            broker
                .emit("task.started", json!({ "name": name }))
                .await
                .map_err(|e| TaskError::failed(e.to_string()))?;
            tokio::time::sleep(Duration::from_millis(100)).await;
            broker
                .emit("task.finished", json!({ "name": name }))
                .await
                .map_err(|e| TaskError::failed(e.to_string()))
        }
    })
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::default().with_interval(Duration::from_millis(300));
    tracing::info!(app = %cfg.app_name, debug = cfg.debug, "starting demo");

    let broker = Arc::new(EventBroker::from_config(&cfg));
    broker.subscribe(
        "task.started",
        Handler::sync_fn("on_started", |event: &str, payload: &Payload| {
            println!("[on_started] {event}: {payload}");
            Ok::<_, HandlerError>(())
        }),
    );
    broker.subscribe(
        "task.finished",
        Handler::async_fn("on_finished", |event: String, payload: Payload| async move {
            println!("[on_finished] {event}: {payload}");
            Ok::<_, HandlerError>(())
        }),
    );

    let scheduler = Scheduler::from_config(&cfg);
    scheduler.schedule_periodic_default(TaskFn::arc("tick", |_ctx: CancellationToken| async {
        println!("[scheduler] periodic tick");
        Ok::<_, TaskError>(())
    }));

    if cfg.plugins_enabled {
        let registry = PluginRegistry::discover(&plugin_namespace());
        println!("discovered plugins: {:?}", registry.names());
        for e in registry.broadcast("init", &json!({ "cfg": { "debug": cfg.debug } })) {
            println!("plugin error: {e}");
        }
        registry.attach(&broker, "task.finished");
    }

    let t1 = scheduler.schedule_once(Duration::ZERO, demo_task("t1", Arc::clone(&broker)));
    let t2 = scheduler.schedule_once(Duration::ZERO, demo_task("t2", Arc::clone(&broker)));
    for res in futures::future::join_all([t1, t2]).await {
        if let Err(e) = res {
            println!("demo task failed: {e}");
        }
    }

    tokio::time::sleep(Duration::from_millis(700)).await;
    let cancelled = scheduler.cancel_all();
    tracing::info!(cancelled, "demo finished");
    Ok(())
}
