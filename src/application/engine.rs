//! The async dispatch shell: the only piece of this crate that touches
//! tokio directly. Owns a `JoinSet` of in-flight worker futures and a
//! `Semaphore`-gated fan-out, and is the sole caller of the graph's
//! `prepare`/`complete` methods — preserving the ordering guarantee that
//! only one completion is folded into the graph at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Semaphore};
use tokio::task::JoinSet;

use super::callback_bus::{self, Event};
use crate::domain::models::graph::{Graph, PendingDispatch};
use crate::domain::ports::CommandRunner;

/// Bundles what a run needs to reach out to the world: the worker, the
/// event sender, and a cooperative cancellation flag. Threaded through
/// `Engine::run_to_completion` rather than held as global state.
#[derive(Clone)]
pub struct RunContext {
    pub events: broadcast::Sender<Event>,
    pub worker: Arc<dyn CommandRunner>,
    cancelled: Arc<AtomicBool>,
}

impl RunContext {
    pub fn new(worker: Arc<dyn CommandRunner>) -> (Self, broadcast::Receiver<Event>) {
        let (events, rx) = callback_bus::channel();
        (
            Self {
                events,
                worker,
                cancelled: Arc::new(AtomicBool::new(false)),
            },
            rx,
        )
    }

    /// Stop dispatching new actions. Already-running actions are left to
    /// complete or time out; nothing forcibly kills them.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Drives one `Graph` through `action_name` to completion.
///
/// The fan-out bound here is a single process-wide `Semaphore`, sized from
/// the run's top-level fanout setting. The original engine recomputes an
/// effective fan-out as the minimum over every currently-running service's
/// own fanout; this crate approximates that with one fixed bound for the
/// whole run rather than a dynamically resized semaphore (see `DESIGN.md`).
pub struct Engine {
    ctx: RunContext,
    fanout: Arc<Semaphore>,
}

impl Engine {
    pub fn new(ctx: RunContext, fanout: u32) -> Self {
        Self {
            ctx,
            fanout: Arc::new(Semaphore::new(fanout.max(1) as usize)),
        }
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub async fn run_to_completion(&self, graph: &mut Graph, action_name: &str) {
        let mut join_set: JoinSet<(PendingDispatch, crate::domain::ports::WorkerOutcome)> = JoinSet::new();
        let mut ready = graph.prepare(action_name, Utc::now());
        self.publish_graph_events(graph);

        loop {
            if !self.ctx.is_cancelled() {
                for dispatch in ready.drain(..) {
                    if !dispatch.simulate {
                        let _ = self.ctx.events.send(Event::Started {
                            path: dispatch.path.clone(),
                            action: dispatch.action.clone(),
                        });
                    }
                    let permit = self.fanout.clone().acquire_owned().await.expect("semaphore never closed");
                    let worker = self.ctx.worker.clone();
                    join_set.spawn(async move {
                        if dispatch.delay > 0.0 {
                            tokio::time::sleep(Duration::from_secs_f64(dispatch.delay)).await;
                        }
                        let outcome = worker.execute(&dispatch.command, &dispatch.target, dispatch.timeout).await;
                        drop(permit);
                        (dispatch, outcome)
                    });
                }
            } else {
                ready.clear();
            }

            let Some(finished) = join_set.join_next().await else {
                break;
            };
            let (dispatch, outcome) = finished.expect("worker task panicked");
            if !dispatch.simulate {
                let _ = self.ctx.events.send(Event::Complete {
                    path: dispatch.path.clone(),
                    action: dispatch.action.clone(),
                });
            }
            ready = graph.complete(&dispatch.path, &dispatch.action, &outcome, Utc::now());
            self.publish_graph_events(graph);
        }
    }

    /// Drain every status/trigger notice the graph has accumulated since the
    /// last call and publish them on the run's event bus.
    fn publish_graph_events(&self, graph: &mut Graph) {
        let (statuses, triggers) = graph.drain_events();
        for s in statuses {
            let _ = self.ctx.events.send(Event::StatusChanged { path: s.path, status: s.status });
        }
        for t in triggers {
            let _ = self.ctx.events.send(Event::TriggerDep { from: t.from, to: t.to });
        }
    }
}
