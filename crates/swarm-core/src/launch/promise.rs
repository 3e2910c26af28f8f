//! Promise chains: one body, then exactly one continuation

use crate::launch::{settle, spawn, spawn_unit, Completion};
use crate::runtime::Shared;
use crate::{Resolver, SyncError, SyncResult};
use std::sync::Arc;

/// Label prefix used when the caller does not name the promise
pub(crate) const DEFAULT_LABEL: &str = "Promise";

/// The three phases of one promise, each with a single completion slot
struct Phases {
    init: Completion,
    then: Completion,
    catch: Completion,
}

impl Phases {
    fn new(label: &str) -> Self {
        Self {
            init: Completion::new(format!("{} Init", label), 1),
            then: Completion::new(format!("{} Then", label), 1),
            catch: Completion::new(format!("{} Catch", label), 1),
        }
    }
}

/// Register with the barrier and start the promise chain.
pub(crate) fn launch<B, S, C>(
    shared: &Arc<Shared>,
    label: &str,
    body: B,
    on_success: S,
    on_failure: C,
) -> SyncResult<()>
where
    B: FnOnce(Resolver) + Send + 'static,
    S: FnOnce(Resolver) + Send + 'static,
    C: FnOnce(Resolver) + Send + 'static,
{
    let phases = Phases::new(label);

    shared.barrier.add();
    shared.counters.launch_started();

    let supervisor = Arc::clone(shared);
    let started = spawn(&shared.options, "promise", move || {
        supervise(&supervisor, phases, body, on_success, on_failure)
    });

    if let Err(err) = started {
        shared.counters.launch_abandoned();
        shared.barrier.done();
        return Err(SyncError::Spawn(err));
    }
    Ok(())
}

fn supervise<B, S, C>(shared: &Shared, phases: Phases, body: B, on_success: S, on_failure: C)
where
    B: FnOnce(Resolver) + Send + 'static,
    S: FnOnce(Resolver) + Send + 'static,
    C: FnOnce(Resolver) + Send + 'static,
{
    spawn_unit(shared, &phases.init, "init", body);

    // The body's outcome picks the branch; it is not reported as an error.
    if phases.init.recv() {
        spawn_unit(shared, &phases.then, "then", on_success);
        settle(shared, &phases.then);
    } else {
        spawn_unit(shared, &phases.catch, "catch", on_failure);
        settle(shared, &phases.catch);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Event, MemorySink, Runtime, RuntimeOptions, SyncError};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn recording_runtime() -> (Arc<MemorySink>, Runtime) {
        let sink = Arc::new(MemorySink::new());
        let runtime = Runtime::with_sink(RuntimeOptions::default().logs(true), sink.clone());
        (sink, runtime)
    }

    #[test]
    fn test_success_branch_labels() {
        let (sink, runtime) = recording_runtime();

        runtime
            .promise(|res| res.resolve(), |res| res.resolve(), |res| res.resolve())
            .unwrap();
        runtime.wait_all();

        assert_eq!(sink.count(&Event::Done("Promise Then".to_string())), 1);
        assert_eq!(sink.count(&Event::Done("Promise Catch".to_string())), 0);
    }

    #[test]
    fn test_rejected_body_not_reported_as_error() {
        let (sink, runtime) = recording_runtime();

        runtime
            .promise(|res| res.reject(), |res| res.resolve(), |res| res.resolve())
            .unwrap();
        runtime.wait_all();

        assert_eq!(sink.count(&Event::Failed("Promise Init".to_string())), 0);
        assert_eq!(sink.count(&Event::Done("Promise Catch".to_string())), 1);
        assert_eq!(runtime.stats().failures, 0);
    }

    #[test]
    fn test_labeled_phases() {
        let (sink, runtime) = recording_runtime();
        let saw_label = Arc::new(AtomicBool::new(false));

        let flag = saw_label.clone();
        runtime
            .promise_labeled(
                "fetch",
                |res| res.resolve(),
                move |res| {
                    flag.store(res.label() == "fetch Then", Ordering::SeqCst);
                    res.reject();
                },
                |res| res.resolve(),
            )
            .unwrap();
        runtime.wait_all();

        assert!(saw_label.load(Ordering::SeqCst));
        assert_eq!(sink.count(&Event::Failed("fetch Then".to_string())), 1);
        assert_eq!(sink.count(&Event::Done("fetch Then".to_string())), 1);
    }

    #[test]
    fn test_unspawnable_promise_releases_barrier() {
        let runtime = Runtime::with_options(RuntimeOptions::default().thread_name("bad\0name"));
        let result =
            runtime.promise(|res| res.resolve(), |res| res.resolve(), |res| res.resolve());

        assert!(matches!(result, Err(SyncError::Spawn(_))));
        assert_eq!(runtime.stats().outstanding, 0);
        assert!(runtime.wait_all_timeout(Duration::from_millis(200)));
    }
}
