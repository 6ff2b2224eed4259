use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::core::{InlineExecutor, InterruptMode, Retry, RetryBuilder, TokioExecutor};
use crate::events::{Event, EventKind};
use crate::policies::{Failure, FailureKind, IntervalStrategy};
use crate::subscribers::Subscribe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Runtime,
    IllegalArgument,
    NumberFormat,
    Unrelated,
}

impl FailureKind for Kind {
    fn parent(&self) -> Option<Self> {
        match self {
            Kind::NumberFormat => Some(Kind::IllegalArgument),
            Kind::IllegalArgument => Some(Kind::Runtime),
            Kind::Runtime | Kind::Unrelated => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("boom: {0:?}")]
struct Boom(Kind);

impl Failure for Boom {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.0
    }
}

#[derive(Default)]
struct Recorder(Mutex<Vec<Event>>);

impl Subscribe for Recorder {
    fn on_event(&self, e: &Event) {
        self.0.lock().unwrap().push(e.clone());
    }
}

impl Recorder {
    fn kinds(&self) -> Vec<EventKind> {
        self.0.lock().unwrap().iter().map(|e| e.kind).collect()
    }

    fn find(&self, kind: EventKind) -> Option<Event> {
        self.0.lock().unwrap().iter().find(|e| e.kind == kind).cloned()
    }

    fn count(&self, kind: EventKind) -> usize {
        self.0.lock().unwrap().iter().filter(|e| e.kind == kind).count()
    }
}

/// Action whose n-th call (0-based) returns `outcome(n)`.
fn counted<T, F>(outcome: F) -> (Arc<AtomicU32>, impl Fn() -> Result<T, Boom> + Send + Sync + 'static)
where
    F: Fn(u32) -> Result<T, Boom> + Send + Sync + 'static,
{
    let calls = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&calls);
    (calls, move || outcome(c.fetch_add(1, Ordering::SeqCst)))
}

#[derive(Default)]
struct Hooks {
    success: AtomicU32,
    failure: AtomicU32,
    recover: AtomicU32,
}

fn with_hooks(builder: RetryBuilder<u32, Boom>, hooks: &Arc<Hooks>, fallback: u32) -> RetryBuilder<u32, Boom> {
    let (s, f, r) = (Arc::clone(hooks), Arc::clone(hooks), Arc::clone(hooks));
    builder
        .on_success(move |_, _| {
            s.success.fetch_add(1, Ordering::SeqCst);
        })
        .on_failure(move |_| {
            f.failure.fetch_add(1, Ordering::SeqCst);
        })
        .recover(move |_| {
            r.recover.fetch_add(1, Ordering::SeqCst);
            Some(fallback)
        })
}

#[test]
fn always_succeeding_action_runs_once() {
    let hooks = Arc::new(Hooks::default());
    let (calls, action) = counted(|_| Ok(42));
    let retry = with_hooks(Retry::of_fn(action).attempts(4), &hooks, 0)
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking(), Some(42));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.success.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.failure.load(Ordering::SeqCst), 0);
    assert_eq!(hooks.recover.load(Ordering::SeqCst), 0);
}

#[test]
fn always_failing_action_exhausts_attempts_then_recovers() {
    let hooks = Arc::new(Hooks::default());
    let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::NumberFormat)));
    let rec = Arc::new(Recorder::default());
    let retry = with_hooks(Retry::of_fn(action).attempts(4), &hooks, 99)
        .retry_on([Kind::IllegalArgument])
        .deadline(Duration::from_secs(60))
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking(), Some(99));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(hooks.failure.load(Ordering::SeqCst), 4);
    assert_eq!(hooks.success.load(Ordering::SeqCst), 0);
    assert_eq!(hooks.recover.load(Ordering::SeqCst), 1);

    assert_eq!(rec.count(EventKind::AttemptStarting), 4);
    assert_eq!(rec.count(EventKind::IntervalScheduled), 3);
    assert_eq!(rec.count(EventKind::AttemptsExhausted), 1);
    let recovered = rec.find(EventKind::Recovered).unwrap();
    assert_eq!(recovered.reason.as_deref(), Some("attempts_exhausted"));
    assert_eq!(recovered.attempt, Some(4));
}

#[tokio::test(start_paused = true)]
async fn deadline_cuts_the_loop_short() {
    let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::Runtime)));
    let rec = Arc::new(Recorder::default());
    let retry = Retry::of_fn(action)
        .attempts(4)
        .deadline(Duration::from_millis(10))
        .interval(IntervalStrategy::from_fn(|_| 1000))
        .executor(TokioExecutor::current().unwrap())
        .recover_value(7)
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.result_future().await, Some(7));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        rec.find(EventKind::Recovered).unwrap().reason.as_deref(),
        Some("deadline_exceeded")
    );
    assert_eq!(rec.count(EventKind::AttemptsExhausted), 0);
}

#[test]
fn zero_attempt_limit_still_tries_once() {
    let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::Runtime)));
    let retry = Retry::of_fn(action)
        .attempts(0)
        .recover_value(3)
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking(), Some(3));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unrelated_failure_stops_immediately() {
    let hooks = Arc::new(Hooks::default());
    let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::Unrelated)));
    let rec = Arc::new(Recorder::default());
    let retry = with_hooks(Retry::of_fn(action).attempts(10), &hooks, 5)
        .retry_on([Kind::Runtime])
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking(), Some(5));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.failure.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.recover.load(Ordering::SeqCst), 1);
    assert_eq!(
        rec.kinds(),
        vec![
            EventKind::AttemptStarting,
            EventKind::AttemptFailed,
            EventKind::NonRetryable,
            EventKind::Recovered,
        ]
    );
}

#[test]
fn unlimited_retries_until_success() {
    for k in [0u32, 1, 5, 20] {
        let hooks = Arc::new(Hooks::default());
        let (calls, action) = counted(move |n| {
            if n < k {
                Err(Boom(Kind::IllegalArgument))
            } else {
                Ok(n)
            }
        });
        let retry = with_hooks(Retry::of_fn(action).unlimited(), &hooks, 0)
            .deadline(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(retry.result_blocking(), Some(k));
        assert_eq!(calls.load(Ordering::SeqCst), k + 1);
        assert_eq!(hooks.failure.load(Ordering::SeqCst), k);
        assert_eq!(hooks.success.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.recover.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn limited_attempts_match_max_of_limit_and_one() {
    for n in [0u32, 1, 2, 7] {
        let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::Runtime)));
        let retry = Retry::of_fn(action)
            .attempts(n)
            .deadline(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(retry.result_blocking(), None);
        assert_eq!(calls.load(Ordering::SeqCst), n.max(1));
    }
}

#[tokio::test(start_paused = true)]
async fn unlimited_run_stops_at_deadline() {
    let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::Runtime)));
    let retry = Retry::of_fn(action)
        .unlimited()
        .interval(IntervalStrategy::fixed(400))
        .executor(TokioExecutor::current().unwrap())
        .build()
        .unwrap();

    assert_eq!(retry.result_future().await, None);
    // attempts at 0ms, 400ms, 800ms; 1200ms is past the 1s floor
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn completed_result_is_not_recomputed() {
    let hooks = Arc::new(Hooks::default());
    let (calls, action) = counted(|n| Ok(n + 10));
    let retry = with_hooks(Retry::of_fn(action), &hooks, 0).build().unwrap();

    assert_eq!(retry.result_blocking(), Some(10));
    assert_eq!(retry.result_blocking(), Some(10));
    retry.run();
    assert_eq!(retry.future().try_value(), Some(Some(10)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.success.load(Ordering::SeqCst), 1);
}

#[test]
fn context_reaches_success_hook_and_recovery() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    let retry = Retry::with_context(
        || async { Err::<String, _>(Boom(Kind::Runtime)) },
        String::from("order-17"),
    )
    .on_success(move |_, ctx: Option<&String>| s.lock().unwrap().push(ctx.cloned()))
    .recover(|ctx| ctx.map(|c| format!("fallback for {c}")))
    .build()
    .unwrap();

    assert_eq!(
        retry.result_blocking().as_deref(),
        Some("fallback for order-17")
    );
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(retry.policy().context().map(String::as_str), Some("order-17"));
}

#[test]
fn success_hook_runs_before_result_is_visible() {
    let observed = Arc::new(Mutex::new(None));
    let slot = Arc::new(Mutex::new(None::<crate::core::ResultFuture<u32>>));
    let (o, sl) = (Arc::clone(&observed), Arc::clone(&slot));

    let retry = Retry::of_fn(|| Ok::<_, Boom>(1))
        .on_success(move |_, _| {
            let fut = sl.lock().unwrap().clone();
            *o.lock().unwrap() = fut.map(|f| f.is_completed());
        })
        .build()
        .unwrap();
    *slot.lock().unwrap() = Some(retry.future());

    assert_eq!(retry.result_blocking(), Some(1));
    assert_eq!(*observed.lock().unwrap(), Some(false));
}

#[test]
fn failure_hook_receives_attempt_and_policy() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    let (_, action) = counted(|_| Err::<u32, _>(Boom(Kind::NumberFormat)));
    let retry = Retry::of_fn(action)
        .attempts(2)
        .on_failure(move |w| {
            s.lock().unwrap().push((
                w.attempt().index(),
                w.failure().kind(),
                w.to_string(),
            ));
        })
        .build()
        .unwrap();

    retry.run();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, 1);
    assert_eq!(seen[1].0, 2);
    assert_eq!(seen[1].1, Kind::NumberFormat);
    assert!(seen[0].2.starts_with("attempt 1 failed: boom: NumberFormat"));
    assert!(seen[0].2.contains("retry policy: RetryPolicy{"));
}

#[test]
fn panicking_subscriber_does_not_break_the_run() {
    struct Panicker;
    impl Subscribe for Panicker {
        fn on_event(&self, _: &Event) {
            panic!("subscriber failure");
        }
    }

    let retry = Retry::of_fn(|| Ok::<_, Boom>(8))
        .subscriber(Arc::new(Panicker))
        .build()
        .unwrap();
    assert_eq!(retry.result_blocking(), Some(8));
}

#[test]
fn deferred_forms_do_not_run_until_invoked() {
    let (calls, action) = counted(|n| Ok(n));
    let retry = Retry::of_fn(action).build().unwrap();

    let call = retry.callable();
    let runnable = retry.runnable();
    let deferred = retry.deferred();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!retry.future().is_completed());

    runnable();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(std::thread::spawn(call).join().unwrap(), Some(0));
    drop(deferred);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn inline_executor_completes_before_returning_inside_runtime() {
    let retry = Retry::of_fn(|| Ok::<_, Boom>(11))
        .executor(InlineExecutor)
        .build()
        .unwrap();

    let fut = retry.result_future();
    assert_eq!(fut.try_value(), Some(Some(11)));
    assert_eq!(retry.deferred().await, Some(11));
}

#[tokio::test]
async fn inline_executor_in_current_thread_runtime_is_rejected() {
    let rec = Arc::new(Recorder::default());
    let (calls, action) = counted(|n| Ok(n));
    let retry = Retry::of_fn(action)
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.deferred().await, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let rejected = rec.find(EventKind::ExecutorRejected).unwrap();
    assert!(rejected.reason.unwrap().contains("current-thread"));
}

#[tokio::test(start_paused = true)]
async fn interrupt_abandons_interruptible_run() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let rec = Arc::new(Recorder::default());
    let (calls, action) = counted(|n| {
        if n == 0 {
            Err(Boom(Kind::Runtime))
        } else {
            Ok(n)
        }
    });
    let retry = Retry::of_fn(action)
        .attempts(5)
        .deadline(Duration::from_secs(60))
        .interval(IntervalStrategy::fixed(10_000))
        .interruptible()
        .executor(TokioExecutor::current().unwrap())
        .on_failure(move |_| {
            let _ = tx.send(());
        })
        .recover_value(0)
        .subscriber(rec.clone())
        .build()
        .unwrap();

    retry.run();
    rx.recv().await.unwrap();
    retry.interrupt();
    while retry.is_running() {
        tokio::task::yield_now().await;
    }

    assert!(!retry.future().is_completed());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(rec.count(EventKind::RunAborted), 1);
    assert_eq!(rec.count(EventKind::Recovered), 0);

    // a fresh trigger starts over with a clean interruption state
    assert_eq!(retry.result_future().await, Some(1));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn interrupt_recovers_when_configured() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let rec = Arc::new(Recorder::default());
    let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::Runtime)));
    let retry = Retry::of_fn(action)
        .attempts(5)
        .deadline(Duration::from_secs(60))
        .interval(IntervalStrategy::fixed(10_000))
        .interruptible()
        .on_interrupt(InterruptMode::Recover)
        .executor(TokioExecutor::current().unwrap())
        .on_failure(move |_| {
            let _ = tx.send(());
        })
        .recover_value(21)
        .subscriber(rec.clone())
        .build()
        .unwrap();

    let fut = retry.result_future();
    rx.recv().await.unwrap();
    retry.interrupt();

    assert_eq!(fut.await, Some(21));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let recovered = rec.find(EventKind::Recovered).unwrap();
    assert_eq!(recovered.reason.as_deref(), Some("interrupted"));
}

#[tokio::test(start_paused = true)]
async fn interrupt_is_absorbed_when_not_interruptible() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let rec = Arc::new(Recorder::default());
    let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::Runtime)));
    let retry = Retry::of_fn(action)
        .attempts(3)
        .deadline(Duration::from_secs(60))
        .interval(IntervalStrategy::fixed(1000))
        .executor(TokioExecutor::current().unwrap())
        .on_failure(move |_| {
            let _ = tx.send(());
        })
        .recover_value(4)
        .subscriber(rec.clone())
        .build()
        .unwrap();

    let fut = retry.result_future();
    rx.recv().await.unwrap();
    retry.interrupt();
    retry.interrupt();

    assert_eq!(fut.await, Some(4));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let waits: Vec<_> = rec
        .0
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.kind == EventKind::WaitInterrupted)
        .map(|e| e.reason.as_deref().map(str::to_owned))
        .collect();
    assert_eq!(waits, vec![Some(String::from("absorbed"))]);
}

#[test]
fn blocking_timeout_leaves_the_run_alone() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let rec = Arc::new(Recorder::default());
    let retry = Retry::of(|| async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok::<_, Boom>(5u32)
    })
    .executor(TokioExecutor::new(rt.handle().clone()))
    .subscriber(rec.clone())
    .build()
    .unwrap();

    assert_eq!(retry.result_blocking_timeout(Duration::from_millis(20)), None);
    assert_eq!(
        rec.find(EventKind::ObserveTimeout).unwrap().delay,
        Some(Duration::from_millis(20))
    );
    assert_eq!(
        retry.future().wait_blocking(Some(Duration::from_secs(5))),
        Ok(Some(5))
    );
}

#[test]
fn concurrent_observers_share_one_run() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let calls = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&calls);
    let retry = Retry::of(move || {
        let c = Arc::clone(&c);
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, Boom>(9u32)
        }
    })
    .executor(TokioExecutor::new(rt.handle().clone()))
    .build()
    .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(retry.callable()))
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Some(9));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn async_pool_runs_in_background() {
    let retry = Retry::of_fn(|| Ok::<_, Boom>(String::from("pooled")))
        .async_pool()
        .build()
        .unwrap();

    assert_eq!(retry.policy().executor().name(), "tokio");
    let fut = retry.result_future();
    assert_eq!(
        fut.wait_blocking(Some(Duration::from_secs(5))),
        Ok(Some(String::from("pooled")))
    );
}

fn owned_pool() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn panicking_action_recovers_on_pool() {
    let rt = owned_pool();
    let rec = Arc::new(Recorder::default());
    let (calls, action) = counted(|n| -> Result<u32, Boom> {
        if n == 0 {
            panic!("action blew up");
        }
        Ok(n)
    });
    let retry = Retry::of_fn(action)
        .attempts(3)
        .deadline(Duration::from_secs(60))
        .executor(TokioExecutor::new(rt.handle().clone()))
        .recover_value(77)
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking_timeout(Duration::from_secs(5)), Some(77));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(retry.future().is_completed());

    let panicked = rec.find(EventKind::ActionPanicked).unwrap();
    assert_eq!(panicked.attempt, Some(1));
    assert_eq!(panicked.reason.as_deref(), Some("action blew up"));
    assert_eq!(
        rec.find(EventKind::Recovered).unwrap().reason.as_deref(),
        Some("action_panicked")
    );
}

#[test]
fn panicking_action_does_not_reach_caller_inline() {
    let hooks = Arc::new(Hooks::default());
    let (calls, action) = counted(|_| -> Result<u32, Boom> { panic!("inline blow-up") });
    let retry = with_hooks(Retry::of_fn(action).attempts(3), &hooks, 77)
        .build()
        .unwrap();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| retry.result_blocking()));
    assert_eq!(outcome.ok(), Some(Some(77)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.failure.load(Ordering::SeqCst), 0);
    assert_eq!(hooks.recover.load(Ordering::SeqCst), 1);
    assert!(!retry.is_running());
}

#[test]
fn panicking_success_hook_still_delivers_value() {
    let rt = owned_pool();
    let rec = Arc::new(Recorder::default());
    let retry = Retry::of_fn(|| Ok::<_, Boom>(12u32))
        .executor(TokioExecutor::new(rt.handle().clone()))
        .on_success(|_, _| panic!("success hook failed"))
        .recover_value(0)
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking_timeout(Duration::from_secs(5)), Some(12));
    let hook = rec.find(EventKind::HookPanicked).unwrap();
    assert_eq!(hook.reason.as_deref(), Some("on_success: success hook failed"));
    assert_eq!(rec.count(EventKind::Succeeded), 1);
    assert_eq!(rec.count(EventKind::Recovered), 0);
}

#[test]
fn panicking_failure_hook_keeps_retrying() {
    let rec = Arc::new(Recorder::default());
    let (calls, action) = counted(|_| Err::<u32, _>(Boom(Kind::Runtime)));
    let retry = Retry::of_fn(action)
        .attempts(3)
        .deadline(Duration::from_secs(60))
        .on_failure(|_| panic!("failure hook failed"))
        .recover_value(6)
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking(), Some(6));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(rec.count(EventKind::HookPanicked), 3);
    assert_eq!(rec.count(EventKind::AttemptsExhausted), 1);
}

#[test]
fn panicking_recovery_completes_with_none() {
    let rt = owned_pool();
    let rec = Arc::new(Recorder::default());
    let retry = Retry::of_fn(|| Err::<u32, _>(Boom(Kind::Runtime)))
        .executor(TokioExecutor::new(rt.handle().clone()))
        .recover(|_| panic!("no fallback today"))
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking_timeout(Duration::from_secs(5)), None);
    assert_eq!(retry.future().try_value(), Some(None));
    assert_eq!(
        rec.find(EventKind::HookPanicked).unwrap().reason.as_deref(),
        Some("recover: no fallback today")
    );
    assert_eq!(rec.count(EventKind::Recovered), 1);
}

#[test]
fn externally_completed_result_suppresses_succeeded() {
    let rec = Arc::new(Recorder::default());
    let slot = Arc::new(Mutex::new(None::<crate::core::ResultFuture<u32>>));
    let sl = Arc::clone(&slot);
    let retry = Retry::of_fn(move || {
        if let Some(fut) = sl.lock().unwrap().as_ref() {
            fut.complete_once(Some(5));
        }
        Ok::<_, Boom>(1u32)
    })
    .subscriber(rec.clone())
    .build()
    .unwrap();
    *slot.lock().unwrap() = Some(retry.future());

    assert_eq!(retry.result_blocking(), Some(5));
    assert_eq!(rec.count(EventKind::AttemptStarting), 1);
    assert_eq!(rec.count(EventKind::Succeeded), 0);
}

#[tokio::test]
async fn blocking_wait_inside_current_thread_runtime_is_refused() {
    let rec = Arc::new(Recorder::default());
    let (calls, action) = counted(|n| Ok(n));
    let retry = Retry::of_fn(action)
        .executor(TokioExecutor::current().unwrap())
        .subscriber(rec.clone())
        .build()
        .unwrap();

    assert_eq!(retry.result_blocking_timeout(Duration::from_secs(1)), None);
    assert_eq!(retry.result_blocking(), None);
    tokio::task::yield_now().await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!retry.future().is_completed());
    assert_eq!(rec.count(EventKind::ObserveRejected), 2);
    assert_eq!(rec.count(EventKind::ObserveTimeout), 0);
}
