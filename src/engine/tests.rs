use super::*;
use crate::args::PositiveUsize;
use crate::error::CaseError;
use crate::runner::CaseContext;
use crate::suite::{Request, TestCase};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

#[derive(Default)]
struct StubRunner {
    calls: Mutex<Vec<String>>,
    failing_case: Option<&'static str>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StubRunner {
    fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CaseRunner for StubRunner {
    async fn run_case(
        &self,
        case: &mut TestCase,
        context: CaseContext<'_>,
    ) -> Result<Value, CaseError> {
        case.resolve_api(context.base_api);
        case.request.render(context.data)?;
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(case.request.api.clone());
        }
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.peak.fetch_max(running, Ordering::SeqCst);
        let cancelled = if self.delay.is_zero() {
            false
        } else {
            tokio::select! {
                biased;
                () = context.cancel.triggered() => true,
                () = tokio::time::sleep(self.delay) => false,
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if cancelled {
            return Err(CaseError::Cancelled);
        }
        if self.failing_case == Some(case.name.as_str()) {
            return Err(CaseError::StatusMismatch {
                expected: 200,
                actual: 500,
            });
        }
        Ok(json!({"name": case.name, "api": case.request.api}))
    }
}

fn suite(api: &str, cases: &[(&str, &str)]) -> Arc<TestSuite> {
    Arc::new(TestSuite {
        name: "suite".to_owned(),
        api: api.to_owned(),
        items: cases
            .iter()
            .map(|(name, case_api)| TestCase {
                name: (*name).to_owned(),
                request: Request {
                    api: (*case_api).to_owned(),
                    ..Request::default()
                },
                ..TestCase::default()
            })
            .collect(),
    })
}

fn policy(thread: usize, duration: Duration, ignore_error: bool) -> Result<RunPolicy, String> {
    Ok(RunPolicy {
        thread: PositiveUsize::try_from(thread).map_err(|err| err.to_string())?,
        qps: 0,
        burst: 0,
        duration,
        request_timeout: Duration::from_secs(1),
        ignore_error,
        start_time: chrono::Local::now(),
    })
}

fn engine(policy: RunPolicy, runner: &Arc<StubRunner>, cancel: &StopSignal) -> Engine {
    Engine::new(
        policy,
        runner.clone(),
        Arc::new(RateLimiter::pass_through()),
        cancel.clone(),
    )
}

#[test]
fn single_pass_runs_each_case_once_in_order() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner::default());
        let engine = engine(policy(4, Duration::ZERO, false)?, &runner, &StopSignal::new());
        let outcome = engine
            .run_suite(suite("http://h/", &[("a", "/a"), ("b", "/b"), ("c", "/c")]))
            .await
            .map_err(|err| err.to_string())?;

        if outcome
            != (RunOutcome {
                state: RunState::Completed,
                passes: 1,
            })
        {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        let expected = vec!["http://h/a", "http://h/b", "http://h/c"];
        if runner.calls() != expected {
            return Err(format!("Unexpected calls: {:?}", runner.calls()));
        }
        Ok(())
    })
}

#[test]
fn later_cases_see_earlier_outputs() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner::default());
        let engine = engine(policy(1, Duration::ZERO, false)?, &runner, &StopSignal::new());
        engine
            .run_suite(suite(
                "http://h",
                &[
                    ("get-user", "/users"),
                    ("b", "/by-name/{{ ctx[\"get-user\"].name }}"),
                    ("c", "{{ b.api }}/next"),
                ],
            ))
            .await
            .map_err(|err| err.to_string())?;

        let expected = vec![
            "http://h/users",
            "http://h/by-name/get-user",
            "http://h/by-name/get-user/next",
        ];
        if runner.calls() != expected {
            return Err(format!("Unexpected calls: {:?}", runner.calls()));
        }
        Ok(())
    })
}

#[test]
fn base_api_render_failure_aborts() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner::default());
        let engine = engine(policy(1, Duration::ZERO, false)?, &runner, &StopSignal::new());
        let result = engine
            .run_suite(suite("http://{{ host }}/", &[("a", "/a")]))
            .await;
        match result {
            Err(EngineError::BaseApi { .. }) => {}
            other => return Err(format!("Expected base API failure, got {:?}", other)),
        }
        if !runner.calls().is_empty() {
            return Err("No case should run without a base API".to_owned());
        }
        Ok(())
    })
}

#[test]
fn first_error_halts_the_pass() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner {
            failing_case: Some("b"),
            ..StubRunner::default()
        });
        let engine = engine(policy(1, Duration::ZERO, false)?, &runner, &StopSignal::new());
        let result = engine
            .run_suite(suite("http://h", &[("a", "/a"), ("b", "/b"), ("c", "/c")]))
            .await;
        match result {
            Err(EngineError::CaseFailed { case, .. }) if case == "b" => {}
            other => return Err(format!("Expected case b to fail, got {:?}", other)),
        }
        if runner.calls() != vec!["http://h/a", "http://h/b"] {
            return Err(format!("Unexpected calls: {:?}", runner.calls()));
        }
        Ok(())
    })
}

#[test]
fn ignore_mode_runs_every_case() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner {
            failing_case: Some("b"),
            ..StubRunner::default()
        });
        let engine = engine(policy(1, Duration::ZERO, true)?, &runner, &StopSignal::new());
        let outcome = engine
            .run_suite(suite("http://h", &[("a", "/a"), ("b", "/b"), ("c", "/c")]))
            .await
            .map_err(|err| err.to_string())?;
        if outcome.state != RunState::Completed {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if runner.calls().len() != 3 {
            return Err(format!("Unexpected calls: {:?}", runner.calls()));
        }
        Ok(())
    })
}

#[test]
fn ignore_mode_skips_render_failure_with_null_output() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner::default());
        let engine = engine(policy(1, Duration::ZERO, true)?, &runner, &StopSignal::new());
        let outcome = engine
            .run_suite(suite(
                "http://h",
                &[("a", "/{{ missing }}"), ("b", "/b/{{ a | json_encode() }}")],
            ))
            .await
            .map_err(|err| err.to_string())?;
        if outcome.state != RunState::Completed {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if runner.calls() != vec!["http://h/b/null"] {
            return Err(format!("Unexpected calls: {:?}", runner.calls()));
        }
        Ok(())
    })
}

#[test]
fn render_failure_aborts_without_ignore_mode() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner::default());
        let engine = engine(policy(1, Duration::ZERO, false)?, &runner, &StopSignal::new());
        let result = engine
            .run_suite(suite(
                "http://h",
                &[("a", "/{{ missing }}"), ("b", "/b")],
            ))
            .await;
        match result {
            Err(EngineError::CaseFailed {
                source: CaseError::Render(_),
                ..
            }) => {}
            other => return Err(format!("Expected render failure, got {:?}", other)),
        }
        if !runner.calls().is_empty() {
            return Err(format!("Unexpected calls: {:?}", runner.calls()));
        }
        Ok(())
    })
}

#[test]
fn concurrent_passes_stay_within_thread_count() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner {
            delay: Duration::from_millis(20),
            ..StubRunner::default()
        });
        let engine = engine(
            policy(3, Duration::from_millis(300), false)?,
            &runner,
            &StopSignal::new(),
        );
        let outcome = engine
            .run_suite(suite("http://h", &[("a", "/a"), ("b", "/b")]))
            .await
            .map_err(|err| err.to_string())?;
        if outcome.state != RunState::TimedOut {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }

        let peak = runner.peak.load(Ordering::SeqCst);
        if !(2..=3).contains(&peak) {
            return Err(format!("Expected between 2 and 3 passes at once, saw {}", peak));
        }
        Ok(())
    })
}

#[test]
fn duration_mode_times_out_and_drains() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner {
            delay: Duration::from_millis(20),
            ..StubRunner::default()
        });
        let engine = engine(
            policy(2, Duration::from_millis(300), false)?,
            &runner,
            &StopSignal::new(),
        );
        let outcome = engine
            .run_suite(suite("http://h", &[("a", "/a"), ("b", "/b")]))
            .await
            .map_err(|err| err.to_string())?;
        if outcome.state != RunState::TimedOut {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if outcome.passes < 2 {
            return Err(format!("Expected repeated passes, got {}", outcome.passes));
        }

        let after_return = runner.calls().len();
        tokio::time::sleep(Duration::from_millis(100)).await;
        if runner.calls().len() != after_return {
            return Err("Cases ran after the engine returned".to_owned());
        }
        Ok(())
    })
}

#[test]
fn cancellation_aborts_in_flight_case() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner {
            delay: Duration::from_secs(10),
            ..StubRunner::default()
        });
        let cancel = StopSignal::new();
        let engine = engine(policy(1, Duration::ZERO, false)?, &runner, &cancel);
        let trigger = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                cancel.trigger();
            })
        };

        let outcome = tokio::time::timeout(
            Duration::from_secs(2),
            engine.run_suite(suite("http://h", &[("a", "/a"), ("b", "/b")])),
        )
        .await
        .map_err(|_elapsed| "Cancellation did not stop the run".to_owned())?
        .map_err(|err| err.to_string())?;
        trigger
            .await
            .map_err(|err| format!("Trigger task failed: {}", err))?;

        if outcome.state != RunState::Aborted {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if runner.calls() != vec!["http://h/a"] {
            return Err(format!("Unexpected calls: {:?}", runner.calls()));
        }
        Ok(())
    })
}

#[test]
fn cancellation_releases_rate_limited_pass() -> Result<(), String> {
    run_async_test(async {
        let runner = Arc::new(StubRunner::default());
        let cancel = StopSignal::new();
        let engine = Engine::new(
            policy(1, Duration::ZERO, false)?,
            runner.clone(),
            Arc::new(RateLimiter::new(1, 1)),
            cancel.clone(),
        );
        let trigger = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                cancel.trigger();
            })
        };

        let outcome = tokio::time::timeout(
            Duration::from_millis(800),
            engine.run_suite(suite("http://h", &[("a", "/a"), ("b", "/b"), ("c", "/c")])),
        )
        .await
        .map_err(|_elapsed| "Cancellation did not release the limiter".to_owned())?
        .map_err(|err| err.to_string())?;
        trigger
            .await
            .map_err(|err| format!("Trigger task failed: {}", err))?;

        if outcome.state != RunState::Aborted || runner.calls().len() != 1 {
            return Err(format!(
                "Unexpected outcome {:?} with calls {:?}",
                outcome,
                runner.calls()
            ));
        }
        Ok(())
    })
}

#[test]
fn data_context_keeps_last_write() -> Result<(), String> {
    let data = DataContext::new();
    if !data.is_empty() {
        return Err("Expected an empty context".to_owned());
    }
    data.insert("a".to_owned(), json!(1));
    data.insert("a".to_owned(), json!(2));
    data.insert("b".to_owned(), Value::Null);
    if data.get("a") != Some(json!(2)) || data.len() != 2 {
        return Err(format!("Unexpected context: {}", data.snapshot()));
    }
    if data.snapshot() != json!({"a": 2, "b": null}) {
        return Err(format!("Unexpected snapshot: {}", data.snapshot()));
    }
    Ok(())
}
