use dashdeck::loader::{
    ActivateOutcome, LoadErrorKind, LoaderSettings, SectionLoader, SectionOrchestrator,
    SectionStatus, SharedFetch, StartOutcome, DEFAULT_TIMEOUT_MESSAGE,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::sleep;
use tokio_test::assert_ok;

#[derive(Debug, Clone, PartialEq)]
struct Summary {
    count: u32,
}

fn delayed(calls: &Arc<AtomicUsize>, delay: Duration, count: u32) -> SharedFetch<Summary> {
    let calls = Arc::clone(calls);
    Arc::new(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            sleep(delay).await;
            Ok::<Summary, anyhow::Error>(Summary { count })
        }
    })
}

fn never(calls: &Arc<AtomicUsize>) -> SharedFetch<Summary> {
    let calls = Arc::clone(calls);
    Arc::new(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<anyhow::Result<Summary>>()
    })
}

fn eight_seconds() -> LoaderSettings {
    LoaderSettings::default().with_timeout(Duration::from_millis(8000))
}

#[tokio::test(start_paused = true)]
async fn resolves_after_1200ms_with_payload() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = SectionLoader::new(
        "overview",
        delayed(&calls, Duration::from_millis(1200), 3),
        eight_seconds(),
    );

    assert_eq!(loader.start(), StartOutcome::Started);
    sleep(Duration::from_millis(1199)).await;
    assert_eq!(loader.status(), SectionStatus::Loading);

    sleep(Duration::from_millis(2)).await;
    let state = loader.state();
    assert_eq!(state.status, SectionStatus::Ready);
    assert_eq!(state.data, Some(Summary { count: 3 }));
    assert!(state.loaded_once);
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn never_resolving_fetch_times_out_at_8000ms() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = SectionLoader::new("overview", never(&calls), eight_seconds());

    loader.start();
    sleep(Duration::from_millis(7999)).await;
    assert_eq!(loader.status(), SectionStatus::Loading);

    sleep(Duration::from_millis(2)).await;
    let state = loader.state();
    assert_eq!(state.status, SectionStatus::Error);
    assert_eq!(state.error_message(), Some(DEFAULT_TIMEOUT_MESSAGE));
    assert_eq!(
        state.error.as_ref().map(|error| error.kind()),
        Some(LoadErrorKind::Timeout)
    );
    assert!(!state.loaded_once);
}

#[tokio::test(start_paused = true)]
async fn no_mutation_after_dispose() {
    let (release, gate) = oneshot::channel::<()>();
    let gate = Arc::new(tokio::sync::Mutex::new(Some(gate)));
    let fetch: SharedFetch<Summary> = Arc::new(move || {
        let gate = Arc::clone(&gate);
        async move {
            if let Some(gate) = gate.lock().await.take() {
                let _ = gate.await;
            }
            Ok::<Summary, anyhow::Error>(Summary { count: 9 })
        }
    });
    let loader = SectionLoader::new("expenses", fetch, eight_seconds());

    loader.start();
    sleep(Duration::from_millis(10)).await;
    loader.dispose();
    let _ = release.send(());
    sleep(Duration::from_millis(10_000)).await;

    let state = loader.state();
    assert_eq!(state.status, SectionStatus::Loading);
    assert!(state.data.is_none());
    assert!(state.error.is_none());
    assert!(loader.is_disposed());
}

#[tokio::test(start_paused = true)]
async fn no_timeout_after_dispose() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = SectionLoader::new("expenses", never(&calls), eight_seconds());

    loader.start();
    sleep(Duration::from_millis(100)).await;
    loader.dispose();
    sleep(Duration::from_millis(10_000)).await;

    let state = loader.state();
    assert_eq!(state.status, SectionStatus::Loading);
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn start_while_loading_is_a_noop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = SectionLoader::new(
        "invoices",
        delayed(&calls, Duration::from_millis(6000), 1),
        eight_seconds(),
    );

    loader.start();
    sleep(Duration::from_millis(5000)).await;
    assert_eq!(loader.start(), StartOutcome::AlreadyLoading);
    assert_eq!(loader.retry(), StartOutcome::AlreadyLoading);

    // The original timer keeps running: 6000ms < 8000ms, so the first attempt wins
    sleep(Duration::from_millis(1001)).await;
    assert_eq!(loader.status(), SectionStatus::Ready);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(loader.state().attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn restart_does_not_reset_the_timeout() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = SectionLoader::new("invoices", never(&calls), eight_seconds());

    loader.start();
    sleep(Duration::from_millis(7000)).await;
    loader.start();
    sleep(Duration::from_millis(1001)).await;

    assert_eq!(loader.status(), SectionStatus::Error);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_wins_over_a_late_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = SectionLoader::new(
        "reports",
        delayed(&calls, Duration::from_millis(9000), 5),
        eight_seconds(),
    );

    loader.start();
    sleep(Duration::from_millis(12_000)).await;

    let state = loader.state();
    assert_eq!(state.status, SectionStatus::Error);
    assert_eq!(state.error_message(), Some(DEFAULT_TIMEOUT_MESSAGE));
    assert!(state.data.is_none());
}

#[tokio::test(start_paused = true)]
async fn success_cancels_the_timeout() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = SectionLoader::new(
        "reports",
        delayed(&calls, Duration::from_millis(500), 5),
        eight_seconds(),
    );

    loader.start();
    sleep(Duration::from_millis(600)).await;
    assert_eq!(loader.status(), SectionStatus::Ready);

    sleep(Duration::from_millis(20_000)).await;
    let state = loader.state();
    assert_eq!(state.status, SectionStatus::Ready);
    assert!(state.error.is_none());
    assert_eq!(state.data, Some(Summary { count: 5 }));
}

#[tokio::test(start_paused = true)]
async fn early_failure_is_not_replaced_by_a_timeout() {
    let fetch: SharedFetch<Summary> = Arc::new(|| async {
        sleep(Duration::from_millis(300)).await;
        Err::<Summary, _>(anyhow::anyhow!("ledger unavailable"))
    });
    let loader = SectionLoader::new(
        "expenses",
        fetch,
        eight_seconds().with_failure_message("failed to load expense data"),
    );

    loader.start();
    sleep(Duration::from_millis(400)).await;
    assert_eq!(loader.status(), SectionStatus::Error);

    sleep(Duration::from_millis(10_000)).await;
    let state = loader.state();
    assert_eq!(state.status, SectionStatus::Error);
    let error = state.error.expect("failure recorded");
    assert_eq!(error.kind(), LoadErrorKind::Failed);
    assert_eq!(error.message(), "failed to load expense data");
    assert_eq!(state.attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn retry_from_error_reaches_ready_and_clears_message() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let fetch: SharedFetch<Summary> = Arc::new(move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt == 0 {
                Err(anyhow::anyhow!("upstream 503"))
            } else {
                Ok(Summary { count: 2 })
            }
        }
    });
    let loader = SectionLoader::new(
        "expenses",
        fetch,
        eight_seconds().with_failure_message("failed to load expense data"),
    );

    loader.start();
    sleep(Duration::from_millis(1)).await;
    assert_eq!(loader.status(), SectionStatus::Error);
    assert_eq!(
        loader.state().error_message(),
        Some("failed to load expense data")
    );

    assert_eq!(loader.retry(), StartOutcome::Started);
    assert_eq!(loader.status(), SectionStatus::Loading);
    assert!(loader.state().error.is_none());

    sleep(Duration::from_millis(1)).await;
    let state = loader.state();
    assert_eq!(state.status, SectionStatus::Ready);
    assert_eq!(state.data, Some(Summary { count: 2 }));
    assert!(state.error_message().is_none());
    assert_eq!(state.attempts, 2);
}

#[tokio::test(start_paused = true)]
async fn activating_a_loaded_section_twice_fetches_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = SectionOrchestrator::builder()
        .section("overview", delayed(&calls, Duration::from_millis(300), 1), eight_seconds())
        .section("expenses", delayed(&calls, Duration::from_millis(300), 2), eight_seconds())
        .build()
        .unwrap();

    assert_ok!(orchestrator.activate("overview"));
    sleep(Duration::from_millis(1000)).await;
    assert!(orchestrator.section_state("overview").unwrap().loaded_once);

    assert_eq!(
        orchestrator.activate("overview").unwrap(),
        ActivateOutcome::AlreadyLoaded
    );
    assert_eq!(
        orchestrator.activate("overview").unwrap(),
        ActivateOutcome::AlreadyLoaded
    );
    sleep(Duration::from_millis(1000)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retry_section_refetches_a_ready_section() {
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = SectionOrchestrator::builder()
        .section("overview", delayed(&calls, Duration::from_millis(300), 1), eight_seconds())
        .build()
        .unwrap();

    orchestrator.activate("overview").unwrap();
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(
        orchestrator.section_state("overview").unwrap().status,
        SectionStatus::Ready
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(
        orchestrator.retry_section("overview").unwrap(),
        StartOutcome::Started
    );
    sleep(Duration::from_millis(1000)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        orchestrator.section_state("overview").unwrap().status,
        SectionStatus::Ready
    );
}

#[tokio::test(start_paused = true)]
async fn rapid_tab_flipping_fetches_overview_once() {
    let overview_calls = Arc::new(AtomicUsize::new(0));
    let expense_calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = SectionOrchestrator::builder()
        .section(
            "overview",
            delayed(&overview_calls, Duration::from_millis(1200), 1),
            eight_seconds(),
        )
        .section(
            "expenses",
            delayed(&expense_calls, Duration::from_millis(1200), 2),
            eight_seconds(),
        )
        .build()
        .unwrap();

    assert_eq!(
        orchestrator.activate("overview").unwrap(),
        ActivateOutcome::Scheduled
    );
    orchestrator.activate("expenses").unwrap();
    assert_eq!(
        orchestrator.activate("overview").unwrap(),
        ActivateOutcome::AlreadyScheduled
    );

    sleep(Duration::from_millis(200)).await;
    assert_eq!(
        orchestrator.activate("overview").unwrap(),
        ActivateOutcome::InFlight
    );

    sleep(Duration::from_millis(2000)).await;
    assert_eq!(overview_calls.load(Ordering::SeqCst), 1);
    assert_eq!(expense_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        orchestrator.section_state("overview").unwrap().data,
        Some(Summary { count: 1 })
    );
}

#[tokio::test(start_paused = true)]
async fn failed_section_is_retried_when_revisited() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let fetch: SharedFetch<Summary> = Arc::new(move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt == 0 {
                Err(anyhow::anyhow!("flaky"))
            } else {
                Ok(Summary { count: 4 })
            }
        }
    });
    let orchestrator = SectionOrchestrator::builder()
        .section("payroll", fetch, eight_seconds())
        .activation_delay(Duration::ZERO)
        .build()
        .unwrap();

    orchestrator.activate("payroll").unwrap();
    sleep(Duration::from_millis(1)).await;
    assert_eq!(orchestrator.active_state().status, SectionStatus::Error);

    assert_eq!(
        orchestrator.activate("payroll").unwrap(),
        ActivateOutcome::Started
    );
    sleep(Duration::from_millis(1)).await;
    assert_eq!(orchestrator.active_state().status, SectionStatus::Ready);
}
