use gova_core::prelude::*;
use gova_store::MockGraphStore;
use gova_test_utils::{post_label, seeded_store, setup_controller, user_label, user_properties};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_newer_refresh_supersedes_older() {
    let store = seeded_store(2).await;
    store.set_fetch_delay(&user_label(), Duration::from_secs(10));
    let admin = setup_controller(Arc::clone(&store) as Arc<dyn GraphStore>);

    let older = admin.refresh_in_background();
    tokio::task::yield_now().await;
    store.seed(&user_label(), [user_properties("late", "l@x.com")]).await;
    let newer = admin.refresh_in_background();

    assert_eq!(older.wait().await.unwrap_err(), ControllerError::Cancelled);
    assert_eq!(newer.wait().await.unwrap(), Ok(FetchOutcome::Loaded(3)));
    assert_eq!(admin.rows().len(), 3);
    assert!(!admin.snapshot().loading);
}

#[tokio::test]
async fn test_overlapping_fetches_leave_one_complete_result() {
    let store = seeded_store(0).await;
    let admin = setup_controller(Arc::clone(&store) as Arc<dyn GraphStore>);

    let mut handles = Vec::new();
    for i in 0..10 {
        store
            .seed(&user_label(), [user_properties(&format!("n{i}"), "n@x.com")])
            .await;
        handles.push(admin.refresh_in_background());
    }

    let mut loaded = Vec::new();
    for handle in handles {
        if let Ok(Ok(FetchOutcome::Loaded(count))) = handle.wait().await {
            loaded.push(count);
        }
    }

    let state = admin.snapshot();
    assert_eq!(loaded.last().copied(), Some(10));
    assert_eq!(state.current_records().len(), 10);
    assert_eq!(admin.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_switching_resource_discards_slow_fetch() {
    let store = seeded_store(4).await;
    store.set_fetch_delay(&user_label(), Duration::from_secs(30));
    let admin = setup_controller(Arc::clone(&store) as Arc<dyn GraphStore>);

    let slow = admin.start();
    tokio::task::yield_now().await;
    assert!(admin.snapshot().loading);

    let fast = admin.select_resource("Post").unwrap();
    assert_eq!(fast.wait().await.unwrap(), Ok(FetchOutcome::Loaded(0)));
    assert_eq!(slow.wait().await.unwrap_err(), ControllerError::Cancelled);

    let state = admin.snapshot();
    assert_eq!(state.current, post_label());
    assert_eq!(state.records_for, Some(post_label()));
    assert!(state.current_records().is_empty());
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn test_save_runs_while_fetch_is_pending() {
    let store = seeded_store(1).await;
    store.set_fetch_delay(&user_label(), Duration::from_secs(5));
    let admin = setup_controller(Arc::clone(&store) as Arc<dyn GraphStore>);

    let initial = admin.start();
    admin.open_create_form().unwrap();
    admin.set_field("name", "Ada").unwrap();
    admin.save().await.unwrap();

    // the save's follow-up fetch replaces the initial one
    assert_eq!(initial.wait().await.unwrap_err(), ControllerError::Cancelled);
    assert_eq!(admin.refresh().await.unwrap(), FetchOutcome::Loaded(2));
    assert_eq!(store.create_requests().len(), 1);
}

#[tokio::test]
async fn test_subscribers_see_fetch_commit() {
    let store = seeded_store(1).await;
    let admin = setup_controller(store);
    let mut changes = admin.subscribe();

    let handle = admin.start();
    changes.changed().await.unwrap();
    handle.wait().await.unwrap().unwrap();

    let _ = changes.borrow_and_update();
    admin.refresh().await.unwrap();
    assert!(changes.has_changed().unwrap());
    assert_eq!(admin.rows(), vec!["user-0".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_everything() {
    let store = seeded_store(1).await;
    store.set_fetch_delay(&user_label(), Duration::from_secs(60));
    let admin = setup_controller(Arc::clone(&store) as Arc<dyn GraphStore>);

    let fetch = admin.start();
    tokio::task::yield_now().await;
    admin.shutdown();

    assert_eq!(fetch.wait().await.unwrap_err(), ControllerError::Cancelled);
    assert_eq!(admin.in_flight(), 0);
    assert!(admin.snapshot().records_for.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fetch_finishing_after_newer_start_is_not_committed() {
    let (entered_tx, entered_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let entered_tx = Mutex::new(entered_tx);
    let release_rx = Mutex::new(release_rx);
    let calls = AtomicUsize::new(0);

    let mut store = MockGraphStore::new();
    store.expect_fetch_list().returning(move |_, _| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            // stay inside the store call until the newer fetch exists
            entered_tx.lock().unwrap().send(()).unwrap();
            release_rx
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(10))
                .unwrap();
            Ok(vec![Record::new(user_properties("stale", "s@x.com"))])
        } else {
            Ok(vec![
                Record::new(user_properties("fresh-0", "f0@x.com")),
                Record::new(user_properties("fresh-1", "f1@x.com")),
            ])
        }
    });
    let admin = setup_controller(Arc::new(store));

    let older = admin.refresh_in_background();
    entered_rx.recv_timeout(Duration::from_secs(10)).unwrap();
    let newer = admin.refresh_in_background();
    release_tx.send(()).unwrap();

    assert_eq!(older.wait().await.unwrap(), Ok(FetchOutcome::Superseded));
    assert_eq!(newer.wait().await.unwrap(), Ok(FetchOutcome::Loaded(2)));
    assert_eq!(admin.rows(), vec!["fresh-0".to_string(), "fresh-1".to_string()]);
    assert!(!admin.snapshot().loading);
}
