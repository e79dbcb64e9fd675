mod common;

use std::sync::Arc;

use common::{FakeSource, RecordingRenderer, invoice_order, order};
use printsync::{
    error::AppError,
    models::PageRequest,
    services::{
        aggregator::{OrderAggregator, PRINT_MARKER},
        print_state::{OrdersView, PRINT_NOTE, PrintCoordinator, PrintOutcome, ViewPhase},
    },
};

async fn setup(source: FakeSource) -> (Arc<FakeSource>, PrintCoordinator, OrdersView) {
    let source = Arc::new(source);
    let renderer = Arc::new(RecordingRenderer {
        events: source.events.clone(),
    });
    let coordinator = PrintCoordinator::new(source.clone(), renderer);
    let view = OrdersView::from(
        OrderAggregator::new(source.clone())
            .fetch_page(PageRequest::default())
            .await
            .unwrap(),
    );
    (source, coordinator, view)
}

fn printed_flags(view: &OrdersView) -> Vec<(u64, bool)> {
    view.orders.iter().map(|o| (o.id, o.is_printed)).collect()
}

#[test]
fn print_note_carries_the_marker() {
    assert!(PRINT_NOTE.contains(PRINT_MARKER));
}

#[tokio::test]
async fn reprint_asks_for_confirmation_before_anything_happens() {
    let (source, coordinator, view) = setup(FakeSource::new(vec![vec![invoice_order(1), order(2)]])).await;
    let batch = view.orders.clone();

    let outcome = coordinator.mark_printed(&view, batch, false).await.unwrap();

    match outcome {
        PrintOutcome::NeedsConfirmation { already_printed } => assert_eq!(already_printed, vec![1]),
        PrintOutcome::Printed(_) => panic!("expected a confirmation request"),
    }
    assert!(source.posted().is_empty());
    assert!(source.events().is_empty());
}

#[tokio::test]
async fn confirmed_reprint_posts_exactly_one_note() {
    let (source, coordinator, view) = setup(FakeSource::new(vec![vec![invoice_order(1), order(2)]])).await;
    let batch = vec![view.get(1).unwrap().clone()];

    let outcome = coordinator.mark_printed(&view, batch, true).await.unwrap();

    assert!(matches!(outcome, PrintOutcome::Printed(_)));
    assert_eq!(source.posted(), vec![(1, PRINT_NOTE.to_string())]);
}

#[tokio::test]
async fn renders_before_posting_notes() {
    let (source, coordinator, view) = setup(FakeSource::new(vec![vec![order(1), order(2)]])).await;
    let batch = view.orders.clone();

    coordinator.mark_printed(&view, batch, false).await.unwrap();

    let events = source.events();
    assert_eq!(events[0], "render:2");
    let mut posts = events[1..].to_vec();
    posts.sort();
    assert_eq!(posts, vec!["post:1".to_string(), "post:2".to_string()]);
}

#[tokio::test]
async fn optimistic_projection_then_reconciled_view() {
    let (_, coordinator, view) = setup(FakeSource::new(vec![vec![order(1), order(2), order(3)]])).await;
    let batch = vec![view.get(1).unwrap().clone(), view.get(3).unwrap().clone()];

    let PrintOutcome::Printed(run) = coordinator.mark_printed(&view, batch, false).await.unwrap() else {
        panic!("expected a print run");
    };

    assert_eq!(run.optimistic.phase, ViewPhase::Optimistic);
    assert_eq!(printed_flags(&run.optimistic), vec![(1, true), (2, false), (3, true)]);

    assert_eq!(run.view.phase, ViewPhase::Reconciled);
    assert_eq!(printed_flags(&run.view), vec![(1, true), (2, false), (3, true)]);

    // the input view is never touched
    assert_eq!(view.phase, ViewPhase::Reconciled);
    assert!(view.orders.iter().all(|o| !o.is_printed));

    assert_eq!(run.printed.len(), 2);
    assert!(run.failed.is_empty());
    assert_eq!(run.html, "<html>2 orders</html>");
}

#[tokio::test]
async fn failed_note_post_rolls_back_that_order_only() {
    let mut source = FakeSource::new(vec![vec![order(1), order(2)]]);
    source.failing_posts.insert(2);
    let (source, coordinator, view) = setup(source).await;
    let batch = view.orders.clone();

    let PrintOutcome::Printed(run) = coordinator.mark_printed(&view, batch, false).await.unwrap() else {
        panic!("expected a print run");
    };

    assert_eq!(run.printed, vec![1]);
    assert_eq!(run.failed, vec![2]);
    assert_eq!(printed_flags(&run.optimistic), vec![(1, true), (2, true)]);
    // upstream agrees: only order 1 got its note
    assert_eq!(printed_flags(&run.view), vec![(1, true), (2, false)]);
    assert_eq!(source.posted().len(), 1);
}

#[tokio::test]
async fn keeps_rolled_back_local_view_when_reconcile_fails() {
    let mut source = FakeSource::new(vec![vec![order(1), order(2)]]);
    source.failing_posts.insert(2);
    source.failing_pages.insert(9);
    let (_, coordinator, view) = setup(source).await;
    // a view of a page the upstream refuses to serve again
    let view = OrdersView {
        current_page: 9,
        ..view
    };
    let batch = view.orders.clone();

    let PrintOutcome::Printed(run) = coordinator.mark_printed(&view, batch, false).await.unwrap() else {
        panic!("expected a print run");
    };

    assert_eq!(run.view.phase, ViewPhase::Optimistic);
    assert_eq!(printed_flags(&run.view), vec![(1, true), (2, false)]);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let (source, coordinator, view) = setup(FakeSource::new(vec![vec![order(1)]])).await;

    let err = coordinator.mark_printed(&view, Vec::new(), false).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(source.events().is_empty());
}

#[tokio::test]
async fn completing_an_order_removes_it_and_decrements_total() {
    let (source, coordinator, view) = setup(FakeSource::new(vec![vec![order(1), order(2), order(3)]])).await;
    assert_eq!(view.total_orders, 3);

    let next = coordinator.complete_order(&view, 2, "completed").await.unwrap();

    assert_eq!(next.orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(next.total_orders, 2);
    assert_eq!(
        source.status_updates.lock().unwrap().as_slice(),
        &[(2, "completed".to_string())]
    );
}

#[tokio::test]
async fn blank_status_is_rejected_before_upstream_call() {
    let (source, coordinator, view) = setup(FakeSource::new(vec![vec![order(1)]])).await;

    let err = coordinator.complete_order(&view, 1, "  ").await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(source.status_updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn status_that_stays_actionable_keeps_the_order() {
    let (_, coordinator, view) = setup(FakeSource::new(vec![vec![order(1), order(2)]])).await;

    let next = coordinator.complete_order(&view, 1, "processing").await.unwrap();

    assert_eq!(next.orders.len(), 2);
    assert_eq!(next.total_orders, 2);
}

#[tokio::test]
async fn completing_an_order_on_another_page_refreshes_the_count() {
    let (source, coordinator, view) = setup(FakeSource::new(vec![vec![order(1), order(2)], vec![order(3)]])).await;
    assert_eq!(view.total_orders, 3);

    let next = coordinator.complete_order(&view, 3, "completed").await.unwrap();

    assert_eq!(next.orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(next.total_orders, 2);
    // the count came from a fresh single-row listing
    assert_eq!(source.list_calls.lock().unwrap().last(), Some(&(1, 1)));
}

#[tokio::test]
async fn failed_count_refresh_falls_back_to_local_decrement() {
    let mut source = FakeSource::new(vec![vec![order(1), order(2)], vec![order(3)]]);
    source.failing_count = true;
    let (_, coordinator, view) = setup(source).await;

    let removed = coordinator.complete_order(&view, 1, "completed").await.unwrap();
    assert_eq!(removed.total_orders, 2);

    // not on this page and no fresh count, so the local total stands
    let elsewhere = coordinator.complete_order(&view, 3, "completed").await.unwrap();
    assert_eq!(elsewhere.total_orders, 3);
}
