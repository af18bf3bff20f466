//! Integration tests for the site coordinator.

use std::sync::Arc;
use std::time::Duration;

use chify_chat::{Author, ChatReply, MockGenerator, RequestToken, FALLBACK_REPLY, GREETING};
use chify_core::{
    EventKind, RecordingViewport, ServiceDialog, SiteConfig, SiteCoordinator, SiteEvent,
    ToastKind, View,
};
use tokio::time::Instant;

fn site(generator: MockGenerator) -> (SiteCoordinator, RecordingViewport) {
    let viewport = RecordingViewport::new();
    let coordinator = SiteCoordinator::new(
        &SiteConfig::default(),
        Arc::new(viewport.clone()),
        Arc::new(generator),
    );
    (coordinator, viewport)
}

fn history(coordinator: &SiteCoordinator) -> Vec<(Author, String)> {
    coordinator
        .chat()
        .messages()
        .iter()
        .map(|m| (m.author, m.text.clone()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_toasts_expire_unless_dismissed() {
    let (mut site, _) = site(MockGenerator::new());
    let start = Instant::now();

    let first = site.notify("Appointment requested", ToastKind::Success);
    let second = site.notify("Message sent", ToastKind::Success);
    site.notify("Upload failed", ToastKind::Error);
    assert_eq!(site.toasts().len(), 3);

    assert!(site.dismiss_toast(second));
    assert_eq!(site.toasts().len(), 2);

    tokio::time::advance(Duration::from_millis(3000)).await;
    site.notify("Newsletter joined", ToastKind::Success);
    assert_eq!(site.toasts().len(), 3);

    // The two surviving originals go at 5s, the late one at 8s.
    assert_eq!(site.process_next().await, EventKind::ToastExpired);
    assert!(site.toasts().iter().all(|t| t.id != first));
    assert_eq!(site.process_next().await, EventKind::ToastExpired);
    assert_eq!(site.toasts().len(), 1);
    assert_eq!(site.toasts()[0].message, "Newsletter joined");
    assert!(start.elapsed() < Duration::from_millis(8000));

    while !site.toasts().is_empty() {
        site.process_next().await;
    }
    assert!(start.elapsed() >= Duration::from_millis(8000));
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_unknown_toast_is_noop() {
    let (mut site, _) = site(MockGenerator::new());
    let id = site.notify("Saved", ToastKind::Success);
    site.notify("Saved again", ToastKind::Success);

    assert!(site.dismiss_toast(id));
    assert!(!site.dismiss_toast(id));
    assert_eq!(site.toasts().len(), 1);
    assert_eq!(site.toasts()[0].message, "Saved again");
}

#[tokio::test(start_paused = true)]
async fn test_navigate_resets_scroll_every_time() {
    let (mut site, viewport) = site(MockGenerator::new());

    for (n, view) in [View::Services, View::Services, View::Contact, View::Home]
        .into_iter()
        .enumerate()
    {
        site.navigate(view);
        assert_eq!(site.current_view(), view);
        assert_eq!(viewport.resets(), n + 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_service_dialog_is_observed_atomically() {
    let (mut site, _) = site(MockGenerator::new());
    let mut rx = site.subscribe();

    let record = site.open_service_by_slug("neurological-rehab").unwrap();
    {
        let snapshot = rx.borrow_and_update();
        match &snapshot.dialog {
            ServiceDialog::Open(shown) => assert!(Arc::ptr_eq(shown, &record)),
            ServiceDialog::Closed => panic!("dialog should be open"),
        }
    }

    site.close_service();
    let snapshot = rx.borrow_and_update();
    assert!(!snapshot.dialog.is_open());
    assert!(snapshot.dialog.selected().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_service_leaves_dialog_closed() {
    let (mut site, _) = site(MockGenerator::new());
    assert!(site.open_service_by_slug("aqua-therapy").is_err());
    assert_eq!(site.dialog(), &ServiceDialog::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_chat_send_while_awaiting_is_ignored() {
    let generator = MockGenerator::new().with_reply("Try icing the knee").held();
    let (mut site, _) = site(generator.clone());

    assert!(site.send_chat("Hello"));
    assert_eq!(
        history(&site),
        vec![
            (Author::Assistant, GREETING.to_string()),
            (Author::User, "Hello".to_string()),
        ]
    );
    assert!(site.chat().is_awaiting());

    assert!(!site.send_chat("ignored"));
    assert_eq!(site.chat().messages().len(), 2);
    assert!(site.chat().is_awaiting());

    generator.release(1);
    site.settle_chat().await;

    assert_eq!(
        history(&site),
        vec![
            (Author::Assistant, GREETING.to_string()),
            (Author::User, "Hello".to_string()),
            (Author::Assistant, "Try icing the knee".to_string()),
        ]
    );
    assert!(!site.chat().is_awaiting());
    assert_eq!(generator.prompts(), vec!["Hello"]);
}

#[tokio::test(start_paused = true)]
async fn test_chat_failure_appends_fallback() {
    let (mut site, _) = site(MockGenerator::new().with_failure("connection reset"));

    assert!(site.send_chat("Hello"));
    site.settle_chat().await;

    let last = site.chat().messages().last().unwrap();
    assert_eq!(last.author, Author::Assistant);
    assert_eq!(last.text, FALLBACK_REPLY);
    assert_eq!(site.chat().messages().len(), 3);
    assert!(!site.chat().is_awaiting());
}

#[tokio::test(start_paused = true)]
async fn test_blank_chat_text_never_changes_state() {
    let generator = MockGenerator::new().held();
    let (mut site, _) = site(generator.clone());

    assert!(!site.send_chat(""));
    assert!(!site.send_chat("   "));
    assert_eq!(site.chat().messages().len(), 1);
    assert!(!site.chat().is_awaiting());

    assert!(site.send_chat("Hello"));
    assert!(!site.send_chat(""));
    assert!(!site.send_chat("   "));
    assert_eq!(site.chat().messages().len(), 2);
    assert!(site.chat().is_awaiting());
}

#[tokio::test(start_paused = true)]
async fn test_stale_chat_reply_is_dropped() {
    let (mut site, _) = site(MockGenerator::new());
    let changed = site.apply(SiteEvent::ChatReply(ChatReply::success(
        RequestToken(999),
        "late answer",
    )));
    assert!(!changed);
    assert_eq!(site.chat().messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_carousel_advances_on_its_own() {
    let (mut site, _) = site(MockGenerator::new());
    let start = Instant::now();

    assert_eq!(site.process_next().await, EventKind::SlideAdvanced);
    assert_eq!(site.carousel().current_index(), 1);
    assert!(start.elapsed() >= Duration::from_millis(8000));

    assert!(site.select_slide(4));
    assert_eq!(site.next_slide(), 0);
}
