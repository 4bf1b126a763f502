use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use evhub::{
    sub_id, EventQueue, EventType, Handler, HubError, Payload, SubList, SubRef, SubSpec,
    SyncEvent, SyncFn, TaskWaker,
};

struct NoopWaker;

impl TaskWaker for NoopWaker {
    fn wake(&self) {}
}

struct CountWaker(Arc<AtomicUsize>);

impl TaskWaker for CountWaker {
    fn wake(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct DropGuard(Arc<AtomicUsize>);

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn immediate_unsubscribe_emits_single_terminal() {
    const FAMILY: u8 = 40;

    let list = SubList::new();
    let queue = Arc::new(EventQueue::new());
    let wakes = Arc::new(AtomicUsize::new(0));
    let freed = Arc::new(AtomicUsize::new(0));

    let p = list
        .subscribe_ptr(
            SubSpec::new(
                EventType::family_wide(FAMILY),
                Handler::task(Arc::clone(&queue), CountWaker(Arc::clone(&wakes))),
            )
            .with_private(DropGuard(Arc::clone(&freed))),
        )
        .unwrap();

    assert!(p.unsubscribe());
    assert!(!p.unsubscribe());
    // Destroy afterwards must not emit a second terminal.
    list.destroy();

    let env = queue.pop().unwrap();
    assert!(env.is_end());
    assert!(queue.pop().is_none());
    assert_eq!(wakes.load(Ordering::SeqCst), 1);

    drop(env);
    assert_eq!(freed.load(Ordering::SeqCst), 0);
    drop(p);
    assert_eq!(freed.load(Ordering::SeqCst), 1);
}

#[test]
fn per_subscription_fifo_in_publish_order() {
    const FAMILY: u8 = 41;

    let list = SubList::new();
    let queue = Arc::new(EventQueue::new());
    list.subscribe(SubSpec::new(
        EventType::family_wide(FAMILY),
        Handler::task(Arc::clone(&queue), NoopWaker),
    ))
    .unwrap();

    for i in 0..10u8 {
        assert!(list.publish(EventType::new(FAMILY, i % 3), Some(&Payload::new(&[i]))));
    }
    for i in 0..10u8 {
        assert_eq!(queue.pop().unwrap().data(), &[i]);
    }
    assert!(queue.pop().is_none());
}

#[test]
fn inline_handlers_run_before_any_enqueue() {
    const FAMILY: u8 = 42;

    let list = SubList::new();
    let queue = Arc::new(EventQueue::new());
    // Task member first in insertion order; the sync member must still see
    // an empty queue when it runs.
    list.subscribe(SubSpec::new(
        EventType::family_wide(FAMILY),
        Handler::task(Arc::clone(&queue), NoopWaker),
    ))
    .unwrap();

    let probe_queue = Arc::clone(&queue);
    list.subscribe(SubSpec::new(
        EventType::family_wide(FAMILY),
        Handler::sync(SyncFn::new("probe", move |_ev: &SyncEvent<'_>| {
            assert!(probe_queue.is_empty());
        })),
    ))
    .unwrap();

    assert!(list.publish(EventType::new(FAMILY, 3), None));
    assert_eq!(queue.len(), 1);
}

#[test]
fn handler_unsubscribing_later_member_skips_it() {
    const FAMILY: u8 = 43;

    let list = SubList::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let victim: Arc<OnceLock<SubRef>> = Arc::new(OnceLock::new());

    let victim_ref = Arc::clone(&victim);
    list.subscribe(SubSpec::new(
        EventType::family_wide(FAMILY),
        Handler::sync(SyncFn::new("killer", move |_ev: &SyncEvent<'_>| {
            if let Some(v) = victim_ref.get() {
                v.unsubscribe();
            }
        })),
    ))
    .unwrap();

    let hit_counter = Arc::clone(&hits);
    let p = list
        .subscribe_ptr(SubSpec::new(
            EventType::family_wide(FAMILY),
            Handler::sync(SyncFn::new("victim", move |_ev: &SyncEvent<'_>| {
                hit_counter.fetch_add(1, Ordering::SeqCst);
            })),
        ))
        .unwrap();
    let _ = victim.set(p);

    assert!(list.publish(EventType::new(FAMILY, 0), None));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(list.len(), 1);
}

#[test]
fn private_released_only_after_drain_and_handles() {
    const FAMILY: u8 = 44;

    let list = SubList::new();
    let queue = Arc::new(EventQueue::new());
    let freed = Arc::new(AtomicUsize::new(0));

    let p = list
        .subscribe_ptr(
            SubSpec::new(
                EventType::family_wide(FAMILY),
                Handler::task(Arc::clone(&queue), NoopWaker),
            )
            .with_private(DropGuard(Arc::clone(&freed))),
        )
        .unwrap();

    assert!(list.publish(EventType::new(FAMILY, 0), Some(&Payload::new(b"a"))));
    assert!(list.publish(EventType::new(FAMILY, 0), Some(&Payload::new(b"b"))));
    assert_eq!(p.outstanding(), 2);

    list.destroy();
    assert_eq!(p.outstanding(), 3);

    drop(p);
    assert_eq!(freed.load(Ordering::SeqCst), 0);

    drop(queue.pop().unwrap());
    drop(queue.pop().unwrap());
    assert_eq!(freed.load(Ordering::SeqCst), 0);

    let end = queue.pop().unwrap();
    assert!(end.is_end());
    assert_eq!(freed.load(Ordering::SeqCst), 0);
    drop(end);
    assert_eq!(freed.load(Ordering::SeqCst), 1);
}

#[test]
fn resubscribe_from_handler_applies_to_next_publish() {
    const FAMILY: u8 = 45;

    let list = SubList::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    list.subscribe(SubSpec::new(
        EventType::new(FAMILY, 0),
        Handler::sync(SyncFn::new("mover", move |ev: &SyncEvent<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            ev.sub().resubscribe(EventType::new(FAMILY, 1)).unwrap();
        })),
    ))
    .unwrap();

    assert!(list.publish(EventType::new(FAMILY, 0), None));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // The original bit no longer matches.
    assert!(list.publish(EventType::new(FAMILY, 0), None));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // The replacement bit does.
    assert!(list.publish(EventType::new(FAMILY, 1), None));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn sync_handler_may_publish_recursively() {
    const FAMILY: u8 = 46;

    let list = SubList::new();
    let inner_calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&inner_calls);
    list.subscribe(SubSpec::new(
        EventType::new(FAMILY, 1),
        Handler::sync(SyncFn::new("inner", move |_ev: &SyncEvent<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
        })),
    ))
    .unwrap();

    let recurse_list = list.clone();
    list.subscribe(SubSpec::new(
        EventType::new(FAMILY, 0),
        Handler::sync(SyncFn::new("outer", move |_ev: &SyncEvent<'_>| {
            assert!(recurse_list.publish(EventType::new(FAMILY, 1), None));
        })),
    ))
    .unwrap();

    assert!(list.publish(EventType::new(FAMILY, 0), None));
    assert_eq!(inner_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn lookup_take_ignores_anonymous_and_missing() {
    const FAMILY: u8 = 47;

    let list = SubList::new();
    list.subscribe(SubSpec::new(
        EventType::family_wide(FAMILY),
        Handler::sync(SyncFn::new("anon", |_: &SyncEvent<'_>| {})),
    ))
    .unwrap();

    assert!(list.lookup_take(0).is_none());
    assert!(list.lookup_take(123).is_none());

    let id = sub_id("lifecycle", "named");
    list.subscribe(
        SubSpec::new(
            EventType::family_wide(FAMILY),
            Handler::sync(SyncFn::new("named", |_: &SyncEvent<'_>| {})),
        )
        .with_id(id),
    )
    .unwrap();

    let s = list.lookup_take(id).unwrap();
    assert_eq!(s.id(), id);
    assert!(s.is_active());

    assert!(matches!(
        list.lookup_resubscribe(999, EventType::family_wide(FAMILY)),
        Err(HubError::NotFound { id: 999 })
    ));
    list.lookup_resubscribe(id, EventType::new(FAMILY, 2)).unwrap();
    assert_eq!(s.filter(), EventType::new(FAMILY, 2));
}

#[test]
fn destroyed_list_rejects_new_members() {
    const FAMILY: u8 = 48;

    let list = SubList::new();
    list.destroy();
    list.destroy();

    let err = list
        .subscribe(SubSpec::new(
            EventType::family_wide(FAMILY),
            Handler::sync(SyncFn::new("late", |_: &SyncEvent<'_>| {})),
        ))
        .unwrap_err();
    assert!(matches!(err, HubError::Destroyed));

    // No members left: publishing is a successful no-op.
    assert!(list.publish(EventType::new(FAMILY, 0), None));
}

#[test]
fn dropping_last_list_handle_terminates_members() {
    const FAMILY: u8 = 49;

    let queue = Arc::new(EventQueue::new());
    {
        let list = SubList::new();
        list.subscribe(SubSpec::new(
            EventType::family_wide(FAMILY),
            Handler::task(Arc::clone(&queue), NoopWaker),
        ))
        .unwrap();
    }

    let env = queue.pop().unwrap();
    assert!(env.is_end());
    assert!(queue.pop().is_none());
}

#[test]
fn wakeups_coalesce_while_queue_is_nonempty() {
    const FAMILY: u8 = 50;

    let list = SubList::new();
    let queue = Arc::new(EventQueue::new());
    let wakes = Arc::new(AtomicUsize::new(0));
    list.subscribe(SubSpec::new(
        EventType::family_wide(FAMILY),
        Handler::task(Arc::clone(&queue), CountWaker(Arc::clone(&wakes))),
    ))
    .unwrap();

    assert!(list.publish(EventType::new(FAMILY, 0), None));
    assert!(list.publish(EventType::new(FAMILY, 0), None));
    assert_eq!(wakes.load(Ordering::SeqCst), 1);

    while queue.pop().is_some() {}

    assert!(list.publish(EventType::new(FAMILY, 0), None));
    assert_eq!(wakes.load(Ordering::SeqCst), 2);
}
