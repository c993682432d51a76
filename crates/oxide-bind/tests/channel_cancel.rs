//! Cancellation releases every blocked party.

mod common;
use common::*;

use std::thread;

use oxide_bind::{ChannelError, ResultChannel};

#[test]
fn cancel_releases_blocked_put() {
    let channel = ResultChannel::bounded(1);
    channel.put(1).unwrap();

    let producer = {
        let channel = channel.clone();
        thread::spawn(move || channel.put(2))
    };
    thread::sleep(SETTLE);
    assert!(!producer.is_finished());

    channel.cancel();
    let err = within(move || producer.join().unwrap()).unwrap_err();
    assert_eq!(err.kind(), ChannelError::Cancelled);
    assert_eq!(err.into_row(), 2);
}

#[test]
fn cancel_releases_blocked_take() {
    let channel: ResultChannel<String> = ResultChannel::bounded(1);
    let consumer = {
        let channel = channel.clone();
        thread::spawn(move || channel.take())
    };
    thread::sleep(SETTLE);
    assert!(!consumer.is_finished());

    channel.cancel();
    assert_eq!(
        within(move || consumer.join().unwrap()),
        Err(ChannelError::Cancelled)
    );
}

#[test]
fn cancel_releases_blocked_has_next() {
    let channel: ResultChannel<u8> = ResultChannel::bounded(4);
    let consumer = {
        let mut cursor = channel.cursor();
        thread::spawn(move || cursor.has_next())
    };
    thread::sleep(SETTLE);

    channel.cancel();
    assert!(!within(move || consumer.join().unwrap()));
}

#[test]
fn cancel_releases_every_waiter() {
    let full = ResultChannel::bounded(1);
    full.put(0).unwrap();
    let empty: ResultChannel<i32> = ResultChannel::bounded(1);

    let mut waiters = Vec::new();
    for i in 0..4 {
        let full = full.clone();
        waiters.push(thread::spawn(move || full.put(i).map_err(|e| e.kind())));
        let empty = empty.clone();
        waiters.push(thread::spawn(move || empty.take().map(|_| ())));
    }
    thread::sleep(SETTLE);

    full.cancel();
    empty.cancel();
    for waiter in waiters {
        assert_eq!(
            within(move || waiter.join().unwrap()),
            Err(ChannelError::Cancelled)
        );
    }
}

#[test]
fn cancel_from_handle_on_another_thread() {
    let channel: ResultChannel<Vec<u8>> = ResultChannel::bounded(1);
    let handle = channel.cancel_handle();

    let canceller = thread::spawn(move || {
        thread::sleep(SETTLE);
        handle.cancel();
    });

    let taker = channel.clone();
    assert_eq!(within(move || taker.take()), Err(ChannelError::Cancelled));
    canceller.join().unwrap();
    assert!(channel.is_cancelled());
}

#[test]
fn cancellation_is_terminal() {
    let channel = ResultChannel::bounded(2);
    channel.cancel();
    channel.cancel();

    assert!(channel.is_cancelled());
    assert_eq!(channel.put('a').unwrap_err().kind(), ChannelError::Cancelled);
    assert_eq!(channel.take(), Err(ChannelError::Cancelled));
    assert_eq!(channel.try_take(), Err(ChannelError::Cancelled));
    assert!(!channel.cursor().has_next());
    assert_eq!(channel.size(), 0);
}

#[test]
fn cancellation_is_distinct_from_timeout() {
    let channel: ResultChannel<u8> = ResultChannel::bounded(1);
    assert_eq!(
        channel.take_timeout(std::time::Duration::from_millis(10)),
        Err(ChannelError::TimedOut)
    );
    channel.cancel();
    assert_eq!(
        channel.take_timeout(std::time::Duration::from_millis(10)),
        Err(ChannelError::Cancelled)
    );
}
