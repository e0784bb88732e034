// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A streaming chat transcript driven through `WidgetList`.
//!
//! A producer thread plays the role of the inference server and streams a
//! reply token by token. It never touches the list: every token is sent over a
//! channel and the UI loop applies it, re-measures the last message, and keeps
//! the view pinned to the bottom while the reader has not scrolled away.
//!
//! Run with `RUST_LOG=debug` to see the list's own diagnostics.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use kurbo::{Point, Size};
use understory_demos::{TextRow, measure, render};
use understory_pooled_list::{ItemId, TapEvent, WidgetList};

enum Stream {
    Token(String),
    Done,
}

const VIEWPORT: Size = Size::new(320.0, 240.0);

fn main() {
    env_logger::init();

    let messages: Vec<String> = (0..200)
        .map(|i| {
            if i % 2 == 0 {
                format!("user: question number {i}")
            } else {
                format!("assistant: a somewhat longer answer to question {}", i - 1)
            }
        })
        .collect();
    let messages = Rc::new(RefCell::new(messages));

    let mut list = WidgetList::with_data(
        Rc::clone(&messages),
        TextRow::default,
        |message: &String, row: &mut TextRow| row.set_text(message),
    );
    list.set_on_item_tapped(Some(Rc::new(|row: ItemId, event: &TapEvent| {
        log::info!("tapped message {row} at {:?}", event.position);
    })));
    list.resize(VIEWPORT);

    // Measure the history once, the way a host would after its first layout.
    for (index, message) in messages.borrow().iter().enumerate() {
        list.set_item_height(index, measure(message, VIEWPORT.width));
    }
    list.scroll_to_bottom();
    println!("history loaded:\n{}", render(&list));

    messages.borrow_mut().push("user: tell me about pooled lists".to_owned());
    messages.borrow_mut().push("assistant:".to_owned());
    list.refresh();
    list.scroll_to_bottom_if_at_bottom();

    let (tx, rx) = mpsc::channel();
    let producer = thread::spawn(move || {
        let reply = "rows scrolled out of view go back to a pool and come back \
                     bound to whichever row scrolls in next";
        for word in reply.split(' ') {
            if tx.send(Stream::Token(format!(" {word}"))).is_err() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        let _ = tx.send(Stream::Done);
    });

    // The UI loop: the only place the list and its data are mutated.
    for event in rx {
        match event {
            Stream::Token(token) => {
                let last = {
                    let mut messages = messages.borrow_mut();
                    let Some(reply) = messages.last_mut() else {
                        continue;
                    };
                    reply.push_str(&token);
                    messages.len() - 1
                };
                let height = measure(&messages.borrow()[last], VIEWPORT.width);
                // A height change already re-populates the row.
                if !list.set_item_height(last, height) {
                    list.refresh_item(last);
                }
                list.scroll_to_bottom_if_at_bottom();
            }
            Stream::Done => break,
        }
    }
    if producer.join().is_err() {
        log::error!("producer thread panicked");
    }

    println!("after streaming:\n{}", render(&list));

    // Tap the message at the top of the viewport.
    let top = Point::new(10.0, list.scroll_offset() + 1.0);
    if !list.tap_at(top) {
        println!("top of the viewport is a gap between messages");
    }

    // Reading history detaches the view from the stream.
    list.scroll_to_index(10);
    messages.borrow_mut().push("user: thanks".to_owned());
    list.refresh();
    let followed = list.scroll_to_bottom_if_at_bottom();
    println!("followed new message while reading history: {followed}");
    println!("{}", render(&list));
}
