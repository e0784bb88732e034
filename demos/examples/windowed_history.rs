// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walking a long history with the batch-windowed scroller.
//!
//! The host here is a fake scroll container with uniform rows: it reports
//! offsets to the scroller, lays out whatever batch is materialized, and
//! applies the corrective offset after each slide.

use understory_pooled_list::{ScrollTarget, WindowedConfig, WindowedScroller};

const ROW_HEIGHT: f64 = 40.0;
const VIEWPORT_HEIGHT: f64 = 200.0;

struct Container {
    offset: f64,
}

impl Container {
    fn content_height(rows: usize) -> f64 {
        rows as f64 * ROW_HEIGHT
    }

    fn apply(&mut self, target: ScrollTarget, rows: usize) {
        let max = (Self::content_height(rows) - VIEWPORT_HEIGHT).max(0.0);
        self.offset = match target {
            ScrollTarget::Top => 0.0,
            ScrollTarget::Bottom => max,
            ScrollTarget::Centre => max / 2.0,
        };
    }
}

fn main() {
    env_logger::init();

    let config = match WindowedConfig::new(5, 30) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return;
        }
    };
    let mut scroller = WindowedScroller::new(
        config,
        || 1_000,
        |range| range.map(|i| format!("message {i}")).collect::<Vec<_>>(),
    );
    let mut container = Container { offset: 0.0 };

    // Drag downwards through the history.
    for _ in 0..60 {
        container.offset += ROW_HEIGHT / 2.0;
        let content = Container::content_height(scroller.rows().len());
        if let Some(shift) = scroller.on_scrolled(container.offset, content, VIEWPORT_HEIGHT) {
            container.offset = shift.corrected_offset(container.offset);
            println!(
                "slid {:?} to {:?}, offset now {:.1}",
                shift.direction, shift.range, container.offset
            );
        }
    }

    let target = scroller.go_to_index(500);
    container.apply(target, scroller.rows().len());
    println!(
        "jumped to {:?}: first row {:?}",
        scroller.range(),
        scroller.rows().first()
    );

    let target = scroller.go_to_bottom();
    container.apply(target, scroller.rows().len());
    println!(
        "bottom: {:?}, anchored {}",
        scroller.range(),
        scroller.is_at_bottom()
    );
}
