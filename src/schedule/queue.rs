//! FrameQueue: cooperative, frame-paced task runner
//!
//! Pulls `batch_size` deferred tasks per frame tick and yields back to the
//! rendering pipeline between batches. A failing or panicking task is counted
//! and skipped; the rest of the queue still runs.
//!
//! Panic isolation needs an unwinding target. `wasm32-unknown-unknown` aborts
//! on panic, so in the browser a task must report failure as `Err`, which is
//! how `CardUpdater` surfaces DOM errors.

use futures::future::LocalBoxFuture;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

use crate::console;
use crate::error::HydrateError;
use crate::worker::message::panic_message;

/// A deferred unit of work, consumed exactly once
pub type Task<'a, T> = Box<dyn FnOnce() -> Result<T, HydrateError> + 'a>;

/// Source of scheduling ticks (`requestAnimationFrame` in the browser)
pub trait FrameClock {
    fn next_frame(&self) -> LocalBoxFuture<'static, ()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Tasks executed, failed or not
    pub ran: usize,
    /// Tasks that returned an error or panicked
    pub failed: usize,
    /// Frame ticks awaited
    pub frames: usize,
}

#[derive(Debug)]
pub struct QueueOutcome<T> {
    pub stats: QueueStats,
    /// Results of the tasks that succeeded, in execution order
    pub results: Vec<T>,
}

pub struct FrameQueue<'a, T> {
    tasks: VecDeque<Task<'a, T>>,
    batch_size: usize,
}

impl<'a, T> FrameQueue<'a, T> {
    /// `batch_size` of 0 is treated as 1
    pub fn new(batch_size: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn push(&mut self, task: Task<'a, T>) {
        self.tasks.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every queued task, one batch per frame. Completes when the queue is empty.
    pub async fn drain<C: FrameClock + ?Sized>(mut self, clock: &C) -> QueueOutcome<T> {
        let mut stats = QueueStats::default();
        let mut results = Vec::with_capacity(self.tasks.len());

        while !self.tasks.is_empty() {
            clock.next_frame().await;
            stats.frames += 1;

            for _ in 0..self.batch_size {
                let Some(task) = self.tasks.pop_front() else {
                    break;
                };
                stats.ran += 1;
                match panic::catch_unwind(AssertUnwindSafe(task)) {
                    Ok(Ok(value)) => results.push(value),
                    Ok(Err(e)) => {
                        stats.failed += 1;
                        console::debug(&format!("task skipped: {}", e));
                    }
                    Err(payload) => {
                        stats.failed += 1;
                        console::warn(&format!("task panicked: {}", panic_message(payload.as_ref())));
                    }
                }
            }
        }

        QueueOutcome { stats, results }
    }
}

impl<'a, T> Extend<Task<'a, T>> for FrameQueue<'a, T> {
    fn extend<I: IntoIterator<Item = Task<'a, T>>>(&mut self, iter: I) {
        self.tasks.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::FutureExt;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records frame boundaries into a shared event log
    struct LogClock {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl FrameClock for LogClock {
        fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
            self.log.borrow_mut().push("frame".to_string());
            futures::future::ready(()).boxed_local()
        }
    }

    fn logging_task<'a>(log: &Rc<RefCell<Vec<String>>>, name: &'a str) -> Task<'a, &'a str> {
        let log = log.clone();
        Box::new(move || {
            log.borrow_mut().push(name.to_string());
            Ok(name)
        })
    }

    #[test]
    fn test_one_task_per_frame() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let clock = LogClock { log: log.clone() };

        let mut queue = FrameQueue::new(1);
        queue.extend(["a", "b", "c"].into_iter().map(|n| logging_task(&log, n)));
        let outcome = block_on(queue.drain(&clock));

        assert_eq!(*log.borrow(), vec!["frame", "a", "frame", "b", "frame", "c"]);
        assert_eq!(outcome.results, vec!["a", "b", "c"]);
        assert_eq!(outcome.stats, QueueStats { ran: 3, failed: 0, frames: 3 });
    }

    #[test]
    fn test_batches_per_frame() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let clock = LogClock { log: log.clone() };

        let mut queue = FrameQueue::new(2);
        queue.extend(["a", "b", "c"].into_iter().map(|n| logging_task(&log, n)));
        let outcome = block_on(queue.drain(&clock));

        assert_eq!(*log.borrow(), vec!["frame", "a", "b", "frame", "c"]);
        assert_eq!(outcome.stats.frames, 2);
    }

    #[test]
    fn test_zero_batch_size_clamped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let clock = LogClock { log: log.clone() };

        let mut queue = FrameQueue::new(0);
        queue.push(logging_task(&log, "only"));
        let outcome = block_on(queue.drain(&clock));
        assert_eq!(outcome.stats.ran, 1);
    }

    #[test]
    fn test_empty_queue_completes_without_frames() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let clock = LogClock { log: log.clone() };

        let queue: FrameQueue<()> = FrameQueue::new(1);
        let outcome = block_on(queue.drain(&clock));
        assert_eq!(outcome.stats, QueueStats::default());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_failures_do_not_block_the_rest() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let clock = LogClock { log: log.clone() };

        let mut queue = FrameQueue::new(1);
        queue.push(logging_task(&log, "first"));
        queue.push(Box::new(|| -> Result<&str, HydrateError> { Err(HydrateError::Task("bad record".into())) }));
        queue.push(Box::new(|| -> Result<&str, HydrateError> { panic!("unexpected DOM shape") }));
        queue.push(logging_task(&log, "last"));
        let outcome = block_on(queue.drain(&clock));

        assert_eq!(outcome.results, vec!["first", "last"]);
        assert_eq!(outcome.stats, QueueStats { ran: 4, failed: 2, frames: 4 });
    }
}
