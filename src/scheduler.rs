use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

use log::trace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    fire_at: Duration,
    unit: T,
}

/// Single-threaded deferred task runner on a virtual millisecond timeline.
///
/// Units fire in `(fire_at, submission)` order. The host moves the horizon with
/// [`Scheduler::advance`] and drains due units with [`Scheduler::pop_due`];
/// units scheduled while another is firing are timed from that unit's fire time.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    horizon: Duration,
    next_id: u64,
    queue: BinaryHeap<Reverse<(Duration, u64)>>,
    tasks: HashMap<u64, ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn schedule(&mut self, delay: Duration, unit: T) -> TaskHandle {
        let id = self.next_id;
        let fire_at = self.now + delay;

        self.next_id += 1;
        self.queue.push(Reverse((fire_at, id)));
        self.tasks.insert(id, ScheduledTask { fire_at, unit });

        TaskHandle(id)
    }

    /// Prevents every listed unit that has not fired yet from running.
    ///
    /// Returns how many units were actually cancelled; calling it again with the
    /// same handles cancels nothing.
    pub fn cancel_all<'a, I>(&mut self, handles: I) -> usize
    where
        I: IntoIterator<Item = &'a TaskHandle>,
    {
        let cancelled = handles
            .into_iter()
            .filter(|handle| self.tasks.remove(&handle.0).is_some())
            .count();

        if self.tasks.is_empty() {
            self.queue.clear();
        }

        cancelled
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.horizon += elapsed;
    }

    /// Moves the horizon to the earliest live unit. Returns false when idle.
    pub fn skip_to_next(&mut self) -> bool {
        self.discard_cancelled();

        match self.queue.peek() {
            Some(&Reverse((fire_at, _))) => {
                self.horizon = self.horizon.max(fire_at);
                true
            }
            None => false,
        }
    }

    pub fn pop_due(&mut self) -> Option<(TaskHandle, T)> {
        self.discard_cancelled();

        let &Reverse((fire_at, id)) = self.queue.peek()?;

        if fire_at > self.horizon {
            self.now = self.now.max(self.horizon);
            return None;
        }

        self.queue.pop();
        let task = self.tasks.remove(&id)?;
        self.now = self.now.max(task.fire_at);

        trace!("Firing task {} at {:?}", id, task.fire_at);

        Some((TaskHandle(id), task.unit))
    }

    pub fn units(&self) -> impl Iterator<Item = (TaskHandle, &T)> {
        self.tasks.iter().map(|(id, task)| (TaskHandle(*id), &task.unit))
    }

    fn discard_cancelled(&mut self) {
        while let Some(&Reverse((_, id))) = self.queue.peek() {
            if self.tasks.contains_key(&id) {
                break;
            }

            self.queue.pop();
        }
    }
}
