//! Virtual-time task scheduler
//!
//! Each challenge owns one `Scheduler` holding its periodic and one-shot
//! tasks. Nothing runs on its own: the owner advances time and drains due
//! tasks one at a time, so a task canceled while handling an earlier one in
//! the same span never fires. Dropping the scheduler drops every task.

/// Handle to a registered task, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(u64),
}

#[derive(Debug, Clone)]
struct Task<T> {
    id: u32,
    due: u64,
    repeat: Repeat,
    tag: T,
}

/// Cancelable periodic and deferred tasks over a virtual millisecond clock
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: u64,
    next_id: u32,
    tasks: Vec<Task<T>>,
}

impl<T: Copy> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `tag` every `interval_ms`, first firing one interval from now
    pub fn every(&mut self, interval_ms: u64, tag: T) -> TaskHandle {
        let interval = interval_ms.max(1);
        self.push(interval, Repeat::Every(interval), tag)
    }

    /// Run `tag` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, tag: T) -> TaskHandle {
        self.push(delay_ms, Repeat::Once, tag)
    }

    fn push(&mut self, delay: u64, repeat: Repeat, tag: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due: self.now + delay,
            repeat,
            tag,
        });
        TaskHandle(id)
    }

    /// Cancel a task. Returns false if it already finished or was canceled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != handle.0);
        self.tasks.len() != before
    }

    /// Cancel everything
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.id == handle.0)
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its due time. Ties go to the task registered first.
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let due = self.tasks[idx].due;
        self.now = self.now.max(due);
        let tag = self.tasks[idx].tag;
        match self.tasks[idx].repeat {
            Repeat::Once => {
                self.tasks.remove(idx);
            }
            Repeat::Every(interval) => {
                self.tasks[idx].due += interval;
            }
        }
        Some(tag)
    }

    /// Move the clock to `until` once all due tasks have been drained
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        Fast,
        Slow,
        Once,
    }

    fn drain(sched: &mut Scheduler<Tag>, dt: u64) -> Vec<Tag> {
        let until = sched.now() + dt;
        let mut fired = Vec::new();
        while let Some(tag) = sched.pop_due(until) {
            fired.push(tag);
        }
        sched.settle(until);
        fired
    }

    #[test]
    fn test_periodic_fires_per_interval() {
        let mut sched = Scheduler::new();
        sched.every(16, Tag::Fast);

        assert!(drain(&mut sched, 15).is_empty());
        assert_eq!(drain(&mut sched, 1), vec![Tag::Fast]);
        // 17..=100 covers due times 32, 48, 64, 80, 96
        assert_eq!(drain(&mut sched, 84).len(), 5);
        assert_eq!(sched.now(), 100);
    }

    #[test]
    fn test_order_by_due_time_then_registration() {
        let mut sched = Scheduler::new();
        sched.every(50, Tag::Slow);
        sched.every(25, Tag::Fast);

        let fired = drain(&mut sched, 100);
        assert_eq!(
            fired,
            vec![Tag::Fast, Tag::Slow, Tag::Fast, Tag::Fast, Tag::Slow, Tag::Fast]
        );
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut sched = Scheduler::new();
        let handle = sched.after(300, Tag::Once);
        assert!(sched.is_scheduled(handle));

        assert_eq!(drain(&mut sched, 1000), vec![Tag::Once]);
        assert!(!sched.is_scheduled(handle));
        assert!(drain(&mut sched, 1000).is_empty());
    }

    #[test]
    fn test_cancel_stops_task() {
        let mut sched = Scheduler::new();
        let fast = sched.every(10, Tag::Fast);
        sched.every(10, Tag::Slow);

        assert!(sched.cancel(fast));
        assert!(!sched.cancel(fast));
        assert_eq!(drain(&mut sched, 30), vec![Tag::Slow; 3]);

        sched.cancel_all();
        assert!(sched.is_empty());
        assert!(drain(&mut sched, 1000).is_empty());
    }

    #[test]
    fn test_cancel_mid_span_prevents_later_firing() {
        let mut sched = Scheduler::new();
        let slow = sched.every(40, Tag::Slow);
        sched.after(20, Tag::Once);

        let until = 100;
        let mut fired = Vec::new();
        while let Some(tag) = sched.pop_due(until) {
            fired.push(tag);
            if tag == Tag::Once {
                sched.cancel(slow);
            }
        }
        assert_eq!(fired, vec![Tag::Once]);
    }

    #[test]
    fn test_tasks_scheduled_relative_to_clock() {
        let mut sched = Scheduler::new();
        drain(&mut sched, 500);
        sched.after(100, Tag::Once);

        assert!(drain(&mut sched, 99).is_empty());
        assert_eq!(drain(&mut sched, 1), vec![Tag::Once]);
    }
}
