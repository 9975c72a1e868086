//! Tick-based single-shot task scheduler
//!
//! Tasks are stamped with the scheduler generation at creation. Bumping the
//! generation (`cancel_all`) invalidates every pending task at once, so a
//! delayed opponent move can never fire into a game that was reset.

/// Handle for cancelling one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task<A> {
    id: TaskId,
    due: u64,
    generation: u64,
    action: A,
}

#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    tasks: Vec<Task<A>>,
    generation: u64,
    next_id: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            generation: 0,
            next_id: 1,
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run `action` once, `delay` ticks after `now`
    pub fn schedule(&mut self, now: u64, delay: u32, action: A) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due: now + u64::from(delay),
            generation: self.generation,
            action,
        });
        id
    }

    /// Cancel one task; false if it already ran or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Invalidate every pending task
    pub fn cancel_all(&mut self) {
        self.generation += 1;
        self.tasks.clear();
    }

    /// Remove and return the actions due at `now`, in due order
    pub fn poll(&mut self, now: u64) -> Vec<A> {
        let generation = self.generation;
        self.tasks.retain(|t| t.generation == generation);

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.due <= now);
        self.tasks = pending;

        due.sort_by_key(|t| (t.due, t.id.0));
        due.into_iter().map(|t| t.action).collect()
    }
}
