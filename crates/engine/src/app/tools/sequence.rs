use std::collections::VecDeque;

/// Time slack under which a pending wait counts as elapsed.
const WAIT_EPSILON_SECONDS: f32 = 1e-4;

/// What a running sequence wants after one step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    /// Resume with `T` on the next tick.
    Yield(T),
    /// Resume with `then` once `seconds` of frame time have passed.
    Wait { seconds: f32, then: T },
    Done,
}

impl<T> Step<T> {
    /// Lifts a sub-sequence step into the owner's state type.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Step<U> {
        match self {
            Step::Yield(state) => Step::Yield(f(state)),
            Step::Wait { seconds, then } => Step::Wait {
                seconds,
                then: f(then),
            },
            Step::Done => Step::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Handle a step function holds while it runs.
///
/// Tickets issued before the last [`StepScheduler::cancel_all`] are stale and
/// every write through them is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    id: TaskId,
    epoch: u64,
}

impl Ticket {
    pub fn id(&self) -> TaskId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resumed<T> {
    pub ticket: Ticket,
    pub state: T,
}

#[derive(Debug)]
struct Pending<T> {
    ticket: Ticket,
    remaining_seconds: f32,
    state: T,
}

/// Cooperative step scheduler driven by frame time.
///
/// The owner runs the first step of a task itself right after [`start`],
/// then feeds each returned [`Step`] back through [`settle`]. [`advance`]
/// hands back every task whose wait has elapsed, in start order.
///
/// [`start`]: StepScheduler::start
/// [`settle`]: StepScheduler::settle
/// [`advance`]: StepScheduler::advance
#[derive(Debug)]
pub struct StepScheduler<T> {
    pending: VecDeque<Pending<T>>,
    running: usize,
    next_id: u64,
    epoch: u64,
}

impl<T> Default for StepScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StepScheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            running: 0,
            next_id: 0,
            epoch: 0,
        }
    }

    pub fn start(&mut self) -> Ticket {
        let ticket = Ticket {
            id: TaskId(self.next_id),
            epoch: self.epoch,
        };
        self.next_id = self.next_id.saturating_add(1);
        self.running += 1;
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch
    }

    pub fn settle(&mut self, ticket: Ticket, step: Step<T>) {
        if !self.is_current(ticket) {
            return;
        }
        self.running = self.running.saturating_sub(1);
        match step {
            Step::Yield(state) => self.pending.push_back(Pending {
                ticket,
                remaining_seconds: 0.0,
                state,
            }),
            Step::Wait { seconds, then } => self.pending.push_back(Pending {
                ticket,
                remaining_seconds: seconds.max(0.0),
                state: then,
            }),
            Step::Done => {}
        }
    }

    /// Subtracts `dt_seconds` from every wait and returns the due tasks.
    /// Each returned task counts as running until it is settled again.
    pub fn advance(&mut self, dt_seconds: f32) -> Vec<Resumed<T>> {
        let mut due = Vec::new();
        let mut still_waiting = VecDeque::with_capacity(self.pending.len());
        for mut task in self.pending.drain(..) {
            task.remaining_seconds -= dt_seconds;
            if task.remaining_seconds <= WAIT_EPSILON_SECONDS {
                due.push(Resumed {
                    ticket: task.ticket,
                    state: task.state,
                });
            } else {
                still_waiting.push_back(task);
            }
        }
        self.pending = still_waiting;
        self.running += due.len();
        due
    }

    /// Drops every task; outstanding tickets become stale.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.running = 0;
        self.epoch = self.epoch.saturating_add(1);
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.running
    }

    pub fn is_idle(&self) -> bool {
        self.len() == 0
    }
}
