//! The work stack the driver walks: one entry per state awaiting a frame-level verdict.
use crate::state::StateHandle;

/// A pending obligation: "does `state` still have a predecessor inside frame `frame_level`".
///
/// `located` distinguishes a task whose frame level was just computed (a freshly pushed state,
/// or one that just learned a blocking cube) from one that must re-derive its level via
/// [`OverSequence::get_new_level`](crate::frame::OverSequence::get_new_level) before it can be
/// queried again, because the frames have gained cubes while the task sat below the stack top.
#[derive(Clone, Debug)]
pub struct Task {
    pub state: StateHandle,
    pub frame_level: i64,
    pub located: bool,
}

impl Task {
    pub fn new(state: StateHandle, frame_level: i64) -> Task {
        Task {
            state,
            frame_level,
            located: true,
        }
    }
}

/// LIFO work stack. Plain `Vec`-backed: tasks are pushed and popped from one end only, and the
/// driver never needs to inspect anything but the top.
#[derive(Default)]
pub struct TaskStack {
    tasks: Vec<Task>,
}

impl TaskStack {
    pub fn new() -> TaskStack {
        TaskStack { tasks: Vec::new() }
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.tasks.pop()
    }
}
