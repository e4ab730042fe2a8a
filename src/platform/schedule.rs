//! 延迟任务调度。任务绝不会在 `schedule` 调用内部同步执行。

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

pub type Task = Box<dyn FnOnce()>;

/// 已安排任务的句柄，可用于取消。
#[derive(Clone)]
pub struct TaskHandle {
    id: u64,
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl PartialEq for TaskHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TaskHandle {}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// 基于浏览器定时器的调度器。
#[derive(Debug, Default)]
pub struct BrowserScheduler {
    next_id: Cell<u64>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = TaskHandle::new(id);
        let guard = handle.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);

        spawn_local(async move {
            TimeoutFuture::new(millis).await;
            if !guard.is_cancelled() {
                task();
            }
        });
        handle
    }
}

struct ScheduledTask {
    due: Duration,
    handle: TaskHandle,
    task: Task,
}

/// 手动推进的虚拟时钟，供无浏览器环境和测试使用。
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<ScheduledTask>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// 尚未执行且未取消的任务数量。
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .iter()
            .filter(|entry| !entry.handle.is_cancelled())
            .count()
    }

    /// 推进时钟并按到期顺序执行任务，返回实际执行的任务数。
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut executed = 0;

        while let Some(entry) = self.pop_due(target) {
            self.now.set(entry.due);
            if !entry.handle.is_cancelled() {
                (entry.task)();
                executed += 1;
            }
        }

        self.now.set(target);
        executed
    }

    fn pop_due(&self, target: Duration) -> Option<ScheduledTask> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(_, entry)| (entry.due, entry.handle.id()))
            .map(|(index, _)| index)?;
        Some(queue.remove(index))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = TaskHandle::new(id);
        self.queue.borrow_mut().push(ScheduledTask {
            due: self.now.get() + delay,
            handle: handle.clone(),
            task,
        });
        handle
    }
}
