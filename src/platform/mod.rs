//! 运行平台相关的实现（调度器、渲染容器）。

pub mod dom;
pub mod headless;
pub mod schedule;

pub use dom::{DomSurface, DEFAULT_CONTAINER_SELECTOR};
pub use headless::HeadlessSurface;
pub use schedule::{BrowserScheduler, ManualScheduler, Scheduler, Task, TaskHandle};
