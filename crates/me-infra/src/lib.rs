pub mod app_dirs;
pub mod storage;
pub mod time;

pub use app_dirs::DirsAppDirsAdapter;
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
pub use time::SystemClock;
