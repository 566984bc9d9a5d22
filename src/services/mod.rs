// Services module

pub mod distractions;
pub mod pomodoros;
pub mod statistics;
pub mod store;
pub mod subtasks;
pub mod supabase;
pub mod tasks;

#[cfg(test)]
pub mod memory;

pub use distractions::DistractionService;
pub use pomodoros::PomodoroService;
pub use statistics::StatisticsService;
pub use store::DataStore;
pub use subtasks::SubtaskService;
pub use supabase::SupabaseService;
pub use tasks::TaskService;
