// Stateful pieces: toggle memory, activation history, the debounce scheduler
// and the command dispatcher that ties them to the host.

pub mod activation_history;
pub mod activation_scheduler;
pub mod command_dispatcher;
pub mod toggle_memory;
