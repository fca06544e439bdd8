//! Process lifecycle: startup ordering lives in `main`; this module owns
//! the shutdown broadcast and the ctrl-c listener that feeds it.

pub mod shutdown;

pub use shutdown::Shutdown;
