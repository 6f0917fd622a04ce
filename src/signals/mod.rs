/*!
 * Signals Module
 * Signal table, OS disposition and delivery pausing
 */

pub mod os;
pub mod pause;
pub mod table;

// Re-export public API
pub use os::{install_signal_channel, process_signal_channel, OsSignalDisposition};
pub use pause::DeliveryPause;
pub use table::{Signal, SignalTable};
