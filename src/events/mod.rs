//! # Events Module
//!
//! Event-driven progress reporting.
//!
//! ## Design
//! The engine holds no console or progress state of its own. It emits events
//! through a channel so any front end (CLI, GUI, test) can subscribe.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Batch(BatchEvent::Progress(p)) = event {
//!             println!("Scored {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! runner.run_with_events(&pairs, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
