//! # Events Module
//!
//! Per-file status reporting for a batch run.
//!
//! ## Design
//! The pipeline emits events through a channel so the CLI can show progress
//! and every decision as it happens, while the core stays free of printing.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Place(PlaceEvent::Placed { path, destination, .. }) = event {
//!             println!("{} -> {}", path.display(), destination.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
