//! # Events Module
//!
//! Progress reporting for scans and cleanups.
//!
//! The core never prints. It emits [`Event`]s through an [`EventSender`] and
//! any front end (the CLI progress bar, a web adapter, a test) subscribes.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver {
//!         if let Event::Extract(ExtractEvent::Progress(p)) = event {
//!             println!("{}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! let report = Scanner::builder().build()?.run_with_events(&root, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
