//! # mediqueue-printer
//!
//! ESC/POS ticket printing for the MediQueue kiosk.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Windows-1252 encoding for Spanish text on thermal printers
//! - Network printing (TCP port 9100)
//! - File spooling for kiosks without a printer attached
//!
//! It also owns the one document the public client exports: the turn
//! receipt (`TurnReceipt` + `TicketRenderer`). Receipt emission is a
//! best-effort side effect; callers log failures and move on.
//!
//! ## Example
//!
//! ```ignore
//! use mediqueue_printer::{NetworkPrinter, Printer, TicketRenderer, TurnReceipt};
//!
//! let renderer = TicketRenderer::new(32);
//! let data = renderer.render(&receipt);
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(&data).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;
mod receipt;

// Re-exports
pub use encoding::{convert_to_cp1252, pad_text, text_width, truncate_text};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{FilePrinter, NetworkPrinter, Printer};
pub use receipt::{TicketRenderer, TurnReceipt};
