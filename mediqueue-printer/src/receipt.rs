//! Turn ticket renderer
//!
//! Renders an acquired turn into ESC/POS format for thermal printers.
//! This is the only document the public client exports.

use chrono::{DateTime, Local};

use crate::escpos::EscPosBuilder;

/// Everything the ticket needs, captured at acquisition time
#[derive(Debug, Clone)]
pub struct TurnReceipt {
    /// Prefixed ticket label, e.g. "C5"
    pub turn_number: String,
    /// Display name of the area, e.g. "Cardiología"
    pub area_name: String,
    /// Assigned office number, if the server assigned one
    pub office_number: Option<i32>,
    /// Turn identifier, printed as a QR code when present
    pub turn_id: Option<String>,
    /// Local acquisition time
    pub issued_at: DateTime<Local>,
}

/// Turn ticket renderer
///
/// Produces the fixed narrow-stock layout: brand header, turn number in
/// large type, area, office, local date/time, usage instructions, footer.
pub struct TicketRenderer {
    width: usize,
    brand: String,
}

impl TicketRenderer {
    /// Create a new renderer with the specified paper width
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        Self {
            width,
            brand: "MediQueue".to_string(),
        }
    }

    /// Override the header brand (clinic name)
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Render a receipt to ESC/POS bytes
    pub fn render(&self, receipt: &TurnReceipt) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.width);

        self.render_header(&mut b);
        self.render_turn(&mut b, receipt);
        self.render_instructions(&mut b);
        self.render_footer(&mut b, receipt);

        b.build()
    }

    fn render_header(&self, b: &mut EscPosBuilder) {
        b.center();
        b.bold();
        b.double_height();
        b.line(&self.brand);
        b.reset_size();
        b.bold_off();
        b.left();
        b.sep_double();
    }

    fn render_turn(&self, b: &mut EscPosBuilder, receipt: &TurnReceipt) {
        b.center();
        b.line("Su turno");
        b.bold();
        b.double_size();
        b.line(&receipt.turn_number);
        b.reset_size();
        b.bold_off();
        b.newline();
        b.line(&receipt.area_name);

        if let Some(office) = receipt.office_number {
            b.line(&format!("Consultorio {}", office));
        }

        b.left();
        b.sep_single();
        b.line_lr(
            &receipt.issued_at.format("%d/%m/%Y").to_string(),
            &receipt.issued_at.format("%H:%M").to_string(),
        );
        b.sep_single();
    }

    fn render_instructions(&self, b: &mut EscPosBuilder) {
        b.center();
        b.line("Conserve este ticket y espere");
        b.line("a que su número aparezca");
        b.line("en pantalla.");
        b.left();
    }

    fn render_footer(&self, b: &mut EscPosBuilder, receipt: &TurnReceipt) {
        if let Some(ref id) = receipt.turn_id {
            b.newline();
            b.qr_code(id, 4);
        }
        b.center();
        b.newline();
        b.line("Gracias por su visita");
        b.cut_feed(4);
    }
}
