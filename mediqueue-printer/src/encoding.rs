//! Windows-1252 encoding utilities for Spanish thermal printers
//!
//! ESC/POS printers sold in the Spanish-speaking market ship with the
//! WPC1252 code page (`ESC t 16` on Epson-compatibles), which covers
//! accented vowels, ñ/Ñ and the euro sign. This module provides:
//! - Column-width calculation (1252 is single-byte, 1 column per char)
//! - Truncating/padding strings to a column width
//! - Converting UTF-8 to 1252 while preserving ESC/POS commands

use tracing::instrument;

/// Epson code page number for Windows-1252 (ESC t n)
const CODE_PAGE_WPC1252: u8 = 16;

/// Get the printed column width of a string
///
/// Windows-1252 is single-byte, so width equals the encoded length.
/// Characters outside 1252 encode as a substitution byte and still
/// occupy one column.
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to fit within a column width
pub fn truncate_text(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_text(s: &str, width: usize, align_right: bool) -> String {
    let current = text_width(s);
    if current >= width {
        return truncate_text(s, width);
    }
    let spaces = width - current;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to Windows-1252
///
/// ASCII bytes (0x00-0x7F) pass through exactly as is, which protects
/// ESC/POS commands from being corrupted. Only bytes >= 0x80 are
/// treated as UTF-8 sequences and re-encoded to 1252.
///
/// The code page select command is emitted once at the start and again
/// after every INIT (ESC @), because INIT resets the printer to its
/// default code page.
#[instrument(skip(bytes))]
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() + 8);

    // ESC t n - select character code table
    result.extend_from_slice(&[0x1B, 0x74, CODE_PAGE_WPC1252]);

    let mut buffer = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        // INIT (ESC @) resets the code page; re-select after it
        if b == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == 0x40 {
            flush_buffer(&mut buffer, &mut result);
            result.extend_from_slice(&[0x1B, 0x40, 0x1B, 0x74, CODE_PAGE_WPC1252]);
            i += 2;
            continue;
        }

        if b < 128 {
            // ASCII byte (command or plain text)
            flush_buffer(&mut buffer, &mut result);
            result.push(b);
        } else {
            // Part of a UTF-8 sequence
            buffer.push(b);
        }
        i += 1;
    }

    flush_buffer(&mut buffer, &mut result);
    result
}

/// Flush the non-ASCII buffer, converting UTF-8 to Windows-1252
fn flush_buffer(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }

    let s = String::from_utf8_lossy(buffer);
    let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode(&s);
    result.extend_from_slice(&encoded);
    buffer.clear();
}
