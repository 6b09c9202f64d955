//! Legacy `.doc` text recovery.
//!
//! The binary Word format stores body text inside the `WordDocument`
//! stream of an OLE compound file, either as 8-bit ANSI or UTF-16LE
//! pieces. Full fidelity needs the piece table; resumes do not. This
//! recovers printable runs from both encodings and keeps the richer
//! result, with paragraph marks mapped to newlines.

use std::io::{Cursor, Read};

use super::DecodeError;

const MIN_RUN: usize = 24;

pub fn extract_doc(bytes: &[u8]) -> Result<String, DecodeError> {
    let cursor = Cursor::new(bytes);
    let mut ole = cfb::CompoundFile::open(cursor)
        .map_err(|e| DecodeError::ExtractionFailed(format!("doc container: {e}")))?;

    let mut stream = Vec::new();
    ole.open_stream("WordDocument")
        .map_err(|e| DecodeError::ExtractionFailed(format!("doc body: {e}")))?
        .read_to_end(&mut stream)
        .map_err(|e| DecodeError::ExtractionFailed(format!("doc body: {e}")))?;

    let ansi = recover_ansi_runs(&stream);
    let wide = recover_utf16_runs(&stream);
    Ok(if wide.len() > ansi.len() { wide } else { ansi })
}

fn is_textual(c: char) -> bool {
    !c.is_control() || c == '\n' || c == '\t'
}

fn push_run(out: &mut String, run: &mut String) {
    if run.chars().count() >= MIN_RUN {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(run.trim_end());
    }
    run.clear();
}

fn recover_ansi_runs(stream: &[u8]) -> String {
    let mut out = String::new();
    let mut run = String::new();
    for &byte in stream {
        let c = match byte {
            b'\r' | 0x0B => '\n', // paragraph and soft-break marks
            0x20..=0x7E => byte as char,
            // common cp1252 extras worth keeping (dashes, quotes, ñ)
            0x91 | 0x92 => '\'',
            0x93 | 0x94 => '"',
            0x96 | 0x97 => '-',
            0xA0..=0xFF => cp1252_high(byte),
            _ => {
                push_run(&mut out, &mut run);
                continue;
            }
        };
        run.push(c);
    }
    push_run(&mut out, &mut run);
    out
}

fn cp1252_high(byte: u8) -> char {
    // cp1252 0xA0..=0xFF coincides with Latin-1
    char::from_u32(byte as u32).unwrap_or(' ')
}

fn recover_utf16_runs(stream: &[u8]) -> String {
    let mut out = String::new();
    let mut run = String::new();
    for pair in stream.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        let c = match unit {
            0x000D | 0x000B => '\n',
            _ => match char::from_u32(unit as u32) {
                Some(c) if is_textual(c) && unit < 0xD800 => c,
                _ => {
                    push_run(&mut out, &mut run);
                    continue;
                }
            },
        };
        run.push(c);
    }
    push_run(&mut out, &mut run);
    out
}
