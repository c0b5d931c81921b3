//! Line-oriented driver feeding an apt.dat stream into an
//! [`AirportWriter`].
//!
//! The reader owns nothing but the loop: trim, skip comments and the
//! byte-order header, stop at the `99` end marker and hand every other
//! line to the session, pre-split into fields. The session is flushed
//! at end of input so a truncated file still commits its last airport.

use std::io::BufRead;

use thiserror::Error;

use crate::fields::Fields;
use crate::options::FileContext;
use crate::sink::Sink;
use crate::writer::AirportWriter;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read apt.dat line: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sink(#[from] anyhow::Error),
}

/// Feed one apt.dat file into the session. `ctx` carries the file's
/// identity and scenery flags; the line counter is maintained here.
pub fn read_apt_dat<R: BufRead, S: Sink>(
    mut input: R,
    writer: &mut AirportWriter<'_, S>,
    ctx: &FileContext,
) -> Result<(), ReadError> {
    let mut ctx = ctx.clone();
    let mut buf = String::new();

    loop {
        buf.clear();
        if input.read_line(&mut buf)? == 0 {
            break;
        }
        ctx.line_num += 1;

        let line = buf.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // File preamble: byte order marker line, then a version line
        // whose leading number the classifier already ignores.
        if line == "I" || line == "A" {
            continue;
        }
        if line == "99" {
            break;
        }

        writer.write(&Fields::split(line), &ctx)?;
    }

    writer.finish(&ctx)?;
    Ok(())
}
