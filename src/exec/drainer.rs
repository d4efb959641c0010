// src/exec/drainer.rs

//! Line-by-line draining of one child output stream.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::exec::SessionEvent;
use crate::types::{ReadErrorPolicy, StreamKind};

/// Longest line, terminator excluded, a drainer will buffer.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Read `reader` until end-of-stream, forwarding each line as a
/// [`SessionEvent::Line`] tagged with `stream`.
///
/// Returns the number of lines forwarded. A read error or a line longer than
/// [`MAX_LINE_BYTES`] ends the drain: with [`ReadErrorPolicy::Lenient`] it is
/// logged, the rest of the stream is discarded so the child never blocks on a
/// full pipe, and the drain reports end-of-stream. With
/// [`ReadErrorPolicy::Strict`] it is returned to the caller.
pub async fn drain<R>(
    reader: R,
    stream: StreamKind,
    task: String,
    events: mpsc::Sender<SessionEvent>,
    policy: ReadErrorPolicy,
) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut forwarded = 0usize;

    loop {
        buf.clear();
        let err = match read_line(&mut reader, &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = decode_line(&buf);
                debug!(task = %task, %stream, "{}", text);

                if events
                    .send(SessionEvent::Line { stream, text })
                    .await
                    .is_err()
                {
                    debug!(task = %task, %stream, "event queue closed; stopping drain");
                    break;
                }
                forwarded += 1;
                continue;
            }
            Err(err) => err,
        };

        match policy {
            ReadErrorPolicy::Lenient => {
                warn!(
                    task = %task,
                    %stream,
                    error = %err,
                    "unreadable child stream; treating as end of stream"
                );
                if let Err(err) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
                    debug!(task = %task, %stream, error = %err, "discarding remaining output failed");
                }
                break;
            }
            ReadErrorPolicy::Strict => return Err(err),
        }
    }

    debug!(task = %task, %stream, lines = forwarded, "stream drained");
    Ok(forwarded)
}

/// Read one line into `buf`, refusing to buffer more than [`MAX_LINE_BYTES`]
/// of content.
async fn read_line<R>(reader: &mut BufReader<R>, buf: &mut Vec<u8>) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let limit = MAX_LINE_BYTES as u64 + 1;
    let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if buf.len() > MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds {MAX_LINE_BYTES} bytes"),
        ));
    }
    Ok(n)
}

/// Strip the line terminator (`\n` or `\r\n`) and decode lossily.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
