//! Shell Module
//!
//! Line-oriented front end over a shared engine. Reads one command per line
//! and writes one JSON reply per line.
//!
//! # Commands
//! - `set <key> <value...>` / `setex <key> <ttl_ms> <value...>` - Store a value
//! - `get <key>` / `has <key>` / `ttl <key>` - Inspect a key
//! - `del <key>` / `clear` - Remove entries
//! - `size` / `list` / `stats` / `config` - Observe cache state
//! - `resize <max_size>` - Change the size bound
//! - `help` / `quit`

pub mod command;
pub mod handlers;

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::CacheEngine;

pub use command::Command;
pub use handlers::{execute, handle_line, Outcome};

/// Runs the shell until `quit` or end of input.
///
/// The engine lock is held for exactly one command, so every operation is
/// atomic with respect to other tasks sharing the engine.
pub async fn run<R, W>(engine: Arc<Mutex<CacheEngine>>, mut input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let raw = String::from_utf8_lossy(&buf);
        let line = raw.trim_end_matches(['\n', '\r']);

        let outcome = {
            let mut guard = engine.lock().await;
            handle_line(&mut guard, line)
        };

        match outcome {
            None => continue,
            Some(Outcome::Quit) => {
                debug!("Shell received quit");
                break;
            }
            Some(Outcome::Reply(reply)) => {
                output.write_all(reply.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
        }
    }

    Ok(())
}
