//! Command handlers
//!
//! Applies one parsed command to the engine and renders the reply.

use serde::Serialize;

use crate::cache::CacheEngine;
use crate::models::{
    DeleteResponse, ErrorResponse, GetResponse, HelpResponse, KeyStatusResponse, ListResponse,
    SetResponse, SizeResponse, StatsResponse,
};
use crate::shell::command::{Command, HELP};

/// What the shell loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this JSON line and keep reading
    Reply(String),
    Quit,
}

/// Parses and executes one input line. Blank lines yield `None`.
pub fn handle_line(engine: &mut CacheEngine, line: &str) -> Option<Outcome> {
    match Command::parse(line) {
        Ok(None) => None,
        Ok(Some(command)) => Some(execute(engine, command)),
        Err(e) => Some(Outcome::Reply(render(&ErrorResponse::new(e.to_string())))),
    }
}

/// Executes one command against the engine.
///
/// Engine errors (invalid key or value, invalid configuration) become an
/// error reply; nothing here can end the loop except `quit`.
pub fn execute(engine: &mut CacheEngine, command: Command) -> Outcome {
    let reply = match command {
        Command::Set { key, value, ttl_ms } => engine
            .set(&key, value, ttl_ms)
            .map(|()| render(&SetResponse::new(key))),
        Command::Get { key } => engine
            .get(&key)
            .map(|value| render(&GetResponse::new(key, value))),
        Command::Delete { key } => engine
            .delete(&key)
            .map(|deleted| render(&DeleteResponse::new(key, deleted))),
        Command::Has { key } => {
            let live = engine.has(&key);
            Ok(render(&KeyStatusResponse {
                key,
                live,
                ttl_remaining_ms: None,
            }))
        }
        Command::Ttl { key } => {
            let remaining = engine.ttl_remaining(&key);
            Ok(render(&KeyStatusResponse {
                key,
                live: remaining.is_some(),
                ttl_remaining_ms: remaining,
            }))
        }
        Command::Clear => {
            engine.clear();
            Ok(render(&SizeResponse { size: 0 }))
        }
        Command::Size => Ok(render(&SizeResponse {
            size: engine.size(),
        })),
        Command::List => {
            let snapshot = engine.snapshot();
            Ok(render(&ListResponse::new(snapshot, engine.now_ms())))
        }
        Command::Stats => Ok(render(&StatsResponse::from(engine.stats()))),
        Command::Config => Ok(render(engine.config())),
        Command::Resize { max_size } => {
            let mut config = engine.config().clone();
            config.max_size = max_size;
            engine
                .reconfigure(config)
                .map(|()| render(engine.config()))
        }
        Command::Help => Ok(render(&HelpResponse {
            commands: HELP.to_vec(),
        })),
        Command::Quit => return Outcome::Quit,
    };

    Outcome::Reply(reply.unwrap_or_else(|e| render(&ErrorResponse::new(e.to_string()))))
}

fn render<T: Serialize + ?Sized>(body: &T) -> String {
    serde_json::to_string(body)
        .unwrap_or_else(|e| format!(r#"{{"error":"failed to render reply: {}"}}"#, e))
}
