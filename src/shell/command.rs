//! Command parsing
//!
//! One command per line, whitespace separated. `set` and `setex` take the
//! rest of the line as the value, so values may contain spaces:
//! `set greeting hello world` stores `"hello world"` with the default TTL,
//! and `setex greeting 5000 hello world` stores it with a 5 s TTL.

use crate::error::CommandError;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        key: String,
        value: String,
        ttl_ms: Option<u64>,
    },
    Get {
        key: String,
    },
    Delete {
        key: String,
    },
    Has {
        key: String,
    },
    Ttl {
        key: String,
    },
    Clear,
    Size,
    List,
    Stats,
    Config,
    Resize {
        max_size: usize,
    },
    Help,
    Quit,
}

pub const HELP: &[&str] = &[
    "set <key> <value...>",
    "setex <key> <ttl_ms> <value...>",
    "get <key>",
    "del <key>",
    "has <key>",
    "ttl <key>",
    "clear",
    "size",
    "list",
    "stats",
    "config",
    "resize <max_size>",
    "help",
    "quit",
];

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "set" => parse_set(&args)?,
            "setex" => parse_setex(&args)?,
            "get" => Command::Get {
                key: single_key(&args, "get <key>")?,
            },
            "del" | "delete" => Command::Delete {
                key: single_key(&args, "del <key>")?,
            },
            "has" => Command::Has {
                key: single_key(&args, "has <key>")?,
            },
            "ttl" => Command::Ttl {
                key: single_key(&args, "ttl <key>")?,
            },
            "clear" => no_args(&args, Command::Clear, "clear")?,
            "size" => no_args(&args, Command::Size, "size")?,
            "list" | "all" => no_args(&args, Command::List, "list")?,
            "stats" => no_args(&args, Command::Stats, "stats")?,
            "config" => no_args(&args, Command::Config, "config")?,
            "resize" => match args.as_slice() {
                [n] => Command::Resize {
                    max_size: parse_number(n)?,
                },
                _ => return Err(CommandError::Usage("resize <max_size>")),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_set(args: &[&str]) -> Result<Command, CommandError> {
    match args {
        [key, value @ ..] if !value.is_empty() => Ok(Command::Set {
            key: key.to_string(),
            value: value.join(" "),
            ttl_ms: None,
        }),
        _ => Err(CommandError::Usage("set <key> <value...>")),
    }
}

fn parse_setex(args: &[&str]) -> Result<Command, CommandError> {
    match args {
        [key, ttl, value @ ..] if !value.is_empty() => Ok(Command::Set {
            key: key.to_string(),
            value: value.join(" "),
            ttl_ms: Some(parse_number(ttl)?),
        }),
        _ => Err(CommandError::Usage("setex <key> <ttl_ms> <value...>")),
    }
}

fn single_key(args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    match args {
        [key] => Ok(key.to_string()),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn no_args(args: &[&str], command: Command, usage: &'static str) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage(usage))
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}
