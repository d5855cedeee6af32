//! Core logic behind the `easy-set` binary.
//!
//! Usage:
//!   easy-set [--keep-null] '<path>=<json>' ...
//!
//! The document is read from stdin (empty input is `{}`), every assignment is
//! applied in order, and the result is printed as compact JSON.

use std::str::FromStr;

use clap::Parser;
use serde_json::Value;
use thiserror::Error;

use crate::error::EasySetError;
use crate::options::Options;
use crate::path::{parse_path, Path, PathError};
use crate::pipeline::{step, Handoff, Step};
use crate::session::Session;
use crate::view::View;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    EasySet(#[from] EasySetError),
    #[error("{0}")]
    Path(#[from] PathError),
    #[error("malformed assignment {0:?}, expected <path>=<json>")]
    Assignment(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// One `<path>=<json>` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: Path,
    pub value: Value,
}

impl FromStr for Assignment {
    type Err = CliError;

    /// Split at the first `=` outside brackets and quotes. A value that is not
    /// valid JSON is taken as a string.
    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        let split = split_assignment(arg).ok_or_else(|| CliError::Assignment(arg.to_owned()))?;
        let (expr, raw) = (&arg[..split], &arg[split + 1..]);
        let path = parse_path(expr)?;
        if path.is_empty() {
            return Err(CliError::Assignment(arg.to_owned()));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        Ok(Self { path, value })
    }
}

fn split_assignment(arg: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in arg.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' if depth > 0 => quote = Some(c),
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[command(name = "easy-set")]
#[command(about = "Build nested JSON from path assignments", long_about = None)]
pub struct CliArgs {
    /// Keep explicit `null` fields instead of replacing them with `{}` on read
    #[arg(long)]
    pub keep_null: bool,

    /// Assignments of the form `<path>=<json>`, applied in order
    #[arg(value_name = "ASSIGNMENT")]
    pub assignments: Vec<Assignment>,
}

impl CliArgs {
    pub fn options(&self) -> Options {
        Options::default().with_vivify_null(!self.keep_null)
    }
}

/// Apply the assignments of `args` to the JSON document in `input`.
pub fn run(input: &str, args: &CliArgs) -> Result<String, CliError> {
    let input = input.trim();
    let root: Value = if input.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(input)?
    };

    let mut session = Session::with_options(root, args.options())?;
    let steps: Vec<Box<dyn Step + '_>> = args
        .assignments
        .iter()
        .map(|assignment| {
            step(move |mut root: View<'_>| {
                root.set_path(&assignment.path, assignment.value.clone())?;
                Ok(Handoff::Root)
            })
        })
        .collect();
    tracing::debug!(assignments = steps.len(), "applying assignments");
    session.run(steps)?;
    Ok(serde_json::to_string(&session.into_value())?)
}
