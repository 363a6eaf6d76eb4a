//! Command parsing for the interactive watch session

use crate::progress::parse_problem_count;

/// Parsed command from a session input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record problems solved: solve <day> <count>
    Solve { day: u32, count: u32 },
    /// Mark a day done: done <day>
    Complete(u32),
    /// Mark a day not done: reopen <day>
    Reopen(u32),
    /// Redraw the dashboard: status
    Status,
    /// Show the plan: plan
    Plan,
    /// Show help: help or h
    Help,
    /// Leave the session: q or quit
    Quit,
    /// Empty line
    Nop,
}

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// Day argument is not a day number
    InvalidDay(String),
}

pub const HELP: &str = "\
Commands:
  solve <day> <count>   record problems solved for a day
  done <day>            mark a day complete
  reopen <day>          mark a day not complete
  status                redraw the dashboard
  plan                  show the plan
  help                  show this help
  quit                  leave the session";

fn parse_day(arg: &str) -> Result<u32, ParseResult> {
    arg.parse::<u32>().map_err(|_| ParseResult::InvalidDay(arg.to_string()))
}

/// Parse one input line
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let day = parts.next();
    let rest = parts.next();

    let with_day = |name: &str, build: fn(u32) -> Command| match day {
        None => ParseResult::MissingArgument(name.to_string()),
        Some(arg) => match parse_day(arg) {
            Ok(day) => ParseResult::Ok(build(day)),
            Err(err) => err,
        },
    };

    match cmd.to_lowercase().as_str() {
        "solve" | "s" => match (day, rest) {
            (Some(arg), Some(count)) => match parse_day(arg) {
                // Counts keep their leading integer; anything else reads as 0
                Ok(day) => ParseResult::Ok(Command::Solve { day, count: parse_problem_count(count) }),
                Err(err) => err,
            },
            _ => ParseResult::MissingArgument("solve".to_string()),
        },
        "done" | "complete" | "d" => with_day("done", Command::Complete),
        "reopen" | "undo" | "r" => with_day("reopen", Command::Reopen),
        "status" | "st" => ParseResult::Ok(Command::Status),
        "plan" | "p" => ParseResult::Ok(Command::Plan),
        "quit" | "q" | "exit" => ParseResult::Ok(Command::Quit),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}
