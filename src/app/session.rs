//! Interactive watch session: reads commands and redraws at midnight

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::command::{Command, HELP, ParseResult, parse_command};
use super::{MidnightRollover, Tracker};
use crate::progress::DayProgress;
use crate::ui;

/// Whether the session keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A tracker bound to an output stream
pub struct Session<W> {
    tracker: Tracker,
    out: W,
    width: usize,
}

impl<W: Write> Session<W> {
    pub fn new(tracker: Tracker, out: W, width: usize) -> Self {
        Self { tracker, out, width }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Print the dashboard for `now`
    pub fn redraw(&mut self, now: DateTime<Utc>) -> Result<()> {
        let stats = self.tracker.statistics(now);
        writeln!(self.out, "{}", ui::render_dashboard(&stats, self.tracker.plan()))?;
        Ok(())
    }

    pub fn prompt(&mut self) -> Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }

    /// Parse and run one input line
    pub fn handle_line(&mut self, line: &str, now: DateTime<Utc>) -> Result<Flow> {
        match parse_command(line) {
            ParseResult::Ok(command) => return self.execute(command, now),
            ParseResult::UnknownCommand(cmd) => {
                writeln!(self.out, "Unknown command: {cmd} (try 'help')")?;
            }
            ParseResult::MissingArgument(cmd) => {
                writeln!(self.out, "Missing argument for '{cmd}'")?;
            }
            ParseResult::InvalidDay(arg) => {
                writeln!(self.out, "Not a day number: {arg}")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn execute(&mut self, command: Command, now: DateTime<Utc>) -> Result<Flow> {
        match command {
            Command::Solve { day, count } => {
                let result = self.tracker.set_problems_solved(day, count, now);
                self.report_update(day, result, now)?;
            }
            Command::Complete(day) => {
                let result = self.tracker.set_completed(day, true, now);
                self.report_update(day, result, now)?;
            }
            Command::Reopen(day) => {
                let result = self.tracker.set_completed(day, false, now);
                self.report_update(day, result, now)?;
            }
            Command::Status => self.redraw(now)?,
            Command::Plan => {
                let stats = self.tracker.statistics(now);
                let plan = ui::render_plan(
                    self.tracker.plan(),
                    &self.tracker.state().progress,
                    stats.current_day,
                    self.width,
                );
                writeln!(self.out, "{plan}")?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Nop => {}
        }
        Ok(Flow::Continue)
    }

    fn report_update(
        &mut self,
        day: u32,
        result: Result<DayProgress>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match result {
            Ok(progress) => {
                writeln!(self.out, "{}", ui::describe_update(day, &progress))?;
                self.redraw(now)
            }
            Err(err) => {
                tracing::warn!(day, error = %err, "Update rejected");
                writeln!(self.out, "Error: {err:#}")?;
                Ok(())
            }
        }
    }
}

/// Run the watch session on stdin/stdout until quit, EOF or Ctrl-C
pub async fn run(tracker: Tracker) -> Result<()> {
    let (tx, mut rollovers) = mpsc::unbounded_channel();
    let rollover = MidnightRollover::spawn(move |now| {
        let _ = tx.send(now);
    });

    let mut session = Session::new(tracker, std::io::stdout(), ui::DEFAULT_WIDTH);
    session.redraw(Utc::now())?;
    session.prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read input")? {
                    Some(line) => {
                        if session.handle_line(&line, Utc::now())? == Flow::Quit {
                            break;
                        }
                        session.prompt()?;
                    }
                    None => break,
                }
            }
            Some(now) = rollovers.recv() => {
                writeln!(session.out)?;
                session.redraw(now)?;
                session.prompt()?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    rollover.shutdown().await;
    tracing::debug!("Watch session ended");
    Ok(())
}
