use crate::graph::{Direction, LocationGraph};
use crate::investigation::{Arrival, Command, Moves, Verdict};
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

const RULE: &str = "========================================";

/// A reply at the navigation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Command(Command),
    Unrecognized(String),
    /// Input is exhausted.
    Closed,
}

impl Choice {
    fn from_line(line: Option<String>) -> Self {
        match line {
            None => Choice::Closed,
            Some(line) => match Command::parse(&line) {
                Some(command) => Choice::Command(command),
                None => Choice::Unrecognized(line.trim().to_string()),
            },
        }
    }
}

/// Strips leading blanks and the line terminator, nothing else.
pub fn accusation_from_line(line: &str) -> String {
    line.trim_start()
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

/// The player side of an investigation. Narration hooks default to doing nothing.
pub trait Detective {
    fn opening(&mut self, _title: &str, _graph: &LocationGraph) -> Result<()> {
        Ok(())
    }

    fn arrive(&mut self, _arrival: &Arrival<'_>, _moves: &Moves<'_>) -> Result<()> {
        Ok(())
    }

    fn blocked(&mut self, _direction: Direction, _moves: &Moves<'_>) -> Result<()> {
        Ok(())
    }

    fn unrecognized(&mut self, _input: &str, _moves: &Moves<'_>) -> Result<()> {
        Ok(())
    }

    fn choose(&mut self) -> Result<Choice>;

    /// Returns the accused name, or `None` once input is exhausted.
    fn accuse(&mut self, evidence: &[&str], suspects: &[String]) -> Result<Option<String>>;

    fn verdict(&mut self, _verdict: &Verdict) -> Result<()> {
        Ok(())
    }
}

/// Interactive detective reading commands line by line.
pub struct ConsoleDetective<R, W> {
    input: R,
    output: W,
    wait_for_enter: bool,
}

impl<R: BufRead, W: Write> ConsoleDetective<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            wait_for_enter: true,
        }
    }

    pub fn skip_intro(mut self) -> Self {
        self.wait_for_enter = false;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut buf)
            .context("Failed to read from input")?;
        // Invalid UTF-8 is kept as replacement characters, never an error.
        Ok((read > 0).then(|| String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Blank lines are skipped, the prompt keeps waiting.
    fn read_nonblank_line(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.read_line()? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn print_menu(&mut self, moves: &Moves<'_>) -> Result<()> {
        writeln!(self.output, "\nWhere do you want to go?")?;
        if let Some(left) = moves.left {
            writeln!(self.output, "  [E] Esquerda (left) -> {}", left)?;
        }
        if let Some(right) = moves.right {
            writeln!(self.output, "  [D] Direita (right) -> {}", right)?;
        }
        match moves.back_to {
            Some(parent) => writeln!(self.output, "  [S] Stop here and go back to {}", parent)?,
            None => writeln!(self.output, "  [S] Stop and make the accusation")?,
        }
        write!(self.output, "Choice: ")?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Detective for ConsoleDetective<R, W> {
    fn opening(&mut self, title: &str, graph: &LocationGraph) -> Result<()> {
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "  DETECTIVE QUEST")?;
        writeln!(self.output, "  {}", title)?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "\nWelcome, detective!")?;
        writeln!(
            self.output,
            "A crime was committed here. {} rooms wait to be searched.",
            graph.len()
        )?;
        writeln!(
            self.output,
            "Explore the rooms, collect clues and find the culprit!"
        )?;
        if self.wait_for_enter {
            write!(self.output, "\n\nPress ENTER to start the investigation...")?;
            self.output.flush()?;
            self.read_line()?;
        }
        Ok(())
    }

    fn arrive(&mut self, arrival: &Arrival<'_>, moves: &Moves<'_>) -> Result<()> {
        writeln!(self.output, "\n{}", RULE)?;
        if arrival.returning {
            writeln!(self.output, "You are back in: {}", arrival.name)?;
        } else {
            writeln!(self.output, "You are in: {}", arrival.name)?;
        }
        match (arrival.clue, arrival.newly_found) {
            (Some(clue), true) => {
                writeln!(self.output, "CLUE FOUND: {}", clue)?;
                writeln!(self.output, "Clue added to your notebook!")?;
            }
            (Some(clue), false) => {
                writeln!(self.output, "Clue already in your notebook: {}", clue)?;
            }
            (None, _) => writeln!(self.output, "No clue here.")?,
        }
        self.print_menu(moves)
    }

    fn blocked(&mut self, direction: Direction, moves: &Moves<'_>) -> Result<()> {
        writeln!(self.output, "\nThere is no path to the {}!", direction)?;
        self.print_menu(moves)
    }

    fn unrecognized(&mut self, input: &str, moves: &Moves<'_>) -> Result<()> {
        writeln!(self.output, "\nUnknown option '{}'. Use E, D or S.", input)?;
        self.print_menu(moves)
    }

    fn choose(&mut self) -> Result<Choice> {
        let line = self.read_nonblank_line()?;
        Ok(Choice::from_line(line))
    }

    fn accuse(&mut self, evidence: &[&str], suspects: &[String]) -> Result<Option<String>> {
        writeln!(self.output, "\n{}", RULE)?;
        writeln!(self.output, "       JUDGMENT")?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "\nClues collected during the investigation:")?;
        if evidence.is_empty() {
            writeln!(self.output, "  (none)")?;
        }
        for clue in evidence {
            writeln!(self.output, "  - {}", clue)?;
        }
        writeln!(self.output, "\n\nSuspects:")?;
        for (i, suspect) in suspects.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, suspect)?;
        }
        write!(self.output, "\nWho do you accuse? (type the full name): ")?;
        self.output.flush()?;

        let line = self.read_nonblank_line()?;
        Ok(line.map(|line| accusation_from_line(&line)))
    }

    fn verdict(&mut self, verdict: &Verdict) -> Result<()> {
        writeln!(self.output, "\n{}", RULE)?;
        writeln!(self.output, "     INVESTIGATION RESULT")?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "Accused: {}", verdict.accused)?;
        writeln!(
            self.output,
            "Clues pointing to the suspect: {}\n",
            verdict.match_count
        )?;
        if verdict.solved {
            writeln!(self.output, "*** CASE SOLVED! ***")?;
            writeln!(
                self.output,
                "Enough evidence! {} was found guilty!",
                verdict.accused
            )?;
            writeln!(self.output, "Congratulations, detective!")?;
        } else {
            writeln!(self.output, "*** CASE NOT SOLVED! ***")?;
            writeln!(
                self.output,
                "Not enough evidence to accuse {}.",
                verdict.accused
            )?;
            writeln!(self.output, "The culprit got away... Try again!")?;
        }
        self.output.flush()?;
        Ok(())
    }
}

/// Replays a fixed list of input lines and records what it was shown.
#[derive(Debug, Default)]
pub struct ScriptedDetective {
    lines: VecDeque<String>,
    pub visited: Vec<String>,
    pub blocked: Vec<Direction>,
    pub evidence: Vec<String>,
    pub verdict: Option<Verdict>,
}

impl ScriptedDetective {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Detective for ScriptedDetective {
    fn arrive(&mut self, arrival: &Arrival<'_>, _moves: &Moves<'_>) -> Result<()> {
        self.visited.push(arrival.name.to_string());
        Ok(())
    }

    fn blocked(&mut self, direction: Direction, _moves: &Moves<'_>) -> Result<()> {
        self.blocked.push(direction);
        Ok(())
    }

    fn choose(&mut self) -> Result<Choice> {
        Ok(Choice::from_line(self.lines.pop_front()))
    }

    fn accuse(&mut self, evidence: &[&str], _suspects: &[String]) -> Result<Option<String>> {
        self.evidence = evidence.iter().map(|clue| clue.to_string()).collect();
        Ok(self
            .lines
            .pop_front()
            .map(|line| accusation_from_line(&line)))
    }

    fn verdict(&mut self, verdict: &Verdict) -> Result<()> {
        self.verdict = Some(verdict.clone());
        Ok(())
    }
}
