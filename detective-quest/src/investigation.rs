use crate::graph::{Direction, LocationId};
use crate::ledger::{ClueLedger, InOrder};
use crate::scenario::Case;
use crate::suspect_index::SuspectIndex;
use tracing::{debug, info, warn};

/// Minimum number of clues pointing at the accused for the case to be solved.
pub const SOLVE_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Go(Direction),
    Stop,
}

impl Command {
    /// Reads the first non-blank character: `E` left, `D` right, `S` stop, any case.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim_start().chars().next()?.to_ascii_lowercase() {
            'e' => Some(Command::Go(Direction::Left)),
            'd' => Some(Command::Go(Direction::Right)),
            's' => Some(Command::Stop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AtLocation(LocationId),
    Judging,
    Done,
}

/// What the detective finds when entering (or re-entering) a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival<'a> {
    pub location: LocationId,
    pub name: &'a str,
    pub clue: Option<&'a str>,
    pub newly_found: bool,
    pub returning: bool,
}

/// Moves offered at the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moves<'a> {
    pub here: &'a str,
    pub left: Option<&'a str>,
    pub right: Option<&'a str>,
    /// Where stopping leads back to; `None` when stopping ends the exploration.
    pub back_to: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'a> {
    Entered(Arrival<'a>),
    Returned(Arrival<'a>),
    Blocked(Direction),
    Judging,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub accused: String,
    pub match_count: usize,
    pub solved: bool,
}

impl Verdict {
    pub fn new(accused: &str, match_count: usize) -> Self {
        Self {
            accused: accused.to_string(),
            match_count,
            solved: match_count >= SOLVE_THRESHOLD,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvestigationError {
    #[error("An accusation can only be made once the exploration has ended")]
    NotJudging,
}

/// Number of collected clues whose suspect is exactly `accused`.
pub fn tally(ledger: &ClueLedger, index: &SuspectIndex, accused: &str) -> usize {
    ledger
        .in_order()
        .filter(|clue| match index.lookup(clue) {
            Some(suspect) => suspect == accused,
            None => {
                warn!("Clue '{}' does not resolve to any suspect", clue);
                false
            }
        })
        .count()
}

pub struct Investigation<'a> {
    case: &'a Case,
    ledger: ClueLedger,
    trail: Vec<LocationId>,
    phase: Phase,
}

impl<'a> Investigation<'a> {
    /// Starts at the root of the case's layout, collecting whatever clue lies there.
    pub fn begin(case: &'a Case) -> (Self, Arrival<'a>) {
        let root = case.graph.root();
        let mut investigation = Self {
            case,
            ledger: ClueLedger::new(),
            trail: Vec::new(),
            phase: Phase::AtLocation(root),
        };
        let arrival = investigation.enter(root, false);
        (investigation, arrival)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> Option<LocationId> {
        match self.phase {
            Phase::AtLocation(id) => Some(id),
            _ => None,
        }
    }

    pub fn ledger(&self) -> &ClueLedger {
        &self.ledger
    }

    pub fn evidence(&self) -> InOrder<'_> {
        self.ledger.in_order()
    }

    /// How many legs deep the detective currently is.
    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    pub fn moves(&self) -> Option<Moves<'a>> {
        let current = self.current()?;
        let graph = &self.case.graph;
        let (left, right) = graph.children(current);
        Some(Moves {
            here: graph.name(current),
            left: left.map(|id| graph.name(id)),
            right: right.map(|id| graph.name(id)),
            back_to: self.trail.last().map(|&id| graph.name(id)),
        })
    }

    pub fn apply(&mut self, command: Command) -> Outcome<'a> {
        let Phase::AtLocation(current) = self.phase else {
            return Outcome::Ignored;
        };

        match command {
            Command::Go(direction) => match self.case.graph.child(current, direction) {
                Some(child) => {
                    self.trail.push(current);
                    Outcome::Entered(self.enter(child, false))
                }
                None => {
                    debug!(
                        "No path {} from '{}'",
                        direction,
                        self.case.graph.name(current)
                    );
                    Outcome::Blocked(direction)
                }
            },
            Command::Stop => match self.trail.pop() {
                Some(parent) => Outcome::Returned(self.enter(parent, true)),
                None => {
                    info!(
                        "Exploration finished with {} clues collected",
                        self.ledger.len()
                    );
                    self.phase = Phase::Judging;
                    Outcome::Judging
                }
            },
        }
    }

    pub fn accuse(&mut self, accused: &str) -> Result<Verdict, InvestigationError> {
        if self.phase != Phase::Judging {
            return Err(InvestigationError::NotJudging);
        }
        let verdict = Verdict::new(accused, tally(&self.ledger, &self.case.index, accused));
        info!(
            "Accused '{}': {} supporting clues, solved = {}",
            verdict.accused, verdict.match_count, verdict.solved
        );
        self.phase = Phase::Done;
        Ok(verdict)
    }

    fn enter(&mut self, location: LocationId, returning: bool) -> Arrival<'a> {
        self.phase = Phase::AtLocation(location);
        let case = self.case;
        let clue = case.clue_at(location);
        let mut newly_found = false;
        if let Some(clue) = clue {
            let (ledger, inserted) = std::mem::take(&mut self.ledger).insert(clue);
            self.ledger = ledger;
            newly_found = inserted;
            if inserted {
                debug!("Collected '{}' in '{}'", clue, case.graph.name(location));
            }
        }
        if !returning && case.graph.location(location).is_dead_end() {
            debug!("'{}' is a dead end", case.graph.name(location));
        }
        Arrival {
            location,
            name: case.graph.name(location),
            clue,
            newly_found,
            returning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoomSpec;
    use crate::scenario::{Scenario, Testimony};
    use std::collections::BTreeMap;

    fn three_room_case() -> Case {
        let mut clues = BTreeMap::new();
        clues.insert("B".to_string(), "c1".to_string());
        clues.insert("C".to_string(), "c2".to_string());
        Scenario {
            title: "three rooms".to_string(),
            layout: RoomSpec::leaf("A")
                .with_left(RoomSpec::leaf("B"))
                .with_right(RoomSpec::leaf("C")),
            clues,
            testimony: vec![
                Testimony { clue: "c1".to_string(), suspect: "S1".to_string() },
                Testimony { clue: "c2".to_string(), suspect: "S1".to_string() },
            ],
            suspects: vec![],
            bucket_count: 10,
        }
        .into_case()
        .unwrap()
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("E"), Some(Command::Go(Direction::Left)));
        assert_eq!(Command::parse("e"), Some(Command::Go(Direction::Left)));
        assert_eq!(Command::parse("  d\n"), Some(Command::Go(Direction::Right)));
        assert_eq!(Command::parse("Sair"), Some(Command::Stop));
        assert_eq!(Command::parse("x"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \n"), None);
    }

    #[test]
    fn test_begin_at_root_without_clue() {
        let case = three_room_case();
        let (investigation, arrival) = Investigation::begin(&case);
        assert_eq!(arrival.name, "A");
        assert_eq!(arrival.clue, None);
        assert!(!arrival.newly_found);
        assert_eq!(investigation.current(), Some(case.graph.root()));
        assert!(investigation.ledger().is_empty());

        let moves = investigation.moves().unwrap();
        assert_eq!(moves.left, Some("B"));
        assert_eq!(moves.right, Some("C"));
        assert_eq!(moves.back_to, None);
    }

    #[test]
    fn test_blocked_move_keeps_position() {
        let case = three_room_case();
        let (mut investigation, _) = Investigation::begin(&case);
        let Outcome::Entered(arrival) = investigation.apply(Command::Go(Direction::Left)) else {
            panic!("expected to enter B");
        };
        let b = arrival.location;

        for direction in [Direction::Left, Direction::Right, Direction::Left] {
            assert_eq!(investigation.apply(Command::Go(direction)), Outcome::Blocked(direction));
            assert_eq!(investigation.current(), Some(b));
        }
        assert_eq!(investigation.ledger().len(), 1);
    }

    #[test]
    fn test_stop_returns_to_parent_then_judges() {
        let case = three_room_case();
        let (mut investigation, _) = Investigation::begin(&case);

        let Outcome::Entered(b) = investigation.apply(Command::Go(Direction::Left)) else {
            panic!("expected to enter B");
        };
        assert_eq!(b.clue, Some("c1"));
        assert!(b.newly_found);
        assert_eq!(investigation.depth(), 1);
        assert_eq!(investigation.moves().unwrap().back_to, Some("A"));

        let Outcome::Returned(a) = investigation.apply(Command::Stop) else {
            panic!("expected to return to A");
        };
        assert_eq!(a.name, "A");
        assert!(a.returning);
        assert_eq!(investigation.depth(), 0);

        assert_eq!(investigation.apply(Command::Stop), Outcome::Judging);
        assert_eq!(investigation.phase(), Phase::Judging);
        assert_eq!(investigation.moves(), None);
        assert_eq!(investigation.apply(Command::Go(Direction::Right)), Outcome::Ignored);
    }

    #[test]
    fn test_revisit_does_not_duplicate_clue() {
        let case = three_room_case();
        let (mut investigation, _) = Investigation::begin(&case);

        investigation.apply(Command::Go(Direction::Left));
        investigation.apply(Command::Stop);
        let Outcome::Entered(again) = investigation.apply(Command::Go(Direction::Left)) else {
            panic!("expected to enter B again");
        };
        assert_eq!(again.clue, Some("c1"));
        assert!(!again.newly_found);
        assert_eq!(investigation.ledger().len(), 1);
    }

    #[test]
    fn test_accuse_requires_judging() {
        let case = three_room_case();
        let (mut investigation, _) = Investigation::begin(&case);
        assert_eq!(investigation.accuse("S1"), Err(InvestigationError::NotJudging));
    }

    #[test]
    fn test_full_walk_solves_case() {
        let case = three_room_case();
        let (mut investigation, _) = Investigation::begin(&case);
        investigation.apply(Command::Go(Direction::Left));
        investigation.apply(Command::Stop);
        investigation.apply(Command::Go(Direction::Right));
        investigation.apply(Command::Stop);
        investigation.apply(Command::Stop);

        assert_eq!(investigation.evidence().collect::<Vec<_>>(), vec!["c1", "c2"]);
        let verdict = investigation.accuse("S1").unwrap();
        assert_eq!(verdict, Verdict { accused: "S1".to_string(), match_count: 2, solved: true });
        assert_eq!(investigation.phase(), Phase::Done);
        assert_eq!(investigation.accuse("S1"), Err(InvestigationError::NotJudging));
    }

    #[test]
    fn test_threshold() {
        assert!(!Verdict::new("X", 0).solved);
        assert!(!Verdict::new("X", 1).solved);
        assert!(Verdict::new("X", 2).solved);
        assert!(Verdict::new("X", 7).solved);
    }

    #[test]
    fn test_tally_is_exact_and_skips_unresolved() {
        let mut index = SuspectIndex::new();
        index.insert("knife", "Lady Scarlet");
        index.insert("bottle", "Lady Scarlet");
        index.insert("gloves", "Colonel Mustard");

        let ledger = ["knife", "bottle", "gloves", "mystery"]
            .iter()
            .fold(ClueLedger::new(), |ledger, clue| ledger.insert(clue).0);

        assert_eq!(tally(&ledger, &index, "Lady Scarlet"), 2);
        assert_eq!(tally(&ledger, &index, "lady scarlet"), 0);
        assert_eq!(tally(&ledger, &index, "Lady"), 0);
        assert_eq!(tally(&ledger, &index, "Colonel Mustard"), 1);
        assert_eq!(tally(&ledger, &index, ""), 0);
    }
}
