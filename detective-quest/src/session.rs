use crate::detective::{Choice, Detective};
use crate::investigation::{Command, Investigation, Outcome, Phase, Verdict};
use crate::scenario::Case;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Runs one complete game: exploration, judgment and verdict.
pub fn play(case: &Case, detective: &mut dyn Detective) -> Result<Verdict> {
    info!(
        "Starting '{}': {} rooms, {} levels deep",
        case.title,
        case.graph.len(),
        case.graph.depth()
    );
    detective.opening(&case.title, &case.graph)?;

    let (mut investigation, arrival) = Investigation::begin(case);
    if let Some(moves) = investigation.moves() {
        detective.arrive(&arrival, &moves)?;
    }

    while let Phase::AtLocation(_) = investigation.phase() {
        let command = match detective.choose()? {
            Choice::Command(command) => command,
            Choice::Unrecognized(input) => {
                if let Some(moves) = investigation.moves() {
                    detective.unrecognized(&input, &moves)?;
                }
                continue;
            }
            Choice::Closed => {
                warn!("Input closed during exploration, treating it as stop");
                Command::Stop
            }
        };

        match investigation.apply(command) {
            Outcome::Entered(arrival) | Outcome::Returned(arrival) => {
                if let Some(moves) = investigation.moves() {
                    detective.arrive(&arrival, &moves)?;
                }
            }
            Outcome::Blocked(direction) => {
                if let Some(moves) = investigation.moves() {
                    detective.blocked(direction, &moves)?;
                }
            }
            Outcome::Judging | Outcome::Ignored => {}
        }
    }

    let evidence: Vec<&str> = investigation.evidence().collect();
    let accused = match detective.accuse(&evidence, &case.suspects)? {
        Some(accused) => accused,
        None => {
            warn!("Input closed before an accusation was made");
            String::new()
        }
    };

    let verdict = investigation
        .accuse(&accused)
        .context("Judgment phase reached in an unexpected state")?;
    detective.verdict(&verdict)?;
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detective::{ConsoleDetective, ScriptedDetective};
    use crate::graph::{Direction, RoomSpec};
    use crate::scenario::{Scenario, Testimony};
    use std::collections::BTreeMap;
    use std::io::Cursor;

    fn lone_room_case() -> Case {
        Scenario {
            title: "closet".to_string(),
            layout: RoomSpec::leaf("Closet"),
            clues: BTreeMap::new(),
            testimony: vec![Testimony {
                clue: "unused".to_string(),
                suspect: "Nobody".to_string(),
            }],
            suspects: vec![],
            bucket_count: 3,
        }
        .into_case()
        .unwrap()
    }

    #[test]
    fn test_dead_end_room_still_allows_stop() {
        let case = lone_room_case();
        let mut detective = ScriptedDetective::new(["e", "d", "x", "s", "Nobody"]);
        let verdict = play(&case, &mut detective).unwrap();

        assert_eq!(detective.visited, vec!["Closet"]);
        assert_eq!(detective.blocked, vec![Direction::Left, Direction::Right]);
        assert!(detective.evidence.is_empty());
        assert_eq!(verdict.match_count, 0);
        assert!(!verdict.solved);
        assert_eq!(detective.remaining(), 0);
    }

    #[test]
    fn test_closed_input_terminates() {
        let case = Scenario::mansion().unwrap().into_case().unwrap();
        let mut detective = ScriptedDetective::new(["e", "e", "e"]);
        let verdict = play(&case, &mut detective).unwrap();

        // Three legs deep, then every missing line unwinds one leg.
        assert_eq!(
            detective.visited,
            vec![
                "Hall de Entrada",
                "Biblioteca",
                "Escritorio",
                "Adega",
                "Escritorio",
                "Biblioteca",
                "Hall de Entrada",
            ]
        );
        assert_eq!(verdict.accused, "");
        assert!(!verdict.solved);
    }

    #[test]
    fn test_console_transcript() {
        let case = Scenario::mansion().unwrap().into_case().unwrap();
        let input = Cursor::new("\nE\nD\nS\nz\nS\nS\nColonel Mustard\n");
        let mut console = ConsoleDetective::new(input, Vec::new());
        let verdict = play(&case, &mut console).unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();

        // Hall, Biblioteca and Quarto Principal: mustard, plum, mustard
        assert_eq!(verdict.match_count, 2);
        assert!(verdict.solved);
        assert!(output.contains("DETECTIVE QUEST"));
        assert!(output.contains("You are in: Quarto Principal"));
        assert!(output.contains("You are back in: Biblioteca"));
        assert!(output.contains("Unknown option 'z'"));
        assert!(output.contains("  [S] Stop and make the accusation"));
        assert!(output.contains("*** CASE SOLVED! ***"));
    }

    #[test]
    fn test_invalid_utf8_lines_do_not_end_the_game() {
        let case = Scenario::mansion().unwrap().into_case().unwrap();
        let input = Cursor::new(&b"\xff\xfe\nS\nColonel Mustard\n"[..]);
        let mut console = ConsoleDetective::new(input, Vec::new()).skip_intro();
        let verdict = play(&case, &mut console).unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();

        // Only the hall was searched: one clue against the colonel.
        assert!(output.contains("Unknown option"));
        assert_eq!(verdict.accused, "Colonel Mustard");
        assert_eq!(verdict.match_count, 1);
        assert!(!verdict.solved);
    }

    #[test]
    fn test_invalid_utf8_accusation_matches_nobody() {
        let case = Scenario::mansion().unwrap().into_case().unwrap();
        let input = Cursor::new(&b"S\n\xffColonel Mustard\n"[..]);
        let mut console = ConsoleDetective::new(input, Vec::new()).skip_intro();
        let verdict = play(&case, &mut console).unwrap();

        assert_eq!(verdict.accused, "\u{fffd}Colonel Mustard");
        assert_eq!(verdict.match_count, 0);
    }
}
