// Asks the questions of a ranking session on a terminal.

use crate::rank::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Answer {
    Event(SessionEvent),
    Quit,
}

fn parse_answer(line: &str) -> Option<Answer> {
    match line.trim().to_lowercase().as_str() {
        "1" | "l" | "left" => Some(Answer::Event(SessionEvent::Choose(MatchupChoice::Left))),
        "2" | "r" | "right" => Some(Answer::Event(SessionEvent::Choose(MatchupChoice::Right))),
        "b" | "back" | "u" | "undo" => Some(Answer::Event(SessionEvent::GoBack)),
        "q" | "quit" => Some(Answer::Quit),
        _ => None,
    }
}

fn read_answer<R: BufRead>(input: &mut R) -> RankResult<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context(TerminalSnafu {})?;
    if read == 0 {
        info!("run_interactive: end of input");
        return Err(RankError::SessionAborted {});
    }
    Ok(line.trim().to_string())
}

fn write_ranking<W: Write>(batch: &BatchSession, out: &mut W) -> RankResult<()> {
    writeln!(out, "\nDone:").context(TerminalSnafu {})?;
    for (idx, item) in batch.result().iter().enumerate() {
        writeln!(out, "{:>4} {}", idx + 1, item.title).context(TerminalSnafu {})?;
    }
    Ok(())
}

/// Runs the session until all the items are placed and the person keeps the ranking.
///
/// The end of the input counts as quitting, which aborts the session.
pub fn run_interactive<R: BufRead, W: Write>(
    batch: &mut BatchSession,
    input: &mut R,
    out: &mut W,
) -> RankResult<()> {
    loop {
        let m = match batch.current_matchup().cloned() {
            Some(m) => m,
            None => {
                write_ranking(batch, out)?;
                // Nothing was asked: nothing to confirm.
                if !batch.can_go_back() {
                    return Ok(());
                }
                write!(out, "[y to keep this ranking, b to go back, q to quit] > ")
                    .context(TerminalSnafu {})?;
                out.flush().context(TerminalSnafu {})?;
                let line = read_answer(input)?;
                if matches!(line.to_lowercase().as_str(), "y" | "yes") {
                    return Ok(());
                }
                match parse_answer(&line) {
                    Some(Answer::Quit) => return Err(RankError::SessionAborted {}),
                    Some(Answer::Event(SessionEvent::GoBack)) => {
                        if let Err(e) = batch.go_back() {
                            writeln!(out, "{}", e).context(TerminalSnafu {})?;
                        }
                    }
                    _ => {
                        writeln!(out, "Unrecognized answer {:?}", line).context(TerminalSnafu {})?;
                    }
                }
                continue;
            }
        };

        writeln!(
            out,
            "\n({}/{}) Which do you prefer?",
            batch.processed_count() + 1,
            batch.total_count()
        )
        .context(TerminalSnafu {})?;
        writeln!(out, "  [1] {}", m.left.title).context(TerminalSnafu {})?;
        writeln!(out, "  [2] {}", m.right.title).context(TerminalSnafu {})?;
        write!(out, "[1/2, b to go back, q to quit] > ").context(TerminalSnafu {})?;
        out.flush().context(TerminalSnafu {})?;

        let line = read_answer(input)?;
        match parse_answer(&line) {
            Some(Answer::Quit) => return Err(RankError::SessionAborted {}),
            Some(Answer::Event(event)) => match batch.apply(event) {
                Ok(()) => debug!("run_interactive: {:?} applied", event),
                Err(e) => {
                    writeln!(out, "{}", e).context(TerminalSnafu {})?;
                }
            },
            None => {
                writeln!(out, "Unrecognized answer {:?}", line).context(TerminalSnafu {})?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(id, &id.to_uppercase())).collect()
    }

    fn run(batch: &mut BatchSession, answers: &str) -> (RankResult<()>, String) {
        let mut input = Cursor::new(answers.as_bytes());
        let mut out: Vec<u8> = Vec::new();
        let res = run_interactive(batch, &mut input, &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn answers() {
        assert_eq!(
            parse_answer(" L\n"),
            Some(Answer::Event(SessionEvent::Choose(MatchupChoice::Left)))
        );
        assert_eq!(
            parse_answer("2"),
            Some(Answer::Event(SessionEvent::Choose(MatchupChoice::Right)))
        );
        assert_eq!(parse_answer("undo"), Some(Answer::Event(SessionEvent::GoBack)));
        assert_eq!(parse_answer("q"), Some(Answer::Quit));
        assert_eq!(parse_answer("maybe"), None);
    }

    #[test]
    fn full_session() {
        let mut batch = BatchSession::new(items(&["a", "b", "c"]), items(&["x"]));
        // x vs b: right, then x vs c: left.
        let (res, text) = run(&mut batch, "2\nleft\ny\n");
        assert!(res.is_ok());
        let ids: Vec<&str> = batch.result().iter().map(|it| it.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "x", "c"]);
        assert!(text.contains("(1/1) Which do you prefer?"));
        assert!(text.contains("  [1] X\n  [2] B\n"));
        assert!(text.contains("   3 X\n"));
    }

    #[test]
    fn unknown_answers_and_undo() {
        let mut batch = BatchSession::new(items(&["a", "b", "c"]), items(&["x"]));
        // Nothing to undo at the start, then a typo, then right, undo, left, left.
        let (res, text) = run(&mut batch, "b\nwhat\nr\nb\n1\n1\nyes\n");
        assert!(res.is_ok());
        assert!(text.contains("Unrecognized answer \"what\""));
        assert!(text.contains(&SessionError::NothingToUndo.to_string()));
        let ids: Vec<&str> = batch.result().iter().map(|it| it.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "a", "b", "c"]);
    }

    #[test]
    fn going_back_from_the_final_ranking() {
        let mut batch = BatchSession::new(items(&["a", "b", "c"]), items(&["x"]));
        // x vs b: right, x vs c: left, then back to x vs c and right instead.
        let (res, text) = run(&mut batch, "2\n1\nmaybe\nb\n2\ny\n");
        assert!(res.is_ok());
        let ids: Vec<&str> = batch.result().iter().map(|it| it.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "x"]);
        assert!(text.contains("Unrecognized answer \"maybe\""));
        assert_eq!(text.matches("  [1] X\n  [2] C\n").count(), 2);
        assert_eq!(text.matches("Done:").count(), 3);
    }

    #[test]
    fn final_ranking_needs_a_confirmation() {
        let mut batch = BatchSession::new(items(&["a", "b"]), items(&["x"]));
        let (res, _) = run(&mut batch, "1\n1\n");
        assert!(batch.is_complete());
        assert!(matches!(res, Err(RankError::SessionAborted {})));

        let mut batch = BatchSession::new(items(&["a", "b"]), items(&["x"]));
        let (res, _) = run(&mut batch, "1\n1\nq\n");
        assert!(matches!(res, Err(RankError::SessionAborted {})));
    }

    #[test]
    fn quitting_aborts() {
        let mut batch = BatchSession::new(items(&["a", "b"]), items(&["x", "y"]));
        let (res, _) = run(&mut batch, "1\nq\n");
        assert!(matches!(res, Err(RankError::SessionAborted {})));
        assert!(!batch.is_complete());

        let mut batch = BatchSession::new(items(&["a", "b"]), items(&["x"]));
        let (res, _) = run(&mut batch, "");
        assert!(matches!(res, Err(RankError::SessionAborted {})));
    }

    #[test]
    fn nothing_to_ask() {
        let mut batch = BatchSession::new(items(&["a"]), vec![]);
        let (res, text) = run(&mut batch, "");
        assert!(res.is_ok());
        assert!(text.contains("Done:"));
    }
}
