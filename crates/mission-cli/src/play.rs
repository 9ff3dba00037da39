//! Interactive play loop.
//!
//! Reads one line at a time. Plain text is an answer (or a scanned URL),
//! lines starting with `/` are commands, and an empty line moves the story
//! along: next intro frame, close the open notice, close the preview.

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use mission_core::{IntroStore, NOT_FOUND_MESSAGE, Phase, PulseKind, Sequencer};
use mission_model::{BingoGate, PuzzleMode, StageDefinition, SubmitOutcome, TapOutcome};
use mission_preview::{PreviewClient, PreviewSource, ScanSession, ScanState, is_http_url};
use mission_validate::card_tokens;
use tracing::{debug, trace};

pub const HELP: &str = "\
Enter            next intro frame / close notice / close preview
<text>           answer (a URL shows its QR preview)
/next  /prev     next or previous intro frame or stage
/submit          check the current input
/reset           clear the current input
/ok              close the open notice
/back            close the preview
/stage N         jump to stage N
/restart         back to stage 1
/slot I TEXT     fill input slot I
/tap N           tap bingo cell N
/rewind N        keep only the first N bingo words
/help  /quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Text(String),
    Next,
    Prev,
    Submit,
    Reset,
    Acknowledge,
    Back,
    Stage(String),
    Restart,
    Slot(usize, String),
    Tap(usize),
    Rewind(usize),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Text(line.to_string());
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));
    let unknown = || Input::Unknown(line.to_string());

    match name {
        "next" => Input::Next,
        "prev" => Input::Prev,
        "submit" => Input::Submit,
        "reset" => Input::Reset,
        "ok" => Input::Acknowledge,
        "back" => Input::Back,
        "restart" => Input::Restart,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        "stage" if !rest.is_empty() => Input::Stage(rest.to_string()),
        "tap" => rest.parse().map_or_else(|_| unknown(), Input::Tap),
        "rewind" => rest.parse().map_or_else(|_| unknown(), Input::Rewind),
        "slot" => {
            let (index, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            index
                .parse()
                .map_or_else(|_| unknown(), |index| Input::Slot(index, value.trim().to_string()))
        }
        _ => unknown(),
    }
}

/// Whether the loop keeps going, with an optional line for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Option<String>),
    Quit,
}

impl Flow {
    fn say(message: impl Into<String>) -> Self {
        Flow::Continue(Some(message.into()))
    }

    fn quiet() -> Self {
        Flow::Continue(None)
    }
}

/// A play session: the sequencer plus the scan side.
pub struct Play<S: IntroStore> {
    sequencer: Sequencer<S>,
    scans: ScanSession,
    previews: Option<PreviewClient<Box<dyn PreviewSource>>>,
}

impl<S: IntroStore> Play<S> {
    pub fn new(sequencer: Sequencer<S>) -> Self {
        Self {
            sequencer,
            scans: ScanSession::new(),
            previews: None,
        }
    }

    /// Resolve previews for scanned URLs through `source`.
    pub fn with_previews(mut self, source: Box<dyn PreviewSource>) -> Self {
        self.previews = Some(PreviewClient::new(source));
        self
    }

    pub fn sequencer(&self) -> &Sequencer<S> {
        &self.sequencer
    }

    pub fn scans(&self) -> &ScanSession {
        &self.scans
    }

    pub fn into_sequencer(self) -> Sequencer<S> {
        self.sequencer
    }

    pub fn handle(&mut self, input: Input, now: Instant) -> Flow {
        self.sequencer.sweep_pulses(now);
        let phase = self.sequencer.phase();
        match input {
            Input::Quit => Flow::Quit,
            Input::Help => Flow::say(HELP),
            Input::Unknown(line) => Flow::say(format!("unknown command: {line} (try /help)")),
            Input::Empty => {
                if self.scans.is_locked() {
                    self.scans.dismiss();
                    return Flow::quiet();
                }
                match phase {
                    Phase::Intro { .. } => {
                        self.sequencer.advance_intro();
                    }
                    Phase::Submitting(_) => {
                        self.sequencer.acknowledge();
                    }
                    _ => {}
                }
                Flow::quiet()
            }
            Input::Back => {
                self.scans.cancel();
                Flow::quiet()
            }
            Input::Next => {
                let moved = match phase {
                    Phase::Intro { .. } => self.sequencer.advance_intro(),
                    _ => self.sequencer.advance(),
                };
                refused(moved, "cannot move forward yet")
            }
            Input::Prev => {
                let moved = match phase {
                    Phase::Intro { .. } => self.sequencer.retreat_intro(),
                    _ => self.sequencer.retreat(),
                };
                refused(moved, "cannot go back from here")
            }
            Input::Acknowledge => refused(self.sequencer.acknowledge().is_some(), "nothing to close"),
            Input::Submit => self.submit(),
            Input::Reset => refused(self.sequencer.reset_input(), "nothing to clear"),
            Input::Stage(route) => {
                self.sequencer.open_route(&route);
                Flow::quiet()
            }
            Input::Restart => {
                self.sequencer.restart();
                Flow::quiet()
            }
            Input::Slot(index, value) => {
                let accepted = index
                    .checked_sub(1)
                    .is_some_and(|index| self.sequencer.set_slot(index, &value));
                refused(accepted, "that slot cannot be filled now")
            }
            Input::Tap(number) => match number.checked_sub(1) {
                Some(cell) => self.tap(cell, now),
                None => Flow::say("cells are numbered from 1"),
            },
            Input::Rewind(keep) => refused(self.sequencer.rewind_bingo(keep), "cannot rewind there"),
            Input::Text(text) => self.text(&text, phase, now),
        }
    }

    fn text(&mut self, text: &str, phase: Phase, now: Instant) -> Flow {
        if is_http_url(text) && self.previews.is_some() {
            return self.scan(text);
        }
        match phase {
            Phase::Editing => {}
            Phase::Intro { .. } | Phase::Submitting(_) => {
                return Flow::say("press Enter to continue");
            }
            Phase::Cleared => return Flow::say("stage cleared, /next to continue"),
            Phase::NotFound => return Flow::say("/restart to start over"),
        }

        if let Some(cell) = self.board_lookup(text) {
            return match cell {
                Some(cell) => self.tap(cell, now),
                None => Flow::say(format!("no cell reads \"{text}\"")),
            };
        }

        trace!(answer = text, "typed answer");
        if !self.sequencer.type_answer(text) {
            return Flow::say("input is not accepted now");
        }
        self.submit()
    }

    /// Cell named by `label` while a bingo board takes taps. `None` when
    /// the text is not a board tap at all.
    fn board_lookup(&self, label: &str) -> Option<Option<usize>> {
        let stage = self.sequencer.stage()?;
        let gate = self.sequencer.progress()?.bingo()?.gate();
        match &stage.puzzle {
            PuzzleMode::Bingo(spec) if gate == BingoGate::Sequence => {
                Some(spec.find_cell(label))
            }
            _ => None,
        }
    }

    fn submit(&mut self) -> Flow {
        match self.sequencer.submit() {
            SubmitOutcome::Incomplete => Flow::say("fill in every slot first"),
            outcome => {
                debug!(?outcome, "answer submitted");
                Flow::quiet()
            }
        }
    }

    fn tap(&mut self, cell: usize, now: Instant) -> Flow {
        match self.sequencer.tap_cell(cell, now) {
            TapOutcome::Ignored => Flow::say("the board is not accepting taps"),
            _ => Flow::quiet(),
        }
    }

    fn scan(&mut self, target: &str) -> Flow {
        let Some(client) = &self.previews else {
            return Flow::quiet();
        };
        let Some(ticket) = self.scans.begin(target) else {
            return Flow::say("a preview is already open, press Enter to close it");
        };
        let preview = client.preview(ticket.target());
        self.scans.complete(&ticket, preview);
        Flow::quiet()
    }

    /// Current screen.
    pub fn render(&self, now: Instant) -> String {
        let mut out = String::new();
        if let ScanState::Showing { target, preview } = self.scans.state() {
            let _ = writeln!(out, "scan: {target}");
            let _ = writeln!(out, "preview: {}", preview.to_json());
            out.push_str("(Enter to close)");
            return out;
        }

        let phase = self.sequencer.phase();
        let Some(stage) = self.sequencer.stage() else {
            let _ = writeln!(out, "{NOT_FOUND_MESSAGE}");
            out.push_str("(/restart to start over)");
            return out;
        };
        let _ = writeln!(out, "== {}: {} ==", stage.title, stage.puzzle_title);

        match phase {
            Phase::Intro { position, total } => {
                if let Some(frame) = stage.intro.get(position) {
                    let _ = writeln!(out, "[{}/{total}] {}", position + 1, frame.image);
                    if let Some(narration) = &frame.narration {
                        let _ = writeln!(out, "{narration}");
                    }
                }
                out.push_str("(Enter for next)");
            }
            Phase::Submitting(notice) => {
                let _ = write!(out, ">> {notice}\n(Enter to continue)");
            }
            Phase::Editing | Phase::Cleared => {
                if let Some(prompt) = self.sequencer.prompt() {
                    let _ = writeln!(out, "{prompt}");
                }
                self.render_puzzle(&mut out, stage, now);
                if phase == Phase::Cleared {
                    out.push_str("** stage cleared **");
                    if self.sequencer.can_advance() {
                        out.push_str(" (/next)");
                    }
                }
            }
            Phase::NotFound => {}
        }
        out.trim_end().to_string()
    }

    fn render_puzzle(&self, out: &mut String, stage: &StageDefinition, now: Instant) {
        let Some(progress) = self.sequencer.progress() else {
            return;
        };
        match &stage.puzzle {
            PuzzleMode::FreeText { .. } | PuzzleMode::Coordinate { .. } => {
                let slots: String = progress
                    .buffer()
                    .iter()
                    .map(|slot| format!("[{}]", if slot.is_empty() { "_" } else { slot }))
                    .collect();
                let _ = writeln!(out, "{slots}");
                let mut cards: Vec<&str> = card_tokens(stage).iter().map(String::as_str).collect();
                if !cards.is_empty() {
                    cards.sort_unstable();
                    let _ = writeln!(out, "cards: {}", cards.join(" "));
                }
            }
            PuzzleMode::QrSet { answers } => {
                let found: Vec<&str> = progress
                    .buffer()
                    .iter()
                    .filter(|slot| !slot.is_empty())
                    .map(String::as_str)
                    .collect();
                let _ = writeln!(out, "found {}/{}: {}", found.len(), answers.len(), found.join(" | "));
            }
            PuzzleMode::Bingo(spec) => {
                let hit = self.sequencer.pulses().active(PulseKind::Correct, now);
                let miss = self.sequencer.pulses().active(PulseKind::Wrong, now);
                let mut cell = 0;
                for row in &spec.board {
                    let line: Vec<String> = row
                        .iter()
                        .map(|label| {
                            cell += 1;
                            let mark = if hit == Some(cell - 1) {
                                "+"
                            } else if miss == Some(cell - 1) {
                                "x"
                            } else {
                                " "
                            };
                            format!("{mark}{cell:>2}.{label}")
                        })
                        .collect();
                    let _ = writeln!(out, "{}", line.join("  "));
                }
                let _ = writeln!(out, "> {}", self.sequencer.revealed_labels().join(" "));
                if progress
                    .bingo()
                    .is_some_and(|bingo| bingo.gate() == BingoGate::FinalPhrase)
                {
                    let phrase = progress.buffer().first().map_or("", String::as_str);
                    let _ = writeln!(out, "[{phrase}]");
                }
            }
        }
    }
}

fn refused(accepted: bool, message: &str) -> Flow {
    if accepted {
        Flow::quiet()
    } else {
        Flow::say(message)
    }
}

/// Run the loop until `/quit` or end of input.
pub fn run<S, R, W>(play: &mut Play<S>, input: R, out: &mut W) -> Result<()>
where
    S: IntroStore,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", play.render(Instant::now())).context("write screen")?;
    for line in input.lines() {
        let line = line.context("read input")?;
        let now = Instant::now();
        match play.handle(parse_input(&line), now) {
            Flow::Quit => break,
            Flow::Continue(message) => {
                if let Some(message) = message {
                    writeln!(out, "{message}").context("write message")?;
                }
            }
        }
        writeln!(out, "{}", play.render(now)).context("write screen")?;
        out.flush().context("flush output")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("   "), Input::Empty);
        assert_eq!(parse_input(" 사랑 "), Input::Text("사랑".to_string()));
        assert_eq!(parse_input("/stage 3"), Input::Stage("3".to_string()));
        assert_eq!(parse_input("/tap 12"), Input::Tap(12));
        assert_eq!(parse_input("/rewind 0"), Input::Rewind(0));
        assert_eq!(parse_input("/slot 2 랑"), Input::Slot(2, "랑".to_string()));
        assert_eq!(parse_input("/slot 2"), Input::Slot(2, String::new()));
        assert_eq!(parse_input("/exit"), Input::Quit);
        assert_eq!(parse_input("/tap x"), Input::Unknown("/tap x".to_string()));
        assert_eq!(parse_input("/stage"), Input::Unknown("/stage".to_string()));
    }
}
