//! `sift review`: the interactive one-track-at-a-time review loop
//!
//! The engine does all the thinking; this module is a thin terminal skin
//! over its snapshot stream. Arrow keys stand in for the swipe gesture as
//! the discrete decision path.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, execute};

use sift_core::{CollectionClient, CollectionSelection, Outcome, SiftConfig};
use sift_review::{Phase, ReviewEngine, ReviewSnapshot};

pub async fn run(
    mut config: SiftConfig,
    playlist: Option<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    config.dry_run = config.dry_run || dry_run;

    let client = super::client(&config)?;
    let selection = match playlist {
        None => CollectionSelection::liked(),
        Some(id) => {
            // resolve the display name; fall back to the bare id
            let name = client
                .playlists()
                .await?
                .into_iter()
                .find(|p| p.id == id)
                .map(|p| p.name)
                .unwrap_or_else(|| id.clone());
            CollectionSelection::playlist(id, name)
        }
    };

    let engine = ReviewEngine::new(client as Arc<dyn CollectionClient>, &config);
    engine.select_collection(selection.clone()).await?;

    terminal::enable_raw_mode()?;
    let result = review_loop(&engine, &selection).await;
    terminal::disable_raw_mode()?;
    println!();

    summarize(&engine).await;
    result
}

async fn review_loop(engine: &ReviewEngine, selection: &CollectionSelection) -> anyhow::Result<()> {
    let mut last_drawn: Option<(Phase, Option<String>, usize, usize)> = None;

    loop {
        let snapshot = engine.snapshot().await;
        let key = (
            snapshot.phase,
            snapshot.track.as_ref().map(|t| t.id.clone()),
            snapshot.progress.reviewed,
            snapshot.progress.buffered,
        );
        if last_drawn.as_ref() != Some(&key) {
            draw(&snapshot, selection)?;
            last_drawn = Some(key);
        }

        // terminal states: nothing on screen and nothing more coming
        if snapshot.track.is_none() && snapshot.phase != Phase::Loading {
            if snapshot.phase == Phase::Error {
                anyhow::bail!("review stopped on an error; see the log for details");
            }
            break;
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        let outcome = match key_event.code {
            KeyCode::Right | KeyCode::Char('k') => Some(Outcome::Keep),
            KeyCode::Left | KeyCode::Char('x') => Some(Outcome::Discard),
            KeyCode::Char('q') | KeyCode::Esc => break,
            _ => None,
        };
        if let Some(outcome) = outcome {
            if engine.current_track().await.is_some() {
                engine.decide(outcome).await?;
            }
        }
    }
    Ok(())
}

fn draw(snapshot: &ReviewSnapshot, selection: &CollectionSelection) -> anyhow::Result<()> {
    let mut out = std::io::stdout();
    execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let total = snapshot
        .progress
        .total
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".to_string());

    write!(out, "Reviewing: {}\r\n\r\n", selection.name)?;
    match (&snapshot.phase, &snapshot.track) {
        (_, Some(track)) => {
            write!(out, "  {}\r\n", track.name)?;
            write!(out, "  {}\r\n\r\n", track.artist)?;
        }
        (Phase::Loading, None) => {
            write!(out, "  Loading tracks...\r\n\r\n")?;
        }
        (Phase::Error, None) => {
            write!(out, "  Something went wrong.\r\n\r\n")?;
        }
        (_, None) => {
            if snapshot.progress.total == Some(0) {
                write!(out, "  No tracks found in this collection.\r\n\r\n")?;
            } else {
                write!(out, "  All tracks reviewed!\r\n\r\n")?;
            }
        }
    }

    write!(
        out,
        "{} / {} ({} loaded)\r\n",
        snapshot.progress.reviewed.min(snapshot.progress.total.unwrap_or(usize::MAX)),
        total,
        snapshot.progress.buffered
    )?;
    write!(out, "\r\n[<-/x] discard   [->/k] keep   [q] quit\r\n")?;
    out.flush()?;
    Ok(())
}

async fn summarize(engine: &ReviewEngine) {
    let decisions = engine.decisions().await;
    let kept = decisions
        .iter()
        .filter(|d| d.outcome == Outcome::Keep)
        .count();
    let discarded = decisions.len() - kept;
    println!("Reviewed {} tracks: {kept} kept, {discarded} discarded.", decisions.len());
}
