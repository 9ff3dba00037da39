use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use mission_core::{FileStore, IntroStore, MemoryStore, Sequencer, StageProgress};
use mission_preview::{PreviewReply, PreviewService, PreviewSource, RemoteEndpoint, parse_reply};
use mission_standards::{StageCatalog, load_catalog, load_default_catalog};
use mission_validate::slot_count;
use tracing::{info, info_span};

use crate::config::Settings;
use crate::play::{Play, run};

/// Stage catalog from `path`, or the built-in one.
pub fn load_stages(path: Option<&Path>) -> Result<StageCatalog> {
    match path {
        Some(path) => {
            load_catalog(path).with_context(|| format!("load catalog {}", path.display()))
        }
        None => load_default_catalog().context("load built-in catalog"),
    }
}

/// One row per stage: number, title, mode, slots, intro frames.
pub fn stage_rows(catalog: &StageCatalog) -> Vec<[String; 5]> {
    catalog
        .iter()
        .map(|stage| {
            [
                stage.number.to_string(),
                stage.title.clone(),
                stage.kind().to_string(),
                slot_count(stage).to_string(),
                stage.intro_segment_count().to_string(),
            ]
        })
        .collect()
}

pub fn stage_table(catalog: &StageCatalog) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Title"),
        header_cell("Mode"),
        header_cell("Slots"),
        header_cell("Intro"),
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
    for row in stage_rows(catalog) {
        table.add_row(row.to_vec());
    }
    for index in [0, 3, 4] {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn run_stages(catalog: &StageCatalog) -> Result<()> {
    println!("{}", stage_table(catalog));
    Ok(())
}

/// Preview source chosen by `endpoint` (flag first, then settings).
pub fn preview_source(
    settings: &Settings,
    endpoint: Option<&str>,
) -> Result<Box<dyn PreviewSource>> {
    let config = settings.preview_config();
    match endpoint.or(settings.preview.endpoint.as_deref()) {
        Some(endpoint) => {
            let remote = RemoteEndpoint::new(endpoint, &config)
                .with_context(|| format!("preview endpoint {endpoint}"))?;
            Ok(Box::new(remote))
        }
        None => {
            let service = PreviewService::http(&config).context("create preview client")?;
            Ok(Box::new(service))
        }
    }
}

/// Resolve one preview and return the reply as sent. Unreadable bodies
/// become the iframe fallback.
pub fn run_preview(source: &dyn PreviewSource, target: &str) -> PreviewReply {
    let span = info_span!("preview", target);
    let _guard = span.enter();
    match source.request(target) {
        Ok((status, body)) => match parse_reply(&body) {
            Ok(response) => PreviewReply { status, response },
            Err(err) => PreviewReply {
                status,
                response: err.fallback(target),
            },
        },
        Err(err) => PreviewReply::ok(err.fallback(target)),
    }
}

/// Options for an interactive session.
#[derive(Debug, Clone, Default)]
pub struct PlayOptions<'a> {
    pub stage: Option<u32>,
    pub session: Option<&'a Path>,
    pub no_retreat: bool,
}

pub fn run_play(catalog: StageCatalog, settings: &Settings, options: &PlayOptions<'_>) -> Result<()> {
    let previews = preview_source(settings, None)?;
    let session = options.session.or(settings.session.path.as_deref());
    match session {
        Some(path) => {
            info!(path = %path.display(), "using session file");
            play_with(catalog, FileStore::open(path), settings, options, previews)
        }
        None => play_with(catalog, MemoryStore::new(), settings, options, previews),
    }
}

fn play_with<S: IntroStore>(
    catalog: StageCatalog,
    store: S,
    settings: &Settings,
    options: &PlayOptions<'_>,
    previews: Box<dyn PreviewSource>,
) -> Result<()> {
    let sequencer = build_sequencer(catalog, store, settings, options);
    let mut play = Play::new(sequencer).with_previews(previews);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    run(&mut play, stdin.lock(), &mut stdout)?;
    stdout.flush().context("flush output")?;

    if let Some(progress) = play.sequencer().progress() {
        log_exit(progress);
    }
    Ok(())
}

/// Sequencer configured from settings, with `--no-retreat` winning over the
/// settings file. `--stage` is opened like a route, so an unknown stage lands
/// on the not-found screen.
pub fn build_sequencer<S: IntroStore>(
    catalog: StageCatalog,
    store: S,
    settings: &Settings,
    options: &PlayOptions<'_>,
) -> Sequencer<S> {
    let mut policy = settings.navigation_policy();
    if options.no_retreat {
        policy.allow_retreat = false;
    }
    let mut sequencer = Sequencer::with_policy(catalog, store, policy)
        .with_pulse_duration(settings.pulse_duration());
    if let Some(stage) = options.stage {
        sequencer.open_route(&stage.to_string());
    }
    sequencer
}

fn log_exit(progress: &StageProgress) {
    info!(
        stage = %progress.stage_number(),
        cleared = progress.is_cleared(),
        "session ended"
    );
}
