use camino::Utf8PathBuf;
use clap::Parser;
use mod_overlay_lib::config::global::{load_config, save_config};
use mod_overlay_lib::config::AppSettings;
use mod_overlay_lib::core::collection::Collection;
use mod_overlay_lib::core::resolver::Resolution;
use mod_overlay_lib::models::conflict::{EditConflict, FileConflict};
use mod_overlay_lib::models::error::ModError;
use mod_overlay_lib::models::mod_def::ModId;
use mod_overlay_lib::utils::logging;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "mod_overlay",
    about = "Resolves which mod file serves every overridden game path",
    version,
    author
)]
struct Cli {
    /// Collection directory; defaults to the last opened one
    collection: Option<Utf8PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Only print the conflict log
    #[arg(long)]
    conflicts_only: bool,

    /// Restrict the report to one mod
    #[arg(long = "mod", value_name = "ID")]
    mod_id: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "MOD_OVERLAY_LOG")]
    log_level: Option<String>,
}

#[derive(Serialize)]
struct RedirectRow<'a> {
    game: String,
    real: &'a camino::Utf8Path,
    owner: &'a ModId,
}

#[derive(Serialize)]
struct ModConflicts<'a> {
    files: &'a [FileConflict],
    edits: &'a [EditConflict],
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    redirects: Option<Vec<RedirectRow<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edits: Option<Vec<&'a mod_overlay_lib::core::resolver::AppliedEdit>>,
    conflicts: BTreeMap<&'a ModId, ModConflicts<'a>>,
}

fn build_report<'a>(res: &'a Resolution, cli: &Cli, only: Option<&ModId>) -> Report<'a> {
    let keep = |owner: &ModId| only.map_or(true, |id| id == owner);

    let redirects = (!cli.conflicts_only).then(|| {
        res.sorted_redirects()
            .into_iter()
            .filter(|(_, r)| keep(&r.owner))
            .map(|(game, r)| RedirectRow {
                game: game.to_string(),
                real: r.path.as_path(),
                owner: &r.owner,
            })
            .collect()
    });
    let edits = (!cli.conflicts_only).then(|| {
        res.sorted_edits()
            .into_iter()
            .filter(|e| keep(&e.owner))
            .collect()
    });
    let conflicts = res
        .conflicts()
        .mods()
        .filter(|id| keep(id))
        .map(|id| {
            let entry = ModConflicts {
                files: res.conflicts().file_conflicts(id),
                edits: res.conflicts().edit_conflicts(id),
            };
            (id, entry)
        })
        .collect();

    Report {
        redirects,
        edits,
        conflicts,
    }
}

fn print_text(report: &Report<'_>) {
    if let Some(redirects) = &report.redirects {
        println!("Redirects ({}):", redirects.len());
        for row in redirects {
            println!("  {} -> {} [{}]", row.game, row.real, row.owner);
        }
    }
    if let Some(edits) = &report.edits {
        println!("Edits ({}):", edits.len());
        for applied in edits {
            println!("  {} [{}]", applied.edit.id(), applied.owner);
        }
    }
    println!("Conflicts:");
    for (id, entry) in &report.conflicts {
        println!("  {id}:");
        for c in entry.files {
            println!("    {} with {} ({})", c.artifact, c.other, describe(c.won, c.resolved, c.redundant));
        }
        for c in entry.edits {
            println!("    {} with {} ({})", c.artifact, c.other, describe(c.won, c.resolved, c.redundant));
        }
    }
}

fn describe(won: bool, resolved: bool, redundant: bool) -> String {
    let mut text = String::from(if won { "won" } else { "lost" });
    if !resolved {
        text.push_str(", same priority");
    }
    if redundant {
        text.push_str(", identical");
    }
    text
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (settings, settings_error) = match AppSettings::load() {
        Ok(s) => (s, None),
        Err(e) => (AppSettings::default(), Some(e)),
    };
    let level = cli.log_level.clone().unwrap_or_else(|| settings.log_level.clone());
    let _guard = logging::init(&level, settings.log_dir.as_deref())?;
    if let Some(e) = settings_error {
        warn!("failed to read settings, using defaults: {e}");
    }

    let mut global = load_config();
    let root = cli
        .collection
        .clone()
        .or_else(|| global.last_opened.clone())
        .ok_or_else(|| ModError::Config("no collection given and none opened before".into()))?;

    let mut collection = Collection::load(&root)?;
    collection.save_if_dirty()?;
    global.update_recent(&root);
    save_config(&global);

    let only = cli.mod_id.clone().map(ModId::from);
    if let Some(id) = &only {
        if collection.get_mod(id).is_none() {
            return Err(ModError::ModNotFound(id.to_string()).into());
        }
    }

    let resolution = collection.resolve();
    let report = build_report(&resolution, &cli, only.as_ref());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}
