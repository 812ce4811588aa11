//! Command-line front end for the blog post editor.
//!
//! # Responsibility
//! - Map subcommands onto `EditorSession` operations.
//! - Print user-visible notices to stderr after every command.

mod config;

use anyhow::{anyhow, bail, Context, Result};
use blogdesk_core::repo::document_store::{export_file_name, timestamped_export_file_name};
use blogdesk_core::{
    init_logging, EditorSession, ImageEntry, SectionDraft, SectionKind, SectionPosition,
    SyncReport, SyncStatus, SyncWorker, VersionSync,
};
use chrono::Local;
use config::{Command, Config, LangCommand, MetaArgs, SectionCommand};
use log::info;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let config = Config::from_env()?;

    let log_dir = absolute(&config.log_dir)?;
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        eprintln!("[warning] file logging disabled: {err}");
    }

    let sync = config.editor.git_sync(&config.repo_dir);
    let store = config.editor.store();
    let mut session = EditorSession::new(config.editor.clone(), store, sync);
    session.open();
    if config.force_overwrite {
        session.allow_overwrite();
    }

    let result = run(&mut session, &config, &config.command);
    for notice in session.drain_notices() {
        eprintln!("{notice}");
    }
    result
}

type Session<V> = EditorSession<blogdesk_core::JsonFileStore, V>;

fn run<V: VersionSync>(session: &mut Session<V>, config: &Config, command: &Command) -> Result<()> {
    match command {
        Command::List => {
            for summary in session.summaries() {
                println!(
                    "{}\t{}\t{}\t{}",
                    summary.slug,
                    summary.date,
                    summary.languages.join(","),
                    summary.title
                );
            }
            Ok(())
        }
        Command::New { id } => {
            session.new_project(id)?;
            push_if_requested(session)
        }
        Command::Rename { id, new_id } => {
            session.select_project(id)?;
            session.rename_current(new_id)?;
            push_if_requested(session)
        }
        Command::Delete { id } => {
            session.select_project(id)?;
            session.delete_current()?;
            push_if_requested(session)
        }
        Command::Lang(lang) => run_lang(session, lang),
        Command::Section(section) => run_section(session, section),
        Command::Meta(meta) => run_meta(session, meta),
        Command::Preview { project, lang, out } => {
            session.select_project(project)?;
            let html = match lang {
                Some(code) => session.preview(code)?,
                None => session.preview_project()?,
            };
            match out {
                Some(path) => std::fs::write(path, html)
                    .with_context(|| format!("failed to write preview to {}", path.display()))?,
                None => print!("{html}"),
            }
            Ok(())
        }
        Command::Export {
            project,
            out,
            timestamped,
        } => {
            session.select_project(project)?;
            let path = match out {
                Some(path) => path.clone(),
                None if *timestamped => PathBuf::from(timestamped_export_file_name(
                    project,
                    Local::now().naive_local(),
                )),
                None => PathBuf::from(export_file_name(project)),
            };
            session.export_current(&path)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Import { file, on_conflict } => {
            let id = session.import_file(file, (*on_conflict).into())?;
            println!("{id}");
            push_if_requested(session)
        }
        Command::Migrate => save(session),
        Command::Push => push_in_background(session, config),
    }
}

fn run_lang<V: VersionSync>(session: &mut Session<V>, command: &LangCommand) -> Result<()> {
    match command {
        LangCommand::Add {
            project,
            code,
            name,
        } => {
            session.select_project(project)?;
            let label = session.add_language(code, name)?;
            println!("{label}");
            save(session)
        }
        LangCommand::Remove { project, code } => {
            session.select_project(project)?;
            if !session.remove_language(code)? {
                println!("language `{code}` not present");
            }
            push_if_requested(session)
        }
    }
}

fn run_section<V: VersionSync>(session: &mut Session<V>, command: &SectionCommand) -> Result<()> {
    match command {
        SectionCommand::Add {
            project,
            lang,
            kind,
            title,
            body,
            images,
            index,
            top,
        } => {
            session.select_project(project)?;
            let draft = SectionDraft {
                kind: parse_kind(kind)?,
                title: title.clone(),
                body: body.clone(),
                images: images.iter().map(|value| parse_image(value)).collect(),
                ..SectionDraft::new()
            };
            let section = draft.to_section();
            let position = match (top, index) {
                (true, _) => SectionPosition::Top,
                (false, Some(index)) => SectionPosition::Index(*index),
                (false, None) => SectionPosition::Bottom,
            };
            session.with_translation_mut(lang, |translation| {
                translation.insert_section(section, position)
            })?;
        }
        SectionCommand::Remove {
            project,
            lang,
            index,
        } => {
            session.select_project(project)?;
            let removed = session.with_translation_mut(lang, |translation| {
                translation
                    .section_id_at(*index)
                    .and_then(|id| translation.remove_section(id))
            })?;
            if removed.is_none() {
                bail!("no section at index {index}");
            }
        }
        SectionCommand::Retype {
            project,
            lang,
            index,
            kind,
        } => {
            session.select_project(project)?;
            let kind = parse_kind(kind)?;
            let changed = session.with_translation_mut(lang, |translation| {
                translation
                    .section_id_at(*index)
                    .map(|id| translation.change_section_type(id, kind))
            })?;
            changed.ok_or_else(|| anyhow!("no section at index {index}"))??;
        }
    }
    save(session)
}

fn run_meta<V: VersionSync>(session: &mut Session<V>, meta: &MetaArgs) -> Result<()> {
    session.select_project(&meta.project)?;
    let mut draft = session.translation_draft(&meta.lang)?;
    let fields = [
        (&meta.title, &mut draft.title),
        (&meta.date, &mut draft.date),
        (&meta.author, &mut draft.author),
        (&meta.category, &mut draft.category),
        (&meta.description, &mut draft.description),
        (&meta.tags, &mut draft.tags),
    ];
    for (value, slot) in fields {
        if let Some(value) = value {
            slot.clone_from(value);
        }
    }
    session.apply_draft(&meta.lang, &draft)?;
    save(session)
}

fn push_in_background<V: VersionSync>(session: &Session<V>, config: &Config) -> Result<()> {
    let worker = SyncWorker::spawn(
        config.editor.git_sync(&config.repo_dir),
        config.editor.sync_queue_capacity,
    )?;
    worker.submit(session.store_path())?;
    for outcome in worker.shutdown() {
        print_report(&outcome.result?);
    }
    Ok(())
}

// Structural edits are already written by the session; only a push is left.
fn push_if_requested<V: VersionSync>(session: &mut Session<V>) -> Result<()> {
    if session.config().push_on_save {
        save(session)
    } else {
        Ok(())
    }
}

fn save<V: VersionSync>(session: &mut Session<V>) -> Result<()> {
    match session.save(false)? {
        SyncStatus::Pushed(report) => {
            info!("event=cli_push module=cli status=ok");
            print_report(&report);
        }
        SyncStatus::Skipped | SyncStatus::Failed(_) => {}
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    if report.committed {
        println!("{}", report.commit_message);
    } else {
        println!("no changes to commit; pushed existing commits");
    }
}

fn parse_kind(value: &str) -> Result<SectionKind> {
    SectionKind::parse(value).ok_or_else(|| {
        let known: Vec<&str> = SectionKind::ALL.iter().map(|kind| kind.as_str()).collect();
        anyhow!("unknown section type `{value}`; expected {}", known.join("|"))
    })
}

fn parse_image(value: &str) -> ImageEntry {
    match value.split_once('=') {
        Some((src, alt)) => ImageEntry::new(src, alt),
        None => ImageEntry::new(value, ""),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
