//! Style Studio - cinematic treatments, prompt rewrites and styled renders.

mod adapters;
mod api;
mod cassette;
mod cli;
mod config;
mod context;
mod data_uri;
mod error;
mod flows;
mod output;
mod ports;
mod profiles;
mod progress;
mod project;
mod studio;

#[cfg(test)]
mod test_support;

use std::process;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::adapters::storage::file::FileProjectStorage;
use crate::cli::{BriefArgs, Cli, Command, GalleryArgs, StudioArgs};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::StudioError;
use crate::output::{resolve_output_path, save_render};
use crate::project::ProjectStore;
use crate::studio::Studio;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let level = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Command::Serve { .. }, false) => "info",
        _ => "warn",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("style_studio={level},tower_http={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), StudioError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path).map_err(StudioError::Config)?;
    tracing::debug!("Config: {}", config_path.display());

    if let Command::Serve { bind: Some(ref bind) } = cli.command {
        config.server.bind.clone_from(bind);
    }

    let (ctx, recording_session) = ServiceContext::from_env(&config)?;
    let result = dispatch(cli.command, &config, ctx.into_studio(&config)).await;

    // Finish recording if active
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    result
}

/// Run one command. The studio is dropped on return, releasing the
/// recording adapter.
async fn dispatch(command: Command, config: &Config, studio: Studio) -> Result<(), StudioError> {
    match command {
        Command::Serve { .. } => api::serve(studio, &config.server).await,
        Command::Brief(args) => brief(&args, &mut open_project(config), &studio).await,
        Command::SendToStudio => {
            let mut store = open_project(config);
            if store.state().director_treatment.trim().is_empty() {
                return Err(StudioError::InvalidArgument(
                    "No treatment to send. Run `style-studio brief` first.".into(),
                ));
            }
            store.send_treatment_to_studio();
            eprintln!("Treatment sent to studio.");
            Ok(())
        }
        Command::Studio(args) => render(&args, &mut open_project(config), &studio).await,
        Command::Rewrite { apply } => {
            let rewritten = flows::rewrite(&mut open_project(config), &studio, apply, progress_line).await?;
            println!("{rewritten}");
            if apply {
                eprintln!("Studio prompt updated.");
            }
            Ok(())
        }
        Command::Gallery(args) => gallery(&args, &mut open_project(config)),
        Command::Show => {
            show(&open_project(config));
            Ok(())
        }
        Command::Reset => {
            open_project(config).reset();
            eprintln!("Project reset.");
            Ok(())
        }
    }
}

fn open_project(config: &Config) -> ProjectStore {
    let storage = FileProjectStorage::new(&config.project_dir());
    tracing::debug!("Project: {}", storage.path().display());
    ProjectStore::open(Box::new(storage))
}

async fn brief(args: &BriefArgs, store: &mut ProjectStore, studio: &Studio) -> Result<(), StudioError> {
    if let Some(concept) = args.resolve_concept()? {
        store.set_concept_text(concept);
    }
    if args.clear_reference {
        store.set_reference_image(None);
    } else if let Some(ref path) = args.reference {
        store.set_reference_image(Some(data_uri::from_file(path)?));
    }

    let treatment = flows::generate_brief(store, studio, progress_line).await?;
    println!("{treatment}");
    Ok(())
}

async fn render(args: &StudioArgs, store: &mut ProjectStore, studio: &Studio) -> Result<(), StudioError> {
    if let Some(prompt) = args.resolve_prompt()? {
        store.set_studio_prompt(prompt);
    }
    if args.clear_structure {
        store.set_structure_reference(None);
    } else if let Some(ref path) = args.structure {
        store.set_structure_reference(Some(data_uri::from_file(path)?));
    }
    if args.clear_style {
        store.set_style_reference(None);
    } else if let Some(ref path) = args.style {
        store.set_style_reference(Some(data_uri::from_file(path)?));
    }

    let image = flows::render(store, studio, progress_line).await?;
    let output_path = resolve_output_path(args.output.as_deref(), args.format);
    save_render(&image, args.format, &output_path)?;
    eprintln!("Saved: {}", output_path.display());
    Ok(())
}

fn gallery(args: &GalleryArgs, store: &mut ProjectStore) -> Result<(), StudioError> {
    if args.delete {
        if store.state().generated_image.is_none() {
            eprintln!("Gallery is empty.");
        } else {
            store.set_generated_image(None);
            eprintln!("Render deleted.");
        }
        return Ok(());
    }

    let Some(image) = store.state().generated_image.as_deref() else {
        eprintln!("Gallery is empty.");
        return Ok(());
    };

    match args.export {
        Some(ref path) => {
            save_render(image, args.format, path)?;
            eprintln!("Saved: {}", path.display());
        }
        None => {
            let (mime_type, bytes) = data_uri::decode(image)?;
            println!("Latest render: {mime_type}, {} bytes", bytes.len());
            println!("Prompt: {}", store.state().studio_prompt);
        }
    }
    Ok(())
}

fn show(store: &ProjectStore) {
    let state = store.state();
    let present = |v: &Option<String>| if v.is_some() { "set" } else { "none" };

    println!("Concept:            {}", state.concept_text);
    println!("Reference image:    {}", present(&state.reference_image));
    println!("Treatment:          {}", state.director_treatment);
    println!("Studio prompt:      {}", state.studio_prompt);
    println!("Structure ref:      {}", present(&state.structure_reference));
    println!("Style ref:          {}", present(&state.style_reference));
    println!("Latest render:      {}", present(&state.generated_image));
}

fn progress_line(message: &str) {
    eprintln!("> {message}");
}
