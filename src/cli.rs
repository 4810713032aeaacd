//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Cinematic prompt and image studio backed by Gemini.
#[derive(Parser, Debug)]
#[command(name = "style-studio", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose logging (same as `RUST_LOG=debug`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Address to bind, overriding the config file.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Generate a director's treatment from a concept.
    Brief(BriefArgs),
    /// Copy the treatment and brief reference into the studio.
    SendToStudio,
    /// Render the studio prompt into an image.
    Studio(StudioArgs),
    /// Rewrite the studio prompt for gritty realism.
    Rewrite {
        /// Replace the studio prompt with the rewrite.
        #[arg(long)]
        apply: bool,
    },
    /// Show, export or delete the latest render.
    Gallery(GalleryArgs),
    /// Print the current project.
    Show,
    /// Discard the project and start over.
    Reset,
}

/// Arguments for `brief`.
#[derive(Args, Debug)]
pub struct BriefArgs {
    /// Concept text. Replaces the stored concept.
    #[arg(conflicts_with = "concept_file")]
    pub concept: Option<String>,

    /// Path to a file containing the concept text.
    #[arg(short = 'c', long)]
    pub concept_file: Option<PathBuf>,

    /// Reference image (JPEG, PNG, GIF or WebP).
    #[arg(short, long, conflicts_with = "clear_reference")]
    pub reference: Option<PathBuf>,

    /// Drop the stored reference image.
    #[arg(long)]
    pub clear_reference: bool,
}

impl BriefArgs {
    /// The concept given on the command line, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the concept file cannot be read.
    pub fn resolve_concept(&self) -> Result<Option<String>, std::io::Error> {
        match (&self.concept, &self.concept_file) {
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => std::fs::read_to_string(path).map(Some),
            (None, None) => Ok(None),
        }
    }
}

/// Arguments for `studio`.
#[derive(Args, Debug)]
pub struct StudioArgs {
    /// Prompt text. Replaces the stored studio prompt.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long)]
    pub prompt_file: Option<PathBuf>,

    /// Structure reference image: composition to keep.
    #[arg(long, conflicts_with = "clear_structure")]
    pub structure: Option<PathBuf>,

    /// Style reference image: look to imitate.
    #[arg(long, conflicts_with = "clear_style")]
    pub style: Option<PathBuf>,

    /// Drop the stored structure reference.
    #[arg(long)]
    pub clear_structure: bool,

    /// Drop the stored style reference.
    #[arg(long)]
    pub clear_style: bool,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,
}

impl StudioArgs {
    /// The prompt given on the command line, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt file cannot be read.
    pub fn resolve_prompt(&self) -> Result<Option<String>, std::io::Error> {
        match (&self.prompt, &self.prompt_file) {
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => std::fs::read_to_string(path).map(Some),
            (None, None) => Ok(None),
        }
    }
}

/// Arguments for `gallery`.
#[derive(Args, Debug)]
pub struct GalleryArgs {
    /// Save the latest render to this path.
    #[arg(short, long, conflicts_with = "delete")]
    pub export: Option<PathBuf>,

    /// Format for `--export`.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// Remove the latest render from the project.
    #[arg(long)]
    pub delete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_positional_concept() {
        let cli = Cli::parse_from(["style-studio", "brief", "a dragon in a sandbox"]);
        let Command::Brief(args) = cli.command else { panic!("expected brief") };
        assert_eq!(args.resolve_concept().unwrap().as_deref(), Some("a dragon in a sandbox"));
        assert!(args.reference.is_none());
    }

    #[test]
    fn brief_without_concept_uses_stored_one() {
        let cli = Cli::parse_from(["style-studio", "brief"]);
        let Command::Brief(args) = cli.command else { panic!("expected brief") };
        assert!(args.resolve_concept().unwrap().is_none());
    }

    #[test]
    fn concept_file_flag() {
        let dir = std::env::temp_dir().join("style_studio_cli_concept");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("concept.txt");
        std::fs::write(&path, "concept from file").unwrap();

        let cli = Cli::parse_from(["style-studio", "brief", "-c", path.to_str().unwrap()]);
        let Command::Brief(args) = cli.command else { panic!("expected brief") };
        assert_eq!(args.resolve_concept().unwrap().as_deref(), Some("concept from file"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn studio_defaults() {
        let cli = Cli::parse_from(["style-studio", "studio"]);
        let Command::Studio(args) = cli.command else { panic!("expected studio") };
        assert!(args.resolve_prompt().unwrap().is_none());
        assert_eq!(args.format, OutputFormat::Png);
        assert!(args.output.is_none());
        assert!(!args.clear_structure);
        assert!(!cli.verbose);
    }

    #[test]
    fn studio_all_options() {
        let cli = Cli::parse_from([
            "style-studio",
            "-v",
            "studio",
            "--structure",
            "pose.png",
            "--style",
            "look.jpg",
            "-o",
            "out.webp",
            "-f",
            "webp",
            "a ferry at dusk",
        ]);
        assert!(cli.verbose);
        let Command::Studio(args) = cli.command else { panic!("expected studio") };
        assert_eq!(args.prompt.as_deref(), Some("a ferry at dusk"));
        assert_eq!(args.structure, Some(PathBuf::from("pose.png")));
        assert_eq!(args.style, Some(PathBuf::from("look.jpg")));
        assert_eq!(args.output, Some(PathBuf::from("out.webp")));
        assert_eq!(args.format, OutputFormat::Webp);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["style-studio", "show", "--config", "x.toml", "--verbose"]);
        assert!(matches!(cli.command, Command::Show));
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
        assert!(cli.verbose);
    }

    #[test]
    fn rewrite_apply_flag() {
        let cli = Cli::parse_from(["style-studio", "rewrite", "--apply"]);
        assert!(matches!(cli.command, Command::Rewrite { apply: true }));
    }

    #[test]
    fn gallery_export_conflicts_with_delete() {
        let result = Cli::try_parse_from(["style-studio", "gallery", "--export", "a.png", "--delete"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["style-studio", "studio", "-f", "tiff"]);
        assert!(result.is_err());
    }
}
