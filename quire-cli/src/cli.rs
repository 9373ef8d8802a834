use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default directory holding one YAML file per collection.
pub const DEFAULT_COLLECTIONS_DIR: &str = ".quire/collections";

#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Mount the Quire edit view for a document and print what it would render")]
#[command(long_about = "
Mounts the edit (or create) view for one document of a collection, waits for
the document fetch and the form-state build to finish, then prints the
breadcrumbs and the props handed to the rendering layer as JSON.

Configuration is read from an optional --config file (TOML, YAML or JSON)
and QUIRE_* environment variables, e.g. QUIRE_SERVER_URL or QUIRE_ROUTES__API.

Examples:
  quire edit posts 42                         # Fetch posts/42 from the server
  quire edit posts 42 --document post.json    # Use a local copy instead of fetching
  quire --debug create posts --locale de      # Create form with debug logging
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of collection definitions
    #[arg(long, global = true, default_value = DEFAULT_COLLECTIONS_DIR)]
    pub collections: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit an existing document
    Edit {
        /// Collection slug
        slug: String,
        /// Document id
        id: String,
        /// JSON file to use as the document instead of fetching it
        #[arg(long)]
        document: Option<PathBuf>,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Start a new document
    Create {
        /// Collection slug
        slug: String,
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct SessionArgs {
    /// Content locale
    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Id of the signed-in user
    #[arg(long)]
    pub user: Option<String>,

    /// Deny create and update permission
    #[arg(long)]
    pub read_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_edit_with_document() {
        let cli = Cli::try_parse_from([
            "quire",
            "edit",
            "posts",
            "42",
            "--document",
            "post.json",
            "--locale",
            "de",
        ])
        .unwrap();

        let Commands::Edit {
            slug,
            id,
            document,
            session,
        } = cli.command
        else {
            panic!("expected edit");
        };
        assert_eq!(slug, "posts");
        assert_eq!(id, "42");
        assert_eq!(document, Some(PathBuf::from("post.json")));
        assert_eq!(session.locale, "de");
        assert!(!session.read_only);
    }

    #[test]
    fn parse_create_defaults() {
        let cli = Cli::try_parse_from(["quire", "create", "posts"]).unwrap();
        assert_eq!(cli.collections, PathBuf::from(DEFAULT_COLLECTIONS_DIR));
        assert!(cli.config.is_none());
        let Commands::Create { session, .. } = cli.command else {
            panic!("expected create");
        };
        assert_eq!(session.locale, "en");
        assert_eq!(session.user, None);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["quire", "create", "posts", "--debug", "--config", "q.toml"])
            .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("q.toml")));
    }

    #[test]
    fn edit_requires_id() {
        assert!(Cli::try_parse_from(["quire", "edit", "posts"]).is_err());
    }
}
