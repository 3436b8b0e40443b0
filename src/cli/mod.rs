//! cli
//!
//! Command-line interface layer for refmail.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and read update lines from stdin
//! - Assemble configuration, identity and the mail transport
//! - Hand the batch to the [`crate::engine`] dispatcher
//!
//! # Architecture
//!
//! The CLI layer is thin. Everything that decides what to send lives in the
//! engine; this module only wires collaborators together.

pub mod args;
pub mod input;

pub use args::Cli;

use anyhow::Result;

use crate::core::config::Config;
use crate::core::identity::Pusher;
use crate::engine::classify::Classifier;
use crate::engine::Dispatcher;
use crate::git::Git;
use crate::mail::{create_mailer, Envelope, Sender};
use crate::render::{RenderSettings, Renderer};

/// Marker file in the git directory while a repository import is running.
pub const PENDING_MARKER: &str = "pending";

/// Run one hook invocation.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let git = match &cli.git_dir {
        Some(path) => Git::open(path)?,
        None => Git::open_from_env()?,
    };

    if git.git_dir().join(PENDING_MARKER).exists() {
        tracing::debug!("import in progress, not sending mail");
        return Ok(());
    }
    let single = cli.single_update()?;

    let config = Config::load(git.git_dir())?
        .with_hook_recipients(git.config_string("hooks.mailinglist")?);
    let recipients = config.recipients()?;
    let domain = config.sender_domain();
    let pusher = Pusher::current();

    let updates = match single {
        Some(update) => vec![update],
        None => input::read_transitions(std::io::stdin().lock())?,
    };

    let mut release_cc = config.release_cc();
    release_cc.push(pusher.address(&domain));

    let settings = RenderSettings {
        project: config.project(&git.project_name()),
        help_url: config.help_url(),
        html: config.html(),
    };
    let mailer = create_mailer(&config.transport()?, cli.dry_run);
    let envelope = Envelope::new(
        Sender::new(pusher.full_name.clone(), pusher.login.as_str(), domain.as_str()),
        recipients,
    );

    let dispatcher = Dispatcher::new(
        &git,
        Classifier::new(release_cc),
        Renderer::new(&git, settings),
        mailer.as_ref(),
        envelope,
    );
    let summary = dispatcher.run(&updates)?;

    tracing::debug!(
        transport = mailer.name(),
        changes = summary.changes,
        messages = summary.messages,
        "batch complete"
    );
    Ok(())
}
