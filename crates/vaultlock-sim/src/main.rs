//! Vault lock scenario runner.
//!
//! Drives a scripted session against the simulation host: unlock, open a
//! stack of screens, hand the top screen off to a document picker, lock, and
//! optionally kill and restore the process. Every host call and invariant
//! check is reported through `tracing`.
//!
//! # Usage
//!
//! ```bash
//! # Default stack: root, settings, entry-editor
//! vaultlock-sim
//!
//! # No strong termination, restore an editor after process death
//! vaultlock-sim --no-force-terminate --restore root,entry-editor
//!
//! # Device without a document provider
//! vaultlock-sim --missing-handlers open-document,get-content --log-level debug
//! ```

use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vaultlock_app::{ExternalRequest, IntentAction};
use vaultlock_core::ScreenKind;
use vaultlock_harness::{InvariantRegistry, SimHost, SimWorld};

/// Request code used for the scripted document hand-off.
const PICKER_REQUEST_CODE: i32 = 1;

/// Screen kinds accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Root,
    Authentication,
    Introduction,
    Settings,
    EntryEditor,
    Scanner,
    Import,
    Transfer,
    About,
}

impl From<KindArg> for ScreenKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Root => Self::Root,
            KindArg::Authentication => Self::Authentication,
            KindArg::Introduction => Self::Introduction,
            KindArg::Settings => Self::Settings,
            KindArg::EntryEditor => Self::EntryEditor,
            KindArg::Scanner => Self::Scanner,
            KindArg::Import => Self::Import,
            KindArg::Transfer => Self::Transfer,
            KindArg::About => Self::About,
        }
    }
}

/// External actions whose handler can be uninstalled.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    GetContent,
    CreateDocument,
    OpenDocument,
    OpenDocumentTree,
    View,
    Send,
    ImageCapture,
}

impl From<ActionArg> for IntentAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::GetContent => Self::GetContent,
            ActionArg::CreateDocument => Self::CreateDocument,
            ActionArg::OpenDocument => Self::OpenDocument,
            ActionArg::OpenDocumentTree => Self::OpenDocumentTree,
            ActionArg::View => Self::View,
            ActionArg::Send => Self::Send,
            ActionArg::ImageCapture => Self::ImageCapture,
        }
    }
}

/// Vault lock scenario runner
#[derive(Parser, Debug)]
#[command(name = "vaultlock-sim")]
#[command(about = "Run a scripted vault lock scenario against a simulated host")]
#[command(version)]
struct Args {
    /// Screens to open, each spawned by the previous one
    #[arg(long, value_enum, value_delimiter = ',', default_value = "root,settings,entry-editor")]
    screens: Vec<KindArg>,

    /// Screens the system restores after killing the process
    #[arg(long, value_enum, value_delimiter = ',')]
    restore: Vec<KindArg>,

    /// Simulate a platform without strong termination
    #[arg(long)]
    no_force_terminate: bool,

    /// External actions nothing on the device handles
    #[arg(long, value_enum, value_delimiter = ',')]
    missing_handlers: Vec<ActionArg>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn host(&self) -> SimHost {
        let mut host = SimHost::new();
        if self.no_force_terminate {
            host = host.without_force_terminate();
        }
        for action in &self.missing_handlers {
            host = host.without_handler((*action).into());
        }
        host
    }
}

fn check(world: &SimWorld, invariants: &InvariantRegistry, stage: &str) -> Result<(), String> {
    let snapshot = world.snapshot();
    invariants.check_all(&snapshot).map_err(|violations| {
        for violation in &violations {
            tracing::error!(stage, %violation, "invariant violated");
        }
        format!("{} invariant violation(s) {stage}", violations.len())
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let invariants = InvariantRegistry::standard();
    let mut world = SimWorld::new(args.host());

    let session = world.unlock().ok_or("fresh vault was already unlocked")?;
    tracing::info!(%session, "scenario started");

    let mut top = None;
    for kind in &args.screens {
        top = Some(world.open((*kind).into(), top)?);
    }
    check(&world, &invariants, "after opening screens")?;

    if let Some(screen) = top {
        let request = ExternalRequest::for_result(IntentAction::OpenDocument, PICKER_REQUEST_CODE);
        if let Err(error) = world.runtime_mut().delegate(screen, request) {
            tracing::warn!(%screen, %error, "document hand-off failed");
        }

        let locked = world.auto_lock();
        tracing::info!(locked, "inactivity timeout during hand-off");

        if world.runtime().screen(screen).is_some() {
            world.runtime_mut().resume(screen)?;
            check(&world, &invariants, "after resume")?;
        }
    }

    world.lock();
    let registered = world.context().registry().registered_ids();
    tracing::info!(?registered, "vault locked by user");
    check(&world, &invariants, "after lock")?;

    if !args.restore.is_empty() {
        let restore: Vec<ScreenKind> = args.restore.iter().map(|kind| (*kind).into()).collect();
        let survivors = world.restart(&restore)?;
        tracing::info!(?survivors, "process restored");
        check(&world, &invariants, "after restore")?;
    }

    for call in world.host().calls() {
        tracing::info!(%call, "host");
    }

    Ok(())
}
