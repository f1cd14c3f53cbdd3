use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    domain::store::ChatStore,
    infra::{
        self,
        clipboard::SystemClipboard,
        config::{AppConfig, FileConfigAdapter},
        contracts::{ConfigAdapter, SeedSource},
        opener::SystemOpener,
        storage_layout::StorageLayout,
    },
    simulation::{
        clock::{Clock, SystemClock},
        replies::RandomReplyPicker,
        DeliverySimulator,
    },
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::DefaultShellOrchestrator,
    },
};

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

/// Loads config, prepares the state directory, starts file logging and reads
/// the seed. The returned guard flushes the log writer and must be held until
/// exit.
pub fn bootstrap(config_path: Option<&Path>) -> Result<(AppContext, WorkerGuard)> {
    let config = FileConfigAdapter::new(config_path).load()?;

    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    let guard = infra::logging::init(&config.logging, &layout)?;

    let seed_source = infra::seed::source_for(&config.seed, SystemClock.now_ms());
    let context = build_context(config, layout, seed_source.as_ref())?;
    tracing::info!(
        chats = context.seed.chats.len(),
        contacts = context.seed.contacts.len(),
        messages = context.seed.messages.len(),
        "seed loaded"
    );

    Ok((context, guard))
}

fn build_context(
    config: AppConfig,
    layout: StorageLayout,
    seed_source: &dyn SeedSource,
) -> Result<AppContext> {
    let seed = seed_source.load()?;
    Ok(AppContext::new(config, layout, seed))
}

pub fn build_store(context: &AppContext) -> ChatStore {
    ChatStore::from_seed(context.seed.clone())
}

pub fn compose_shell(context: &AppContext) -> ShellComposition {
    let simulator = DeliverySimulator::new(context.config.simulation.clone(), RandomReplyPicker);
    let orchestrator = DefaultShellOrchestrator::new(
        build_store(context),
        simulator,
        SystemClock,
        SystemClipboard::default(),
        SystemOpener,
    )
    .with_archived_view(context.config.ui.show_archived);

    ShellComposition {
        event_source: Box::new(CrosstermEventSource),
        orchestrator: Box::new(orchestrator),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        domain::store::{
            test_fixtures::{me, NOW},
            SeedSnapshot,
        },
        infra::{
            seed::BuiltinSeed,
            stubs::{StubConfigAdapter, StubSeedSource},
        },
    };

    #[test]
    fn builds_context_with_default_config_when_file_is_missing() {
        let config = FileConfigAdapter::new(Some(Path::new("./missing-config.toml")))
            .load()
            .expect("defaults");
        let layout = StorageLayout::under(PathBuf::from("/tmp/state"));

        let context =
            build_context(config, layout, &BuiltinSeed::new(NOW)).expect("context should build");

        assert_eq!(context.config, AppConfig::default());
        assert!(!context.seed.chats.is_empty());
    }

    #[test]
    fn composed_store_starts_with_saved_messages() {
        let config = StubConfigAdapter::default().load().expect("stub config");
        let layout = StorageLayout::under(PathBuf::from("/tmp/state"));
        let context =
            build_context(config, layout, &BuiltinSeed::new(NOW)).expect("context should build");

        let store = build_store(&context);

        assert!(store.chats()[0].is_saved_messages());
        assert!(store.chats()[0].pinned);
    }

    #[test]
    fn empty_seed_still_yields_saved_messages() {
        let source = StubSeedSource {
            snapshot: SeedSnapshot {
                me: me(),
                contacts: Vec::new(),
                chats: Vec::new(),
                messages: Vec::new(),
                calls: Vec::new(),
            },
        };
        let layout = StorageLayout::under(PathBuf::from("/tmp/state"));
        let context =
            build_context(AppConfig::default(), layout, &source).expect("context should build");

        let store = build_store(&context);

        assert_eq!(store.chats().len(), 1);
        assert!(store.chats()[0].is_saved_messages());
    }
}
