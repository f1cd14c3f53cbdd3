use anyhow::Result;

use crate::{
    cli::{Cli, Command},
    simulation::clock::{Clock, SystemClock},
    ui,
    usecases::{
        bootstrap,
        context::AppContext,
        list_chats::{format_chat_line, list_chats, ListChatsQuery},
    },
};

pub fn run(cli: Cli) -> Result<()> {
    // Flushes buffered log lines when dropped at the end of `run`.
    let (context, _log_guard) = bootstrap::bootstrap(cli.config.as_deref())?;

    match cli.command_or_default() {
        Command::Run => {
            let mut shell = bootstrap::compose_shell(&context);
            ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
            )?
        }
        Command::Chats { archived } => {
            let lines = chat_lines(&context, archived, SystemClock.now_ms());
            tracing::info!(archived, chats = lines.len(), "printing chat list");
            for line in lines {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn chat_lines(context: &AppContext, archived: bool, now_ms: i64) -> Vec<String> {
    let store = bootstrap::build_store(context);
    let query = ListChatsQuery {
        filter: String::new(),
        archived,
        now_ms,
    };

    list_chats(&store, &query)
        .chats
        .iter()
        .map(format_chat_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        domain::store::test_fixtures::NOW,
        infra::{
            config::AppConfig, contracts::SeedSource, seed::BuiltinSeed,
            storage_layout::StorageLayout,
        },
    };

    fn context() -> AppContext {
        let seed = BuiltinSeed::new(NOW).load().expect("builtin seed");
        AppContext::new(
            AppConfig::default(),
            StorageLayout::under(PathBuf::from("/tmp/state")),
            seed,
        )
    }

    #[test]
    fn chat_lines_start_with_saved_messages() {
        let lines = chat_lines(&context(), false, NOW);

        assert!(lines[0].starts_with("* Saved Messages [Private chat]"));
        assert!(lines
            .iter()
            .any(|line| line.starts_with("Tech News [Channel] (muted) (99+)")));
        assert!(!lines.iter().any(|line| line.starts_with("Eve Davis")));
    }

    #[test]
    fn chat_lines_list_pinned_chats_first() {
        let mut context = context();
        context
            .seed
            .chats
            .iter_mut()
            .filter(|chat| chat.name == "Tech News")
            .for_each(|chat| chat.pinned = true);

        let lines = chat_lines(&context, false, NOW);

        assert!(lines[0].starts_with("* Saved Messages"));
        assert!(lines[1].starts_with("* Alice"));
        assert!(lines[2].starts_with("* Tech News"));
    }

    #[test]
    fn archived_chat_lines_only_list_archived_chats() {
        let lines = chat_lines(&context(), true, NOW);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Eve Davis [Private chat]"));
    }
}
