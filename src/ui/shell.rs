use anyhow::Result;

use crate::usecases::{
    context::AppContext,
    contracts::{AppEventSource, ShellOrchestrator},
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        bot_replies = context.config.simulation.bot_replies,
        chats = orchestrator.store().chats().len(),
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::new()?;

    while orchestrator.state().is_running() {
        terminal.draw(|frame| draw(frame, orchestrator))?;
        pump(event_source, orchestrator)?;
    }

    tracing::info!("TUI shell stopped");
    Ok(())
}

fn draw(frame: &mut ratatui::Frame<'_>, orchestrator: &mut dyn ShellOrchestrator) {
    let me = orchestrator.store().me_id().clone();
    let now_ms = orchestrator.now_ms();
    view::render(frame, orchestrator.state_mut(), &me, now_ms);
}

/// Forwards at most one event from the source to the orchestrator.
fn pump(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    if let Some(event) = event_source.next_event()? {
        orchestrator.handle_event(event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::{
        domain::events::AppEvent,
        ui::event_source::MockEventSource,
        usecases::shell::test_support::{Harness, REPLY},
    };

    fn screen(orchestrator: &mut dyn ShellOrchestrator) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("test terminal");
        terminal
            .draw(|frame| draw(frame, orchestrator))
            .expect("frame must render");

        let buffer = terminal.backend().buffer();
        (0..buffer.area().height)
            .map(|y| {
                (0..buffer.area().width)
                    .map(|x| buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                    .collect()
            })
            .collect()
    }

    fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }

    #[test]
    fn orchestrator_stops_on_quit_from_source() {
        let mut harness = Harness::new();
        let mut source = MockEventSource::from(vec![AppEvent::QuitRequested]);

        pump(&mut source, &mut harness.shell).expect("must handle quit event");

        assert!(!harness.state().is_running());
    }

    #[test]
    fn exhausted_source_leaves_state_untouched() {
        let mut harness = Harness::new();
        let mut source = MockEventSource::from(vec![]);

        pump(&mut source, &mut harness.shell).expect("nothing to handle");

        assert!(harness.state().is_running());
    }

    #[test]
    fn first_frame_lists_seeded_chats() {
        let mut harness = Harness::new();

        let rows = screen(&mut harness.shell);

        assert!(contains(&rows, "Chats (3)"));
        assert!(contains(&rows, "-- Pinned --"));
        assert!(contains(&rows, "Saved Messages"));
        assert!(contains(&rows, "Select a chat to view messages"));
    }

    #[test]
    fn bot_reply_is_drawn_after_simulated_delivery() {
        let mut harness = Harness::new();
        harness.open_alice();
        harness.press("i");
        harness.type_text("ping");
        harness.press("enter");
        harness.tick_after(2_500);

        let rows = screen(&mut harness.shell);

        assert!(contains(&rows, "Messages — Alice"));
        assert!(contains(&rows, "ping"));
        assert!(contains(&rows, REPLY));
    }

    #[test]
    fn modal_is_drawn_over_the_panes() {
        let mut harness = Harness::new();
        harness.press("c");

        let rows = screen(&mut harness.shell);

        assert!(contains(&rows, "Contacts"));
        assert!(contains(&rows, "Alice"));
        assert!(contains(&rows, "Enter: open chat"));
    }
}
