use std::future::Future;
use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{Stream, StreamExt};
use log::{debug, warn};

/// Event utility functions
pub mod event_utils {
    use super::*;

    /// Check if a key event matches Ctrl+C or Ctrl+Q (terminate)
    pub fn is_terminate_event(event: &Event) -> bool {
        matches!(
            event,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) | Event::Key(KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        )
    }

    /// Terminate keys plus a plain `q`
    pub fn is_quit_event(event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                is_terminate_event(event) || (key.code == KeyCode::Char('q') && key.modifiers == KeyModifiers::NONE)
            }
            _ => false,
        }
    }

    /// Direction a key moves the button focus, if it is a navigation key
    pub fn button_step(key: &KeyEvent) -> Option<isize> {
        match key.code {
            KeyCode::Tab | KeyCode::Right => Some(1),
            KeyCode::BackTab | KeyCode::Left => Some(-1),
            _ => None,
        }
    }
}

/// How an in-flight action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEnd {
    Completed,
    /// A quit key arrived first and the action was dropped
    Interrupted,
}

/// Drive `work` while still watching `events` for a quit key
///
/// Other input that arrives meanwhile is discarded.
pub async fn run_interruptible<S, W>(events: &mut S, work: W) -> ActionEnd
where
    S: Stream<Item = io::Result<Event>> + Unpin,
    W: Future<Output = ()>,
{
    tokio::pin!(work);
    let mut events_open = true;

    loop {
        tokio::select! {
            () = &mut work => return ActionEnd::Completed,
            maybe_event = events.next(), if events_open => match maybe_event {
                Some(Ok(event)) if event_utils::is_quit_event(&event) => {
                    debug!("Quit key pressed during a pending request");
                    return ActionEnd::Interrupted;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => warn!("Error reading event: {}", e),
                None => events_open = false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::stream;

    use super::event_utils::*;
    use super::*;

    fn key_event(code: KeyCode) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_terminate_keys() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let plain_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(is_terminate_event(&ctrl_c));
        assert!(!is_terminate_event(&plain_c));
    }

    #[test]
    fn test_button_steps() {
        assert_eq!(button_step(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)), Some(1));
        assert_eq!(button_step(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)), Some(-1));
        assert_eq!(button_step(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_event(&Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))));
        assert!(is_quit_event(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))));
        assert!(!is_quit_event(&Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE))));
    }

    #[tokio::test]
    async fn test_quit_key_interrupts_hung_request() {
        let mut events = stream::iter(vec![key_event(KeyCode::Char('s')), key_event(KeyCode::Char('q'))]);
        let end = run_interruptible(&mut events, std::future::pending::<()>()).await;
        assert_eq!(end, ActionEnd::Interrupted);
    }

    #[tokio::test]
    async fn test_request_completes_without_quit() {
        let mut events = stream::iter(vec![key_event(KeyCode::Char('x'))]);
        let work = async { tokio::time::sleep(Duration::from_millis(20)).await };
        assert_eq!(run_interruptible(&mut events, work).await, ActionEnd::Completed);

        let mut idle = stream::pending::<io::Result<Event>>();
        assert_eq!(run_interruptible(&mut idle, async {}).await, ActionEnd::Completed);
    }
}
