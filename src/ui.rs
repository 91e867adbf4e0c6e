//! Terminal setup, teardown and temporary hand-back to the plain shell.

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};

/// Terminal type used across the app.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter raw mode and the alternate screen.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Undo [`init_terminal`] on exit.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

/// A terminal that can be handed back to the shell and taken over again.
pub trait Suspend {
    /// Leave raw mode and the alternate screen.
    fn release(&mut self) -> Result<()>;
    /// Re-enter both and force a full redraw.
    fn reacquire(&mut self) -> Result<()>;
}

impl Suspend for Tui {
    fn release(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
        Ok(())
    }

    fn reacquire(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        // The alternate screen comes back blank.
        self.clear()?;
        Ok(())
    }
}

/// Exclusive use of the plain terminal while the managed UI is suspended.
///
/// The terminal is released on [`acquire`](Self::acquire) and taken back
/// when the lease drops, on every exit path.
pub struct TerminalLease<'a, T: Suspend> {
    terminal: &'a mut T,
}

impl<'a, T: Suspend> TerminalLease<'a, T> {
    pub fn acquire(terminal: &'a mut T) -> Result<Self> {
        // Built first so a half-finished release is still undone in Drop.
        let lease = Self { terminal };
        lease.terminal.release()?;
        tracing::debug!("terminal released");
        Ok(lease)
    }
}

impl<T: Suspend> Drop for TerminalLease<'_, T> {
    fn drop(&mut self) {
        match self.terminal.reacquire() {
            Ok(()) => tracing::debug!("terminal reacquired"),
            Err(e) => tracing::error!("terminal reacquire failed: {e}"),
        }
    }
}

/// Block until a key accepted by `accept` is pressed, returning it.
///
/// Raw mode is held only while waiting so a single key (Esc included)
/// arrives without a trailing newline; the printed text stays on screen.
pub fn wait_for_key(accept: impl Fn(&KeyEvent) -> bool) -> Result<KeyEvent> {
    enable_raw_mode()?;
    let res = loop {
        match event::read() {
            Ok(Event::Key(k)) if k.kind == KeyEventKind::Press && accept(&k) => break Ok(k),
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }
    };
    disable_raw_mode()?;
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail_release: bool,
    }

    impl Suspend for Recorder {
        fn release(&mut self) -> Result<()> {
            self.calls.push("release");
            if self.fail_release {
                anyhow::bail!("no tty");
            }
            Ok(())
        }

        fn reacquire(&mut self) -> Result<()> {
            self.calls.push("reacquire");
            Ok(())
        }
    }

    fn use_plain_terminal(t: &mut Recorder, fail: bool) -> Result<()> {
        let _lease = TerminalLease::acquire(t)?;
        if fail {
            anyhow::bail!("stdin closed");
        }
        Ok(())
    }

    #[test]
    fn reacquires_after_normal_use() {
        let mut t = Recorder::default();
        use_plain_terminal(&mut t, false).unwrap();
        assert_eq!(t.calls, ["release", "reacquire"]);
    }

    #[test]
    fn reacquires_when_the_holder_fails() {
        let mut t = Recorder::default();
        assert!(use_plain_terminal(&mut t, true).is_err());
        assert_eq!(t.calls, ["release", "reacquire"]);
    }

    #[test]
    fn half_finished_release_is_undone() {
        let mut t = Recorder {
            fail_release: true,
            ..Default::default()
        };
        assert!(TerminalLease::acquire(&mut t).is_err());
        assert_eq!(t.calls, ["release", "reacquire"]);
    }
}
