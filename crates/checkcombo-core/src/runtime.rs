use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Output target for the terminal UI.
///
/// Switch to [`Stderr`](OutputTarget::Stderr) when stdout is piped so the UI
/// still reaches the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout (default).
    #[default]
    Stdout,
    /// Write to stderr.
    Stderr,
}

enum Output {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Stderr(w) => w.flush(),
        }
    }
}

impl Output {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Output::Stdout(stdout()),
            OutputTarget::Stderr => Output::Stderr(stderr()),
        }
    }
}

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file logger could not be installed (another logger is active).
    #[error("logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Configuration options for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// use checkcombo_core::ProgramOptions;
///
/// let opts = ProgramOptions {
///     title: Some("Pick toppings".into()),
///     log_file: Some("checkcombo.log".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Start in alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse clicks, drags and motion (default: true).
    pub mouse_capture: bool,
    /// Enable bracketed paste (default: true).
    pub bracketed_paste: bool,
    /// Set terminal title.
    pub title: Option<String>,
    /// Whether to catch panics and restore terminal (default: true).
    pub catch_panics: bool,
    /// Whether to quit on Ctrl+C delivered as a signal (default: true).
    pub handle_signals: bool,
    /// Route `log` records to this file. The terminal is owned by the UI, so
    /// there is no console logger.
    pub log_file: Option<PathBuf>,
    /// Level for the file logger (default: `Debug`).
    pub log_level: LevelFilter,
    /// Output target: stdout (default) or stderr.
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: true,
            bracketed_paste: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
            log_file: None,
            log_level: LevelFilter::Debug,
            output: OutputTarget::default(),
        }
    }
}

/// A cloneable handle to a running [`Program`] for external control.
///
/// Obtain one with [`Program::handle`] before entering the run loop.
#[derive(Clone)]
pub struct ProgramHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    killed: Arc<AtomicBool>,
}

impl<Msg: Send + 'static> ProgramHandle<Msg> {
    /// Send a message to the running program. Ignored once it has exited.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Force the program to exit at the next loop iteration.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

/// The program runtime: terminal setup, the event loop, and the [`Model`]
/// lifecycle.
///
/// # Example
///
/// ```rust,ignore
/// use checkcombo_core::{Program, ProgramError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<MyApp>::new(())?.run().await?;
///     println!("{}", model.summary());
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Output>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscription_manager: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
    killed: Arc<AtomicBool>,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    ///
    /// Fails if the log file cannot be opened, a logger is already installed,
    /// or the terminal cannot be put into raw mode.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        if let Some(ref path) = options.log_file {
            init_file_logger(path, options.log_level)?;
        }

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);

        let terminal = init_terminal(&options)?;
        let subscription_manager = SubscriptionManager::new(msg_tx.clone());

        let mut program = Self {
            model,
            terminal,
            msg_tx,
            msg_rx,
            subscription_manager,
            options,
            needs_redraw: true,
            should_quit: false,
            killed: Arc::new(AtomicBool::new(false)),
        };
        log::debug!("program initialized");

        program.execute_command(init_cmd);
        let subs = program.model.subscriptions();
        program.subscription_manager.reconcile(subs);

        Ok(program)
    }

    /// Get a handle for external control (send messages, force-kill).
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            msg_tx: self.msg_tx.clone(),
            killed: self.killed.clone(),
        }
    }

    /// Run the program until quit and return the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;

        log::debug!("shutting down");
        self.subscription_manager.shutdown();
        restore_terminal(self.options.alt_screen, self.options.output)?;
        result?;

        Ok(self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let handle_signals = self.options.handle_signals;

        loop {
            if self.killed.load(Ordering::SeqCst) {
                return Ok(());
            }

            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    log::debug!("received ctrl+c signal");
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);

                    // Drain whatever else is queued (bounded) before the next frame.
                    let deadline = Instant::now() + Duration::from_micros(100);
                    let mut drained = 0u32;
                    while Instant::now() < deadline && drained < 100 {
                        let Ok(msg) = self.msg_rx.try_recv() else { break };
                        self.process_message(msg);
                        drained += 1;
                    }

                    if self.should_quit || self.killed.load(Ordering::SeqCst) {
                        return Ok(());
                    }
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);

        let subs = self.model.subscriptions();
        self.subscription_manager.reconcile(subs);

        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.should_quit = true;
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(fut.await);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| {
            self.model.view(frame);
        })?;
        Ok(())
    }
}

fn init_file_logger(path: &Path, level: LevelFilter) -> Result<(), ProgramError> {
    let file = log_to_file(path)?;
    simplelog::WriteLogger::init(level, simplelog::Config::default(), file)?;
    Ok(())
}

fn init_terminal(
    options: &ProgramOptions,
) -> Result<Terminal<CrosstermBackend<Output>>, ProgramError> {
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        let output_target = options.output;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal(alt_screen, output_target);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = Output::new(options.output);

    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if options.bracketed_paste {
        execute!(writer, EnableBracketedPaste)?;
    }
    if options.mouse_capture {
        execute!(writer, EnableMouseCapture)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(writer))?;
    Ok(terminal)
}

/// Best-effort teardown: every step runs even if an earlier one failed, and
/// only the raw-mode error is reported.
fn restore_terminal(alt_screen: bool, output_target: OutputTarget) -> Result<(), io::Error> {
    let raw = disable_raw_mode();
    let mut writer = Output::new(output_target);
    execute!(writer, DisableBracketedPaste).ok();
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}

/// Open a log file in append mode for debugging TUI applications.
///
/// [`ProgramOptions::log_file`] uses this to back its `simplelog` writer; it
/// is public for programs that want to install their own logger.
///
/// ```no_run
/// use checkcombo_core::runtime::log_to_file;
/// use std::io::Write;
///
/// let mut f = log_to_file("debug.log").unwrap();
/// writeln!(f, "debug message").unwrap();
/// ```
pub fn log_to_file(path: impl AsRef<Path>) -> Result<std::fs::File, io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_capture_mouse() {
        let opts = ProgramOptions::default();
        assert!(opts.mouse_capture);
        assert!(opts.alt_screen);
        assert_eq!(opts.fps, 60);
        assert_eq!(opts.log_level, LevelFilter::Debug);
        assert!(opts.log_file.is_none());
    }

    #[test]
    fn log_to_file_appends() {
        let path = std::env::temp_dir().join(format!("checkcombo-log-{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);

        {
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "first").unwrap();
        }
        {
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "second").unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn program_error_wraps_io() {
        let err: ProgramError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert_eq!(err.to_string(), "IO error: boom");
    }
}
