use crate::command::{Action, Command, CommandInner};
use crate::component::Component;
use crate::model::Model;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// No tokio runtime or TTY is needed. Synchronous commands
/// ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages); async commands are
/// dropped, and subscriptions never run, so timer messages must be sent by
/// hand.
///
/// # Example
///
/// ```rust,ignore
/// use checkcombo_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<Picker>::new(());
/// prog.send(Msg::Combo(check_combo::Message::ShowPopup));
/// prog.drain_messages();
/// assert!(prog.render_string(40, 8).contains("[ ] First"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    quit_requested: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            quit_requested: false,
        };
        program.collect_sync_messages(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// Synchronous follow-up messages are queued, not processed.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect_sync_messages(cmd);
    }

    /// Process queued messages until no new ones are produced.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect_sync_messages(cmd);
            }
        }
    }

    /// Whether any update so far returned [`Command::quit`].
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        render_with(width, height, |frame| self.model.view(frame))
    }

    /// Render the model and return the visible content as a plain string,
    /// one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect_sync_messages(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => self.pending_messages.push(msg),
            CommandInner::Action(Action::Quit) => self.quit_requested = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
            CommandInner::Future(_) => {}
        }
    }
}

/// Render a single [`Component`] into `area` of a `width` x `height` test frame.
///
/// Useful for widget tests that need a laid-out frame (for example before
/// sending mouse events that are hit-tested against the last render).
pub fn render_component<C: Component>(
    component: &C,
    width: u16,
    height: u16,
    area: Rect,
) -> Buffer {
    render_with(width, height, |frame| component.view(frame, area))
}

/// Flatten a buffer into rows of symbols separated by newlines.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

fn render_with(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test backend never fails");
    terminal.draw(draw).expect("test backend never fails");
    terminal.backend().buffer().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    struct Tally {
        picked: Vec<usize>,
    }

    #[derive(Debug)]
    enum TallyMsg {
        Pick(usize),
        PickTwice(usize),
        Done,
    }

    impl Model for Tally {
        type Message = TallyMsg;
        type Flags = Vec<usize>;

        fn init(picked: Vec<usize>) -> (Self, Command<TallyMsg>) {
            (Tally { picked }, Command::none())
        }

        fn update(&mut self, msg: TallyMsg) -> Command<TallyMsg> {
            match msg {
                TallyMsg::Pick(i) => {
                    self.picked.push(i);
                    Command::none()
                }
                TallyMsg::PickTwice(i) => Command::batch([
                    Command::message(TallyMsg::Pick(i)),
                    Command::message(TallyMsg::Pick(i)),
                ]),
                TallyMsg::Done => Command::quit(),
            }
        }

        fn view(&self, frame: &mut Frame) {
            let text = format!("picked: {:?}", self.picked);
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    #[test]
    fn init_uses_flags() {
        let prog = TestProgram::<Tally>::new(vec![3]);
        assert_eq!(prog.model().picked, vec![3]);
    }

    #[test]
    fn send_updates_immediately() {
        let mut prog = TestProgram::<Tally>::new(vec![]);
        prog.send(TallyMsg::Pick(1));
        prog.send(TallyMsg::Pick(2));
        assert_eq!(prog.model().picked, vec![1, 2]);
    }

    #[test]
    fn batched_messages_wait_for_drain() {
        let mut prog = TestProgram::<Tally>::new(vec![]);
        prog.send(TallyMsg::PickTwice(4));
        assert!(prog.model().picked.is_empty());
        prog.drain_messages();
        assert_eq!(prog.model().picked, vec![4, 4]);
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Tally>::new(vec![]);
        assert!(!prog.quit_requested());
        prog.send(TallyMsg::Done);
        assert!(prog.quit_requested());
    }

    #[test]
    fn render_string_shows_state() {
        let mut prog = TestProgram::<Tally>::new(vec![]);
        prog.send(TallyMsg::Pick(0));
        let content = prog.render_string(30, 2);
        assert!(content.starts_with("picked: [0]"));
        assert_eq!(content.lines().count(), 2);
    }
}
