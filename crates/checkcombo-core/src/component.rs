use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model) except that
/// [`view`](Component::view) receives the `area` to draw into, so a parent
/// decides where each child lives in its layout.
///
/// # Composition pattern
///
/// Wrap the child's message type in a parent variant and lift returned
/// commands with [`Command::map`]. Outputs the parent cares about (such as a
/// toggled row) come back through the same variant:
///
/// ```rust,ignore
/// use checkcombo_core::{Command, Component, Model};
/// use checkcombo_widgets::check_combo::{self, CheckCombo};
///
/// struct App { fruits: CheckCombo }
///
/// enum Msg { Fruits(check_combo::Message) }
///
/// impl Model for App {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) {
///         let fruits = CheckCombo::new().with_items(["Apple", "Pear"]);
///         (App { fruits }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Fruits(check_combo::Message::FlagChanged(row, on)) => {
///                 log::info!("row {row} is now {on}");
///                 Command::none()
///             }
///             Msg::Fruits(m) => self.fruits.update(m).map(Msg::Fruits),
///         }
///     }
///
///     fn view(&self, frame: &mut ratatui::Frame) {
///         self.fruits.view(frame, frame.area());
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    ///
    /// The parent should call [`.map()`](Command::map) on the result to lift
    /// it into its own message type.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into a specific `area` of the [`Frame`].
    ///
    /// Overlays (popups) may extend past `area`, but never past
    /// [`Frame::area`].
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Declare active subscriptions for this component.
    ///
    /// The parent collects these and includes them, mapped, in its own
    /// [`Model::subscriptions`](crate::Model::subscriptions).
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has keyboard focus.
    fn focused(&self) -> bool {
        false
    }
}
