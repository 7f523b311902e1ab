use crossterm::event::KeyEvent;

/// Direction of a single navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Back,
    Forward,
}

impl Step {
    pub fn delta(self) -> isize {
        match self {
            Step::Back => -1,
            Step::Forward => 1,
        }
    }
}

/// Abstract command produced by classifying a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Up / down one row.
    MoveLine(Step),
    /// Left / right one column, or collapse / expand in a tree.
    MoveAxis(Step),
    MoveHome,
    MoveEnd,
    /// One page of `rows`, as reported by the viewport.
    MovePage { step: Step, rows: usize },
    ToggleAtFocus,
    SelectAll,
    ClearSelection,
}

/// Orthogonal modifier set. `primary` is the platform's discontiguous
/// selection key (ctrl, or cmd on macOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub primary: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        primary: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        primary: false,
    };
    pub const PRIMARY: Self = Self {
        shift: false,
        primary: true,
    };
    pub const SHIFT_PRIMARY: Self = Self {
        shift: true,
        primary: true,
    };
}

/// All possible messages that drive the demo application.
#[derive(Debug)]
pub enum Msg {
    // -- Input events (raw)
    Key(KeyEvent),
    Resize(u16, u16),

    // -- Classified input
    Command(Command, Modifiers),

    // -- Collection edits
    InsertRow,
    DeleteFocusedRow,
    SortRows,
    ToggleColumn(usize),

    // -- Engine settings
    CycleMode,
    CycleGranularity,

    // -- System
    Quit,
}
