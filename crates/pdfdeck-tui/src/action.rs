/// Actions that the TUI can process, mapped from keyboard input or internal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NavigateBack,
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    PrevSlide,
    NextSlide,
    OpenFile,
    AddTopic,
    EditTopic,
    RemoveTopic,
    Generate,
    TogglePane,
    ToggleHelp,
    // Text entry inside a prompt
    Input(char),
    Backspace,
    NextField,
    Submit,
    Cancel,
    Tick,
    Resize(u16, u16),
    None,
}
