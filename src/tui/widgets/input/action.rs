/// What the app should do after the composer consumed a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Continue,
    Submit(String),
    HistoryPrev,
    HistoryNext,
    Clear,
}
