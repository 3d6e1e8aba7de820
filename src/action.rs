use serde::{Deserialize, Serialize};

use crate::state::{Catalog, FocusArea, Tab};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    CatalogReload,
    CatalogDidLoad { catalog: Catalog, failed: Vec<String> },
    CatalogDidError(String),

    TabNext,
    TabPrev,
    TabSet(Tab),
    StatsViewNext,
    StatsViewPrev,
    StatsViewSelect(usize),

    FocusNext,
    FocusPrev,
    FocusSet(FocusArea),

    CategoryNext,
    CategoryPrev,
    CategoryClear,
    CategorySelect(usize),

    SelectionMove(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    DexSelect(usize),

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    SortToggle,
    SpriteCycle,
    SpriteToggleShiny,
    MuteToggle,
    PlayCry,
    SoundDidError(String),

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
