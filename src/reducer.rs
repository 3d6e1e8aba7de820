use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::audio::UiSound;
use crate::effect::Effect;
use crate::state::{AppState, NormalizedCreature, SortOrder, SpriteVariant, StatsView, Tab};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => start_load(state),

        Action::CatalogReload => {
            if state.loading {
                return DispatchResult::unchanged();
            }
            start_load(state)
        }

        Action::CatalogDidLoad { catalog, failed } => {
            state.loading = false;
            state.load_error = None;
            state.message = if failed.is_empty() {
                None
            } else {
                Some(format!("Skipped {} entries: {}", failed.len(), failed.join(", ")))
            };
            state.failed_entries = failed;
            if let Some(category) = state.category_filter.as_ref() {
                if !catalog.categories.contains(category) {
                    state.category_filter = None;
                }
            }
            state.catalog = catalog;
            state.selected_index = 0;
            state.filtered_indices.clear();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::CatalogDidError(error) => {
            state.loading = false;
            state.catalog = Default::default();
            state.failed_entries.clear();
            state.filtered_indices.clear();
            state.selected_index = 0;
            state.load_error = Some(error);
            DispatchResult::changed()
        }

        Action::TabNext => cycle_tab(state, 1),
        Action::TabPrev => cycle_tab(state, -1),
        Action::TabSet(tab) => set_tab(state, tab),

        Action::StatsViewNext => {
            let next = cycle_index(state.stats_view.index(), StatsView::ALL.len(), 1);
            set_stats_view(state, next)
        }
        Action::StatsViewPrev => {
            let next = cycle_index(state.stats_view.index(), StatsView::ALL.len(), -1);
            set_stats_view(state, next)
        }
        Action::StatsViewSelect(index) => set_stats_view(state, index),

        Action::FocusNext => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.focus_next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.focus_prev();
            DispatchResult::changed()
        }

        Action::FocusSet(area) => {
            if state.search.active || state.focus == area {
                return DispatchResult::unchanged();
            }
            state.focus = area;
            DispatchResult::changed()
        }

        Action::CategoryNext => {
            let options = state.category_options().len();
            let next = cycle_index(state.category_index(), options, 1);
            set_category(state, next)
        }
        Action::CategoryPrev => {
            let options = state.category_options().len();
            let next = cycle_index(state.category_index(), options, -1);
            set_category(state, next)
        }
        Action::CategorySelect(index) => set_category(state, index),

        Action::CategoryClear => {
            if state.category_filter.is_none() {
                return DispatchResult::unchanged();
            }
            state.category_filter = None;
            state.rebuild_filtered();
            DispatchResult::changed_with_many(sound(state, UiSound::Click))
        }

        Action::SelectionMove(delta) => {
            let index = offset_index(state.selected_index, delta);
            select_index(state, index)
        }

        Action::SelectionPage(delta) => {
            let page = list_page_size(state) as i16;
            let index = offset_index(state.selected_index, delta.saturating_mul(page));
            select_index(state, index)
        }

        Action::SelectionJumpTop => select_index(state, 0),

        Action::SelectionJumpBottom => {
            let last = state.filtered_indices.len().saturating_sub(1);
            select_index(state, last)
        }

        Action::DexSelect(index) => select_index(state, index),

        Action::SearchStart => {
            state.search.active = true;
            state.search.query.clear();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SortToggle => {
            state.sort = match state.sort {
                SortOrder::Id => SortOrder::Name,
                SortOrder::Name => SortOrder::Id,
            };
            state.rebuild_filtered();
            DispatchResult::changed_with_many(sound(state, UiSound::Click))
        }

        Action::SpriteCycle => {
            state.sprite_variant = state.sprite_variant.next();
            DispatchResult::changed_with_many(sound(state, UiSound::Click))
        }

        Action::SpriteToggleShiny => {
            let has_shiny = state
                .selected()
                .is_some_and(|creature| creature.sprites.shiny.is_some());
            if !has_shiny {
                state.message = Some("No shiny sprite.".to_string());
                return DispatchResult::changed_with_many(sound(state, UiSound::Deny));
            }
            state.sprite_variant = match state.sprite_variant {
                SpriteVariant::Shiny => SpriteVariant::Front,
                _ => SpriteVariant::Shiny,
            };
            DispatchResult::changed_with_many(sound(state, UiSound::Click))
        }

        Action::MuteToggle => {
            state.muted = !state.muted;
            DispatchResult::changed_with_many(sound(state, UiSound::Click))
        }

        Action::PlayCry => {
            let Some(creature) = state.selected() else {
                return DispatchResult::changed_with_many(sound(state, UiSound::Deny));
            };
            if state.muted {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(cry(creature))
        }

        Action::SoundDidError(error) => {
            state.message = Some(format!("Sound error: {error}"));
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            if !state.loading {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn start_load(state: &mut AppState) -> DispatchResult<Effect> {
    state.loading = true;
    state.load_error = None;
    state.message = None;
    state.tick = 0;
    DispatchResult::changed_with(Effect::LoadCatalog {
        limit: state.catalog_limit,
    })
}

fn sound(state: &AppState, sound: UiSound) -> Vec<Effect> {
    if state.muted {
        Vec::new()
    } else {
        vec![Effect::PlaySound(sound)]
    }
}

fn cycle_tab(state: &mut AppState, step: i16) -> DispatchResult<Effect> {
    let next = cycle_index(state.tab.index(), Tab::ALL.len(), step);
    set_tab(state, Tab::ALL[next])
}

fn set_tab(state: &mut AppState, tab: Tab) -> DispatchResult<Effect> {
    if state.tab == tab {
        return DispatchResult::unchanged();
    }
    state.tab = tab;
    match tab {
        Tab::Dex => {
            if state.category_filter.take().is_some() {
                state.rebuild_filtered();
            }
        }
        Tab::Stats => state.stats_view = StatsView::BaseStats,
        Tab::Map => {}
    }
    DispatchResult::changed_with_many(sound(state, UiSound::Tab))
}

fn set_stats_view(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    let Some(view) = StatsView::ALL.get(index).copied() else {
        return DispatchResult::unchanged();
    };
    if state.stats_view == view {
        return DispatchResult::unchanged();
    }
    state.stats_view = view;
    DispatchResult::changed_with_many(sound(state, UiSound::Click))
}

fn set_category(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    if state.catalog.is_empty() {
        return DispatchResult::changed_with_many(sound(state, UiSound::Deny));
    }
    let Some(option) = state.category_options().into_iter().nth(index) else {
        return DispatchResult::unchanged();
    };
    if state.category_filter == option {
        return DispatchResult::unchanged();
    }
    state.category_filter = option;
    state.rebuild_filtered();
    DispatchResult::changed_with_many(sound(state, UiSound::Click))
}

fn select_index(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    if !state.set_selected_index(index) {
        return DispatchResult::unchanged();
    }
    let lacks_shiny = state
        .selected()
        .is_some_and(|creature| creature.sprites.shiny.is_none());
    if state.sprite_variant == SpriteVariant::Shiny && lacks_shiny {
        state.sprite_variant = SpriteVariant::Front;
    }
    let mut effects = sound(state, UiSound::Select);
    if !state.muted {
        if let Some(creature) = state.selected() {
            effects.push(cry(creature));
        }
    }
    DispatchResult::changed_with_many(effects)
}

fn cry(creature: &NormalizedCreature) -> Effect {
    Effect::PlayCry {
        id: creature.id,
        name: creature.name.clone(),
        url: creature.cry.clone(),
    }
}

fn offset_index(current: usize, delta: i16) -> usize {
    let next = current as i64 + i64::from(delta);
    next.max(0) as usize
}

fn cycle_index(current: usize, len: usize, step: i16) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (current as i64 + i64::from(step)).rem_euclid(len) as usize
}

pub fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(8).max(1) as usize
}
