use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::state::{AppState, FocusArea, NormalizedCreature, SortOrder, Stats, StatsView, Tab};

const BG_BASE: Color = Color::Rgb(6, 14, 8);
const BG_PANEL: Color = Color::Rgb(10, 24, 14);
const BG_HIGHLIGHT: Color = Color::Rgb(24, 78, 38);
const TEXT_MAIN: Color = Color::Rgb(110, 255, 140);
const TEXT_DIM: Color = Color::Rgb(52, 140, 72);
const ACCENT: Color = Color::Rgb(170, 255, 190);
const WARN: Color = Color::Rgb(255, 184, 76);

const SIDE_WIDTH: u16 = 20;
const STAT_BAR_WIDTH: usize = 24;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PipComponentId {
    Side,
    DexList,
    Detail,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipContext {
    Side,
    DexList,
    Detail,
    Search,
}

impl EventRoutingState<PipComponentId, PipContext> for AppState {
    fn focused(&self) -> Option<PipComponentId> {
        if self.search.active {
            return Some(PipComponentId::Search);
        }
        if self.tab == Tab::Map {
            return None;
        }
        match self.focus {
            FocusArea::Categories => Some(PipComponentId::Side),
            FocusArea::DexList => Some(PipComponentId::DexList),
            FocusArea::Detail => Some(PipComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<PipComponentId> {
        if self.search.active {
            Some(PipComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PipComponentId) -> PipContext {
        match id {
            PipComponentId::Side => PipContext::Side,
            PipComponentId::DexList => PipContext::DexList,
            PipComponentId::Detail => PipContext::Detail,
            PipComponentId::Search => PipContext::Search,
        }
    }

    fn default_context(&self) -> PipContext {
        PipContext::DexList
    }
}

/// Screen regions for the current tab. The MAP tab has no side/list/detail split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub body: Rect,
    pub side: Option<Rect>,
    pub list: Option<Rect>,
    pub detail: Option<Rect>,
    pub footer: Rect,
}

pub fn screen_layout(area: Rect, state: &AppState) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);
    let body = rows[1];
    let (side, list, detail) = match state.tab {
        Tab::Map => (None, None, None),
        Tab::Dex | Tab::Stats => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Length(SIDE_WIDTH),
                    Constraint::Percentage(30),
                    Constraint::Min(20),
                ])
                .split(body);
            (Some(columns[0]), Some(columns[1]), Some(columns[2]))
        }
    };
    ScreenLayout {
        header: rows[0],
        body,
        side,
        list,
        detail,
        footer: rows[2],
    }
}

pub struct PipUi {
    side_list: SelectList,
    dex_list: SelectList,
    status_bar: StatusBar,
}

impl Default for PipUi {
    fn default() -> Self {
        Self::new()
    }
}

impl PipUi {
    pub fn new() -> Self {
        Self {
            side_list: SelectList::new(),
            dex_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<PipComponentId>,
    ) {
        let layout = screen_layout(area, state);
        if let Some(side) = layout.side {
            event_ctx.set_component_area(PipComponentId::Side, side);
        }
        if let Some(list) = layout.list {
            event_ctx.set_component_area(PipComponentId::DexList, list);
        }
        if let Some(detail) = layout.detail {
            event_ctx.set_component_area(PipComponentId::Detail, detail);
        }
        if state.search.active {
            event_ctx.set_component_area(PipComponentId::Search, layout.header);
        }
        self.draw(frame, area, state);
    }

    /// Draws the whole screen without registering hit areas.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = screen_layout(area, state);

        render_header(frame, layout.header, state);
        match state.tab {
            Tab::Dex => {
                if let (Some(side), Some(list), Some(detail)) =
                    (layout.side, layout.list, layout.detail)
                {
                    render_categories(frame, side, state, &mut self.side_list);
                    render_list(frame, list, state, &mut self.dex_list);
                    render_dex_detail(frame, detail, state);
                }
            }
            Tab::Stats => {
                if let (Some(side), Some(list), Some(detail)) =
                    (layout.side, layout.list, layout.detail)
                {
                    render_stats_views(frame, side, state, &mut self.side_list);
                    render_list(frame, list, state, &mut self.dex_list);
                    render_stats_detail(frame, detail, state);
                }
            }
            Tab::Map => render_map(frame, layout.body, state),
        }
        render_footer(frame, layout.footer, state, &mut self.status_bar);
    }

    pub fn handle_side_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_side_event(event, state, &mut self.side_list)
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_list_event(event, state, &mut self.dex_list)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_detail_event(event, state)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_search_event(event, state)
    }
}

pub fn handle_side_event(
    event: &EventKind,
    state: &AppState,
    side_list: &mut SelectList,
) -> HandlerResponse<Action> {
    match state.tab {
        Tab::Dex => {
            if let EventKind::Key(key) = event {
                if key.code == crossterm::event::KeyCode::Char('c') {
                    return handler_response(vec![Action::CategoryClear]);
                }
            }
            let items = category_items(state);
            let props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: state.category_index().min(items.len().saturating_sub(1)),
                is_focused: true,
                style: side_list_style(),
                behavior: SelectListBehavior {
                    show_scrollbar: true,
                    wrap_navigation: true,
                },
                on_select: Action::CategorySelect,
                render_item: &|item| item.clone(),
            };
            let actions: Vec<_> = side_list.handle_event(event, props).into_iter().collect();
            handler_response(actions)
        }
        Tab::Stats => {
            let items = stats_view_items();
            let props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: state.stats_view.index(),
                is_focused: true,
                style: side_list_style(),
                behavior: SelectListBehavior {
                    show_scrollbar: false,
                    wrap_navigation: true,
                },
                on_select: Action::StatsViewSelect,
                render_item: &|item| item.clone(),
            };
            let actions: Vec<_> = side_list.handle_event(event, props).into_iter().collect();
            handler_response(actions)
        }
        Tab::Map => HandlerResponse::ignored(),
    }
}

pub fn handle_list_event(
    event: &EventKind,
    state: &AppState,
    dex_list: &mut SelectList,
) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::PageDown => vec![Action::SelectionPage(1)],
            crossterm::event::KeyCode::PageUp => vec![Action::SelectionPage(-1)],
            crossterm::event::KeyCode::Home => vec![Action::SelectionJumpTop],
            crossterm::event::KeyCode::End => vec![Action::SelectionJumpBottom],
            crossterm::event::KeyCode::Enter => vec![Action::PlayCry],
            _ => {
                let items = dex_items(state);
                let props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.selected_index.min(items.len().saturating_sub(1)),
                    is_focused: true,
                    style: dex_list_style(),
                    behavior: SelectListBehavior {
                        show_scrollbar: true,
                        wrap_navigation: false,
                    },
                    on_select: Action::DexSelect,
                    render_item: &|item| item.clone(),
                };
                let actions: Vec<_> = dex_list.handle_event(event, props).into_iter().collect();
                return handler_response(actions);
            }
        },
        EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_detail_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match (state.tab, key.code) {
            (Tab::Stats, crossterm::event::KeyCode::Left | crossterm::event::KeyCode::Char('h')) => {
                vec![Action::StatsViewPrev]
            }
            (
                Tab::Stats,
                crossterm::event::KeyCode::Right | crossterm::event::KeyCode::Char('l'),
            ) => vec![Action::StatsViewNext],
            (_, crossterm::event::KeyCode::Up | crossterm::event::KeyCode::Char('k')) => {
                vec![Action::SelectionMove(-1)]
            }
            (_, crossterm::event::KeyCode::Down | crossterm::event::KeyCode::Char('j')) => {
                vec![Action::SelectionMove(1)]
            }
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Esc => vec![Action::SearchCancel],
            crossterm::event::KeyCode::Enter => vec![Action::SearchSubmit],
            crossterm::event::KeyCode::Backspace => vec![Action::SearchBackspace],
            crossterm::event::KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("PIP-DEX 3000")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(10)])
        .split(inner);

    let labels: Vec<&str> = Tab::ALL.iter().map(Tab::label).collect();
    let tabs = Tabs::new(labels)
        .select(state.tab.index())
        .style(Style::default().fg(TEXT_DIM))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, columns[0]);

    let filter = state
        .category_filter
        .as_deref()
        .map(|name| name.to_ascii_uppercase())
        .unwrap_or_else(|| "ALL".to_string());
    let search = if state.search.active {
        format!("/{}_", state.search.query)
    } else if state.search.query.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.search.query)
    };
    let sort = match state.sort {
        SortOrder::Id => "NO.",
        SortOrder::Name => "A-Z",
    };
    let sound = if state.muted { "MUTED" } else { "ON" };
    let info = Line::from(vec![
        Span::raw("Type: "),
        Span::styled(filter, Style::default().fg(ACCENT)),
        Span::raw("  Search: "),
        Span::styled(search, Style::default().fg(ACCENT)),
        Span::raw("  Sort: "),
        Span::styled(sort, Style::default().fg(ACCENT)),
        Span::raw("  Sound: "),
        Span::styled(
            sound,
            Style::default().fg(if state.muted { WARN } else { ACCENT }),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(info).alignment(Alignment::Right),
        columns[1],
    );
}

fn render_categories(frame: &mut Frame, area: Rect, state: &AppState, side_list: &mut SelectList) {
    let block = panel_block("TYPES", state, FocusArea::Categories);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = category_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.category_index().min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::Categories,
        style: side_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: true,
        },
        on_select: Action::CategorySelect,
        render_item: &|item| item.clone(),
    };
    side_list.render(frame, inner, props);
}

fn render_stats_views(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    side_list: &mut SelectList,
) {
    let block = panel_block("VIEW", state, FocusArea::Categories);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = stats_view_items();
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.stats_view.index(),
        is_focused: state.focus == FocusArea::Categories,
        style: side_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: false,
            wrap_navigation: true,
        },
        on_select: Action::StatsViewSelect,
        render_item: &|item| item.clone(),
    };
    side_list.render(frame, inner, props);
}

fn render_list(frame: &mut Frame, area: Rect, state: &AppState, dex_list: &mut SelectList) {
    let title = format!(
        "DEX {}/{}",
        state.filtered_indices.len(),
        state.catalog.len()
    );
    let block = panel_block(&title, state, FocusArea::DexList);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = dex_items(state);
    if items.is_empty() {
        let message = if state.loading {
            loading_label(state)
        } else if state.load_error.is_some() {
            "No data.".to_string()
        } else {
            "No matches.".to_string()
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    }

    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.selected_index.min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::DexList,
        style: dex_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::DexSelect,
        render_item: &|item| item.clone(),
    };
    dex_list.render(frame, inner, props);
}

fn render_dex_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block("DATA", state, FocusArea::Detail);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(dex_detail_text(state))
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn render_stats_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = state.stats_view.label().to_ascii_uppercase();
    let block = panel_block(&title, state, FocusArea::Detail);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = match (status_text(state), state.selected()) {
        (Some(text), _) => text,
        (None, None) => Text::from("Select an entry."),
        (None, Some(creature)) => match state.stats_view {
            StatsView::BaseStats => base_stats_text(creature),
            StatsView::Evolution => evolution_text(creature),
            StatsView::Moves => moves_text(creature),
            StatsView::Abilities => abilities_text(creature),
        },
    };
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn render_map(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("MAP")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dots = ".".repeat((state.tick % 4) as usize);
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            "SIGNAL LOST",
            Style::default().fg(WARN).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Scanning for region data{dots}")),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM)),
        inner,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.loading {
            loading_label(state)
        } else if state.load_error.is_some() {
            "Load failed.".to_string()
        } else {
            format!("{} entries", state.catalog.len())
        }
    });
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(WARN));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search.active {
        let left = vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
        return (left, Vec::new());
    }

    let mut left = Vec::new();
    match (state.tab, state.focus) {
        (Tab::Map, _) => {}
        (Tab::Dex, FocusArea::Categories) => {
            left.push(StatusBarHint::new("j/k", "Type"));
            left.push(StatusBarHint::new("c", "Clear"));
        }
        (Tab::Stats, FocusArea::Categories) => {
            left.push(StatusBarHint::new("j/k", "View"));
        }
        (_, FocusArea::DexList) => {
            left.push(StatusBarHint::new("j/k", "Move"));
            left.push(StatusBarHint::new("Enter", "Cry"));
        }
        (Tab::Stats, FocusArea::Detail) => {
            left.push(StatusBarHint::new("h/l", "View"));
        }
        (Tab::Dex, FocusArea::Detail) => {
            left.push(StatusBarHint::new("v", "Sprite"));
            left.push(StatusBarHint::new("x", "Shiny"));
        }
    }

    let center = vec![
        StatusBarHint::new("1-3", "Tab"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("[ ]", "Type"),
        StatusBarHint::new("s", "Sort"),
        StatusBarHint::new("m", "Mute"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}

fn status_text(state: &AppState) -> Option<Text<'static>> {
    if state.loading && state.catalog.is_empty() {
        return Some(Text::from(loading_label(state)));
    }
    state.load_error.as_ref().map(|error| {
        Text::from(vec![
            Line::from(Span::styled(
                "LOAD FAILED",
                Style::default().fg(WARN).add_modifier(Modifier::BOLD),
            )),
            Line::from(error.clone()),
            Line::from(""),
            Line::from("Press r to retry."),
        ])
    })
}

fn dex_detail_text(state: &AppState) -> Text<'static> {
    if let Some(text) = status_text(state) {
        return text;
    }
    let Some(creature) = state.selected() else {
        return Text::from("Select an entry.");
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("#{:03} {}", creature.id, format_name(&creature.name).to_uppercase()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Type: {}",
            creature
                .categories
                .iter()
                .map(|name| format_name(name))
                .collect::<Vec<_>>()
                .join(" / ")
        )),
        Line::from(format!(
            "Height: {:.1} m  Weight: {:.1} kg",
            f64::from(creature.height) / 10.0,
            f64::from(creature.weight) / 10.0
        )),
        Line::from(format!(
            "Sprite [{}]: {}",
            state.sprite_variant.label(),
            state.sprite_variant.url(&creature.sprites).unwrap_or("none")
        )),
        Line::from(""),
    ];
    if !creature.description.is_empty() {
        lines.push(Line::from(creature.description.clone()));
        lines.push(Line::from(""));
    }
    lines.extend(stat_lines(&creature.stats, STAT_BAR_WIDTH / 2));
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Abilities: {}",
        creature
            .abilities
            .iter()
            .map(|ability| {
                if ability.is_hidden {
                    format!("{} (hidden)", format_name(&ability.name))
                } else {
                    format_name(&ability.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    )));
    if creature.evolution_chain.len() > 1 {
        let chain = creature
            .evolution_chain
            .iter()
            .enumerate()
            .map(|(idx, stage)| {
                if idx == 0 {
                    format_name(&stage.name)
                } else {
                    format!("{} ({})", format_name(&stage.name), stage.evolution_detail)
                }
            })
            .collect::<Vec<_>>()
            .join(" > ");
        lines.push(Line::from(format!("Evolution: {chain}")));
    }
    Text::from(lines)
}

fn base_stats_text(creature: &NormalizedCreature) -> Text<'static> {
    let mut lines = stat_lines(&creature.stats, STAT_BAR_WIDTH);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{:<12}{:>4}", "Total", creature.stats.total()),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));
    Text::from(lines)
}

fn evolution_text(creature: &NormalizedCreature) -> Text<'static> {
    if creature.evolution_chain.is_empty() {
        return Text::from("No evolution data.");
    }
    let lines = creature
        .evolution_chain
        .iter()
        .map(|stage| {
            let marker = if stage.id == creature.id { ">" } else { " " };
            let style = if stage.id == creature.id {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT_MAIN)
            };
            Line::from(vec![
                Span::styled(
                    format!("{marker} #{:03} {}", stage.id, format_name(&stage.name)),
                    style,
                ),
                Span::styled(
                    format!(" — {}", stage.evolution_detail),
                    Style::default().fg(TEXT_DIM),
                ),
            ])
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn moves_text(creature: &NormalizedCreature) -> Text<'static> {
    if creature.moves.is_empty() {
        return Text::from("No moves.");
    }
    let lines = creature
        .moves
        .iter()
        .enumerate()
        .map(|(idx, summary)| {
            let power = summary
                .power
                .map(|power| power.to_string())
                .unwrap_or_else(|| "--".to_string());
            Line::from(format!(
                "{:02} {:<18} {:<8} {:>3}",
                idx + 1,
                format_name(&summary.name),
                summary.category,
                power
            ))
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn abilities_text(creature: &NormalizedCreature) -> Text<'static> {
    if creature.abilities.is_empty() {
        return Text::from("No abilities.");
    }
    let mut lines = Vec::new();
    for ability in &creature.abilities {
        let mut title = vec![Span::styled(
            format_name(&ability.name),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )];
        if ability.is_hidden {
            title.push(Span::styled(" (hidden)", Style::default().fg(WARN)));
        }
        lines.push(Line::from(title));
        if ability.description.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No description.",
                Style::default().fg(TEXT_DIM),
            )));
        } else {
            lines.push(Line::from(format!("  {}", ability.description)));
        }
    }
    Text::from(lines)
}

fn stat_lines(stats: &Stats, bar_width: usize) -> Vec<Line<'static>> {
    stats
        .entries()
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::raw(format!("{label:<12}{value:>4} ")),
                Span::styled(stat_bar(*value, bar_width), Style::default().fg(ACCENT)),
            ])
        })
        .collect()
}

fn stat_bar(value: u16, width: usize) -> String {
    let filled = (usize::from(value.min(Stats::MAX)) * width) / usize::from(Stats::MAX);
    let filled = if value > 0 { filled.max(1) } else { 0 };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn loading_label(state: &AppState) -> String {
    let dots = ".".repeat((state.tick % 4) as usize);
    format!("Loading catalog{dots}")
}

fn category_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .category_options()
        .into_iter()
        .map(|option| match option {
            None => Line::from("ALL"),
            Some(name) => Line::from(name.to_ascii_uppercase()),
        })
        .collect()
}

fn stats_view_items() -> Vec<Line<'static>> {
    StatsView::ALL
        .iter()
        .map(|view| Line::from(view.label()))
        .collect()
}

fn dex_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .visible()
        .map(|creature| Line::from(format!("#{:03} {}", creature.id, format_name(&creature.name))))
        .collect()
}

fn side_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn dex_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: Some("> "),
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn panel_block<'a>(title: &str, state: &AppState, area: FocusArea) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, area))
}

fn focus_border(state: &AppState, area: FocusArea) -> Style {
    if state.focus == area {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_name_title_cases_hyphenated_names() {
        assert_eq!(format_name("mr-mime"), "Mr Mime");
        assert_eq!(format_name("bulbasaur"), "Bulbasaur");
    }

    #[test]
    fn stat_bar_scales_to_max() {
        assert_eq!(stat_bar(255, 10), "█".repeat(10));
        assert_eq!(stat_bar(0, 4), "░".repeat(4));
        assert!(stat_bar(1, 10).starts_with('█'));
    }
}
