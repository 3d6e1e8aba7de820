use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub id: u32,
    pub name: String,
    pub sprite_url: String,
    pub evolution_detail: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl Stats {
    pub const MAX: u16 = 255;

    pub fn total(&self) -> u32 {
        self.entries().iter().map(|(_, value)| u32::from(*value)).sum()
    }

    pub fn entries(&self) -> [(&'static str, u16); 6] {
        [
            ("HP", self.hp),
            ("Attack", self.attack),
            ("Defense", self.defense),
            ("Sp. Attack", self.special_attack),
            ("Sp. Defense", self.special_defense),
            ("Speed", self.speed),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front: Option<String>,
    pub back: Option<String>,
    pub shiny: Option<String>,
    pub animated: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSummary {
    pub name: String,
    pub category: String,
    pub power: Option<u16>,
}

/// Flattened, UI-ready view of one catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCreature {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub categories: Vec<String>,
    pub stats: Stats,
    pub abilities: Vec<Ability>,
    pub sprites: Sprites,
    pub description: String,
    pub moves: Vec<MoveSummary>,
    pub evolution_chain: Vec<EvolutionStage>,
    pub cry: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub creatures: Vec<NormalizedCreature>,
    pub categories: Vec<String>,
}

impl Catalog {
    pub fn creature(&self, id: u32) -> Option<&NormalizedCreature> {
        self.creatures.iter().find(|creature| creature.id == id)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    Dex,
    Stats,
    Map,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dex, Tab::Stats, Tab::Map];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dex => "DEX",
            Tab::Stats => "STATS",
            Tab::Map => "MAP",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|tab| tab == self).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsView {
    BaseStats,
    Evolution,
    Moves,
    Abilities,
}

impl StatsView {
    pub const ALL: [StatsView; 4] = [
        StatsView::BaseStats,
        StatsView::Evolution,
        StatsView::Moves,
        StatsView::Abilities,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatsView::BaseStats => "Base Stats",
            StatsView::Evolution => "Evolution",
            StatsView::Moves => "Moves",
            StatsView::Abilities => "Abilities",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|view| view == self).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Id,
    Name,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteVariant {
    Front,
    Back,
    Shiny,
    Animated,
}

impl SpriteVariant {
    pub fn label(&self) -> &'static str {
        match self {
            SpriteVariant::Front => "front",
            SpriteVariant::Back => "back",
            SpriteVariant::Shiny => "shiny",
            SpriteVariant::Animated => "animated",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SpriteVariant::Front => SpriteVariant::Back,
            SpriteVariant::Back => SpriteVariant::Shiny,
            SpriteVariant::Shiny => SpriteVariant::Animated,
            SpriteVariant::Animated => SpriteVariant::Front,
        }
    }

    /// URL for this variant, falling back to the front sprite when absent.
    pub fn url<'a>(&self, sprites: &'a Sprites) -> Option<&'a str> {
        let variant = match self {
            SpriteVariant::Front => None,
            SpriteVariant::Back => sprites.back.as_deref(),
            SpriteVariant::Shiny => sprites.shiny.as_deref(),
            SpriteVariant::Animated => sprites.animated.as_deref(),
        };
        variant.or(sprites.front.as_deref())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusArea {
    Categories,
    DexList,
    Detail,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub catalog_limit: usize,
    pub catalog: Catalog,
    pub failed_entries: Vec<String>,
    pub filtered_indices: Vec<usize>,
    pub selected_index: usize,

    pub tab: Tab,
    pub stats_view: StatsView,
    pub focus: FocusArea,
    pub category_filter: Option<String>,
    pub search: SearchState,
    pub sort: SortOrder,
    pub sprite_variant: SpriteVariant,
    pub muted: bool,

    pub loading: bool,
    pub load_error: Option<String>,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::api::CATALOG_SIZE)
    }
}

impl AppState {
    pub fn new(catalog_limit: usize) -> Self {
        Self {
            terminal_size: (80, 24),
            catalog_limit,
            catalog: Catalog::default(),
            failed_entries: Vec::new(),
            filtered_indices: Vec::new(),
            selected_index: 0,
            tab: Tab::Dex,
            stats_view: StatsView::BaseStats,
            focus: FocusArea::DexList,
            category_filter: None,
            search: SearchState::default(),
            sort: SortOrder::Id,
            sprite_variant: SpriteVariant::Front,
            muted: false,
            loading: false,
            load_error: None,
            message: None,
            tick: 0,
        }
    }

    pub fn selected(&self) -> Option<&NormalizedCreature> {
        self.filtered_indices
            .get(self.selected_index)
            .and_then(|idx| self.catalog.creatures.get(*idx))
    }

    pub fn selected_id(&self) -> Option<u32> {
        self.selected().map(|creature| creature.id)
    }

    pub fn visible(&self) -> impl Iterator<Item = &NormalizedCreature> {
        self.filtered_indices
            .iter()
            .filter_map(|idx| self.catalog.creatures.get(*idx))
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.filtered_indices.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.filtered_indices.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    /// Recomputes the visible list, keeping the current creature selected
    /// when it survives the new filter.
    pub fn rebuild_filtered(&mut self) {
        let keep = self.selected_id();
        let query = self.search.query.trim().to_lowercase();
        let creatures = &self.catalog.creatures;
        let mut indices: Vec<usize> = creatures
            .iter()
            .enumerate()
            .filter(|(_, creature)| {
                let matches_query =
                    query.is_empty() || creature.name.to_lowercase().contains(&query);
                let matches_category = match &self.category_filter {
                    Some(category) => creature.categories.iter().any(|c| c == category),
                    None => true,
                };
                matches_query && matches_category
            })
            .map(|(idx, _)| idx)
            .collect();
        match self.sort {
            SortOrder::Id => indices.sort_by_key(|idx| creatures[*idx].id),
            SortOrder::Name => indices.sort_by(|a, b| creatures[*a].name.cmp(&creatures[*b].name)),
        }
        self.filtered_indices = indices;

        self.selected_index = keep
            .and_then(|id| self.visible().position(|creature| creature.id == id))
            .unwrap_or(0);
    }

    pub fn category_options(&self) -> Vec<Option<String>> {
        std::iter::once(None)
            .chain(self.catalog.categories.iter().cloned().map(Some))
            .collect()
    }

    pub fn category_index(&self) -> usize {
        self.category_options()
            .iter()
            .position(|option| option == &self.category_filter)
            .unwrap_or(0)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusArea::Categories => FocusArea::DexList,
            FocusArea::DexList => FocusArea::Detail,
            FocusArea::Detail => FocusArea::Categories,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FocusArea::Categories => FocusArea::Detail,
            FocusArea::DexList => FocusArea::Categories,
            FocusArea::Detail => FocusArea::DexList,
        };
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry("total", ron_string(&self.catalog.len()))
                .entry("categories", ron_string(&self.catalog.categories.len()))
                .entry("failed", ron_string(&self.failed_entries))
                .entry("filtered", ron_string(&self.filtered_indices.len()))
                .entry("selected", ron_string(&self.selected_id())),
            DebugSection::new("View")
                .entry("tab", ron_string(&self.tab))
                .entry("stats_view", ron_string(&self.stats_view))
                .entry("focus", ron_string(&self.focus))
                .entry("category", ron_string(&self.category_filter))
                .entry("search", ron_string(&self.search.query))
                .entry("sort", ron_string(&self.sort))
                .entry("sprite", ron_string(&self.sprite_variant)),
            DebugSection::new("Status")
                .entry("loading", ron_string(&self.loading))
                .entry("muted", ron_string(&self.muted))
                .entry("error", ron_string(&self.load_error))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
