use crate::audio::UiSound;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadCatalog { limit: usize },
    PlaySound(UiSound),
    PlayCry {
        id: u32,
        name: String,
        url: Option<String>,
    },
}
