use crate::api::{sprite_url, EvolutionNode, EvolutionTrigger};
use crate::state::EvolutionStage;

/// Walks the leftmost path of an evolution tree, base form first.
///
/// Branching evolutions collapse to their first listed child; sibling
/// branches never appear in the result.
pub fn resolve_chain(root: &EvolutionNode) -> Vec<EvolutionStage> {
    let mut stages = Vec::new();
    let mut cursor = Some(root);
    while let Some(node) = cursor {
        stages.push(EvolutionStage {
            id: node.species_id,
            name: node.species_name.clone(),
            sprite_url: sprite_url(node.species_id),
            evolution_detail: describe_trigger(node.trigger.as_ref()),
        });
        cursor = node.children.first();
    }
    stages
}

pub fn describe_trigger(trigger: Option<&EvolutionTrigger>) -> String {
    let Some(trigger) = trigger else {
        return "Level 1".to_string();
    };
    if let Some(level) = trigger.min_level {
        return format!("Level {level}");
    }
    if let Some(item) = trigger.item.as_deref() {
        return format!("Use {item}");
    }
    if trigger.trade {
        return "Trade".to_string();
    }
    if trigger.min_friendship.is_some() {
        return "High friendship".to_string();
    }
    "Level 1".to_string()
}
