use super::model::FavoriteItem;

/// How a multi-tag query combines its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMode {
    And,
    #[default]
    Or,
}

impl TagMode {
    /// Anything other than an explicit "and" falls back to "or".
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("and") => TagMode::And,
            _ => TagMode::Or,
        }
    }
}

/// AI classification filter, meaningful for the pixiv source only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiFilter {
    #[default]
    All,
    AiOnly,
    NonAiOnly,
}

impl AiFilter {
    /// Unknown values behave as "all", mirroring the query contract.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("ai") => AiFilter::AiOnly,
            Some("non-ai") => AiFilter::NonAiOnly,
            _ => AiFilter::All,
        }
    }
}

/// Split a raw comma-separated tag query into lowercase match terms.
/// Stored tag values keep their display case; only matching is folded.
pub fn parse_tag_query(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Keep items whose tag set matches the requested tags. An empty request
/// is the identity. `tags` must already be lowercased.
pub fn filter_by_tags(items: Vec<FavoriteItem>, tags: &[String], mode: TagMode) -> Vec<FavoriteItem> {
    if tags.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| {
            let item_tags: Vec<String> =
                item.tags.iter().map(|tag| tag.to_lowercase()).collect();
            match mode {
                TagMode::And => tags.iter().all(|tag| item_tags.contains(tag)),
                TagMode::Or => tags.iter().any(|tag| item_tags.contains(tag)),
            }
        })
        .collect()
}

/// Restrict by AI classification. Items without a classification count as
/// not AI-generated.
pub fn filter_by_ai(items: Vec<FavoriteItem>, ai: AiFilter) -> Vec<FavoriteItem> {
    match ai {
        AiFilter::All => items,
        AiFilter::AiOnly => items.into_iter().filter(|i| i.is_ai_generated()).collect(),
        AiFilter::NonAiOnly => items.into_iter().filter(|i| !i.is_ai_generated()).collect(),
    }
}
