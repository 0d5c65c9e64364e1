use serde::{Deserialize, Serialize};

/// Which upstream a favorite came from. Ids are only unique within one
/// fetch of one source, so the source tag travels with every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Pixiv,
    Raindrop,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Pixiv => "pixiv",
            Source::Raindrop => "raindrop",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pixiv ids are numeric, Raindrop ids arrive as numbers too but the API
/// contract allows strings; keep both representations on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUser {
    pub id: i64,
    pub name: String,
}

/// One normalized collection item, the union over both upstream shapes.
/// Pixiv-only fields are options that Raindrop items leave empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: ItemId,
    pub source: Source,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ItemUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub artwork_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_type: Option<i64>,
}

impl FavoriteItem {
    /// Whether the upstream classified this item as AI-generated.
    /// Pixiv uses code 2; anything else (or absent) is not AI.
    pub fn is_ai_generated(&self) -> bool {
        self.ai_type == Some(2)
    }
}
