use serde::{Deserialize, Serialize};

use crate::domain::favorites::{FavoriteItem, ItemId, ItemUser, Source};

/// The token endpoint wraps its payload in a `response` object.
#[derive(Debug, Deserialize)]
pub struct AuthEnvelope {
    pub response: PixivAuth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixivAuth {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PixivAuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixivAuthUser {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct BookmarksPage {
    #[serde(default)]
    pub illusts: Vec<PixivIllust>,
    #[serde(default)]
    pub next_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PixivIllust {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub illust_ai_type: Option<i64>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub image_urls: Option<ImageUrls>,
    #[serde(default)]
    pub meta_pages: Option<Vec<MetaPage>>,
    #[serde(default)]
    pub user: Option<PixivUser>,
    #[serde(default)]
    pub tags: Vec<PixivTag>,
}

#[derive(Debug, Deserialize)]
pub struct ImageUrls {
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetaPage {
    #[serde(default)]
    pub image_urls: Option<ImageUrls>,
}

#[derive(Debug, Deserialize)]
pub struct PixivUser {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PixivTag {
    pub name: String,
}

impl PixivIllust {
    /// Normalize one upstream illust into the shared collection shape.
    ///
    /// The displayed image is `large` falling back to `medium`. Multi-page
    /// works additionally carry every page's best available URL
    /// (`original` then `large` then `medium`), dropping pages with none.
    pub fn into_favorite(self) -> FavoriteItem {
        let page_count = self.page_count.filter(|&count| count > 0).unwrap_or(1);
        let pages = if page_count > 1 {
            self.meta_pages.map(|meta| {
                meta.into_iter()
                    .filter_map(|page| {
                        page.image_urls
                            .and_then(|urls| urls.original.or(urls.large).or(urls.medium))
                    })
                    .collect::<Vec<String>>()
            })
        } else {
            None
        };

        let image_url = self
            .image_urls
            .and_then(|urls| urls.large.or(urls.medium));
        let user_id = self.user.as_ref().map(|u| u.id).unwrap_or(0);
        let user_url = (user_id != 0).then(|| format!("https://www.pixiv.net/users/{}", user_id));

        FavoriteItem {
            id: ItemId::Number(self.id),
            source: Source::Pixiv,
            title: self.title,
            user: Some(ItemUser {
                id: user_id,
                name: self.user.map(|u| u.name).unwrap_or_default(),
            }),
            image_url,
            artwork_url: format!("https://www.pixiv.net/artworks/{}", self.id),
            user_url,
            page_count: Some(page_count),
            pages,
            tags: self.tags.into_iter().map(|tag| tag.name).collect(),
            ai_type: self.illust_ai_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn illust_json(body: &str) -> PixivIllust {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_single_page_illust_maps_without_pages() {
        let illust = illust_json(
            r#"{
                "id": 42,
                "title": "sunset",
                "illust_ai_type": 1,
                "page_count": 1,
                "image_urls": {"medium": "https://i.pximg.net/m/42.jpg", "large": "https://i.pximg.net/l/42.jpg"},
                "user": {"id": 7, "name": "painter"},
                "tags": [{"name": "Sky"}, {"name": "夕焼け"}]
            }"#,
        );
        let item = illust.into_favorite();
        assert_eq!(item.image_url.as_deref(), Some("https://i.pximg.net/l/42.jpg"));
        assert_eq!(item.artwork_url, "https://www.pixiv.net/artworks/42");
        assert_eq!(item.user_url.as_deref(), Some("https://www.pixiv.net/users/7"));
        assert_eq!(item.page_count, Some(1));
        assert!(item.pages.is_none());
        assert_eq!(item.tags, vec!["Sky".to_string(), "夕焼け".to_string()]);
        assert_eq!(item.ai_type, Some(1));
    }

    #[test]
    fn test_multi_page_illust_picks_best_urls_and_drops_empty_pages() {
        let illust = illust_json(
            r#"{
                "id": 9,
                "title": "series",
                "page_count": 3,
                "image_urls": {"medium": "https://i.pximg.net/m/9.jpg"},
                "meta_pages": [
                    {"image_urls": {"original": "https://i.pximg.net/o/9-1.png", "large": "https://i.pximg.net/l/9-1.jpg"}},
                    {"image_urls": {"medium": "https://i.pximg.net/m/9-2.jpg"}},
                    {"image_urls": {}}
                ]
            }"#,
        );
        let item = illust.into_favorite();
        assert_eq!(item.image_url.as_deref(), Some("https://i.pximg.net/m/9.jpg"));
        assert_eq!(
            item.pages,
            Some(vec![
                "https://i.pximg.net/o/9-1.png".to_string(),
                "https://i.pximg.net/m/9-2.jpg".to_string(),
            ])
        );
    }

    #[test]
    fn test_absent_user_and_page_count_default() {
        let illust = illust_json(r#"{"id": 1, "title": "bare"}"#);
        let item = illust.into_favorite();
        assert_eq!(item.page_count, Some(1));
        assert_eq!(item.user, Some(crate::domain::favorites::ItemUser { id: 0, name: String::new() }));
        assert!(item.user_url.is_none());
        assert!(item.image_url.is_none());
        assert!(item.tags.is_empty());
    }
}
