use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue};

use super::hash::md5_hex;
use super::model::{AuthEnvelope, BookmarksPage, PixivAuth};
use crate::domain::favorites::{FavoriteItem, FavoritesSource};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::PixivConfig;

pub struct PixivClient {
    config: PixivConfig,
    http_client: reqwest::Client,
}

impl PixivClient {
    pub fn new(config: PixivConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Headers the app API expects on every call. The client hash signs
    /// the current timestamp with the shared secret; upstream checks both
    /// together, so a skewed clock fails auth the same way a bad digest
    /// does.
    fn signed_headers(&self) -> AppResult<HeaderMap> {
        let time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let digest = md5_hex(format!("{}{}", time, self.config.hash_secret).as_bytes());

        let mut headers = HeaderMap::new();
        let pairs = [
            ("User-Agent", self.config.user_agent.as_str()),
            ("Accept-Language", "en-us"),
            ("App-OS", "android"),
            ("App-OS-Version", "9.0"),
            ("App-Version", "5.0.234"),
            ("X-Client-Time", time.as_str()),
            ("X-Client-Hash", digest.as_str()),
        ];
        for (name, value) in pairs {
            headers.insert(
                name,
                HeaderValue::from_str(value)
                    .map_err(|e| AppError::Internal(format!("invalid header value: {}", e)))?,
            );
        }
        Ok(headers)
    }

    /// Exchange the long-lived refresh token for an access token.
    /// A rejected refresh is never retried.
    pub async fn refresh_access_token(&self) -> AppResult<PixivAuth> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("get_secure_url", "true"),
            ("include_policy", "true"),
            ("grant_type", "refresh_token"),
            ("refresh_token", self.config.refresh_token.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.config.auth_url)
            .headers(self.signed_headers()?)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::UpstreamAuth(format!("pixiv token refresh: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = %status.as_u16(), body = %body, "pixiv auth rejected");
            return Err(AppError::UpstreamAuth(format!(
                "pixiv auth failed: {}",
                status.as_u16()
            )));
        }

        let envelope: AuthEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamAuth(format!("pixiv auth decode: {}", e)))?;
        Ok(envelope.response)
    }

    fn bookmarks_url(&self, user_id: &str) -> String {
        format!(
            "{}/v1/user/bookmarks/illust?user_id={}&restrict=public",
            self.config.api_base_url, user_id
        )
    }

    /// Re-anchor the upstream cursor URL onto our configured base,
    /// carrying over everything except the parameters we pin ourselves.
    fn normalize_next_url(
        &self,
        next_url: Option<&str>,
        user_id: &str,
    ) -> AppResult<Option<String>> {
        let Some(next) = next_url.filter(|url| !url.is_empty()) else {
            return Ok(None);
        };
        let parsed = reqwest::Url::parse(next)
            .map_err(|e| AppError::UpstreamFetch(format!("bad next_url: {}", e)))?;

        let carried: Vec<String> = parsed
            .query_pairs()
            .filter(|(key, _)| key != "user_id" && key != "restrict")
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect();

        let base = self.bookmarks_url(user_id);
        Ok(Some(if carried.is_empty() {
            base
        } else {
            format!("{}&{}", base, carried.join("&"))
        }))
    }

    async fn fetch_page(&self, url: &str, auth: &PixivAuth) -> AppResult<BookmarksPage> {
        let response = self
            .http_client
            .get(url)
            .headers(self.signed_headers()?)
            .bearer_auth(&auth.access_token)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("pixiv bookmarks: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamFetch(format!(
                "pixiv api error: {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("pixiv bookmarks decode: {}", e)))
    }
}

#[async_trait]
impl FavoritesSource for PixivClient {
    /// Drain the cursor-paginated bookmarks listing end to end. Any page
    /// failure aborts the drain; a partial collection would silently bias
    /// the shuffle downstream.
    async fn fetch_all(&self) -> AppResult<Vec<FavoriteItem>> {
        let auth = self.refresh_access_token().await?;

        let mut results = Vec::new();
        let mut next_url = Some(self.bookmarks_url(&auth.user.id));
        let mut pages = 0usize;

        while let Some(url) = next_url {
            let page = self.fetch_page(&url, &auth).await?;
            pages += 1;
            results.extend(page.illusts.into_iter().map(|i| i.into_favorite()));
            next_url = self.normalize_next_url(page.next_url.as_deref(), &auth.user.id)?;
        }

        tracing::debug!(pages, total = results.len(), "pixiv bookmarks drained");
        Ok(results)
    }
}
