use serde::Deserialize;
use std::env;

const DEFAULT_PIXIV_API_BASE_URL: &str = "https://app-api.pixiv.net";
const DEFAULT_PIXIV_AUTH_URL: &str = "https://oauth.secure.pixiv.net/auth/token";
const DEFAULT_RAINDROP_API_BASE_URL: &str = "https://api.raindrop.io/rest/v1";
const DEFAULT_PIXIV_CLIENT_ID: &str = "MOBrBDS8blbauoSck0ZfDbtuzpyT";
const DEFAULT_PIXIV_CLIENT_SECRET: &str = "lsACyCD94FhDUtGTXi3QzcFE2uU1hqtDaKeqrdwj";
const DEFAULT_PIXIV_HASH_SECRET: &str =
    "28c1fdd170a5204386cb1313c7077b34f83e4aaf4aa829ce78c231e05b0bae2c";
const DEFAULT_PIXIV_USER_AGENT: &str = "PixivAndroidApp/5.0.234 (Android 9.0; Pixel 3)";
const DEFAULT_IMAGE_HOST_SUFFIX: &str = "pximg.net";
const DEFAULT_IMAGE_REFERER: &str = "https://www.pixiv.net/";

/// Everything the pixiv client needs, resolved once at startup. The app
/// credentials are the published mobile-app identifiers; they can still
/// be overridden through the environment.
#[derive(Debug, Clone)]
pub struct PixivConfig {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub hash_secret: String,
    pub user_agent: String,
    pub api_base_url: String,
    pub auth_url: String,
}

impl Default for PixivConfig {
    fn default() -> Self {
        Self {
            refresh_token: String::new(),
            client_id: DEFAULT_PIXIV_CLIENT_ID.to_string(),
            client_secret: DEFAULT_PIXIV_CLIENT_SECRET.to_string(),
            hash_secret: DEFAULT_PIXIV_HASH_SECRET.to_string(),
            user_agent: DEFAULT_PIXIV_USER_AGENT.to_string(),
            api_base_url: DEFAULT_PIXIV_API_BASE_URL.to_string(),
            auth_url: DEFAULT_PIXIV_AUTH_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RaindropConfig {
    pub token: String,
    pub api_base_url: String,
}

/// Allow-list and hotlink workaround for the image relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub allowed_host_suffix: String,
    pub referer: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            allowed_host_suffix: DEFAULT_IMAGE_HOST_SUFFIX.to_string(),
            referer: DEFAULT_IMAGE_REFERER.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub pixiv: Option<PixivConfig>,
    pub raindrop: Option<RaindropConfig>,
    pub relay: RelayConfig,
    pub collection_cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let pixiv = match env::var("PIXIV_REFRESH_TOKEN") {
            Ok(token) if !token.is_empty() => Some(PixivConfig {
                refresh_token: token,
                client_id: env_or("PIXIV_CLIENT_ID", DEFAULT_PIXIV_CLIENT_ID),
                client_secret: env_or("PIXIV_CLIENT_SECRET", DEFAULT_PIXIV_CLIENT_SECRET),
                hash_secret: env_or("PIXIV_HASH_SECRET", DEFAULT_PIXIV_HASH_SECRET),
                user_agent: env_or("PIXIV_USER_AGENT", DEFAULT_PIXIV_USER_AGENT),
                api_base_url: env_or("PIXIV_API_BASE_URL", DEFAULT_PIXIV_API_BASE_URL),
                auth_url: env_or("PIXIV_AUTH_URL", DEFAULT_PIXIV_AUTH_URL),
            }),
            _ => None,
        };

        let raindrop = match env::var("RAINDROP_TOKEN") {
            Ok(token) if !token.is_empty() => Some(RaindropConfig {
                token,
                api_base_url: env_or("RAINDROP_API_BASE_URL", DEFAULT_RAINDROP_API_BASE_URL),
            }),
            _ => None,
        };

        let config = Config {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "3010").parse()?,
            environment: match env_or("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env_or("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            pixiv,
            raindrop,
            relay: RelayConfig {
                allowed_host_suffix: env_or("IMAGE_HOST_SUFFIX", DEFAULT_IMAGE_HOST_SUFFIX),
                referer: env_or("IMAGE_REFERER", DEFAULT_IMAGE_REFERER),
            },
            collection_cache_enabled: env_or("COLLECTION_CACHE_ENABLED", "false")
                .to_lowercase()
                == "true",
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
