use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_uri: String,
    pub db_name: String,
    pub bind_addr: String,

    pub access_token_secret: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_secret: String,
    pub refresh_token_ttl_seconds: i64,

    pub cors_origins: Vec<String>,
    pub cookie_secure: bool,

    pub cloudinary: Option<CloudinaryConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongodb_uri = get("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?;
        let db_name = get("DB_NAME").unwrap_or_else(|| "account_auth".to_string());
        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8000".to_string());

        let access_token_secret =
            get("ACCESS_TOKEN_SECRET").ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;
        let refresh_token_secret =
            get("REFRESH_TOKEN_SECRET").ok_or(ConfigError::Missing("REFRESH_TOKEN_SECRET"))?;
        if access_token_secret == refresh_token_secret {
            return Err(ConfigError::Invalid {
                key: "REFRESH_TOKEN_SECRET",
                reason: "must differ from ACCESS_TOKEN_SECRET".into(),
            });
        }

        let access_token_ttl_seconds =
            parse_ttl("ACCESS_TOKEN_TTL_SECONDS", get("ACCESS_TOKEN_TTL_SECONDS"), 15 * 60)?;
        let refresh_token_ttl_seconds = parse_ttl(
            "REFRESH_TOKEN_TTL_SECONDS",
            get("REFRESH_TOKEN_TTL_SECONDS"),
            10 * 24 * 60 * 60,
        )?;

        let cors_origins = get("CORS_ORIGIN")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(v) => v.parse::<bool>().map_err(|_| ConfigError::Invalid {
                key: "COOKIE_SECURE",
                reason: format!("expected true or false, got {v:?}"),
            })?,
            None => get("APP_ENV").is_some_and(|env| env == "production"),
        };

        let cloudinary = match (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            mongodb_uri,
            db_name,
            bind_addr,
            access_token_secret,
            access_token_ttl_seconds,
            refresh_token_secret,
            refresh_token_ttl_seconds,
            cors_origins,
            cookie_secure,
            cloudinary,
        })
    }
}

fn parse_ttl(key: &'static str, raw: Option<String>, default: i64) -> Result<i64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a positive number of seconds, got {raw:?}"),
        }),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            mongodb_uri: "mongodb://localhost:27017".into(),
            db_name: "account_auth_test".into(),
            bind_addr: "127.0.0.1:0".into(),
            access_token_secret: "test-access-secret".into(),
            access_token_ttl_seconds: 15 * 60,
            refresh_token_secret: "test-refresh-secret".into(),
            refresh_token_ttl_seconds: 10 * 24 * 60 * 60,
            cors_origins: vec![],
            cookie_secure: false,
            cloudinary: None,
        }
    }
}
