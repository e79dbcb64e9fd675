use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub jwt_secret: String,
    pub token_ttl_minutes: i64,

    // the single admin identity allowed to log in
    pub admin_id: String,
    pub admin_username: String,
    pub admin_password: String,

    pub wc_base_url: String,
    pub wc_consumer_key: String,
    pub wc_consumer_secret: String,

    pub static_dir: String,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-dev-secret".to_string());

    let token_ttl_minutes = env::var("TOKEN_TTL_MINUTES")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|m| *m > 0)
        .unwrap_or(480);

    let admin_id = env::var("ADMIN_ID").unwrap_or_else(|_| "admin".to_string());
    let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_default();

    let wc_base_url = env::var("WC_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8080/wp-json/wc/v3".to_string());
    let wc_consumer_key = env::var("WC_CONSUMER_KEY").unwrap_or_default();
    let wc_consumer_secret = env::var("WC_CONSUMER_SECRET").unwrap_or_default();

    let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());

    Settings {
        host,
        port,
        jwt_secret,
        token_ttl_minutes,
        admin_id,
        admin_username,
        admin_password,
        wc_base_url,
        wc_consumer_key,
        wc_consumer_secret,
        static_dir,
    }
}
