use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub mail_from: String,
    pub push_service_url: String,
    pub push_service_token: String,
    pub frontend_url: String,
    pub display_timezone: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| "memora.projeto@gmail.com".to_string()),
            push_service_url: env::var("PUSH_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8001/api/v1/push".to_string()),
            push_service_token: env::var("PUSH_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "https://memora.app".to_string()),
            display_timezone: env::var("DISPLAY_TIMEZONE").unwrap_or_else(|_| "Europe/Lisbon".to_string()),
        }
    }
}
