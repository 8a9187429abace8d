use std::env;

use crate::error::AppError;

/// Database URL from the environment: `DATABASE_URL` wins, otherwise the
/// URL is composed from the `POSTGRES_*` variables.
pub fn db_url() -> Result<String, AppError> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(url);
    }

    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db_name = must_var("POSTGRES_DB")?;
    let username = must_var("POSTGRES_USER")?;
    let password = must_var("POSTGRES_PASSWORD")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::db_url;

    #[test]
    fn database_url_takes_precedence() {
        env::set_var("DATABASE_URL", "postgresql://app:secret@db:5432/paintparty");
        let url = db_url().unwrap();
        assert_eq!(url, "postgresql://app:secret@db:5432/paintparty");
        env::remove_var("DATABASE_URL");
    }
}
