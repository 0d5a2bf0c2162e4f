use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the niaga home directory and an initial `config.json` with default settings.
///
/// # Errors
/// - Returns an error if `config.json` already exists or any file operation fails.
pub async fn init(niaga_home: &Path) -> Result<Out<()>> {
    let config = Config::create(niaga_home).await?;
    Ok(format!(
        "Successfully created the niaga directory and config at '{}'",
        config.config_path().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("niaga");
        let out = init(&home).await.unwrap();
        assert!(out.message().starts_with("Successfully created"));
        assert!(home.join("config.json").is_file());

        let err = init(&home).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }
}
