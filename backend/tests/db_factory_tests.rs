//! Tests for db::factory and db::repo_config - repository creation and configuration.

mod support;

use std::io::Write;
use std::str::FromStr;

use stream_programme::db::factory::{RepositoryFactory, RepositoryType};
use stream_programme::db::{ProgrammeConfig, RepositoryError};
use stream_programme::services::{ProgrammePredictor, SystemClock};

#[test]
fn test_repository_type_from_str_local() {
    let rt = RepositoryType::from_str("local").unwrap();
    assert_eq!(rt, RepositoryType::Local);

    let rt = RepositoryType::from_str(" LOCAL ").unwrap();
    assert_eq!(rt, RepositoryType::Local);
}

#[test]
fn test_repository_type_from_str_invalid() {
    let result = RepositoryType::from_str("invalid");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", None)], || {
        assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
    });
}

#[test]
fn test_repository_type_from_env_unknown_falls_back() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", Some("cassandra"))], || {
        assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
    });
}

#[tokio::test]
async fn test_factory_from_env_creates_healthy_repo() {
    let repo = support::with_scoped_env(&[("REPOSITORY_TYPE", Some("memory"))], || {
        RepositoryFactory::from_env().unwrap()
    });
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_factory_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[repository]
type = "local"

[engine]
timezone = "Asia/Tokyo"
global_limit = 4
"#
    )
    .unwrap();

    let repo = RepositoryFactory::from_config_file(file.path()).unwrap();
    assert!(repo.list_streamers(Some(1)).await.unwrap().is_empty());

    let config = ProgrammeConfig::from_file(file.path()).unwrap();
    let predictor =
        ProgrammePredictor::from_config(repo, std::sync::Arc::new(SystemClock), &config).unwrap();
    assert_eq!(predictor.heatmaps().timezone(), chrono_tz::Asia::Tokyo);
    assert_eq!(predictor.ranker().effective_limit(0), 4);
}

#[test]
fn test_factory_from_bad_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[repository]\ntype = \"oracle\"\n").unwrap();

    let err = RepositoryFactory::from_config_file(file.path()).err().unwrap();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

#[test]
fn test_default_location_lookup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("programme.toml"),
        "[engine]\nglobal_limit = 7\n",
    )
    .unwrap();

    let original = std::env::current_dir().unwrap();
    let config = support::with_scoped_env(&[], || {
        std::env::set_current_dir(dir.path()).unwrap();
        let config = ProgrammeConfig::from_default_location();
        std::env::set_current_dir(&original).unwrap();
        config
    })
    .unwrap();
    assert_eq!(config.global_limit(), 7);
}
