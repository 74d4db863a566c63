//! Tests for parameter resolution across file and flag layers

use lab_bootstrap::config::resolve_params;
use lab_bootstrap::{BootstrapError, BootstrapParams, ParamOverrides, render_user_data};
use std::fs;
use tempfile::TempDir;

fn write_params(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("params.yaml");
    fs::write(&path, content).unwrap();
    path
}

/// Test flags override values from the parameters file
#[tokio::test]
async fn test_flags_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_params(
        &temp_dir,
        "nameserver: 10.0.0.1\nlab_domain: lab.example.com\nusername: ubuntu\nup: from-file\n",
    );

    let flags = ParamOverrides {
        username: Some("opuser".to_string()),
        up: Some("2024-01-01T00:00:00Z".to_string()),
        ..Default::default()
    };

    let params = resolve_params(Some(&path), flags).await.unwrap();
    assert_eq!(
        params,
        BootstrapParams::new("10.0.0.1", "lab.example.com", "opuser", "2024-01-01T00:00:00Z")
    );

    let rendered = render_user_data(&params).unwrap();
    assert!(rendered.contains("name: opuser"));
    assert!(rendered.trim_end().ends_with("2024-01-01T00:00:00Z"));
}

/// Test a partial file completed by flags
#[tokio::test]
async fn test_partial_file_completed_by_flags() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_params(&temp_dir, "lab_domain: lab.example.com\n");

    let flags = ParamOverrides {
        nameserver: Some("10.0.0.1".to_string()),
        username: Some("opuser".to_string()),
        up: Some("up".to_string()),
        ..Default::default()
    };

    let params = resolve_params(Some(&path), flags).await.unwrap();
    assert_eq!(params.lab_domain, "lab.example.com");
    assert_eq!(params.nameserver, "10.0.0.1");
}

/// Test an empty flag value does not fall back to the file
#[tokio::test]
async fn test_empty_flag_is_missing() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_params(
        &temp_dir,
        "nameserver: 10.0.0.1\nlab_domain: lab.example.com\nusername: ubuntu\nup: ready\n",
    );

    let flags = ParamOverrides {
        nameserver: Some(String::new()),
        ..Default::default()
    };

    let result = resolve_params(Some(&path), flags).await;
    assert!(matches!(result, Err(BootstrapError::MissingParameter("nameserver"))));
}

/// Test without a file every value must come from flags
#[tokio::test]
async fn test_no_file_missing_values() {
    let flags = ParamOverrides {
        nameserver: Some("10.0.0.1".to_string()),
        ..Default::default()
    };

    let result = resolve_params(None, flags).await;
    assert!(matches!(result, Err(BootstrapError::MissingParameter("lab_domain"))));
}

/// Test a missing parameters file is an IO error
#[tokio::test]
async fn test_missing_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.yaml");

    let result = resolve_params(Some(&path), ParamOverrides::default()).await;
    assert!(matches!(result, Err(BootstrapError::Io(_))));
}
