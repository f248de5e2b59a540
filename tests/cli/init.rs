use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, stderr};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["scanDirs"], serde_json::json!(["./src"]));
    assert_eq!(parsed["dictPath"], "./i18n/zh-CN.json");
    assert_eq!(parsed["callName"], "$t");
    assert!(
        parsed.get("excludePatterns").is_some(),
        "Config should have 'excludePatterns' field"
    );
    assert!(
        parsed.get("keyNaming").is_none(),
        "Key naming should be off by default"
    );
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .i18n-extract.json

    ----- stderr -----
    "#);

    let content = test.read_file(".i18n-extract.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".i18n-extract.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r#"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: .i18n-extract.json already exists
    "#);
    assert_eq!(test.read_file(".i18n-extract.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("src/App.vue", "<template><div>\"你好\"</div></template>\n")?;

    let output = test.extract_command().output()?;
    assert!(
        output.status.success(),
        "Extract should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert!(test.root().join("i18n/zh-CN.json").exists());

    Ok(())
}
