use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, stderr, stdout};

const APP: &str = r#"<template>
  <!-- 顶部 -->
  <div title="你好">"你好"</div>
  <span>"OK"</span>
</template>
<script>
export default {
  created() {
    // 初始化
    this.msg = '你好'
  }
}
</script>
"#;

const APP_REWRITTEN: &str = r#"<template>
  <!-- 顶部 -->
  <div title="$t('text___')">"$t('text___')"</div>
  <span>"OK"</span>
</template>
<script>
export default {
  created() {
    // 初始化
    this.msg = this.$t('text___')
  }
}
</script>
"#;

#[test]
fn test_extract_rewrites_and_writes_dictionary() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP)?;

    assert_cmd_snapshot!(test.extract_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    Processed files: 1
    Extracted texts: 1
    Dictionary ./i18n/zh-CN.json: 1 added, 0 updated, 0 unchanged
    ✓ Extracted 1 text from 1 file

    ----- stderr -----
    "#);

    assert_eq!(test.read_file("src/App.vue")?, APP_REWRITTEN);
    assert_eq!(
        test.read_file("i18n/zh-CN.json")?,
        "{\n  \"text___\": \"你好\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_extract_second_run_is_stable() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP)?;

    test.extract_command().output()?;
    let output = test.extract_command().output()?;
    assert!(output.status.success());

    assert!(stdout(&output).contains("Extracted texts: 0"));
    assert_eq!(test.read_file("src/App.vue")?, APP_REWRITTEN);
    assert_eq!(
        test.read_file("i18n/zh-CN.json")?,
        "{\n  \"text___\": \"你好\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_extract_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP)?;

    let output = test.extract_command().arg("--dry-run").output()?;
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Extracted texts: 1"));
    assert!(out.contains("1 file would be rewritten, nothing was written"));
    assert_eq!(test.read_file("src/App.vue")?, APP);
    assert!(!test.root().join("i18n").exists());

    Ok(())
}

#[test]
fn test_extract_reports_file_errors_and_continues() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP)?;
    test.write_file("src/Broken.vue", "<template>\"坏了\"")?;

    assert_cmd_snapshot!(test.extract_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    Processed files: 1
    Extracted texts: 1
    Dictionary ./i18n/zh-CN.json: 1 added, 0 updated, 0 unchanged
    ✘ 1 file could not be processed

    ----- stderr -----
    error: src/Broken.vue: Failed to parse src/Broken.vue: element is missing end tag: <template>
    "#);

    assert_eq!(test.read_file("src/App.vue")?, APP_REWRITTEN);
    assert_eq!(test.read_file("src/Broken.vue")?, "<template>\"坏了\"");

    Ok(())
}

#[test]
fn test_extract_overlapping_scan_dirs_process_each_file_once() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP)?;

    assert_cmd_snapshot!(
        test.extract_command()
            .args(["--scan-dir", "./src", "--scan-dir", "src", "--dry-run"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    Processed files: 1
    Extracted texts: 1
    dry run: 1 file would be rewritten, nothing was written
    ✓ Extracted 1 text from 1 file

    ----- stderr -----
    "#
    );

    Ok(())
}

#[test]
fn test_extract_malformed_dictionary_is_fatal() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP)?;
    test.write_file("i18n/zh-CN.json", "{ broken")?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error: Failed to update dictionary"));
    assert_eq!(test.read_file("i18n/zh-CN.json")?, "{ broken");

    Ok(())
}

#[test]
fn test_extract_uses_config_file() -> Result<()> {
    let test = CliTest::with_file("app/pages/Home.vue", "<template>\"首页\"</template>")?;
    test.write_file("app/node_modules/lib/Lib.vue", "<template>\"依赖\"</template>")?;
    test.write_file(
        ".i18n-extract.json",
        r#"{
  "scanDirs": ["./app"],
  "dictPath": "./locales/zh.json",
  "callName": "t",
  "generateLog": true,
  "logPath": "./extract.log"
}"#,
    )?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("app/pages/Home.vue")?,
        "<template>\"t('text___')\"</template>"
    );
    assert_eq!(
        test.read_file("app/node_modules/lib/Lib.vue")?,
        "<template>\"依赖\"</template>"
    );
    assert_eq!(
        test.read_file("locales/zh.json")?,
        "{\n  \"text___\": \"首页\"\n}\n"
    );

    let log = test.read_file("extract.log")?;
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("] Processed: "));

    Ok(())
}

#[test]
fn test_extract_cli_overrides_config() -> Result<()> {
    let test = CliTest::with_file("web/App.vue", "<template>\"保存\"</template>")?;

    let output = test
        .extract_command()
        .args(["--scan-dir", "web", "--dict-path", "out/zh.json", "--backup"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(test.read_file("out/zh.json")?.contains("\"保存\""));

    let backups: Vec<String> = std::fs::read_dir(test.root().join("i18n-backup"))?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with("App.vue.") && backups[0].ends_with(".bak"));

    Ok(())
}

#[test]
fn test_extract_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".i18n-extract.json", r#"{ "excludePatterns": ["("] }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("excludePatterns"));

    Ok(())
}

#[test]
fn test_extract_verbose_lists_files() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP)?;
    test.write_file("src/Plain.vue", "<template><p>plain</p></template>")?;

    let output = test.extract_command().arg("-v").output()?;
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("App.vue (rewritten)"));
    assert!(out.contains("Plain.vue (unchanged)"));
    assert!(stderr(&output).contains("No .i18n-extract.json found, using defaults"));

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));

    Ok(())
}
