use serde_json::Value;
use std::fs;

mod common;
use common::TestContext;

#[test]
fn test_score_json_report() {
    let ctx = TestContext::new();
    let stdout = ctx.run_ok(&["score", "-e", "think", "-a", "sink", "--json"]);

    let report: Value = serde_json::from_str(&stdout).expect("score --json must print JSON");
    assert_eq!(report["score"], 70.0);
    assert_eq!(report["band"], "good");
    assert_eq!(report["word_score"], 66.67);
    assert_eq!(report["phoneme_score"], 75.0);
    assert_eq!(report["phonemes"]["expected"], "θink");
    assert_eq!(report["phonemes"]["actual"], "sink");
    assert_eq!(report["missing_words"][0], "think");
    assert_eq!(report["mispronunciations"][0]["spoken"], "sink");
    assert!(report.get("id").is_none(), "id is omitted when unset");
}

#[test]
fn test_score_plain_output() {
    let ctx = TestContext::new();
    let stdout = ctx.run_ok(&["score", "-e", "think", "-a", "sink"]);

    assert!(stdout.starts_with("Score: 70.0% (good)\n"));
    assert!(stdout.contains("Word score: 66.67%"));
    assert!(stdout.contains("Phoneme score: 75.0% (θink -> sink)"));
    assert!(stdout.contains("Missing words: think"));
    assert!(stdout.contains("Likely mispronounced: think -> sink"));
    assert!(stdout.contains("\n- Missing words"));
}

#[test]
fn test_explain_perfect_attempt() {
    let ctx = TestContext::new();
    let stdout = ctx.run_ok(&["explain", "-e", "Hello, world!", "-a", "hello world"]);

    assert!(stdout.contains("Expected phrase: Hello, world!."));
    assert!(stdout.contains("Excellent pronunciation at the word level."));
    assert!(!stdout.contains("Missing or unclear words"));
}

#[test]
fn test_ask_offline() {
    let ctx = TestContext::new();
    let stdout = ctx.run_ok(&[
        "ask",
        "-e",
        "think",
        "-a",
        "sink",
        "-q",
        "Why did I lose marks?",
    ]);

    assert!(stdout.contains("💡 Direct Answer:"));
    assert!(stdout.contains("Your overall score was 70.0%."));
    assert!(stdout.contains("📚 Therapy Guidance:"));
}

#[test]
fn test_phonemes_command() {
    let ctx = TestContext::new();
    let stdout = ctx.run_ok(&["phonemes", "Ship, CHIP!"]);
    assert_eq!(stdout.trim(), "ʃip tʃip");
}

#[test]
fn test_batch_scores_and_summarizes() {
    let ctx = TestContext::new();
    let batch = ctx.write(
        "batch.json",
        r#"[
            {"id": "q1", "expected": "think", "actual": "sink"},
            {"expected": "hello world", "actual": "hello world"}
        ]"#,
    );

    let stdout = ctx.run_ok(&["batch", batch.to_str().unwrap()]);
    let output: Value = serde_json::from_str(&stdout).expect("batch must print JSON");

    let reports = output["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["id"], "q1");
    assert!(reports[1].get("id").is_none());

    let summary = &output["summary"];
    assert_eq!(summary["count"], 2);
    assert_eq!(summary["average"], 85.0);
    assert_eq!(summary["band"], "excellent");
    assert_eq!(summary["best"], 100.0);
    assert_eq!(summary["worst"], 70.0);
}

#[test]
fn test_batch_rejects_bad_file() {
    let ctx = TestContext::new();
    let batch = ctx.write("batch.json", "{ not a list");
    let output = ctx.run(&["batch", batch.to_str().unwrap()]);
    assert!(!output.status.success());

    let missing = ctx.path("nope.json");
    let output = ctx.run(&["batch", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_init_config() {
    let ctx = TestContext::new();
    ctx.run_ok(&["init-config"]);
    assert!(ctx.config_path.is_file());

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&ctx.config_path).unwrap()).unwrap();
    assert_eq!(written["scoring"]["word_weight"], 0.6);
    assert_eq!(written["ollama"]["enabled"], false);

    // Refuses to clobber without --force
    assert!(!ctx.run(&["init-config"]).status.success());
    ctx.run_ok(&["init-config", "--force"]);
}

#[test]
fn test_invalid_config_is_rejected() {
    let ctx = TestContext::new();
    fs::write(&ctx.config_path, r#"{"scoring": {"word_weight": -1.0}}"#).unwrap();

    let output = ctx.run(&["score", "-e", "a", "-a", "a"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("word_weight"));
}

#[test]
fn test_corrupt_config_falls_back_to_defaults() {
    let ctx = TestContext::new();
    fs::write(&ctx.config_path, "not json at all").unwrap();

    let output = ctx.run(&["score", "-e", "think", "-a", "sink"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.starts_with("Score: 70.0% (good)"));
    assert!(
        stderr.contains("Config file corrupted or invalid"),
        "corrupt config warning missing from stderr: {}",
        stderr
    );
    assert!(ctx.path("config.json.corrupt").is_file());
    assert!(!ctx.config_path.exists());
}

#[test]
fn test_config_log_level_applies() {
    let ctx = TestContext::new();
    fs::write(&ctx.config_path, r#"{"log_level": "debug"}"#).unwrap();

    let output = ctx.run(&["phonemes", "think"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("SpeechScore v"));

    // A quieter level hides it again
    fs::write(&ctx.config_path, r#"{"log_level": "warn"}"#).unwrap();
    let output = ctx.run(&["phonemes", "think"]);
    assert!(!String::from_utf8_lossy(&output.stderr).contains("SpeechScore v"));
}

#[test]
fn test_custom_weights_from_config() {
    let ctx = TestContext::new();
    fs::write(
        &ctx.config_path,
        r#"{"scoring": {"word_weight": 1.0, "phoneme_weight": 0.0}}"#,
    )
    .unwrap();

    let stdout = ctx.run_ok(&["score", "-e", "think", "-a", "sink", "--json"]);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["score"], 66.67);
}

#[test]
fn test_knowledge_dir_adds_guidance() {
    let ctx = TestContext::new();
    let kb_dir = ctx.path("knowledge");
    fs::create_dir_all(&kb_dir).unwrap();
    fs::write(
        kb_dir.join("therapy_tips.txt"),
        "Use a mirror.\n\nRecord yourself and listen back.",
    )
    .unwrap();
    let config = serde_json::json!({ "knowledge": { "dir": kb_dir } });
    fs::write(&ctx.config_path, config.to_string()).unwrap();

    let stdout = ctx.run_ok(&["score", "-e", "hello", "-a", "hello", "--json"]);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    let guidance: Vec<&str> = report["guidance"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(guidance.contains(&"Use a mirror."));
    assert!(guidance.contains(&"Record yourself and listen back."));
}
