use outliercrab::{
    render, sentences, ConfigSnapshot, Outlier, Settings, SettingsStore, WhitelistRuleSet,
};
use serde_json::json;

fn rules(literals: &[(&str, &str)], regexps: &[(&str, &str)]) -> WhitelistRuleSet {
    WhitelistRuleSet::from_lines(literals.iter().copied(), regexps.iter().copied()).unwrap()
}

#[test]
fn literal_line_needs_every_item() {
    let rules = rules(&[("admin_login", "admin, login")], &[]);
    let outlier = Outlier::new("auth", "unusual login", "admin");

    assert!(!outlier.is_whitelisted(&rules, None));
    assert!(!outlier.is_whitelisted(&rules, Some(&json!({"action": "logout"}))));
    assert!(outlier.is_whitelisted(&rules, Some(&json!({"action": "login"}))));
}

#[test]
fn regexp_line_is_prefix_anchored() {
    let rules = rules(&[], &[("internal", r"^10\.0\.")]);

    assert!(Outlier::new("net", "r", "10.0.5.3 connected").is_whitelisted(&rules, None));
    assert!(!Outlier::new("net", "r", "192.168.0.5").is_whitelisted(&rules, None));
}

#[test]
fn sentences_fan_out_list_fields() {
    let record = json!({"user": ["a", "b"], "host": "h1"});
    assert_eq!(
        sentences(&record, &["user", "host"]),
        vec![vec!["a", "h1"], vec!["b", "h1"]]
    );
}

#[test]
fn case_insensitive_lookup_handles_final_sigma() {
    let record = json!({"ΟΔΟΣ": "x"});
    assert_eq!(sentences(&record, &["ΟΔΟΣ"]), vec![vec!["x"]]);
    assert_eq!(render("{οδος}", &record), "x");
}

#[test]
fn render_joins_lists_and_reports_missing_fields() {
    let record = json!({"user": ["a", "b"]});
    assert_eq!(
        render("user {user} on {host}", &record),
        "user a, b on field host not found in event"
    );
}

#[test]
fn outlier_types_become_an_array() {
    let fields = Outlier::new("malware,powershell", "r", "s").to_field_arrays();
    assert_eq!(fields["type"], vec!["malware", "powershell"]);
}

#[test]
fn published_snapshot_replaces_rules_for_new_readers() {
    let store = SettingsStore::from_snapshot(ConfigSnapshot::default());
    let outlier = Outlier::new("net", "r", "10.0.5.3 connected");
    let before = store.snapshot();
    assert!(!before.is_whitelisted(&outlier, None));

    let mut settings = Settings::default();
    settings
        .whitelist_regexps
        .insert("internal".to_string(), r"^10\.0\.".to_string());
    store.publish(ConfigSnapshot::from_settings(&settings).unwrap());

    assert!(store.snapshot().is_whitelisted(&outlier, None));
    assert!(!before.is_whitelisted(&outlier, None));
}
