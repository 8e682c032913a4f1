//! Integration tests that run the CLI binary.

fn bin() -> std::process::Command {
    std::process::Command::new(env!("CARGO_BIN_EXE_streammark"))
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let output = bin()
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("streammark") || stdout.contains("nodes"));
}

#[test]
fn cli_normalizes_citations() {
    let output = bin()
        .arg("Blue [1] [2].")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "Blue [1,2](#cite-group-1-2).");
}

#[test]
fn cli_emits_node_tree_as_json() {
    let output = bin()
        .arg("--nodes")
        .arg("Energy: $$E=mc^2$$")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let nodes: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let arr = nodes.as_array().expect("array of nodes");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["Text"], "Energy: ");
    assert_eq!(arr[1]["Math"]["latex"], "E=mc^2");
    assert_eq!(arr[1]["Math"]["display"], true);
}
