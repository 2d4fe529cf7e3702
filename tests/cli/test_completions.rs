//! Tests for the completions CLI command

use clap_complete::Shell;
use romfinder::cli::commands::completions::write_completions;

fn script(shell: Shell) -> String {
    let mut out = Vec::new();
    write_completions(shell, &mut out);
    String::from_utf8(out).expect("completion script should be UTF-8")
}

#[test]
fn test_bash_completions_list_subcommands() {
    let bash = script(Shell::Bash);
    assert!(bash.contains("romfinder"));
    for sub in ["run", "ingest", "search", "show-config", "completions"] {
        assert!(bash.contains(sub), "missing {sub}");
    }
}

#[test]
fn test_fish_completions_generated() {
    assert!(!script(Shell::Fish).is_empty());
}
