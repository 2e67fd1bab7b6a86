//! Tests for the overlay view: reads, listings, moves and deletions.

use std::fs;

use tempfile::TempDir;

use forge_io::{IoError, Workspace, WorkspaceConfig};

fn setup() -> (TempDir, Workspace) {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src/features/home");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("Hello.js"), "export default 1;\r\n").unwrap();
    fs::write(src.join("index.js"), "export { default as Hello } from './Hello';\n").unwrap();
    fs::write(dir.path().join("src/index.js"), "import './features/home';\n").unwrap();
    let ws = Workspace::new(WorkspaceConfig::new(dir.path())).unwrap();
    (dir, ws)
}

#[test]
fn test_reads_fall_through_to_disk() {
    let (_dir, mut ws) = setup();
    assert!(ws.exists("src/features/home/Hello.js"));
    assert!(ws.exists("./src/features/home/Hello.js"));
    assert_eq!(
        ws.content("src/features/home/Hello.js").unwrap(),
        "export default 1;\n"
    );
    assert_eq!(
        ws.lines("src/features/home/Hello.js").unwrap(),
        vec!["export default 1;".to_string(), String::new()]
    );
}

#[test]
fn test_missing_file() {
    let (_dir, mut ws) = setup();
    assert!(!ws.exists("src/nope.js"));
    assert!(matches!(ws.content("src/nope.js"), Err(IoError::NotFound(_))));
}

#[test]
fn test_put_is_visible_but_not_saved() {
    let (_dir, mut ws) = setup();
    ws.put("src/tmp.js", "tmp");
    assert!(ws.exists("src/tmp.js"));
    assert_eq!(ws.content("src/tmp.js").unwrap(), "tmp");
    assert!(ws.pending().saved.is_empty());
}

#[test]
fn test_delete_hides_file_and_children() {
    let (_dir, mut ws) = setup();
    ws.delete("src/features/home/Hello.js");
    assert!(!ws.exists("src/features/home/Hello.js"));
    assert!(ws.content("src/features/home/Hello.js").is_err());

    ws.delete("src/features");
    assert!(!ws.exists("src/features/home/index.js"));
    assert!(!ws.dir_exists("src/features/home"));
    assert_eq!(ws.list("src"), vec!["src/index.js".to_string()]);
}

#[test]
fn test_save_after_delete_recreates() {
    let (_dir, mut ws) = setup();
    ws.delete("src/index.js");
    ws.save("src/index.js", "new");
    assert!(ws.exists("src/index.js"));
    assert!(ws.pending().deleted.is_empty());
}

#[test]
fn test_list_merges_disk_and_memory() {
    let (_dir, mut ws) = setup();
    ws.save("src/features/home/World.js", "export default 2;\n");
    ws.save("src/features/about/About.js", "export default 3;\n");
    ws.mkdir("src/features/empty");

    assert_eq!(
        ws.list("src/features/home"),
        vec![
            "src/features/home/Hello.js".to_string(),
            "src/features/home/World.js".to_string(),
            "src/features/home/index.js".to_string(),
        ]
    );
    assert_eq!(
        ws.list("src/features"),
        vec![
            "src/features/about".to_string(),
            "src/features/empty".to_string(),
            "src/features/home".to_string(),
        ]
    );
}

#[test]
fn test_list_applies_globs() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src/node_modules")).unwrap();
    fs::write(dir.path().join("src/a.js"), "a").unwrap();
    fs::write(dir.path().join("src/a.less"), "a").unwrap();
    fs::write(
        dir.path().join("forge.toml"),
        "[listing]\ninclude = [\"**/*.js\"]\nexclude = [\"**/node_modules\"]\n",
    )
    .unwrap();

    let ws = Workspace::open(dir.path()).unwrap();
    assert_eq!(ws.list("src"), vec!["src/a.js".to_string()]);
}

#[test]
fn test_move_file_rekeys_content() {
    let (_dir, mut ws) = setup();
    let path = "src/features/home/Hello.js";
    ws.save(path, "export default 42;\n");
    ws.move_file(path, "src/features/home/Hi.js").unwrap();

    assert!(!ws.exists(path));
    assert_eq!(
        ws.content("src/features/home/Hi.js").unwrap(),
        "export default 42;\n"
    );
    let pending = ws.pending();
    assert_eq!(pending.saved, vec!["src/features/home/Hi.js".to_string()]);
    assert_eq!(pending.moves.len(), 1);
}

#[test]
fn test_move_preconditions() {
    let (_dir, mut ws) = setup();
    assert!(matches!(
        ws.move_file("src/nope.js", "src/b.js"),
        Err(IoError::NoFileToMove(_))
    ));
    assert!(matches!(
        ws.move_file("src/index.js", "src/features/home/Hello.js"),
        Err(IoError::TargetExists(_))
    ));
}

#[test]
fn test_move_composes() {
    let (_dir, mut ws) = setup();
    ws.move_file("src/index.js", "src/main.js").unwrap();
    ws.move_file("src/main.js", "src/entry.js").unwrap();

    assert_eq!(
        ws.pending().moves,
        vec![("src/index.js".to_string(), "src/entry.js".to_string())]
    );
    assert!(!ws.exists("src/main.js"));
    assert_eq!(ws.content("src/entry.js").unwrap(), "import './features/home';\n");
}

#[test]
fn test_in_memory_move_records_nothing() {
    let (_dir, mut ws) = setup();
    ws.save("src/new.js", "x");
    ws.move_file("src/new.js", "src/newer.js").unwrap();
    assert!(ws.pending().moves.is_empty());
    assert_eq!(ws.pending().saved, vec!["src/newer.js".to_string()]);
}

#[test]
fn test_move_dir_rekeys_everything() {
    let (_dir, mut ws) = setup();
    ws.save("src/features/home/World.js", "w");
    ws.move_file("src/index.js", "src/features/home/main.js")
        .unwrap();
    ws.move_dir("src/features/home", "src/features/start").unwrap();

    assert!(!ws.dir_exists("src/features/home"));
    assert!(ws.dir_exists("src/features/start"));
    assert!(ws.exists("src/features/start/Hello.js"));
    assert!(ws.exists("src/features/start/World.js"));
    assert_eq!(
        ws.content("src/features/start/main.js").unwrap(),
        "import './features/home';\n"
    );
    let pending = ws.pending();
    assert_eq!(pending.saved, vec!["src/features/start/World.js".to_string()]);
    assert_eq!(
        pending.moves,
        vec![("src/index.js".to_string(), "src/features/start/main.js".to_string())]
    );
}

#[test]
fn test_move_dir_composes() {
    let (_dir, mut ws) = setup();
    ws.move_dir("src/features/home", "src/features/a").unwrap();
    ws.move_dir("src/features/a", "src/features/b").unwrap();
    assert_eq!(
        ws.pending().dir_moves,
        vec![("src/features/home".to_string(), "src/features/b".to_string())]
    );
    assert!(ws.exists("src/features/b/index.js"));
    assert_eq!(ws.list("src/features"), vec!["src/features/b".to_string()]);
}

#[test]
fn test_move_into_moved_dir() {
    let (_dir, mut ws) = setup();
    ws.move_dir("src/features/home", "src/features/start").unwrap();
    ws.move_file("src/features/start/Hello.js", "src/Hello.js")
        .unwrap();
    assert!(ws.exists("src/Hello.js"));
    assert!(!ws.exists("src/features/start/Hello.js"));
    assert_eq!(ws.content("src/Hello.js").unwrap(), "export default 1;\n");
}

#[test]
fn test_invalidate_keeps_pending_content() {
    let (dir, mut ws) = setup();
    assert_eq!(ws.content("src/index.js").unwrap(), "import './features/home';\n");
    fs::write(dir.path().join("src/index.js"), "changed\n").unwrap();
    assert_eq!(ws.content("src/index.js").unwrap(), "import './features/home';\n");

    ws.invalidate("src/index.js");
    assert_eq!(ws.content("src/index.js").unwrap(), "changed\n");

    ws.save("src/index.js", "staged\n");
    ws.invalidate("src/index.js");
    assert_eq!(ws.content("src/index.js").unwrap(), "staged\n");
}

#[test]
fn test_reset_drops_everything() {
    let (_dir, mut ws) = setup();
    ws.save("src/a.js", "a");
    ws.delete("src/index.js");
    ws.reset();
    assert!(!ws.exists("src/a.js"));
    assert!(ws.exists("src/index.js"));
    assert_eq!(ws.pending(), forge_io::PendingChanges::default());
}
