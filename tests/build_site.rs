//! End-to-end builds through the public library API.

use mdsite::generate::{self, BuildOptions, GenerateError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"site_title = "Field Notes"
home = "README.md"
navigation = [
    { "About" = "about.md" },
    { "Source" = "https://example.com/notes" },
]
"#;

fn write(root: &Path, path: &str, contents: &[u8]) {
    let dest = root.join(path);
    fs::create_dir_all(dest.parent().unwrap()).unwrap();
    fs::write(dest, contents).unwrap();
}

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("content");
    write(&root, "site.toml", CONFIG.as_bytes());
    write(&root, "README.md", b"# Field Notes\n\n![logo](logo.png)\n");
    write(&root, "about.md", b"# About\n\n![logo](logo.png)\n");
    write(&root, "logo.png", &[0x89, b'P', b'N', b'G', 0, 1, 2, 3]);
    tmp
}

fn options(tmp: &TempDir) -> BuildOptions {
    BuildOptions::new(tmp.path().join("content"), tmp.path().join("dist"))
}

fn read(tmp: &TempDir, path: &str) -> String {
    fs::read_to_string(tmp.path().join("dist").join(path)).unwrap()
}

fn stylesheets(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("style.") && name.ends_with(".css"))
        .collect()
}

#[test]
fn builds_pages_copies_assets_and_hashes_stylesheet() {
    let tmp = site();
    let summary = generate::build(&options(&tmp)).unwrap();
    let dist = tmp.path().join("dist");

    assert_eq!(summary.pages.len(), 2);
    assert!(dist.join("index.html").is_file());
    assert!(dist.join("about").join("index.html").is_file());
    assert_eq!(
        fs::read(dist.join("logo.png")).unwrap(),
        [0x89, b'P', b'N', b'G', 0, 1, 2, 3]
    );
    assert_eq!(stylesheets(&dist), [summary.stylesheet.clone()]);
    assert!(!dist.join("site.toml").exists());
}

#[test]
fn pages_link_assets_navigation_and_stylesheet_relative_to_themselves() {
    let tmp = site();
    let summary = generate::build(&options(&tmp)).unwrap();

    let home = read(&tmp, "index.html");
    assert!(home.contains(r#"src="logo.png""#), "{home}");
    assert!(home.contains(r#"href="about""#), "{home}");
    assert!(home.contains(&format!(r#"href="{}""#, summary.stylesheet)), "{home}");
    assert!(home.contains("<title>Field Notes</title>"), "{home}");

    let about = read(&tmp, "about/index.html");
    assert!(about.contains(r#"src="../logo.png""#), "{about}");
    assert!(about.contains(r#"aria-current="page""#), "{about}");
    assert!(about.contains(r#"class="site-title" href="..""#), "{about}");
    assert!(about.contains(&format!(r#"href="../{}""#, summary.stylesheet)), "{about}");
    assert!(about.contains(r#"href="https://example.com/notes" target="_blank""#), "{about}");
}

#[test]
fn stylesheet_name_changes_with_its_bytes() {
    let tmp = site();
    let root = tmp.path().join("content");
    write(&root, "theme/site.css", b"body { color: black }");
    write(
        &root,
        "site.toml",
        format!("{CONFIG}stylesheet = \"theme/site.css\"\n").as_bytes(),
    );

    let first = generate::build(&options(&tmp)).unwrap().stylesheet;
    write(&root, "theme/site.css", b"body { color: navy }");
    let second = generate::build(&options(&tmp)).unwrap().stylesheet;
    let again = generate::build(&options(&tmp)).unwrap().stylesheet;

    assert_ne!(first, second);
    assert_eq!(second, again);
    assert_eq!(
        fs::read_to_string(tmp.path().join("dist").join(&second)).unwrap(),
        "body { color: navy }"
    );
    assert!(!tmp.path().join("dist").join("theme").exists());
}

#[test]
fn rebuilding_is_idempotent() {
    let tmp = site();
    generate::build(&options(&tmp)).unwrap();
    let first = read(&tmp, "about/index.html");
    generate::build(&options(&tmp)).unwrap();
    assert_eq!(read(&tmp, "about/index.html"), first);
}

#[test]
fn output_collision_aborts_before_writing() {
    let tmp = site();
    let root = tmp.path().join("content");
    write(&root, "guide.md", b"# Guide");
    write(&root, "guide/index.md", b"# Also Guide");

    let err = generate::build(&options(&tmp)).unwrap_err();
    assert!(matches!(err, GenerateError::Collision { .. }), "{err}");
    assert!(err.to_string().contains("guide/index.html"), "{err}");
    assert!(!tmp.path().join("dist").exists());
}

#[test]
fn unsupported_navigation_target_names_the_entry() {
    let tmp = site();
    let root = tmp.path().join("content");
    write(
        &root,
        "site.toml",
        br#"site_title = "Field Notes"
home = "README.md"
navigation = [{ "About" = "about.md" }, { "Files" = "ftp://example.com" }]
"#,
    );

    let err = generate::build(&options(&tmp)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("navigation entry 2"), "{message}");
    assert!(message.contains("Files"), "{message}");
    assert!(!tmp.path().join("dist").exists());
}

#[test]
fn missing_home_is_fatal() {
    let tmp = site();
    fs::remove_file(tmp.path().join("content").join("README.md")).unwrap();
    let err = generate::build(&options(&tmp)).unwrap_err();
    assert!(err.to_string().contains("home"), "{err}");
}

#[test]
fn excluded_pages_cannot_be_home_or_navigation_targets() {
    let tmp = site();
    let root = tmp.path().join("content");
    write(&root, "drafts/wip.md", b"# WIP");
    write(
        &root,
        "site.toml",
        format!("{CONFIG}exclude = [\"drafts\"]\n")
            .replace("{ \"About\" = \"about.md\" },", "{ \"WIP\" = \"drafts/wip.md\" },")
            .as_bytes(),
    );
    let err = generate::build(&options(&tmp)).unwrap_err();
    assert!(err.to_string().contains("navigation entry 1 (\"WIP\")"), "{err}");

    write(&root, "site.toml", format!("{CONFIG}exclude = [\"README.md\"]\n").as_bytes());
    let err = generate::build(&options(&tmp)).unwrap_err();
    assert!(matches!(err, GenerateError::HomeNotRendered { .. }), "{err}");
    assert!(!tmp.path().join("dist").exists());
}

#[test]
fn check_plans_without_writing() {
    let tmp = site();
    let prepared = generate::check(&options(&tmp)).unwrap();
    let outputs: Vec<&str> = prepared.plan.iter().map(|p| p.output.as_str()).collect();
    assert_eq!(outputs, ["index", "about/index"]);
    assert!(!tmp.path().join("dist").exists());
}
