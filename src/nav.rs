//! Navigation bar.
//!
//! Built once per build from the configured entries, then rendered per page:
//! every internal link is expressed relative to the page being rendered, so
//! the same entry reads `about` from the home page and `../../about` from
//! `blog/post/index`.
//!
//! ```html
//! <a class="site-title" href="../..">My Project</a>
//! <li><a href="../../guide">Guide</a></li>
//! <li><a class="current" href="." aria-current="page">Post</a></li>
//! <li><a href="https://github.com/me" target="_blank" rel="noopener noreferrer">Source</a></li>
//! ```

use crate::config::{NavEntry, SiteConfig};
use crate::paths::{ContentPath, OutputPath};
use crate::template::Template;
use crate::types::BuildContext;
use maud::{Markup, html};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("navigation entry {position} ({title:?}): {target} does not exist in {root}")]
    MissingTarget {
        position: usize,
        title: String,
        target: String,
        root: String,
    },
    #[error("navigation entry {position} ({title:?}): {target} is excluded from the build")]
    NotRendered {
        position: usize,
        title: String,
        target: String,
    },
}

/// A navigation entry with its destination resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedNavEntry {
    External { title: String, href: String },
    Internal { title: String, output: OutputPath },
}

impl ResolvedNavEntry {
    pub fn title(&self) -> &str {
        match self {
            ResolvedNavEntry::External { title, .. } | ResolvedNavEntry::Internal { title, .. } => {
                title
            }
        }
    }
}

/// Resolve every configured entry, in declaration order.
///
/// Internal targets must be among the discovered `pages`, so every link
/// points at a page this build writes.
pub fn build(
    config: &SiteConfig,
    ctx: &BuildContext,
    pages: &[ContentPath],
) -> Result<Vec<ResolvedNavEntry>, NavError> {
    config
        .navigation
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            NavEntry::External { title, href } => Ok(ResolvedNavEntry::External {
                title: title.clone(),
                href: href.clone(),
            }),
            NavEntry::Internal {
                title,
                content_path,
            } => {
                if !pages.contains(content_path) {
                    let position = i + 1;
                    let title = title.clone();
                    let target = content_path.to_string();
                    return Err(if content_path.to_path(&ctx.source_root).is_file() {
                        NavError::NotRendered {
                            position,
                            title,
                            target,
                        }
                    } else {
                        NavError::MissingTarget {
                            position,
                            title,
                            target,
                            root: ctx.source_root.display().to_string(),
                        }
                    });
                }
                Ok(ResolvedNavEntry::Internal {
                    title: title.clone(),
                    output: ctx.resolver.resolve(content_path),
                })
            }
        })
        .collect()
}

fn render_entry(entry: &ResolvedNavEntry, current: &OutputPath) -> Markup {
    match entry {
        ResolvedNavEntry::External { title, href } => html! {
            li { a href=(href) target="_blank" rel="noopener noreferrer" { (title) } }
        },
        ResolvedNavEntry::Internal { title, output } if output == current => html! {
            li { a class="current" href=(output.href_from(current)) aria-current="page" { (title) } }
        },
        ResolvedNavEntry::Internal { title, output } => html! {
            li { a href=(output.href_from(current)) { (title) } }
        },
    }
}

/// Link items only, one per entry, in declaration order.
pub fn render_links(entries: &[ResolvedNavEntry], current: &OutputPath) -> String {
    entries
        .iter()
        .map(|entry| render_entry(entry, current).into_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The site-title link back to the root.
pub fn render_home(site_title: &str, current: &OutputPath) -> String {
    html! {
        a class="site-title" href=(OutputPath::root().href_from(current)) { (site_title) }
    }
    .into_string()
}

/// Full navigation bar for the page at `current`.
pub fn render(
    entries: &[ResolvedNavEntry],
    current: &OutputPath,
    site_title: &str,
    template: &Template,
) -> String {
    let home = render_home(site_title, current);
    let links = render_links(entries, current);
    template.render(&HashMap::from([("home", home.as_str()), ("links", links.as_str())]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Resolver;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn output(path: &str) -> OutputPath {
        Resolver::new("README.md").resolve(&ContentPath::new(path).unwrap())
    }

    fn pages(list: &[&str]) -> Vec<ContentPath> {
        list.iter().map(|p| ContentPath::new(p).unwrap()).collect()
    }

    fn internal(title: &str, path: &str) -> ResolvedNavEntry {
        ResolvedNavEntry::Internal {
            title: title.into(),
            output: output(path),
        }
    }

    fn external(title: &str, href: &str) -> ResolvedNavEntry {
        ResolvedNavEntry::External {
            title: title.into(),
            href: href.into(),
        }
    }

    // =========================================================================
    // build
    // =========================================================================

    #[test]
    fn build_resolves_in_declaration_order() {
        let tmp = TempDir::new().unwrap();
        write_files(
            tmp.path(),
            &[("README.md", "# Home"), ("about.md", "# About"), ("guide/index.md", "# Guide")],
        );
        let config = config_with_nav(
            r#"{ "Guide" = "guide/index.md" }, { "Src" = "https://example.com" }, { "About" = "about.md" }"#,
        );
        let ctx = context(tmp.path());

        let entries = build(&config, &ctx, &pages(&["README.md", "about.md", "guide/index.md"]))
            .unwrap();
        let titles: Vec<&str> = entries.iter().map(ResolvedNavEntry::title).collect();
        assert_eq!(titles, ["Guide", "Src", "About"]);
        assert_eq!(entries[0], internal("Guide", "guide/index.md"));
        assert_eq!(entries[1], external("Src", "https://example.com"));
        assert_eq!(entries[2], internal("About", "about.md"));
    }

    #[test]
    fn build_rejects_missing_internal_target() {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), &[("README.md", "# Home")]);
        let config = config_with_nav(r#"{ "Home" = "README.md" }, { "Ghost" = "ghost.md" }"#);

        let err = build(&config, &context(tmp.path()), &pages(&["README.md"])).unwrap_err();
        let NavError::MissingTarget {
            position, title, target, ..
        } = &err
        else {
            panic!("expected MissingTarget, got {err:?}");
        };
        assert_eq!(*position, 2);
        assert_eq!(title, "Ghost");
        assert_eq!(target, "ghost.md");
        assert!(err.to_string().contains("navigation entry 2"), "{err}");
    }

    #[test]
    fn build_rejects_target_left_out_of_the_build() {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), &[("README.md", "# Home"), ("drafts/wip.md", "# WIP")]);
        let config = config_with_nav(r#"{ "WIP" = "drafts/wip.md" }"#);

        let err = build(&config, &context(tmp.path()), &pages(&["README.md"])).unwrap_err();
        let NavError::NotRendered {
            position, title, target,
        } = &err
        else {
            panic!("expected NotRendered, got {err:?}");
        };
        assert_eq!(*position, 1);
        assert_eq!(title, "WIP");
        assert_eq!(target, "drafts/wip.md");
        assert!(err.to_string().contains("excluded from the build"), "{err}");
    }

    // =========================================================================
    // render
    // =========================================================================

    #[test]
    fn internal_href_is_relative_to_current_page() {
        let links = render_links(&[internal("About", "about.md")], &output("blog/post.md"));
        assert!(links.contains(r#"href="../../about""#), "{links}");
    }

    #[test]
    fn internal_href_from_home() {
        let links = render_links(&[internal("About", "about.md")], &OutputPath::root());
        assert!(links.contains(r#"href="about""#), "{links}");
    }

    #[test]
    fn external_entries_open_in_new_context() {
        let links = render_links(&[external("Src", "https://example.com/x")], &OutputPath::root());
        assert!(links.contains(r#"href="https://example.com/x""#), "{links}");
        assert!(links.contains(r#"target="_blank""#), "{links}");
        assert!(links.contains(r#"rel="noopener noreferrer""#), "{links}");
    }

    #[test]
    fn internal_entries_stay_in_same_context() {
        let links = render_links(&[internal("About", "about.md")], &OutputPath::root());
        assert!(!links.contains("target="), "{links}");
    }

    #[test]
    fn current_page_is_marked() {
        let entries = [internal("About", "about.md"), internal("Guide", "guide/index.md")];
        let links = render_links(&entries, &output("about.md"));
        assert!(
            links.contains(r#"<a class="current" href="." aria-current="page">About</a>"#),
            "{links}"
        );
        assert_eq!(links.matches("aria-current").count(), 1);
    }

    #[test]
    fn markup_order_matches_declaration_order() {
        let entries = [
            internal("Zeta", "z.md"),
            external("Alpha", "https://a.example"),
            internal("Mid", "m.md"),
        ];
        let links = render_links(&entries, &OutputPath::root());
        let zeta = links.find("Zeta").unwrap();
        let alpha = links.find("Alpha").unwrap();
        let mid = links.find("Mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn titles_are_escaped() {
        let links = render_links(&[external("Q&A <now>", "https://a.example")], &OutputPath::root());
        assert!(links.contains("Q&amp;A &lt;now&gt;"), "{links}");
    }

    #[test]
    fn home_link_points_at_root() {
        assert!(render_home("Site", &output("blog/post.md")).contains(r#"href="../..""#));
        assert!(render_home("Site", &OutputPath::root()).contains(r#"href=".""#));
        assert!(render_home("Site", &output("blog/post.md")).contains(r#"class="site-title""#));
    }

    #[test]
    fn render_fills_nav_template() {
        let html = render(
            &[internal("About", "about.md")],
            &output("blog/post.md"),
            "My Site",
            &Template::default_nav(),
        );
        assert!(html.contains(">My Site</a>"), "{html}");
        assert!(html.contains(r#"href="../../about""#), "{html}");
        assert!(!html.contains("{{"), "{html}");
    }
}
