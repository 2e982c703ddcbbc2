use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use blogware::{
    actions, ext, BlogwareError, DirIndex, Document, Entry, EntryKind, Rules, SiteConfig, Walk,
    IS_DIR,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a temporary site tree for testing.
///
/// Structure:
/// ```
/// tmp/site/
///   config.toml
///   index.md
///   style.css
///   notes.txt
///   .hidden.css
///   posts/
///     config.toml
///     hello.md
///     photo.png
///     drafts/
///   empty/
/// ```
fn setup_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("site");

    fs::create_dir_all(site.join("posts").join("drafts")).unwrap();
    fs::create_dir_all(site.join("empty")).unwrap();

    fs::write(site.join("config.toml"), "title = \"Blog\"\nlayout = \"page\"\n").unwrap();
    fs::write(site.join("index.md"), "---\ntitle = \"Home\"\n---\nWelcome").unwrap();
    fs::write(site.join("style.css"), "body { margin: 0 }").unwrap();
    fs::write(site.join("notes.txt"), "not published").unwrap();
    fs::write(site.join(".hidden.css"), "/* dotfile */").unwrap();

    let posts = site.join("posts");
    fs::write(posts.join("config.toml"), "layout = \"post\"\n").unwrap();
    fs::write(posts.join("hello.md"), "---\ntitle = \"Hello\"\n---\nHi there").unwrap();
    fs::write(posts.join("photo.png"), [0x89, b'P', b'N', b'G', 0, 1, 2, 3]).unwrap();

    dir
}

/// Recursively copy every file with a matching extension from `src` to `out`.
fn copy_matching(dir: &Path, src: &Path, out: &Path, exts: &[&str]) -> Result<(), BlogwareError> {
    Walk::from_dir(dir)?
        .match_exec(ext(exts.iter().copied()), |e| {
            actions::copy_rerooted(e, src, out).map(|_| ())
        })?
        .match_exec(IS_DIR, |e: &Entry| copy_matching(&e.path, src, out, exts))?;
    Ok(())
}

/// Relative path -> contents for every file under `root`.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            (
                e.path().strip_prefix(root).unwrap().to_path_buf(),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect()
}

fn names(walk: Walk) -> Vec<String> {
    walk.collect().unwrap().into_iter().map(|e| e.name).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn copies_exactly_the_matching_files() {
    let tmp = setup_site();
    let src = tmp.path().join("site");
    let out = tmp.path().join("public");

    copy_matching(&src, &src, &out, &["css", "png"]).unwrap();

    let copied = snapshot(&out);
    let sources = snapshot(&src);
    let keys: Vec<_> = copied.keys().cloned().collect();
    assert_eq!(
        keys,
        [
            PathBuf::from(".hidden.css"),
            PathBuf::from("posts/photo.png"),
            PathBuf::from("style.css"),
        ]
    );
    for (rel, bytes) in &copied {
        assert_eq!(bytes, &sources[rel], "{} differs from source", rel.display());
    }
}

#[test]
fn rebuilding_is_idempotent() {
    let tmp = setup_site();
    let src = tmp.path().join("site");
    let out = tmp.path().join("public");

    copy_matching(&src, &src, &out, &["css", "png", "md"]).unwrap();
    let first = snapshot(&out);
    copy_matching(&src, &src, &out, &["css", "png", "md"]).unwrap();
    let second = snapshot(&out);

    assert_eq!(first, second);
}

#[test]
fn empty_directory_fires_nothing() {
    let tmp = setup_site();
    let empty = tmp.path().join("site").join("empty");

    let mut fired = 0;
    let walk = Walk::from_dir(&empty)
        .unwrap()
        .match_exec(|_: &Entry| true, |_| {
            fired += 1;
            Ok::<_, BlogwareError>(())
        })
        .unwrap();

    assert_eq!(fired, 0);
    assert_eq!(walk.stats().entries(), 0);
}

#[test]
fn missing_root_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("nope");

    match Walk::from_dir(&missing) {
        Err(BlogwareError::NotFound(p)) => assert_eq!(p, missing),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("missing root must not enumerate"),
    }
}

#[test]
fn file_root_is_not_a_directory() {
    let tmp = setup_site();
    let file = tmp.path().join("site").join("index.md");

    assert!(matches!(
        DirIndex::new(file.as_path()).entries(),
        Err(BlogwareError::NotADirectory(_))
    ));
}

#[test]
fn enumeration_is_one_level_deep() {
    let tmp = setup_site();
    let walk = DirIndex::new(tmp.path().join("site").join("posts"))
        .sort_by_name(true)
        .walk()
        .unwrap();

    assert_eq!(names(walk), ["config.toml", "drafts", "hello.md", "photo.png"]);
}

#[test]
fn hidden_entries_can_be_skipped() {
    let tmp = setup_site();
    let site = tmp.path().join("site");

    let all = names(DirIndex::new(site.as_path()).sort_by_name(true).walk().unwrap());
    assert!(all.contains(&".hidden.css".to_owned()));

    let visible = names(
        DirIndex::new(site.as_path())
            .sort_by_name(true)
            .skip_hidden(true)
            .walk()
            .unwrap(),
    );
    assert_eq!(
        visible,
        ["config.toml", "empty", "index.md", "notes.txt", "posts", "style.css"]
    );
}

#[test]
fn entries_report_their_kind() {
    let tmp = setup_site();
    let entries: Vec<Entry> = DirIndex::new(tmp.path().join("site"))
        .entries()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let kind = |name: &str| entries.iter().find(|e| e.name == name).unwrap().kind;
    assert_eq!(kind("posts"), EntryKind::Dir);
    assert_eq!(kind("empty"), EntryKind::Dir);
    assert_eq!(kind("index.md"), EntryKind::File);
    assert_eq!(entries.len(), 7);
}

#[test]
fn rules_dispatch_first_match_only() {
    let tmp = setup_site();
    let src = tmp.path().join("site");
    let out = tmp.path().join("public");

    let mut rendered = Vec::new();
    let mut copied = Vec::new();
    {
        let mut rules = Rules::<BlogwareError>::new()
            .rule(ext(["md"]), |e: &Entry| {
                let doc = e.document()?;
                let dest = e.path.reroot(&src, &out)?.with_extension("html");
                actions::write_creating_dirs(&dest, doc.body())?;
                rendered.push(e.name.clone());
                Ok(())
            })
            .rule(|e: &Entry| e.is_file(), |e: &Entry| {
                actions::copy_rerooted(e, &src, &out)?;
                copied.push(e.name.clone());
                Ok(())
            });

        DirIndex::new(src.as_path())
            .sort_by_name(true)
            .walk()
            .unwrap()
            .match_rules(&mut rules)
            .unwrap();
    }

    assert_eq!(rendered, ["index.md"]);
    assert_eq!(copied, [".hidden.css", "config.toml", "notes.txt", "style.css"]);
    assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "\nWelcome");
    assert!(!out.join("index.md").exists());
}

#[test]
fn descend_walks_children_with_inherited_options() {
    let tmp = setup_site();
    let index = DirIndex::new(tmp.path().join("site")).sort_by_name(true);

    let mut seen = Vec::new();
    index
        .walk()
        .unwrap()
        .match_exec(IS_DIR, |dir| {
            let names: Vec<String> = index
                .descend(dir)?
                .walk()?
                .collect()?
                .into_iter()
                .map(|e| e.name)
                .collect();
            seen.push((dir.name.clone(), names));
            Ok::<_, BlogwareError>(())
        })
        .unwrap();

    seen.sort();
    assert_eq!(seen[0], ("empty".to_owned(), Vec::<String>::new()));
    assert_eq!(seen[1].0, "posts");
    assert_eq!(seen[1].1, ["config.toml", "drafts", "hello.md", "photo.png"]);
}

#[test]
fn documents_and_config_cascade_during_a_walk() {
    let tmp = setup_site();
    let root = tmp.path().join("site");
    let posts = root.join("posts");

    let mut layouts = BTreeMap::new();
    Walk::from_dir(&posts)
        .unwrap()
        .match_exec(ext(["md"]), |e| {
            let doc: Document = e.document()?;
            let config = SiteConfig::for_dir(&posts, &root)?;
            let title = doc.frontmatter()["title"].as_str().unwrap_or_default().to_owned();
            let layout = config.get("layout").and_then(|v| v.as_str()).unwrap_or_default().to_owned();
            let site = config.get("title").and_then(|v| v.as_str()).unwrap_or_default().to_owned();
            layouts.insert(title, (layout, site));
            Ok::<_, BlogwareError>(())
        })
        .unwrap();

    assert_eq!(
        layouts.get("Hello"),
        Some(&("post".to_owned(), "Blog".to_owned()))
    );
}

#[cfg(unix)]
#[test]
fn symlinks_follow_their_target_by_default() {
    let tmp = setup_site();
    let site = tmp.path().join("site");
    std::os::unix::fs::symlink(site.join("style.css"), site.join("alias.css")).unwrap();

    let kind_of = |index: DirIndex| {
        index
            .entries()
            .unwrap()
            .map(|e| e.unwrap())
            .find(|e| e.name == "alias.css")
            .unwrap()
            .kind
    };

    assert_eq!(kind_of(DirIndex::new(site.as_path())), EntryKind::File);
    assert_eq!(
        kind_of(DirIndex::new(site.as_path()).follow_links(false)),
        EntryKind::Symlink
    );
}

#[cfg(unix)]
#[test]
fn dangling_symlinks_are_skipped() {
    let tmp = setup_site();
    let site = tmp.path().join("site");
    std::os::unix::fs::symlink(site.join("gone.css"), site.join("dangling.css")).unwrap();

    let mut fired = Vec::new();
    Walk::from_dir(&site)
        .unwrap()
        .match_exec(ext(["css"]), |e| {
            fired.push(e.name.clone());
            Ok::<_, BlogwareError>(())
        })
        .unwrap();

    fired.sort();
    assert_eq!(fired, [".hidden.css", "style.css"]);

    // Without following, the link itself is listed
    let listed = names(DirIndex::new(site.as_path()).follow_links(false).walk().unwrap());
    assert!(listed.contains(&"dangling.css".to_owned()));
}

#[cfg(unix)]
#[test]
fn symlink_to_ancestor_is_listed_as_directory() {
    let tmp = setup_site();
    let site = tmp.path().join("site");
    std::os::unix::fs::symlink(".", site.join("current")).unwrap();

    let mut files = 0;
    let walk = Walk::from_dir(&site)
        .unwrap()
        .match_exec(blogware::IS_FILE, |_| {
            files += 1;
            Ok::<_, BlogwareError>(())
        })
        .unwrap();

    assert_eq!(files, 5);
    let current = walk
        .collect()
        .unwrap()
        .into_iter()
        .find(|e| e.name == "current")
        .unwrap();
    assert_eq!(current.kind, EntryKind::Dir);
}

#[cfg(unix)]
#[test]
fn unreadable_root_is_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = setup_site();
    let locked = tmp.path().join("site").join("posts");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can list anything; nothing to check then
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let from_dir = Walk::from_dir(&locked).map(|_| ());
    let descended = DirIndex::new(tmp.path().join("site"))
        .walk()
        .unwrap()
        .match_exec(IS_DIR, |dir| {
            if dir.name == "posts" {
                dir.walk()?;
            }
            Ok::<_, BlogwareError>(())
        })
        .map(|_| ());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    match from_dir {
        Err(BlogwareError::PermissionDenied(p)) => assert_eq!(p, locked),
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
    assert!(matches!(descended, Err(BlogwareError::PermissionDenied(_))));
}
