use deploy_fs::NormalizedPath;

#[test]
fn test_join_resolves_dots() {
    let base = NormalizedPath::new("/a/b");

    assert_eq!(base.join("c").as_str(), "/a/b/c");
    assert_eq!(base.join("./c").as_str(), "/a/b/c");
    assert_eq!(base.join("../c").as_str(), "/a/c");
    assert_eq!(base.join("../../c").as_str(), "/c");

    let root = NormalizedPath::new("/workspace");
    let unsafe_path = root.join("../secrets.txt");
    assert_eq!(unsafe_path.as_str(), "/secrets.txt");
    assert!(!unsafe_path.as_str().starts_with("/workspace"));
}

#[test]
fn test_relative_path_sandboxing() {
    let path = NormalizedPath::new("../outside.txt");
    assert_eq!(path.as_str(), "outside.txt");

    let path2 = NormalizedPath::new("a/../../b");
    assert_eq!(path2.as_str(), "b");
}

#[test]
fn test_absolute_root_cannot_be_escaped() {
    let path = NormalizedPath::new("/../../etc");
    assert_eq!(path.as_str(), "/etc");
}

#[test]
fn test_separators_collapse() {
    assert_eq!(NormalizedPath::new("a//b///c/").as_str(), "a/b/c");
    assert_eq!(NormalizedPath::new("//server/share").as_str(), "//server/share");
    assert_eq!(NormalizedPath::new("///x").as_str(), "/x");
}

#[test]
fn test_join_onto_empty_base() {
    let base = NormalizedPath::new("");
    assert_eq!(base.join("img/logo.png").as_str(), "img/logo.png");
}
