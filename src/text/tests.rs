use super::*;

#[test]
fn test_normalize_trims_and_collapses_whitespace() {
    assert_eq!(normalize("  VR \t space\n world  "), "VR space world");
}

#[test]
fn test_normalize_nfkc_fullwidth() {
    assert_eq!(normalize("ＶＲ　空間"), "VR 空間");
    assert_eq!(normalize("ｱﾊﾞﾀｰ"), "アバター");
}

#[test]
fn test_normalize_drops_control_characters() {
    assert_eq!(normalize("edu\u{0007}cation"), "education");
}

#[test]
fn test_normalize_empty_and_blank() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize(" \n\t "), "");
}

#[test]
fn test_normalize_key_lowercases() {
    assert_eq!(normalize_key("  VR Space "), "vr space");
    assert_eq!(normalize_text("Ｅｄｕｃａｔｉｏｎ"), "education");
}

#[test]
fn test_unique_normalized_keeps_first_display_form() {
    let labels = ["VR space", "vr  SPACE", "", "Education", "  ", "education"];
    assert_eq!(unique_normalized(labels), vec!["VR space", "Education"]);
}

#[test]
fn test_parse_seed_list_separators() {
    let seeds = parse_seed_list("VR space, avatar;education\r\nAvatar\n\n");
    assert_eq!(seeds, vec!["VR space", "avatar", "education"]);
}
