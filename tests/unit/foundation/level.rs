use super::*;

#[test]
fn short_names_are_kept_verbatim() {
    let id = LevelId::new("CNC-Walls_Flying").unwrap();
    assert_eq!(id.as_str(), "CNC-Walls_Flying");
    assert_eq!(id.as_bytes(), b"CNC-Walls_Flying");
}

#[test]
fn comparison_is_case_sensitive() {
    assert_ne!(LevelId::new("Field").unwrap(), LevelId::new("field").unwrap());
}

#[test]
fn long_names_truncate_to_the_byte_bound() {
    let long = "x".repeat(400);
    let id = LevelId::new(&long).unwrap();
    assert_eq!(id.as_str().len(), MAX_LEVEL_ID_BYTES);
}

#[test]
fn truncation_never_splits_a_character() {
    // 254 ASCII bytes followed by a 2-byte character straddling the bound.
    let name = format!("{}é", "a".repeat(254));
    let id = LevelId::new(&name).unwrap();
    assert_eq!(id.as_str().len(), 254);
    assert!(id.as_str().chars().all(|c| c == 'a'));
}

#[test]
fn empty_and_path_like_names_are_rejected() {
    assert!(LevelId::new("").is_err());
    assert!(LevelId::new("../Movies").is_err());
    assert!(LevelId::new("a\\b").is_err());
    assert!(LevelId::new("a\0b").is_err());
}

#[test]
fn wide_text_decodes_utf16() {
    let wide: Vec<u16> = "Mesa_Ü".encode_utf16().collect();
    assert_eq!(LevelId::from_wide(&wide).unwrap().as_str(), "Mesa_Ü");
}

#[test]
fn unpaired_surrogates_become_replacement_chars() {
    let wide = [0x0041, 0xD800, 0x0042];
    assert_eq!(LevelId::from_wide(&wide).unwrap().as_str(), "A\u{FFFD}B");
}

#[test]
fn deserialize_applies_validation() {
    let ok: LevelId = serde_json::from_str("\"Islands\"").unwrap();
    assert_eq!(ok.as_str(), "Islands");
    assert!(serde_json::from_str::<LevelId>("\"\"").is_err());
}
