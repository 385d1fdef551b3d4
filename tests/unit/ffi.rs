use std::path::PathBuf;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "startup_movie_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[test]
fn null_pointers_are_rejected_without_touching_disk() {
    let tmp = temp_dir("ffi_null");
    let switcher = MovieSwitcher::on_disk(MovieLayout::in_dir(&tmp));
    let loading = wide("Field");

    let code = unsafe { set_startup_movie_raw(&switcher, std::ptr::null(), loading.as_ptr()) };
    assert_eq!(code, STATUS_NULL_ARGUMENT);
    assert!(!tmp.exists());
}

#[test]
fn same_level_reports_unchanged() {
    let tmp = temp_dir("ffi_same");
    let switcher = MovieSwitcher::on_disk(MovieLayout::in_dir(&tmp));
    let a = wide("Islands");
    let b = wide("Islands");

    let code = unsafe { set_startup_movie_raw(&switcher, a.as_ptr(), b.as_ptr()) };
    assert_eq!(code, STATUS_UNCHANGED);
}

#[test]
fn rotation_through_raw_pointers_installs_the_level_movie() {
    let tmp = temp_dir("ffi_rotate");
    std::fs::create_dir_all(&tmp).unwrap();
    let layout = MovieLayout::in_dir(&tmp);
    std::fs::write(layout.active_path(), "default").unwrap();
    std::fs::write(tmp.join("LoadingScreen_Walls.bik"), "walls").unwrap();
    let switcher = MovieSwitcher::on_disk(layout.clone());

    let leaving = wide("Field");
    let loading = wide("Walls");
    let code = unsafe { set_startup_movie_raw(&switcher, leaving.as_ptr(), loading.as_ptr()) };

    assert_eq!(code, STATUS_ROTATED);
    assert_eq!(std::fs::read_to_string(layout.active_path()).unwrap(), "walls");
    assert_eq!(std::fs::read_to_string(layout.default_path()).unwrap(), "default");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn invalid_level_maps_to_its_status() {
    let tmp = temp_dir("ffi_invalid");
    let switcher = MovieSwitcher::on_disk(MovieLayout::in_dir(&tmp));
    let leaving = wide("Field");
    let loading = wide("..\\Escape");

    let code = unsafe { set_startup_movie_raw(&switcher, leaving.as_ptr(), loading.as_ptr()) };
    assert_eq!(code, STATUS_INVALID_LEVEL);
}

#[test]
fn missing_movies_directory_is_not_writable() {
    let tmp = temp_dir("ffi_missing_dir");
    let switcher = MovieSwitcher::on_disk(MovieLayout::in_dir(&tmp));
    let leaving = wide("Field");
    let loading = wide("Walls");

    let code = unsafe { set_startup_movie_raw(&switcher, leaving.as_ptr(), loading.as_ptr()) };
    assert_eq!(code, STATUS_STATE_NOT_WRITABLE);
    assert!(!tmp.exists());
}
