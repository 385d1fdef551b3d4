use std::path::PathBuf;

use super::*;
use crate::slots::fs::DiskFs;

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

fn lvl(name: &str) -> LevelId {
    LevelId::new(name).unwrap()
}

fn put(layout: &MovieLayout, slot: &Slot, content: &str) {
    std::fs::write(slot.path(layout), content).unwrap();
}

fn read(layout: &MovieLayout, slot: &Slot) -> Option<String> {
    std::fs::read_to_string(slot.path(layout)).ok()
}

#[test]
fn install_over_default_parks_the_default_movie() {
    let tmp = temp_dir("engine_over_default");
    std::fs::create_dir_all(&tmp).unwrap();
    let layout = MovieLayout::in_dir(&tmp);
    put(&layout, &Slot::Active, "default");
    put(&layout, &Slot::Level(lvl("B")), "b");

    let report = RotationEngine::new(&layout, &DiskFs)
        .rotate(&lvl("A"), &lvl("B"))
        .unwrap();

    assert_eq!(report.case, RotationCase::InstallOverDefault);
    assert_eq!(report.applied.len(), 2);
    assert_eq!(read(&layout, &Slot::Active).as_deref(), Some("b"));
    assert_eq!(read(&layout, &Slot::Default).as_deref(), Some("default"));
    assert_eq!(read(&layout, &Slot::Level(lvl("B"))), None);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn restore_default_parks_the_leaving_movie() {
    let tmp = temp_dir("engine_restore_default");
    std::fs::create_dir_all(&tmp).unwrap();
    let layout = MovieLayout::in_dir(&tmp);
    put(&layout, &Slot::Active, "a");
    put(&layout, &Slot::Default, "default");

    let report = RotationEngine::new(&layout, &DiskFs)
        .rotate(&lvl("A"), &lvl("B"))
        .unwrap();

    assert_eq!(report.case, RotationCase::RestoreDefault);
    assert_eq!(read(&layout, &Slot::Active).as_deref(), Some("default"));
    assert_eq!(read(&layout, &Slot::Level(lvl("A"))).as_deref(), Some("a"));
    assert_eq!(read(&layout, &Slot::Default), None);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn stray_default_is_deleted_and_parked_level_kept() {
    let tmp = temp_dir("engine_stray");
    std::fs::create_dir_all(&tmp).unwrap();
    let layout = MovieLayout::in_dir(&tmp);
    put(&layout, &Slot::Active, "a-copy");
    put(&layout, &Slot::Default, "stale");
    put(&layout, &Slot::Level(lvl("A")), "a");
    put(&layout, &Slot::Level(lvl("B")), "b");

    let report = RotationEngine::new(&layout, &DiskFs)
        .rotate(&lvl("A"), &lvl("B"))
        .unwrap();

    assert_eq!(report.case, RotationCase::InstallOverStray);
    assert_eq!(read(&layout, &Slot::Active).as_deref(), Some("b"));
    assert_eq!(read(&layout, &Slot::Level(lvl("A"))).as_deref(), Some("a"));
    assert_eq!(read(&layout, &Slot::Default), None);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn empty_active_is_refilled_without_parking() {
    let tmp = temp_dir("engine_empty_active");
    std::fs::create_dir_all(&tmp).unwrap();
    let layout = MovieLayout::in_dir(&tmp);
    put(&layout, &Slot::Default, "default");
    put(&layout, &Slot::Level(lvl("A")), "a");
    put(&layout, &Slot::Level(lvl("B")), "b");

    let report = RotationEngine::new(&layout, &DiskFs)
        .rotate(&lvl("A"), &lvl("B"))
        .unwrap();

    assert_eq!(report.case, RotationCase::RefillEmptyActive);
    assert_eq!(report.applied.len(), 1);
    assert_eq!(read(&layout, &Slot::Active).as_deref(), Some("b"));
    assert_eq!(read(&layout, &Slot::Default).as_deref(), Some("default"));
    assert_eq!(read(&layout, &Slot::Level(lvl("A"))).as_deref(), Some("a"));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn source_removed_after_planning_is_not_found() {
    let tmp = temp_dir("engine_source_gone");
    std::fs::create_dir_all(&tmp).unwrap();
    let layout = MovieLayout::in_dir(&tmp);
    put(&layout, &Slot::Active, "a");
    put(&layout, &Slot::Default, "default");

    let engine = RotationEngine::new(&layout, &DiskFs);
    let plan = engine.plan(&lvl("A"), &lvl("B")).unwrap();
    std::fs::remove_file(Slot::Active.path(&layout)).unwrap();

    let err = engine.execute(plan).unwrap_err();
    let StartupMovieError::Rotation {
        step,
        applied,
        source,
        ..
    } = err
    else {
        panic!("expected rotation error");
    };
    assert_eq!((step, applied), (1, 0));
    assert_eq!(source.kind(), io::ErrorKind::NotFound);
    // The restore step never ran.
    assert_eq!(read(&layout, &Slot::Default).as_deref(), Some("default"));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn park_refuses_to_overwrite_an_occupied_slot() {
    let tmp = temp_dir("engine_park_occupied");
    std::fs::create_dir_all(&tmp).unwrap();
    let layout = MovieLayout::in_dir(&tmp);
    put(&layout, &Slot::Active, "a");
    put(&layout, &Slot::Default, "default");
    put(&layout, &Slot::Level(lvl("B")), "b");

    let engine = RotationEngine::new(&layout, &DiskFs);
    let plan = engine.plan(&lvl("A"), &lvl("B")).unwrap();
    // A parked copy of A appears between planning and execution.
    put(&layout, &Slot::Level(lvl("A")), "a-elsewhere");

    let err = engine.execute(plan).unwrap_err();
    let StartupMovieError::Rotation { source, .. } = err else {
        panic!("expected rotation error");
    };
    assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
    assert_eq!(read(&layout, &Slot::Active).as_deref(), Some("a"));
    assert_eq!(
        read(&layout, &Slot::Level(lvl("A"))).as_deref(),
        Some("a-elsewhere")
    );

    std::fs::remove_dir_all(&tmp).ok();
}
