mod common;

use std::fs;
use std::path::PathBuf;

use common::{animals, numbered, word, ArchiveBuilder};
use dict_pager::{DictError, PagerConfig, Session, Span};
use proptest::prelude::*;
use tempfile::TempDir;

fn session_with(builder: ArchiveBuilder, config: PagerConfig) -> (TempDir, Session) {
    let (dir, base) = builder.build("archive");
    let session = Session::open(&[("test".to_string(), base)], config).unwrap();
    (dir, session)
}

fn strict() -> PagerConfig {
    let mut config = PagerConfig::default();
    config.modes.strict = true;
    config
}

fn paged(lines: usize) -> PagerConfig {
    let mut config = PagerConfig::default();
    config.page_lines = lines;
    config
}

fn separator(c: char) -> String {
    c.to_string().repeat(80)
}

#[test]
fn exact_match_is_shown_first_then_neighbours() {
    let (_dir, mut session) = session_with(animals(), PagerConfig::default());
    let page = session.search("dog").unwrap();
    assert_eq!(page[0], separator('='));
    assert_eq!(page[1].trim(), "Animals");
    assert_eq!(page[2].trim(), "dog");
    assert_eq!(page[4], "  dog, a loyal canine");
    assert!(page.contains(&separator('-')));
    assert!(page.contains(&"  zeal, great energy".to_string()));
}

#[test]
fn nearest_hit_is_rendered_best_effort() {
    let (_dir, mut session) = session_with(animals(), PagerConfig::default());
    let page = session.search("doz").unwrap();
    assert_eq!(page[0], separator('-'));
    assert_eq!(page[2].trim(), "dog");
}

#[test]
fn digit_suffix_homographs_all_match() {
    let builder = ArchiveBuilder::new("Finance")
        .entry("bank1", "edge of a river")
        .entry("bank2", "place for money")
        .entry("banker", "one who banks");
    let (_dir, mut session) = session_with(builder, strict());
    let page = session.search("bank").unwrap();
    assert!(page.contains(&"  bank1, edge of a river".to_string()));
    assert!(page.contains(&"  bank2, place for money".to_string()));
    assert!(!page.iter().any(|l| l.contains("banker")));
}

#[test]
fn strict_mode_never_widens() {
    let (_dir, mut session) = session_with(animals(), strict());
    let page = session.search("dog").unwrap();
    assert_eq!(page.len(), 5);
    let end = session.position().end;
    assert!(session.scroll(1, 0).is_none());
    assert!(session.scroll(-1, 0).is_none());
    assert_eq!(session.position().end, end);
    assert_eq!(session.buffer().loaded().len(), 1);
    assert!(session.search("doz").is_none());
}

#[test]
fn lazy_load_pulls_entry_load_ids() {
    let (_dir, mut session) = session_with(numbered(50), paged(3));
    session.search(&word(0)).unwrap();
    assert_eq!(session.buffer().loaded().len(), 21);
    assert_eq!(session.buffer().last_loaded_id(), Some(20));
}

#[test]
fn lazy_load_stops_at_catalog_end() {
    let (_dir, mut session) = session_with(numbered(50), paged(4));
    session.search(&word(45)).unwrap();
    assert!(session.scroll(4, 0).is_some());
    let last = session.scroll(4, 0).unwrap();
    assert_eq!(last.last(), Some(&format!("  {}, entry number 49", word(49))));
    let end = session.position().end;
    assert!(session.scroll(1, 0).is_none());
    assert_eq!(session.position().end, end);
    assert_eq!(session.buffer().last_loaded_id(), Some(49));
}

#[test]
fn scroll_forward_then_back_restores_window() {
    let (_dir, mut session) = session_with(numbered(30), paged(5));
    session.search(&word(10)).unwrap();
    let before = session.position();
    let page = session.visible_lines();
    session.scroll(5, 0).unwrap();
    session.scroll(-5, 0).unwrap();
    assert_eq!(session.position(), before);
    assert_eq!(session.visible_lines(), page);
}

#[test]
fn jump_entries_moves_whole_entries_both_ways() {
    let (_dir, mut session) = session_with(numbered(10), paged(2));
    session.search(&word(3)).unwrap();
    let lines = session.jump_entries(1, 2).unwrap();
    assert_eq!(lines[2].trim(), word(4));
    let lines = session.jump_entries(-2, 2).unwrap();
    assert_eq!(lines[2].trim(), word(2));
    assert_eq!(session.buffer().first_loaded_id(), Some(0));
}

#[test]
fn position_snapshot_restores_the_view() {
    let (_dir, mut session) = session_with(numbered(10), paged(3));
    let first = session.search(&word(2)).unwrap();
    let saved = session.position();
    session.scroll(3, 0).unwrap();
    assert_ne!(session.visible_lines(), first);
    assert!(session.set_position(&saved));
    assert_eq!(session.visible_lines(), first);
}

#[test]
fn position_snapshot_survives_backward_lazy_load() {
    let mut config = paged(3);
    config.entry_load = 5;
    let (_dir, mut session) = session_with(numbered(60), config);
    let first = session.search(&word(30)).unwrap();
    assert_eq!(first[2].trim(), word(30));
    let saved = session.position();

    session.scroll(-3, 0).unwrap();
    assert_eq!(session.buffer().first_loaded_id(), Some(25));
    assert_ne!(session.visible_lines(), first);

    assert!(session.set_position(&saved));
    assert_eq!(session.visible_lines(), first);
}

#[test]
fn position_snapshot_is_refused_after_a_new_search() {
    let (_dir, mut session) = session_with(numbered(10), paged(3));
    session.search(&word(2)).unwrap();
    let saved = session.position();
    let page = session.search(&word(6)).unwrap();
    assert!(!session.set_position(&saved));
    assert_eq!(session.visible_lines(), page);
}

#[test]
fn visible_search_reports_display_columns() {
    let mut config = strict();
    config.layout.show_header = false;
    let (_dir, mut session) = session_with(animals(), config);
    let page = session.search("cat").unwrap();
    assert_eq!(page, vec!["  cat, a small <b>feline</b>"]);
    assert_eq!(
        session.search_visible("feline", false),
        vec![Span { line: 0, start: 15, end: 21 }]
    );
    assert_eq!(
        session.search_visible("CAT", false),
        vec![Span { line: 0, start: 2, end: 5 }]
    );
    assert_eq!(session.search_visible("f.l", true).len(), 1);
    assert!(session.search_visible("dog", false).is_empty());
}

#[test]
fn regex_and_strict_toggles_reseed_from_last_query() {
    let (_dir, mut session) = session_with(animals(), PagerConfig::default());
    assert!(session.search("^do").is_none());

    let page = session.set_regex(true).unwrap();
    assert_eq!(page[0], separator('#'));
    assert!(page.contains(&"  doge, a Venetian magistrate".to_string()));
    assert!(page.contains(&separator('~')));

    let page = session.set_strict(true).unwrap();
    assert!(!page.contains(&separator('~')));
    assert_eq!(session.buffer().loaded().len(), 2);
    assert!(session.scroll(1, 0).is_none());
    assert!(session.modes().strict && session.modes().regex);
}

#[test]
fn normalize_toggle_controls_folding() {
    let builder = ArchiveBuilder::new("Food").entry("cafe", "coffee house");
    let (_dir, mut session) = session_with(builder, PagerConfig::default());
    assert!(session.search("CAFÉ").is_some());
    assert!(session.set_normalize(false).is_none());
    assert!(session.buffer().is_empty());
    assert!(session.set_normalize(true).is_some());
    assert_eq!(session.last_query(), Some("CAFÉ"));
}

#[test]
fn switching_dictionaries_reruns_the_query() {
    let dir = tempfile::tempdir().unwrap();
    let specs = vec![
        ("animals".to_string(), animals().write_to(dir.path(), "animals")),
        (
            "plants".to_string(),
            ArchiveBuilder::new("Plants")
                .entry("daisy", "a flower")
                .entry("rose", "a thorny flower")
                .write_to(dir.path(), "plants"),
        ),
    ];
    let mut session = Session::open(&specs, PagerConfig::default()).unwrap();

    let page = session.search("daisy").unwrap();
    assert_eq!(page[0], separator('-'));
    assert_eq!(page[2].trim(), "dog");

    let page = session.next_dictionary().unwrap();
    assert_eq!(session.selected_index(), 1);
    assert_eq!(page[0], separator('='));
    assert_eq!(page[1].trim(), "Plants");
    assert_eq!(page[2].trim(), "daisy");

    let page = session.previous_dictionary().unwrap();
    assert_eq!(session.selected().name, "animals");
    assert_eq!(page[1].trim(), "Animals");

    assert!(session.select_dictionary(5).is_none());
    assert_eq!(session.selected_index(), 0);
}

#[test]
fn reset_forgets_the_query_but_keeps_catalogs() {
    let (_dir, mut session) = session_with(animals(), PagerConfig::default());
    session.search("dog").unwrap();
    session.reset();
    assert_eq!(session.last_query(), None);
    assert!(session.visible_lines().is_empty());
    assert!(session.scroll(1, 0).is_none());
    assert!(session.set_strict(true).is_none());
    assert_eq!(session.selected().entry_count(), 4);
    assert!(session.search("cat").is_some());
}

#[test]
fn open_survives_some_broken_archives() {
    let dir = tempfile::tempdir().unwrap();
    let specs = vec![
        ("missing".to_string(), dir.path().join("missing")),
        ("animals".to_string(), animals().write_to(dir.path(), "animals")),
    ];
    let session = Session::open(&specs, PagerConfig::default()).unwrap();
    assert_eq!(session.dictionaries().len(), 1);
    assert_eq!(session.failed().len(), 1);
    assert_eq!(session.failed()[0].0, "missing");
}

#[test]
fn open_fails_when_nothing_opens() {
    let specs = vec![("gone".to_string(), PathBuf::from("/nonexistent/gone"))];
    assert!(matches!(
        Session::open(&specs, PagerConfig::default()),
        Err(DictError::MissingFile { .. })
    ));
    assert!(matches!(
        Session::open(&[], PagerConfig::default()),
        Err(DictError::Config(_))
    ));
}

#[test]
fn config_file_drives_the_session() {
    let (dir, base) = animals().build("animals");
    let path = dir.path().join("pager.conf");
    fs::write(&path, "# narrow, headerless\nwidth = 30\nshow_header = off\nstrict = yes\n").unwrap();
    let config = PagerConfig::load(&path).unwrap();
    let mut session = Session::open(&[("a".to_string(), base)], config).unwrap();
    let page = session.search("doge").unwrap();
    assert_eq!(page, vec!["  doge, a Venetian", "  magistrate"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_full_page_scroll_is_invertible(page in 1usize..6, steps in 0usize..4) {
        let (_dir, mut session) = session_with(numbered(40), paged(page));
        session.search(&word(5)).unwrap();
        for _ in 0..steps {
            prop_assert!(session.scroll(page as isize, 0).is_some());
        }
        let before = session.position();
        prop_assert!(session.scroll(page as isize, 0).is_some());
        prop_assert!(session.scroll(-(page as isize), 0).is_some());
        prop_assert_eq!(session.position(), before);
    }
}
