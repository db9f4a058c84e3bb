use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::output::{self, OutputFormat};
use crate::roster::{Member, RosterError};
use crate::runner::{Options, RosterSource, Runner};
use crate::search::{Debouncer, Decoration, FilterOptions, Item, SearchFilter};
use crate::session::{InputEvent, Session};

fn brackets() -> Decoration {
    Decoration::Markers {
        open: "[".to_string(),
        close: "]".to_string(),
    }
}

fn scenario_items() -> Vec<Item> {
    vec![
        Item::new(["Alice Martin - President"]),
        Item::new(["Bob Dupont - Secretary"]),
    ]
}

fn scenario_filter() -> SearchFilter {
    SearchFilter::new(scenario_items(), FilterOptions::default())
}

fn wider_filter() -> SearchFilter {
    SearchFilter::new(
        vec![
            Item::new(["Alice Martin", "President", "alice@nova.org"]),
            Item::new(["Bob Dupont", "Secretary", "bob@nova.org"]),
            Item::new(["Chloé Bernard", "Treasurer", "a.b@nova.org"]),
            Item::new(["David Axb", "Member"]),
        ],
        FilterOptions::default(),
    )
}

#[test]
fn bob_scenario_shows_one_highlighted_card() {
    let mut filter = scenario_filter();
    let pass = filter.set_term("bob").clone();
    assert_eq!(pass.visible_count, 1);
    assert!(!pass.no_results);
    assert!(!pass.views[0].visible);
    assert!(pass.views[1].visible);
    assert_eq!(
        pass.views[1].render(&brackets()),
        vec!["[Bob] Dupont - Secretary".to_string()]
    );
    assert_eq!(filter.visible_count("bob"), 1);
    assert!(!filter.no_results("bob"));
}

#[test]
fn unmatched_term_reports_no_results() {
    let mut filter = scenario_filter();
    let pass = filter.set_term("zzz");
    assert_eq!(pass.visible_count, 0);
    assert!(pass.no_results);
    assert!(filter.no_results("zzz"));
    assert_eq!(filter.visible_count("zzz"), 0);
}

#[test]
fn empty_term_after_search_restores_everything() {
    let mut filter = scenario_filter();
    filter.set_term("bob");
    let pass = filter.set_term("");
    assert!(!pass.active);
    assert_eq!(pass.visible_count, 2);
    assert!(!pass.no_results);
    assert!(pass.views.iter().all(|v| v.visible && !v.has_highlights()));
    assert!(!filter.no_results(""));
}

#[test]
fn visible_count_matches_predicate_for_many_terms() {
    let filter = wider_filter();
    for term in ["", "a", "nova", "MARTIN", "x", "a.b", "é", "zzz", "\n"] {
        let expected = filter
            .items()
            .iter()
            .filter(|item| SearchFilter::is_match(item, term))
            .count();
        assert_eq!(filter.visible_count(term), expected, "term {term:?}");
    }
}

#[test]
fn empty_term_matches_every_item() {
    let filter = wider_filter();
    assert!(filter
        .items()
        .iter()
        .all(|item| SearchFilter::is_match(item, "")));
    assert_eq!(filter.visible_count(""), filter.items().len());
}

#[test]
fn metacharacters_match_literally() {
    let filter = wider_filter();
    let matching: Vec<usize> = filter
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| SearchFilter::is_match(item, "a.b"))
        .map(|(i, _)| i)
        .collect();
    // "Axb" would match a `.` wildcard
    assert_eq!(matching, vec![2]);

    let mut filter = wider_filter();
    for term in ["(", "[a-z]+", "*", "\\", "a|b", "$^"] {
        let pass = filter.set_term(term);
        assert!(pass.no_results, "term {term:?}");
    }
}

#[test]
fn set_term_is_idempotent() {
    let mut filter = wider_filter();
    let first = filter.set_term("  NoVa ").clone();
    let second = filter.set_term("  NoVa ").clone();
    assert_eq!(first, second);
    assert_eq!(first.term, "nova");

    filter.apply_highlights("nova");
    let again = filter.pass().clone();
    assert_eq!(again, first);
}

#[test]
fn highlights_revert_to_original_text() {
    let mut filter = wider_filter();
    filter.set_term("o");
    for view in filter.pass().views.iter() {
        assert_eq!(view.plain_text(), filter.items()[view.index].segments());
    }
    assert!(filter.pass().views.iter().any(|v| v.has_highlights()));

    filter.revert_highlights();
    for view in filter.pass().views.iter() {
        assert!(!view.has_highlights());
        assert_eq!(view.plain_text(), filter.items()[view.index].segments());
    }
}

#[test]
fn new_term_replaces_previous_highlights() {
    let mut filter = wider_filter();
    filter.set_term("alice");
    let pass = filter.set_term("martin");
    let rendered = pass.views[0].render(&brackets());
    assert_eq!(rendered[0], "Alice [Martin]");
    assert_eq!(rendered[2], "alice@nova.org");
}

#[test]
fn visibility_ignores_previous_state() {
    let mut a = wider_filter();
    a.set_term("zzz");
    let after_hidden = a.set_term("bob").clone();
    let mut b = wider_filter();
    let direct = b.set_term("bob").clone();
    assert_eq!(after_hidden, direct);
}

#[test]
fn report_renders_every_format() {
    let mut filter = scenario_filter();
    let pass = filter.set_term("bob").clone();

    let report = output::build_report(Some("NOVA"), &pass, filter.items(), &brackets());
    let text = String::from_utf8(output::render(OutputFormat::Text, &report).unwrap()).unwrap();
    assert_eq!(text, "[Bob] Dupont - Secretary\n");

    let report = output::build_report(Some("NOVA"), &pass, filter.items(), &Decoration::default());
    let json: serde_json::Value =
        serde_json::from_slice(&output::render(OutputFormat::Json, &report).unwrap()).unwrap();
    assert_eq!(json["visible_count"], 1);
    assert_eq!(json["records"][0]["transition"]["kind"], "hide");
    assert_eq!(json["records"][1]["transition"]["delay_ms"], 50);
    assert_eq!(json["records"][1]["text"][0], "Bob Dupont - Secretary");

    let html = String::from_utf8(output::render(OutputFormat::Html, &report).unwrap()).unwrap();
    assert!(html.contains("<title>NOVA</title>"));
    assert!(html.contains("<span class=\"highlight\""));
    assert!(html.contains("class=\"no-results\" style=\"display: none;\""));
}

#[test]
fn no_results_text_mentions_hint() {
    colored::control::set_override(false);
    let mut filter = scenario_filter();
    let pass = filter.set_term("zzz").clone();
    let report = output::build_report(None, &pass, filter.items(), &brackets());
    let text = String::from_utf8(output::render_text(&report)).unwrap();
    assert_eq!(
        text,
        format!("{}\n{}\n", output::NO_RESULTS_TITLE, output::NO_RESULTS_HINT)
    );
}

#[tokio::test(start_paused = true)]
async fn keystroke_burst_runs_one_pass_at_quiet_deadline() {
    let mut session = Session::new(
        scenario_filter(),
        Debouncer::new(Duration::from_millis(300)),
    );
    let (tx, rx) = mpsc::channel::<InputEvent>(16);
    let start = Instant::now();

    let feeder = tokio::spawn(async move {
        for (i, value) in ["b", "bo", "bob", "bob d"].into_iter().enumerate() {
            tokio::time::sleep_until(start + Duration::from_millis(50 * i as u64)).await;
            tx.send(InputEvent::Changed(value.to_string())).await.unwrap();
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    });

    let mut fired = Vec::new();
    session
        .run(rx, |pass| {
            fired.push((start.elapsed(), pass.term.clone(), pass.visible_count))
        })
        .await;
    feeder.await.unwrap();

    assert_eq!(fired.len(), 1);
    let (elapsed, term, visible) = &fired[0];
    assert!(*elapsed >= Duration::from_millis(450));
    assert!(*elapsed < Duration::from_millis(451));
    assert_eq!(term, "bob d");
    assert_eq!(*visible, 1);
    assert_eq!(session.passes(), 1);
}

#[tokio::test(start_paused = true)]
async fn escape_cancels_pending_and_clears_at_once() {
    let mut session = Session::new(
        scenario_filter(),
        Debouncer::new(Duration::from_millis(300)),
    );
    let (tx, rx) = mpsc::channel::<InputEvent>(16);
    let start = Instant::now();

    let feeder = tokio::spawn(async move {
        tx.send(InputEvent::Changed("bob".to_string())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(InputEvent::Escape).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
    });

    let mut fired = Vec::new();
    session
        .run(rx, |pass| {
            fired.push((start.elapsed(), pass.active, pass.focus_requested))
        })
        .await;
    feeder.await.unwrap();

    assert_eq!(fired.len(), 1);
    let (elapsed, active, focus_requested) = fired[0];
    assert!(elapsed >= Duration::from_millis(100) && elapsed < Duration::from_millis(101));
    assert!(!active);
    assert!(focus_requested);
}

#[tokio::test(start_paused = true)]
async fn pending_value_fires_after_input_closes() {
    let mut session = Session::new(
        scenario_filter(),
        Debouncer::new(Duration::from_millis(300)),
    );
    let (tx, rx) = mpsc::channel::<InputEvent>(16);
    let start = Instant::now();
    tx.send(InputEvent::Changed("zzz".to_string())).await.unwrap();
    drop(tx);

    let mut fired = Vec::new();
    session
        .run(rx, |pass| fired.push((start.elapsed(), pass.no_results)))
        .await;

    assert_eq!(fired.len(), 1);
    assert!(fired[0].0 >= Duration::from_millis(300));
    assert!(fired[0].1);
}

#[tokio::test(start_paused = true)]
async fn submit_skips_the_quiet_period() {
    let mut session = Session::new(
        scenario_filter(),
        Debouncer::new(Duration::from_millis(300)),
    );
    let (tx, rx) = mpsc::channel::<InputEvent>(16);
    let start = Instant::now();
    tx.send(InputEvent::Changed("alice".to_string())).await.unwrap();
    tx.send(InputEvent::Submit).await.unwrap();
    drop(tx);

    let mut fired = Vec::new();
    session
        .run(rx, |pass| fired.push((start.elapsed(), pass.visible_count)))
        .await;

    assert_eq!(fired, vec![(Duration::ZERO, 1)]);
}

fn inline_members() -> Vec<Member> {
    vec![
        Member {
            name: "Alice Martin".to_string(),
            role: Some("President".to_string()),
            ..Default::default()
        },
        Member {
            name: "Bob Dupont".to_string(),
            role: Some("Secretary".to_string()),
            email: Some("bob@nova.org".to_string()),
            ..Default::default()
        },
    ]
}

#[tokio::test]
async fn runner_search_applies_query_once() {
    let runner = Runner::new(Options {
        roster: RosterSource::Inline(inline_members()),
        title: Some("NOVA".to_string()),
        decoration: brackets(),
        ..Options::default()
    })
    .unwrap();
    let outcome = runner.search("SECRETARY").await.unwrap();
    assert_eq!(outcome.pass.visible_count, 1);
    assert_eq!(outcome.report.title.as_deref(), Some("NOVA"));
    assert_eq!(
        outcome.report.records[1].rendered,
        vec!["Bob Dupont", "[Secretary]", "bob@nova.org"]
    );
}

#[test]
fn runner_rejects_blank_roster_path() {
    let err = Runner::new(Options {
        roster: RosterSource::FilePath("  ".to_string()),
        ..Options::default()
    })
    .unwrap_err();
    assert!(matches!(err, crate::runner::RunnerError::EmptyRosterPath));
}

#[tokio::test]
async fn inline_roster_is_validated_like_a_file() {
    let mut members = inline_members();
    members[1].name = "  ".to_string();
    let runner = Runner::new(Options {
        roster: RosterSource::Inline(members),
        ..Options::default()
    })
    .unwrap();
    let err = runner.search("bob").await.unwrap_err();
    assert!(matches!(
        err,
        crate::runner::RunnerError::Roster(RosterError::EmptyName { index: 1 })
    ));
}

#[tokio::test(start_paused = true)]
async fn runner_session_reports_each_pass() {
    let runner = Runner::new(Options {
        roster: RosterSource::Inline(inline_members()),
        debounce_delay: Duration::from_millis(100),
        decoration: brackets(),
        ..Options::default()
    })
    .unwrap();
    let (tx, rx) = mpsc::channel::<InputEvent>(16);
    let feeder = tokio::spawn(async move {
        tx.send(InputEvent::Changed("mart".to_string())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(InputEvent::Changed("".to_string())).await.unwrap();
    });

    let mut rendered: Vec<Vec<String>> = Vec::new();
    let outcome = runner
        .session(rx, |_, report| {
            rendered.push(
                report
                    .records
                    .iter()
                    .filter(|r| r.visible)
                    .map(|r| r.rendered.join(" "))
                    .collect(),
            )
        })
        .await
        .unwrap();
    feeder.await.unwrap();

    assert_eq!(
        rendered,
        vec![
            vec!["Alice [Mart]in President".to_string()],
            vec![
                "Alice Martin President".to_string(),
                "Bob Dupont Secretary bob@nova.org".to_string()
            ],
        ]
    );
    assert!(!outcome.pass.active);
}
