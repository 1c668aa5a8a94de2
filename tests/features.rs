use std::{
    cell::{Cell, RefCell},
    fmt, fs, io,
    rc::Rc,
};

use stepbind::{
    gherkin::tagexpr::TagOperation,
    tag::Ext as _,
    writer::{self, Coloring},
    DataTable, Suite,
};

/// [`Suite`] implementing the steps of `tests/features/shop`.
fn shop() -> Suite {
    let stock = Rc::new(Cell::new(0_i64));
    let mut suite = Suite::new();
    let _ = suite.with_writer(writer::Discard);

    let s = Rc::clone(&stock);
    let _ = suite
        .given("a shop with {{s}} widgets", move |n: i64| s.set(n))
        .unwrap();

    let s = Rc::clone(&stock);
    let _ = suite
        .when("I sell {{s}} widgets to {{s}}", move |n: i64, _: String| {
            assert!(n <= s.get(), "only {} widgets left", s.get());
            s.set(s.get() - n);
        })
        .unwrap();

    let s = Rc::clone(&stock);
    let _ = suite
        .when("a delivery arrives:", move |t: DataTable| {
            let delivered = t
                .hashes()
                .iter()
                .filter_map(|row| row.get("count")?.parse::<i64>().ok())
                .sum::<i64>();
            s.set(s.get() + delivered);
        })
        .unwrap();

    let s = Rc::clone(&stock);
    let _ = suite
        .then("the shop has {{s}} widgets", move |n: i64| {
            assert_eq!(s.get(), n, "wrong stock");
        })
        .unwrap();

    suite
}

#[test]
fn runs_directory() {
    let summary = shop().run_path("tests/features/shop").unwrap();

    assert!(!summary.is_failed(), "{summary}");
    assert_eq!(summary.features, 2);
    assert_eq!(summary.passed_scenarios, 4);
    assert_eq!(summary.steps.passed, 12);
}

#[test]
fn runs_single_file() {
    let summary =
        shop().run_path("tests/features/shop/widgets.feature").unwrap();

    assert_eq!(summary.features, 1);
    assert_eq!(summary.passed_scenarios, 2);
}

#[test]
fn filters_by_tag_expression() {
    let op = "@shop and not @slow".parse::<TagOperation>().unwrap();
    let mut suite = shop();
    let _ = suite.with_filter(move |f, sc| op.matches(f, sc));

    let summary = suite.run_path("tests/features/shop").unwrap();

    assert_eq!(summary.features, 1);
    assert_eq!(summary.scenarios(), 1);
}

#[test]
fn reports_undefined_steps_with_snippet() {
    let out = Output::default();
    let mut suite = shop();
    let _ =
        suite.with_writer(writer::Basic::new(out.clone(), Coloring::Never));

    let summary = suite.run_path("tests/features/broken").unwrap();
    let out = out.to_string();

    assert!(summary.is_failed());
    assert_eq!(summary.undefined_steps, 1);
    assert!(out.contains("Then nobody is angry (undefined)"), "{out}");
    assert!(out.contains("suite.then(\"nobody is angry\", || {"), "{out}");
    assert!(out.contains("Unknown steps: asking for too much"), "{out}");
}

#[test]
fn reports_mismatch_against_registered_step_without_snippet() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("mismatch.feature"),
        "Feature: Mismatch\n\
         \n  Scenario: wrong type\n    Given a shop with \"many\" widgets\n\
         \n  Scenario: wrong kind\n    \
         Then I sell \"2\" widgets to \"Bob\"\n",
    )
    .unwrap();
    let out = Output::default();
    let mut suite = shop();
    let _ =
        suite.with_writer(writer::Basic::new(out.clone(), Coloring::Never));

    let summary = suite.run_path(dir.path()).unwrap();
    let out = out.to_string();

    assert_eq!(summary.undefined_steps, 2);
    assert_eq!(summary.failed_scenarios.len(), 2);
    assert!(
        out.contains(
            "Step definition `a shop with {{s}} widgets` is registered as a \
             Given step taking (integer), but this Given step supplies \
             (string)",
        ),
        "{out}",
    );
    assert!(
        out.contains(
            "Step definition `I sell {{s}} widgets to {{s}}` is registered \
             as a When step taking (integer, string), but this Then step \
             supplies (integer, string)",
        ),
        "{out}",
    );
    assert!(!out.contains("You can implement it with"), "{out}");
}

#[test]
fn missing_directory_is_an_error() {
    let err = shop().run_path("tests/features/missing").unwrap_err();

    assert!(err.to_string().contains("tests/features/missing"), "{err}");
}

#[test]
fn reports_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.feature"), "Scenario: no feature").unwrap();

    assert!(shop().run_path(dir.path()).is_err());
}

#[test]
fn run_and_exit_passes() {
    shop().run_and_exit("tests/features/shop");
}

#[test]
#[should_panic(expected = "1 scenario failed")]
fn run_and_exit_panics_on_failure() {
    shop().run_and_exit("tests/features/broken");
}

#[test]
#[should_panic(expected = "Failed to read")]
fn run_and_exit_panics_on_missing_path() {
    shop().run_and_exit("tests/features/missing");
}

/// Output of a [`writer::Basic`] shared with the test.
#[derive(Clone, Debug, Default)]
struct Output(Rc<RefCell<Vec<u8>>>);

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0.borrow()))
    }
}
