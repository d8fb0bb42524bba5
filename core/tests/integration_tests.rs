use std::sync::Arc;

use command_tree_core::{
    Application, Command, ErrorKind, ParamType, ParameterConfig, Value, ValueMap, parse, resolve,
    seed_defaults,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn say() -> Command {
    let loud = Command::builder("loud")
        .help("Shout the input")
        .add_parameter(ParameterConfig::positional("text", ParamType::String))
        .build()
        .unwrap();
    Command::builder("say")
        .help("Print the input")
        .add_parameters([
            ParameterConfig::positional("input", ParamType::String)
                .required()
                .repeatable(0),
            ParameterConfig::flag("repeat-count", ParamType::Number)
                .with_short("n")
                .with_default(1),
        ])
        .add_subcommand(loud)
        .build()
        .unwrap()
}

fn tree() -> Command {
    let tag = Command::builder("tag")
        .add_parameters([
            ParameterConfig::flag("label", ParamType::String)
                .with_short("l")
                .repeatable(2),
            ParameterConfig::flag("name", ParamType::String).required(),
        ])
        .build()
        .unwrap();
    Command::builder("app")
        .add_subcommands([say(), tag])
        .build()
        .unwrap()
}

fn kinds(errors: &[command_tree_core::ParseError]) -> Vec<ErrorKind> {
    errors.iter().map(|e| e.kind()).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn unbounded_positional_collects_words_around_flags() {
    let root = tree();
    let outcome = parse(&root, &["say", "hello", "world", "-n", "5"]);
    assert!(outcome.is_ok());

    let mut expected = ValueMap::new();
    expected.insert("input", Value::List(vec!["hello".into(), "world".into()]));
    expected.insert("repeat_count", Value::Number(5.0));
    assert_eq!(outcome.values, expected);
}

#[test]
fn conversion_failure_hides_missing_required() {
    let root = tree();
    let outcome = parse(&root, &["say", "-n", "abc"]);
    assert_eq!(
        outcome.error_messages(),
        vec!["failed to convert 'abc' to type number for flag '-n'"]
    );
}

#[test]
fn empty_input_reports_missing_positional() {
    let root = say();
    let tokens: Vec<String> = Vec::new();
    let outcome = parse(&root, &tokens);
    assert_eq!(kinds(&outcome.errors), vec![ErrorKind::MissingRequired]);
    assert_eq!(
        outcome.error_messages(),
        vec!["missing required positional 'input'"]
    );
}

#[test]
fn scalar_flag_supplied_twice_keeps_last() {
    let root = tree();
    let outcome = parse(&root, &["say", "x", "-n", "1", "-n", "2"]);
    assert!(outcome.is_ok());
    assert_eq!(outcome.values.get_number("repeat_count"), Some(2.0));
}

#[test]
fn nested_resolution_and_fallback_to_positional() {
    let root = tree();

    let r = resolve(&root, &["say", "loud", "x"]);
    assert_eq!(r.command.name(), "loud");
    assert_eq!(r.remaining, &["x"]);

    let outcome = parse(&root, &["say", "unknown", "x"]);
    assert_eq!(outcome.command.name(), "say");
    assert_eq!(
        outcome.values.get("input"),
        Some(&Value::List(vec!["unknown".into(), "x".into()]))
    );

    let outcome = parse(&root, &["tag", "unknown", "--name", "v1"]);
    assert_eq!(outcome.command.name(), "tag");
    assert_eq!(kinds(&outcome.errors), vec![ErrorKind::UnexpectedPositional]);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn resolution_consumes_exactly_the_command_prefix() {
    let root = tree();
    let cases: &[(&[&str], &str, usize)] = &[
        (&[], "app", 0),
        (&["say"], "say", 1),
        (&["say", "loud"], "loud", 2),
        (&["say", "loud", "loud"], "loud", 2),
        (&["-n", "say"], "app", 0),
        (&["tag", "say"], "tag", 1),
    ];
    for (tokens, target, consumed) in cases {
        let r = resolve(&root, *tokens);
        assert_eq!(r.command.name(), *target, "tokens: {tokens:?}");
        assert_eq!(r.remaining, &tokens[*consumed..], "tokens: {tokens:?}");
    }
}

#[test]
fn seeding_twice_gives_identical_maps() {
    let root = tree();
    for command in root.subcommands() {
        assert_eq!(seed_defaults(command), seed_defaults(command));
    }
}

#[test]
fn bounded_flag_rejects_third_occurrence() {
    let root = tree();
    let outcome = parse(
        &root,
        &["tag", "--name", "v1", "-l", "a", "-l", "b", "-l", "c"],
    );
    assert_eq!(kinds(&outcome.errors), vec![ErrorKind::RepeatLimitExceeded]);
    assert_eq!(
        outcome.values.get("label"),
        Some(&Value::List(vec!["a".into(), "b".into()]))
    );
}

#[test]
fn two_malformed_flags_give_two_errors() {
    let root = tree();
    let outcome = parse(&root, &["say", "hi", "-n", "abc", "--bogus", "1"]);
    assert_eq!(
        kinds(&outcome.errors),
        vec![ErrorKind::ConversionFailure, ErrorKind::UnknownFlag]
    );
}

#[test]
fn unknown_flag_suppresses_missing_required_flag() {
    let root = tree();
    let outcome = parse(&root, &["tag", "--bogus"]);
    assert_eq!(kinds(&outcome.errors), vec![ErrorKind::UnknownFlag]);

    let outcome = parse(&root, &["tag"]);
    assert_eq!(
        outcome.error_messages(),
        vec!["missing required flag '--name'"]
    );
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

#[test]
fn concurrent_parses_share_one_tree() {
    let app = Arc::new(Application::new(tree(), "1.0.0"));

    std::thread::scope(|scope| {
        for i in 0..8 {
            let app = Arc::clone(&app);
            scope.spawn(move || {
                let count = i.to_string();
                let outcome = app.parse(&["say", "word", "-n", count.as_str()]);
                assert!(outcome.is_ok());
                assert_eq!(outcome.values.get_number("repeat_count"), Some(f64::from(i)));
            });
        }
    });
}
