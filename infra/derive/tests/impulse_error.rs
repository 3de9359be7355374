use impulse_derive::impulse_error;
use std::borrow::Cow;

#[impulse_error]
pub enum SampleError {
    #[error("Parse failure{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i64, SampleError> {
    Ok(raw.parse::<i64>()?)
}

#[test]
fn question_mark_converts_source_errors() {
    let err = parse("nope").unwrap_err();
    assert!(matches!(err, SampleError::Parse { context: None, .. }));
}

#[test]
fn context_is_attached_to_source_results() {
    let err = "x".parse::<i64>().context("reading theme version").unwrap_err();
    assert!(err.to_string().starts_with("Parse failure (reading theme version): "));
}

#[test]
fn context_overrides_on_own_results() {
    let res: Result<(), SampleError> =
        Err(SampleError::NotFound { message: "theme".into(), context: None });
    let err = res.context("load").unwrap_err();
    assert_eq!(err.to_string(), "Not found (load): theme");
}

#[test]
fn strings_become_internal_errors() {
    let borrowed: SampleError = "static".into();
    let owned: SampleError = String::from("owned").into();
    assert_eq!(borrowed.to_string(), "Internal error: static");
    assert_eq!(owned.to_string(), "Internal error: owned");
}
