use super::{AppContext, AppError};
use crate::commands::CommandError;
use crate::formats::MemoryFileProvider;
use crate::model::{DataArray, GiftiFile};

fn context() -> AppContext {
    let provider = MemoryFileProvider::new();
    let mut metric = GiftiFile::new();
    metric
        .arrays
        .push(DataArray::from_column(vec![1.0, 2.0, 3.0]));
    provider.insert("in.func.gii", metric);
    AppContext::with_provider(Box::new(provider)).expect("context")
}

#[test]
fn context_registers_every_operation() {
    let context = context();
    assert_eq!(context.registry().len(), 5);
    assert!(context.registry().contains("-metric-stats"));
    context.shutdown();
}

#[test]
fn context_executes_through_its_provider() {
    let context = context();
    let mut out = Vec::new();
    context
        .execute(
            "-metric-stats",
            vec!["in.func.gii".into(), "-reduce".into(), "MAX".into()],
            None,
            &mut out,
        )
        .expect("execute");
    assert_eq!(String::from_utf8(out).expect("utf8"), "3\n");
}

#[test]
fn parse_failures_are_distinguished() {
    let context = context();
    let mut out = Vec::new();
    let error = context
        .execute("-metric-stats", vec!["in.func.gii".into(), "extra".into()], None, &mut out)
        .expect_err("extra argument");
    assert!(error.parse_failure());

    let error = context
        .execute("-metric-stats", vec!["in.func.gii".into()], None, &mut out)
        .expect_err("no statistic");
    assert!(!error.parse_failure());
    assert!(matches!(
        error,
        AppError::Command(CommandError::Dispatch { .. })
    ));
}
